/// One-call report conversion.
///
/// Ties the pieces together: open the template package, parse the document
/// tree, resolve placeholders against the value map, and write the finished
/// report. The template file is fully read before the output is written, so
/// the same path may serve as both.
use crate::data::ValueMap;
use crate::docx::{DocumentTree, Package, Result};
use crate::engine::{self, ResolveOutcome};
use std::path::Path;

/// File-name stem for generated reports.
pub const OUTPUT_STEM: &str = "Sanierungsfahrplan";

/// Value-map key carrying the building address the file name is derived
/// from.
pub const ADDRESS_KEY: &str = "Gebäude_Adresse";

/// Fill a report template and write the result.
///
/// Returns what the engine did: the missing-tag report and the pruning
/// counts. Fatal errors leave the output path untouched.
///
/// # Examples
///
/// ```rust,no_run
/// use sdtfill::data;
/// use sdtfill::report;
///
/// let values = data::load_values_from_path("report.xlsx", None)?;
/// let outcome = report::fill_report("template.docx", &values, "out.docx")?;
///
/// for tag in outcome.missing.iter() {
///     eprintln!("unfilled placeholder: {}", tag);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn fill_report<P: AsRef<Path>, Q: AsRef<Path>>(
    template: P,
    values: &ValueMap,
    output: Q,
) -> Result<ResolveOutcome> {
    let mut package = Package::open(template)?;
    let mut tree = DocumentTree::parse(package.document_xml()?)?;

    let outcome = engine::resolve(&mut tree, values);

    package.set_document_xml(tree.to_bytes());
    package.save_as(output)?;

    Ok(outcome)
}

/// Suggest a file-name stem for the finished report.
///
/// Derived from the building address with filesystem-hostile characters
/// replaced, falling back to the bare stem when no address is known. The
/// `.docx` extension is the caller's business.
pub fn suggest_file_name(values: &ValueMap) -> String {
    let address = values.get(ADDRESS_KEY).map(String::as_str).unwrap_or("");
    let clean: String = address
        .chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect();
    let clean = clean.trim();
    if clean.is_empty() {
        OUTPUT_STEM.to_string()
    } else {
        format!("{}_{}", OUTPUT_STEM, clean)
    }
}
