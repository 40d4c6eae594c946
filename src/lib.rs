//! sdtfill - fills tagged content controls in Word report templates from
//! Excel workbook data
//!
//! The crate reads a `.docx` template whose placeholders are content
//! controls (`w:sdt` elements) tagged with value keys, loads a key/value
//! table from an Excel workbook, and writes a finished report. Conditional
//! blocks tagged `Anzahl_Maßnahmen_<N>` are kept or removed depending on an
//! integer control value, and placeholders that received no value are
//! collected into a report for the caller.
//!
//! # Features
//!
//! - **Value loading**: `Tags`/`Werte` workbook columns become the value map
//! - **Consultant records**: one directory row selected by name fills the
//!   `Berater_*` placeholders
//! - **Conditional blocks**: exactly one measures block survives, unwrapped
//!   into plain text; the others are removed entirely
//! - **Format preservation**: only the first text run of a placeholder is
//!   rewritten, every other part of the package round-trips unchanged
//! - **Atomic output**: the report file appears fully formed or not at all
//!
//! # Example - filling a template
//!
//! ```no_run
//! use sdtfill::data;
//! use sdtfill::report;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let values = data::load_values_from_path("report.xlsx", None)?;
//! let outcome = report::fill_report("template.docx", &values, "out.docx")?;
//!
//! for tag in outcome.missing.iter() {
//!     eprintln!("unfilled placeholder: {}", tag);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - working with the tree directly
//!
//! ```no_run
//! use sdtfill::data::ValueMap;
//! use sdtfill::docx::{DocumentTree, Package};
//! use sdtfill::engine;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut package = Package::open("template.docx")?;
//! let mut tree = DocumentTree::parse(package.document_xml()?)?;
//!
//! let mut values = ValueMap::new();
//! values.insert("Kunde_Name".to_string(), "Muster GmbH".to_string());
//!
//! let outcome = engine::resolve(&mut tree, &values);
//! println!("{} placeholder(s) missing", outcome.missing.len());
//!
//! package.set_document_xml(tree.to_bytes());
//! package.save_as("out.docx")?;
//! # Ok(())
//! # }
//! ```

/// Workbook loading for report values and consultant records
pub mod data;

/// Word (.docx) package and document tree support
pub mod docx;

/// The placeholder resolution engine
pub mod engine;

/// One-call template-to-report conversion
pub mod report;

// Re-export commonly used types for convenience
pub use data::{ConsultantDirectory, ConsultantRecord, DataError, ValueMap};
pub use docx::{DocumentTree, DocxError, Package};
pub use engine::{ConditionalRule, MissingTagReport, PruneSummary, ResolveOutcome};
pub use report::{fill_report, suggest_file_name};
