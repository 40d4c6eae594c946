/// Workbook loading for report values and consultant records.
///
/// Two Excel sources feed a conversion: the report workbook with its
/// `Tags`/`Werte` columns, and the consultant directory from which one
/// record is selected by name. Both are read with `calamine` and end up as
/// entries in a single [`ValueMap`] that drives substitution.
///
/// # Example
///
/// ```rust,no_run
/// use sdtfill::data::{self, ConsultantDirectory, ValueMap};
///
/// let mut values = ValueMap::new();
///
/// let directory = ConsultantDirectory::from_path("Energieberaterliste.xlsx")?;
/// if let Some(record) = directory.select("Maxi Muster") {
///     record.apply(&mut values);
/// }
///
/// // Workbook entries overwrite consultant fields on key collisions.
/// values.extend(data::load_values_from_path("report.xlsx", None)?);
/// # Ok::<(), sdtfill::data::DataError>(())
/// ```
pub mod consultant;
pub mod error;
pub mod values;

pub use consultant::{ConsultantDirectory, ConsultantRecord};
pub use error::{DataError, Result};
pub use values::{load_values, load_values_from_path, REPORT_SHEET};

use calamine::Data;
use std::collections::HashMap;

/// Mapping from placeholder tag to replacement value.
///
/// Later inserts overwrite earlier ones for the same key; keys are unique
/// and lookup order is irrelevant.
pub type ValueMap = HashMap<String, String>;

/// Find a named column in a header row.
pub(crate) fn column_index(header: &[Data], name: &str) -> Option<usize> {
    header
        .iter()
        .position(|cell| matches!(cell, Data::String(s) if s == name))
}

/// Coerce a cell to text the way a string-typed import would.
///
/// Absent and empty cells become the empty string, and whole numbers stored
/// as floats lose their trailing `.0`.
pub(crate) fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) => s.clone(),
        Some(Data::Float(f)) => float_text(*f),
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

fn float_text(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}
