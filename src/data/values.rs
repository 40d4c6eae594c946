//! Report value loading.
//!
//! The report workbook carries one worksheet with two named columns: `Tags`
//! holds the placeholder keys, `Werte` the replacement values. Rows are
//! zipped positionally into the value map, so row order decides which value
//! wins on duplicate keys.

use crate::data::error::{DataError, Result};
use crate::data::{cell_text, column_index, ValueMap};
use calamine::{Reader, Xlsx};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// Worksheet the report export writes its tag table to.
pub const REPORT_SHEET: &str = "Export NWG";

/// Column holding the placeholder keys.
const TAGS_COLUMN: &str = "Tags";

/// Column holding the replacement values.
const VALUES_COLUMN: &str = "Werte";

/// Load the value map from a report workbook file.
///
/// `sheet` selects the worksheet; `None` uses [`REPORT_SHEET`].
pub fn load_values_from_path<P: AsRef<Path>>(
    path: P,
    sheet: Option<&str>,
) -> Result<ValueMap> {
    let file = BufReader::new(File::open(path)?);
    load_values(file, sheet)
}

/// Load the value map from a report workbook.
///
/// Every cell is coerced to text; an empty `Werte` cell yields an empty
/// string, which substitution later reports as a missing value. A missing
/// worksheet or column is a schema error and no partial map is returned.
pub fn load_values<R: Read + Seek>(reader: R, sheet: Option<&str>) -> Result<ValueMap> {
    let mut workbook: Xlsx<R> = Xlsx::new(reader)?;
    let sheet = sheet.unwrap_or(REPORT_SHEET);

    if !workbook.sheet_names().iter().any(|name| name.as_str() == sheet) {
        return Err(DataError::Schema(format!(
            "worksheet '{}' not found",
            sheet
        )));
    }
    let range = workbook.worksheet_range(sheet)?;

    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| {
        DataError::Schema(format!("worksheet '{}' is empty", sheet))
    })?;
    let tags_col = column_index(header, TAGS_COLUMN).ok_or_else(|| {
        DataError::Schema(format!(
            "required column '{}' not found in worksheet '{}'",
            TAGS_COLUMN, sheet
        ))
    })?;
    let values_col = column_index(header, VALUES_COLUMN).ok_or_else(|| {
        DataError::Schema(format!(
            "required column '{}' not found in worksheet '{}'",
            VALUES_COLUMN, sheet
        ))
    })?;

    let mut values = ValueMap::new();
    for row in rows {
        let key = cell_text(row.get(tags_col));
        let value = cell_text(row.get(values_col));
        values.insert(key, value);
    }

    log::info!("loaded {} value(s) from worksheet '{}'", values.len(), sheet);
    Ok(values)
}
