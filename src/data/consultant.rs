//! Consultant directory loading.
//!
//! The directory workbook lists one consultant per row. Name and number
//! columns are required; title, e-mail and phone are optional and default
//! to empty cells. Selecting a record by name turns it into fixed value-map
//! entries under the `Berater_*` keys used by the report templates.

use crate::data::error::{DataError, Result};
use crate::data::{cell_text, column_index, ValueMap};
use calamine::{Reader, Xlsx};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// Value-map key for the consultant's name.
pub const NAME_KEY: &str = "Berater_Name";

/// Value-map key for the consultant's registration number.
pub const NUMBER_KEY: &str = "Berater_Beraternummer";

/// Value-map key for the consultant's title.
pub const TITLE_KEY: &str = "Berater_Titel";

/// Value-map key for the consultant's e-mail address.
pub const EMAIL_KEY: &str = "Berater_E-Mail";

/// Value-map key for the consultant's phone number.
pub const PHONE_KEY: &str = "Berater_Telefonnummer";

/// Sentinel written when a consultant has no title on file.
const MISSING_TITLE: &str = "N/A";

/// One consultant row from the directory workbook.
#[derive(Debug, Clone)]
pub struct ConsultantRecord {
    name: String,
    number: String,
    title: String,
    email: String,
    phone: String,
}

impl ConsultantRecord {
    /// Get the consultant's name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the consultant's registration number.
    #[inline]
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Get the consultant's title as stored, possibly empty.
    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Get the consultant's e-mail address, possibly empty.
    #[inline]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Get the consultant's phone number, possibly empty.
    #[inline]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Insert this record into a value map under the fixed `Berater_*` keys.
    ///
    /// An empty title becomes the literal `N/A` so the placeholder never
    /// shows up as unfilled in the report.
    pub fn apply(&self, values: &mut ValueMap) {
        values.insert(NAME_KEY.to_string(), self.name.clone());
        values.insert(NUMBER_KEY.to_string(), self.number.clone());
        let title = if self.title.trim().is_empty() {
            MISSING_TITLE
        } else {
            self.title.as_str()
        };
        values.insert(TITLE_KEY.to_string(), title.to_string());
        values.insert(EMAIL_KEY.to_string(), self.email.clone());
        values.insert(PHONE_KEY.to_string(), self.phone.clone());
    }
}

/// The consultant directory, loaded from the first worksheet of its
/// workbook.
///
/// # Examples
///
/// ```rust,no_run
/// use sdtfill::data::ConsultantDirectory;
///
/// let directory = ConsultantDirectory::from_path("Energieberaterliste.xlsx")?;
/// for name in directory.names() {
///     println!("{}", name);
/// }
/// # Ok::<(), sdtfill::data::DataError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConsultantDirectory {
    records: Vec<ConsultantRecord>,
}

impl ConsultantDirectory {
    /// Load the directory from a workbook file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        Self::from_reader(file)
    }

    /// Load the directory from a workbook reader.
    ///
    /// Rows without a name are skipped; the name and number columns are
    /// required, the rest are optional.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut workbook: Xlsx<R> = Xlsx::new(reader)?;
        let sheet = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| DataError::Schema("workbook has no worksheets".to_string()))?;
        let range = workbook.worksheet_range(&sheet)?;

        let mut rows = range.rows();
        let header = rows.next().ok_or_else(|| {
            DataError::Schema(format!("worksheet '{}' is empty", sheet))
        })?;
        let name_col = column_index(header, NAME_KEY).ok_or_else(|| {
            DataError::Schema(format!("required column '{}' not found", NAME_KEY))
        })?;
        let number_col = column_index(header, NUMBER_KEY).ok_or_else(|| {
            DataError::Schema(format!("required column '{}' not found", NUMBER_KEY))
        })?;
        let title_col = column_index(header, TITLE_KEY);
        let email_col = column_index(header, EMAIL_KEY);
        let phone_col = column_index(header, PHONE_KEY);

        let optional = |row: &[calamine::Data], col: Option<usize>| {
            col.map(|col| cell_text(row.get(col))).unwrap_or_default()
        };

        let mut records = Vec::new();
        for row in rows {
            let name = cell_text(row.get(name_col));
            if name.is_empty() {
                continue;
            }
            records.push(ConsultantRecord {
                name,
                number: cell_text(row.get(number_col)),
                title: optional(row, title_col),
                email: optional(row, email_col),
                phone: optional(row, phone_col),
            });
        }

        log::info!("loaded {} consultant(s)", records.len());
        Ok(Self { records })
    }

    /// Get all records in workbook order.
    #[inline]
    pub fn records(&self) -> &[ConsultantRecord] {
        &self.records
    }

    /// List the consultant names in workbook order.
    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    /// Find a record by exact name.
    pub fn select(&self, name: &str) -> Option<&ConsultantRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Check whether the directory has no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get the number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use std::io::Cursor;

    fn directory_bytes(with_title_column: bool) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, NAME_KEY).unwrap();
        worksheet.write_string(0, 1, NUMBER_KEY).unwrap();
        if with_title_column {
            worksheet.write_string(0, 2, TITLE_KEY).unwrap();
            worksheet.write_string(0, 3, EMAIL_KEY).unwrap();
        }
        worksheet.write_string(1, 0, "Maxi Muster").unwrap();
        worksheet.write_string(1, 1, "12345").unwrap();
        if with_title_column {
            worksheet.write_string(1, 2, "Dipl.-Ing.").unwrap();
            worksheet.write_string(1, 3, "maxi@example.com").unwrap();
        }
        worksheet.write_string(2, 0, "Kim Beispiel").unwrap();
        worksheet.write_string(2, 1, "67890").unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_select_by_name() {
        let directory =
            ConsultantDirectory::from_reader(Cursor::new(directory_bytes(true))).unwrap();

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.names(), vec!["Maxi Muster", "Kim Beispiel"]);
        let record = directory.select("Maxi Muster").unwrap();
        assert_eq!(record.number(), "12345");
        assert_eq!(record.title(), "Dipl.-Ing.");
        assert!(directory.select("Unbekannt").is_none());
    }

    #[test]
    fn test_apply_sets_fixed_keys() {
        let directory =
            ConsultantDirectory::from_reader(Cursor::new(directory_bytes(true))).unwrap();
        let mut values = ValueMap::new();
        directory.select("Maxi Muster").unwrap().apply(&mut values);

        assert_eq!(values.get(NAME_KEY).map(String::as_str), Some("Maxi Muster"));
        assert_eq!(values.get(NUMBER_KEY).map(String::as_str), Some("12345"));
        assert_eq!(values.get(TITLE_KEY).map(String::as_str), Some("Dipl.-Ing."));
        assert_eq!(
            values.get(EMAIL_KEY).map(String::as_str),
            Some("maxi@example.com")
        );
    }

    #[test]
    fn test_empty_title_becomes_sentinel() {
        let directory =
            ConsultantDirectory::from_reader(Cursor::new(directory_bytes(true))).unwrap();
        let mut values = ValueMap::new();
        directory.select("Kim Beispiel").unwrap().apply(&mut values);

        assert_eq!(values.get(TITLE_KEY).map(String::as_str), Some("N/A"));
        assert_eq!(values.get(EMAIL_KEY).map(String::as_str), Some(""));
    }

    #[test]
    fn test_missing_optional_columns_default() {
        let directory =
            ConsultantDirectory::from_reader(Cursor::new(directory_bytes(false))).unwrap();
        let mut values = ValueMap::new();
        directory.select("Maxi Muster").unwrap().apply(&mut values);

        assert_eq!(values.get(TITLE_KEY).map(String::as_str), Some("N/A"));
        assert_eq!(values.get(PHONE_KEY).map(String::as_str), Some(""));
    }

    #[test]
    fn test_missing_required_column_is_schema_error() {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, NAME_KEY).unwrap();
        worksheet.write_string(1, 0, "Maxi Muster").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        match ConsultantDirectory::from_reader(Cursor::new(bytes)) {
            Err(DataError::Schema(msg)) => assert!(msg.contains(NUMBER_KEY)),
            _ => panic!("expected schema error"),
        }
    }
}
