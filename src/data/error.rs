/// Error types for workbook loading.
use thiserror::Error;

/// Result type for workbook loading.
pub type Result<T> = std::result::Result<T, DataError>;

/// Error types for workbook loading.
#[derive(Error, Debug)]
pub enum DataError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Workbook parsing error
    #[error("Failed to parse workbook: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    /// Required worksheet or column absent
    #[error("Schema error: {0}")]
    Schema(String),
}
