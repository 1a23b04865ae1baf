//! Error types for the Segmenter library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Segmenter operations.
#[derive(Debug, Error)]
pub enum SegmenterError {
    /// Malformed rule configuration on import.
    #[error("Invalid rule configuration at record {index}: {reason}")]
    InvalidFormat { index: usize, reason: String },

    /// Removal or lookup at a position the registry does not have.
    #[error("Position {position} is out of range (registry holds {len} rules)")]
    IndexOutOfRange { position: usize, len: usize },

    /// Two rules map to the same worksheet name.
    #[error("Rule '{rule}' maps to worksheet name '{sheet}', which is already taken")]
    DuplicateSheetName { rule: String, sheet: String },

    /// A rule was created without any constraint.
    #[error("Rule '{0}' has no constraints")]
    EmptyRule(String),

    /// A rule name is empty or whitespace only.
    #[error("Rule name must not be empty")]
    InvalidName,

    /// A range bound is infinite or NaN and cannot be stored in a rule file.
    #[error("Rule '{rule}' has a non-finite bound for column '{column}'")]
    NonFiniteBound { rule: String, column: String },

    /// Two dataset columns share a name.
    #[error("Duplicate column name: '{0}'")]
    DuplicateColumn(String),

    /// A constraint references a column that is missing or has the wrong type.
    /// Only raised when the engine runs in strict mode.
    #[error("Rule '{rule}' references column '{column}': {reason}")]
    SchemaDrift {
        rule: String,
        column: String,
        reason: String,
    },

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error reading a spreadsheet workbook.
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::XlsxError),

    /// Error writing a spreadsheet workbook.
    #[error("XLSX export error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no data to load.
    #[error("Empty data: {0}")]
    EmptyData(String),
}

impl SegmenterError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SegmenterError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_format(index: usize, reason: impl Into<String>) -> Self {
        SegmenterError::InvalidFormat {
            index,
            reason: reason.into(),
        }
    }
}

/// Result type alias for Segmenter operations.
pub type Result<T> = std::result::Result<T, SegmenterError>;
