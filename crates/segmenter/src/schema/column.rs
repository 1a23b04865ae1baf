//! Column definition and profile statistics.

use serde::{Deserialize, Serialize};

use super::types::ColumnType;

/// A named, typed column of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Zero-based position in the dataset.
    pub position: usize,
    /// Inferred data type.
    pub column_type: ColumnType,
}

impl Column {
    /// Create a new column.
    pub fn new(name: impl Into<String>, position: usize, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            position,
            column_type,
        }
    }

    /// Returns true if the column can be range-filtered.
    pub fn is_numeric(&self) -> bool {
        self.column_type.is_numeric()
    }
}

/// Summary of a single column, used to seed constraint defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name.
    pub name: String,
    /// Inferred data type.
    pub column_type: ColumnType,
    /// Number of rows.
    pub count: usize,
    /// Number of null/missing values.
    pub null_count: usize,
    /// Number of distinct non-null values.
    pub distinct_count: usize,
    /// Observed (min, max) for numeric columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<(f64, f64)>,
}

impl ColumnProfile {
    /// Get the null percentage.
    pub fn null_percentage(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.null_count as f64 / self.count as f64) * 100.0
        }
    }
}
