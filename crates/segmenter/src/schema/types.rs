//! Core type definitions for column typing.

use serde::{Deserialize, Serialize};

use crate::input::Value;

/// Inferred data type for a column.
///
/// Segmentation only distinguishes two kinds of columns: those that can be
/// constrained by an inclusive numeric range and those that can be
/// constrained by a set of allowed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Every present value is a number.
    Numeric,
    /// At least one present value is text.
    Categorical,
}

impl ColumnType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Numeric)
    }

    /// Infer the type of a column from its values.
    ///
    /// Nulls are ignored, so a column with no present values is numeric.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        let has_text = values.into_iter().any(|v| matches!(v, Value::Text(_)));
        if has_text {
            ColumnType::Categorical
        } else {
            ColumnType::Numeric
        }
    }
}

impl Default for ColumnType {
    fn default() -> Self {
        ColumnType::Categorical
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::Numeric => write!(f, "numeric"),
            ColumnType::Categorical => write!(f, "categorical"),
        }
    }
}
