//! Typed in-memory dataset.

use std::borrow::Cow;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SegmenterError};
use crate::schema::{Column, ColumnType};

/// Cell texts read as missing, compared case-insensitively after trimming.
const NULL_MARKERS: &[&str] = &["", "na", "n/a", "nan", "null", "none"];

/// A single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Number(f64),
    Text(String),
}

impl Value {
    /// Interpret a raw text cell: null markers become `Null`, finite numbers
    /// become `Number`, everything else is kept as text.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if is_null_marker(trimmed) {
            return Value::Null;
        }

        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::Text(trimmed.to_string()),
        }
    }

    /// Returns true unless the cell is missing.
    pub fn is_present(&self) -> bool {
        !matches!(self, Value::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Textual form used for set membership. Numbers render in their
    /// shortest form (`5`, `2.5`).
    pub fn as_category(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Null => None,
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Text(s) => Some(Cow::Borrowed(s.as_str())),
        }
    }
}

pub(crate) fn is_null_marker(text: &str) -> bool {
    let text = text.trim();
    NULL_MARKERS.iter().any(|m| text.eq_ignore_ascii_case(m))
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// Tabular data with named, typed columns.
///
/// Column names are unique and every row holds exactly one cell per column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// Build a dataset, inferring each column's type from its values.
    ///
    /// Short rows are padded with nulls and long rows truncated to the
    /// header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for header in &headers {
            if !seen.insert(header.as_str()) {
                return Err(SegmenterError::DuplicateColumn(header.clone()));
            }
        }

        let width = headers.len();
        let rows: Vec<Vec<Value>> = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Null);
                row
            })
            .collect();

        let columns = headers
            .into_iter()
            .enumerate()
            .map(|(position, name)| {
                let column_type = ColumnType::infer(rows.iter().map(|r| &r[position]));
                Column::new(name, position, column_type)
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Type rows of raw text cells under `headers`.
    pub fn from_text(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|cell| Value::from_raw(cell)).collect())
            .collect();
        Self::new(headers, rows)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get all column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column(name).map(|c| c.position)
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[Value]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Copy the given rows into a new dataset with the same columns.
    ///
    /// Column types are carried over from this dataset rather than
    /// re-inferred, so a subset always has the source schema.
    pub fn select_rows(&self, indices: &[usize]) -> Dataset {
        Dataset {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_value_from_raw() {
        assert_eq!(Value::from_raw("42"), Value::Number(42.0));
        assert_eq!(Value::from_raw(" 2.5 "), Value::Number(2.5));
        assert_eq!(Value::from_raw("NA"), Value::Null);
        assert_eq!(Value::from_raw(""), Value::Null);
        assert_eq!(Value::from_raw("inf"), Value::Text("inf".to_string()));
        assert_eq!(Value::from_raw("Sales"), Value::Text("Sales".to_string()));
    }

    #[test]
    fn test_value_as_category() {
        assert_eq!(Value::Number(5.0).as_category().as_deref(), Some("5"));
        assert_eq!(Value::Number(2.5).as_category().as_deref(), Some("2.5"));
        assert_eq!(Value::from("HR").as_category().as_deref(), Some("HR"));
        assert_eq!(Value::Null.as_category(), None);
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let err = Dataset::new(headers(&["a", "b", "a"]), Vec::new()).unwrap_err();
        assert!(matches!(err, SegmenterError::DuplicateColumn(name) if name == "a"));
    }

    #[test]
    fn test_rows_are_padded_and_truncated() {
        let dataset = Dataset::new(
            headers(&["a", "b"]),
            vec![
                vec![Value::Number(1.0)],
                vec![Value::Number(2.0), Value::from("x"), Value::from("extra")],
            ],
        )
        .unwrap();

        assert_eq!(dataset.get(0, 1), Some(&Value::Null));
        assert_eq!(dataset.row(1).unwrap().len(), 2);
    }

    #[test]
    fn test_from_text_infers_types() {
        let dataset = Dataset::from_text(
            headers(&["id", "age", "dept"]),
            vec![
                vec!["S1".into(), "30".into(), "Eng".into()],
                vec!["S2".into(), "NA".into(), "HR".into()],
            ],
        )
        .unwrap();

        assert_eq!(dataset.columns()[0].column_type, ColumnType::Categorical);
        assert_eq!(dataset.columns()[1].column_type, ColumnType::Numeric);
        assert_eq!(dataset.get(1, 1), Some(&Value::Null));
    }

    #[test]
    fn test_null_markers() {
        for raw in ["", "  ", "NA", "na", "N/A", "null", "NaN", "None"] {
            assert_eq!(Value::from_raw(raw), Value::Null, "{raw:?}");
        }
        assert_eq!(Value::from_raw("0"), Value::Number(0.0));
        assert_eq!(Value::from_raw(" value "), Value::from("value"));
    }

    #[test]
    fn test_select_rows_keeps_schema() {
        let dataset = Dataset::new(
            headers(&["score"]),
            vec![vec![Value::Number(1.0)], vec![Value::Number(2.0)]],
        )
        .unwrap();

        let subset = dataset.select_rows(&[1]);
        assert_eq!(subset.row_count(), 1);
        assert_eq!(subset.columns(), dataset.columns());
        assert_eq!(subset.get(0, 0), Some(&Value::Number(2.0)));

        let none = dataset.select_rows(&[]);
        assert!(none.is_empty());
        assert!(none.columns()[0].is_numeric());
    }
}
