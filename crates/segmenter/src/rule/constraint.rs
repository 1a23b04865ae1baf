//! Single-column constraints.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::input::{Dataset, Value};
use crate::schema::column_range;

/// Why a constraint could not be bound to a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drift {
    /// The dataset has no column with that name.
    MissingColumn,
    /// The column exists but is not numeric.
    NotNumeric,
}

impl std::fmt::Display for Drift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Drift::MissingColumn => write!(f, "column is not present in the dataset"),
            Drift::NotNumeric => write!(f, "column is not numeric"),
        }
    }
}

/// Inclusive numeric range on one column.
///
/// `min > max` is legal and matches nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericConstraint {
    pub column: String,
    pub min: f64,
    pub max: f64,
}

impl NumericConstraint {
    pub fn new(column: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            column: column.into(),
            min,
            max,
        }
    }

    /// A constraint spanning the observed range of a numeric column.
    pub fn observed(dataset: &Dataset, column: &str) -> Option<Self> {
        let (min, max) = column_range(dataset, column)?;
        Some(Self::new(column, min, max))
    }

    /// Both bounds are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Check a single value against the bounds.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Locate the column this constraint tests.
    pub fn resolve(&self, dataset: &Dataset) -> Result<usize, Drift> {
        let column = dataset.column(&self.column).ok_or(Drift::MissingColumn)?;
        if column.is_numeric() {
            Ok(column.position)
        } else {
            Err(Drift::NotNumeric)
        }
    }

    /// Evaluate against one row of `dataset`. A drifted column is skipped.
    pub fn matches(&self, dataset: &Dataset, row: &[Value]) -> bool {
        match self.resolve(dataset) {
            Ok(index) => self.matches_value(row.get(index)),
            Err(_) => true,
        }
    }

    pub(crate) fn matches_value(&self, value: Option<&Value>) -> bool {
        value
            .and_then(Value::as_number)
            .is_some_and(|v| self.contains(v))
    }

    /// Human-readable form, e.g. `score: [7, 10]`.
    pub fn describe(&self) -> String {
        format!("{}: [{}, {}]", self.column, self.min, self.max)
    }
}

/// Set-membership on one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalConstraint {
    pub column: String,
    pub allowed: IndexSet<String>,
}

impl CategoricalConstraint {
    pub fn new<S: Into<String>>(column: impl Into<String>, allowed: impl IntoIterator<Item = S>) -> Self {
        Self {
            column: column.into(),
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    /// Missing values never match.
    pub fn contains(&self, value: &Value) -> bool {
        value
            .as_category()
            .is_some_and(|v| self.allowed.contains(v.as_ref()))
    }

    pub fn resolve(&self, dataset: &Dataset) -> Result<usize, Drift> {
        dataset
            .column_index(&self.column)
            .ok_or(Drift::MissingColumn)
    }

    /// Evaluate against one row of `dataset`. A missing column is skipped.
    pub fn matches(&self, dataset: &Dataset, row: &[Value]) -> bool {
        match self.resolve(dataset) {
            Ok(index) => self.matches_value(row.get(index)),
            Err(_) => true,
        }
    }

    pub(crate) fn matches_value(&self, value: Option<&Value>) -> bool {
        value.is_some_and(|v| self.contains(v))
    }

    /// Human-readable form, e.g. `dept: Sales, HR`.
    pub fn describe(&self) -> String {
        let values: Vec<&str> = self.allowed.iter().map(String::as_str).collect();
        format!("{}: {}", self.column, values.join(", "))
    }
}
