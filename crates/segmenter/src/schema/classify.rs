//! Column classification into numeric and categorical groups.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::input::Dataset;

use super::column::ColumnProfile;

/// Column names partitioned by type, in dataset column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnClassification {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
}

/// Partition the dataset's columns into numeric and categorical names.
///
/// Never fails; a dataset without columns yields two empty lists.
pub fn classify(dataset: &Dataset) -> ColumnClassification {
    let mut classification = ColumnClassification::default();
    for column in dataset.columns() {
        if column.is_numeric() {
            classification.numeric.push(column.name.clone());
        } else {
            classification.categorical.push(column.name.clone());
        }
    }
    classification
}

/// Observed (min, max) of a numeric column.
///
/// Returns `None` for missing or categorical columns, and for numeric
/// columns without a present value.
pub fn column_range(dataset: &Dataset, column: &str) -> Option<(f64, f64)> {
    let index = dataset.column_index(column)?;
    if !dataset.columns()[index].is_numeric() {
        return None;
    }

    dataset
        .column_values(index)
        .filter_map(|v| v.as_number())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}

/// Distinct rendered values of a column in first-seen order.
pub fn distinct_values(dataset: &Dataset, column: &str) -> Vec<String> {
    let Some(index) = dataset.column_index(column) else {
        return Vec::new();
    };

    let set: IndexSet<String> = dataset
        .column_values(index)
        .filter_map(|v| v.as_category())
        .map(|v| v.into_owned())
        .collect();
    set.into_iter().collect()
}

/// Profile every column of the dataset.
pub fn profile(dataset: &Dataset) -> Vec<ColumnProfile> {
    dataset
        .columns()
        .iter()
        .map(|column| {
            let null_count = dataset
                .column_values(column.position)
                .filter(|v| !v.is_present())
                .count();

            ColumnProfile {
                name: column.name.clone(),
                column_type: column.column_type,
                count: dataset.row_count(),
                null_count,
                distinct_count: distinct_values(dataset, &column.name).len(),
                range: column_range(dataset, &column.name),
            }
        })
        .collect()
}
