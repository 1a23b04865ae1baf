//! Column typing and classification.

mod classify;
mod column;
mod types;

pub use classify::{classify, column_range, distinct_values, profile, ColumnClassification};
pub use column::{Column, ColumnProfile};
pub use types::ColumnType;
