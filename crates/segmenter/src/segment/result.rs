//! Segmentation results.

use serde::Serialize;

use crate::input::Dataset;
use crate::rule::Rule;

/// The rows one rule selected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentResult {
    /// Name of the rule that produced this segment.
    pub rule_name: String,
    /// Number of matching rows.
    pub row_count: usize,
    /// Share of all rows, 0.0-100.0. Zero for an empty dataset.
    pub percentage: f64,
    /// Positions of the matching rows in the source dataset.
    pub row_indices: Vec<usize>,
    /// The matching rows, with the source column order.
    #[serde(skip)]
    pub subset: Dataset,
    /// The rule as it was when the segment was computed.
    #[serde(skip)]
    pub rule: Rule,
}

/// Results of one segmentation pass, one entry per rule in registry order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentationRun {
    /// Rows in the source dataset.
    pub total_rows: usize,
    pub results: Vec<SegmentResult>,
}

impl SegmentationRun {
    /// Sum of all segment sizes. Segments may overlap, so this can exceed
    /// `total_rows`.
    pub fn segment_count_sum(&self) -> usize {
        self.results.iter().map(|r| r.row_count).sum()
    }

    /// First segment produced by a rule with this name.
    pub fn get(&self, rule_name: &str) -> Option<&SegmentResult> {
        self.results.iter().find(|r| r.rule_name == rule_name)
    }

    /// `(name, count, percentage)` triples for charting.
    pub fn chart_series(&self) -> Vec<(String, usize, f64)> {
        self.results
            .iter()
            .map(|r| (r.rule_name.clone(), r.row_count, r.percentage))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Percentage of `count` in `total`, or zero when `total` is zero.
pub(crate) fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}
