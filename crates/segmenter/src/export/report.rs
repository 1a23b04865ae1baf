//! Summary report of a segmentation run.
//!
//! The report is rendered as a self-contained HTML document or as JSON.
//! Rendering is deterministic: criteria follow each rule's stored
//! constraint order and no timestamps are embedded.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, SegmenterError};
use crate::segment::SegmentationRun;

/// Aggregate report over all segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Rows in the source dataset.
    pub total_rows: usize,
    /// Number of rules evaluated.
    pub rule_count: usize,
    /// Sum of segment sizes; exceeds `total_rows` when segments overlap.
    pub segment_count_sum: usize,
    pub segments: Vec<SegmentSummary>,
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub name: String,
    pub row_count: usize,
    /// Percentage of all rows, rounded to one decimal place.
    pub percentage: f64,
    /// Human-readable constraints, numeric first.
    pub criteria: Vec<String>,
}

impl Report {
    pub fn build(run: &SegmentationRun) -> Self {
        let segments = run
            .results
            .iter()
            .map(|r| SegmentSummary {
                name: r.rule_name.clone(),
                row_count: r.row_count,
                percentage: round_one_decimal(r.percentage),
                criteria: r.rule.criteria(),
            })
            .collect();

        Self {
            total_rows: run.total_rows,
            rule_count: run.len(),
            segment_count_sum: run.segment_count_sum(),
            segments,
        }
    }

    /// `(name, count, percentage)` triples for an external chart.
    pub fn chart_series(&self) -> Vec<(String, usize, f64)> {
        self.segments
            .iter()
            .map(|s| (s.name.clone(), s.row_count, s.percentage))
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render a standalone HTML document.
    ///
    /// The chart series is embedded as a JSON data block with id
    /// `chart-data` for a charting script to pick up.
    pub fn to_html(&self) -> Result<String> {
        let series: Vec<_> = self
            .segments
            .iter()
            .map(|s| {
                serde_json::json!({
                    "name": s.name,
                    "count": s.row_count,
                    "percentage": s.percentage,
                })
            })
            .collect();
        // Keep "</script>" out of the data block.
        let chart_json = serde_json::to_string(&series)?.replace('<', "\\u003c");

        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n<title>Segmentation Report</title>\n");
        html.push_str(STYLE);
        html.push_str("</head>\n<body>\n<h1>Segmentation Report</h1>\n");

        html.push_str("<table class=\"totals\">\n");
        let _ = writeln!(html, "<tr><th>Total rows</th><td>{}</td></tr>", self.total_rows);
        let _ = writeln!(html, "<tr><th>Rules</th><td>{}</td></tr>", self.rule_count);
        let _ = writeln!(
            html,
            "<tr><th>Rows across segments</th><td>{}</td></tr>",
            self.segment_count_sum
        );
        html.push_str("</table>\n");

        html.push_str("<table class=\"segments\">\n");
        html.push_str("<tr><th>Segment</th><th>Rows</th><th>Share</th><th>Criteria</th></tr>\n");
        for segment in &self.segments {
            let criteria: Vec<String> = segment.criteria.iter().map(|c| escape_html(c)).collect();
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{:.1}%</td><td>{}</td></tr>",
                escape_html(&segment.name),
                segment.row_count,
                segment.percentage,
                criteria.join("<br>")
            );
        }
        html.push_str("</table>\n");

        let _ = writeln!(
            html,
            "<script type=\"application/json\" id=\"chart-data\">{}</script>",
            chart_json
        );
        html.push_str("</body>\n</html>\n");

        Ok(html)
    }

    /// Write the HTML rendering to a file.
    pub fn save_html(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_html()?).map_err(|e| SegmenterError::io(path, e))?;
        info!(path = %path.display(), segments = self.segments.len(), "wrote report");
        Ok(())
    }

    /// Write the JSON rendering to a file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|e| SegmenterError::io(path, e))?;
        info!(path = %path.display(), segments = self.segments.len(), "wrote JSON report");
        Ok(())
    }
}

const STYLE: &str = "<style>\n\
body { font-family: sans-serif; margin: 2em; }\n\
table { border-collapse: collapse; margin-bottom: 1.5em; }\n\
th, td { border: 1px solid #ccc; padding: 4px 10px; text-align: left; vertical-align: top; }\n\
th { background: #f3f3f3; }\n\
</style>\n";

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Dataset, Value};
    use crate::rule::{Rule, RuleRegistry};
    use crate::segment::SegmentationEngine;

    fn run() -> SegmentationRun {
        let ds = Dataset::new(
            vec!["score".to_string(), "dept".to_string()],
            vec![
                vec![Value::Number(1.0), Value::from("Sales")],
                vec![Value::Number(5.0), Value::from("Eng")],
                vec![Value::Number(9.0), Value::from("Sales")],
            ],
        )
        .unwrap();

        let registry: RuleRegistry = vec![
            Rule::builder("Low")
                .include("dept", ["Sales", "Ops"])
                .range("score", 1.0, 5.0)
                .build()
                .unwrap(),
            Rule::builder("<All>").range("score", 0.0, 10.0).build().unwrap(),
        ]
        .into_iter()
        .collect();

        SegmentationEngine::new().segment(&ds, &registry).unwrap()
    }

    #[test]
    fn test_build() {
        let report = Report::build(&run());

        assert_eq!(report.total_rows, 3);
        assert_eq!(report.rule_count, 2);
        assert_eq!(report.segment_count_sum, 4);

        let low = &report.segments[0];
        assert_eq!(low.row_count, 1);
        assert_eq!(low.percentage, 33.3);
        assert_eq!(low.criteria, vec!["score: [1, 5]", "dept: Sales, Ops"]);
    }

    #[test]
    fn test_chart_series() {
        let series = Report::build(&run()).chart_series();
        assert_eq!(series[1], ("<All>".to_string(), 3, 100.0));
    }

    #[test]
    fn test_html_is_escaped() {
        let html = Report::build(&run()).to_html().unwrap();

        assert!(html.contains("&lt;All&gt;"));
        assert!(!html.contains("<td><All></td>"));
        assert!(html.contains("33.3%"));
        assert!(html.contains("id=\"chart-data\""));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let a = Report::build(&run());
        let b = Report::build(&run());
        assert_eq!(a.to_html().unwrap(), b.to_html().unwrap());
        assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
    }

    #[test]
    fn test_json_round_trip() {
        let report = Report::build(&run());
        let back: Report = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(back, report);
    }
}
