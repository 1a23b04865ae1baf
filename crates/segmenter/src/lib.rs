//! Segmenter: rule-based segmentation of tabular datasets.
//!
//! An analyst defines named rules, each a conjunction of inclusive numeric
//! ranges and categorical allow-lists over the dataset's columns. Every rule
//! selects a (possibly overlapping) segment of rows; the segments are then
//! exported as a multi-sheet workbook and summarised in a report.
//!
//! # Core Principles
//!
//! - **Pure**: the same dataset and rules always yield the same segments
//! - **Lenient**: constraints on missing or retyped columns are skipped, not fatal
//! - **Ordered**: rules, constraints and report lines keep insertion order
//!
//! # Example
//!
//! ```no_run
//! use segmenter::{Rule, RuleRegistry, Segmenter};
//!
//! let mut rules = RuleRegistry::new();
//! rules.upsert(Rule::builder("High").range("score", 7.0, 10.0).build().unwrap());
//!
//! let segmenter = Segmenter::new();
//! let outcome = segmenter.run("employees.xlsx", &rules).unwrap();
//!
//! for segment in &outcome.report.segments {
//!     println!("{}: {} rows", segment.name, segment.row_count);
//! }
//! segmenter
//!     .save_workbook(&outcome.dataset, &outcome.run, "segments.xlsx")
//!     .unwrap();
//! ```

pub mod error;
pub mod export;
pub mod input;
pub mod rule;
pub mod schema;
pub mod segment;

mod segmenter;

pub use crate::segmenter::{Segmenter, SegmenterConfig, SegmentationOutcome};
pub use error::{Result, SegmenterError};
pub use export::{ExportConfig, Report, SegmentSummary, SheetNamePolicy, WorkbookExporter};
pub use input::{Dataset, ParserConfig, SourceMetadata, Value};
pub use rule::{CategoricalConstraint, NumericConstraint, Rule, RuleBuilder, RuleRegistry, Upsert};
pub use schema::{ColumnType, ColumnClassification};
pub use segment::{EngineConfig, SegmentResult, SegmentationEngine, SegmentationRun};
