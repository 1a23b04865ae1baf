//! Applying rules to datasets.

mod engine;
mod result;

pub use engine::{EngineConfig, SegmentationEngine};
pub use result::{SegmentResult, SegmentationRun};
