//! Main Segmenter struct and public API.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::export::{ExportConfig, Report, WorkbookExporter};
use crate::input::{load_dataset, Dataset, ParserConfig, SourceMetadata};
use crate::rule::RuleRegistry;
use crate::segment::{EngineConfig, SegmentationEngine, SegmentationRun};

/// Configuration for a Segmenter.
#[derive(Debug, Clone, Default)]
pub struct SegmenterConfig {
    /// Parser configuration for delimited input.
    pub parser: ParserConfig,
    /// Segmentation engine configuration.
    pub engine: EngineConfig,
    /// Workbook export configuration.
    pub export: ExportConfig,
}

impl SegmenterConfig {
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_export(mut self, export: ExportConfig) -> Self {
        self.export = export;
        self
    }
}

/// Everything produced by one load-and-segment pass over a data file.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentationOutcome {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// The loaded dataset.
    #[serde(skip)]
    pub dataset: Dataset,
    /// Per-rule segments.
    pub run: SegmentationRun,
    /// Summary report of the segments.
    pub report: Report,
}

/// Loads datasets, applies rule registries and exports the results.
pub struct Segmenter {
    config: SegmenterConfig,
    engine: SegmentationEngine,
    exporter: WorkbookExporter,
}

impl Segmenter {
    /// Create a Segmenter with default configuration.
    pub fn new() -> Self {
        Self::with_config(SegmenterConfig::default())
    }

    /// Create a Segmenter with custom configuration.
    pub fn with_config(config: SegmenterConfig) -> Self {
        let engine = SegmentationEngine::with_config(config.engine.clone());
        let exporter = WorkbookExporter::with_config(config.export.clone());

        Self {
            config,
            engine,
            exporter,
        }
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Load a data file (`.csv`, `.tsv`, `.txt` or `.xlsx`).
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        load_dataset(path, &self.config.parser)
    }

    /// Apply every rule in `registry` to `dataset`.
    pub fn segment(&self, dataset: &Dataset, registry: &RuleRegistry) -> Result<SegmentationRun> {
        self.engine.segment(dataset, registry)
    }

    /// Build the summary report for a run.
    pub fn report(&self, run: &SegmentationRun) -> Report {
        Report::build(run)
    }

    /// Render the segmented workbook to XLSX bytes.
    pub fn export_workbook(&self, dataset: &Dataset, run: &SegmentationRun) -> Result<Vec<u8>> {
        self.exporter.to_bytes(dataset, run)
    }

    /// Write the segmented workbook to a file.
    pub fn save_workbook(
        &self,
        dataset: &Dataset,
        run: &SegmentationRun,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        self.exporter.save(dataset, run, path)
    }

    /// Load a data file, segment it and build the report.
    pub fn run(&self, path: impl AsRef<Path>, registry: &RuleRegistry) -> Result<SegmentationOutcome> {
        let path = path.as_ref();

        let (dataset, source) = self.load(path)?;
        let run = self.segment(&dataset, registry)?;
        let report = self.report(&run);

        info!(
            file = %source.file,
            rows = run.total_rows,
            segments = run.len(),
            "segmentation complete"
        );

        Ok(SegmentationOutcome {
            source,
            dataset,
            run,
            report,
        })
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::SheetNamePolicy;
    use crate::rule::Rule;
    use std::io::Write;

    #[test]
    fn test_run_csv() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "name,score,dept").unwrap();
        writeln!(file, "ann,9,Sales").unwrap();
        writeln!(file, "bob,4,Eng").unwrap();
        writeln!(file, "cy,7,Sales").unwrap();
        writeln!(file, "dee,2,Sales").unwrap();
        file.flush().unwrap();

        let registry: RuleRegistry = vec![
            Rule::builder("High").range("score", 7.0, 10.0).build().unwrap(),
            Rule::builder("Sales").include("dept", ["Sales"]).build().unwrap(),
        ]
        .into_iter()
        .collect();

        let outcome = Segmenter::new().run(file.path(), &registry).unwrap();

        assert_eq!(outcome.source.row_count, 4);
        assert_eq!(outcome.run.get("High").unwrap().row_count, 2);
        assert_eq!(outcome.run.get("Sales").unwrap().percentage, 75.0);
        assert_eq!(outcome.report.segment_count_sum, 5);
    }

    #[test]
    fn test_config_flows_to_exporter() {
        let config = SegmenterConfig::default()
            .with_export(ExportConfig::default().with_sheet_name_policy(SheetNamePolicy::Fail));
        let segmenter = Segmenter::with_config(config);

        let ds = Dataset::new(vec!["x".to_string()], Vec::new()).unwrap();
        let registry: RuleRegistry = vec![
            Rule::builder("a:b").range("x", 0.0, 1.0).build().unwrap(),
            Rule::builder("ab").range("x", 0.0, 1.0).build().unwrap(),
        ]
        .into_iter()
        .collect();

        let run = segmenter.segment(&ds, &registry).unwrap();
        assert!(segmenter.export_workbook(&ds, &run).is_err());
    }
}
