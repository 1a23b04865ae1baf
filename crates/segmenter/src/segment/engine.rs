//! Segmentation engine that applies a rule registry to a dataset.

use tracing::{debug, info, warn};

use crate::error::{Result, SegmenterError};
use crate::input::Dataset;
use crate::rule::{Rule, RuleRegistry};

use super::result::{percentage, SegmentResult, SegmentationRun};

/// Engine configuration.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Fail on constraints whose column is missing or has the wrong type,
    /// instead of skipping them.
    pub strict: bool,
}

impl EngineConfig {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Applies rules to datasets.
///
/// Every call rescans the whole dataset for every rule; nothing is cached
/// between runs, so results always reflect the current rule definitions.
pub struct SegmentationEngine {
    config: EngineConfig,
}

impl SegmentationEngine {
    /// Create an engine with lenient schema-drift handling.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Produce one segment per rule, in registry order.
    ///
    /// Rules sharing a name are evaluated independently. In lenient mode
    /// this never fails.
    pub fn segment(&self, dataset: &Dataset, registry: &RuleRegistry) -> Result<SegmentationRun> {
        let total_rows = dataset.row_count();
        info!(rules = registry.len(), rows = total_rows, strict = self.config.strict, "segmenting dataset");

        let results = registry
            .iter()
            .map(|rule| self.segment_rule(dataset, rule))
            .collect::<Result<Vec<_>>>()?;

        Ok(SegmentationRun {
            total_rows,
            results,
        })
    }

    /// Evaluate a single rule.
    pub fn segment_rule(&self, dataset: &Dataset, rule: &Rule) -> Result<SegmentResult> {
        let bound = rule.bind(dataset);

        for skipped in bound.skipped() {
            if self.config.strict {
                return Err(SegmenterError::SchemaDrift {
                    rule: rule.name().to_string(),
                    column: skipped.column.clone(),
                    reason: skipped.drift.to_string(),
                });
            }
            warn!(rule = %rule.name(), column = %skipped.column, reason = %skipped.drift, "skipping constraint");
        }

        let row_indices: Vec<usize> = dataset
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| bound.matches(row))
            .map(|(i, _)| i)
            .collect();

        let row_count = row_indices.len();
        let percentage = percentage(row_count, dataset.row_count());
        debug!(rule = %rule.name(), rows = row_count, percentage, "rule evaluated");

        Ok(SegmentResult {
            rule_name: rule.name().to_string(),
            row_count,
            percentage,
            subset: dataset.select_rows(&row_indices),
            row_indices,
            rule: rule.clone(),
        })
    }
}

impl Default for SegmentationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Value;

    fn scores() -> Dataset {
        Dataset::new(
            vec!["score".to_string(), "dept".to_string()],
            (1..=10)
                .map(|i| {
                    let dept = if i % 2 == 0 { "Sales" } else { "Eng" };
                    vec![Value::Number(i as f64), Value::from(dept)]
                })
                .collect(),
        )
        .unwrap()
    }

    fn registry(rules: Vec<Rule>) -> RuleRegistry {
        rules.into_iter().collect()
    }

    #[test]
    fn test_high_scores() {
        let ds = scores();
        let reg = registry(vec![Rule::builder("High").range("score", 7.0, 10.0).build().unwrap()]);

        let run = SegmentationEngine::new().segment(&ds, &reg).unwrap();
        let high = &run.results[0];

        assert_eq!(high.row_count, 4);
        assert_eq!(high.percentage, 40.0);
        assert_eq!(high.row_indices, vec![6, 7, 8, 9]);
        assert_eq!(high.subset.row_count(), 4);
        assert_eq!(high.subset.column_names(), ds.column_names());
    }

    #[test]
    fn test_results_follow_registry_order() {
        let ds = scores();
        let reg = registry(vec![
            Rule::builder("B").range("score", 5.0, 10.0).build().unwrap(),
            Rule::builder("A").range("score", 1.0, 5.0).build().unwrap(),
        ]);

        let run = SegmentationEngine::new().segment(&ds, &reg).unwrap();
        let names: Vec<&str> = run.results.iter().map(|r| r.rule_name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(run.segment_count_sum(), 11);
    }

    #[test]
    fn test_empty_dataset_has_zero_percentage() {
        let ds = Dataset::new(vec!["score".to_string()], Vec::new()).unwrap();
        let reg = registry(vec![Rule::builder("Any").range("score", 0.0, 1.0).build().unwrap()]);

        let run = SegmentationEngine::new().segment(&ds, &reg).unwrap();
        assert_eq!(run.total_rows, 0);
        assert_eq!(run.results[0].row_count, 0);
        assert_eq!(run.results[0].percentage, 0.0);
    }

    #[test]
    fn test_lenient_mode_skips_drifted_constraints() {
        let ds = scores();
        let reg = registry(vec![
            Rule::builder("Drifted")
                .range("dept", 0.0, 1.0)
                .include("region", ["EU"])
                .range("score", 1.0, 2.0)
                .build()
                .unwrap(),
        ]);

        let run = SegmentationEngine::new().segment(&ds, &reg).unwrap();
        assert_eq!(run.results[0].row_count, 2);
    }

    #[test]
    fn test_strict_mode_reports_drift() {
        let ds = scores();
        let reg = registry(vec![Rule::builder("Drifted").range("dept", 0.0, 1.0).build().unwrap()]);

        let err = SegmentationEngine::with_config(EngineConfig::strict())
            .segment(&ds, &reg)
            .unwrap_err();
        match err {
            SegmenterError::SchemaDrift { rule, column, .. } => {
                assert_eq!(rule, "Drifted");
                assert_eq!(column, "dept");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_range_on_all_null_column_matches_nothing() {
        let ds = Dataset::new(
            vec!["score".to_string(), "bonus".to_string()],
            vec![
                vec![Value::Number(1.0), Value::Null],
                vec![Value::Number(2.0), Value::Null],
            ],
        )
        .unwrap();
        let reg = registry(vec![Rule::builder("Bonus").range("bonus", 0.0, 100.0).build().unwrap()]);

        let run = SegmentationEngine::with_config(EngineConfig::strict())
            .segment(&ds, &reg)
            .unwrap();
        assert_eq!(run.results[0].row_count, 0);
        assert_eq!(run.results[0].percentage, 0.0);
    }

    #[test]
    fn test_results_reflect_current_definitions() {
        let ds = scores();
        let engine = SegmentationEngine::new();
        let mut reg = registry(vec![Rule::builder("R").range("score", 1.0, 3.0).build().unwrap()]);
        assert_eq!(engine.segment(&ds, &reg).unwrap().results[0].row_count, 3);

        reg.upsert(Rule::builder("R").range("score", 1.0, 8.0).build().unwrap());
        assert_eq!(engine.segment(&ds, &reg).unwrap().results[0].row_count, 8);
    }
}
