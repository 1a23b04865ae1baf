//! Named segment rules and their evaluation.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Result, SegmenterError};
use crate::input::{Dataset, Value};

use super::constraint::{CategoricalConstraint, Drift, NumericConstraint};

/// A named conjunction of column constraints.
///
/// Rules are immutable once built; updating a segment means building a new
/// rule with the same name and upserting it into the registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    name: String,
    numeric: IndexMap<String, NumericConstraint>,
    categorical: IndexMap<String, CategoricalConstraint>,
}

impl Rule {
    /// Start building a rule.
    pub fn builder(name: impl Into<String>) -> RuleBuilder {
        RuleBuilder::new(name)
    }

    /// Assemble a rule without requiring constraints. Used when importing
    /// configurations, where empty filter maps are accepted.
    pub(crate) fn from_parts(
        name: String,
        numeric: IndexMap<String, NumericConstraint>,
        categorical: IndexMap<String, CategoricalConstraint>,
    ) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(SegmenterError::InvalidName);
        }
        if let Some(bad) = numeric.values().find(|c| !c.is_finite()) {
            return Err(SegmenterError::NonFiniteBound {
                rule: name,
                column: bad.column.clone(),
            });
        }
        Ok(Self {
            name,
            numeric,
            categorical,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Numeric constraints in insertion order.
    pub fn numeric_constraints(&self) -> impl Iterator<Item = &NumericConstraint> + '_ {
        self.numeric.values()
    }

    /// Categorical constraints in insertion order.
    pub fn categorical_constraints(&self) -> impl Iterator<Item = &CategoricalConstraint> + '_ {
        self.categorical.values()
    }

    pub fn constraint_count(&self) -> usize {
        self.numeric.len() + self.categorical.len()
    }

    /// True when every row matches: no constraints at all.
    pub fn is_unconstrained(&self) -> bool {
        self.constraint_count() == 0
    }

    /// Human-readable criteria, numeric constraints first, each group in
    /// insertion order.
    pub fn criteria(&self) -> Vec<String> {
        self.numeric
            .values()
            .map(NumericConstraint::describe)
            .chain(self.categorical.values().map(CategoricalConstraint::describe))
            .collect()
    }

    /// Evaluate against one row of `dataset`.
    pub fn matches(&self, dataset: &Dataset, row: &[Value]) -> bool {
        self.numeric.values().all(|c| c.matches(dataset, row))
            && self.categorical.values().all(|c| c.matches(dataset, row))
    }

    /// Resolve every constraint against the dataset's columns once, so rows
    /// can be tested without name lookups.
    pub fn bind<'r>(&'r self, dataset: &Dataset) -> BoundRule<'r> {
        let mut checks = Vec::with_capacity(self.constraint_count());
        let mut skipped = Vec::new();

        for constraint in self.numeric.values() {
            match constraint.resolve(dataset) {
                Ok(index) => checks.push(Check::Range { index, constraint }),
                Err(drift) => skipped.push(SkippedConstraint {
                    column: constraint.column.clone(),
                    drift,
                }),
            }
        }

        for constraint in self.categorical.values() {
            match constraint.resolve(dataset) {
                Ok(index) => checks.push(Check::Member { index, constraint }),
                Err(drift) => skipped.push(SkippedConstraint {
                    column: constraint.column.clone(),
                    drift,
                }),
            }
        }

        BoundRule {
            rule: self,
            checks,
            skipped,
        }
    }
}

/// A constraint that could not be bound and is treated as always true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedConstraint {
    pub column: String,
    pub drift: Drift,
}

enum Check<'r> {
    Range {
        index: usize,
        constraint: &'r NumericConstraint,
    },
    Member {
        index: usize,
        constraint: &'r CategoricalConstraint,
    },
}

/// A rule with its constraints resolved to column positions.
pub struct BoundRule<'r> {
    rule: &'r Rule,
    checks: Vec<Check<'r>>,
    skipped: Vec<SkippedConstraint>,
}

impl<'r> BoundRule<'r> {
    pub fn rule(&self) -> &'r Rule {
        self.rule
    }

    /// Constraints dropped because of schema drift.
    pub fn skipped(&self) -> &[SkippedConstraint] {
        &self.skipped
    }

    pub fn matches(&self, row: &[Value]) -> bool {
        self.checks.iter().all(|check| match check {
            Check::Range { index, constraint } => constraint.matches_value(row.get(*index)),
            Check::Member { index, constraint } => constraint.matches_value(row.get(*index)),
        })
    }
}

/// Builder for [`Rule`].
///
/// Adding a second constraint of the same kind for a column replaces the
/// first one.
#[derive(Debug, Clone)]
pub struct RuleBuilder {
    name: String,
    numeric: IndexMap<String, NumericConstraint>,
    categorical: IndexMap<String, CategoricalConstraint>,
}

impl RuleBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            numeric: IndexMap::new(),
            categorical: IndexMap::new(),
        }
    }

    /// Add an inclusive range constraint.
    pub fn range(mut self, column: impl Into<String>, min: f64, max: f64) -> Self {
        let column = column.into();
        self.numeric
            .insert(column.clone(), NumericConstraint::new(column, min, max));
        self
    }

    pub fn numeric(mut self, constraint: NumericConstraint) -> Self {
        self.numeric.insert(constraint.column.clone(), constraint);
        self
    }

    /// Add a set-membership constraint. An empty value list adds nothing.
    pub fn include<S: Into<String>>(
        self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        self.categorical(CategoricalConstraint::new(column, values))
    }

    pub fn categorical(mut self, constraint: CategoricalConstraint) -> Self {
        if !constraint.allowed.is_empty() {
            self.categorical.insert(constraint.column.clone(), constraint);
        }
        self
    }

    /// Finish the rule.
    ///
    /// Fails with `InvalidName` for a blank name, `EmptyRule` when no
    /// constraint was added and `NonFiniteBound` for an infinite or NaN
    /// range bound.
    pub fn build(self) -> Result<Rule> {
        if self.name.trim().is_empty() {
            return Err(SegmenterError::InvalidName);
        }
        if self.numeric.is_empty() && self.categorical.is_empty() {
            return Err(SegmenterError::EmptyRule(self.name));
        }
        Rule::from_parts(self.name, self.numeric, self.categorical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::new(
            vec!["score".to_string(), "dept".to_string()],
            vec![
                vec![Value::Number(7.0), Value::from("Sales")],
                vec![Value::Number(7.0), Value::from("HR")],
                vec![Value::Number(2.0), Value::from("Sales")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_build_rejects_empty_rule() {
        let err = Rule::builder("Nothing").build().unwrap_err();
        assert!(matches!(err, SegmenterError::EmptyRule(name) if name == "Nothing"));
    }

    #[test]
    fn test_build_rejects_blank_name() {
        let err = Rule::builder("  ").range("score", 0.0, 1.0).build().unwrap_err();
        assert!(matches!(err, SegmenterError::InvalidName));
    }

    #[test]
    fn test_build_rejects_non_finite_bounds() {
        for (min, max) in [(0.0, f64::INFINITY), (f64::NEG_INFINITY, 1.0), (f64::NAN, 1.0)] {
            let err = Rule::builder("Open")
                .range("score", min, max)
                .build()
                .unwrap_err();
            assert!(matches!(
                err,
                SegmenterError::NonFiniteBound { ref rule, ref column } if rule == "Open" && column == "score"
            ));
        }

        let err = Rule::builder("Open")
            .numeric(NumericConstraint::new("age", 0.0, f64::INFINITY))
            .build()
            .unwrap_err();
        assert!(matches!(err, SegmenterError::NonFiniteBound { .. }));
    }

    #[test]
    fn test_empty_include_adds_nothing() {
        let err = Rule::builder("r")
            .include("dept", Vec::<String>::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, SegmenterError::EmptyRule(_)));
    }

    #[test]
    fn test_conjunction_across_columns() {
        let ds = dataset();
        let rule = Rule::builder("HighSales")
            .range("score", 5.0, 10.0)
            .include("dept", ["Sales"])
            .build()
            .unwrap();

        let matched: Vec<bool> = ds.rows().iter().map(|r| rule.matches(&ds, r)).collect();
        assert_eq!(matched, vec![true, false, false]);
    }

    #[test]
    fn test_bound_rule_agrees_with_matches() {
        let ds = dataset();
        let rule = Rule::builder("r")
            .range("score", 5.0, 10.0)
            .include("dept", ["HR"])
            .range("ghost", 0.0, 1.0)
            .build()
            .unwrap();
        let bound = rule.bind(&ds);

        assert_eq!(bound.skipped().len(), 1);
        assert_eq!(bound.skipped()[0].column, "ghost");
        for row in ds.rows() {
            assert_eq!(bound.matches(row), rule.matches(&ds, row));
        }
    }

    #[test]
    fn test_same_column_replaces_constraint() {
        let rule = Rule::builder("r")
            .range("score", 0.0, 1.0)
            .range("score", 5.0, 6.0)
            .build()
            .unwrap();
        assert_eq!(rule.constraint_count(), 1);
        assert_eq!(rule.criteria(), vec!["score: [5, 6]"]);
    }

    #[test]
    fn test_criteria_order() {
        let rule = Rule::builder("r")
            .include("dept", ["Sales", "Eng"])
            .range("tenure", 1.0, 3.0)
            .range("age", 30.0, 40.0)
            .build()
            .unwrap();
        assert_eq!(
            rule.criteria(),
            vec!["tenure: [1, 3]", "age: [30, 40]", "dept: Sales, Eng"]
        );
    }

    #[test]
    fn test_unconstrained_rule_matches_everything() {
        let ds = dataset();
        let rule = Rule::from_parts("all".into(), IndexMap::new(), IndexMap::new()).unwrap();
        assert!(rule.is_unconstrained());
        assert!(ds.rows().iter().all(|r| rule.matches(&ds, r)));
        assert!(ds.rows().iter().all(|r| rule.bind(&ds).matches(r)));
    }
}
