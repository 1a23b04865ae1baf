//! Segment rules: constraints, rules, the rule registry and its
//! serialized configuration.
//!
//! # Usage
//!
//! ```
//! use segmenter::rule::{Rule, RuleRegistry, Upsert};
//!
//! let mut registry = RuleRegistry::new();
//! let high = Rule::builder("High").range("score", 7.0, 10.0).build().unwrap();
//! assert_eq!(registry.upsert(high), Upsert::Inserted(0));
//!
//! // Same name: replaced in place
//! let high = Rule::builder("High").range("score", 8.0, 10.0).build().unwrap();
//! assert_eq!(registry.upsert(high), Upsert::Replaced(0));
//! ```

mod config;
mod constraint;
mod persistence;
mod registry;
#[allow(clippy::module_inception)]
mod rule;

pub use config::{decode, encode, FilterRecord, RuleRecord};
pub use constraint::{CategoricalConstraint, Drift, NumericConstraint};
pub use persistence::rules_path;
pub use registry::{RuleRegistry, Upsert};
pub use rule::{BoundRule, Rule, RuleBuilder, SkippedConstraint};
