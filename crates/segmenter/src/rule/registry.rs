//! Ordered collection of rules.

use tracing::debug;

use crate::error::{Result, SegmenterError};

use super::config;
use super::rule::Rule;

/// Outcome of [`RuleRegistry::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// Appended at this position.
    Inserted(usize),
    /// Replaced the rule with the same name at this position.
    Replaced(usize),
}

impl Upsert {
    pub fn position(&self) -> usize {
        match self {
            Upsert::Inserted(p) | Upsert::Replaced(p) => *p,
        }
    }
}

/// Rules in insertion order.
///
/// `upsert` keeps at most one rule per name. Bulk imports may contain
/// duplicate names; those are kept and evaluated independently. The registry
/// has no internal locking: callers sharing one must serialize access.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl RuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rule, or replace the existing rule with the same name in
    /// place. The latest definition wins; nothing is merged.
    pub fn upsert(&mut self, rule: Rule) -> Upsert {
        match self.position_of(rule.name()) {
            Some(position) => {
                debug!(rule = %rule.name(), position, "replacing rule");
                self.rules[position] = rule;
                Upsert::Replaced(position)
            }
            None => {
                debug!(rule = %rule.name(), "appending rule");
                self.rules.push(rule);
                Upsert::Inserted(self.rules.len() - 1)
            }
        }
    }

    /// Remove the rule at `position`, shifting later rules down.
    pub fn remove_at(&mut self, position: usize) -> Result<Rule> {
        if position >= self.rules.len() {
            return Err(SegmenterError::IndexOutOfRange {
                position,
                len: self.rules.len(),
            });
        }
        Ok(self.rules.remove(position))
    }

    /// Replace every rule with the records of a serialized configuration.
    ///
    /// The registry is left untouched when the input is malformed.
    pub fn replace_all(&mut self, records: &serde_json::Value) -> Result<()> {
        let rules = config::decode(records)?;
        self.rules = rules;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Rule> {
        self.rules.get(position)
    }

    /// Position of the first rule with this name.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.rules.iter().position(|r| r.name() == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

impl<'a> IntoIterator for &'a RuleRegistry {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl FromIterator<Rule> for RuleRegistry {
    /// Collect rules through `upsert`, so later duplicates replace earlier ones.
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        let mut registry = RuleRegistry::new();
        for rule in iter {
            registry.upsert(rule);
        }
        registry
    }
}
