//! Serialized rule configuration.
//!
//! A configuration is a JSON array of records:
//!
//! ```text
//! [
//!   {
//!     "kategori": "Senior",
//!     "filtreler": {
//!       "sayisal":   { "tenure": [5, 40] },
//!       "kategorik": { "dept": ["Sales", "Eng"] }
//!     }
//!   }
//! ]
//! ```
//!
//! `kategori` is the rule name; `sayisal` holds inclusive numeric ranges and
//! `kategorik` allowed value lists. At least one of the two filter maps must
//! be present, though either may be empty.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SegmenterError};

use super::constraint::{CategoricalConstraint, NumericConstraint};
use super::registry::RuleRegistry;
use super::rule::Rule;

const NAME_KEY: &str = "kategori";
const FILTERS_KEY: &str = "filtreler";
const NUMERIC_KEY: &str = "sayisal";
const CATEGORICAL_KEY: &str = "kategorik";

/// One serialized rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleRecord {
    #[serde(rename = "kategori")]
    pub name: String,
    #[serde(rename = "filtreler")]
    pub filters: FilterRecord,
}

/// Filter maps of a serialized rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRecord {
    #[serde(rename = "sayisal", skip_serializing_if = "Option::is_none")]
    pub numeric: Option<IndexMap<String, [f64; 2]>>,
    #[serde(rename = "kategorik", skip_serializing_if = "Option::is_none")]
    pub categorical: Option<IndexMap<String, Vec<String>>>,
}

impl From<&Rule> for RuleRecord {
    fn from(rule: &Rule) -> Self {
        let numeric: IndexMap<String, [f64; 2]> = rule
            .numeric_constraints()
            .map(|c| (c.column.clone(), [c.min, c.max]))
            .collect();
        let categorical: IndexMap<String, Vec<String>> = rule
            .categorical_constraints()
            .map(|c| (c.column.clone(), c.allowed.iter().cloned().collect()))
            .collect();

        // An unconstrained rule still needs one map to stay importable
        let keep_numeric = !numeric.is_empty() || categorical.is_empty();
        let keep_categorical = !categorical.is_empty();

        RuleRecord {
            name: rule.name().to_string(),
            filters: FilterRecord {
                numeric: keep_numeric.then_some(numeric),
                categorical: keep_categorical.then_some(categorical),
            },
        }
    }
}

/// Encode a registry as a configuration value.
pub fn encode(registry: &RuleRegistry) -> Result<Value> {
    let records: Vec<RuleRecord> = registry.iter().map(RuleRecord::from).collect();
    Ok(serde_json::to_value(records)?)
}

/// Decode a configuration value into rules, validating every record.
pub fn decode(value: &Value) -> Result<Vec<Rule>> {
    let records = value.as_array().ok_or_else(|| {
        SegmenterError::invalid_format(0, "top-level value must be an array of rule records")
    })?;

    records
        .iter()
        .enumerate()
        .map(|(index, record)| decode_record(index, record))
        .collect()
}

fn decode_record(index: usize, record: &Value) -> Result<Rule> {
    let fail = |reason: String| SegmenterError::invalid_format(index, reason);

    let object = record
        .as_object()
        .ok_or_else(|| fail("record must be an object".to_string()))?;

    let name = match object.get(NAME_KEY) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::String(_)) => return Err(fail(format!("'{}' must not be empty", NAME_KEY))),
        Some(_) => return Err(fail(format!("'{}' must be a string", NAME_KEY))),
        None => return Err(fail(format!("missing '{}'", NAME_KEY))),
    };

    let filters = match object.get(FILTERS_KEY) {
        Some(Value::Object(map)) => map,
        Some(_) => return Err(fail(format!("'{}' must be an object", FILTERS_KEY))),
        None => return Err(fail(format!("missing '{}'", FILTERS_KEY))),
    };

    let numeric_map = sub_map(filters, NUMERIC_KEY).map_err(&fail)?;
    let categorical_map = sub_map(filters, CATEGORICAL_KEY).map_err(&fail)?;
    if numeric_map.is_none() && categorical_map.is_none() {
        return Err(fail(format!(
            "'{}' needs '{}' or '{}'",
            FILTERS_KEY, NUMERIC_KEY, CATEGORICAL_KEY
        )));
    }

    let mut numeric = IndexMap::new();
    for (column, bounds) in numeric_map.into_iter().flatten() {
        let (min, max) = numeric_bounds(bounds)
            .ok_or_else(|| fail(format!("'{}' range for '{}' must be [min, max]", NUMERIC_KEY, column)))?;
        numeric.insert(column.clone(), NumericConstraint::new(column, min, max));
    }

    let mut categorical = IndexMap::new();
    for (column, values) in categorical_map.into_iter().flatten() {
        let allowed = allowed_values(values).ok_or_else(|| {
            fail(format!(
                "'{}' values for '{}' must be a non-empty list of strings",
                CATEGORICAL_KEY, column
            ))
        })?;
        categorical.insert(column.clone(), CategoricalConstraint::new(column, allowed));
    }

    Rule::from_parts(name, numeric, categorical).map_err(|e| fail(e.to_string()))
}

fn sub_map<'a>(
    filters: &'a Map<String, Value>,
    key: &str,
) -> std::result::Result<Option<&'a Map<String, Value>>, String> {
    match filters.get(key) {
        None => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(format!("'{}' must be an object", key)),
    }
}

fn numeric_bounds(value: &Value) -> Option<(f64, f64)> {
    match value.as_array()?.as_slice() {
        [min, max] => Some((min.as_f64()?, max.as_f64()?)),
        _ => None,
    }
}

fn allowed_values(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    if items.is_empty() {
        return None;
    }
    items
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

impl RuleRegistry {
    /// Encode this registry as a configuration value.
    pub fn to_config(&self) -> Result<Value> {
        encode(self)
    }

    /// Encode this registry as pretty-printed configuration JSON.
    pub fn to_config_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_config()?)?)
    }

    /// Build a registry from configuration JSON text.
    ///
    /// Text that is not valid JSON is reported as `InvalidFormat`.
    pub fn from_config_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| SegmenterError::invalid_format(0, format!("not valid JSON: {}", e)))?;
        let mut registry = RuleRegistry::new();
        registry.replace_all(&value)?;
        Ok(registry)
    }
}
