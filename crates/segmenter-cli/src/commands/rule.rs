//! Rule commands - add, remove, list and clear rules in a rule file.

use std::path::PathBuf;

use colored::Colorize;
use segmenter::input::load_dataset;
use segmenter::schema::column_range;
use segmenter::{Rule, RuleRegistry, SegmenterError, Upsert};

use super::parser_config;
use crate::cli::{IncludeSpec, RangeSpec};

pub fn add(
    rules: PathBuf,
    name: String,
    ranges: Vec<RangeSpec>,
    includes: Vec<IncludeSpec>,
    data: Option<PathBuf>,
    delimiter: Option<char>,
) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = match data {
        Some(ref path) => Some(load_dataset(path, &parser_config(delimiter)?)?.0),
        None => None,
    };

    let mut builder = Rule::builder(name);

    for spec in ranges {
        let (min, max) = match (spec.bounds, &dataset) {
            (Some(bounds), _) => bounds,
            (None, Some(ds)) => column_range(ds, &spec.column).ok_or_else(|| {
                format!(
                    "Column '{}' is not a numeric column with values in the data file",
                    spec.column
                )
            })?,
            (None, None) => {
                return Err(format!(
                    "No bounds for '{}'. Use {}=min:max or pass --data to use the observed range.",
                    spec.column, spec.column
                )
                .into());
            }
        };
        builder = builder.range(spec.column, min, max);
    }

    for spec in includes {
        if let Some(ref ds) = dataset {
            if ds.column_index(&spec.column).is_none() {
                eprintln!(
                    "{} column '{}' is not in the data file",
                    "warning:".yellow().bold(),
                    spec.column
                );
            }
        }
        builder = builder.include(spec.column, spec.values);
    }

    let rule = builder.build()?;
    let mut registry = RuleRegistry::load_or_default(&rules)?;

    let criteria = rule.criteria();
    let rule_name = rule.name().to_string();
    let outcome = registry.upsert(rule);
    registry.save(&rules)?;

    let verb = match outcome {
        Upsert::Inserted(_) => "Added",
        Upsert::Replaced(_) => "Replaced",
    };
    println!(
        "{} rule {} at position {}",
        verb.green().bold(),
        rule_name.white().bold(),
        outcome.position() + 1
    );
    for line in criteria {
        println!("  {}", line);
    }

    Ok(())
}

pub fn remove(rules: PathBuf, position: usize) -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = RuleRegistry::load(&rules)?;

    // Positions are shown 1-based; 0 is out of range like any other bad position.
    let index = position.checked_sub(1).unwrap_or(usize::MAX);
    let removed = registry.remove_at(index).map_err(|err| match err {
        SegmenterError::IndexOutOfRange { len, .. } => {
            SegmenterError::IndexOutOfRange { position, len }
        }
        other => other,
    })?;
    registry.save(&rules)?;

    println!(
        "{} rule {}",
        "Removed".green().bold(),
        removed.name().white().bold()
    );
    Ok(())
}

pub fn list(rules: PathBuf, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let registry = RuleRegistry::load_or_default(&rules)?;

    if json_output {
        println!("{}", registry.to_config_string()?);
        return Ok(());
    }

    if registry.is_empty() {
        println!("No rules in {}", rules.display());
        return Ok(());
    }

    for (i, rule) in registry.iter().enumerate() {
        println!("{:>3}. {}", i + 1, rule.name().white().bold());
        for line in rule.criteria() {
            println!("     {}", line);
        }
    }
    Ok(())
}

pub fn clear(rules: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = RuleRegistry::load_or_default(&rules)?;
    let count = registry.len();
    registry.clear();
    registry.save(&rules)?;

    println!("{} {} rules", "Cleared".green().bold(), count);
    Ok(())
}
