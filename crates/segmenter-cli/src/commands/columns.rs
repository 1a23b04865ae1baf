//! Columns command - show how each column can be constrained.

use std::path::PathBuf;

use colored::Colorize;
use segmenter::input::load_dataset;
use segmenter::schema::{distinct_values, profile};

use super::parser_config;

/// Distinct values shown per categorical column.
const SAMPLE_VALUES: usize = 5;

pub fn run(
    file: PathBuf,
    delimiter: Option<char>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let (dataset, source) = load_dataset(&file, &parser_config(delimiter)?)?;
    let profiles = profile(&dataset);

    if json_output {
        let output = serde_json::json!({
            "file": source.file,
            "rows": dataset.row_count(),
            "columns": profiles,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {} ({} rows, {} columns)",
        "Columns of".cyan().bold(),
        source.file.white(),
        dataset.row_count(),
        dataset.column_count()
    );
    println!();

    println!("{}", "Numeric:".yellow().bold());
    let mut any = false;
    for p in profiles.iter().filter(|p| p.column_type.is_numeric()) {
        any = true;
        let range = match p.range {
            Some((min, max)) => format!("[{}, {}]", min, max),
            None => "no values".to_string(),
        };
        println!("  {:24} {}", p.name, range.white());
    }
    if !any {
        println!("  {}", "(none)".dimmed());
    }
    println!();

    println!("{}", "Categorical:".yellow().bold());
    let mut any = false;
    for p in profiles.iter().filter(|p| !p.column_type.is_numeric()) {
        any = true;
        let values = distinct_values(&dataset, &p.name);
        let mut sample = values
            .iter()
            .take(SAMPLE_VALUES)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        if values.len() > SAMPLE_VALUES {
            sample.push_str(", ...");
        }
        println!(
            "  {:24} {} distinct  {}",
            p.name,
            p.distinct_count.to_string().white(),
            sample.dimmed()
        );
    }
    if !any {
        println!("  {}", "(none)".dimmed());
    }

    Ok(())
}
