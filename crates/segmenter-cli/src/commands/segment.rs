//! Segment command - apply rules to a data file and show segment sizes.

use std::path::PathBuf;

use colored::Colorize;
use segmenter::{EngineConfig, RuleRegistry, Segmenter, SegmenterConfig};

use super::{parser_config, resolve_rules};

pub fn run(
    file: PathBuf,
    rules: Option<PathBuf>,
    delimiter: Option<char>,
    strict: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }
    let rules_path = resolve_rules(&file, rules)?;
    let registry = RuleRegistry::load(&rules_path)?;

    let config = SegmenterConfig::default()
        .with_parser(parser_config(delimiter)?)
        .with_engine(EngineConfig { strict });
    let outcome = Segmenter::with_config(config).run(&file, &registry)?;
    let report = &outcome.report;

    if json_output {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!(
        "{} {} with {}",
        "Segmenting".cyan().bold(),
        outcome.source.file.white(),
        rules_path.display().to_string().white()
    );
    println!();

    if report.segments.is_empty() {
        println!("No rules defined.");
        return Ok(());
    }

    let width = report
        .segments
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(7);

    println!(
        "{:width$}  {:>8}  {:>7}",
        "Segment".bold(),
        "Rows".bold(),
        "Share".bold(),
        width = width
    );
    for segment in &report.segments {
        println!(
            "{:width$}  {:>8}  {:>6.1}%",
            segment.name,
            segment.row_count,
            segment.percentage,
            width = width
        );
    }
    println!();

    println!(
        "Total rows: {}   Rules: {}   Rows across segments: {}",
        report.total_rows.to_string().white().bold(),
        report.rule_count,
        report.segment_count_sum
    );
    if report.segment_count_sum > report.total_rows {
        println!("{}", "Segments overlap.".dimmed());
    }

    Ok(())
}
