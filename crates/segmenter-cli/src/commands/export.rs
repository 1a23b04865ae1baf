//! Export command - write the segmented workbook and reports.

use std::path::PathBuf;

use colored::Colorize;
use segmenter::{EngineConfig, ExportConfig, RuleRegistry, Segmenter, SegmenterConfig, SheetNamePolicy};

use super::{parser_config, resolve_rules};

/// Arguments of the export command.
pub struct ExportArgs {
    pub file: PathBuf,
    pub rules: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub report_json: Option<PathBuf>,
    pub delimiter: Option<char>,
    pub strict: bool,
    pub on_collision: SheetNamePolicy,
}

pub fn run(args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !args.file.exists() {
        return Err(format!("File not found: {}", args.file.display()).into());
    }
    let rules_path = resolve_rules(&args.file, args.rules)?;
    let registry = RuleRegistry::load(&rules_path)?;

    let config = SegmenterConfig::default()
        .with_parser(parser_config(args.delimiter)?)
        .with_engine(EngineConfig {
            strict: args.strict,
        })
        .with_export(ExportConfig::default().with_sheet_name_policy(args.on_collision));
    let segmenter = Segmenter::with_config(config);

    let outcome = segmenter.run(&args.file, &registry)?;

    let output = args.output.unwrap_or_else(|| {
        let mut p = args.file.clone();
        let stem = p.file_stem().unwrap_or_default().to_string_lossy();
        p.set_file_name(format!("{}.segments.xlsx", stem));
        p
    });
    segmenter.save_workbook(&outcome.dataset, &outcome.run, &output)?;

    println!(
        "{} {} ({} segments)",
        "Saved workbook to".green().bold(),
        output.display().to_string().white(),
        outcome.run.len()
    );

    if let Some(path) = args.report {
        outcome.report.save_html(&path)?;
        println!(
            "{} {}",
            "Saved report to".green().bold(),
            path.display().to_string().white()
        );
    }

    if let Some(path) = args.report_json {
        outcome.report.save_json(&path)?;
        println!(
            "{} {}",
            "Saved JSON report to".green().bold(),
            path.display().to_string().white()
        );
    }

    Ok(())
}
