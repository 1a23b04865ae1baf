//! CLI command implementations.

pub mod columns;
pub mod export;
pub mod rule;
pub mod segment;

use std::path::{Path, PathBuf};

use segmenter::rule::rules_path;
use segmenter::ParserConfig;

/// Parser configuration for a `--delimiter` flag.
pub(crate) fn parser_config(delimiter: Option<char>) -> Result<ParserConfig, Box<dyn std::error::Error>> {
    match delimiter {
        None => Ok(ParserConfig::default()),
        Some(c) if c.is_ascii() => Ok(ParserConfig::default().with_delimiter(c as u8)),
        Some(c) => Err(format!("Delimiter must be a single ASCII character, got '{}'", c).into()),
    }
}

/// The rule file to use for a data file: the explicit one, or `<stem>.rules.json`.
pub(crate) fn resolve_rules(file: &Path, rules: Option<PathBuf>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = rules.unwrap_or_else(|| rules_path(file));
    if !path.exists() {
        return Err(format!(
            "Rule file not found: {}\nRun 'segmenter rule add {} --name ...' first.",
            path.display(),
            path.display()
        )
        .into());
    }
    Ok(path)
}
