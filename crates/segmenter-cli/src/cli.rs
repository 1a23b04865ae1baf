//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use segmenter::SheetNamePolicy;
use std::path::PathBuf;

/// Segmenter: rule-based dataset segmentation
#[derive(Parser)]
#[command(name = "segmenter")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List numeric and categorical columns of a data file
    Columns {
        /// Path to the data file (CSV/TSV/XLSX)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Field delimiter for delimited files (detected when omitted)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the rules in a rule file
    Rule {
        #[command(subcommand)]
        command: RuleCommands,
    },

    /// Apply rules to a data file and show segment sizes
    Segment {
        /// Path to the data file (CSV/TSV/XLSX)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Rule file (default: <file>.rules.json)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Field delimiter for delimited files (detected when omitted)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Fail on constraints whose column is missing or has the wrong type
        #[arg(long)]
        strict: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export segments as a workbook and optionally a report
    Export {
        /// Path to the data file (CSV/TSV/XLSX)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Rule file (default: <file>.rules.json)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Output path for the workbook (default: <file>.segments.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write an HTML report
        #[arg(long, value_name = "HTML")]
        report: Option<PathBuf>,

        /// Also write a JSON report
        #[arg(long, value_name = "JSON")]
        report_json: Option<PathBuf>,

        /// Field delimiter for delimited files (detected when omitted)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Fail on constraints whose column is missing or has the wrong type
        #[arg(long)]
        strict: bool,

        /// What to do when two rules map to the same sheet name (suffix, fail)
        #[arg(long, default_value = "suffix")]
        on_collision: SheetNamePolicy,
    },
}

#[derive(Subcommand)]
pub enum RuleCommands {
    /// Add a rule, replacing any rule with the same name
    Add {
        /// Path to the rule file (created if missing)
        #[arg(value_name = "RULES")]
        rules: PathBuf,

        /// Rule name
        #[arg(short, long)]
        name: String,

        /// Numeric range: column=min:max, or just column to use the observed range
        #[arg(long = "range", value_name = "COLUMN[=MIN:MAX]")]
        ranges: Vec<RangeSpec>,

        /// Allowed values: column=a,b,c
        #[arg(long = "include", value_name = "COLUMN=VALUES")]
        includes: Vec<IncludeSpec>,

        /// Data file used to fill in observed ranges and check column names
        #[arg(long)]
        data: Option<PathBuf>,

        /// Field delimiter for the data file (detected when omitted)
        #[arg(short, long)]
        delimiter: Option<char>,
    },

    /// Remove the rule at a position (as shown by `rule list`)
    Remove {
        /// Path to the rule file
        #[arg(value_name = "RULES")]
        rules: PathBuf,

        /// 1-based position
        #[arg(value_name = "POSITION")]
        position: usize,
    },

    /// List the rules in a rule file
    List {
        /// Path to the rule file
        #[arg(value_name = "RULES")]
        rules: PathBuf,

        /// Output the rule configuration as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove every rule
    Clear {
        /// Path to the rule file
        #[arg(value_name = "RULES")]
        rules: PathBuf,
    },
}

/// `--range` argument: a column and optional inclusive bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeSpec {
    pub column: String,
    pub bounds: Option<(f64, f64)>,
}

impl std::str::FromStr for RangeSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, bounds) = match s.split_once('=') {
            None => (s, None),
            Some((column, range)) => {
                let (min, max) = range
                    .split_once(':')
                    .ok_or_else(|| format!("Invalid range '{}'. Use column=min:max.", s))?;
                let min = parse_bound(min)
                    .ok_or_else(|| format!("Invalid minimum '{}' in '{}'", min, s))?;
                let max = parse_bound(max)
                    .ok_or_else(|| format!("Invalid maximum '{}' in '{}'", max, s))?;
                (column, Some((min, max)))
            }
        };

        let column = column.trim();
        if column.is_empty() {
            return Err(format!("Missing column name in '{}'", s));
        }

        Ok(RangeSpec {
            column: column.to_string(),
            bounds,
        })
    }
}

// Rule files store bounds as JSON numbers, so inf and NaN are refused.
fn parse_bound(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `--include` argument: a column and its allowed values.
#[derive(Clone, Debug, PartialEq)]
pub struct IncludeSpec {
    pub column: String,
    pub values: Vec<String>,
}

impl std::str::FromStr for IncludeSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, values) = s
            .split_once('=')
            .ok_or_else(|| format!("Invalid include '{}'. Use column=a,b,c.", s))?;

        let column = column.trim();
        if column.is_empty() {
            return Err(format!("Missing column name in '{}'", s));
        }

        let values: Vec<String> = values
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
            .collect();
        if values.is_empty() {
            return Err(format!("No values given for column '{}'", column));
        }

        Ok(IncludeSpec {
            column: column.to_string(),
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_spec() {
        let spec: RangeSpec = "score=-1.5:10".parse().unwrap();
        assert_eq!(spec.column, "score");
        assert_eq!(spec.bounds, Some((-1.5, 10.0)));

        let spec: RangeSpec = "age".parse().unwrap();
        assert_eq!(spec.bounds, None);

        assert!("score=1".parse::<RangeSpec>().is_err());
        assert!("score=a:b".parse::<RangeSpec>().is_err());
        assert!("=1:2".parse::<RangeSpec>().is_err());
        assert!("score=0:inf".parse::<RangeSpec>().is_err());
        assert!("score=-infinity:1".parse::<RangeSpec>().is_err());
        assert!("score=NaN:1".parse::<RangeSpec>().is_err());
    }

    #[test]
    fn test_include_spec() {
        let spec: IncludeSpec = "dept=Sales, Ops".parse().unwrap();
        assert_eq!(spec.column, "dept");
        assert_eq!(spec.values, vec!["Sales", "Ops"]);

        assert!("dept".parse::<IncludeSpec>().is_err());
        assert!("dept=,".parse::<IncludeSpec>().is_err());
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
