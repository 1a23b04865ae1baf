//! Worksheet naming for the tabular export.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SegmenterError};

/// Longest worksheet name written by the exporter.
pub const MAX_SHEET_NAME_LEN: usize = 30;

/// Name used when sanitizing leaves nothing behind.
const FALLBACK_SHEET_NAME: &str = "Segment";

// Characters spreadsheet applications reject in sheet names.
static ILLEGAL_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[:/\\?*\[\]]").unwrap());

/// What to do when two rules map to the same worksheet name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetNamePolicy {
    /// Append ` (2)`, ` (3)`, ... to later collisions.
    #[default]
    Suffix,
    /// Return `DuplicateSheetName` on the first collision.
    Fail,
}

impl fmt::Display for SheetNamePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetNamePolicy::Suffix => write!(f, "suffix"),
            SheetNamePolicy::Fail => write!(f, "fail"),
        }
    }
}

impl FromStr for SheetNamePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "suffix" => Ok(SheetNamePolicy::Suffix),
            "fail" => Ok(SheetNamePolicy::Fail),
            other => Err(format!("unknown sheet name policy '{}' (expected suffix or fail)", other)),
        }
    }
}

/// Turn a rule name into a legal worksheet name.
///
/// ```
/// use segmenter::export::sanitize_sheet_name;
///
/// assert_eq!(sanitize_sheet_name("Q1/Q2: [draft]"), "Q1Q2 draft");
/// assert_eq!(sanitize_sheet_name("???"), "Segment");
/// ```
pub fn sanitize_sheet_name(name: &str) -> String {
    let stripped = ILLEGAL_CHARS.replace_all(name, "");
    let truncated = truncate(trim_edges(&stripped), MAX_SHEET_NAME_LEN);
    let name = trim_edges(&truncated);

    if name.is_empty() {
        FALLBACK_SHEET_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// Assign a unique worksheet name to each rule, in order.
///
/// `reserved` is the name of the full-data sheet; no rule may take it.
/// Names are compared case-insensitively.
pub fn assign_sheet_names<'a>(
    rule_names: impl IntoIterator<Item = &'a str>,
    reserved: &str,
    policy: SheetNamePolicy,
) -> Result<Vec<String>> {
    let mut taken: HashSet<String> = HashSet::new();
    taken.insert(reserved.to_lowercase());

    let mut assigned = Vec::new();
    for rule in rule_names {
        let base = sanitize_sheet_name(rule);

        let name = if !taken.contains(&base.to_lowercase()) {
            base
        } else {
            match policy {
                SheetNamePolicy::Fail => {
                    return Err(SegmenterError::DuplicateSheetName {
                        rule: rule.to_string(),
                        sheet: base,
                    });
                }
                SheetNamePolicy::Suffix => with_free_suffix(&base, &taken),
            }
        };

        taken.insert(name.to_lowercase());
        assigned.push(name);
    }

    Ok(assigned)
}

fn with_free_suffix(base: &str, taken: &HashSet<String>) -> String {
    (2usize..)
        .map(|n| {
            let suffix = format!(" ({})", n);
            let room = MAX_SHEET_NAME_LEN.saturating_sub(suffix.chars().count());
            let stem = truncate(base, room);
            format!("{}{}", stem.trim_end(), suffix)
        })
        .find(|candidate| !taken.contains(&candidate.to_lowercase()))
        .unwrap_or_else(|| base.to_string())
}

// Sheet names may not start or end with an apostrophe.
fn trim_edges(s: &str) -> &str {
    s.trim_matches(|c: char| c == '\'' || c.is_whitespace())
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect::<String>().trim_end().to_string()
}
