//! CSV/TSV parser with delimiter detection.

use std::path::Path;

use tracing::debug;

use crate::error::{Result, SegmenterError};
use super::dataset::Dataset;
use super::source::SourceMetadata;

/// Delimiters tried by auto-detection. Later entries win ties.
const CANDIDATES: &[u8] = &[b'|', b';', b',', b'\t'];

/// Non-blank lines sampled by auto-detection.
const SAMPLE_LINES: usize = 10;

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_rows: None,
            quote: b'"',
        }
    }
}

impl ParserConfig {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }
}

/// Parses delimited text files into datasets.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the dataset and metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        let path = path.as_ref();

        let contents = std::fs::read(path).map_err(|e| SegmenterError::io(path, e))?;
        let delimiter = self.delimiter_for(&contents)?;
        let shown = (delimiter as char).escape_default().to_string();
        debug!(path = %path.display(), delimiter = %shown, "parsing delimited file");

        let dataset = self.parse_bytes(&contents, delimiter)?;
        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        };
        let metadata = SourceMetadata::describe(path, &contents, format, &dataset);

        Ok((dataset, metadata))
    }

    /// Parse in-memory text, detecting the delimiter unless configured.
    pub fn parse_str(&self, text: &str) -> Result<Dataset> {
        let bytes = text.as_bytes();
        self.parse_bytes(bytes, self.delimiter_for(bytes)?)
    }

    fn delimiter_for(&self, bytes: &[u8]) -> Result<u8> {
        match self.config.delimiter {
            Some(d) => Ok(d),
            None => detect_delimiter(bytes, self.config.quote),
        }
    }

    /// A header without data rows yields an empty dataset.
    fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|s| s.trim().to_string())
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(SegmenterError::EmptyData("No columns found".to_string()));
        }

        let limit = self.config.max_rows.unwrap_or(usize::MAX);
        let rows = reader
            .records()
            .take(limit)
            .map(|record| -> Result<Vec<String>> {
                Ok(record?.iter().map(str::to_string).collect())
            })
            .collect::<Result<Vec<_>>>()?;

        // Dataset::new pads and truncates rows to the header width
        Dataset::from_text(headers, rows)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the candidate that splits the sampled lines most consistently,
/// then into the most fields.
fn detect_delimiter(bytes: &[u8], quote: u8) -> Result<u8> {
    let sample: Vec<String> = bytes
        .split(|&b| b == b'\n')
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .filter(|line| !line.trim().is_empty())
        .take(SAMPLE_LINES)
        .collect();
    if sample.is_empty() {
        return Err(SegmenterError::EmptyData("No lines to analyze".to_string()));
    }

    let best = CANDIDATES
        .iter()
        .filter_map(|&delimiter| {
            let counts: Vec<usize> = sample
                .iter()
                .map(|line| unquoted_count(line, delimiter, quote))
                .collect();
            let header = counts[0];
            if header == 0 {
                return None;
            }
            let agreeing = counts.iter().filter(|&&c| c == header).count();
            Some(((agreeing, header), delimiter))
        })
        .max_by_key(|(score, _)| *score);

    Ok(best.map_or(b',', |(_, delimiter)| delimiter))
}

/// Occurrences of `delimiter` outside quoted sections.
fn unquoted_count(line: &str, delimiter: u8, quote: u8) -> usize {
    let (delimiter, quote) = (delimiter as char, quote as char);
    line.chars()
        .scan(false, |quoted, c| {
            if c == quote {
                *quoted = !*quoted;
            }
            Some(!*quoted && c == delimiter)
        })
        .filter(|&hit| hit)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Value;
    use crate::schema::ColumnType;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data, b'"').unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data, b'"').unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_semicolon() {
        let data = b"a;b\n1,5;2\n3,5;4";
        assert_eq!(detect_delimiter(data, b'"').unwrap(), b';');
    }

    #[test]
    fn test_parse_csv() {
        let parser = Parser::new();
        let dataset = parser.parse_str("name,age,city\nAlice,30,NYC\nBob,25,LA").unwrap();

        assert_eq!(dataset.column_names(), vec!["name", "age", "city"]);
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.get(0, 0), Some(&Value::from("Alice")));
        assert_eq!(dataset.get(1, 1), Some(&Value::Number(25.0)));
        assert_eq!(dataset.columns()[1].column_type, ColumnType::Numeric);
    }

    #[test]
    fn test_parse_header_only() {
        let parser = Parser::with_config(ParserConfig::default().with_delimiter(b','));
        let dataset = parser.parse_str("score,dept\n").unwrap();

        assert_eq!(dataset.column_count(), 2);
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_parse_max_rows() {
        let parser = Parser::with_config(ParserConfig::default().with_max_rows(1));
        let dataset = parser.parse_str("a,b\n1,2\n3,4\n").unwrap();
        assert_eq!(dataset.row_count(), 1);
    }

    #[test]
    fn test_detect_delimiter_ignores_quoted() {
        let data = b"name;note\n\"a,b,c\";x\n\"d,e\";y";
        assert_eq!(detect_delimiter(data, b'"').unwrap(), b';');
        assert_eq!(unquoted_count("\"a,b\",c", b',', b'"'), 1);
    }

    #[test]
    fn test_detect_delimiter_empty() {
        assert!(matches!(
            detect_delimiter(b"\n  \n", b'"'),
            Err(SegmenterError::EmptyData(_))
        ));
    }
}
