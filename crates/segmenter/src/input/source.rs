//! Provenance of a loaded data file.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::dataset::Dataset;

/// Where a dataset came from and what it looked like when loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    pub path: PathBuf,
    /// `sha256:` followed by the hex digest of the raw bytes.
    pub hash: String,
    pub size_bytes: u64,
    /// Reader that produced the dataset: `csv`, `tsv`, `psv`, `xlsx`, ...
    pub format: String,
    pub row_count: usize,
    pub column_count: usize,
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Describe `dataset`, read from `contents` at `path`.
    pub fn describe(path: &Path, contents: &[u8], format: &str, dataset: &Dataset) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(contents);

        Self {
            file: path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            hash: format!("sha256:{:x}", hasher.finalize()),
            size_bytes: contents.len() as u64,
            format: format.to_string(),
            row_count: dataset.row_count(),
            column_count: dataset.column_count(),
            loaded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Value;

    #[test]
    fn test_describe() {
        let dataset = Dataset::new(
            vec!["score".to_string()],
            vec![vec![Value::Number(1.0)], vec![Value::Number(2.0)]],
        )
        .unwrap();
        let meta = SourceMetadata::describe(Path::new("/data/scores.csv"), b"score\n1\n2\n", "csv", &dataset);

        assert_eq!(meta.file, "scores.csv");
        assert_eq!(meta.size_bytes, 10);
        assert_eq!(meta.row_count, 2);
        assert_eq!(meta.column_count, 1);
        assert!(meta.hash.starts_with("sha256:"));
        assert_eq!(meta.hash.len(), "sha256:".len() + 64);
    }
}
