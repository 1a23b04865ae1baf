//! Persistence for rule registries - save/load JSON rule files.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Result, SegmenterError};

use super::registry::RuleRegistry;

impl RuleRegistry {
    /// Save the registry as a configuration file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use segmenter::RuleRegistry;
    /// # fn example(registry: &RuleRegistry) -> segmenter::Result<()> {
    /// registry.save("employees.rules.json")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| SegmenterError::io(parent, e))?;
            }
        }

        let file = File::create(path).map_err(|e| SegmenterError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.to_config()?)?;
        writer.flush().map_err(|e| SegmenterError::io(path, e))?;

        info!(path = %path.display(), rules = self.len(), "saved rule configuration");
        Ok(())
    }

    /// Load a registry from a configuration file.
    ///
    /// Unreadable JSON and malformed records are both `InvalidFormat`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| SegmenterError::io(path, e))?;
        let value: serde_json::Value = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| {
                SegmenterError::invalid_format(
                    0,
                    format!("'{}' is not valid JSON: {}", path.display(), e),
                )
            })?;

        let mut registry = RuleRegistry::new();
        registry.replace_all(&value)?;
        info!(path = %path.display(), rules = registry.len(), "loaded rule configuration");
        Ok(registry)
    }

    /// Load a registry, or start an empty one if the file does not exist yet.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }
}

/// Default rule file path for a data file: `<stem>.rules.json` beside it.
///
/// # Example
///
/// ```
/// use segmenter::rule::rules_path;
/// use std::path::Path;
///
/// let path = rules_path(Path::new("data/employees.xlsx"));
/// assert_eq!(path, Path::new("data/employees.rules.json"));
/// ```
pub fn rules_path(data_path: &Path) -> PathBuf {
    let stem = data_path.file_stem().unwrap_or_default().to_string_lossy();
    data_path.with_file_name(format!("{}.rules.json", stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("team.rules.json");

        let mut registry = RuleRegistry::new();
        registry.upsert(Rule::builder("High").range("score", 7.0, 10.0).build().unwrap());
        registry.upsert(Rule::builder("Sales").include("dept", ["Sales"]).build().unwrap());
        registry.save(&path).unwrap();

        let loaded = RuleRegistry::load(&path).unwrap();
        assert_eq!(loaded, registry);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");

        assert!(matches!(
            RuleRegistry::load(&path),
            Err(SegmenterError::Io { .. })
        ));
        assert!(RuleRegistry::load_or_default(&path).unwrap().is_empty());
    }

    #[test]
    fn test_load_garbage_is_invalid_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            RuleRegistry::load(&path),
            Err(SegmenterError::InvalidFormat { .. })
        ));
    }
}
