use crate::error::{IndexerError, Result};
use crate::limits::resolve_concurrency;
use crate::scanner::ScanOptions;
use coderag_chunker::ChunkerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a directory batch run.
///
/// ```toml
/// concurrency = 8
///
/// [scan]
/// respect_gitignore = true
///
/// [chunker]
/// max_block_fragments = 5
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Worker threads; `None` defers to `CODERAG_CONCURRENCY` or the CPU count
    pub concurrency: Option<usize>,
    pub scan: ScanOptions,
    pub chunker: ChunkerConfig,
}

impl BatchConfig {
    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| IndexerError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == Some(0) {
            return Err(IndexerError::InvalidConfig(
                "concurrency must be > 0".to_string(),
            ));
        }
        self.chunker.validate().map_err(IndexerError::InvalidConfig)
    }

    /// Worker count this configuration resolves to
    pub fn worker_count(&self) -> usize {
        resolve_concurrency(self.concurrency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        let config = BatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.concurrency, None);
        assert!(config.scan.include_hidden);
        assert!(!config.scan.respect_gitignore);
        assert!(config.worker_count() >= 1);
    }

    #[test]
    fn parses_nested_tables() {
        let config = BatchConfig::from_toml_str(
            "concurrency = 3\n\n[scan]\nrespect_gitignore = true\n\n[chunker]\nmax_block_fragments = 8\n",
        )
        .unwrap();

        assert_eq!(config.concurrency, Some(3));
        assert_eq!(config.worker_count(), 3);
        assert!(config.scan.respect_gitignore);
        assert_eq!(config.scan.max_file_size_bytes, ScanOptions::default().max_file_size_bytes);
        assert_eq!(config.chunker.max_block_fragments, 8);
        assert_eq!(config.chunker.block_name_chars, 30);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            BatchConfig::from_toml_str("concurrency = 0\n"),
            Err(IndexerError::InvalidConfig(_))
        ));
        assert!(matches!(
            BatchConfig::from_toml_str("[chunker]\nsupported_languages = [\"cobol\"]\n"),
            Err(IndexerError::InvalidConfig(_))
        ));
        assert!(BatchConfig::from_toml_str("concurrency = \"lots\"\n").is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coderag.toml");
        std::fs::write(&path, "[scan]\ninclude_hidden = false\n").unwrap();

        let config = BatchConfig::from_file(&path).unwrap();
        assert!(!config.scan.include_hidden);
        assert!(matches!(
            BatchConfig::from_file(dir.path().join("missing.toml")),
            Err(IndexerError::IoError(_))
        ));
    }
}
