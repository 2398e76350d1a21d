use crate::error::{ChunkerError, Result};
use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for code chunking behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Maximum assignment/expression fragments grouped into one logical block
    /// when no control-flow statement anchors it
    pub max_block_fragments: usize,

    /// Characters of the first line used to name an unanchored logical block
    pub block_name_chars: usize,

    /// Emit one whole-file standalone chunk when nothing else was recognized
    pub standalone_fallback: bool,

    /// Languages to support (empty = all supported languages)
    pub supported_languages: Vec<String>,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_block_fragments: 5,
            block_name_chars: 30,
            standalone_fallback: true,
            supported_languages: vec![],
        }
    }
}

impl ChunkerConfig {
    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| ChunkerError::invalid_config(e.to_string()))?;
        config.validate().map_err(ChunkerError::invalid_config)?;
        Ok(config)
    }

    /// Load a TOML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Whether `language` passes the `supported_languages` filter
    pub fn allows(&self, language: Language) -> bool {
        self.supported_languages.is_empty()
            || self
                .supported_languages
                .iter()
                .any(|name| Language::from_name(name) == Some(language))
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_block_fragments == 0 {
            return Err("max_block_fragments must be > 0".to_string());
        }

        if self.block_name_chars == 0 {
            return Err("block_name_chars must be > 0".to_string());
        }

        if let Some(unknown) = self
            .supported_languages
            .iter()
            .find(|name| Language::from_name(name).is_none())
        {
            return Err(format!("unknown language in supported_languages: {unknown}"));
        }

        Ok(())
    }
}
