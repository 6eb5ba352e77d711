use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::chunker::{
    validate_sizes, DEFAULT_MAX_CHUNK_SIZE, DEFAULT_MIN_CHUNK_SIZE, DEFAULT_OVERLAP_WORDS,
};
use crate::error::{ChunkError, ConfigError};
use crate::structure::HeadingVocabulary;

/// Settings for one chunking run.
///
/// Sizes are counted in characters, overlap in words. Load with
/// [`ChunkerConfig::load`] or start from `Default` and override fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// A segment is only closed once it holds at least this many characters
    pub min_chunk_size: usize,
    /// Ceiling enforced by the merge pass
    pub max_chunk_size: usize,
    /// Trailing words repeated at the start of the next segment
    pub overlap_words: usize,
    /// Keywords introducing section/chapter/article headings
    pub headings: HeadingVocabulary,
    /// Assemble units on the rayon pool
    pub parallel: bool,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            min_chunk_size: DEFAULT_MIN_CHUNK_SIZE,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            overlap_words: DEFAULT_OVERLAP_WORDS,
            headings: HeadingVocabulary::default(),
            parallel: false,
        }
    }
}

impl ChunkerConfig {
    /// Check size invariants. Called by every entry point before any work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_sizes(self.min_chunk_size, self.max_chunk_size)?;
        self.headings.validate()
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ChunkError> {
        debug!(path = %path.display(), "Loading chunker config");
        let raw = std::fs::read_to_string(path).map_err(|source| ChunkError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_toml_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ChunkerConfig::default();
        assert_eq!(config.min_chunk_size, 500);
        assert_eq!(config.max_chunk_size, 1000);
        assert_eq!(config.overlap_words, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_min_above_max_rejected() {
        let config = ChunkerConfig {
            min_chunk_size: 600,
            max_chunk_size: 500,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::MinExceedsMax { min: 600, max: 500 })
        );
    }

    #[test]
    fn test_zero_size_rejected() {
        let config = ChunkerConfig {
            min_chunk_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroSize { name: "min_chunk_size" })
        ));
    }

    #[test]
    fn test_toml_partial_override() {
        let config = ChunkerConfig::from_toml_str("max_chunk_size = 800\noverlap_words = 20\n")
            .unwrap();
        assert_eq!(config.min_chunk_size, 500);
        assert_eq!(config.max_chunk_size, 800);
        assert_eq!(config.overlap_words, 20);
    }

    #[test]
    fn test_toml_custom_headings() {
        let raw = r#"
[headings]
section = "Section"
chapter = "Chapter"
article = "Article"
"#;
        let config = ChunkerConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.headings.article, "Article");
    }

    #[test]
    fn test_toml_negative_overlap_rejected() {
        let err = ChunkerConfig::from_toml_str("overlap_words = -5").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_invalid_sizes_rejected() {
        let err = ChunkerConfig::from_toml_str("min_chunk_size = 600\nmax_chunk_size = 500")
            .unwrap_err();
        assert_eq!(err, ConfigError::MinExceedsMax { min: 600, max: 500 });
    }

    #[test]
    fn test_load_missing_file() {
        let err = ChunkerConfig::load(Path::new("/nonexistent/chunker.toml")).unwrap_err();
        assert!(matches!(err, ChunkError::Io { .. }));
    }
}
