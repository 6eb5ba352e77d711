use std::path::PathBuf;
use thiserror::Error;

/// Invalid chunker settings. Raised before any text is processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be greater than zero")]
    ZeroSize { name: &'static str },

    #[error("min_chunk_size ({min}) exceeds max_chunk_size ({max})")]
    MinExceedsMax { min: usize, max: usize },

    #[error("invalid heading keyword {keyword:?}: {message}")]
    InvalidPattern { keyword: String, message: String },

    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

#[derive(Error, Debug)]
pub enum ChunkError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read rich document: {0}")]
    Docx(String),

    #[error("failed to walk input directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
