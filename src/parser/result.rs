use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;

use crate::structure::Extraction;

/// Input formats with a dedicated parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Plain or lightly marked-up text
    Text,
    /// HTML / XHTML markup
    Html,
    /// Office Open XML word-processing document
    Docx,
}

impl DocumentFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Html => "html",
            Self::Docx => "docx",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of parsing one document
#[derive(Debug, Clone, Serialize)]
pub struct ParsedDocument {
    /// Where the document came from and what it looked like
    pub metadata: SourceMetadata,
    /// Structure-normalized text the units were extracted from
    pub text: String,
    pub extraction: Extraction,
}

/// Metadata gathered while parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Document identifier as given by the caller
    pub source: String,
    /// Lowercased file extension, empty when there is none
    pub extension: String,
    pub format: DocumentFormat,
    /// Original byte size
    pub size_bytes: usize,
    /// Line count of the normalized text
    pub line_count: usize,
    /// Whether the input bytes were valid UTF-8
    pub is_utf8: bool,
    /// Hex SHA-256 of the input bytes
    pub sha256: String,
}

impl SourceMetadata {
    pub fn new(source: &str, format: DocumentFormat, bytes: &[u8], text: &str) -> Self {
        let extension = Path::new(source)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        Self {
            source: source.to_string(),
            extension,
            format,
            size_bytes: bytes.len(),
            line_count: text.lines().count(),
            is_utf8: std::str::from_utf8(bytes).is_ok(),
            sha256: hash_bytes(bytes),
        }
    }
}

/// Hex SHA-256 of a byte slice
pub fn hash_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
