//! End-to-end entry points: normalize, extract, split points, bound, assemble.

use serde::Serialize;
use tracing::info;

use crate::assembler::{assemble, Chunk};
use crate::config::ChunkerConfig;
use crate::error::{ChunkError, ConfigError};
use crate::parser::{DocumentParser, ParsedDocument, ParserRegistry, PlainTextParser, SourceMetadata};
use crate::structure::StructureExtractor;

/// Decoded document text and the label it is reported under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub source: String,
    pub text: String,
}

impl Document {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }
}

/// Chunks of one document together with what was learned parsing it
#[derive(Debug, Clone, Serialize)]
pub struct ChunkedDocument {
    pub metadata: SourceMetadata,
    pub unit_count: usize,
    pub warning_count: usize,
    pub chunks: Vec<Chunk>,
}

/// Chunk an already decoded document.
///
/// The configuration is validated before any text is touched, so an invalid
/// configuration never yields partial output. An empty document yields
/// `Ok(vec![])`.
pub fn chunk_document(document: &Document, config: &ChunkerConfig) -> Result<Vec<Chunk>, ChunkError> {
    LegalChunker::new(config.clone())?.chunk(document)
}

/// A validated configuration bound to its heading extractor and the
/// per-format parsers. Holds no per-document state; one instance can chunk
/// any number of documents, from any number of threads.
pub struct LegalChunker {
    config: ChunkerConfig,
    extractor: StructureExtractor,
    registry: ParserRegistry,
}

impl LegalChunker {
    pub fn new(config: ChunkerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let extractor = StructureExtractor::new(&config.headings)?;
        Ok(Self {
            config,
            extractor,
            registry: ParserRegistry::new(),
        })
    }

    /// The validated settings this chunker runs with
    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Chunk already decoded text
    pub fn chunk(&self, document: &Document) -> Result<Vec<Chunk>, ChunkError> {
        let parsed =
            PlainTextParser.parse_with(&document.source, document.text.as_bytes(), &self.extractor)?;
        Ok(self.chunk_parsed(&parsed)?.chunks)
    }

    /// Parse raw bytes with the parser registered for `source`'s extension
    pub fn parse_bytes(&self, source: &str, bytes: &[u8]) -> Result<ParsedDocument, ChunkError> {
        self.registry
            .select(source)
            .parse_with(source, bytes, &self.extractor)
    }

    /// Parse and chunk raw bytes
    pub fn chunk_bytes(&self, source: &str, bytes: &[u8]) -> Result<ChunkedDocument, ChunkError> {
        let parsed = self.parse_bytes(source, bytes)?;
        self.chunk_parsed(&parsed)
    }

    /// Chunk the units of a parsed document
    pub fn chunk_parsed(&self, parsed: &ParsedDocument) -> Result<ChunkedDocument, ChunkError> {
        let source = parsed.metadata.source.as_str();
        let chunks = assemble(&parsed.extraction.units, &self.config, source)?;

        info!(
            source = %source,
            format = %parsed.metadata.format,
            units = parsed.extraction.units.len(),
            warnings = parsed.extraction.warnings.len(),
            chunks = chunks.len(),
            "Chunked document"
        );

        Ok(ChunkedDocument {
            metadata: parsed.metadata.clone(),
            unit_count: parsed.extraction.units.len(),
            warning_count: parsed.extraction.warnings.len(),
            chunks,
        })
    }
}
