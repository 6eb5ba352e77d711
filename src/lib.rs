// Public API exports
pub mod assembler;
pub mod chunker;
pub mod config;
pub mod error;
pub mod normalizer;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod points;
pub mod source;
pub mod structure;

// Re-export main types for convenience
pub use config::ChunkerConfig;
pub use error::{ChunkError, ConfigError};

pub use normalizer::{
    normalize, normalize_decoded, normalize_structured, normalize_with, NormalizeMode,
};

pub use structure::{
    extract_units, Extraction, Heading, HeadingLevel, HeadingVocabulary, StructuralUnit,
    StructureExtractor, StructureWarning,
};

pub use points::{split_points, Point};

pub use chunker::{bound, bound_segments, Segment};

pub use assembler::{assemble, Chunk, Metadata, MetadataValue};

pub use parser::{
    DocumentFormat, DocumentParser, DocxParagraph, DocxParser, HtmlParser, ParsedDocument, ParserRegistry,
    PlainTextParser, SourceMetadata,
};

pub use pipeline::{chunk_document, ChunkedDocument, Document, LegalChunker};

pub use output::{read_jsonl, write_jsonl, Manifest};
pub use source::{collect_sources, read_source};
