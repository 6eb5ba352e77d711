//! Per-format front ends. Every parser decodes its input to text, then shares
//! the same structure-preserving normalization and structure extraction, so
//! chunking downstream is format-agnostic.

mod docx;
mod html;
mod plain;
mod registry;
mod result;


pub use docx::{DocxParagraph, DocxParser};
pub use html::HtmlParser;
pub use plain::PlainTextParser;
pub use registry::ParserRegistry;
pub use result::{hash_bytes, DocumentFormat, ParsedDocument, SourceMetadata};

use crate::error::ChunkError;
use crate::normalizer::normalize_structured;
use crate::structure::{default_extractor, StructureExtractor};

/// Core trait that all input-format parsers implement
pub trait DocumentParser: Send + Sync {
    /// Format handled by this parser
    fn format(&self) -> DocumentFormat;

    /// Decode raw bytes into line-oriented text. Headings and paragraphs must
    /// end up on their own lines; everything else is left to the normalizer.
    fn decode(&self, bytes: &[u8]) -> Result<String, ChunkError>;

    /// Bring decoded text into the structure-preserving normal form.
    ///
    /// Parsers whose decoder already resolves markup and character
    /// references override this with [`normalize_decoded`], so escaped
    /// literals in the document (`&lt;b&gt;`) are not decoded twice.
    ///
    /// [`normalize_decoded`]: crate::normalizer::normalize_decoded
    fn normalize_text(&self, decoded: &str) -> String {
        normalize_structured(decoded)
    }

    /// Parse with the default heading vocabulary.
    ///
    /// # Arguments
    /// * `source` - Identifier of the document (usually its path)
    /// * `bytes` - Raw document contents
    fn parse(&self, source: &str, bytes: &[u8]) -> Result<ParsedDocument, ChunkError> {
        self.parse_with(source, bytes, default_extractor())
    }

    /// Parse with a caller-provided extractor
    fn parse_with(
        &self,
        source: &str,
        bytes: &[u8],
        extractor: &StructureExtractor,
    ) -> Result<ParsedDocument, ChunkError> {
        let text = self.normalize_text(&self.decode(bytes)?);
        let extraction = extractor.extract(&text, source);
        let metadata = SourceMetadata::new(source, self.format(), bytes, &text);

        Ok(ParsedDocument {
            metadata,
            text,
            extraction,
        })
    }
}
