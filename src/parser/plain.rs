use super::{DocumentFormat, DocumentParser};
use crate::error::ChunkError;

/// Plain text, decoded as lossy UTF-8.
///
/// Residual markup and entities are handled by the normalizer, so `.md` and
/// copy-pasted HTML fragments go through here too.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextParser;

impl DocumentParser for PlainTextParser {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Text
    }

    fn decode(&self, bytes: &[u8]) -> Result<String, ChunkError> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}
