use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::{BTreeSet, HashMap};
use std::io::{Cursor, Read, Seek};
use zip::ZipArchive;

use super::{DocumentFormat, DocumentParser, ParsedDocument, SourceMetadata};
use crate::error::ChunkError;
use crate::normalizer::normalize_decoded;
use crate::structure::StructureExtractor;

/// Main document part inside the archive
const DOCUMENT_PART: &str = "word/document.xml";

/// Style definitions, optional in an archive
const STYLES_PART: &str = "word/styles.xml";

/// One `w:p` of the main document part
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocxParagraph {
    pub text: String,
    /// Style name from the styles part, or the bare style id when the
    /// archive defines no name for it
    pub style: Option<String>,
}

impl DocxParagraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
        }
    }

    /// Outline styles are named "heading 1" through "heading 9"
    pub fn is_heading(&self) -> bool {
        self.style
            .as_deref()
            .is_some_and(|style| style.to_lowercase().starts_with("heading"))
    }
}

/// Word-processing documents (`.docx`): the main document part, one line of
/// text per paragraph.
///
/// Runs keep their text only; deleted revisions and field instructions are
/// not part of `w:t` and are dropped. A heading-styled paragraph that the
/// heading vocabulary does not recognize still closes the unit before it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxParser;

impl DocxParser {
    /// Every `w:p` in document order, empty paragraphs included
    pub fn paragraphs(bytes: &[u8]) -> Result<Vec<DocxParagraph>, ChunkError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ChunkError::Docx(format!("not a zip archive: {}", e)))?;

        let style_names = if archive.file_names().any(|name| name == STYLES_PART) {
            parse_style_names(&read_part(&mut archive, STYLES_PART)?)?
        } else {
            HashMap::new()
        };

        let mut paragraphs = parse_document_xml(&read_part(&mut archive, DOCUMENT_PART)?)?;
        for paragraph in &mut paragraphs {
            if let Some(name) = paragraph.style.as_ref().and_then(|id| style_names.get(id)) {
                paragraph.style = Some(name.clone());
            }
        }

        Ok(paragraphs)
    }
}

impl DocumentParser for DocxParser {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Docx
    }

    fn decode(&self, bytes: &[u8]) -> Result<String, ChunkError> {
        let paragraphs: Vec<String> = Self::paragraphs(bytes)?
            .into_iter()
            .map(|paragraph| paragraph.text)
            .collect();
        Ok(paragraphs.join("\n\n"))
    }

    // Run text is unescaped by the XML reader
    fn normalize_text(&self, decoded: &str) -> String {
        normalize_decoded(decoded)
    }

    fn parse_with(
        &self,
        source: &str,
        bytes: &[u8],
        extractor: &StructureExtractor,
    ) -> Result<ParsedDocument, ChunkError> {
        let mut text = String::new();
        let mut outline_breaks = BTreeSet::new();
        let mut line_count = 0;

        for paragraph in Self::paragraphs(bytes)? {
            let body = self.normalize_text(&paragraph.text);
            if body.is_empty() {
                continue;
            }
            if !text.is_empty() {
                text.push_str("\n\n");
                line_count += 1;
            }
            if paragraph.is_heading() {
                outline_breaks.insert(line_count + 1);
            }
            line_count += body.lines().count();
            text.push_str(&body);
        }

        let extraction = extractor.extract_with_breaks(&text, source, &outline_breaks);
        let metadata = SourceMetadata::new(source, self.format(), bytes, &text);

        Ok(ParsedDocument {
            metadata,
            text,
            extraction,
        })
    }
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String, ChunkError> {
    let mut xml = String::new();
    archive
        .by_name(name)
        .map_err(|e| ChunkError::Docx(format!("missing {}: {}", name, e)))?
        .read_to_string(&mut xml)
        .map_err(|e| ChunkError::Docx(format!("unreadable {}: {}", name, e)))?;
    Ok(xml)
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>, ChunkError> {
    let Some(attr) = element
        .try_get_attribute(name)
        .map_err(|e| ChunkError::Docx(format!("bad {} attribute: {}", name, e)))?
    else {
        return Ok(None);
    };

    attr.unescape_value()
        .map(|value| Some(value.into_owned()))
        .map_err(|e| ChunkError::Docx(format!("bad {} value: {}", name, e)))
}

fn read_error(part: &str, reader: &Reader<&[u8]>, e: quick_xml::Error) -> ChunkError {
    ChunkError::Docx(format!(
        "malformed {} at byte {}: {}",
        part,
        reader.buffer_position(),
        e
    ))
}

/// Style id to style name, from `w:style/@w:styleId` and `w:name/@w:val`
fn parse_style_names(xml: &str) -> Result<HashMap<String, String>, ChunkError> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    let mut buf = Vec::with_capacity(8192);
    let mut names = HashMap::new();
    let mut style_id: Option<String> = None;

    loop {
        buf.clear();
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| read_error(STYLES_PART, &reader, e))?
        {
            Event::Start(ref e) if e.name().as_ref() == b"w:style" => {
                style_id = attribute(e, "w:styleId")?;
            }
            Event::End(ref e) if e.name().as_ref() == b"w:style" => style_id = None,
            Event::Empty(ref e) if e.name().as_ref() == b"w:name" => {
                if let (Some(id), Some(name)) = (&style_id, attribute(e, "w:val")?) {
                    names.insert(id.clone(), name);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(names)
}

fn parse_document_xml(xml: &str) -> Result<Vec<DocxParagraph>, ChunkError> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    let mut buf = Vec::with_capacity(8192);
    let mut paragraphs = Vec::new();
    let mut current = DocxParagraph::default();
    let mut in_text = false;

    loop {
        buf.clear();
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| read_error(DOCUMENT_PART, &reader, e))?;

        match event {
            Event::Start(ref e) if e.name().as_ref() == b"w:t" => in_text = true,
            Event::End(ref e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(ref e) => match e.name().as_ref() {
                b"w:tab" => current.text.push('\t'),
                b"w:br" | b"w:cr" => current.text.push('\n'),
                b"w:p" => paragraphs.push(DocxParagraph::default()),
                // The first style wins; revision marks repeat the old one later
                b"w:pStyle" if current.style.is_none() => {
                    current.style = attribute(e, "w:val")?;
                }
                _ => {}
            },
            Event::Text(ref e) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|err| ChunkError::Docx(format!("bad text run: {}", err)))?;
                current.text.push_str(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}
