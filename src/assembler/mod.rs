//! Turns structural units into final chunks: header rendering, point
//! splitting, size bounding, metadata and content-derived ids.


use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::debug;

use crate::chunker::bound_segments;
use crate::config::ChunkerConfig;
use crate::error::ConfigError;
use crate::points::split_points;
use crate::structure::{Heading, StructuralUnit};

/// Characters of the body that feed the chunk id
pub const ID_PREFIX_CHARS: usize = 50;

/// Metadata keys shared with downstream consumers
pub mod keys {
    pub const SOURCE: &str = "source";
    pub const SECTION: &str = "section";
    pub const SECTION_TITLE: &str = "section_title";
    pub const CHAPTER: &str = "chapter";
    pub const CHAPTER_TITLE: &str = "chapter_title";
    pub const ARTICLE: &str = "article";
    pub const TITLE: &str = "title";
    pub const POINT_NUMBER: &str = "point_number";
    pub const PART: &str = "part";
    pub const SEGMENT: &str = "segment";
}

/// Metadata value: either text or a 1-based index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Integer(u64),
    Text(String),
}

impl MetadataValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Integer(_) => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<usize> for MetadataValue {
    fn from(value: usize) -> Self {
        Self::Integer(value as u64)
    }
}

pub type Metadata = BTreeMap<String, MetadataValue>;

/// A chunk ready for indexing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Hex SHA-256 over ancestry and the first characters of the body
    pub chunk_id: String,
    /// Hierarchy header plus body
    pub text: String,
    pub metadata: Metadata,
    /// The text is longer than `max_chunk_size` (unsplittable run-on clause)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub length_exceeded: bool,
}

impl Chunk {
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetadataValue::as_str)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(MetadataValue::as_u64)
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Which key numbers the segments of a split body
#[derive(Debug, Clone, Copy)]
enum SplitKey {
    Part,
    Segment,
}

impl SplitKey {
    fn key(self) -> &'static str {
        match self {
            Self::Part => keys::PART,
            Self::Segment => keys::SEGMENT,
        }
    }
}

/// Assemble the chunks of a document, in document order.
///
/// Sizes are validated before anything is produced. With
/// `config.parallel` units are processed on the rayon pool; the output order
/// is the same either way.
pub fn assemble(
    units: &[StructuralUnit],
    config: &ChunkerConfig,
    source: &str,
) -> Result<Vec<Chunk>, ConfigError> {
    config.validate()?;

    let per_unit: Vec<Vec<Chunk>> = if config.parallel {
        units
            .par_iter()
            .map(|unit| assemble_unit(unit, config, source))
            .collect::<Result<_, _>>()?
    } else {
        units
            .iter()
            .map(|unit| assemble_unit(unit, config, source))
            .collect::<Result<_, _>>()?
    };

    let chunks: Vec<Chunk> = per_unit.into_iter().flatten().collect();
    debug!(
        source = %source,
        units = units.len(),
        chunks = chunks.len(),
        oversized = chunks.iter().filter(|c| c.length_exceeded).count(),
        "Assembled chunks"
    );

    Ok(chunks)
}

/// Chunks of a single unit
pub fn assemble_unit(
    unit: &StructuralUnit,
    config: &ChunkerConfig,
    source: &str,
) -> Result<Vec<Chunk>, ConfigError> {
    let base = unit_metadata(unit, source);

    // Paragraph-fallback units are not articles: no points, no header
    if unit.is_paragraph() {
        return render(unit, &unit.text, base, SplitKey::Segment, config);
    }

    let mut chunks = Vec::new();
    for point in split_points(&unit.text) {
        let mut metadata = base.clone();
        if let Some(number) = &point.number {
            metadata.insert(keys::POINT_NUMBER.to_string(), number.as_str().into());
        }
        chunks.extend(render(unit, &point.text, metadata, SplitKey::Part, config)?);
    }
    Ok(chunks)
}

/// Header lines for each known level, then the body text.
pub fn format_body(unit: &StructuralUnit, text: &str) -> String {
    let header = unit.heading_lines().collect::<Vec<_>>().join("\n");
    match (header.is_empty(), text.is_empty()) {
        (true, _) => text.to_string(),
        (false, true) => header,
        (false, false) => format!("{}\n{}", header, text),
    }
}

/// Deterministic id over ancestry numbers and the first characters of `body`.
pub fn chunk_id(unit: &StructuralUnit, body: &str) -> String {
    let prefix: String = body.chars().take(ID_PREFIX_CHARS).collect();

    let mut hasher = Sha256::new();
    for part in [
        unit.section_number().unwrap_or(""),
        unit.chapter_number().unwrap_or(""),
        unit.article_number().unwrap_or(""),
        prefix.as_str(),
    ] {
        hasher.update(part.as_bytes());
        hasher.update(b"\x1f");
    }
    hex::encode(hasher.finalize())
}

fn render(
    unit: &StructuralUnit,
    text: &str,
    metadata: Metadata,
    split_key: SplitKey,
    config: &ChunkerConfig,
) -> Result<Vec<Chunk>, ConfigError> {
    let body = format_body(unit, text);
    if body.is_empty() {
        return Ok(vec![]);
    }

    let max = config.max_chunk_size;
    if body.chars().count() <= max {
        return Ok(vec![Chunk {
            chunk_id: chunk_id(unit, text),
            text: body,
            metadata,
            length_exceeded: false,
        }]);
    }

    let header_words = body.split_whitespace().count() - text.split_whitespace().count();
    let segments = bound_segments(
        &body,
        config.min_chunk_size,
        max,
        config.overlap_words,
    )?;

    Ok(segments
        .into_iter()
        .enumerate()
        .map(|(idx, segment)| {
            // Ids hash the body words only, so points sharing a header differ
            let id_body = segment
                .text
                .split_whitespace()
                .skip(header_words.saturating_sub(segment.words.start))
                .collect::<Vec<_>>()
                .join(" ");

            let length_exceeded = segment.char_len() > max;
            if length_exceeded {
                debug!(
                    article = unit.article_number().unwrap_or(""),
                    chars = segment.char_len(),
                    max,
                    "Run-on segment exceeds max chunk size"
                );
            }

            let mut metadata = metadata.clone();
            metadata.insert(split_key.key().to_string(), (idx + 1).into());
            Chunk {
                chunk_id: chunk_id(unit, &id_body),
                text: segment.text,
                metadata,
                length_exceeded,
            }
        })
        .collect())
}

fn unit_metadata(unit: &StructuralUnit, source: &str) -> Metadata {
    let mut metadata = Metadata::new();
    if !source.is_empty() {
        metadata.insert(keys::SOURCE.to_string(), source.into());
    }

    insert_heading(&mut metadata, keys::SECTION, keys::SECTION_TITLE, &unit.section);
    insert_heading(&mut metadata, keys::CHAPTER, keys::CHAPTER_TITLE, &unit.chapter);
    insert_heading(&mut metadata, keys::ARTICLE, keys::TITLE, &unit.article);

    if let Some(part) = unit.part {
        metadata.insert(keys::PART.to_string(), part.into());
    }
    metadata
}

fn insert_heading(
    metadata: &mut Metadata,
    number_key: &str,
    title_key: &str,
    heading: &Option<Heading>,
) {
    let Some(heading) = heading else {
        return;
    };
    if let Some(number) = &heading.number {
        metadata.insert(number_key.to_string(), number.as_str().into());
    }
    if !heading.title.is_empty() {
        metadata.insert(title_key.to_string(), heading.title.as_str().into());
    }
}
