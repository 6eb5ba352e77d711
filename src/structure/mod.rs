//! Recovers the section → chapter → article hierarchy from normalized text.
//!
//! Lines are classified one at a time and folded into a [`ScanState`] that
//! carries the current ancestry. Documents without a single heading fall back
//! to one unit per blank-line-delimited paragraph.

mod heading;


pub use heading::{Heading, HeadingClassifier, HeadingLevel, HeadingVocabulary, LineClass};

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::error::ConfigError;

static DEFAULT_EXTRACTOR: LazyLock<StructureExtractor> = LazyLock::new(|| {
    StructureExtractor::new(&HeadingVocabulary::default()).expect("valid default heading patterns")
});

/// One contiguous span at article (or paragraph-fallback) granularity.
///
/// The heading lines themselves are not part of `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuralUnit {
    pub section: Option<Heading>,
    pub chapter: Option<Heading>,
    pub article: Option<Heading>,
    /// 1-based paragraph index, set only by the paragraph fallback
    pub part: Option<usize>,
    pub text: String,
}

impl StructuralUnit {
    pub fn section_number(&self) -> Option<&str> {
        self.section.as_ref().and_then(|h| h.number.as_deref())
    }

    pub fn chapter_number(&self) -> Option<&str> {
        self.chapter.as_ref().and_then(|h| h.number.as_deref())
    }

    pub fn article_number(&self) -> Option<&str> {
        self.article.as_ref().and_then(|h| h.number.as_deref())
    }

    /// Article title, if this unit belongs to an article
    pub fn title(&self) -> Option<&str> {
        self.article.as_ref().map(|h| h.title.as_str())
    }

    /// Whether this unit came from the paragraph fallback
    pub fn is_paragraph(&self) -> bool {
        self.part.is_some()
    }

    /// Heading lines outermost first, for rendering chunk headers
    pub fn heading_lines(&self) -> impl Iterator<Item = &str> {
        [&self.section, &self.chapter, &self.article]
            .into_iter()
            .flatten()
            .map(|h| h.line.as_str())
            .filter(|line| !line.is_empty())
    }
}

/// A heading keyword was found but no number could be read from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureWarning {
    /// 1-based line number in the normalized text
    pub line: usize,
    pub level: HeadingLevel,
    pub text: String,
}

impl fmt::Display for StructureWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: {} heading without a number: {:?}",
            self.line, self.level, self.text
        )
    }
}

/// Units of one document plus the non-fatal problems met on the way
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub units: Vec<StructuralUnit>,
    pub warnings: Vec<StructureWarning>,
    pub heading_count: usize,
}

/// Section and chapter in effect at some point of the scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Ancestry {
    section: Option<Heading>,
    chapter: Option<Heading>,
}

impl Ancestry {
    fn with_section(&self, heading: Heading) -> Self {
        Self {
            section: Some(heading),
            chapter: None,
        }
    }

    fn with_chapter(&self, heading: Heading) -> Self {
        Self {
            section: self.section.clone(),
            chapter: Some(heading),
        }
    }
}

/// Unit whose body is still being collected
#[derive(Debug, Default)]
struct OpenUnit {
    ancestry: Ancestry,
    article: Option<Heading>,
    lines: Vec<String>,
}

impl OpenUnit {
    fn close(self) -> Option<StructuralUnit> {
        let text = self.lines.join("\n").trim().to_string();
        // Article units survive with an empty body ("Статья 7. Утратила силу")
        if text.is_empty() && self.article.is_none() {
            return None;
        }

        Some(StructuralUnit {
            section: self.ancestry.section,
            chapter: self.ancestry.chapter,
            article: self.article,
            part: None,
            text,
        })
    }
}

/// Accumulator of the left fold over lines
#[derive(Debug, Default)]
struct ScanState {
    ancestry: Ancestry,
    open: OpenUnit,
    units: Vec<StructuralUnit>,
    warnings: Vec<StructureWarning>,
    heading_count: usize,
}

impl ScanState {
    fn step(mut self, line_no: usize, line: &str, class: LineClass) -> Self {
        if let Some((level, heading)) = class.heading() {
            self.heading_count += 1;
            if heading.number.is_none() {
                self.warnings.push(StructureWarning {
                    line: line_no,
                    level,
                    text: heading.line.clone(),
                });
            }
        }

        let (ancestry, article) = match class {
            LineClass::Plain => {
                self.open.lines.push(line.to_string());
                return self;
            }
            LineClass::Section(heading) => (self.ancestry.with_section(heading), None),
            LineClass::Chapter(heading) => (self.ancestry.with_chapter(heading), None),
            LineClass::Article(heading) => (self.ancestry.clone(), Some(heading)),
        };

        let previous = std::mem::replace(
            &mut self.open,
            OpenUnit {
                ancestry: ancestry.clone(),
                article,
                lines: Vec::new(),
            },
        );
        self.units.extend(previous.close());
        self.ancestry = ancestry;
        self
    }

    /// A line the source marked as an outline heading that the vocabulary
    /// does not recognize. It closes the open unit and starts one with the
    /// same ancestry but no article.
    fn outline_break(mut self, line: &str) -> Self {
        let previous = std::mem::replace(
            &mut self.open,
            OpenUnit {
                ancestry: self.ancestry.clone(),
                article: None,
                lines: vec![line.to_string()],
            },
        );
        self.units.extend(previous.close());
        self
    }

    fn finish(mut self) -> Extraction {
        self.units.extend(self.open.close());
        Extraction {
            units: self.units,
            warnings: self.warnings,
            heading_count: self.heading_count,
        }
    }
}

/// Structure extractor for one heading vocabulary
#[derive(Debug, Clone)]
pub struct StructureExtractor {
    classifier: HeadingClassifier,
}

impl StructureExtractor {
    pub fn new(vocabulary: &HeadingVocabulary) -> Result<Self, ConfigError> {
        Ok(Self {
            classifier: HeadingClassifier::new(vocabulary)?,
        })
    }

    /// Split structure-normalized text into ordered structural units.
    pub fn extract(&self, text: &str, doc_name: &str) -> Extraction {
        self.extract_with_breaks(text, doc_name, &BTreeSet::new())
    }

    /// Like [`extract`](Self::extract), with extra unit boundaries.
    ///
    /// `outline_breaks` holds 1-based line numbers that the source format
    /// marked as headings (DOCX heading styles). Such a line, when it is not
    /// a section, chapter or article heading, closes the open unit and opens
    /// a new one without an article.
    pub fn extract_with_breaks(
        &self,
        text: &str,
        doc_name: &str,
        outline_breaks: &BTreeSet<usize>,
    ) -> Extraction {
        let extraction = text
            .lines()
            .enumerate()
            .fold(ScanState::default(), |state, (idx, line)| {
                let line_no = idx + 1;
                match self.classifier.classify(line) {
                    LineClass::Plain if outline_breaks.contains(&line_no) => {
                        state.outline_break(line)
                    }
                    class => state.step(line_no, line, class),
                }
            })
            .finish();

        for warning in &extraction.warnings {
            warn!(source = %doc_name, %warning, "Malformed heading");
        }

        if extraction.heading_count > 0 {
            debug!(
                source = %doc_name,
                headings = extraction.heading_count,
                units = extraction.units.len(),
                "Extracted structural units"
            );
            return extraction;
        }

        let units = split_paragraphs(text);
        debug!(
            source = %doc_name,
            paragraphs = units.len(),
            "No headings found, falling back to paragraphs"
        );
        Extraction {
            units,
            ..Extraction::default()
        }
    }
}

/// Shared extractor for the default (Russian) heading vocabulary
pub fn default_extractor() -> &'static StructureExtractor {
    &DEFAULT_EXTRACTOR
}

/// Extract units with the default (Russian) heading vocabulary.
pub fn extract_units(text: &str, doc_name: &str) -> Extraction {
    DEFAULT_EXTRACTOR.extract(text, doc_name)
}

/// One unit per blank-line-delimited paragraph, numbered from 1
fn split_paragraphs(text: &str) -> Vec<StructuralUnit> {
    let normalized = text.replace("\r\n", "\n");
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in normalized.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim());
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }

    paragraphs
        .into_iter()
        .enumerate()
        .map(|(idx, text)| StructuralUnit {
            section: None,
            chapter: None,
            article: None,
            part: Some(idx + 1),
            text,
        })
        .collect()
}
