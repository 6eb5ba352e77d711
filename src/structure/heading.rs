use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;

/// Arabic number with optional dotted sub-numbering (`15`, `15.1`)
const ARABIC_NUMBER: &str = r"\d+(?:\.\d+)*";

/// Roman numeral, upper case only
const ROMAN_NUMBER: &str = r"[IVXLCDM]+";

/// Keywords that introduce headings, matched case-insensitively at line start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingVocabulary {
    pub section: String,
    pub chapter: String,
    pub article: String,
}

impl Default for HeadingVocabulary {
    fn default() -> Self {
        Self {
            section: "Раздел".to_string(),
            chapter: "Глава".to_string(),
            article: "Статья".to_string(),
        }
    }
}

impl HeadingVocabulary {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for keyword in [&self.section, &self.chapter, &self.article] {
            if keyword.trim().is_empty() {
                return Err(ConfigError::InvalidPattern {
                    keyword: keyword.clone(),
                    message: "heading keyword must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Hierarchy level of a heading, outermost first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    Section,
    Chapter,
    Article,
}

impl HeadingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Section => "section",
            Self::Chapter => "chapter",
            Self::Article => "article",
        }
    }

    fn classify(self, heading: Heading) -> LineClass {
        match self {
            Self::Section => LineClass::Section(heading),
            Self::Chapter => LineClass::Chapter(heading),
            Self::Article => LineClass::Article(heading),
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recognized heading line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Number exactly as written; `None` when the keyword had no number
    pub number: Option<String>,
    /// Text after the number, possibly empty
    pub title: String,
    /// The whole heading line
    pub line: String,
}

/// What a single line of a document is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    Section(Heading),
    Chapter(Heading),
    Article(Heading),
    Plain,
}

impl LineClass {
    pub fn heading(&self) -> Option<(HeadingLevel, &Heading)> {
        match self {
            Self::Section(h) => Some((HeadingLevel::Section, h)),
            Self::Chapter(h) => Some((HeadingLevel::Chapter, h)),
            Self::Article(h) => Some((HeadingLevel::Article, h)),
            Self::Plain => None,
        }
    }
}

/// Line classifier built from a [`HeadingVocabulary`].
///
/// Patterns are tried outermost level first; the first match wins.
#[derive(Debug, Clone)]
pub struct HeadingClassifier {
    patterns: Vec<(HeadingLevel, Regex)>,
}

impl HeadingClassifier {
    pub fn new(vocabulary: &HeadingVocabulary) -> Result<Self, ConfigError> {
        vocabulary.validate()?;

        let patterns = vec![
            (
                HeadingLevel::Section,
                heading_regex(&vocabulary.section, ROMAN_NUMBER)?,
            ),
            (
                HeadingLevel::Chapter,
                heading_regex(&vocabulary.chapter, ARABIC_NUMBER)?,
            ),
            (
                HeadingLevel::Article,
                heading_regex(&vocabulary.article, ARABIC_NUMBER)?,
            ),
        ];

        Ok(Self { patterns })
    }

    pub fn classify(&self, line: &str) -> LineClass {
        let line = line.trim();
        if line.is_empty() {
            return LineClass::Plain;
        }

        for (level, pattern) in &self.patterns {
            let Some(caps) = pattern.captures(line) else {
                continue;
            };

            let heading = Heading {
                number: caps.get(1).map(|m| m.as_str().to_string()),
                title: caps
                    .get(2)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default(),
                line: line.to_string(),
            };
            return level.classify(heading);
        }

        LineClass::Plain
    }
}

/// `KEYWORD [NUMBER] [.:] TITLE`, keyword ending at a word boundary or a digit.
fn heading_regex(keyword: &str, number: &str) -> Result<Regex, ConfigError> {
    let pattern = format!(
        r"^\s*(?i:{})(?:\s*({})\b)?(?:[.:]|\s|$)\s*(.*)$",
        regex::escape(keyword.trim()),
        number
    );

    Regex::new(&pattern).map_err(|e| ConfigError::InvalidPattern {
        keyword: keyword.to_string(),
        message: e.to_string(),
    })
}
