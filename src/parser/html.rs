use scraper::{ElementRef, Html};

use super::{DocumentFormat, DocumentParser};
use crate::error::ChunkError;
use crate::normalizer::normalize_decoded;

/// Elements whose whole subtree is boilerplate
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "meta", "link", "noscript", "head", "template", "iframe",
];

/// Classes marking site chrome rather than document text
const SKIPPED_CLASSES: &[&str] = &["comment", "ad", "hidden"];

/// Elements that end a paragraph
const PARAGRAPH_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "blockquote", "pre", "table", "section",
    "article", "ul", "ol",
];

/// Elements that only end a line
const LINE_TAGS: &[&str] = &[
    "div", "tr", "dt", "dd", "header", "footer", "main", "nav", "caption",
];

/// Table cells, kept apart on their row's line
const CELL_TAGS: &[&str] = &["td", "th"];

/// HTML markup flattened to one line per block element
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Flatten markup to text. Whitespace inside text nodes (including
    /// source line wraps) becomes plain spaces; only block elements break
    /// lines.
    pub fn html_to_text(html: &str) -> String {
        let document = Html::parse_document(html);
        let mut out = String::with_capacity(html.len() / 2);
        walk(document.root_element(), &mut out);
        out
    }
}

impl DocumentParser for HtmlParser {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Html
    }

    fn decode(&self, bytes: &[u8]) -> Result<String, ChunkError> {
        Ok(Self::html_to_text(&String::from_utf8_lossy(bytes)))
    }

    // The DOM text already has its entities resolved
    fn normalize_text(&self, decoded: &str) -> String {
        normalize_decoded(decoded)
    }
}

fn walk(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.extend(text.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }));
        } else if let Some(child) = ElementRef::wrap(child) {
            visit(child, out);
        }
    }
}

fn visit(element: ElementRef<'_>, out: &mut String) {
    let value = element.value();
    let name = value.name();

    if SKIPPED_TAGS.contains(&name) || value.classes().any(|c| SKIPPED_CLASSES.contains(&c)) {
        return;
    }
    if name == "br" {
        out.push('\n');
        return;
    }

    let separator = if PARAGRAPH_TAGS.contains(&name) {
        "\n\n"
    } else if LINE_TAGS.contains(&name) {
        "\n"
    } else if CELL_TAGS.contains(&name) {
        " "
    } else {
        ""
    };

    out.push_str(separator);
    walk(element, out);
    out.push_str(separator);
}
