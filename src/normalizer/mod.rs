//! Plain-text cleanup applied before structure detection.
//!
//! [`normalize`] removes page-number artifacts and leftover markup, decodes
//! character references and collapses whitespace. The result is a fixpoint:
//! running it again returns the same string.

mod entities;

#[cfg(test)]
mod tests;

pub use entities::decode_entities;

use regex::Regex;
use std::sync::LazyLock;

/// `[12]` alone on a line, including its line break
static PAGE_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*\[\d+\][ \t]*(?:\n|$)").expect("valid page number regex")
});

/// Something that looks like an element, comment or declaration
static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z!?][^<>]*>").expect("valid tag regex"));

/// Block-level elements whose boundaries become line breaks
static BLOCK_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^</?(?:p|div|br|h[1-6]|li|tr|table|section|article|blockquote|header|footer)\b",
    )
    .expect("valid block tag regex")
});

/// How line structure is treated when collapsing whitespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizeMode {
    /// Every whitespace run becomes one space; the result is a single line
    #[default]
    Flat,
    /// Lines survive as single newlines and paragraph breaks as one blank line
    Structured,
}

/// Normalize to a single line of text.
pub fn normalize(raw: &str) -> String {
    normalize_with(raw, NormalizeMode::Flat)
}

/// Normalize while keeping line and paragraph boundaries.
pub fn normalize_structured(raw: &str) -> String {
    normalize_with(raw, NormalizeMode::Structured)
}

pub fn normalize_with(raw: &str, mode: NormalizeMode) -> String {
    // Decoding can expose new tags or references (`&amp;lt;`); repeat until stable.
    fixpoint(raw, |text| normalize_pass(text, mode))
}

/// Normalize text that a format decoder already turned into plain text.
///
/// Markup and character references were resolved by the decoder, so only
/// page numbers, special spaces and whitespace are handled here. Escaped
/// literals such as `<b>` or `&nbsp;` in the decoded text are kept.
pub fn normalize_decoded(raw: &str) -> String {
    fixpoint(raw, |text| layout_pass(text, NormalizeMode::Structured))
}

fn fixpoint(raw: &str, pass: impl Fn(&str) -> String) -> String {
    let mut current = pass(raw);
    loop {
        let next = pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_pass(text: &str, mode: NormalizeMode) -> String {
    let text = normalize_line_endings(text);
    let text = PAGE_NUMBER_REGEX.replace_all(&text, "");
    let text = strip_tags(&text);
    let text = decode_entities(&text);
    layout_pass(&text, mode)
}

/// Page numbers, special spaces and whitespace; no markup handling
fn layout_pass(text: &str, mode: NormalizeMode) -> String {
    let text = replace_special_spaces(&normalize_line_endings(text));
    let text = PAGE_NUMBER_REGEX.replace_all(&text, "");

    match mode {
        NormalizeMode::Flat => text.split_whitespace().collect::<Vec<_>>().join(" "),
        NormalizeMode::Structured => collapse_lines(&text),
    }
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn strip_tags(text: &str) -> String {
    if !text.contains('<') {
        return text.to_string();
    }

    TAG_REGEX
        .replace_all(text, |caps: &regex::Captures| {
            if BLOCK_TAG_REGEX.is_match(&caps[0]) {
                "\n"
            } else {
                ""
            }
        })
        .into_owned()
}

fn replace_special_spaces(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{00a0}' | '\u{2007}' | '\u{202f}' | '\u{200b}' | '\u{200c}' | '\u{200d}'
            | '\u{2060}' | '\u{feff}' => ' ',
            other => other,
        })
        .collect()
}

/// Collapse horizontal whitespace per line and blank-line runs to one blank line.
fn collapse_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_blank = false;

    for line in text.split('\n') {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }

        if !out.is_empty() {
            out.push('\n');
            if pending_blank {
                out.push('\n');
            }
        }
        out.push_str(&collapsed);
        pending_blank = false;
    }

    out
}
