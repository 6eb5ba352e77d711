use std::ops::Range;

use super::validate_sizes;
use crate::error::ConfigError;

/// One bounded piece of text produced by [`bound_segments`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Words of the segment joined by single spaces
    pub text: String,
    /// Word range in the whitespace-split input
    pub words: Range<usize>,
}

impl Segment {
    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Split text into segments of roughly `min_size..=max_size` characters.
///
/// See [`bound_segments`] for the rules.
pub fn bound(
    text: &str,
    min_size: usize,
    max_size: usize,
    overlap_words: usize,
) -> Result<Vec<String>, ConfigError> {
    Ok(bound_segments(text, min_size, max_size, overlap_words)?
        .into_iter()
        .map(|segment| segment.text)
        .collect())
}

/// Split text into bounded segments:
/// - Words accumulate until the segment holds `min_size` characters and the
///   last word ends with `.` or `;`
/// - The next segment starts with the last `overlap_words` words of the
///   closed one
/// - A run-on clause keeps the segment open past `max_size`
/// - Adjacent segments are then merged while the merged text stays within
///   `max_size`; overlapping words are not repeated in the merged text
pub fn bound_segments(
    text: &str,
    min_size: usize,
    max_size: usize,
    overlap_words: usize,
) -> Result<Vec<Segment>, ConfigError> {
    validate_sizes(min_size, max_size)?;

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Ok(vec![]);
    }

    let spans = WordSpans::new(&words);
    let ranges = close_at_clauses(&words, &spans, min_size, overlap_words);
    let merged = merge_ranges(ranges, &spans, max_size);

    Ok(merged
        .into_iter()
        .map(|range| Segment {
            text: words[range.clone()].join(" "),
            words: range,
        })
        .collect())
}

/// Character lengths of word ranges, joined by single spaces
struct WordSpans {
    /// `prefix[i]` = total characters of the first `i` words
    prefix: Vec<usize>,
}

impl WordSpans {
    fn new(words: &[&str]) -> Self {
        let mut prefix = Vec::with_capacity(words.len() + 1);
        prefix.push(0);
        for word in words {
            let last = prefix[prefix.len() - 1];
            prefix.push(last + word.chars().count());
        }
        Self { prefix }
    }

    fn len(&self, range: &Range<usize>) -> usize {
        let chars = self.prefix[range.end] - self.prefix[range.start];
        chars + range.len().saturating_sub(1)
    }
}

fn ends_clause(word: &str) -> bool {
    word.ends_with(['.', ';'])
}

/// First pass: close segments at clause ends once they reach `min_size`.
fn close_at_clauses(
    words: &[&str],
    spans: &WordSpans,
    min_size: usize,
    overlap_words: usize,
) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut closed_end = 0;

    for (idx, word) in words.iter().enumerate() {
        let end = idx + 1;
        if spans.len(&(start..end)) >= min_size && ends_clause(word) {
            ranges.push(start..end);
            closed_end = end;
            start = end.saturating_sub(overlap_words).max(start);
        }
    }

    // A tail made only of overlap words adds nothing new
    if closed_end < words.len() {
        ranges.push(start..words.len());
    }

    ranges
}

/// Second pass: greedily merge neighbours without exceeding `max_size`.
fn merge_ranges(
    ranges: Vec<Range<usize>>,
    spans: &WordSpans,
    max_size: usize,
) -> Vec<Range<usize>> {
    let mut merged = Vec::with_capacity(ranges.len());
    let mut buffer: Option<Range<usize>> = None;

    for range in ranges {
        buffer = Some(match buffer.take() {
            None => range,
            Some(current) => {
                let combined = current.start..range.end;
                if spans.len(&combined) <= max_size {
                    combined
                } else {
                    merged.push(current);
                    range
                }
            }
        });
    }

    merged.extend(buffer);
    merged
}
