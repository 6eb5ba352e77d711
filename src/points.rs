use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Line-starting decimal number followed by a period and whitespace
static POINT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(\d+)\.\s").expect("valid point regex"));

/// A numbered sub-clause of a structural unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Point {
    /// Number as written, without the trailing period
    pub number: Option<String>,
    /// Clause text including its number marker
    pub text: String,
}

/// Split an article body into its numbered points.
///
/// Without any numbered line the whole text is returned as one point with no
/// number. Non-blank text ahead of the first numbered line is kept as an
/// unnumbered leading point so nothing is lost.
pub fn split_points(unit_text: &str) -> Vec<Point> {
    let starts: Vec<(usize, &str)> = POINT_REGEX
        .captures_iter(unit_text)
        .filter_map(|caps| Some((caps.get(0)?.start(), caps.get(1)?.as_str())))
        .collect();

    if starts.is_empty() {
        return vec![Point {
            number: None,
            text: unit_text.to_string(),
        }];
    }

    let mut points = Vec::with_capacity(starts.len() + 1);

    let lead = unit_text[..starts[0].0].trim();
    if !lead.is_empty() {
        points.push(Point {
            number: None,
            text: lead.to_string(),
        });
    }

    for (idx, (start, number)) in starts.iter().enumerate() {
        let end = starts
            .get(idx + 1)
            .map(|(next, _)| *next)
            .unwrap_or(unit_text.len());

        points.push(Point {
            number: Some(number.to_string()),
            text: unit_text[*start..end].trim().to_string(),
        });
    }

    points
}
