use quick_xml::escape::{resolve_html5_entity, unescape_with};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// A single well-formed character reference: decimal, hex or named
static ENTITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});")
        .expect("valid entity regex")
});

/// Decode numeric and HTML5 named character references.
///
/// Each reference is resolved on its own, so one unknown name or invalid
/// code point is left exactly as written without affecting its neighbours.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    ENTITY_REGEX
        .replace_all(text, |caps: &Captures| {
            let reference = &caps[0];
            match unescape_with(reference, resolve_html5_entity) {
                Ok(decoded) if !decoded.contains('\0') => decoded.into_owned(),
                _ => reference.to_string(),
            }
        })
        .into_owned()
}
