use super::{DocumentParser, DocxParser, HtmlParser, PlainTextParser};
use std::collections::HashMap;
use std::path::Path;

/// Dynamic dispatch table for input-format parsers
pub struct ParserRegistry {
    /// Fallback parser for unknown extensions
    fallback: Box<dyn DocumentParser>,
    /// Extension -> Parser mapping
    map: HashMap<String, Box<dyn DocumentParser>>,
}

impl ParserRegistry {
    /// Registry with the built-in parsers and plain text as fallback
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for ext in ["txt", "text", "md"] {
            registry.register(ext, PlainTextParser);
        }
        for ext in ["html", "htm", "xhtml"] {
            registry.register(ext, HtmlParser);
        }
        registry.register("docx", DocxParser);
        registry
    }

    /// Registry with no extension mappings, only the plain-text fallback
    pub fn empty() -> Self {
        Self {
            fallback: Box::new(PlainTextParser),
            map: HashMap::new(),
        }
    }

    /// Register a parser for a file extension (without dot, any case).
    /// A later registration for the same extension replaces the earlier one.
    pub fn register(&mut self, extension: impl Into<String>, parser: impl DocumentParser + 'static) {
        self.map
            .insert(extension.into().to_lowercase(), Box::new(parser));
    }

    /// Select the parser for a path, falling back to plain text
    pub fn select(&self, path: &str) -> &dyn DocumentParser {
        self.lookup(path).unwrap_or(&*self.fallback)
    }

    /// Whether a path has a registered (non-fallback) parser
    pub fn supports(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    /// Get the number of registered parsers (excluding fallback)
    pub fn parser_count(&self) -> usize {
        self.map.len()
    }

    /// List all registered extensions
    pub fn registered_extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.map.keys().map(|s| s.as_str()).collect();
        extensions.sort_unstable();
        extensions
    }

    fn lookup(&self, path: &str) -> Option<&dyn DocumentParser> {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())?;

        self.map.get(&ext).map(|p| &**p)
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}
