//! Locating and reading input documents for the command-line front end.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::ChunkError;
use crate::parser::ParserRegistry;

/// Whether a directory entry should be skipped while walking
pub fn should_ignore(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    // Hidden files/dirs and Word lock files ("~$Кодекс.docx")
    name.starts_with('.') || name.starts_with("~$")
}

/// Expand the given paths into a sorted, de-duplicated list of documents.
///
/// Files named explicitly are always kept (unknown extensions are read as
/// plain text). Directories are walked recursively and only files with a
/// registered extension are kept.
pub fn collect_sources(paths: &[PathBuf], registry: &ParserRegistry) -> Result<Vec<PathBuf>, ChunkError> {
    let mut sources = Vec::new();

    for root in paths {
        if !root.is_dir() {
            sources.push(root.clone());
            continue;
        }

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !should_ignore(e.path()))
        {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type().is_file() && registry.supports(&path.to_string_lossy()) {
                sources.push(path.to_path_buf());
            }
        }
    }

    sources.sort();
    sources.dedup();
    debug!(inputs = paths.len(), documents = sources.len(), "Collected sources");
    Ok(sources)
}

/// Read a document's raw bytes
pub fn read_source(path: &Path) -> Result<Vec<u8>, ChunkError> {
    fs::read(path).map_err(|source| ChunkError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "Статья 1. Текст.").unwrap();
        path
    }

    #[test]
    fn test_collect_walks_directories() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "a.txt");
        let b = touch(dir.path(), "nested/b.html");
        let c = touch(dir.path(), "nested/deeper/c.DOCX");
        touch(dir.path(), "image.png");
        touch(dir.path(), ".hidden/secret.txt");
        touch(dir.path(), "~$lock.docx");

        let sources = collect_sources(&[dir.path().to_path_buf()], &ParserRegistry::new()).unwrap();

        let mut expected = vec![a, b, c];
        expected.sort();
        assert_eq!(sources, expected);
    }

    #[test]
    fn test_explicit_file_always_kept() {
        let dir = TempDir::new().unwrap();
        let odd = touch(dir.path(), "law.rtf");

        let sources = collect_sources(&[odd.clone(), odd.clone()], &ParserRegistry::new()).unwrap();
        assert_eq!(sources, vec![odd]);
    }

    #[test]
    fn test_read_source_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.txt");

        match read_source(&missing) {
            Err(ChunkError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_source_bytes() {
        let dir = TempDir::new().unwrap();
        let path = touch(dir.path(), "a.txt");
        assert_eq!(read_source(&path).unwrap(), "Статья 1. Текст.".as_bytes());
    }

    #[test]
    fn test_should_ignore() {
        assert!(should_ignore(Path::new("docs/.git")));
        assert!(should_ignore(Path::new("~$draft.docx")));
        assert!(!should_ignore(Path::new("docs/law.txt")));
    }
}
