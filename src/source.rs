//! Document sources.
//!
//! The registry and selection are read through [`DocumentSource`] so the
//! engine can run against files on disk or against in-memory fixtures.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{BuilderError, Result};
use crate::jsonc::{self, Document};

/// Provides parsed documents from named paths
pub trait DocumentSource {
    /// Load and parse the document at `path`.
    ///
    /// Fails with [`BuilderError::FileNotFound`] when the path does not exist
    /// and [`BuilderError::Parse`] when the content is not commented JSON.
    fn load(&self, path: &Path) -> Result<Document>;
}

/// Reads documents from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl DocumentSource for FsSource {
    fn load(&self, path: &Path) -> Result<Document> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => BuilderError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => BuilderError::Io(e),
        })?;
        debug!(path = %path.display(), bytes = text.len(), "loaded document");
        parse_at(path, &text)
    }
}

/// Serves documents from an in-memory map of path to text
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<PathBuf, String>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document, returning the source for chaining
    pub fn with(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    /// Add or replace a document
    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }
}

impl DocumentSource for MemorySource {
    fn load(&self, path: &Path) -> Result<Document> {
        let text = self
            .files
            .get(path)
            .ok_or_else(|| BuilderError::FileNotFound {
                path: path.to_path_buf(),
            })?;
        parse_at(path, text)
    }
}

fn parse_at(path: &Path, text: &str) -> Result<Document> {
    jsonc::parse(text).map_err(|e| BuilderError::parse(path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_fs_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsSource.load(&dir.path().join("absent.jsonc")).unwrap_err();
        assert!(matches!(err, BuilderError::FileNotFound { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_fs_source_parses_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{\n  // note\n  \"packages\": [\"git\"]\n}}").unwrap();

        let doc = FsSource.load(file.path()).unwrap();
        assert_eq!(doc["packages"][0], "git");
    }

    #[test]
    fn test_fs_source_parse_error_carries_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        match FsSource.load(file.path()).unwrap_err() {
            BuilderError::Parse { path, .. } => assert_eq!(path, file.path()),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_memory_source_roundtrip() {
        let source = MemorySource::new().with("a.jsonc", r#"{"x": 1}"#);
        assert_eq!(source.load(Path::new("a.jsonc")).unwrap()["x"], 1);
        assert!(matches!(
            source.load(Path::new("b.jsonc")).unwrap_err(),
            BuilderError::FileNotFound { .. }
        ));
    }
}
