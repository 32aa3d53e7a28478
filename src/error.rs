//! Error handling module for the module builder
//!
//! Provides a closed set of error kinds using thiserror. Every variant carries
//! the context (path, category, module name) a caller needs to branch on the
//! kind instead of the message text.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the module builder
#[derive(Error, Debug)]
pub enum BuilderError {
    /// A referenced document (selection, module category, base config) is missing
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The selection names a module its category does not define
    #[error("Module '{module}' not found in {category}")]
    ModuleNotFound { category: String, module: String },

    /// A document could not be parsed as commented JSON
    #[error("Parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// The selection itself is unusable (bad shape, unknown list kind, ambiguous module)
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// The base configuration has a mergeable field of the wrong shape
    #[error("Malformed base configuration field '{field}': {reason}")]
    MalformedBase { field: String, reason: String },

    /// Other IO errors (permissions, writing output)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for builder operations
pub type Result<T> = std::result::Result<T, BuilderError>;

impl BuilderError {
    /// Create a module-not-found error
    pub fn module_not_found(category: impl Into<String>, module: impl Into<String>) -> Self {
        Self::ModuleNotFound {
            category: category.into(),
            module: module.into(),
        }
    }

    /// Create a parse error for a document at `path`
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid selection error
    pub fn invalid_selection(msg: impl Into<String>) -> Self {
        Self::InvalidSelection(msg.into())
    }

    /// Create a malformed base configuration error
    pub fn malformed_base(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedBase {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Process exit code for this error: 2 for a missing file, 1 for everything else
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            _ => 1,
        }
    }
}
