//! Arch Module Builder Library
//!
//! Resolves a declarative module selection into deduplicated package,
//! command, service and AUR lists, and merges them into an archinstall
//! configuration.

pub mod aggregate;
pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod jsonc;
pub mod logging;
pub mod merge;
pub mod present;
pub mod registry;
pub mod selection;
pub mod source;

// Re-export main types for convenience
pub use aggregate::{AggregatedResult, aggregate};
pub use builder::{Outcome, collect, run};
pub use config::{BuildPaths, BuildRequest, Mode};
pub use error::{BuilderError, Result};
pub use jsonc::{Document, ParseError};
pub use merge::{MergedConfig, merge, normalize};
pub use present::ListKind;
pub use registry::{ModuleDefinition, Registry};
pub use selection::{ModuleRef, ModuleSelection, Selection};
pub use source::{DocumentSource, FsSource, MemorySource};
