//! Run configuration: where the builder reads and writes, and what it produces.

use std::path::PathBuf;

use crate::present::ListKind;

pub const DEFAULT_CONFIG_PATH: &str = "./builder.config.jsonc";
pub const DEFAULT_MODULES_DIR: &str = "./modules";
pub const DEFAULT_BASE_PATH: &str = "./user_configuration.json";
pub const DEFAULT_OUTPUT_PATH: &str = "./output/user_configuration.json";
pub const DEFAULT_LIST_DIR: &str = ".";

/// Filesystem locations used by one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPaths {
    /// Builder selection document
    pub config: PathBuf,
    /// Directory holding `<category>.jsonc` registries
    pub modules_dir: PathBuf,
    /// Installer configuration merged into
    pub base: PathBuf,
    /// Where the merged configuration is written
    pub output: PathBuf,
    /// Where `--file` list files are written
    pub list_dir: PathBuf,
}

impl Default for BuildPaths {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG_PATH),
            modules_dir: PathBuf::from(DEFAULT_MODULES_DIR),
            base: PathBuf::from(DEFAULT_BASE_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            list_dir: PathBuf::from(DEFAULT_LIST_DIR),
        }
    }
}

impl BuildPaths {
    /// Paths rooted at `dir` instead of the current directory
    pub fn rooted_at(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            config: dir.join("builder.config.jsonc"),
            modules_dir: dir.join("modules"),
            base: dir.join("user_configuration.json"),
            output: dir.join("output").join("user_configuration.json"),
            list_dir: dir,
        }
    }
}

/// What a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Merge into the base configuration and write the output document
    #[default]
    Merge,
    /// Print one aggregated list, or write it to a list file
    List { kind: ListKind, to_file: bool },
    /// Print the whole aggregated result as JSON
    Show,
}

/// A fully resolved invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildRequest {
    pub paths: BuildPaths,
    pub mode: Mode,
    /// Aggregate only this module (`category/name` or a bare name)
    pub module: Option<String>,
}
