use clap::Parser;
use std::path::PathBuf;

use crate::config::{
    BuildPaths, BuildRequest, DEFAULT_BASE_PATH, DEFAULT_CONFIG_PATH, DEFAULT_LIST_DIR,
    DEFAULT_MODULES_DIR, DEFAULT_OUTPUT_PATH, Mode,
};
use crate::error::Result;
use crate::present::ListKind;

/// Arch module builder - turn a module selection into install lists
/// or an archinstall configuration
#[derive(Parser, Debug)]
#[command(name = "archbuilder")]
#[command(about = "Aggregate install modules into package lists or a merged archinstall configuration")]
#[command(version)]
pub struct Cli {
    /// Print one list instead of merging (packages, commands, services, aurpkgs, aurcmds)
    #[arg(short, long, value_name = "KIND")]
    pub list: Option<String>,

    /// Aggregate only this module (`category/name`, or a bare name looked up
    /// in the categories the selection uses)
    #[arg(short, long, value_name = "MODULE")]
    pub module: Option<String>,

    /// Write the list to output_<kind>.list instead of stdout
    #[arg(short, long, requires = "list")]
    pub file: bool,

    /// Builder selection file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Directory containing <category>.jsonc module registries
    #[arg(long, default_value = DEFAULT_MODULES_DIR)]
    pub modules_dir: PathBuf,

    /// Base installer configuration to merge into
    #[arg(short, long, default_value = DEFAULT_BASE_PATH)]
    pub base: PathBuf,

    /// Where to write the merged configuration
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the arguments into a run request.
    ///
    /// An unknown `--list` kind is an invalid selection.
    pub fn into_request(self) -> Result<BuildRequest> {
        let mode = match (&self.list, &self.module) {
            (Some(kind), _) => Mode::List {
                kind: ListKind::parse(kind)?,
                to_file: self.file,
            },
            (None, Some(_)) => Mode::Show,
            (None, None) => Mode::Merge,
        };

        Ok(BuildRequest {
            paths: BuildPaths {
                config: self.config,
                modules_dir: self.modules_dir,
                base: self.base,
                output: self.output,
                list_dir: PathBuf::from(DEFAULT_LIST_DIR),
            },
            mode,
            module: self.module,
        })
    }
}
