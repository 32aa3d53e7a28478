//! Output formatting for aggregated lists.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use strum::{Display, EnumIter, EnumString};
use tracing::info;

use crate::aggregate::AggregatedResult;
use crate::error::{BuilderError, Result};

/// Which aggregated list to print
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum ListKind {
    #[strum(to_string = "packages", serialize = "pkgs")]
    Packages,
    #[strum(to_string = "commands", serialize = "cmds")]
    Commands,
    #[strum(to_string = "services")]
    Services,
    #[strum(to_string = "aurpkgs")]
    AurPackages,
    #[strum(to_string = "aurcmds")]
    AurCommands,
}

impl ListKind {
    /// Parse a list name, rejecting unknown names as an invalid selection
    pub fn parse(name: &str) -> Result<Self> {
        Self::from_str(name).map_err(|_| {
            BuilderError::invalid_selection(format!(
                "unknown list '{}' (expected packages, commands, services, aurpkgs or aurcmds)",
                name
            ))
        })
    }

    /// The list of this kind in `result`
    pub fn select(self, result: &AggregatedResult) -> &BTreeSet<String> {
        match self {
            Self::Packages => &result.packages,
            Self::Commands => &result.commands,
            Self::Services => &result.services,
            Self::AurPackages => &result.aur_packages,
            Self::AurCommands => &result.aur_commands,
        }
    }

    /// File name used by `--file`
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Packages => "output_pkgs.list",
            Self::Commands => "output_cmds.list",
            Self::Services => "output_services.list",
            Self::AurPackages => "output_aur_pkgs.list",
            Self::AurCommands => "output_aur_cmds.list",
        }
    }
}

/// One item per line with a trailing newline; empty input renders as nothing
pub fn render_list<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    items.into_iter().fold(String::new(), |mut out, item| {
        out.push_str(item);
        out.push('\n');
        out
    })
}

/// Write the `kind` list into `dir`, returning the path written
pub fn write_list_file(dir: &Path, kind: ListKind, items: &BTreeSet<String>) -> Result<PathBuf> {
    let path = dir.join(kind.file_name());
    fs::write(&path, render_list(items))?;
    info!(path = %path.display(), items = items.len(), list = %kind, "wrote list file");
    Ok(path)
}
