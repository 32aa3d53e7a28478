//! Run orchestration.
//!
//! Wires the pieces together for one invocation:
//!
//! ```text
//! builder.config.jsonc ─► Selection ─┐
//!                                    ├─► aggregate ─► AggregatedResult ─┬─► list / JSON
//! modules/<category>.jsonc ─► Registry                                  └─► merge(base) ─► output file
//! ```
//!
//! All inputs are read and validated before anything is written.

use std::path::PathBuf;

use tracing::info;

use crate::aggregate::{AggregatedResult, aggregate};
use crate::config::{BuildRequest, Mode};
use crate::error::Result;
use crate::merge::merge;
use crate::present::{render_list, write_list_file};
use crate::registry::Registry;
use crate::selection::{ModuleRef, Selection};
use crate::source::DocumentSource;

/// What a successful run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Text for standard output (may be empty)
    Printed(String),
    /// A list file was written
    ListFile(PathBuf),
    /// The merged configuration was written
    Merged(PathBuf),
}

/// Load the selection and registry, apply any `--module` override, and aggregate.
pub fn collect(request: &BuildRequest, source: &dyn DocumentSource) -> Result<AggregatedResult> {
    let paths = &request.paths;
    let selection = Selection::load(source, &paths.config)?;

    match &request.module {
        None => {
            let registry = Registry::load(source, &paths.modules_dir, selection.categories())?;
            aggregate(&selection, &registry)
        }
        Some(reference) => {
            let reference = ModuleRef::parse(reference)?;
            let registry =
                Registry::load(source, &paths.modules_dir, reference.categories(&selection))?;
            let single = reference.to_selection(&registry)?;
            info!(module = %reference.name, "aggregating single module");
            aggregate(&single, &registry)
        }
    }
}

/// Execute `request` against `source`.
pub fn run(request: &BuildRequest, source: &dyn DocumentSource) -> Result<Outcome> {
    let aggregated = collect(request, source)?;

    match request.mode {
        Mode::List { kind, to_file: false } => Ok(Outcome::Printed(render_list(kind.select(&aggregated)))),
        Mode::List { kind, to_file: true } => {
            let path = write_list_file(&request.paths.list_dir, kind, kind.select(&aggregated))?;
            Ok(Outcome::ListFile(path))
        }
        Mode::Show => {
            let mut json = serde_json::to_string_pretty(&aggregated)?;
            json.push('\n');
            Ok(Outcome::Printed(json))
        }
        Mode::Merge => {
            let base = source.load(&request.paths.base)?;
            let merged = merge(&base, &aggregated)?;
            merged.save_to_file(&request.paths.output)?;
            Ok(Outcome::Merged(request.paths.output.clone()))
        }
    }
}
