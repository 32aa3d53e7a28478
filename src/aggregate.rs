//! Module aggregation.
//!
//! Resolves every module in a [`Selection`] and unions their artifacts.
//!
//! # Routing Rules
//!
//! | Source                          | packages       | commands       | services | aur_packages   |
//! |---------------------------------|----------------|----------------|----------|----------------|
//! | module in any regular category  | `packages`     | `commands`     | `services` | `aur_packages` |
//! | module in the `aur` category    | `aur_packages` | `aur_commands` | `services` | `aur_packages` |
//! | inline `custom` block           | `packages`     | `commands`     | -        | -              |
//! | inline `aur` block              | `aur_packages` | `aur_commands` | -        | -              |
//!
//! AUR artifacts stay separate because they are installed through an AUR
//! helper instead of pacman.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::registry::{AUR_CATEGORY, ModuleDefinition, Registry};
use crate::selection::{InlineModule, Selection};

/// Union of every artifact the selection asks for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregatedResult {
    pub packages: BTreeSet<String>,
    pub commands: BTreeSet<String>,
    pub services: BTreeSet<String>,
    pub aur_packages: BTreeSet<String>,
    pub aur_commands: BTreeSet<String>,
}

impl AggregatedResult {
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
            && self.commands.is_empty()
            && self.services.is_empty()
            && self.aur_packages.is_empty()
            && self.aur_commands.is_empty()
    }

    fn add_module(&mut self, category: &str, module: &ModuleDefinition) {
        if category == AUR_CATEGORY {
            self.aur_packages.extend(module.packages.iter().cloned());
            self.aur_commands.extend(module.commands.iter().cloned());
        } else {
            self.packages.extend(module.packages.iter().cloned());
            self.commands.extend(module.commands.iter().cloned());
        }
        self.services.extend(module.services.iter().cloned());
        self.aur_packages.extend(module.aur_packages.iter().cloned());
    }

    fn add_custom(&mut self, custom: &InlineModule) {
        self.packages.extend(custom.packages.iter().cloned());
        self.commands.extend(custom.commands.iter().cloned());
    }

    fn add_aur(&mut self, aur: &InlineModule) {
        self.aur_packages.extend(aur.packages.iter().cloned());
        self.aur_commands.extend(aur.commands.iter().cloned());
    }
}

/// Resolve and union every module in `selection`.
///
/// Fails on the first module missing from `registry`; no partial result is
/// returned. An empty selection yields an empty result.
pub fn aggregate(selection: &Selection, registry: &Registry) -> Result<AggregatedResult> {
    // Resolve everything before touching the accumulators
    let resolved = selection
        .entries()
        .into_iter()
        .map(|(category, name)| {
            registry.resolve(category, name).map(|module| {
                debug!(category, module = name, "resolved module");
                (category, module)
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut result = AggregatedResult::default();
    for (category, module) in resolved {
        result.add_module(category, module);
    }
    result.add_custom(&selection.custom);
    result.add_aur(&selection.aur);

    info!(
        packages = result.packages.len(),
        commands = result.commands.len(),
        services = result.services.len(),
        aur_packages = result.aur_packages.len(),
        aur_commands = result.aur_commands.len(),
        "aggregated selection"
    );

    Ok(result)
}
