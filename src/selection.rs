//! Builder selection.
//!
//! The selection is the `builder.config.jsonc` document. `modules` is either
//! a flat list resolved against the [`FLAT_CATEGORY`] registry or an object
//! grouped by category. `custom` and `aur` are optional inline modules that
//! bypass the registry:
//!
//! ```json
//! {
//!   "modules": {
//!     "commons": ["base", "zsh"],
//!     "environments": ["kde"]
//!   },
//!   "custom": { "packages": ["htop"], "commands": [] },
//!   "aur": { "packages": ["paru-bin"] }
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::error::{BuilderError, Result};
use crate::jsonc::Document;
use crate::registry::{FLAT_CATEGORY, Registry};
use crate::source::DocumentSource;

/// Requested module names, flat or grouped by category
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ModuleSelection {
    Flat(Vec<String>),
    Grouped(BTreeMap<String, Vec<String>>),
}

impl Default for ModuleSelection {
    fn default() -> Self {
        ModuleSelection::Grouped(BTreeMap::new())
    }
}

/// Packages and commands listed directly in the selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InlineModule {
    #[serde(default, deserialize_with = "null_as_default")]
    pub packages: BTreeSet<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub commands: BTreeSet<String>,
}

impl InlineModule {
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.commands.is_empty()
    }
}

/// A run's requested modules plus inline overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Selection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub modules: ModuleSelection,
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom: InlineModule,
    #[serde(default, deserialize_with = "null_as_default")]
    pub aur: InlineModule,
}

/// An explicit `null` reads the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Selection {
    /// Interpret a parsed builder document as a selection.
    ///
    /// Unrelated top-level keys are ignored.
    pub fn from_document(document: Document) -> Result<Self> {
        if !document.is_object() {
            return Err(BuilderError::invalid_selection(
                "builder configuration must be an object",
            ));
        }

        let selection: Self = serde_json::from_value(document).map_err(|e| {
            BuilderError::invalid_selection(format!(
                "expected \"modules\" to be a list or an object of lists, and \"custom\"/\"aur\" \
                 to hold \"packages\"/\"commands\" lists ({})",
                e
            ))
        })?;
        selection.validate()?;
        Ok(selection)
    }

    /// Load and interpret the builder document at `path`
    pub fn load(source: &dyn DocumentSource, path: &Path) -> Result<Self> {
        Self::from_document(source.load(path)?)
    }

    /// A selection of exactly one module, with no inline overrides
    pub fn single(category: impl Into<String>, module: impl Into<String>) -> Self {
        let mut grouped = BTreeMap::new();
        grouped.insert(category.into(), vec![module.into()]);
        Self {
            modules: ModuleSelection::Grouped(grouped),
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<()> {
        for (category, module) in self.entries() {
            if category.is_empty() {
                return Err(BuilderError::invalid_selection("category names must not be empty"));
            }
            if module.is_empty() {
                return Err(BuilderError::invalid_selection(format!(
                    "empty module name in {}",
                    category
                )));
            }
        }
        Ok(())
    }

    /// `(category, module)` pairs in resolution order: categories sorted, then list order
    pub fn entries(&self) -> Vec<(&str, &str)> {
        match &self.modules {
            ModuleSelection::Flat(names) => names
                .iter()
                .map(|name| (FLAT_CATEGORY, name.as_str()))
                .collect(),
            ModuleSelection::Grouped(groups) => groups
                .iter()
                .flat_map(|(category, names)| {
                    names.iter().map(move |name| (category.as_str(), name.as_str()))
                })
                .collect(),
        }
    }

    /// Distinct categories referenced by the selection, sorted
    pub fn categories(&self) -> BTreeSet<&str> {
        match &self.modules {
            ModuleSelection::Flat(_) => BTreeSet::from([FLAT_CATEGORY]),
            ModuleSelection::Grouped(groups) => groups.keys().map(String::as_str).collect(),
        }
    }

    /// Whether nothing at all is selected
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty() && self.custom.is_empty() && self.aur.is_empty()
    }
}

/// A `--module` argument: `category/name` or a bare `name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRef {
    pub category: Option<String>,
    pub name: String,
}

impl ModuleRef {
    pub fn parse(reference: &str) -> Result<Self> {
        let (category, name) = match reference.split_once('/') {
            Some((category, name)) => (Some(category.trim().to_string()), name.trim()),
            None => (None, reference.trim()),
        };

        if name.is_empty() || category.as_deref() == Some("") {
            return Err(BuilderError::invalid_selection(format!(
                "invalid module reference '{}'",
                reference
            )));
        }

        Ok(Self {
            category,
            name: name.to_string(),
        })
    }

    /// Categories the registry must provide to resolve this reference.
    ///
    /// A bare name is searched for in the categories `selection` uses.
    pub fn categories<'a>(&'a self, selection: &'a Selection) -> BTreeSet<&'a str> {
        match &self.category {
            Some(category) => BTreeSet::from([category.as_str()]),
            None => selection.categories(),
        }
    }

    /// Turn the reference into a one-module selection, locating bare names in `registry`
    pub fn to_selection(&self, registry: &Registry) -> Result<Selection> {
        let category = match &self.category {
            Some(category) => category.clone(),
            None => registry.find(&self.name)?.0.to_string(),
        };
        Ok(Selection::single(category, self.name.clone()))
    }
}
