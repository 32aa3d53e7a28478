//! Module registry.
//!
//! A registry maps a category (`commons`, `displays`, `environments`,
//! `graphics`, `aur`, or the flat [`FLAT_CATEGORY`]) to the modules declared
//! in that category's `<category>.jsonc` file:
//!
//! ```json
//! {
//!   "base": { "packages": ["git", "vim"], "services": ["sshd"] },
//!   "zsh":  { "packages": ["zsh"], "commands": ["chsh -s /bin/zsh"] }
//! }
//! ```
//!
//! The registry is built once per run and is read-only afterwards.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BuilderError, Result};
use crate::jsonc::Document;
use crate::source::DocumentSource;

/// Category used when the selection is a flat list of module names
pub const FLAT_CATEGORY: &str = "modules";

/// Category whose modules are installed through an AUR helper
pub const AUR_CATEGORY: &str = "aur";

/// File extension of category documents
pub const CATEGORY_EXTENSION: &str = "jsonc";

/// A named bundle of artifacts to install
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDefinition {
    #[serde(default)]
    pub packages: BTreeSet<String>,
    #[serde(default)]
    pub commands: BTreeSet<String>,
    #[serde(default)]
    pub services: BTreeSet<String>,
    #[serde(default)]
    pub aur_packages: BTreeSet<String>,
}

type Category = BTreeMap<String, ModuleDefinition>;

/// Category name -> module name -> definition
#[derive(Debug, Clone, Default)]
pub struct Registry {
    categories: BTreeMap<String, Category>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from already parsed category documents.
    pub fn from_documents<I, S>(documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Document)>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        for (category, document) in documents {
            let category = category.into();
            let origin = PathBuf::from(&category);
            registry.insert_category(category, document, &origin)?;
        }
        Ok(registry)
    }

    /// Load `<modules_dir>/<category>.jsonc` for every requested category.
    pub fn load<'a>(
        source: &dyn DocumentSource,
        modules_dir: &Path,
        categories: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self> {
        let mut registry = Self::new();
        for category in categories {
            if registry.has_category(category) {
                continue;
            }
            let path = category_path(modules_dir, category);
            let document = source.load(&path)?;
            registry.insert_category(category.to_string(), document, &path)?;
        }
        Ok(registry)
    }

    fn insert_category(&mut self, category: String, document: Document, origin: &Path) -> Result<()> {
        let Document::Object(entries) = document else {
            return Err(BuilderError::parse(
                origin,
                "category document must be an object of module definitions",
            ));
        };

        let mut modules = Category::new();
        for (name, value) in entries {
            let definition: ModuleDefinition = serde_json::from_value(value).map_err(|e| {
                BuilderError::parse(origin, format!("module '{}': {}", name, e))
            })?;
            modules.insert(name, definition);
        }

        debug!(category = %category, modules = modules.len(), "registered category");
        self.categories.insert(category, modules);
        Ok(())
    }

    /// Look up `module` in `category`.
    ///
    /// An unknown category and an unknown module both fail with
    /// [`BuilderError::ModuleNotFound`].
    pub fn resolve(&self, category: &str, module: &str) -> Result<&ModuleDefinition> {
        self.categories
            .get(category)
            .and_then(|modules| modules.get(module))
            .ok_or_else(|| BuilderError::module_not_found(category, module))
    }

    /// Find a module by bare name across every loaded category.
    ///
    /// The name must be defined in exactly one category.
    pub fn find(&self, module: &str) -> Result<(&str, &ModuleDefinition)> {
        let mut matches = self
            .categories
            .iter()
            .filter_map(|(category, modules)| {
                modules.get(module).map(|def| (category.as_str(), def))
            });

        let first = matches
            .next()
            .ok_or_else(|| BuilderError::module_not_found("*", module))?;

        if let Some((other, _)) = matches.next() {
            return Err(BuilderError::invalid_selection(format!(
                "module '{}' is defined in both {} and {}; use <category>/{}",
                module, first.0, other, module
            )));
        }

        Ok(first)
    }

    /// Names of the loaded categories, sorted
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Whether `category` has been loaded
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }
}

/// Path of the document that declares `category`
pub fn category_path(modules_dir: &Path, category: &str) -> PathBuf {
    modules_dir.join(format!("{}.{}", category, CATEGORY_EXTENSION))
}
