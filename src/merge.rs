//! Override-union merge into an installer configuration.
//!
//! The base document is an archinstall-style configuration. Three list
//! fields grow by the aggregated artifacts; every other field is copied
//! verbatim:
//!
//! | Base field        | Unioned with               |
//! |-------------------|----------------------------|
//! | `packages`        | `AggregatedResult::packages` |
//! | `services`        | `AggregatedResult::services` |
//! | `custom_commands` | `AggregatedResult::commands` |
//!
//! Nothing in the base is ever removed. Merged lists are sorted and
//! deduplicated, so merging is idempotent.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::aggregate::AggregatedResult;
use crate::error::{BuilderError, Result};
use crate::jsonc::Document;

pub const PACKAGES_FIELD: &str = "packages";
pub const SERVICES_FIELD: &str = "services";
pub const CUSTOM_COMMANDS_FIELD: &str = "custom_commands";

/// The base configuration with its list fields unioned
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MergedConfig {
    document: Map<String, Value>,
}

impl MergedConfig {
    /// The merged document
    pub fn as_document(&self) -> Document {
        Value::Object(self.document.clone())
    }

    pub fn into_document(self) -> Document {
        Value::Object(self.document)
    }

    /// Read a field of the merged document
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.document.get(field)
    }

    /// Serialize with sorted keys and a trailing newline
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(&self.document)?;
        json.push('\n');
        Ok(json)
    }

    /// Write the merged document to `path`, creating parent directories
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;

        let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };

        // Readers see either the previous file or the complete new one
        let mut staged = tempfile::NamedTempFile::new_in(dir)?;
        staged.write_all(json.as_bytes())?;
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|e| e.error)?;

        info!(path = %path.display(), "wrote merged configuration");
        Ok(())
    }
}

/// Merge `aggregated` into `base`.
///
/// A missing or `null` list field counts as empty. A list field of any
/// other type, or one holding a non-string entry, is a
/// [`BuilderError::MalformedBase`].
pub fn merge(base: &Document, aggregated: &AggregatedResult) -> Result<MergedConfig> {
    let Value::Object(base) = base else {
        return Err(BuilderError::malformed_base(
            "<root>",
            "base configuration must be an object",
        ));
    };

    let mut document = base.clone();
    for (field, additions) in [
        (PACKAGES_FIELD, &aggregated.packages),
        (SERVICES_FIELD, &aggregated.services),
        (CUSTOM_COMMANDS_FIELD, &aggregated.commands),
    ] {
        let mut merged = read_list(base, field)?;
        merged.extend(additions.iter().cloned());
        document.insert(
            field.to_string(),
            Value::Array(merged.into_iter().map(Value::String).collect()),
        );
    }

    Ok(MergedConfig { document })
}

/// Sort and deduplicate the mergeable fields of `base` without adding anything
pub fn normalize(base: &Document) -> Result<MergedConfig> {
    merge(base, &AggregatedResult::default())
}

fn read_list(base: &Map<String, Value>, field: &str) -> Result<BTreeSet<String>> {
    match base.get(field) {
        None | Some(Value::Null) => Ok(BTreeSet::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(BuilderError::malformed_base(
                    field,
                    format!("expected a list of strings, found entry {}", other),
                )),
            })
            .collect(),
        Some(other) => Err(BuilderError::malformed_base(
            field,
            format!("expected a list, found {}", type_name(other)),
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn to_set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn aggregated(packages: &[&str], services: &[&str], commands: &[&str]) -> AggregatedResult {
        AggregatedResult {
            packages: to_set(packages),
            services: to_set(services),
            commands: to_set(commands),
            ..AggregatedResult::default()
        }
    }

    #[test]
    fn test_merge_keeps_base_and_sorts() {
        let base = json!({"packages": ["git"], "services": []});
        let merged = merge(&base, &aggregated(&["vim", "git"], &[], &[])).unwrap();

        assert_eq!(merged.get("packages"), Some(&json!(["git", "vim"])));
        assert_eq!(merged.get("services"), Some(&json!([])));
        assert_eq!(merged.get("custom_commands"), Some(&json!([])));
    }

    #[test]
    fn test_merge_passes_other_fields_through() {
        let base = json!({
            "hostname": "archbox",
            "disk_config": {"config_type": "default_layout"},
            "kernels": ["linux"],
            "packages": ["git"]
        });
        let merged = merge(&base, &aggregated(&["vim"], &["sshd"], &["echo done"])).unwrap();
        let doc = merged.into_document();

        assert_eq!(doc["hostname"], "archbox");
        assert_eq!(doc["disk_config"], json!({"config_type": "default_layout"}));
        assert_eq!(doc["kernels"], json!(["linux"]));
        assert_eq!(doc["services"], json!(["sshd"]));
        assert_eq!(doc["custom_commands"], json!(["echo done"]));
    }

    #[test]
    fn test_merge_commands_go_to_custom_commands() {
        let base = json!({"custom_commands": ["b", "a", "b"]});
        let merged = merge(&base, &aggregated(&[], &[], &["c"])).unwrap();
        assert_eq!(merged.get("custom_commands"), Some(&json!(["a", "b", "c"])));
    }

    #[test]
    fn test_null_field_is_empty() {
        let merged = merge(&json!({"packages": null}), &aggregated(&["git"], &[], &[])).unwrap();
        assert_eq!(merged.get("packages"), Some(&json!(["git"])));
    }

    #[test]
    fn test_malformed_fields() {
        for (base, field) in [
            (json!({"packages": "git vim"}), "packages"),
            (json!({"services": {"sshd": true}}), "services"),
            (json!({"custom_commands": ["ok", 3]}), "custom_commands"),
        ] {
            match merge(&base, &AggregatedResult::default()).unwrap_err() {
                BuilderError::MalformedBase { field: f, .. } => assert_eq!(f, field),
                other => panic!("Expected MalformedBase, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_non_object_base() {
        let err = merge(&json!(["git"]), &AggregatedResult::default()).unwrap_err();
        assert!(matches!(err, BuilderError::MalformedBase { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_merge_idempotent() {
        let base = json!({"packages": ["vim", "git"], "services": ["sshd"]});
        let agg = aggregated(&["zsh"], &["sddm"], &["echo"]);
        let once = merge(&base, &agg).unwrap();
        let twice = merge(&once.as_document(), &agg).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_pretty_output_sorted_keys() {
        let merged = normalize(&json!({"zeta": 1, "alpha": 2})).unwrap();
        let text = merged.to_json_pretty().unwrap();
        let alpha = text.find("\"alpha\"").unwrap();
        let zeta = text.find("\"zeta\"").unwrap();
        assert!(alpha < zeta);
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn test_save_to_file_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output").join("user_configuration.json");

        let merged = normalize(&json!({"packages": ["git"]})).unwrap();
        merged.save_to_file(&path).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, merged.into_document());
    }

    #[test]
    fn test_save_to_file_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_configuration.json");
        fs::write(&path, "stale contents that are longer than the new document").unwrap();

        let merged = normalize(&json!({"packages": ["git"]})).unwrap();
        merged.save_to_file(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), merged.to_json_pretty().unwrap());
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("user_configuration.json")]);
    }

    #[test]
    fn test_save_to_file_failure_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_configuration.json");
        fs::create_dir(&path).unwrap();

        let merged = normalize(&json!({})).unwrap();
        assert!(matches!(merged.save_to_file(&path), Err(BuilderError::Io(_))));

        assert!(path.is_dir());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
