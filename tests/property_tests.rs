//! Property-Based Tests for the module builder
//!
//! These tests verify:
//! - Aggregation does not depend on module order
//! - Duplicate module names do not change the result
//! - Missing modules always fail
//! - Merging is idempotent and an empty merge only normalizes

use std::collections::BTreeSet;

use proptest::prelude::*;
use serde_json::{Value, json};

use archbuilder::{
    AggregatedResult, BuilderError, Registry, Selection, aggregate, merge, normalize,
};

const MODULE_COUNT: usize = 6;

/// Strategy for a `commons` registry with modules `m0`..`m5`
fn registry_strategy() -> impl Strategy<Value = Registry> {
    let artifacts = || proptest::collection::vec("[a-f]{1,3}", 0..4);
    proptest::collection::vec((artifacts(), artifacts(), artifacts(), artifacts()), MODULE_COUNT)
        .prop_map(|defs| {
            let mut modules = serde_json::Map::new();
            for (i, (packages, commands, services, aur_packages)) in defs.into_iter().enumerate() {
                modules.insert(
                    format!("m{}", i),
                    json!({
                        "packages": packages,
                        "commands": commands,
                        "services": services,
                        "aur_packages": aur_packages,
                    }),
                );
            }
            Registry::from_documents([("commons", Value::Object(modules))])
                .expect("generated registry is valid")
        })
}

/// Strategy for a list of module names plus a shuffled copy of it
fn names_strategy() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    proptest::collection::vec(0..MODULE_COUNT, 0..12).prop_flat_map(|indices| {
        let names: Vec<String> = indices.iter().map(|i| format!("m{}", i)).collect();
        (Just(names.clone()), Just(names).prop_shuffle())
    })
}

fn selection(names: &[String]) -> Selection {
    Selection::from_document(json!({"modules": {"commons": names}})).expect("valid selection")
}

fn package_list_strategy() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-f]{1,3}", 0..8)
}

fn sorted_unique(items: &[String]) -> Value {
    let set: BTreeSet<&String> = items.iter().collect();
    json!(set)
}

proptest! {
    /// Reordering the module list does not change the result
    #[test]
    fn aggregate_is_order_independent(registry in registry_strategy(), (names, shuffled) in names_strategy()) {
        let a = aggregate(&selection(&names), &registry).unwrap();
        let b = aggregate(&selection(&shuffled), &registry).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Listing a module twice is the same as listing it once
    #[test]
    fn aggregate_ignores_duplicates(registry in registry_strategy(), (names, _) in names_strategy()) {
        let unique: Vec<String> = names.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect();
        let mut doubled = names.clone();
        doubled.extend(names.iter().cloned());

        let a = aggregate(&selection(&doubled), &registry).unwrap();
        let b = aggregate(&selection(&unique), &registry).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Any unknown module name fails the whole aggregation
    #[test]
    fn missing_module_always_fails(
        registry in registry_strategy(),
        (names, _) in names_strategy(),
        position in any::<proptest::sample::Index>(),
    ) {
        let mut names = names;
        let at = position.index(names.len() + 1);
        names.insert(at, "not-a-module".to_string());

        let result = aggregate(&selection(&names), &registry);
        let is_not_found = matches!(
            result,
            Err(BuilderError::ModuleNotFound { ref module, .. }) if module == "not-a-module"
        );
        prop_assert!(is_not_found);
    }

    /// Merging an empty aggregation only sorts and deduplicates
    #[test]
    fn empty_merge_normalizes(
        packages in package_list_strategy(),
        services in package_list_strategy(),
        commands in package_list_strategy(),
    ) {
        let base = json!({
            "hostname": "archbox",
            "packages": packages,
            "services": services,
            "custom_commands": commands,
        });

        let merged = merge(&base, &AggregatedResult::default()).unwrap();
        prop_assert_eq!(&merged, &normalize(&base).unwrap());

        let doc = merged.into_document();
        prop_assert_eq!(&doc["packages"], &sorted_unique(&packages));
        prop_assert_eq!(&doc["services"], &sorted_unique(&services));
        prop_assert_eq!(&doc["custom_commands"], &sorted_unique(&commands));
        prop_assert_eq!(&doc["hostname"], &json!("archbox"));
    }

    /// merge(merge(base, agg), agg) == merge(base, agg)
    #[test]
    fn merge_is_idempotent(
        registry in registry_strategy(),
        (names, _) in names_strategy(),
        packages in package_list_strategy(),
    ) {
        let aggregated = aggregate(&selection(&names), &registry).unwrap();
        let base = json!({"packages": packages});

        let once = merge(&base, &aggregated).unwrap();
        let twice = merge(&once.as_document(), &aggregated).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Merged lists contain every base entry and every aggregated entry
    #[test]
    fn merge_never_drops_entries(
        registry in registry_strategy(),
        (names, _) in names_strategy(),
        packages in package_list_strategy(),
    ) {
        let aggregated = aggregate(&selection(&names), &registry).unwrap();
        let merged = merge(&json!({"packages": packages}), &aggregated).unwrap().into_document();

        let out: BTreeSet<String> = serde_json::from_value(merged["packages"].clone()).unwrap();
        for p in packages.iter().chain(aggregated.packages.iter()) {
            prop_assert!(out.contains(p));
        }
    }
}
