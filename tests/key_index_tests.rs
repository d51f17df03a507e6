//! Tests for the key index.
//!
//! Lookup and ordering must not depend on the hash builder selected by the
//! `fxhash` feature: the same entries always give the same collection.

use orderly::Collection;
use rstest::rstest;

#[rstest]
fn test_same_key_resolves_under_any_hasher() {
    let strings = Collection::from_entries([("key".to_string(), 1)]);
    let integers = Collection::from_entries([(42_i32, 100)]);

    assert_eq!(strings.get("key"), Some(&1));
    assert_eq!(integers.get(&42), Some(&100));
}

#[rstest]
fn test_identical_entries_build_equal_collections() {
    let entries: Vec<(String, i32)> = ["alpha", "beta", "gamma", "delta"]
        .iter()
        .zip(1..)
        .map(|(name, value)| ((*name).to_string(), value))
        .collect();

    let first = Collection::from_entries(entries.clone());
    let second = Collection::from_entries(entries.clone());

    assert_eq!(first, second);
    assert_eq!(first.all(), entries);
}

#[rstest]
fn test_order_is_insertion_not_hash_order() {
    let mut collection = Collection::new();
    for value in (0..1000).rev() {
        collection.put(value, value * 2);
    }
    let keys = collection.keys().to_vec();
    assert_eq!(keys, (0..1000).rev().collect::<Vec<_>>());
}

#[rstest]
fn test_large_collection_lookup() {
    let collection: Collection<usize, usize> = (0..10_000).map(|value| value * 3).collect();
    for key in (0..10_000).step_by(997) {
        assert_eq!(collection.get(&key), Some(&(key * 3)));
    }
    assert!(!collection.has(&10_000));
}

#[rstest]
fn test_hash_of_equal_collections_matches() {
    use std::collections::HashSet;

    let mut seen = HashSet::new();
    seen.insert(Collection::from_entries([("a", 1), ("b", 2)]));
    assert!(seen.contains(&Collection::from_entries([("a", 1), ("b", 2)])));
    assert!(!seen.contains(&Collection::from_entries([("b", 2), ("a", 1)])));
}
