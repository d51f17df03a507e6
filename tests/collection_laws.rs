//! Property-based tests for Collection.
//!
//! ## Structural Laws
//!
//! 1. **Order Preservation**: `collect(xs).to_vec() == xs`
//! 2. **Key Preservation**: `filter` and `map` keep every surviving key
//! 3. **Partition Completeness**: `matching ∪ rest == source`, disjoint, in order
//! 4. **Chunk Reconstruction**: concatenating the chunks yields the source
//! 5. **Zip Length**: `zip(a, b).len() == min(a.len(), b.len())`
//! 6. **Filter Idempotence**: `filter(p).filter(p) == filter(p)`
//! 7. **Take/Skip Split**: `take(n).concat(skip(n)) == values()`
//! 8. **Sort Stability**: `sort` is a stable permutation

use orderly::{Collection, collect};
use proptest::prelude::*;
use rstest::rstest;

fn values_strategy() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-1000..1000_i32, 0..40)
}

proptest! {
    #[test]
    fn prop_order_preservation(values in values_strategy()) {
        let collection = collect(values.clone());
        prop_assert_eq!(collection.to_vec(), values.clone());
        prop_assert_eq!(collection.keys().to_vec(), (0..values.len()).collect::<Vec<_>>());
    }

    #[test]
    fn prop_map_preserves_keys(values in values_strategy()) {
        let collection = collect(values);
        let mapped = collection.map(|value, _| i64::from(*value) * 2);
        prop_assert_eq!(mapped.keys(), collection.keys());
    }

    #[test]
    fn prop_filter_keeps_surviving_keys(values in values_strategy()) {
        let collection = collect(values);
        let kept = collection.filter(|value, _| value % 3 == 0);
        for (key, value) in &kept {
            prop_assert_eq!(collection.get(key), Some(value));
        }
    }

    #[test]
    fn prop_filter_idempotence(values in values_strategy()) {
        let collection = collect(values);
        let once = collection.filter(|value, _| *value > 0);
        let twice = once.filter(|value, _| *value > 0);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_partition_completeness(values in values_strategy()) {
        let collection = collect(values);
        let (matching, rest) = collection.partition(|value, _| value % 2 == 0);

        prop_assert_eq!(matching.len() + rest.len(), collection.len());
        prop_assert!(matching.every(|value, _| value % 2 == 0));
        prop_assert!(rest.every(|value, _| value % 2 != 0));

        let mut merged = matching.all();
        merged.extend(rest.all());
        merged.sort_by_key(|(key, _)| *key);
        prop_assert_eq!(merged, collection.all());
    }

    #[test]
    fn prop_chunk_reconstruction(values in values_strategy(), size in 1..8_usize) {
        let collection = collect(values);
        let chunks = collection.chunk(size);

        prop_assert!(chunks.every(|chunk, _| chunk.len() <= size && chunk.is_not_empty()));
        let rebuilt: Vec<(usize, i32)> = chunks
            .into_values()
            .into_iter()
            .flat_map(|chunk| chunk.all())
            .collect();
        prop_assert_eq!(rebuilt, collection.all());
    }

    #[test]
    fn prop_zip_length(left in values_strategy(), right in values_strategy()) {
        let zipped = collect(left.clone()).zip(&collect(right.clone()));
        prop_assert_eq!(zipped.len(), left.len().min(right.len()));
    }

    #[test]
    fn prop_take_skip_split(values in values_strategy(), count in 0..50_usize) {
        let collection = collect(values);
        let signed = isize::try_from(count).unwrap();
        let rebuilt = collection.take(signed).concat(&collection.skip(count));
        prop_assert_eq!(rebuilt, collection.values());
    }

    #[test]
    fn prop_negative_take_is_suffix(values in values_strategy(), count in 0..50_usize) {
        let collection = collect(values.clone());
        let signed = isize::try_from(count).unwrap();
        let suffix = collection.take(-signed).to_vec();
        let start = values.len().saturating_sub(count);
        prop_assert_eq!(suffix, values[start..].to_vec());
    }

    #[test]
    fn prop_sort_is_stable_permutation(values in prop::collection::vec((0..5_u8, any::<u16>()), 0..40)) {
        let collection = collect(values.clone());
        let sorted = collection.sort_by_key(|(rank, _)| *rank);

        let mut expected = values;
        expected.sort_by_key(|(rank, _)| *rank);
        prop_assert_eq!(sorted.to_vec(), expected);
        prop_assert_eq!(sorted.len(), collection.len());
    }

    #[test]
    fn prop_concat_length(left in values_strategy(), right in values_strategy()) {
        let joined = collect(left.clone()).concat(&collect(right.clone()));
        prop_assert_eq!(joined.len(), left.len() + right.len());
        prop_assert_eq!(joined.to_vec(), [left, right].concat());
    }

    #[test]
    fn prop_sum_matches_iterator_sum(values in values_strategy()) {
        let expected: i32 = values.iter().sum();
        prop_assert_eq!(collect(values).sum(), expected);
    }

    #[test]
    fn prop_reduce_agrees_with_fold(values in prop::collection::vec(-1000..1000_i64, 1..40)) {
        let collection = collect(values);
        let reduced = collection.reduce(|carry, item| carry + item);
        let first = *collection.first().unwrap();
        let folded = collection.skip(1).fold(first, |carry, item| carry + item);
        prop_assert_eq!(reduced, Ok(folded));
    }

    #[test]
    fn prop_group_by_covers_every_value(values in values_strategy()) {
        let collection = collect(values);
        let groups = collection.group_by(|value, _| value.rem_euclid(4));
        let total: usize = groups.iter().map(|(_, group)| group.len()).sum();
        prop_assert_eq!(total, collection.len());
        for (remainder, group) in &groups {
            prop_assert!(group.every(|value, _| value.rem_euclid(4) == *remainder));
        }
    }
}

#[rstest]
fn test_equality_respects_order() {
    let forward: Collection<&str, i32> = Collection::from_entries([("a", 1), ("b", 2)]);
    let backward: Collection<&str, i32> = Collection::from_entries([("b", 2), ("a", 1)]);
    assert_ne!(forward, backward);
}
