//! Transformation operations on [`Collection`].
//!
//! Every operation here borrows the receiver and returns a new collection.
//! Each method documents whether keys are preserved or re-assigned.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;

use super::{Collection, EntryMap};
use crate::error::{CollectionError, Result};

// =============================================================================
// Mapping
// =============================================================================

impl<K, V> Collection<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Maps every value through `function(value, key)`. Keys are preserved.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let doubled = collect([1, 2, 3]).map(|value, _| value * 2);
    /// assert_eq!(doubled.to_vec(), vec![2, 4, 6]);
    /// ```
    pub fn map<R, F>(&self, mut function: F) -> Collection<K, R>
    where
        F: FnMut(&V, &K) -> R,
    {
        self.iter()
            .map(|(key, value)| (key.clone(), function(value, key)))
            .collect_entries()
    }

    /// Maps every value through `function`, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `function`, unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let parsed: Result<_, std::num::ParseIntError> =
    ///     collect(["1", "2", "x"]).try_map(|text, _| text.parse::<i32>());
    /// assert!(parsed.is_err());
    /// ```
    pub fn try_map<R, E, F>(&self, mut function: F) -> Result<Collection<K, R>, E>
    where
        F: FnMut(&V, &K) -> Result<R, E>,
    {
        let mut entries = EntryMap::with_capacity_and_hasher(self.len(), Default::default());
        for (key, value) in self {
            entries.insert(key.clone(), function(value, key)?);
        }
        Ok(Collection { entries })
    }

    /// Lifts every value into `T` through its `From` conversion.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// #[derive(Debug, Clone, PartialEq)]
    /// struct Person(String);
    ///
    /// impl From<&str> for Person {
    ///     fn from(name: &str) -> Self {
    ///         Self(name.to_string())
    ///     }
    /// }
    ///
    /// let people = collect(["Rama"]).map_into::<Person>();
    /// assert_eq!(people.to_vec(), vec![Person("Rama".to_string())]);
    /// ```
    pub fn map_into<T>(&self) -> Collection<K, T>
    where
        V: Clone,
        T: From<V>,
    {
        self.map(|value, _| T::from(value.clone()))
    }

    /// Re-keys every value by `function(value, key)`. Later values win on
    /// key collisions.
    pub fn key_by<G, F>(&self, mut function: F) -> Collection<G, V>
    where
        V: Clone,
        G: Hash + Eq,
        F: FnMut(&V, &K) -> G,
    {
        self.iter()
            .map(|(key, value)| (function(value, key), value.clone()))
            .collect_entries()
    }

    /// Counts values per `function(value, key)` result, in first-seen order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let counts = collect(["a", "b", "a"]).count_by(|value, _| *value);
    /// assert_eq!(counts.all(), vec![("a", 2), ("b", 1)]);
    /// ```
    pub fn count_by<G, F>(&self, mut function: F) -> Collection<G, usize>
    where
        G: Hash + Eq,
        F: FnMut(&V, &K) -> G,
    {
        let mut counts: EntryMap<G, usize> = EntryMap::default();
        for (key, value) in self {
            *counts.entry(function(value, key)).or_insert(0) += 1;
        }
        Collection { entries: counts }
    }
}

// =============================================================================
// Grouping
// =============================================================================

impl<K, V> Collection<K, V>
where
    K: Hash + Eq,
{
    /// Groups the pairs returned by `function(value, key)`.
    ///
    /// `function` returns a single `(group_key, item)` pair; items are
    /// appended to their group in encounter order, and groups appear in
    /// first-seen order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let people = collect([("Rama", "IT"), ("Perdana", "IT"), ("John", "HR")]);
    /// let groups = people.map_to_groups(|(name, department), _| (*department, *name));
    /// assert_eq!(groups.get("IT").map(|group| group.to_vec()), Some(vec!["Rama", "Perdana"]));
    /// assert_eq!(groups.get("HR").map(|group| group.to_vec()), Some(vec!["John"]));
    /// ```
    pub fn map_to_groups<G, R, F>(&self, mut function: F) -> Collection<G, Collection<usize, R>>
    where
        G: Hash + Eq,
        F: FnMut(&V, &K) -> (G, R),
    {
        let mut groups: EntryMap<G, Collection<usize, R>> = EntryMap::default();
        for (key, value) in self {
            let (group, item) = function(value, key);
            groups.entry(group).or_default().push_dense(item);
        }
        Collection { entries: groups }
    }

    /// Buckets values by `function(value, key)`.
    ///
    /// Group keys are compared with exact `Eq`; normalise inside `function`
    /// (for example with `to_lowercase`) to group case-insensitively. Each
    /// group is a sequential collection preserving source order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let words = collect(["apple", "avocado", "banana"]);
    /// let groups = words.group_by(|word, _| word.chars().next());
    /// assert_eq!(groups.len(), 2);
    /// assert_eq!(groups.get(&Some('a')).map(|group| group.len()), Some(2));
    /// ```
    pub fn group_by<G, F>(&self, mut function: F) -> Collection<G, Collection<usize, V>>
    where
        V: Clone,
        G: Hash + Eq,
        F: FnMut(&V, &K) -> G,
    {
        self.map_to_groups(|value, key| (function(value, key), value.clone()))
    }
}

// =============================================================================
// Flattening and Combining
// =============================================================================

impl<K, V> Collection<K, V> {
    /// Maps every value to a sequence and concatenates the sequences into
    /// one sequential collection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let hobbies = collect([vec!["Coding", "Gaming"], vec!["Reading"]])
    ///     .flat_map(|hobbies, _| hobbies.clone());
    /// assert_eq!(hobbies.to_vec(), vec!["Coding", "Gaming", "Reading"]);
    /// ```
    pub fn flat_map<R, I, F>(&self, mut function: F) -> Collection<usize, R>
    where
        I: IntoIterator<Item = R>,
        F: FnMut(&V, &K) -> I,
    {
        self.iter()
            .flat_map(|(key, value)| function(value, key))
            .collect()
    }

    /// Concatenates values that are themselves sequences, one level deep,
    /// into one sequential collection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let flat = collect([vec![1, 2], vec![3], vec![]]).collapse();
    /// assert_eq!(flat.to_vec(), vec![1, 2, 3]);
    /// ```
    pub fn collapse(&self) -> Collection<usize, V::Item>
    where
        V: Clone + IntoIterator,
    {
        self.flat_map(|value, _| value.clone())
    }

    /// Re-indexes the values sequentially, dropping the keys.
    pub fn values(&self) -> Collection<usize, V>
    where
        V: Clone,
    {
        self.entries.values().cloned().collect()
    }

    /// Returns the keys as a sequential collection.
    pub fn keys(&self) -> Collection<usize, K>
    where
        K: Clone,
    {
        self.entries.keys().cloned().collect()
    }

    /// Pairs values positionally with the values of `other`.
    ///
    /// The result has `min(self.len(), other.len())` entries, re-indexed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let zipped = collect([1, 2, 3]).zip(&collect([4, 5]));
    /// assert_eq!(zipped.to_vec(), vec![(1, 4), (2, 5)]);
    /// ```
    pub fn zip<L, W>(&self, other: &Collection<L, W>) -> Collection<usize, (V, W)>
    where
        V: Clone,
        W: Clone,
    {
        self.entries
            .values()
            .zip(other.entries.values())
            .map(|(left, right)| (left.clone(), right.clone()))
            .collect()
    }

    /// Appends the values of `other` after the values of `self`, re-indexed
    /// sequentially. Keys of either side are not preserved.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let joined = collect([1, 2, 3]).concat(&collect([4, 5, 6]));
    /// assert_eq!(joined.to_vec(), vec![1, 2, 3, 4, 5, 6]);
    /// ```
    pub fn concat<L>(&self, other: &Collection<L, V>) -> Collection<usize, V>
    where
        V: Clone,
    {
        self.entries
            .values()
            .chain(other.entries.values())
            .cloned()
            .collect()
    }

    /// Uses the receiver's values as keys for the values of `values`,
    /// pairing them positionally.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::LengthMismatch`] when the two collections
    /// differ in length; no truncation is performed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let person = collect(["name", "country"]).combine(&collect(["Rama", "Indonesia"]));
    /// assert_eq!(
    ///     person.map(|combined| combined.all()),
    ///     Ok(vec![("name", "Rama"), ("country", "Indonesia")])
    /// );
    /// ```
    pub fn combine<L, W>(&self, values: &Collection<L, W>) -> Result<Collection<V, W>>
    where
        V: Hash + Eq + Clone,
        W: Clone,
    {
        if self.len() != values.len() {
            tracing::debug!(
                keys = self.len(),
                values = values.len(),
                "combine length mismatch"
            );
            return Err(CollectionError::LengthMismatch {
                keys: self.len(),
                values: values.len(),
            });
        }
        Ok(self
            .entries
            .values()
            .zip(values.entries.values())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect_entries())
    }
}

// =============================================================================
// Filtering
// =============================================================================

impl<K, V> Collection<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Keeps the entries for which `predicate(value, key)` holds. Keys are
    /// preserved, so sequential collections may end up with gaps.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let even = collect([1, 2, 3, 4]).filter(|value, _| value % 2 == 0);
    /// assert_eq!(even.all(), vec![(1, 2), (3, 4)]);
    /// ```
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.iter()
            .filter(|(key, value)| predicate(value, key))
            .map(clone_entry)
            .collect_entries()
    }

    /// Keeps the entries for which `predicate` returns `Ok(true)`, stopping
    /// at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `predicate`, unchanged.
    pub fn try_filter<E, F>(&self, mut predicate: F) -> Result<Self, E>
    where
        F: FnMut(&V, &K) -> Result<bool, E>,
    {
        let mut kept = Self::new();
        for (key, value) in self {
            if predicate(value, key)? {
                kept.entries.insert(key.clone(), value.clone());
            }
        }
        Ok(kept)
    }

    /// Keeps the entries for which `predicate(value, key)` does not hold.
    pub fn reject<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.filter(|value, key| !predicate(value, key))
    }

    /// Splits the collection into `(matching, non_matching)`, both keeping
    /// their original keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::Collection;
    ///
    /// let scores = Collection::from_entries([("Rama", 100), ("John", 80), ("Sam", 90)]);
    /// let (passed, failed) = scores.partition(|score, _| *score >= 90);
    /// assert_eq!(passed.all(), vec![("Rama", 100), ("Sam", 90)]);
    /// assert_eq!(failed.all(), vec![("John", 80)]);
    /// ```
    pub fn partition<F>(&self, mut predicate: F) -> (Self, Self)
    where
        F: FnMut(&V, &K) -> bool,
    {
        let mut matching = Self::new();
        let mut non_matching = Self::new();
        for (key, value) in self {
            let target = if predicate(value, key) {
                &mut matching
            } else {
                &mut non_matching
            };
            target.entries.insert(key.clone(), value.clone());
        }
        (matching, non_matching)
    }

    /// Keeps the first occurrence of every distinct value. Keys are preserved.
    pub fn unique(&self) -> Self
    where
        V: Hash + Eq,
    {
        let mut seen = HashSet::with_capacity(self.len());
        self.filter(|value, _| seen.insert(value.clone()))
    }

    /// Reverses the entry order. Keys stay attached to their values.
    pub fn reverse(&self) -> Self {
        self.iter().rev().map(clone_entry).collect_entries()
    }
}

// =============================================================================
// Positional Selection
// =============================================================================

impl<K, V> Collection<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Returns the entries from position `offset` on, at most `length` of
    /// them (`None` means the rest). Keys are preserved.
    ///
    /// A negative `offset` counts from the end. An offset past the end
    /// yields an empty collection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let numbers = collect([1, 2, 3, 4, 5, 6, 7, 8, 9]);
    /// assert_eq!(numbers.slice(3, None).to_vec(), vec![4, 5, 6, 7, 8, 9]);
    /// assert_eq!(numbers.slice(3, Some(2)).to_vec(), vec![4, 5]);
    /// assert_eq!(numbers.slice(-2, None).to_vec(), vec![8, 9]);
    /// assert!(numbers.slice(20, None).is_empty());
    /// ```
    pub fn slice(&self, offset: isize, length: Option<usize>) -> Self {
        let start = if offset < 0 {
            self.len().saturating_sub(offset.unsigned_abs())
        } else {
            offset.unsigned_abs()
        };
        self.iter()
            .skip(start)
            .take(length.unwrap_or(usize::MAX))
            .map(clone_entry)
            .collect_entries()
    }

    /// Returns the first `count` entries, or the last `|count|` entries when
    /// `count` is negative. Keys are preserved.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let numbers = collect([1, 2, 3, 4, 5]);
    /// assert_eq!(numbers.take(3).to_vec(), vec![1, 2, 3]);
    /// assert_eq!(numbers.take(-2).to_vec(), vec![4, 5]);
    /// ```
    pub fn take(&self, count: isize) -> Self {
        if count < 0 {
            self.slice(count, None)
        } else {
            self.slice(0, Some(count.unsigned_abs()))
        }
    }

    /// Takes entries from the start while `predicate` holds; the first
    /// failing entry and everything after it are dropped.
    pub fn take_while<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.iter()
            .take_while(|(key, value)| predicate(value, key))
            .map(clone_entry)
            .collect_entries()
    }

    /// Takes entries from the start until `predicate` holds; the first
    /// satisfying entry is excluded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let numbers = collect([1, 2, 3, 4]);
    /// assert_eq!(numbers.take_until(|value, _| *value == 3).to_vec(), vec![1, 2]);
    /// ```
    pub fn take_until<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.take_while(|value, key| !predicate(value, key))
    }

    /// Drops the first `count` entries. Keys of the rest are preserved.
    pub fn skip(&self, count: usize) -> Self {
        self.iter().skip(count).map(clone_entry).collect_entries()
    }

    /// Drops entries from the start while `predicate` holds.
    pub fn skip_while<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.iter()
            .skip_while(|(key, value)| predicate(value, key))
            .map(clone_entry)
            .collect_entries()
    }

    /// Drops entries from the start until `predicate` holds; the first
    /// satisfying entry is kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let numbers = collect([1, 2, 3, 4]);
    /// assert_eq!(numbers.skip_until(|value, _| *value == 3).to_vec(), vec![3, 4]);
    /// ```
    pub fn skip_until<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.skip_while(|value, key| !predicate(value, key))
    }

    /// Splits the collection into consecutive chunks of at most `size`
    /// entries. Keys are preserved inside each chunk; the last chunk may be
    /// shorter. A `size` of zero yields no chunks.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let chunks = collect([1, 2, 3, 4, 5]).chunk(2);
    /// let sizes: Vec<usize> = chunks.iter().map(|(_, chunk)| chunk.len()).collect();
    /// assert_eq!(sizes, vec![2, 2, 1]);
    /// ```
    pub fn chunk(&self, size: usize) -> Collection<usize, Self> {
        if size == 0 {
            return Collection::new();
        }
        let mut chunks = Collection::with_capacity(self.len().div_ceil(size));
        let mut current = Self::with_capacity(size);
        for (key, value) in self {
            current.entries.insert(key.clone(), value.clone());
            if current.len() == size {
                chunks.push_dense(std::mem::replace(&mut current, Self::with_capacity(size)));
            }
        }
        if current.is_not_empty() {
            chunks.push_dense(current);
        }
        chunks
    }
}

// =============================================================================
// Ordering
// =============================================================================

impl<K, V> Collection<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Sorts entries by value, ascending. The sort is stable and keys stay
    /// attached to their values; call [`values`](Self::values) to re-index.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let sorted = collect([3, 1, 2]).sort();
    /// assert_eq!(sorted.all(), vec![(1, 1), (2, 2), (0, 3)]);
    /// ```
    pub fn sort(&self) -> Self
    where
        V: Ord,
    {
        self.sort_by(Ord::cmp)
    }

    /// Sorts entries by value, descending. Equal values keep their relative
    /// order.
    pub fn sort_desc(&self) -> Self
    where
        V: Ord,
    {
        self.sort_by(|left, right| right.cmp(left))
    }

    /// Sorts entries with a comparator over values. The sort is stable.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let sorted = collect([2.5_f64, -1.0, 0.5]).sort_by(|left, right| left.total_cmp(right));
    /// assert_eq!(sorted.values().to_vec(), vec![-1.0, 0.5, 2.5]);
    /// ```
    pub fn sort_by<F>(&self, mut compare: F) -> Self
    where
        F: FnMut(&V, &V) -> Ordering,
    {
        let mut entries: Vec<(&K, &V)> = self.iter().collect();
        entries.sort_by(|(_, left), (_, right)| compare(left, right));
        entries.into_iter().map(clone_entry).collect_entries()
    }

    /// Sorts entries by a key extracted from each value. The sort is stable.
    pub fn sort_by_key<S, F>(&self, mut extract: F) -> Self
    where
        S: Ord,
        F: FnMut(&V) -> S,
    {
        self.sort_by(|left, right| extract(left).cmp(&extract(right)))
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn clone_entry<K: Clone, V: Clone>((key, value): (&K, &V)) -> (K, V) {
    (key.clone(), value.clone())
}

/// Collects `(key, value)` pairs into a [`Collection`].
trait CollectEntries<K, V>: Iterator<Item = (K, V)> + Sized {
    fn collect_entries(self) -> Collection<K, V>
    where
        K: Hash + Eq,
    {
        Collection::from_entries(self)
    }
}

impl<K, V, I: Iterator<Item = (K, V)>> CollectEntries<K, V> for I {}
