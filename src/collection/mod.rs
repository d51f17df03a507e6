//! Eager, ordered, keyed collections.
//!
//! This module provides [`Collection`], a materialized container over an
//! ordered set of `(key, value)` entries together with a transformation
//! algebra (see the `transform` and `aggregate` submodules).
//!
//! # Key Modes
//!
//! A collection lives in one of two key modes, expressed by its key type:
//!
//! - **Sequential**: `Collection<usize, V>`. Keys are positions. Operations
//!   that build a fresh sequence (`values`, `collapse`, `flat_map`, `concat`,
//!   `zip`, `chunk`) assign new keys `0, 1, 2, ...`.
//! - **Associative**: `Collection<K, V>` for any `K: Hash + Eq`. Keys are
//!   opaque and preserved by value-only transforms such as `map` and `filter`.
//!
//! # Invariants
//!
//! - Insertion order is preserved unless an operation documents re-ordering
//!   (`sort`, `sort_desc`, `reverse`, ...).
//! - Keys are unique; inserting an existing key overwrites its value in place.
//! - Transformations take `&self` and return a new collection; only the
//!   explicit mutators (`push`, `pop`, `shift`, `put`, `forget`, `extend`)
//!   change the receiver.
//!
//! # Examples
//!
//! ```rust
//! use orderly::{Collection, collect};
//!
//! let numbers = collect([1, 2, 3]);
//! let doubled = numbers.map(|value, _| value * 2);
//! assert_eq!(doubled.to_vec(), vec![2, 4, 6]);
//! assert_eq!(numbers.to_vec(), vec![1, 2, 3]); // receiver unchanged
//!
//! let scores = Collection::from_entries([("Rama", 100), ("John", 80), ("Sam", 90)]);
//! let passed = scores.filter(|score, _| *score >= 90);
//! assert_eq!(passed.all(), vec![("Rama", 100), ("Sam", 90)]);
//! ```

mod aggregate;
mod field;
mod spread;
mod transform;

pub use field::FieldAccess;

#[cfg(feature = "lazy")]
pub(crate) use aggregate::join_values;

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

use crate::error::{CollectionError, Result};

// =============================================================================
// Key Index
// =============================================================================

/// Hash builder for the key index.
///
/// With the `fxhash` feature this is `rustc_hash::FxBuildHasher`, which is
/// faster but not HashDoS-resistant. Otherwise it is the std `RandomState`.
#[cfg(feature = "fxhash")]
pub type KeyState = rustc_hash::FxBuildHasher;

/// Hash builder for the key index (std SipHash).
#[cfg(not(feature = "fxhash"))]
pub type KeyState = std::hash::RandomState;

type EntryMap<K, V> = IndexMap<K, V, KeyState>;

/// Borrowing iterator over the `(key, value)` entries of a [`Collection`].
pub type Iter<'a, K, V> = indexmap::map::Iter<'a, K, V>;

/// Owning iterator over the `(key, value)` entries of a [`Collection`].
pub type IntoIter<K, V> = indexmap::map::IntoIter<K, V>;

// =============================================================================
// Collection Definition
// =============================================================================

/// An eager, insertion-ordered container of unique-keyed entries.
///
/// # Time Complexity
///
/// | Operation      | Complexity                          |
/// |----------------|-------------------------------------|
/// | `get` / `has`  | O(1) expected                       |
/// | `put`          | O(1) expected                       |
/// | `push`         | O(N) (scans for the next free index)|
/// | `pop`          | O(1)                                |
/// | `shift`        | O(N)                                |
/// | `forget`       | O(N)                                |
/// | `len`          | O(1)                                |
/// | transforms     | O(N) unless documented otherwise    |
///
/// # Examples
///
/// ```rust
/// use orderly::Collection;
///
/// let mut collection = Collection::new();
/// collection.push(1).push(2).push(3);
/// assert_eq!(collection.pop(), Ok(3));
/// assert_eq!(collection.to_vec(), vec![1, 2]);
/// ```
pub struct Collection<K, V> {
    entries: EntryMap<K, V>,
}

// Collections are plain owned data: they cross threads whenever their contents do.
static_assertions::assert_impl_all!(Collection<usize, i32>: Send, Sync, Clone);
static_assertions::assert_impl_all!(Collection<String, Vec<String>>: Send, Sync, Clone);
static_assertions::assert_not_impl_any!(Collection<usize, std::rc::Rc<i32>>: Send, Sync);

impl<K, V> Collection<K, V> {
    /// Creates a new empty collection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::Collection;
    ///
    /// let collection: Collection<usize, i32> = Collection::new();
    /// assert!(collection.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::with_hasher(KeyState::default()),
        }
    }

    /// Creates an empty collection with room for `capacity` entries.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity_and_hasher(capacity, KeyState::default()),
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the collection holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if the collection holds at least one entry.
    #[inline]
    pub fn is_not_empty(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Returns an iterator over `(key, value)` entries in insertion order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let collection = collect([10, 20, 30]);
    /// for (key, value) in collection.iter() {
    ///     assert_eq!((key + 1) * 10, *value);
    /// }
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.entries.iter()
    }

    /// Returns the entry at `position` in insertion order.
    #[inline]
    pub(crate) fn get_index(&self, position: usize) -> Option<(&K, &V)> {
        self.entries.get_index(position)
    }

    /// Removes and returns the last value in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Empty`] if the collection is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let mut collection = collect([1, 2, 3]);
    /// assert_eq!(collection.pop(), Ok(3));
    /// assert_eq!(collection.to_vec(), vec![1, 2]);
    /// ```
    pub fn pop(&mut self) -> Result<V> {
        self.entries
            .pop()
            .map(|(_, value)| value)
            .ok_or_else(|| empty("pop"))
    }

    /// Removes and returns the first value in insertion order.
    ///
    /// Remaining keys are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Empty`] if the collection is empty.
    pub fn shift(&mut self) -> Result<V> {
        self.entries
            .shift_remove_index(0)
            .map(|(_, value)| value)
            .ok_or_else(|| empty("shift"))
    }

    /// Returns the values in insertion order, cloned into a `Vec`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::Collection;
    ///
    /// let collection = Collection::from_entries([("a", 1), ("b", 2)]);
    /// assert_eq!(collection.to_vec(), vec![1, 2]);
    /// ```
    pub fn to_vec(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.entries.values().cloned().collect()
    }

    /// Returns every `(key, value)` entry in insertion order.
    ///
    /// This is the terminal view of the whole collection, keys included.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let collection = collect(["a", "b"]);
    /// assert_eq!(collection.all(), vec![(0, "a"), (1, "b")]);
    /// ```
    pub fn all(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.entries
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Consumes the collection, returning its values in order.
    pub fn into_values(self) -> Vec<V> {
        self.entries.into_values().collect()
    }

    /// Passes the collection to `function` and returns its result.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let total = collect([1, 2, 3]).pipe(|collection| collection.sum());
    /// assert_eq!(total, 6);
    /// ```
    pub fn pipe<R, F>(&self, function: F) -> R
    where
        F: FnOnce(&Self) -> R,
    {
        function(self)
    }

    /// Passes the collection to `function` for inspection and returns it.
    #[must_use]
    pub fn tap<F>(self, function: F) -> Self
    where
        F: FnOnce(&Self),
    {
        function(&self);
        self
    }
}

impl<K: Hash + Eq, V> Collection<K, V> {
    /// Builds a collection from `(key, value)` entries.
    ///
    /// Entries keep their source order; a repeated key overwrites the earlier
    /// value while keeping the earlier position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::Collection;
    ///
    /// let collection = Collection::from_entries([("a", 1), ("b", 2), ("a", 3)]);
    /// assert_eq!(collection.all(), vec![("a", 3), ("b", 2)]);
    /// ```
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let entries = entries.into_iter();
        let mut collection = Self::with_capacity(entries.size_hint().0);
        for (key, value) in entries {
            collection.entries.insert(key, value);
        }
        collection
    }

    /// Returns the value stored under `key`.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    /// Returns `true` if an entry is stored under `key`.
    #[inline]
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Stores `value` under `key`, overwriting any existing value in place.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::Collection;
    ///
    /// let mut collection = Collection::new();
    /// collection.put("name", "Rama").put("country", "Indonesia").put("name", "Perdana");
    /// assert_eq!(collection.all(), vec![("name", "Perdana"), ("country", "Indonesia")]);
    /// ```
    pub fn put(&mut self, key: K, value: V) -> &mut Self {
        self.entries.insert(key, value);
        self
    }

    /// Removes the entry under `key`, preserving the order of the rest.
    pub fn forget<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.shift_remove(key)
    }
}

impl<V> Collection<usize, V> {
    /// Builds a sequential collection keyed `0, 1, 2, ...`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::Collection;
    ///
    /// let collection = Collection::from_values(vec!["a", "b"]);
    /// assert_eq!(collection.get(&1), Some(&"b"));
    /// ```
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
    {
        Self::from_entries(values.into_iter().enumerate())
    }

    /// Appends `value` under the next free sequential key and returns the
    /// receiver for chaining.
    ///
    /// The next free key is one past the largest key present, or `0` when
    /// the collection is empty. If the largest key is `usize::MAX`, the
    /// smallest unused key is taken instead, so an existing entry is never
    /// overwritten.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::{Collection, collect};
    ///
    /// let mut collection = collect([1, 2, 3]).filter(|value, _| *value != 3);
    /// collection.push(4);
    /// assert_eq!(collection.all(), vec![(0, 1), (1, 2), (2, 4)]);
    ///
    /// let mut saturated = Collection::from_entries([(0, 'a'), (usize::MAX, 'b')]);
    /// saturated.push('c');
    /// assert_eq!(saturated.get(&1), Some(&'c'));
    /// ```
    pub fn push(&mut self, value: V) -> &mut Self {
        let key = self.next_index();
        self.entries.insert(key, value);
        self
    }

    /// Appends `value` under key `len()`.
    ///
    /// Only valid while the keys are exactly `0..len()`, as in the buckets
    /// built by grouping and chunking. O(1), unlike [`push`](Self::push).
    #[inline]
    pub(crate) fn push_dense(&mut self, value: V) {
        let key = self.entries.len();
        debug_assert!(!self.entries.contains_key(&key));
        self.entries.insert(key, value);
    }

    fn next_index(&self) -> usize {
        match self.entries.keys().max() {
            None => 0,
            Some(&largest) => largest
                .checked_add(1)
                .unwrap_or_else(|| self.smallest_free_index()),
        }
    }

    fn smallest_free_index(&self) -> usize {
        // A collection cannot hold every usize key, so a gap always exists.
        (0..=usize::MAX)
            .find(|key| !self.entries.contains_key(key))
            .unwrap_or(0)
    }
}

#[inline]
pub(crate) fn empty(operation: &'static str) -> CollectionError {
    tracing::debug!(operation, "collection is empty");
    CollectionError::Empty { operation }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for Collection<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for Collection<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Collection<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.entries.iter()).finish()
    }
}

/// Structural equality: same entries in the same order.
impl<K: PartialEq, V: PartialEq> PartialEq for Collection<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for Collection<K, V> {}

impl<K: Hash, V: Hash> Hash for Collection<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<V> FromIterator<V> for Collection<usize, V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}

/// Appends values the way repeated [`Collection::push`] calls would, without
/// rescanning the keys for every value.
impl<V> Extend<V> for Collection<usize, V> {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        let mut key = self.next_index();
        for value in iter {
            self.entries.insert(key, value);
            key = match key.checked_add(1) {
                Some(next) if !self.entries.contains_key(&next) => next,
                _ => self.next_index(),
            };
        }
    }
}

impl<V> From<Vec<V>> for Collection<usize, V> {
    fn from(values: Vec<V>) -> Self {
        Self::from_values(values)
    }
}

impl<V, const N: usize> From<[V; N]> for Collection<usize, V> {
    fn from(values: [V; N]) -> Self {
        Self::from_values(values)
    }
}

impl<K: Hash + Eq, V> From<BTreeMap<K, V>> for Collection<K, V> {
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::from_entries(map)
    }
}

impl<K, V> IntoIterator for Collection<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, K, V> IntoIterator for &'a Collection<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K: serde::Serialize, V: serde::Serialize> serde::Serialize for Collection<K, V> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct CollectionVisitor<K, V> {
    marker: std::marker::PhantomData<(K, V)>,
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for CollectionVisitor<K, V>
where
    K: serde::Deserialize<'de> + Hash + Eq,
    V: serde::Deserialize<'de>,
{
    type Value = Collection<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        const MAX_PREALLOCATE: usize = 4096;
        let capacity = access.size_hint().unwrap_or(0).min(MAX_PREALLOCATE);
        let mut collection = Collection::with_capacity(capacity);
        while let Some((key, value)) = access.next_entry()? {
            collection.put(key, value);
        }
        Ok(collection)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for Collection<K, V>
where
    K: serde::Deserialize<'de> + Hash + Eq,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(CollectionVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn new_is_empty() {
        let collection: Collection<usize, i32> = Collection::new();
        assert!(collection.is_empty());
        assert!(!collection.is_not_empty());
        assert_eq!(collection.len(), 0);
    }

    #[rstest]
    fn push_after_gap_uses_next_free_index() {
        let mut collection = Collection::from_entries([(0, 'a'), (5, 'b')]);
        collection.push('c');
        assert_eq!(collection.get(&6), Some(&'c'));
    }

    #[rstest]
    fn push_after_max_key_takes_smallest_free_key() {
        let mut collection = Collection::from_entries([(0, 'z'), (usize::MAX, 'a')]);
        collection.push('b').push('c');
        assert_eq!(
            collection.all(),
            vec![(0, 'z'), (usize::MAX, 'a'), (1, 'b'), (2, 'c')]
        );
    }

    #[rstest]
    fn extend_after_max_key_never_overwrites() {
        let mut collection = Collection::from_entries([(1, 'x'), (usize::MAX, 'y')]);
        collection.extend(['a', 'b', 'c']);
        assert_eq!(
            collection.all(),
            vec![(1, 'x'), (usize::MAX, 'y'), (0, 'a'), (2, 'b'), (3, 'c')]
        );
    }

    #[rstest]
    fn extend_near_max_key_wraps_to_free_keys() {
        let mut collection = Collection::from_entries([(usize::MAX - 1, 'p')]);
        collection.extend(['q', 'r']);
        assert_eq!(
            collection.all(),
            vec![(usize::MAX - 1, 'p'), (usize::MAX, 'q'), (0, 'r')]
        );
    }

    #[rstest]
    fn push_dense_appends_at_length() {
        let mut collection = Collection::new();
        for value in 0..5 {
            collection.push_dense(value * 10);
        }
        assert_eq!(collection.all(), vec![(0, 0), (1, 10), (2, 20), (3, 30), (4, 40)]);
    }

    #[rstest]
    fn extend_continues_sequence() {
        let mut collection = Collection::from_values([1, 2]);
        collection.extend([3, 4]);
        assert_eq!(collection.all(), vec![(0, 1), (1, 2), (2, 3), (3, 4)]);
    }

    #[rstest]
    fn equality_is_order_sensitive() {
        let left = Collection::from_entries([("a", 1), ("b", 2)]);
        let right = Collection::from_entries([("b", 2), ("a", 1)]);
        assert_ne!(left, right);
        assert_eq!(left, left.clone());
    }

    #[rstest]
    fn shift_and_pop_on_empty_fail() {
        let mut collection: Collection<usize, i32> = Collection::new();
        assert_eq!(collection.shift(), Err(CollectionError::Empty { operation: "shift" }));
        assert_eq!(collection.pop(), Err(CollectionError::Empty { operation: "pop" }));
    }

    #[rstest]
    fn forget_preserves_order_of_remaining() {
        let mut collection = Collection::from_entries([("a", 1), ("b", 2), ("c", 3)]);
        assert_eq!(collection.forget("b"), Some(2));
        assert_eq!(collection.all(), vec![("a", 1), ("c", 3)]);
    }

    #[rstest]
    fn debug_renders_as_map() {
        let collection = Collection::from_entries([("a", 1)]);
        assert_eq!(format!("{collection:?}"), r#"{"a": 1}"#);
    }
}
