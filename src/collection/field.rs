//! Field-based operations over record-like values.
//!
//! A record is any value that can look up a named field, such as a map of
//! strings or a keyed [`Collection`]. Implement [`FieldAccess`] for your own
//! types to use `group_by_field`, `pluck`, and `key_by_field` with them.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use super::{Collection, EntryMap};
use crate::error::{CollectionError, Result};

/// Named-field lookup on a record value.
///
/// # Examples
///
/// ```rust
/// use orderly::{Collection, FieldAccess};
///
/// let person = Collection::from_entries([("name", "Rama"), ("department", "IT")]);
/// assert_eq!(person.field("department"), Some(&"IT"));
/// assert_eq!(person.field("age"), None);
/// ```
pub trait FieldAccess {
    /// The type of the field values.
    type Field;

    /// Returns the value of the field called `name`, if present.
    fn field(&self, name: &str) -> Option<&Self::Field>;
}

impl<K, V> FieldAccess for Collection<K, V>
where
    K: Borrow<str> + Hash + Eq,
{
    type Field = V;

    fn field(&self, name: &str) -> Option<&V> {
        self.get(name)
    }
}

impl<K, V, S> FieldAccess for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    S: BuildHasher,
{
    type Field = V;

    fn field(&self, name: &str) -> Option<&V> {
        self.get(name)
    }
}

impl<K, V> FieldAccess for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
{
    type Field = V;

    fn field(&self, name: &str) -> Option<&V> {
        self.get(name)
    }
}

impl<K, V> Collection<K, V>
where
    K: Hash + Eq + Clone,
    V: FieldAccess,
    V::Field: Clone,
{
    /// Buckets record values by the value of field `name`, in first-seen
    /// order, each group preserving source order.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::MissingField`] for the first record that
    /// lacks the field.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::{Collection, collect};
    ///
    /// let people = collect([
    ///     Collection::from_entries([("name", "Rama"), ("department", "IT")]),
    ///     Collection::from_entries([("name", "Perdana"), ("department", "IT")]),
    ///     Collection::from_entries([("name", "John"), ("department", "HR")]),
    /// ]);
    /// let groups = people.group_by_field("department").unwrap();
    /// assert_eq!(groups.keys().to_vec(), vec!["IT", "HR"]);
    /// assert_eq!(groups.get("IT").map(|group| group.len()), Some(2));
    /// ```
    pub fn group_by_field(&self, name: &str) -> Result<Collection<V::Field, Collection<usize, V>>>
    where
        V: Clone,
        V::Field: Hash + Eq,
    {
        let mut groups: EntryMap<V::Field, Collection<usize, V>> = EntryMap::default();
        for value in self.entries.values() {
            let group = field_of(value, name)?.clone();
            groups.entry(group).or_default().push_dense(value.clone());
        }
        Ok(Collection { entries: groups })
    }

    /// Extracts field `name` from every record. Keys are preserved.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::MissingField`] for the first record that
    /// lacks the field.
    pub fn pluck(&self, name: &str) -> Result<Collection<K, V::Field>> {
        let mut plucked = Collection::with_capacity(self.len());
        for (key, value) in self {
            plucked.put(key.clone(), field_of(value, name)?.clone());
        }
        Ok(plucked)
    }

    /// Re-keys every record by the value of field `name`. Later records win
    /// on collisions.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::MissingField`] for the first record that
    /// lacks the field.
    pub fn key_by_field(&self, name: &str) -> Result<Collection<V::Field, V>>
    where
        V: Clone,
        V::Field: Hash + Eq,
    {
        let mut keyed = Collection::with_capacity(self.len());
        for value in self.entries.values() {
            keyed.put(field_of(value, name)?.clone(), value.clone());
        }
        Ok(keyed)
    }
}

fn field_of<'a, V: FieldAccess>(value: &'a V, name: &str) -> Result<&'a V::Field> {
    value.field(name).ok_or_else(|| {
        tracing::debug!(field = name, "record is missing field");
        CollectionError::MissingField {
            field: name.to_string(),
        }
    })
}
