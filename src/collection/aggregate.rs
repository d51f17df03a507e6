//! Terminal and aggregate operations on [`Collection`].
//!
//! Searches return `Option`. Aggregates that have no meaningful value on an
//! empty collection (`reduce`, `avg`, `min`, `max`, `random`) return
//! [`CollectionError::Empty`] instead of a numeric default.

use std::fmt::Display;
use std::iter::Sum;

use super::{Collection, empty};
use crate::error::{CollectionError, Result};
use crate::numeric::Numeric;

// =============================================================================
// Searching
// =============================================================================

impl<K, V> Collection<K, V> {
    /// Returns the first value, or `None` when empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// assert_eq!(collect([1, 2, 3]).first(), Some(&1));
    /// ```
    #[inline]
    pub fn first(&self) -> Option<&V> {
        self.entries.first().map(|(_, value)| value)
    }

    /// Returns the first value satisfying `predicate(value, key)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let numbers = collect([1, 2, 3, 4, 5, 6, 7, 8, 9]);
    /// assert_eq!(numbers.first_where(|value, _| *value > 5), Some(&6));
    /// assert_eq!(numbers.first_where(|value, _| *value > 9), None);
    /// ```
    pub fn first_where<F>(&self, mut predicate: F) -> Option<&V>
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.iter()
            .find(|(key, value)| predicate(value, key))
            .map(|(_, value)| value)
    }

    /// Returns the first value.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Empty`] if the collection is empty.
    pub fn first_or_fail(&self) -> Result<&V> {
        self.first().ok_or_else(|| empty("first_or_fail"))
    }

    /// Returns the first value satisfying `predicate(value, key)`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`] if no value matches.
    pub fn first_where_or_fail<F>(&self, predicate: F) -> Result<&V>
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.first_where(predicate)
            .ok_or_else(|| not_found("first_where_or_fail"))
    }

    /// Returns the last value, or `None` when empty.
    #[inline]
    pub fn last(&self) -> Option<&V> {
        self.entries.last().map(|(_, value)| value)
    }

    /// Returns the last value satisfying `predicate(value, key)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let numbers = collect([1, 2, 3, 4, 5, 6, 7, 8, 9]);
    /// assert_eq!(numbers.last_where(|value, _| *value < 5), Some(&4));
    /// ```
    pub fn last_where<F>(&self, mut predicate: F) -> Option<&V>
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.iter()
            .rev()
            .find(|(key, value)| predicate(value, key))
            .map(|(_, value)| value)
    }

    /// Returns the last value.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Empty`] if the collection is empty.
    pub fn last_or_fail(&self) -> Result<&V> {
        self.last().ok_or_else(|| empty("last_or_fail"))
    }

    /// Returns the last value satisfying `predicate(value, key)`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`] if no value matches.
    pub fn last_where_or_fail<F>(&self, predicate: F) -> Result<&V>
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.last_where(predicate)
            .ok_or_else(|| not_found("last_where_or_fail"))
    }

    /// Returns `true` if some value equals `needle`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let names = collect(["Rama", "Perdana", "Watkinson"]);
    /// assert!(names.contains(&"Rama"));
    /// assert!(!names.contains(&"John"));
    /// ```
    pub fn contains(&self, needle: &V) -> bool
    where
        V: PartialEq,
    {
        self.entries.values().any(|value| value == needle)
    }

    /// Returns `true` if some entry satisfies `predicate(value, key)`.
    pub fn contains_where<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.iter().any(|(key, value)| predicate(value, key))
    }

    /// Returns `true` if every entry satisfies `predicate(value, key)`.
    /// Vacuously true for an empty collection.
    pub fn every<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.iter().all(|(key, value)| predicate(value, key))
    }
}

// =============================================================================
// Random Selection
// =============================================================================

#[cfg(feature = "random")]
impl<K, V> Collection<K, V> {
    /// Returns a uniformly chosen value, using the thread-local generator.
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
    /// let numbers = collect([1, 2, 3]);
    /// let picked = numbers.random().unwrap();
    /// assert!(numbers.contains(picked));
    /// ```
    pub fn random(&self) -> Result<&V> {
        self.random_with(&mut rand::rng())
    }

    /// Returns a uniformly chosen value drawn from `generator`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Empty`] if the collection is empty.
    pub fn random_with<R>(&self, generator: &mut R) -> Result<&V>
    where
        R: rand::Rng + ?Sized,
    {
        if self.is_empty() {
            return Err(empty("random"));
        }
        let position = generator.random_range(0..self.len());
        tracing::trace!(position, length = self.len(), "random selection");
        self.entries
            .get_index(position)
            .map(|(_, value)| value)
            .ok_or_else(|| empty("random"))
    }
}

// =============================================================================
// Folding and Numeric Aggregates
// =============================================================================

impl<K, V> Collection<K, V> {
    /// Left fold seeded with the first value.
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
    /// let total = collect([1, 2, 3, 4, 5, 6, 7, 8, 9]).reduce(|carry, item| carry + item);
    /// assert_eq!(total, Ok(45));
    /// ```
    pub fn reduce<F>(&self, mut function: F) -> Result<V>
    where
        V: Clone,
        F: FnMut(V, &V) -> V,
    {
        let mut values = self.entries.values();
        let seed = values.next().cloned().ok_or_else(|| empty("reduce"))?;
        Ok(values.fold(seed, |carry, item| function(carry, item)))
    }

    /// Left fold from `initial`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let text = collect(["a", "b"]).fold(String::new(), |mut carry, item| {
    ///     carry.push_str(item);
    ///     carry
    /// });
    /// assert_eq!(text, "ab");
    /// ```
    pub fn fold<B, F>(&self, initial: B, mut function: F) -> B
    where
        F: FnMut(B, &V) -> B,
    {
        self.entries
            .values()
            .fold(initial, |carry, item| function(carry, item))
    }

    /// Sums the values. The sum of an empty collection is the additive
    /// identity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// assert_eq!(collect([1, 2, 3, 4, 5, 6, 7, 8, 9]).sum(), 45);
    /// ```
    pub fn sum(&self) -> V
    where
        V: for<'a> Sum<&'a V>,
    {
        self.entries.values().sum()
    }

    /// Sums `function(value)` over all values.
    pub fn sum_by<R, F>(&self, function: F) -> R
    where
        R: Sum,
        F: FnMut(&V) -> R,
    {
        self.entries.values().map(function).sum()
    }

    /// Returns the arithmetic mean of the values.
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
    /// assert_eq!(collect([1, 2, 3, 4, 5, 6, 7, 8, 9]).avg(), Ok(5.0));
    /// ```
    pub fn avg(&self) -> Result<f64>
    where
        V: Numeric,
    {
        self.avg_by(|value| value.to_f64())
    }

    /// Returns the arithmetic mean of `function(value)` over all values.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Empty`] if the collection is empty.
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_by<N, F>(&self, mut function: F) -> Result<f64>
    where
        N: Numeric,
        F: FnMut(&V) -> N,
    {
        if self.is_empty() {
            return Err(empty("avg"));
        }
        let total: f64 = self
            .entries
            .values()
            .map(|value| function(value).to_f64())
            .sum();
        Ok(total / self.len() as f64)
    }

    /// Returns the smallest value; the first one wins among equals.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Empty`] if the collection is empty.
    pub fn min(&self) -> Result<&V>
    where
        V: PartialOrd,
    {
        self.min_by_key(|value| value)
    }

    /// Returns the largest value; the first one wins among equals.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Empty`] if the collection is empty.
    pub fn max(&self) -> Result<&V>
    where
        V: PartialOrd,
    {
        self.max_by_key(|value| value)
    }

    /// Returns the value whose `extract(value)` is smallest.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Empty`] if the collection is empty.
    pub fn min_by_key<'a, S, F>(&'a self, extract: F) -> Result<&'a V>
    where
        S: PartialOrd,
        F: FnMut(&'a V) -> S,
    {
        self.select_by(extract, |candidate, best| candidate < best)
            .ok_or_else(|| empty("min"))
    }

    /// Returns the value whose `extract(value)` is largest.
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
    /// let words = collect(["fig", "banana", "kiwi"]);
    /// assert_eq!(words.max_by_key(|word| word.len()), Ok(&"banana"));
    /// ```
    pub fn max_by_key<'a, S, F>(&'a self, extract: F) -> Result<&'a V>
    where
        S: PartialOrd,
        F: FnMut(&'a V) -> S,
    {
        self.select_by(extract, |candidate, best| candidate > best)
            .ok_or_else(|| empty("max"))
    }

    fn select_by<'a, S, F, P>(&'a self, mut extract: F, mut replaces: P) -> Option<&'a V>
    where
        F: FnMut(&'a V) -> S,
        P: FnMut(&S, &S) -> bool,
    {
        let mut values = self.entries.values();
        let first = values.next()?;
        let mut best = (extract(first), first);
        for value in values {
            let key = extract(value);
            if replaces(&key, &best.0) {
                best = (key, value);
            }
        }
        Some(best.1)
    }
}

// =============================================================================
// Joining
// =============================================================================

impl<K, V: Display> Collection<K, V> {
    /// Concatenates the values with `glue` between them.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// assert_eq!(collect(["Rama", "Perdana", "Perdana"]).join("-"), "Rama-Perdana-Perdana");
    /// ```
    pub fn join(&self, glue: &str) -> String {
        self.join_with_last(glue, glue)
    }

    /// Concatenates the values with `glue` between them, except for the
    /// final pair, which is separated by `last_glue`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::collect;
    ///
    /// let names = collect(["Rama", "Perdana", "Perdana"]);
    /// assert_eq!(names.join_with_last("-", "_"), "Rama-Perdana_Perdana");
    /// ```
    pub fn join_with_last(&self, glue: &str, last_glue: &str) -> String {
        join_values(self.entries.values(), self.len(), glue, last_glue)
    }
}

/// Joins `length` displayable values; shared with the lazy pipeline.
pub(crate) fn join_values<'a, V, I>(values: I, length: usize, glue: &str, last_glue: &str) -> String
where
    V: Display + 'a,
    I: IntoIterator<Item = &'a V>,
{
    let mut joined = String::new();
    for (position, value) in values.into_iter().enumerate() {
        if position > 0 {
            joined.push_str(if position + 1 == length { last_glue } else { glue });
        }
        joined.push_str(&value.to_string());
    }
    joined
}

fn not_found(operation: &'static str) -> CollectionError {
    tracing::debug!(operation, "no matching element");
    CollectionError::NotFound { operation }
}
