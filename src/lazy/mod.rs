//! Lazy, pull-based collection pipelines.
//!
//! This module provides [`LazyCollection`], a deferred pipeline over a
//! producer factory. Chaining an operation wraps the current pipeline in one
//! more stage and does no work; elements are produced only when a terminal
//! operation (`all`, `first`, `reduce`, iteration, ...) pulls them.
//!
//! # Pull Model
//!
//! - Every iteration invokes the factory afresh and pulls from the resulting
//!   producer one element at a time. Pulling one element runs only the work
//!   needed for that element; the producer keeps its own progress between
//!   pulls.
//! - `take`, `take_while`, `take_until`, and `first` stop pulling once
//!   satisfied, which makes unbounded producers usable.
//! - Materializing an unbounded pipeline that is never cut short does not
//!   return. This is the caller's responsibility.
//! - Re-iterating re-runs the factory. If the factory is not re-entrant
//!   (it consumes an external resource, say), use [`LazyCollection::remember`].
//!
//! # Resources
//!
//! A producer that owns an external resource releases it in `Drop`. The
//! producer is dropped as soon as the pulling terminal finishes, whether it
//! exhausted the producer or stopped early.
//!
//! # Examples
//!
//! ```rust
//! use orderly::LazyCollection;
//!
//! let naturals = LazyCollection::make(|| {
//!     let mut value = 0;
//!     std::iter::from_fn(move || {
//!         let current = value;
//!         value += 1;
//!         Some(current)
//!     })
//! });
//!
//! let first_ten = naturals.take(10).all();
//! assert_eq!(first_ten.to_vec(), vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
//! ```

mod remember;

use std::fmt::{self, Display};
use std::hash::Hash;
use std::iter::Sum;
use std::rc::Rc;

use crate::collection::{Collection, empty};
use crate::error::Result;
use crate::numeric::Numeric;

/// A suspended producer of `(key, value)` pairs.
type Producer<K, V> = Box<dyn Iterator<Item = (K, V)>>;

/// A re-invocable source of fresh producers.
type Factory<K, V> = Rc<dyn Fn() -> Producer<K, V>>;

// =============================================================================
// LazyCollection Definition
// =============================================================================

/// A deferred pipeline of `(key, value)` pairs over a producer factory.
///
/// Cloning a `LazyCollection` is O(1) and shares the pipeline.
///
/// # Thread Safety
///
/// Pipelines are single-threaded: they are neither `Send` nor `Sync`.
///
/// # Examples
///
/// ```rust
/// use orderly::LazyCollection;
///
/// let squares = LazyCollection::make(|| 1..)
///     .map(|value, _| value * value)
///     .filter(|value, _| value % 2 == 1)
///     .take(3);
///
/// assert_eq!(squares.to_vec(), vec![1, 9, 25]);
/// ```
pub struct LazyCollection<K, V> {
    factory: Factory<K, V>,
}

static_assertions::assert_not_impl_any!(LazyCollection<usize, i32>: Send, Sync);

impl<K, V> Clone for LazyCollection<K, V> {
    fn clone(&self) -> Self {
        Self {
            factory: Rc::clone(&self.factory),
        }
    }
}

impl<K, V> fmt::Debug for LazyCollection<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("LazyCollection").finish_non_exhaustive()
    }
}

// =============================================================================
// Construction
// =============================================================================

impl<V: 'static> LazyCollection<usize, V> {
    /// Creates a pipeline from a factory returning any iterable. Values are
    /// keyed by their position in the produced sequence.
    ///
    /// The factory is invoked once per iteration.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::LazyCollection;
    ///
    /// let letters = LazyCollection::make(|| vec!['a', 'b']);
    /// assert_eq!(letters.all().all(), vec![(0, 'a'), (1, 'b')]);
    /// ```
    pub fn make<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = V>,
        I::IntoIter: 'static,
    {
        Self::from_producer(move || Box::new(factory().into_iter().enumerate()))
    }

    /// Creates a pipeline of `count` values `function(1)`, ..., `function(count)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::LazyCollection;
    ///
    /// let doubled = LazyCollection::times(3, |number| number * 2);
    /// assert_eq!(doubled.to_vec(), vec![2, 4, 6]);
    /// ```
    pub fn times<F>(count: usize, function: F) -> Self
    where
        F: FnMut(usize) -> V + Clone + 'static,
    {
        Self::make(move || (1..=count).map(function.clone()))
    }
}

impl LazyCollection<usize, i64> {
    /// Creates a pipeline over the inclusive range `start..=end`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::LazyCollection;
    ///
    /// assert_eq!(LazyCollection::range(3, 5).to_vec(), vec![3, 4, 5]);
    /// ```
    pub fn range(start: i64, end: i64) -> Self {
        Self::make(move || start..=end)
    }
}

impl<K: 'static, V: 'static> LazyCollection<K, V> {
    /// Creates a pipeline from a factory of `(key, value)` pairs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::LazyCollection;
    ///
    /// let scores = LazyCollection::make_keyed(|| [("Rama", 100), ("Sam", 90)]);
    /// assert_eq!(scores.all().all(), vec![("Rama", 100), ("Sam", 90)]);
    /// ```
    pub fn make_keyed<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = (K, V)>,
        I::IntoIter: 'static,
    {
        Self::from_producer(move || Box::new(factory().into_iter()))
    }

    /// Creates a pipeline that produces nothing.
    pub fn empty() -> Self {
        Self::from_producer(|| Box::new(std::iter::empty()))
    }

    fn from_producer<F>(factory: F) -> Self
    where
        F: Fn() -> Producer<K, V> + 'static,
    {
        Self {
            factory: Rc::new(factory),
        }
    }

    /// Starts a fresh pull over the pipeline.
    #[inline]
    pub fn iter(&self) -> LazyIter<K, V> {
        LazyIter {
            producer: (self.factory)(),
        }
    }

    /// Appends a stage built from a fresh upstream producer on every pull.
    fn stage<L, W, S>(&self, stage: S) -> LazyCollection<L, W>
    where
        L: 'static,
        W: 'static,
        S: Fn(Producer<K, V>) -> Producer<L, W> + 'static,
    {
        let upstream = Rc::clone(&self.factory);
        LazyCollection::from_producer(move || stage(upstream()))
    }
}

// =============================================================================
// Pipeline Stages
// =============================================================================

impl<K: 'static, V: 'static> LazyCollection<K, V> {
    /// Maps every value through `function(value, key)`. Keys are preserved.
    ///
    /// `function` is cloned for every iteration, so any state it captures
    /// starts over each time the pipeline is pulled from scratch.
    pub fn map<R, F>(&self, function: F) -> LazyCollection<K, R>
    where
        R: 'static,
        F: FnMut(&V, &K) -> R + Clone + 'static,
    {
        self.stage(move |producer| {
            let mut function = function.clone();
            Box::new(producer.map(move |(key, value)| {
                let mapped = function(&value, &key);
                (key, mapped)
            }))
        })
    }

    /// Keeps the pairs for which `predicate(value, key)` holds. Keys are
    /// preserved.
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: FnMut(&V, &K) -> bool + Clone + 'static,
    {
        self.stage(move |producer| {
            let mut predicate = predicate.clone();
            Box::new(producer.filter(move |(key, value)| predicate(value, key)))
        })
    }

    /// Keeps the pairs for which `predicate(value, key)` does not hold.
    pub fn reject<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&V, &K) -> bool + Clone + 'static,
    {
        self.filter(move |value, key| !predicate(value, key))
    }

    /// Pulls at most `count` pairs from upstream, then stops pulling.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::LazyCollection;
    ///
    /// let naturals = LazyCollection::make(|| 0..);
    /// assert_eq!(naturals.take(3).to_vec(), vec![0, 1, 2]);
    /// ```
    pub fn take(&self, count: usize) -> Self {
        self.stage(move |producer| Box::new(producer.take(count)))
    }

    /// Pulls while `predicate(value, key)` holds; the first failing pair is
    /// dropped and pulling stops.
    pub fn take_while<F>(&self, predicate: F) -> Self
    where
        F: FnMut(&V, &K) -> bool + Clone + 'static,
    {
        self.stage(move |producer| {
            let mut predicate = predicate.clone();
            Box::new(producer.take_while(move |(key, value)| predicate(value, key)))
        })
    }

    /// Pulls until `predicate(value, key)` holds; the satisfying pair is
    /// dropped and pulling stops.
    pub fn take_until<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&V, &K) -> bool + Clone + 'static,
    {
        self.take_while(move |value, key| !predicate(value, key))
    }

    /// Drops the first `count` pairs.
    pub fn skip(&self, count: usize) -> Self {
        self.stage(move |producer| Box::new(producer.skip(count)))
    }

    /// Drops pairs while `predicate(value, key)` holds.
    pub fn skip_while<F>(&self, predicate: F) -> Self
    where
        F: FnMut(&V, &K) -> bool + Clone + 'static,
    {
        self.stage(move |producer| {
            let mut predicate = predicate.clone();
            Box::new(producer.skip_while(move |(key, value)| predicate(value, key)))
        })
    }

    /// Drops pairs until `predicate(value, key)` holds; the satisfying pair
    /// is kept.
    pub fn skip_until<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&V, &K) -> bool + Clone + 'static,
    {
        self.skip_while(move |value, key| !predicate(value, key))
    }

    /// Calls `function(value, key)` on every pair as it is pulled, passing
    /// the pair through unchanged.
    pub fn tap_each<F>(&self, function: F) -> Self
    where
        F: FnMut(&V, &K) + Clone + 'static,
    {
        self.stage(move |producer| {
            let mut function = function.clone();
            Box::new(producer.inspect(move |(key, value)| function(value, key)))
        })
    }

    /// Drops the keys and re-indexes values sequentially.
    pub fn values(&self) -> LazyCollection<usize, V> {
        self.stage(|producer| Box::new(producer.map(|(_, value)| value).enumerate()))
    }

    /// Produces the keys as a sequential pipeline.
    pub fn keys(&self) -> LazyCollection<usize, K> {
        self.stage(|producer| Box::new(producer.map(|(key, _)| key).enumerate()))
    }

    /// Maps every pair to a sequence and flattens the sequences, re-indexed.
    pub fn flat_map<R, I, F>(&self, function: F) -> LazyCollection<usize, R>
    where
        R: 'static,
        I: IntoIterator<Item = R> + 'static,
        I::IntoIter: 'static,
        F: FnMut(&V, &K) -> I + Clone + 'static,
    {
        self.stage(move |producer| {
            let mut function = function.clone();
            Box::new(
                producer
                    .flat_map(move |(key, value)| function(&value, &key))
                    .enumerate(),
            )
        })
    }

    /// Appends the values of `other` after the values of `self`, re-indexed.
    pub fn concat<L: 'static>(&self, other: &LazyCollection<L, V>) -> LazyCollection<usize, V> {
        let other = Rc::clone(&other.factory);
        self.stage(move |producer| {
            Box::new(
                producer
                    .map(|(_, value)| value)
                    .chain(other().map(|(_, value)| value))
                    .enumerate(),
            )
        })
    }

    /// Pairs values positionally with those of `other`, stopping when either
    /// side is exhausted.
    pub fn zip<L: 'static, W: 'static>(
        &self,
        other: &LazyCollection<L, W>,
    ) -> LazyCollection<usize, (V, W)> {
        let other = Rc::clone(&other.factory);
        self.stage(move |producer| {
            Box::new(
                producer
                    .map(|(_, value)| value)
                    .zip(other().map(|(_, value)| value))
                    .enumerate(),
            )
        })
    }

    /// Groups consecutive pairs into eager chunks of at most `size` entries.
    /// Keys are preserved inside each chunk. A `size` of zero produces
    /// nothing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::LazyCollection;
    ///
    /// let chunks = LazyCollection::make(|| 0..).chunk(2).take(2);
    /// let chunks: Vec<Vec<i32>> = chunks.to_vec().iter().map(|chunk| chunk.to_vec()).collect();
    /// assert_eq!(chunks, vec![vec![0, 1], vec![2, 3]]);
    /// ```
    pub fn chunk(&self, size: usize) -> LazyCollection<usize, Collection<K, V>>
    where
        K: Hash + Eq,
    {
        self.stage(move |mut producer| {
            if size == 0 {
                return Box::new(std::iter::empty());
            }
            Box::new(
                std::iter::from_fn(move || {
                    let chunk = Collection::from_entries(producer.by_ref().take(size));
                    chunk.is_not_empty().then_some(chunk)
                })
                .enumerate(),
            )
        })
    }

    /// Caches pulled pairs so that later iterations replay them instead of
    /// re-running the producer.
    ///
    /// The underlying factory is invoked at most once; the remembered
    /// pipeline pulls further elements from that single producer only when
    /// an iteration needs more than has been cached.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::LazyCollection;
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    ///
    /// let pulls = Rc::new(Cell::new(0));
    /// let counter = Rc::clone(&pulls);
    /// let remembered = LazyCollection::make(|| 0..)
    ///     .tap_each(move |_, _| counter.set(counter.get() + 1))
    ///     .remember();
    ///
    /// assert_eq!(remembered.take(3).to_vec(), vec![0, 1, 2]);
    /// assert_eq!(remembered.take(3).to_vec(), vec![0, 1, 2]);
    /// assert_eq!(pulls.get(), 3);
    /// ```
    pub fn remember(&self) -> Self
    where
        K: Clone,
        V: Clone,
    {
        remember::remember(Rc::clone(&self.factory))
    }
}

// =============================================================================
// Terminal Operations
// =============================================================================

impl<K: 'static, V: 'static> LazyCollection<K, V> {
    /// Pulls every pair into an eager [`Collection`].
    ///
    /// Never returns for an unbounded pipeline.
    pub fn all(&self) -> Collection<K, V>
    where
        K: Hash + Eq,
    {
        let collection = Collection::from_entries(self.iter());
        tracing::trace!(count = collection.len(), "materialized lazy collection");
        collection
    }

    /// Pulls every value into a `Vec`, dropping the keys.
    pub fn to_vec(&self) -> Vec<V> {
        self.iter().map(|(_, value)| value).collect()
    }

    /// Pulls the first value only.
    pub fn first(&self) -> Option<V> {
        self.iter().next().map(|(_, value)| value)
    }

    /// Pulls until `predicate(value, key)` holds and returns that value.
    pub fn first_where<F>(&self, mut predicate: F) -> Option<V>
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.iter()
            .find(|(key, value)| predicate(value, key))
            .map(|(_, value)| value)
    }

    /// Pulls everything and returns the last value.
    pub fn last(&self) -> Option<V> {
        self.iter().last().map(|(_, value)| value)
    }

    /// Pulls until a value equals `needle`.
    pub fn contains(&self, needle: &V) -> bool
    where
        V: PartialEq,
    {
        self.iter().any(|(_, value)| value == *needle)
    }

    /// Pulls until `predicate(value, key)` holds.
    pub fn contains_where<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.iter().any(|(key, value)| predicate(&value, &key))
    }

    /// Pulls everything and counts the pairs.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Left fold seeded with the first value.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Empty`](crate::CollectionError::Empty) if
    /// the pipeline produces nothing.
    pub fn reduce<F>(&self, function: F) -> Result<V>
    where
        F: FnMut(V, V) -> V,
    {
        self.iter()
            .map(|(_, value)| value)
            .reduce(function)
            .ok_or_else(|| empty("reduce"))
    }

    /// Left fold from `initial`.
    pub fn fold<B, F>(&self, initial: B, mut function: F) -> B
    where
        F: FnMut(B, V) -> B,
    {
        self.iter()
            .fold(initial, |carry, (_, value)| function(carry, value))
    }

    /// Sums the values.
    pub fn sum(&self) -> V
    where
        V: Sum,
    {
        self.iter().map(|(_, value)| value).sum()
    }

    /// Returns the arithmetic mean of the values in a single pass.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Empty`](crate::CollectionError::Empty) if
    /// the pipeline produces nothing.
    #[allow(clippy::cast_precision_loss)]
    pub fn avg(&self) -> Result<f64>
    where
        V: Numeric,
    {
        let (count, total) = self
            .iter()
            .fold((0_usize, 0.0_f64), |(count, total), (_, value)| {
                (count + 1, total + value.to_f64())
            });
        if count == 0 {
            return Err(empty("avg"));
        }
        Ok(total / count as f64)
    }

    /// Returns the smallest value; the first one wins among equals.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Empty`](crate::CollectionError::Empty) if
    /// the pipeline produces nothing.
    pub fn min(&self) -> Result<V>
    where
        V: PartialOrd,
    {
        self.iter()
            .map(|(_, value)| value)
            .reduce(|best, value| if value < best { value } else { best })
            .ok_or_else(|| empty("min"))
    }

    /// Returns the largest value; the first one wins among equals.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Empty`](crate::CollectionError::Empty) if
    /// the pipeline produces nothing.
    pub fn max(&self) -> Result<V>
    where
        V: PartialOrd,
    {
        self.iter()
            .map(|(_, value)| value)
            .reduce(|best, value| if value > best { value } else { best })
            .ok_or_else(|| empty("max"))
    }

    /// Pulls everything and joins the values with `glue`.
    pub fn join(&self, glue: &str) -> String
    where
        V: Display,
    {
        self.join_with_last(glue, glue)
    }

    /// Pulls everything and joins the values with `glue`, separating the
    /// final pair with `last_glue`.
    pub fn join_with_last(&self, glue: &str, last_glue: &str) -> String
    where
        V: Display,
    {
        let values = self.to_vec();
        crate::collection::join_values(&values, values.len(), glue, last_glue)
    }
}

impl<K, V, E> LazyCollection<K, std::result::Result<V, E>>
where
    K: Hash + Eq + 'static,
    V: 'static,
    E: 'static,
{
    /// Pulls pairs until the first `Err` value and returns it; otherwise
    /// collects the `Ok` values.
    ///
    /// Pairs pulled before the error have already passed through every
    /// earlier stage (including `tap_each` side effects) and are not
    /// retracted.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by the pipeline, unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use orderly::LazyCollection;
    ///
    /// let parsed = LazyCollection::make(|| ["1", "2", "x", "4"])
    ///     .map(|text, _| text.parse::<i32>());
    /// assert!(parsed.try_all().is_err());
    /// assert_eq!(parsed.take(2).try_all().map(|numbers| numbers.to_vec()), Ok(vec![1, 2]));
    /// ```
    pub fn try_all(&self) -> std::result::Result<Collection<K, V>, E> {
        let mut collection = Collection::new();
        for (key, value) in self {
            collection.put(key, value?);
        }
        Ok(collection)
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl<K, V> From<Collection<K, V>> for LazyCollection<K, V>
where
    K: Clone + 'static,
    V: Clone + 'static,
{
    /// Wraps an eager collection; every iteration clones its entries out.
    fn from(collection: Collection<K, V>) -> Self {
        let source = Rc::new(collection);
        Self::from_producer(move || {
            let source = Rc::clone(&source);
            Box::new((0..source.len()).filter_map(move |position| {
                source
                    .get_index(position)
                    .map(|(key, value)| (key.clone(), value.clone()))
            }))
        })
    }
}

impl<V: Clone + 'static> From<Vec<V>> for LazyCollection<usize, V> {
    fn from(values: Vec<V>) -> Self {
        let source: Rc<[V]> = values.into();
        Self::make(move || {
            let source = Rc::clone(&source);
            (0..source.len()).map(move |position| source[position].clone())
        })
    }
}

// =============================================================================
// Iteration
// =============================================================================

/// A single pull over a [`LazyCollection`].
///
/// Each call to `next` pulls one pair through every stage of the pipeline.
/// Dropping the iterator drops the underlying producer.
pub struct LazyIter<K, V> {
    producer: Producer<K, V>,
}

impl<K, V> Iterator for LazyIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.producer.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.producer.size_hint()
    }
}

impl<K, V> fmt::Debug for LazyIter<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("LazyIter").finish_non_exhaustive()
    }
}

impl<K: 'static, V: 'static> IntoIterator for LazyCollection<K, V> {
    type Item = (K, V);
    type IntoIter = LazyIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: 'static, V: 'static> IntoIterator for &LazyCollection<K, V> {
    type Item = (K, V);
    type IntoIter = LazyIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
