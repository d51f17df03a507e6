//! # orderly
//!
//! Ordered, keyed collections with an eager transformation algebra and lazy,
//! pull-based pipelines.
//!
//! ## Overview
//!
//! - **[`Collection`]**: an eager container over an insertion-ordered set of
//!   `(key, value)` entries. Every transformation returns a new collection
//!   and leaves the receiver untouched.
//! - **[`LazyCollection`]**: a deferred pipeline over a producer factory.
//!   Nothing is produced until a terminal operation pulls it, so unbounded
//!   producers can be consumed with short-circuiting operations such as
//!   `take`.
//!
//! ## Feature Flags
//!
//! - `lazy`: [`LazyCollection`] (default)
//! - `random`: `Collection::random` and `Collection::random_with` (default)
//! - `serde`: `Serialize` / `Deserialize` for [`Collection`]
//! - `fxhash`: use FxHash for the key index instead of SipHash
//! - `full`: Enable all of `lazy`, `random`, and `serde`
//!
//! ## Example
//!
//! ```rust
//! use orderly::prelude::*;
//!
//! let numbers = collect([1, 2, 3, 4, 5, 6, 7, 8, 9]);
//! assert_eq!(numbers.sum(), 45);
//! assert_eq!(numbers.avg(), Ok(5.0));
//!
//! let evens = numbers.filter(|value, _| value % 2 == 0).values();
//! assert_eq!(evens.join(", "), "2, 4, 6, 8");
//!
//! let naturals = LazyCollection::make(|| 0..);
//! assert_eq!(naturals.take(3).to_vec(), vec![0, 1, 2]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use orderly::prelude::*;
/// ```
pub mod prelude {
    pub use crate::collection::{Collection, FieldAccess};
    pub use crate::error::{CollectionError, Result};
    pub use crate::numeric::Numeric;

    #[cfg(feature = "lazy")]
    pub use crate::lazy::LazyCollection;

    pub use crate::collect;
}

pub mod collection;
mod error;
mod numeric;

#[cfg(feature = "lazy")]
pub mod lazy;

pub use collection::{Collection, FieldAccess};
pub use error::{CollectionError, Result};
pub use numeric::Numeric;

#[cfg(feature = "lazy")]
pub use lazy::{LazyCollection, LazyIter};

/// Builds a sequential [`Collection`] from any ordered source.
///
/// # Examples
///
/// ```rust
/// use orderly::collect;
///
/// let collection = collect([1, 2, 3]);
/// assert_eq!(collection.to_vec(), vec![1, 2, 3]);
/// assert_eq!(collection.get(&0), Some(&1));
/// ```
pub fn collect<V, I>(values: I) -> Collection<usize, V>
where
    I: IntoIterator<Item = V>,
{
    Collection::from_values(values)
}
