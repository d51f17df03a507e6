//! Error types for collection operations.
//!
//! Every fallible operation in this crate reports a [`CollectionError`].
//! Searches that simply find nothing (`first`, `last`, `first_where`) return
//! `Option` instead, so that predicate searches compose without error
//! plumbing; only the `*_or_fail` variants turn an absence into
//! [`CollectionError::NotFound`].

use thiserror::Error;

/// Represents the errors that collection operations can report.
///
/// # Examples
///
/// ```rust
/// use orderly::{CollectionError, collect};
///
/// let mut collection = collect(Vec::<i32>::new());
/// let error = collection.pop().unwrap_err();
/// assert_eq!(error, CollectionError::Empty { operation: "pop" });
/// assert_eq!(error.to_string(), "pop: collection is empty");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// The operation needs at least one element but the collection is empty.
    #[error("{operation}: collection is empty")]
    Empty {
        /// The name of the operation that failed.
        operation: &'static str,
    },

    /// `combine` received a value sequence whose length differs from the
    /// number of keys.
    #[error("combine: {keys} keys cannot be paired with {values} values")]
    LengthMismatch {
        /// The number of keys (the receiver's length).
        keys: usize,
        /// The number of values supplied.
        values: usize,
    },

    /// No element satisfied the search of an `*_or_fail` operation.
    #[error("{operation}: no matching element")]
    NotFound {
        /// The name of the operation that failed.
        operation: &'static str,
    },

    /// A record did not expose the field requested by a field-based operation.
    #[error("record has no field named `{field}`")]
    MissingField {
        /// The requested field name.
        field: String,
    },
}

/// Result type for collection operations.
pub type Result<T, E = CollectionError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_empty_display() {
        let error = CollectionError::Empty { operation: "avg" };
        assert_eq!(format!("{error}"), "avg: collection is empty");
    }

    #[rstest]
    fn test_length_mismatch_display() {
        let error = CollectionError::LengthMismatch { keys: 2, values: 3 };
        assert_eq!(
            format!("{error}"),
            "combine: 2 keys cannot be paired with 3 values"
        );
    }

    #[rstest]
    fn test_not_found_display() {
        let error = CollectionError::NotFound {
            operation: "first_or_fail",
        };
        assert_eq!(format!("{error}"), "first_or_fail: no matching element");
    }

    #[rstest]
    fn test_missing_field_display() {
        let error = CollectionError::MissingField {
            field: "department".to_string(),
        };
        assert_eq!(format!("{error}"), "record has no field named `department`");
    }

    #[rstest]
    fn test_error_is_std_error() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>(_: &E) {}
        assert_error(&CollectionError::Empty { operation: "pop" });
    }
}
