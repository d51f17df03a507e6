//! Positional spreading of tuple values into multi-argument callables.
//!
//! `map_spread` is available on collections whose values are tuples of
//! arity 2 through 6. Each tuple is cloned and its elements are passed to
//! the callable as separate arguments.
//!
//! # Examples
//!
//! ```rust
//! use orderly::collect;
//!
//! let names = collect([("Rama", "Perdana"), ("Name", "Less")]);
//! let full_names = names.map_spread(|first, last| format!("{first} {last}"));
//! assert_eq!(full_names.to_vec(), vec!["Rama Perdana", "Name Less"]);
//! ```

use std::hash::Hash;

use super::Collection;

macro_rules! impl_map_spread {
    ($($element:ident),+) => {
        paste::paste! {
            impl<K, $($element),+> Collection<K, ($($element,)+)>
            where
                K: Hash + Eq + Clone,
                $($element: Clone,)+
            {
                /// Maps every tuple value through `function`, passing the
                /// tuple's elements as positional arguments. Keys are preserved.
                pub fn map_spread<R, F>(&self, mut function: F) -> Collection<K, R>
                where
                    F: FnMut($($element),+) -> R,
                {
                    self.map(|value, _| {
                        let ($([<$element:lower>],)+) = value.clone();
                        function($([<$element:lower>]),+)
                    })
                }
            }
        }
    };
}

impl_map_spread!(A, B);
impl_map_spread!(A, B, C);
impl_map_spread!(A, B, C, D);
impl_map_spread!(A, B, C, D, E);
impl_map_spread!(A, B, C, D, E, G);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn spreads_triples_and_keeps_keys() {
        let collection = Collection::from_entries([("x", (1, 2, 3)), ("y", (4, 5, 6))]);
        let sums = collection.map_spread(|first, second, third| first + second + third);
        assert_eq!(sums.all(), vec![("x", 6), ("y", 15)]);
    }

    #[rstest]
    fn spreads_six_elements() {
        let collection = Collection::from_values([(1, 2, 3, 4, 5, 6)]);
        let products = collection.map_spread(|a, b, c, d, e, g| a * b * c * d * e * g);
        assert_eq!(products.to_vec(), vec![720]);
    }
}
