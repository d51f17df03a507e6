//! Memoization of pulled pairs behind [`LazyCollection::remember`].
//!
//! A remembered pipeline shares one [`Memo`] between all of its iterations.
//! The memo starts the upstream producer on the first pull, appends every
//! pair it pulls to a cache, and lets each iteration replay the cache before
//! pulling anything new.

use std::cell::RefCell;
use std::rc::Rc;

use super::{Factory, LazyCollection, Producer};

/// The state of the single upstream producer.
enum Source<K, V> {
    /// Not pulled yet. Holds the factory that will start the producer.
    Pending(Factory<K, V>),
    /// Pulling is in progress.
    Running(Producer<K, V>),
    /// The producer signalled exhaustion and has been dropped.
    Exhausted,
}

/// Cache shared by all iterations of a remembered pipeline.
struct Memo<K, V> {
    cache: Vec<(K, V)>,
    source: Source<K, V>,
}

impl<K: Clone, V: Clone> Memo<K, V> {
    /// Returns the pair at `position`, pulling from upstream if the cache
    /// does not reach that far yet.
    fn pair_at(&mut self, position: usize) -> Option<(K, V)> {
        if let Some(pair) = self.cache.get(position) {
            return Some(pair.clone());
        }
        if let Source::Pending(factory) = &self.source {
            let producer = factory();
            self.source = Source::Running(producer);
        }
        let Source::Running(producer) = &mut self.source else {
            return None;
        };
        match producer.next() {
            Some(pair) => {
                self.cache.push(pair.clone());
                tracing::trace!(cached = self.cache.len(), "remembered lazy pair");
                Some(pair)
            }
            None => {
                self.source = Source::Exhausted;
                None
            }
        }
    }
}

/// An iteration over a remembered pipeline.
struct Replay<K, V> {
    memo: Rc<RefCell<Memo<K, V>>>,
    position: usize,
}

impl<K: Clone, V: Clone> Iterator for Replay<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let pair = self.memo.borrow_mut().pair_at(self.position)?;
        self.position += 1;
        Some(pair)
    }
}

pub(super) fn remember<K, V>(factory: Factory<K, V>) -> LazyCollection<K, V>
where
    K: Clone + 'static,
    V: Clone + 'static,
{
    let memo = Rc::new(RefCell::new(Memo {
        cache: Vec::new(),
        source: Source::Pending(factory),
    }));
    LazyCollection::from_producer(move || {
        Box::new(Replay {
            memo: Rc::clone(&memo),
            position: 0,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::Cell;

    #[rstest]
    fn factory_runs_once_across_iterations() {
        let starts = Rc::new(Cell::new(0));
        let counter = Rc::clone(&starts);
        let remembered = LazyCollection::make(move || {
            counter.set(counter.get() + 1);
            vec![1, 2, 3]
        })
        .remember();

        assert_eq!(remembered.to_vec(), vec![1, 2, 3]);
        assert_eq!(remembered.to_vec(), vec![1, 2, 3]);
        assert_eq!(starts.get(), 1);
    }

    #[rstest]
    fn nothing_is_pulled_before_first_iteration() {
        let starts = Rc::new(Cell::new(0));
        let counter = Rc::clone(&starts);
        let _remembered = LazyCollection::make(move || {
            counter.set(counter.get() + 1);
            0..
        })
        .remember();

        assert_eq!(starts.get(), 0);
    }

    #[rstest]
    fn interleaved_iterations_share_the_cache() {
        let remembered = LazyCollection::make(|| 0..).remember();
        let mut first = remembered.iter();
        let mut second = remembered.iter();

        assert_eq!(first.next(), Some((0, 0)));
        assert_eq!(first.next(), Some((1, 1)));
        assert_eq!(second.next(), Some((0, 0)));
        assert_eq!(second.next(), Some((1, 1)));
        assert_eq!(second.next(), Some((2, 2)));
        assert_eq!(first.next(), Some((2, 2)));
    }
}
