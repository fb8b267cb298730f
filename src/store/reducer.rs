//! Pure state transitions over a [`Collection`].
//!
//! Every function here takes the current collection by reference and returns
//! a new one; the input is never mutated.

use crate::models::{Collection, Record, RecordId};

/// A state-change request dispatched to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Replace the whole collection with a freshly loaded one.
    Load(Collection),
    /// Set the bookmark flag of one record.
    SetBookmarked { id: RecordId, bookmarked: bool },
    /// Flip the bookmark flag of one record.
    Toggle(RecordId),
}

/// What a transition did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Unchanged,
    /// The intent named an id absent from the collection; state is unchanged.
    RecordNotFound(RecordId),
}

/// Result of [`reduce`]: the next collection and what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    pub collection: Collection,
    pub outcome: Outcome,
}

impl Reduction {
    fn unchanged(state: &Collection, outcome: Outcome) -> Self {
        Self {
            collection: state.clone(),
            outcome,
        }
    }
}

/// Compute the collection that follows `state` under `intent`.
pub fn reduce(state: &Collection, intent: Intent) -> Reduction {
    match intent {
        Intent::Load(loaded) => {
            let outcome = if &loaded == state {
                Outcome::Unchanged
            } else {
                Outcome::Changed
            };
            Reduction {
                collection: loaded,
                outcome,
            }
        }
        Intent::SetBookmarked { id, bookmarked } => mark(state, id, |_| bookmarked),
        Intent::Toggle(id) => mark(state, id, |record| !record.bookmarked),
    }
}

fn mark(state: &Collection, id: RecordId, next: impl FnOnce(&Record) -> bool) -> Reduction {
    let Some(index) = state.position(id) else {
        return Reduction::unchanged(state, Outcome::RecordNotFound(id));
    };

    let current = &state.records()[index];
    let bookmarked = next(current);
    if current.bookmarked == bookmarked {
        return Reduction::unchanged(state, Outcome::Unchanged);
    }

    Reduction {
        collection: state.replaced_at(index, current.with_bookmarked(bookmarked)),
        outcome: Outcome::Changed,
    }
}

/// Lazy projection of the bookmarked records, in collection order.
///
/// Recomputed from the collection on every call, never cached.
#[derive(Debug, Clone)]
pub struct BookmarkedOnly<'a> {
    inner: std::slice::Iter<'a, Record>,
}

impl<'a> Iterator for BookmarkedOnly<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().find(|record| record.bookmarked)
    }
}

pub fn bookmarked_only(collection: &Collection) -> BookmarkedOnly<'_> {
    BookmarkedOnly {
        inner: collection.records().iter(),
    }
}
