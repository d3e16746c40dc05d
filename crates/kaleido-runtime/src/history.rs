#![forbid(unsafe_code)]

//! Append-only log of whole-state snapshots.
//!
//! # Invariants
//!
//! 1. The log is seeded with the store's initial state and gains exactly one
//!    entry per committed write, undo included.
//! 2. Entries are never removed or reordered.
//! 3. After a commit returns, [`HistoryLog::last`] equals the store's current
//!    state.
//!
//! Entries are persistent values, so consecutive snapshots share every subtree
//! the write between them did not touch.

use im::Vector;
use kaleido_value::Value;

use crate::reactive::{Observable, ReadOnly, Subscription};

/// Ordered sequence of every state the store has held.
///
/// Subscribers receive the full log after each append.
#[derive(Clone, Debug)]
pub struct HistoryLog {
    entries: Observable<Vector<Value>>,
}

impl HistoryLog {
    pub(crate) fn new(initial: Value) -> Self {
        Self {
            entries: Observable::new(Vector::unit(initial)),
        }
    }

    /// Append without notifying. The store calls [`notify`](Self::notify)
    /// after the rest of the commit has propagated.
    pub(crate) fn record(&self, snapshot: Value) {
        self.entries.update_quiet(|entries| entries.push_back(snapshot));
    }

    pub(crate) fn notify(&self) {
        self.entries.notify();
    }

    /// The entry at `index`, which the caller has already bounds-checked.
    ///
    /// # Panics
    ///
    /// If `index >= self.len()`.
    pub(crate) fn entry(&self, index: usize) -> Value {
        self.entries.with(|entries| entries[index].clone())
    }

    #[cfg(test)]
    fn append(&self, snapshot: Value) {
        self.record(snapshot);
        self.notify();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.with(Vector::len)
    }

    /// Always `false`: the log holds at least the initial state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.with(Vector::is_empty)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.entries.with(|entries| entries.get(index).cloned())
    }

    /// The most recent snapshot.
    #[must_use]
    pub fn last(&self) -> Option<Value> {
        self.entries.with(|entries| entries.last().cloned())
    }

    /// The whole log. O(1): the vector is persistent.
    #[must_use]
    pub fn snapshot(&self) -> Vector<Value> {
        self.entries.get()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<Value> {
        self.entries.with(|entries| entries.iter().cloned().collect())
    }

    /// Call `callback` with the full log after every append.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&Vector<Value>) + 'static) -> Subscription {
        self.entries.subscribe(callback)
    }

    /// Read-only view of the cell backing the log.
    #[must_use]
    pub fn cell(&self) -> ReadOnly<Vector<Value>> {
        self.entries.read_only()
    }
}
