#![forbid(unsafe_code)]

//! Scope handles: read, write and observe one path of a store.

use std::fmt;

use kaleido_value::{Key, Lens, Path, Value};

use crate::reactive::{Binding, Observable, ReadOnly, Subscription, bind_mapped};
use crate::store::{Origin, Store};

/// A handle on the slice of a [`Store`] at one path.
///
/// Handles are cheap to clone. Every handle for an equal path shares one
/// notification cell, however and wherever it was created.
///
/// ```
/// use kaleido_runtime::Store;
/// use kaleido_value::{Value, path};
///
/// let store = Store::new();
/// let counter = store.scope_with(path!["counter"], 1);
/// counter.update(|n| Value::from(n.and_then(Value::as_i64).unwrap_or(0) + 1));
/// assert_eq!(counter.get(), Some(Value::Int(2)));
/// ```
#[derive(Clone)]
pub struct Scope {
    store: Store,
    lens: Lens,
    stream: Observable<Option<Value>>,
}

impl Scope {
    pub(crate) fn new(store: Store, lens: Lens, stream: Observable<Option<Value>>) -> Self {
        Self {
            store,
            lens,
            stream,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.lens.path()
    }

    #[must_use]
    pub fn lens(&self) -> &Lens {
        &self.lens
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The current slice, or `None` if the path does not exist.
    #[must_use]
    pub fn get(&self) -> Option<Value> {
        self.store.read(|state| self.lens.view(state).cloned())
    }

    /// Write `value` at this path.
    ///
    /// Missing containers along the path are created. Before this returns,
    /// state subscribers, this path's cell and the cell of every other scope
    /// whose slice the write can change have been notified, followed by
    /// history subscribers.
    pub fn set(&self, value: impl Into<Value>) {
        let next = self.store.read(|state| self.lens.set(value.into(), state));
        self.store.commit(self.path(), next, Origin::Write);
    }

    /// Replace the slice with `f(current)`.
    ///
    /// `f` runs exactly once, with no store borrow held, so it may read other
    /// scopes. If it panics, nothing is written.
    pub fn update(&self, f: impl FnOnce(Option<&Value>) -> Value) {
        let state = self.store.state();
        let next = self.lens.over(&state, f);
        self.store.commit(self.path(), next, Origin::Write);
    }

    /// Fallible [`update`](Self::update).
    ///
    /// # Errors
    ///
    /// Returns `f`'s error unchanged. Nothing is written, notified or
    /// recorded in that case.
    pub fn try_update<E>(
        &self,
        f: impl FnOnce(Option<&Value>) -> Result<Value, E>,
    ) -> Result<(), E> {
        let state = self.store.state();
        let next = self.lens.try_over(&state, f)?;
        self.store.commit(self.path(), next, Origin::Write);
        Ok(())
    }

    /// Read-only view of this path's notification cell.
    #[must_use]
    pub fn stream(&self) -> ReadOnly<Option<Value>> {
        self.stream.read_only()
    }

    /// Call `callback` with the new slice after every write touching this path.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(Option<&Value>) + 'static) -> Subscription {
        self.stream.subscribe(move |slice| callback(slice.as_ref()))
    }

    /// Scope of `key` beneath this path, in the same store.
    pub fn child(&self, key: impl Into<Key>) -> Scope {
        self.store.scope(self.path().join(key))
    }

    /// A derived read of this slice.
    pub fn bind<T: 'static>(&self, map: impl Fn(Option<&Value>) -> T + 'static) -> Binding<T> {
        bind_mapped(&self.stream, move |slice| map(slice.as_ref()))
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("path", &self.path().to_string())
            .field("value", &self.get())
            .finish()
    }
}
