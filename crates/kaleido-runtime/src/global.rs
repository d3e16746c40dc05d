#![forbid(unsafe_code)]

//! A thread-local default store.
//!
//! For applications that want one implicit state tree instead of passing a
//! [`Store`] around. Each thread gets its own store, created on first use
//! and living until the thread exits.
//!
//! ```
//! use kaleido_runtime::global;
//! use kaleido_value::{Value, path};
//!
//! let todo = global::scope_with(path!["todo"], "buy milk");
//! todo.set("buy oat milk");
//! global::undo(1).unwrap();
//! assert_eq!(todo.get(), Some(Value::from("buy milk")));
//! ```

use kaleido_value::{Path, Value};

use crate::error::StoreError;
use crate::history::HistoryLog;
use crate::scope::Scope;
use crate::store::Store;

thread_local! {
    static DEFAULT_STORE: Store = Store::new();
}

/// Handle to this thread's default store.
#[must_use]
pub fn store() -> Store {
    DEFAULT_STORE.with(Clone::clone)
}

/// [`Store::scope`] on the default store.
pub fn scope(path: impl Into<Path>) -> Scope {
    store().scope(path)
}

/// [`Store::scope_with`] on the default store.
pub fn scope_with(path: impl Into<Path>, initial: impl Into<Value>) -> Scope {
    store().scope_with(path, initial)
}

/// [`Store::undo`] on the default store.
///
/// # Errors
///
/// See [`Store::undo`].
pub fn undo(steps: usize) -> Result<(), StoreError> {
    store().undo(steps)
}

/// Current state of the default store.
#[must_use]
pub fn state() -> Value {
    store().state()
}

/// History of the default store.
#[must_use]
pub fn history() -> HistoryLog {
    store().history().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaleido_value::path;

    #[test]
    fn free_functions_share_one_store() {
        scope_with(path!["g"], 1);
        assert_eq!(scope(path!["g"]).get(), Some(Value::Int(1)));
        assert!(store().scope(path!["g"]).stream().ptr_eq(&scope(path!["g"]).stream()));
        assert_eq!(history().len(), 2);
        assert!(Store::global().history().len() == 2);
    }

    #[test]
    fn each_thread_has_its_own_store() {
        scope_with(path!["here"], true);
        let elsewhere = std::thread::spawn(state).join().unwrap();
        assert_eq!(elsewhere, Value::map());
        assert_ne!(state(), Value::map());
    }

    #[test]
    fn undo_restores_previous() {
        let s = scope_with(path!["u"], 1);
        s.set(2);
        undo(1).unwrap();
        assert_eq!(s.get(), Some(Value::Int(1)));
    }
}
