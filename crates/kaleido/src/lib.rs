#![forbid(unsafe_code)]

//! Kaleido public facade.
//!
//! Re-exports the value model and the runtime, plus a [`prelude`].
//!
//! ```
//! use kaleido::prelude::*;
//!
//! let store = Store::new();
//! let todos = store.scope(path!["todos"]);
//! let first = todos.child(0);
//! first.set("write the docs");
//!
//! let _sub = todos.subscribe(|list| {
//!     let n = list.and_then(Value::as_list).map_or(0, |l| l.len());
//!     assert!(n > 0);
//! });
//! todos.child(1).set("ship it");
//!
//! store.undo(1).unwrap();
//! assert_eq!(todos.child(1).get(), None);
//! ```

pub use kaleido_runtime as runtime;
pub use kaleido_value as value;

pub use kaleido_runtime::{
    Binding, HistoryLog, Observable, ReadOnly, Scope, Store, StoreConfig, StoreError,
    Subscription, Subscriptions, UndoMode, global,
};
pub use kaleido_value::{Key, Lens, Path, Value, path};

/// Everything most callers need.
pub mod prelude {
    pub use kaleido_runtime::{Scope, Store, StoreConfig, StoreError, Subscription, UndoMode};
    pub use kaleido_value::{Key, Path, Value, path};
}
