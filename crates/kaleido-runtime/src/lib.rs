#![forbid(unsafe_code)]

//! Reactive, path-scoped state with snapshot history.
//!
//! A [`Store`] holds one [`Value`](kaleido_value::Value). Callers carve it
//! into [`Scope`]s by [`Path`](kaleido_value::Path); each scope reads, writes
//! and transforms its own slice through a lens and exposes a notification
//! cell that fires on every write touching that slice. Every write is also
//! recorded as a whole-state snapshot in the [`HistoryLog`], which
//! [`Store::undo`] replays from.
//!
//! # Module map
//!
//! - [`reactive`]: `Observable`, `Subscription`, `Binding`.
//! - [`store`]: the store, its scope registry and commit sequence.
//! - [`scope`]: scope handles (`get`, `set`, `update`, `subscribe`).
//! - [`history`]: the append-only snapshot log.
//! - [`config`]: `StoreConfig` and `UndoMode`.
//! - [`global`]: a thread-local default store.
//!
//! Everything is single-threaded: stores are `!Send` and all propagation
//! happens synchronously inside the call that caused it.

pub mod config;
pub mod error;
pub mod global;
pub mod history;
pub mod reactive;
pub mod scope;
pub mod store;

pub use config::{StoreConfig, UndoMode};
pub use error::StoreError;
pub use history::HistoryLog;
pub use reactive::{Binding, Observable, ReadOnly, Subscription, Subscriptions};
pub use scope::Scope;
pub use store::Store;
