#![forbid(unsafe_code)]

//! Reactive primitives the store is built on.
//!
//! - [`Observable`]: a shared, versioned cell with synchronous subscriber
//!   callbacks. Every write notifies, including writes of an equal value.
//! - [`ReadOnly`]: a read-and-subscribe view of an `Observable`.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`Binding`]: a lazily evaluated, never-stale derived read.
//! - [`Subscriptions`]: a group of subscriptions released together.
//!
//! # Architecture
//!
//! `Observable<T>` uses `Rc<RefCell<..>>` for single-threaded shared
//! ownership. Subscribers are stored as `Weak` callbacks and pruned lazily on
//! the next write. Callbacks run after the internal borrow is released, so
//! they can re-enter the cell or the store that owns it.

pub mod binding;
pub mod observable;

pub use binding::{Binding, Subscriptions, bind_mapped, bind_observable};
pub use observable::{Observable, ReadOnly, Subscription};
