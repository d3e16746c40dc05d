#![forbid(unsafe_code)]

//! Derived reads and subscription lifetimes.
//!
//! A [`Binding<T>`] is a lazily evaluated read: every [`Binding::get`]
//! recomputes from the live source, so a binding is never stale and never
//! needs invalidation. Use it to hand consumers a typed view of a slice
//! without giving them write access.
//!
//! [`Subscriptions`] owns a group of [`Subscription`]s so a consumer can tie
//! all of its callbacks to its own lifetime.
//!
//! ```
//! use kaleido_runtime::reactive::{Observable, bind_mapped};
//!
//! let count = Observable::new(2);
//! let label = bind_mapped(&count, |c| format!("{c} items"));
//! count.set(3);
//! assert_eq!(label.get(), "3 items");
//! ```

use std::fmt;
use std::rc::Rc;

use super::observable::{Observable, Subscription};

/// A read-only, lazily evaluated view.
pub struct Binding<T> {
    eval: Rc<dyn Fn() -> T>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            eval: Rc::clone(&self.eval),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding").field("value", &self.get()).finish()
    }
}

impl<T: 'static> Binding<T> {
    /// A binding that evaluates `f` on each read.
    pub fn new(f: impl Fn() -> T + 'static) -> Self {
        Self { eval: Rc::new(f) }
    }

    #[must_use]
    pub fn get(&self) -> T {
        (self.eval)()
    }

    /// Chain a further transform.
    pub fn then<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Binding<U> {
        Binding {
            eval: Rc::new(move || f((self.eval)())),
        }
    }
}

/// Binding that reads `source` as-is.
pub fn bind_observable<T: Clone + 'static>(source: &Observable<T>) -> Binding<T> {
    let source = source.clone();
    Binding::new(move || source.get())
}

/// Binding that reads `source` through `map`, without cloning the source value.
pub fn bind_mapped<S: Clone + 'static, T: 'static>(
    source: &Observable<S>,
    map: impl Fn(&S) -> T + 'static,
) -> Binding<T> {
    let source = source.clone();
    Binding::new(move || source.with(|v| map(v)))
}

/// A group of subscriptions released together.
///
/// Dropping the group, or calling [`clear`](Self::clear), unsubscribes every
/// callback it holds.
#[derive(Default)]
pub struct Subscriptions {
    held: Vec<Subscription>,
}

impl Subscriptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `sub` alive for the lifetime of the group.
    pub fn hold(&mut self, sub: Subscription) -> &mut Self {
        self.held.push(sub);
        self
    }

    /// Subscribe to `source` and hold the subscription.
    pub fn subscribe<T: Clone + 'static>(
        &mut self,
        source: &Observable<T>,
        callback: impl Fn(&T) + 'static,
    ) -> &mut Self {
        self.hold(source.subscribe(callback))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.held.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Release everything now. The group stays usable.
    pub fn clear(&mut self) {
        self.held.clear();
    }
}

impl fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriptions")
            .field("len", &self.held.len())
            .finish()
    }
}
