#![forbid(unsafe_code)]

//! Path lenses: a getter and a setter focused on one [`Path`].
//!
//! A [`Lens`] is pure and stateless. It never notifies anyone; whoever
//! applies a lens to shared state is responsible for announcing the change.
//! Building one is a path clone, so callers rebuild them freely.
//!
//! # Laws
//!
//! For any `state`, `slice`, and lens `l`:
//!
//! 1. **get-set**: `l.view(&l.set(slice, &state)) == Some(&slice)`.
//! 2. **set-set**: `l.set(b, &l.set(a, &state)) == l.set(b, &state)`.
//! 3. **sharing**: subtrees of `state` not on `l.path()` are reference-equal
//!    in `l.set(slice, &state)`.
//!
//! ```
//! use kaleido_value::{Lens, Value, path};
//!
//! let lens = Lens::new(path!["user", "name"]);
//! let state = lens.set("ada".into(), &Value::map());
//! assert_eq!(lens.view(&state), Some(&Value::from("ada")));
//!
//! let shouted = lens.over(&state, |name| {
//!     name.and_then(Value::as_str).unwrap_or_default().to_uppercase().into()
//! });
//! assert_eq!(lens.view(&shouted), Some(&Value::from("ADA")));
//! ```

use crate::path::Path;
use crate::structural::{assoc_in, get_in};
use crate::value::Value;

/// A getter/setter pair over a [`Path`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lens {
    path: Path,
}

impl Lens {
    #[must_use]
    pub fn new(path: impl Into<Path>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extract the focused slice, or `None` when any segment is missing.
    #[must_use]
    pub fn view<'a>(&self, state: &'a Value) -> Option<&'a Value> {
        get_in(state, self.path.keys())
    }

    /// Return a new state with the focused slice replaced by `slice`.
    #[must_use]
    pub fn set(&self, slice: Value, state: &Value) -> Value {
        assoc_in(state, self.path.keys(), slice)
    }

    /// Apply `f` to the focused slice and store the result.
    ///
    /// `f` runs exactly once. If it panics, `state` is untouched.
    #[must_use]
    pub fn over(&self, state: &Value, f: impl FnOnce(Option<&Value>) -> Value) -> Value {
        let slice = f(self.view(state));
        self.set(slice, state)
    }

    /// Fallible [`over`](Self::over). On `Err` no new state is produced.
    pub fn try_over<E>(
        &self,
        state: &Value,
        f: impl FnOnce(Option<&Value>) -> Result<Value, E>,
    ) -> Result<Value, E> {
        let slice = f(self.view(state))?;
        Ok(self.set(slice, state))
    }

    /// Compose with a path relative to this lens.
    #[must_use]
    pub fn then(&self, suffix: &Path) -> Self {
        Self {
            path: self.path.keys().iter().chain(suffix.keys()).cloned().collect(),
        }
    }
}
