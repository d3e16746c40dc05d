#![forbid(unsafe_code)]

//! State values, paths and lenses for Kaleido.
//!
//! - [`Value`]: a JSON-shaped tree on persistent containers.
//! - [`Path`] / [`Key`]: structural addresses into a value, built with [`path!`].
//! - [`structural`]: non-destructive `get_in` / `assoc_in`.
//! - [`Lens`]: a pure getter/setter pair focused on one path.

pub mod lens;
pub mod path;
pub mod structural;
pub mod value;

pub use lens::Lens;
pub use path::{Key, ParsePathError, Path};
pub use structural::{MAX_LIST_PAD, assoc_in, get_in};
pub use value::{List, Map, Value};
