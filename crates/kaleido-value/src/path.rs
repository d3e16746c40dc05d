#![forbid(unsafe_code)]

//! Structural paths into a [`Value`](crate::Value) tree.
//!
//! A [`Path`] is an ordered sequence of [`Key`]s. Paths are identifiers: two
//! paths are the same scope exactly when their key sequences are equal. The
//! ordering is lexicographic over keys, so in an ordered map every descendant
//! of a path sorts directly after it and before any sibling. Registries rely
//! on that to find all scopes beneath a written path with a single range scan.
//!
//! # Construction
//!
//! ```
//! use kaleido_value::{Key, Path, path};
//!
//! let p = path!["todos", 0, "done"];
//! assert_eq!(p.len(), 3);
//! assert_eq!(p.keys()[1], Key::Index(0));
//!
//! let parsed: Path = "todos.0.done".parse().unwrap();
//! assert_eq!(parsed, p);
//! assert_eq!(p.to_string(), "todos.0.done");
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

/// One segment of a [`Path`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum Key {
    /// A named field of a map.
    Field(String),
    /// A position in a list.
    Index(usize),
}

impl Key {
    #[must_use]
    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }

    /// The key as a map field name. Indices render in decimal.
    #[must_use]
    pub fn to_field(&self) -> String {
        match self {
            Self::Field(name) => name.clone(),
            Self::Index(i) => i.to_string(),
        }
    }

    /// The key as a list position, if it is an index or a decimal field.
    #[must_use]
    pub fn to_index(&self) -> Option<usize> {
        match self {
            Self::Field(name) => parse_index(name),
            Self::Index(i) => Some(*i),
        }
    }

    /// Whether both keys can address the same child of some container.
    ///
    /// `Index(0)` and `Field("0")` name one map field; `Field("00")` and
    /// `Index(0)` name one list slot.
    #[must_use]
    pub fn same_slot(&self, other: &Key) -> bool {
        if self == other {
            return true;
        }
        match (self.to_index(), other.to_index()) {
            (Some(a), Some(b)) => a == b || self.to_field() == other.to_field(),
            _ => false,
        }
    }
}

fn parse_index(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::Field(s.to_owned())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self::Field(s)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

impl From<i32> for Key {
    /// Non-negative literals are indices. A negative literal is not a list
    /// position, so it becomes the field of the same name (`-1` is `"-1"`).
    fn from(i: i32) -> Self {
        match usize::try_from(i) {
            Ok(i) => Self::Index(i),
            Err(_) => Self::Field(i.to_string()),
        }
    }
}

/// An ordered sequence of keys addressing a location in a value tree.
///
/// The empty path is the root and addresses the whole value.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path {
    keys: SmallVec<[Key; 4]>,
}

impl Path {
    /// The root path.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new(keys: impl IntoIterator<Item = impl Into<Key>>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn push(&mut self, key: impl Into<Key>) {
        self.keys.push(key.into());
    }

    /// A new path with `key` appended.
    #[must_use]
    pub fn join(&self, key: impl Into<Key>) -> Self {
        let mut child = self.clone();
        child.push(key);
        child
    }

    /// The path without its last key, or `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.keys.split_last()?;
        Some(Self {
            keys: init.iter().cloned().collect(),
        })
    }

    /// Whether `prefix` is equal to or an ancestor of this path.
    #[must_use]
    pub fn starts_with(&self, prefix: &[Key]) -> bool {
        self.keys.starts_with(prefix)
    }

    /// Whether this path is a strict ancestor of `other`.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        self.len() < other.len() && other.starts_with(&self.keys)
    }

    /// Whether a write at one path changes the slice at the other.
    ///
    /// True when the paths are equal or one is an ancestor of the other.
    #[must_use]
    pub fn overlaps(&self, other: &Path) -> bool {
        self.starts_with(&other.keys) || other.starts_with(&self.keys)
    }

    /// [`overlaps`](Self::overlaps), comparing keys with [`Key::same_slot`].
    ///
    /// `a.0` and `a."0"` are different paths but may address the same slice,
    /// so a write at one may change the other.
    #[must_use]
    pub fn may_overlap(&self, other: &Path) -> bool {
        self.keys
            .iter()
            .zip(other.keys.iter())
            .all(|(a, b)| a.same_slot(b))
    }
}

impl Borrow<[Key]> for Path {
    fn borrow(&self) -> &[Key] {
        &self.keys
    }
}

impl fmt::Display for Path {
    /// Dot-separated keys. The root renders as the empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

/// Error returned when a dotted path string has an empty segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePathError {
    pub input: String,
}

impl fmt::Display for ParsePathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "empty segment in path '{}'", self.input)
    }
}

impl std::error::Error for ParsePathError {}

impl FromStr for Path {
    type Err = ParsePathError;

    /// Parse a dotted path. All-digit segments become [`Key::Index`].
    /// The empty string is the root.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        s.split('.')
            .map(|segment| {
                if segment.is_empty() {
                    return Err(ParsePathError {
                        input: s.to_owned(),
                    });
                }
                Ok(match parse_index(segment) {
                    Some(i) => Key::Index(i),
                    None => Key::Field(segment.to_owned()),
                })
            })
            .collect::<Result<SmallVec<_>, _>>()
            .map(|keys| Self { keys })
    }
}

impl From<Key> for Path {
    fn from(key: Key) -> Self {
        Self::new([key])
    }
}

impl From<&str> for Path {
    /// A single-field path. Use [`str::parse`] for dotted strings.
    fn from(field: &str) -> Self {
        Self::new([field])
    }
}

impl From<&[&str]> for Path {
    fn from(fields: &[&str]) -> Self {
        Self::new(fields.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Path {
    fn from(fields: [&str; N]) -> Self {
        Self::new(fields)
    }
}

impl From<Vec<Key>> for Path {
    fn from(keys: Vec<Key>) -> Self {
        Self {
            keys: SmallVec::from_vec(keys),
        }
    }
}

impl From<&[Key]> for Path {
    fn from(keys: &[Key]) -> Self {
        Self {
            keys: keys.iter().cloned().collect(),
        }
    }
}

impl From<&Path> for Path {
    fn from(path: &Path) -> Self {
        path.clone()
    }
}

impl FromIterator<Key> for Path {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

/// Build a [`Path`] from a list of keys. String literals become fields,
/// integer literals become indices.
///
/// ```
/// use kaleido_value::{Key, path};
///
/// let p = path!["a", 2];
/// assert_eq!(p.keys(), &[Key::Field("a".into()), Key::Index(2)]);
/// assert!(path![].is_root());
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($key:expr),+ $(,)?) => {
        $crate::Path::from(::std::vec![$($crate::Key::from($key)),+])
    };
}
