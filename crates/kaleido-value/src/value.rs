#![forbid(unsafe_code)]

//! The state value model.
//!
//! A [`Value`] is a JSON-shaped tree whose containers are persistent
//! (`im::Vector` and `im::OrdMap`). Cloning a value is O(1) and every
//! non-destructive update shares all untouched subtrees with its source, so a
//! history of whole-state snapshots costs roughly one path copy per write.
//!
//! # Invariants
//!
//! 1. Values are never mutated in place once shared; updates go through
//!    [`crate::structural::assoc_in`] and produce a new root.
//! 2. [`Value::ptr_eq`] is `true` only for containers that share the same
//!    persistent root, which is how callers observe structural sharing.
//! 3. Map keys are strings. Integer keys used against a map address the
//!    decimal field name.

use std::fmt;

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

/// Map container used by [`Value::Map`].
pub type Map = OrdMap<String, Value>;

/// List container used by [`Value::List`].
pub type List = Vector<Value>;

/// A structurally immutable state value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Explicit null. Distinct from an absent slice, which is `Option::None`.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(List),
    Map(Map),
}

impl Value {
    /// An empty map, the initial state of a fresh store.
    #[must_use]
    pub fn map() -> Self {
        Self::Map(Map::new())
    }

    /// An empty list.
    #[must_use]
    pub fn list() -> Self {
        Self::List(List::new())
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether the value is a map or a list.
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Map(_) | Self::List(_))
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view of the value. Integers widen to `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    /// Reference equality for containers.
    ///
    /// Returns `true` when both values are containers of the same kind backed
    /// by the same persistent root. Scalars are never reference-equal.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Map(a), Self::Map(b)) => a.ptr_eq(b),
            (Self::List(a), Self::List(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// [`ptr_eq`](Self::ptr_eq) or structurally equal.
    ///
    /// Cheap for the common case of an untouched subtree, which shares its
    /// root with the previous state.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self == other
    }

    /// Short name of the variant, used in log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

impl fmt::Display for Value {
    /// Compact JSON rendering.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Self::Map(m)
    }
}

impl From<List> for Value {
    fn from(l: List) -> Self {
        Self::List(l)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(fields) => Self::Map(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Int(n) => Self::from(*n),
            Value::Float(n) => serde_json::Number::from_f64(*n).map_or(Self::Null, Self::Number),
            Value::String(s) => Self::String(s.clone()),
            Value::List(items) => Self::Array(items.iter().map(Self::from).collect()),
            Value::Map(fields) => Self::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_is_null() {
        assert!(Value::default().is_null());
    }

    #[test]
    fn from_json_preserves_shape() {
        let v = Value::from(json!({"a": [1, 2.5, "x"], "b": {"c": true, "d": null}}));
        let a = v.as_map().unwrap().get("a").unwrap().as_list().unwrap();
        assert_eq!(a[0], Value::Int(1));
        assert_eq!(a[1], Value::Float(2.5));
        assert_eq!(a[2], Value::from("x"));
        let b = v.as_map().unwrap().get("b").unwrap();
        assert_eq!(b.as_map().unwrap().get("c"), Some(&Value::Bool(true)));
        assert_eq!(b.as_map().unwrap().get("d"), Some(&Value::Null));
    }

    #[test]
    fn json_conversion_is_lossless_for_json_shapes() {
        let source = json!({"list": [1, {"deep": "yes"}], "n": -4, "f": 0.5});
        let back = serde_json::Value::from(&Value::from(source.clone()));
        assert_eq!(back, source);
    }

    #[test]
    fn display_renders_compact_json() {
        let v = Value::from(json!({"a": 1, "b": [true, null]}));
        assert_eq!(v.to_string(), r#"{"a":1,"b":[true,null]}"#);
    }

    #[test]
    fn deserialize_untagged() {
        let v: Value = serde_json::from_str(r#"{"x": [1, "two", 3.0]}"#).unwrap();
        let x = v.as_map().unwrap().get("x").unwrap().as_list().unwrap();
        assert_eq!(x[0].as_i64(), Some(1));
        assert_eq!(x[1].as_str(), Some("two"));
        assert_eq!(x[2].as_f64(), Some(3.0));
    }

    #[test]
    fn ptr_eq_tracks_shared_roots() {
        let a = Value::from(json!({"k": 1}));
        let b = a.clone();
        assert!(a.ptr_eq(&b));

        let c = Value::from(json!({"k": 1}));
        assert_eq!(a, c);
        assert!(!a.ptr_eq(&c));

        assert!(!Value::Int(1).ptr_eq(&Value::Int(1)));
    }

    #[test]
    fn same_as_accepts_shared_or_equal() {
        let a = Value::from(json!({"k": [1, 2]}));
        assert!(a.same_as(&a.clone()));
        assert!(a.same_as(&Value::from(json!({"k": [1, 2]}))));
        assert!(!a.same_as(&Value::map()));
        assert!(Value::Int(1).same_as(&Value::Int(1)));
    }

    #[test]
    fn numeric_accessors() {
        assert_eq!(Value::Int(3).as_f64(), Some(3.0));
        assert_eq!(Value::Float(3.5).as_i64(), None);
        assert_eq!(Value::from("3").as_i64(), None);
    }

    #[test]
    fn option_and_vec_conversions() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(2)), Value::Int(2));
        let list = Value::from(vec![1, 2, 3]);
        assert_eq!(list.as_list().map(im::Vector::len), Some(3));
    }
}
