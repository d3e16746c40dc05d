#![forbid(unsafe_code)]

//! Non-destructive structural reads and writes at a key path.
//!
//! These are the primitives lenses are built from.
//!
//! # Failure Modes
//!
//! | Situation | Read ([`get_in`]) | Write ([`assoc_in`]) |
//! |-----------|-------------------|----------------------|
//! | Missing segment | `None` | Intermediate container created |
//! | Scalar where a container is needed | `None` | Scalar replaced by a container |
//! | Index past end of list | `None` | Gap padded with `Null` |
//! | Index more than [`MAX_LIST_PAD`] past the end | `None` | List becomes a map keyed by index |
//! | Non-numeric field on a list | `None` | List becomes a map keyed by index |
//! | Empty path | Whole value | Whole value replaced |

use crate::path::Key;
use crate::value::{Map, Value};

/// Largest run of `Null` padding a write past the end of a list may add.
///
/// A write further out turns the list into a map keyed by decimal index, so
/// the cost of a write never depends on the size of an index.
pub const MAX_LIST_PAD: usize = 1024;

/// Read the value at `keys`, or `None` if any segment is missing.
#[must_use]
pub fn get_in<'a>(value: &'a Value, keys: &[Key]) -> Option<&'a Value> {
    keys.iter().try_fold(value, child)
}

fn child<'a>(value: &'a Value, key: &Key) -> Option<&'a Value> {
    match value {
        Value::Map(fields) => fields.get(key.to_field().as_str()),
        Value::List(items) => items.get(key.to_index()?),
        _ => None,
    }
}

/// Return a copy of `value` with `slice` stored at `keys`.
///
/// Every container along the path is copied; everything off the path is
/// shared with `value`.
#[must_use]
pub fn assoc_in(value: &Value, keys: &[Key], slice: Value) -> Value {
    let Some((head, rest)) = keys.split_first() else {
        return slice;
    };
    let next = match rest.first() {
        None => slice,
        Some(next_key) => match child(value, head) {
            Some(existing) if existing.is_container() => assoc_in(existing, rest, slice),
            _ => assoc_in(&empty_for(next_key), rest, slice),
        },
    };
    with_child(value, head, next)
}

/// Fresh container of the kind `key` addresses.
fn empty_for(key: &Key) -> Value {
    if key.is_index() {
        Value::list()
    } else {
        Value::map()
    }
}

fn with_child(value: &Value, key: &Key, child: Value) -> Value {
    match value {
        Value::Map(fields) => Value::Map(fields.update(key.to_field(), child)),
        Value::List(items) => match key.to_index() {
            Some(i) if i < items.len() => Value::List(items.update(i, child)),
            Some(i) if i - items.len() <= MAX_LIST_PAD => {
                let mut items = items.clone();
                while items.len() < i {
                    items.push_back(Value::Null);
                }
                items.push_back(child);
                Value::List(items)
            }
            _ => {
                let mut fields: Map = items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), v.clone()))
                    .collect();
                fields.insert(key.to_field(), child);
                Value::Map(fields)
            }
        },
        _ => with_child(&empty_for(key), key, child),
    }
}
