//! Path addressing over `Value` trees.
//!
//! These are the primitives every backend builds on: read, write and remove
//! a value at a key path inside a nested tree, plus pruning of blank
//! entries.

use crate::{KeyPath, Map, Value};

/// Get a reference to the value at `path`.
///
/// Returns `None` if a segment is missing or a scalar is reached before the
/// last segment. Array elements are addressed by decimal index.
pub fn get<'a>(tree: &'a Value, path: &KeyPath) -> Option<&'a Value> {
    let mut cursor = tree;
    for segment in path.iter() {
        cursor = match cursor {
            Value::Map(map) => map.get(segment.as_str())?,
            Value::Array(arr) => {
                let index: usize = segment.parse().ok()?;
                arr.get(index)?
            }
            _ => return None,
        };
    }
    Some(cursor)
}

/// Set `value` at `path`, creating intermediate maps as needed.
///
/// Any intermediate that is not a map (a scalar, an array, or a non-map
/// root) is replaced by an empty map before descending, so
/// `set("a", 1)` followed by `set("a.b", 2)` discards the `1`.
pub fn set(tree: &mut Value, path: &KeyPath, value: Value) {
    let last = path.len() - 1;
    let mut cursor = tree;

    for segment in &path.segments()[..last] {
        let map = coerce_to_map(cursor);
        let child = map.entry(segment.clone()).or_insert(Value::Null);
        if !child.is_map() {
            *child = Value::map();
        }
        cursor = child;
    }

    coerce_to_map(cursor).insert(path.last().to_string(), value);
}

/// Remove the entry at `path`, returning it.
///
/// A missing or non-map intermediate makes this a no-op. Sibling order is
/// preserved.
pub fn delete(tree: &mut Value, path: &KeyPath) -> Option<Value> {
    let mut cursor = tree;
    for segment in &path.segments()[..path.len() - 1] {
        cursor = match cursor {
            Value::Map(map) => map.get_mut(segment.as_str())?,
            _ => return None,
        };
    }

    match cursor {
        Value::Map(map) => map.shift_remove(path.last()),
        _ => None,
    }
}

/// Remove blank entries from every map in the tree, bottom-up.
///
/// An entry is blank when it is `Null`, an empty string, or an empty map;
/// maps emptied by pruning are removed in turn. Arrays are walked so the
/// maps inside them get pruned, but array elements are never removed.
pub fn prune_empty(tree: &mut Value) {
    match tree {
        Value::Map(map) => prune_map(map),
        Value::Array(arr) => arr.iter_mut().for_each(prune_empty),
        _ => {}
    }
}

fn prune_map(map: &mut Map) {
    map.retain(|_, child| {
        prune_empty(child);
        !is_prunable(child)
    });
}

fn is_prunable(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Map(map) => map.is_empty(),
        _ => false,
    }
}

fn coerce_to_map(value: &mut Value) -> &mut Map {
    if !value.is_map() {
        *value = Value::map();
    }
    match value {
        Value::Map(map) => map,
        _ => unreachable!("value was just replaced by a map"),
    }
}
