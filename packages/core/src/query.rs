//! Document queries over an array stored under a key.
//!
//! A document is any map in the array. A query is a map of fields; a
//! document matches when every query field is present in it with an equal
//! value. Updates are shallow: each update field replaces the document's
//! field of the same name.

use crate::error::{ArgumentError, Result};
use crate::value::{Map, Value};

/// A document before and after an update.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdatedDocument {
    pub old: Value,
    pub new: Value,
}

/// Read the value under a key as a list of documents.
///
/// An absent (or null) value is an empty list. Anything else that is not an
/// array is rejected.
pub fn documents(current: Option<&Value>) -> Result<Vec<Value>> {
    match current {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(arr)) => Ok(arr.clone()),
        Some(_) => Err(ArgumentError::NotArray.into()),
    }
}

/// Check whether `doc` matches `query`.
pub fn matches(doc: &Value, query: &Map) -> bool {
    let Some(fields) = doc.as_map() else {
        return false;
    };
    query
        .iter()
        .all(|(name, expected)| fields.get(name) == Some(expected))
}

/// Every matching document, in array order.
pub fn find(docs: &[Value], query: &Map) -> Vec<Value> {
    docs.iter().filter(|doc| matches(doc, query)).cloned().collect()
}

/// The first matching document.
pub fn find_one(docs: &[Value], query: &Map) -> Option<Value> {
    docs.iter().find(|doc| matches(doc, query)).cloned()
}

fn merge(doc: &mut Value, update: &Map) {
    if let Some(fields) = doc.as_map_mut() {
        for (name, value) in update {
            fields.insert(name.clone(), value.clone());
        }
    }
}

/// Apply `update` to matching documents in place.
///
/// With `first_only`, stops after the first match.
pub fn update_matching(
    docs: &mut [Value],
    query: &Map,
    update: &Map,
    first_only: bool,
) -> Vec<UpdatedDocument> {
    let mut updated = Vec::new();
    for doc in docs.iter_mut() {
        if !matches(doc, query) {
            continue;
        }
        let old = doc.clone();
        merge(doc, update);
        updated.push(UpdatedDocument {
            old,
            new: doc.clone(),
        });
        if first_only {
            break;
        }
    }
    updated
}

/// Remove matching documents, returning them.
///
/// With `first_only`, removes only the first match.
pub fn delete_matching(docs: &mut Vec<Value>, query: &Map, first_only: bool) -> Vec<Value> {
    if first_only {
        return match docs.iter().position(|doc| matches(doc, query)) {
            Some(i) => vec![docs.remove(i)],
            None => Vec::new(),
        };
    }

    let (removed, kept): (Vec<Value>, Vec<Value>) =
        docs.drain(..).partition(|doc| matches(doc, query));
    *docs = kept;
    removed
}
