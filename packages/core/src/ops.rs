//! Arithmetic and array operations on stored values.
//!
//! These are pure: each takes the value currently stored under a key (if
//! any) and computes what should be stored next. Backends load the current
//! value, call one of these, and persist the result.

use crate::error::{ArgumentError, Result};
use crate::value::{Number, Value};

/// Validate an amount passed to `add`/`subtract`.
pub fn amount(value: &Value) -> Result<Number> {
    if value.is_blank() {
        return Err(ArgumentError::BlankValue.into());
    }
    value
        .as_number()
        .ok_or_else(|| ArgumentError::NotNumeric.into())
}

/// Validate a value passed to `set`, `push` and friends.
pub fn storable(value: &Value) -> Result<()> {
    if value.is_blank() {
        return Err(ArgumentError::BlankValue.into());
    }
    Ok(())
}

/// Convert a 1-based public priority into an array index.
pub fn priority_index(priority: usize) -> Result<usize> {
    priority
        .checked_sub(1)
        .ok_or_else(|| ArgumentError::ZeroPriority.into())
}

fn sum(a: Number, b: Number) -> Number {
    match (a, b) {
        (Number::Integer(a), Number::Integer(b)) => match a.checked_add(b) {
            Some(n) => Number::Integer(n),
            None => Number::Float(a as f64 + b as f64),
        },
        (a, b) => Number::Float(a.as_f64() + b.as_f64()),
    }
}

fn difference(a: Number, b: Number) -> Number {
    match (a, b) {
        (Number::Integer(a), Number::Integer(b)) => match a.checked_sub(b) {
            Some(n) => Number::Integer(n),
            None => Number::Float(a as f64 - b as f64),
        },
        (a, b) => Number::Float(a.as_f64() - b.as_f64()),
    }
}

/// The value `add` stores: the current number (0 when absent or not
/// numeric) plus `amount`.
pub fn added(current: Option<&Value>, amount: Number) -> Value {
    let base = current
        .and_then(Value::as_number)
        .unwrap_or(Number::Integer(0));

    match sum(base, amount) {
        Number::Integer(i) => Value::Integer(i),
        Number::Float(f) => Value::Float(f),
    }
}

/// What `subtract` does to the key.
#[derive(Clone, Debug, PartialEq)]
pub enum SubtractOutcome {
    /// Remove the key; the caller reports 0.
    Delete,
    /// Store this value.
    Store(Value),
}

/// Decide the result of subtracting `amount` from the current value.
///
/// Counters never go below 1: a result under 1 deletes the key instead. A
/// value that is present but not numeric is reset to 1.
pub fn subtracted(current: Option<&Value>, amount: Number) -> SubtractOutcome {
    let current = match current {
        None | Some(Value::Null) => return SubtractOutcome::Delete,
        Some(value) => value,
    };

    let Some(base) = current.as_number() else {
        return SubtractOutcome::Store(Value::Integer(1));
    };

    match difference(base, amount) {
        Number::Integer(n) if n < 1 => SubtractOutcome::Delete,
        Number::Float(f) if f < 1.0 => SubtractOutcome::Delete,
        Number::Integer(n) => SubtractOutcome::Store(Value::Integer(n)),
        Number::Float(f) => SubtractOutcome::Store(Value::Float(f.max(1.0))),
    }
}

/// Read the current value as an array; anything else counts as empty.
fn elements(current: Option<&Value>) -> Vec<Value> {
    match current {
        Some(Value::Array(arr)) => arr.clone(),
        _ => Vec::new(),
    }
}

/// The array after appending `value`.
pub fn pushed(current: Option<&Value>, value: Value) -> Vec<Value> {
    let mut arr = elements(current);
    arr.push(value);
    arr
}

/// The array with every element equal to `value` removed.
pub fn unpushed(current: Option<&Value>, value: &Value) -> Vec<Value> {
    let mut arr = elements(current);
    arr.retain(|element| element != value);
    arr
}

/// Non-empty array stored under a key, for the priority operations.
fn non_empty_array(current: Option<&Value>) -> Option<&Vec<Value>> {
    match current {
        Some(Value::Array(arr)) if !arr.is_empty() => Some(arr),
        _ => None,
    }
}

/// The array with the element at `index` (0-based) replaced by `value`.
///
/// `None` when there is no non-empty array to work on. An out-of-range
/// index leaves the elements unchanged.
pub fn replaced_at(current: Option<&Value>, index: usize, value: Value) -> Option<Vec<Value>> {
    let mut arr = non_empty_array(current)?.clone();
    if let Some(slot) = arr.get_mut(index) {
        *slot = value;
    }
    Some(arr)
}

/// The array with the element at `index` (0-based) removed.
///
/// `None` when there is no non-empty array to work on.
pub fn removed_at(current: Option<&Value>, index: usize) -> Option<Vec<Value>> {
    let arr = non_empty_array(current)?;
    Some(
        arr.iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, element)| element.clone())
            .collect(),
    )
}
