//! Reusable predicates for section `condition` functions.
//!
//! Page composition configs tend to repeat the same small checks; these
//! helpers keep them consistent across configs.

use blox_core::{DataRef, lookup};
use serde_json::Value as JsonValue;

/// Ordinary JS-style truthiness: `null`, `false`, `0`, and `""` are falsy,
/// everything else (including empty containers) is truthy.
///
/// The empty-container-is-falsy rule is a visibility-layer addition, not
/// part of truthiness itself; see [`crate::visibility`].
pub fn truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(flag) => *flag,
        JsonValue::Number(number) => number.as_f64().map(|f| f != 0.0).unwrap_or(true),
        JsonValue::String(text) => !text.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

/// True when the value is a non-empty array.
pub fn has_items(value: &JsonValue) -> bool {
    value.as_array().is_some_and(|items| !items.is_empty())
}

/// True unless the value is falsy or carries `enabled: false`.
pub fn is_enabled(value: &JsonValue) -> bool {
    if !truthy(value) {
        return false;
    }
    value.get("enabled") != Some(&JsonValue::Bool(false))
}

/// True when a value exists and is truthy.
pub fn exists(value: Option<&JsonValue>) -> bool {
    value.is_some_and(truthy)
}

/// True when the dot-separated path leads to a non-empty array.
pub fn has_items_at(tree: &DataRef, path: &str) -> bool {
    match lookup(tree, path) {
        Some(DataRef::Value(value)) => has_items(&value),
        _ => false,
    }
}
