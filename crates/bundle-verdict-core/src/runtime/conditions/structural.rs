// crates/bundle-verdict-core/src/runtime/conditions/structural.rs
// ============================================================================
// Module: Structural Conditions
// Description: Document selection and order-insensitive equality.
// Purpose: Back the YAML and JSON comparison analyzers.
// Dependencies: jsonpath_lib, serde_json
// ============================================================================

//! ## Overview
//! Both YAML and JSON documents are normalized to [`serde_json::Value`] before
//! selection, so one set of helpers serves both analyzers. Numbers compare by
//! numeric value, so `1` and `1.0` are equal.

use serde_json::Value;

use crate::core::AnalyzeError;

// ============================================================================
// SECTION: Selection
// ============================================================================

/// Selects a value by dotted path.
///
/// Map keys select object members and integer segments select array
/// elements. An empty path selects the whole document.
///
/// # Errors
///
/// Returns [`AnalyzeError::Invalid`] when a segment does not resolve.
pub fn select_path(document: &Value, path: &str) -> Result<Value, AnalyzeError> {
    let path = path.trim();
    if path.is_empty() {
        return Ok(document.clone());
    }
    let mut current = document;
    for segment in path.split('.') {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => {
                segment.parse::<usize>().ok().and_then(|index| items.get(index))
            }
            _ => None,
        };
        current = next.ok_or_else(|| {
            AnalyzeError::Invalid(format!("path '{path}' does not resolve at '{segment}'"))
        })?;
    }
    Ok(current.clone())
}

/// Selects a value with a JSONPath expression.
///
/// Surrounding braces are stripped and a leading `$` is added when missing.
/// A single match is returned as-is; zero or several matches are returned as
/// an array.
///
/// # Errors
///
/// Returns [`AnalyzeError::Invalid`] when the expression does not compile.
pub fn select_json_path(document: &Value, expression: &str) -> Result<Value, AnalyzeError> {
    let query = normalize_json_path(expression);
    let matches = jsonpath_lib::select(document, &query).map_err(|err| {
        AnalyzeError::Invalid(format!("invalid jsonPath '{expression}': {err}"))
    })?;
    if let [single] = matches.as_slice() {
        return Ok((*single).clone());
    }
    Ok(Value::Array(matches.into_iter().cloned().collect()))
}

/// Rewrites `{.a.b}` style expressions to `$.a.b`.
fn normalize_json_path(expression: &str) -> String {
    let trimmed = expression.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(trimmed)
        .trim();
    if inner.starts_with('$') {
        inner.to_string()
    } else if inner.starts_with('.') || inner.starts_with('[') {
        format!("${inner}")
    } else {
        format!("$.{inner}")
    }
}

// ============================================================================
// SECTION: Equality
// ============================================================================

/// Compares two documents, ignoring element order of top-level arrays.
#[must_use]
pub fn equal_ignoring_order(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Array(left), Value::Array(right)) => {
            if left.len() != right.len() {
                return false;
            }
            let mut left = left.iter().collect::<Vec<_>>();
            let mut right = right.iter().collect::<Vec<_>>();
            left.sort_by_cached_key(|value| value.to_string());
            right.sort_by_cached_key(|value| value.to_string());
            left.iter().zip(&right).all(|(left, right)| values_equal(left, right))
        }
        _ => values_equal(actual, expected),
    }
}

/// Deep equality that compares numbers by value.
#[must_use]
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => {
            left == right
                || left.as_f64().zip(right.as_f64()).is_some_and(|(a, b)| a.total_cmp(&b).is_eq())
        }
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len() && left.iter().zip(right).all(|(l, r)| values_equal(l, r))
        }
        (Value::Object(left), Value::Object(right)) => {
            left.len() == right.len()
                && left.iter().all(|(key, value)| {
                    right.get(key).is_some_and(|other| values_equal(value, other))
                })
        }
        _ => left == right,
    }
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use serde_json::json;

    use super::*;

    #[test]
    fn dotted_path_walks_maps_and_indexes() {
        let document = json!({"a": {"b": [{"c": 1}, {"c": 2}]}});
        assert_eq!(select_path(&document, "a.b.1.c").unwrap(), json!(2));
        assert_eq!(select_path(&document, "").unwrap(), document);
        assert!(select_path(&document, "a.x").is_err());
        assert!(select_path(&document, "a.b.9").is_err());
    }

    #[test]
    fn json_path_unwraps_single_matches() {
        let document = json!({"spec": {"replicas": 3, "ports": [80, 443]}});
        assert_eq!(select_json_path(&document, "{.spec.replicas}").unwrap(), json!(3));
        assert_eq!(select_json_path(&document, "$.spec.ports[*]").unwrap(), json!([80, 443]));
        assert_eq!(select_json_path(&document, "spec.missing").unwrap(), json!([]));
    }

    #[test]
    fn top_level_arrays_ignore_order() {
        assert!(equal_ignoring_order(&json!(["b", "a"]), &json!(["a", "b"])));
        assert!(!equal_ignoring_order(&json!(["a"]), &json!(["a", "a"])));
        assert!(!equal_ignoring_order(&json!({"x": [1, 2]}), &json!({"x": [2, 1]})));
    }

    #[test]
    fn numbers_compare_by_value() {
        assert!(equal_ignoring_order(&json!({"n": 1}), &json!({"n": 1.0})));
        assert!(!equal_ignoring_order(&json!(1), &json!("1")));
    }
}
