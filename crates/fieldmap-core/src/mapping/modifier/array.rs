//! Array modifiers
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use super::super::convert::to_display_string;
use serde_json::Value;

/// First element; an empty array yields null
pub fn first(value: &Value) -> Value {
    match value {
        Value::Array(items) => items.first().cloned().unwrap_or(Value::Null),
        _ => value.clone(),
    }
}

/// Last element; an empty array yields null
pub fn last(value: &Value) -> Value {
    match value {
        Value::Array(items) => items.last().cloned().unwrap_or(Value::Null),
        _ => value.clone(),
    }
}

/// De-duplicate, keeping first occurrences in insertion order
pub fn unique(value: &Value) -> Value {
    match value {
        Value::Array(items) => {
            let mut seen: Vec<Value> = Vec::with_capacity(items.len());
            for item in items {
                if !seen.contains(item) {
                    seen.push(item.clone());
                }
            }
            Value::Array(seen)
        }
        _ => value.clone(),
    }
}

pub fn size(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::from(items.len()),
        _ => value.clone(),
    }
}

/// Reversed copy; the input is never mutated
pub fn reverse(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().rev().cloned().collect()),
        _ => value.clone(),
    }
}

/// Join elements with `separator`, stringifying each element
pub fn join(value: &Value, separator: &str) -> Value {
    match value {
        Value::Array(items) => Value::String(
            items
                .iter()
                .map(to_display_string)
                .collect::<Vec<_>>()
                .join(separator),
        ),
        _ => value.clone(),
    }
}

/// Slice with negative-index support: `-1` counts from the end
pub fn slice(value: &Value, start: i64, end: Option<i64>) -> Value {
    match value {
        Value::Array(items) => {
            let len = items.len() as i64;
            let from = clamp_index(start, len);
            let to = clamp_index(end.unwrap_or(len), len);
            if from >= to {
                return Value::Array(Vec::new());
            }
            Value::Array(items[from..to].to_vec())
        }
        _ => value.clone(),
    }
}

/// Element count for arrays, character count for strings
pub fn length(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::from(items.len()),
        Value::String(text) => Value::from(text.chars().count()),
        _ => value.clone(),
    }
}

fn clamp_index(index: i64, len: i64) -> usize {
    let resolved = if index < 0 { len + index } else { index };
    resolved.clamp(0, len) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_and_last() {
        assert_eq!(first(&json!([1, 2, 3])), json!(1));
        assert_eq!(last(&json!([1, 2, 3])), json!(3));
        assert_eq!(first(&json!([])), json!(null));
        assert_eq!(first(&json!("scalar")), json!("scalar"));
    }

    #[test]
    fn test_unique_preserves_insertion_order() {
        assert_eq!(unique(&json!([3, 1, 3, 2, 1])), json!([3, 1, 2]));
        assert_eq!(unique(&json!(["a", "a"])), json!(["a"]));
    }

    #[test]
    fn test_size_and_length() {
        assert_eq!(size(&json!([1, 2])), json!(2));
        assert_eq!(size(&json!("ab")), json!("ab"));
        assert_eq!(length(&json!("abc")), json!(3));
        assert_eq!(length(&json!([1])), json!(1));
        assert_eq!(length(&json!(7)), json!(7));
    }

    #[test]
    fn test_reverse_is_non_mutating() {
        let original = json!([1, 2, 3]);
        assert_eq!(reverse(&original), json!([3, 2, 1]));
        assert_eq!(original, json!([1, 2, 3]));
    }

    #[test]
    fn test_join() {
        assert_eq!(join(&json!(["a", "b"]), ","), json!("a,b"));
        assert_eq!(join(&json!([1, 2]), " - "), json!("1 - 2"));
    }

    #[test]
    fn test_slice() {
        assert_eq!(slice(&json!([1, 2, 3, 4]), 1, Some(3)), json!([2, 3]));
        assert_eq!(slice(&json!([1, 2, 3, 4]), 2, None), json!([3, 4]));
        assert_eq!(slice(&json!([1, 2, 3, 4]), -2, None), json!([3, 4]));
        assert_eq!(slice(&json!([1, 2]), 5, None), json!([]));
    }
}
