//! Path resolution for nested records
//!
//! Dot-notation addressing (`a.b.c`) with one level (or repeated levels) of
//! array-flatten notation (`addresses[].street`). Malformed or mismatched
//! paths never error: reads degrade to absent, writes to no-ops.
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use serde_json::{Map, Value};

/// Read the value at `path`, or `None` when the walk dead-ends.
///
/// An empty path yields the record itself. Array-flatten segments map every
/// element of the array through the remainder path, producing one flat list;
/// a non-array at the marker yields an empty list. Elements missing the
/// remainder contribute `null` so positions line up with [`set`].
pub fn get(record: &Value, path: &str) -> Option<Value> {
    if record.is_null() {
        return None;
    }
    if path.is_empty() {
        return Some(record.clone());
    }

    if let Some(marker) = path.find("[]") {
        let array_path = &path[..marker];
        let remainder = path[marker + 2..].trim_start_matches('.');

        let items = match get_plain(record, array_path) {
            Some(Value::Array(items)) => items,
            _ => return Some(Value::Array(Vec::new())),
        };

        let nested = remainder.contains("[]");
        let mut flattened = Vec::with_capacity(items.len());
        for item in &items {
            if remainder.is_empty() {
                flattened.push(item.clone());
                continue;
            }
            match get(item, remainder) {
                // A nested flatten already produced a list; merge it in
                Some(Value::Array(inner)) if nested => flattened.extend(inner),
                Some(value) => flattened.push(value),
                None => flattened.push(Value::Null),
            }
        }
        return Some(Value::Array(flattened));
    }

    get_plain(record, path)
}

/// Whether `path` resolves to a value that is neither absent nor null
pub fn has(record: &Value, path: &str) -> bool {
    matches!(get(record, path), Some(value) if !value.is_null())
}

/// Write `value` at `path`, creating intermediate objects as needed.
///
/// For array-flatten paths a missing array is created empty; an array value
/// is written element-by-element into the corresponding (created as needed)
/// array items at the remainder path, a scalar into item 0 only.
pub fn set(record: &mut Value, path: &str, value: Value) {
    if path.is_empty() {
        return;
    }

    if let Some(marker) = path.find("[]") {
        let array_path = path[..marker].to_string();
        let remainder = path[marker + 2..].trim_start_matches('.').to_string();

        let slot = ensure_path(record, &array_path);
        if !slot.is_array() {
            *slot = Value::Array(Vec::new());
        }
        let items = match slot.as_array_mut() {
            Some(items) => items,
            None => return,
        };

        match value {
            Value::Array(values) => {
                for (index, element) in values.into_iter().enumerate() {
                    while items.len() <= index {
                        items.push(Value::Object(Map::new()));
                    }
                    if remainder.is_empty() {
                        items[index] = element;
                    } else {
                        set(&mut items[index], &remainder, element);
                    }
                }
            }
            scalar => {
                if items.is_empty() {
                    items.push(Value::Object(Map::new()));
                }
                if remainder.is_empty() {
                    items[0] = scalar;
                } else {
                    set(&mut items[0], &remainder, scalar);
                }
            }
        }
        return;
    }

    let (parent_path, key) = match path.rsplit_once('.') {
        Some((parent, key)) => (parent, key),
        None => ("", path),
    };
    let parent = if parent_path.is_empty() {
        record
    } else {
        ensure_path(record, parent_path)
    };
    if !parent.is_object() {
        *parent = Value::Object(Map::new());
    }
    if let Some(object) = parent.as_object_mut() {
        object.insert(key.to_string(), value);
    }
}

/// Remove the key at the final path segment. Returns whether anything was
/// actually deleted; a walk that dead-ends is a no-op.
pub fn delete(record: &mut Value, path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    let (parent_path, key) = match path.rsplit_once('.') {
        Some((parent, key)) => (parent, key),
        None => ("", path),
    };
    let parent = if parent_path.is_empty() {
        record
    } else {
        match get_plain_mut(record, parent_path) {
            Some(parent) => parent,
            None => return false,
        }
    };
    parent
        .as_object_mut()
        .map(|object| object.remove(key).is_some())
        .unwrap_or(false)
}

fn get_plain(record: &Value, path: &str) -> Option<Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current.clone())
}

fn get_plain_mut<'a>(record: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = current.get_mut(segment)?;
    }
    Some(current)
}

/// Walk to `path`, converting missing or non-object intermediate segments
/// into fresh objects, and return the slot at the end of the walk.
fn ensure_path<'a>(record: &'a mut Value, path: &str) -> &'a mut Value {
    let mut current = record;
    for segment in path.split('.') {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        current = current
            .as_object_mut()
            .expect("just ensured an object")
            .entry(segment.to_string())
            .or_insert(Value::Null);
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_dot_path() {
        let record = json!({"a": {"b": {"c": 42}}});
        assert_eq!(get(&record, "a.b.c"), Some(json!(42)));
        assert_eq!(get(&record, "a.b"), Some(json!({"c": 42})));
        assert_eq!(get(&record, "a.x.c"), None);
        assert_eq!(get(&record, "missing"), None);
    }

    #[test]
    fn test_get_empty_path_yields_record() {
        let record = json!({"a": 1});
        assert_eq!(get(&record, ""), Some(json!({"a": 1})));
    }

    #[test]
    fn test_get_on_null_record() {
        assert_eq!(get(&Value::Null, "a.b"), None);
        assert_eq!(get(&Value::Null, ""), None);
    }

    #[test]
    fn test_get_array_flatten() {
        let record = json!({
            "addresses": [{"street": "A"}, {"street": "B"}]
        });
        assert_eq!(get(&record, "addresses[].street"), Some(json!(["A", "B"])));
    }

    #[test]
    fn test_get_array_flatten_non_array_yields_empty_list() {
        let record = json!({"addresses": "not an array"});
        assert_eq!(get(&record, "addresses[].street"), Some(json!([])));
        assert_eq!(get(&json!({}), "addresses[].street"), Some(json!([])));
    }

    #[test]
    fn test_get_array_flatten_missing_elements_keep_positions() {
        let record = json!({
            "addresses": [{"street": "A"}, {"city": "X"}]
        });
        assert_eq!(
            get(&record, "addresses[].street"),
            Some(json!(["A", null]))
        );
    }

    #[test]
    fn test_get_nested_array_flatten_produces_flat_list() {
        let record = json!({
            "orders": [
                {"items": [{"sku": "a"}, {"sku": "b"}]},
                {"items": [{"sku": "c"}]}
            ]
        });
        assert_eq!(
            get(&record, "orders[].items[].sku"),
            Some(json!(["a", "b", "c"]))
        );
    }

    #[test]
    fn test_has() {
        let record = json!({"a": {"b": null, "c": 0}});
        assert!(has(&record, "a.c"));
        assert!(!has(&record, "a.b"));
        assert!(!has(&record, "a.x"));
    }

    #[test]
    fn test_set_creates_intermediate_objects() {
        let mut record = json!({});
        set(&mut record, "a.b.c", json!(1));
        assert_eq!(record, json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let mut record = json!({"existing": true});
        set(&mut record, "nested.field", json!("value"));
        assert_eq!(get(&record, "nested.field"), Some(json!("value")));
        assert_eq!(get(&record, "existing"), Some(json!(true)));
    }

    #[test]
    fn test_set_array_flatten_with_array_value() {
        let mut record = json!({});
        set(&mut record, "addresses[].street", json!(["A", "B"]));
        assert_eq!(
            record,
            json!({"addresses": [{"street": "A"}, {"street": "B"}]})
        );
    }

    #[test]
    fn test_set_array_flatten_with_scalar_writes_item_zero() {
        let mut record = json!({});
        set(&mut record, "addresses[].street", json!("A"));
        assert_eq!(record, json!({"addresses": [{"street": "A"}]}));
    }

    #[test]
    fn test_set_array_flatten_into_existing_items() {
        let mut record = json!({"addresses": [{"zip": "1"}, {"zip": "2"}]});
        set(&mut record, "addresses[].street", json!(["A", "B", "C"]));
        assert_eq!(
            record,
            json!({"addresses": [
                {"zip": "1", "street": "A"},
                {"zip": "2", "street": "B"},
                {"street": "C"}
            ]})
        );
    }

    #[test]
    fn test_delete() {
        let mut record = json!({"a": {"b": 1, "c": 2}});
        assert!(delete(&mut record, "a.b"));
        assert_eq!(record, json!({"a": {"c": 2}}));
        assert!(!delete(&mut record, "a.b"));
        assert!(!delete(&mut record, "x.y.z"));
    }
}
