//! String modifiers
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use serde_json::Value;

pub fn uppercase(value: &Value) -> Value {
    match value {
        Value::String(text) => Value::String(text.to_uppercase()),
        _ => value.clone(),
    }
}

pub fn lowercase(value: &Value) -> Value {
    match value {
        Value::String(text) => Value::String(text.to_lowercase()),
        _ => value.clone(),
    }
}

/// First letter upper-cased, remainder lower-cased
pub fn capitalize(value: &Value) -> Value {
    match value {
        Value::String(text) => {
            let mut chars = text.chars();
            let capitalized = match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            };
            Value::String(capitalized)
        }
        _ => value.clone(),
    }
}

pub fn trim(value: &Value) -> Value {
    match value {
        Value::String(text) => Value::String(text.trim().to_string()),
        _ => value.clone(),
    }
}

pub fn reverse(value: &Value) -> Value {
    match value {
        Value::String(text) => Value::String(text.chars().rev().collect()),
        _ => value.clone(),
    }
}

/// Lower-case, trim, drop non-word/non-space/non-hyphen characters, and
/// collapse runs of spaces/underscores/hyphens into single hyphens
pub fn slugify(value: &Value) -> Value {
    let text = match value {
        Value::String(text) => text,
        _ => return value.clone(),
    };

    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;
    for ch in text.trim().to_lowercase().chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_separator = true;
        }
    }
    Value::String(slug)
}

/// Pad on the left up to `length` with `pad` (default space). Numbers are
/// stringified first; anything else passes through.
pub fn pad_left(value: &Value, length: usize, pad: char) -> Value {
    let text = match value {
        Value::String(text) => text.clone(),
        Value::Number(_) => super::super::convert::to_display_string(value),
        _ => return value.clone(),
    };
    Value::String(pad_start(&text, length, pad))
}

/// Pad on the right up to `length` with `pad` (default space)
pub fn pad_right(value: &Value, length: usize, pad: char) -> Value {
    let text = match value {
        Value::String(text) => text.clone(),
        Value::Number(_) => super::super::convert::to_display_string(value),
        _ => return value.clone(),
    };
    let mut padded = text;
    while padded.chars().count() < length {
        padded.push(pad);
    }
    Value::String(padded)
}

fn pad_start(text: &str, length: usize, pad: char) -> String {
    let current = text.chars().count();
    if current >= length {
        return text.to_string();
    }
    let mut padded = String::with_capacity(length);
    for _ in current..length {
        padded.push(pad);
    }
    padded.push_str(text);
    padded
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_case_modifiers() {
        assert_eq!(uppercase(&json!("abc")), json!("ABC"));
        assert_eq!(lowercase(&json!("ABC")), json!("abc"));
        assert_eq!(capitalize(&json!("hELLO")), json!("Hello"));
        assert_eq!(capitalize(&json!("")), json!(""));
    }

    #[test]
    fn test_type_mismatch_passes_through() {
        assert_eq!(uppercase(&json!(42)), json!(42));
        assert_eq!(trim(&json!([1, 2])), json!([1, 2]));
        assert_eq!(slugify(&json!(true)), json!(true));
    }

    #[test]
    fn test_trim_and_reverse() {
        assert_eq!(trim(&json!("  padded  ")), json!("padded"));
        assert_eq!(reverse(&json!("abc")), json!("cba"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify(&json!("Hello World!")), json!("hello-world"));
        assert_eq!(slugify(&json!("Test___Value")), json!("test-value"));
        assert_eq!(slugify(&json!("  --Already--Slugged--  ")), json!("already-slugged"));
        assert_eq!(slugify(&json!("Mixed CASE and-dashes")), json!("mixed-case-and-dashes"));
    }

    #[test]
    fn test_padding() {
        assert_eq!(pad_left(&json!("5"), 3, '0'), json!("005"));
        assert_eq!(pad_left(&json!(5), 3, '0'), json!("005"));
        assert_eq!(pad_left(&json!("long"), 2, '0'), json!("long"));
        assert_eq!(pad_right(&json!("ab"), 4, '.'), json!("ab.."));
    }
}
