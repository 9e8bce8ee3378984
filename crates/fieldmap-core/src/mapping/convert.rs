//! Best-effort value coercion
//!
//! Conversions are lossy, best-effort, and never error: anything that cannot be
//! coerced comes back as `None` (absent), which callers treat as "no value"
//! rather than a failure. Absence is deliberately distinct from `false`,
//! `0`, and `""`.
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use crate::types::FieldType;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::Value;

/// Coerce to a boolean. `"true"`/`"false"` (case-insensitive) map directly;
/// other non-empty values follow numeric/truthiness rules; absent or empty
/// input yields `None`, not `false`.
pub fn to_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Null => None,
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_f64().map(|n| n != 0.0),
        Value::String(text) => {
            if text.is_empty() {
                return None;
            }
            let lowered = text.to_lowercase();
            match lowered.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => match lowered.trim().parse::<f64>() {
                    Ok(n) => Some(n != 0.0),
                    Err(_) => Some(true),
                },
            }
        }
        Value::Array(items) => {
            if items.is_empty() {
                None
            } else {
                Some(true)
            }
        }
        Value::Object(map) => {
            if map.is_empty() {
                None
            } else {
                Some(true)
            }
        }
    }
}

/// Coerce to a number. Strings have `$` and `,` stripped before parsing a
/// leading float, so `"$1,234.50"` converts and `"42abc"` yields `42`.
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|n| !n.is_nan()),
        Value::String(text) => {
            let cleaned: String = text.chars().filter(|c| *c != '$' && *c != ',').collect();
            parse_float_prefix(&cleaned)
        }
        _ => None,
    }
}

/// Coerce to a UTC date. Accepts RFC 3339, common date/datetime layouts,
/// RFC 2822, and Unix milliseconds.
pub fn to_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_date_string(text),
        Value::Number(number) => number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

/// Coerce to an ISO-8601 date string with millisecond precision
pub fn to_date_string(value: &Value) -> Option<String> {
    to_date(value).map(|date| date.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Stringify a value. Falsy input (`null`, `false`, `0`, `""`) yields the
/// empty string; everything else uses the crate's canonical rendering.
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(false) => String::new(),
        Value::Bool(true) => "true".to_string(),
        Value::Number(number) => {
            let n = number.as_f64().unwrap_or(0.0);
            if n == 0.0 {
                String::new()
            } else {
                format_number(n)
            }
        }
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Dispatch conversion to the target kind
pub fn convert(value: &Value, target: FieldType) -> Option<Value> {
    match target {
        FieldType::String | FieldType::Unknown => Some(Value::String(to_display_string(value))),
        FieldType::Number => to_number(value).map(number_value),
        FieldType::Boolean => to_boolean(value).map(Value::Bool),
        FieldType::Date => to_date_string(value).map(Value::String),
        FieldType::Array => Some(match value {
            Value::Null => Value::Array(Vec::new()),
            Value::Array(_) => value.clone(),
            other => Value::Array(vec![other.clone()]),
        }),
        FieldType::Object => match value {
            Value::Object(_) => Some(value.clone()),
            _ => None,
        },
    }
}

/// Render a float without a trailing `.0` for whole numbers
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Build a JSON number, preferring the integer representation for whole
/// values so results compare equal to integer literals
pub fn number_value(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Parse the longest leading float, mirroring lenient parse-prefix
/// semantics: `"42abc"` yields `42`, `"abc"` yields nothing.
fn parse_float_prefix(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let mut seen_digit = false;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        seen_digit = true;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            seen_digit = true;
        }
    }
    if !seen_digit {
        return None;
    }
    // Optional exponent; only consumed when it is complete
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    trimmed[..end].parse::<f64>().ok()
}

fn parse_date_string(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|datetime| Utc.from_utc_datetime(&datetime));
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&datetime));
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%m/%d/%Y") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|datetime| Utc.from_utc_datetime(&datetime));
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(text) {
        return Some(date.with_timezone(&Utc));
    }
    None
}
