//! Modifier library: pure post-processing functions over values
//!
//! Modifiers are grouped into string, number, date, and array families and
//! registered in a static name table for dynamic dispatch. Every modifier is
//! a total function over arbitrary input: a type mismatch returns the input
//! unchanged rather than erroring. Unknown names are reported to the caller
//! (who records a structured warning) and the value passes through.
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

pub mod array;
pub mod date;
pub mod number;
pub mod string;

use serde_json::Value;

/// A simple modifier: value in, value out
pub type ModifierFn = fn(&Value) -> Value;

/// A parameterized modifier: value plus its declared parameters
pub type ParamModifierFn = fn(&Value, &[Value]) -> Value;

/// Static registry of simple modifiers (parameterized defaults applied)
pub const SIMPLE: &[(&str, ModifierFn)] = &[
    // string
    ("uppercase", string::uppercase),
    ("lowercase", string::lowercase),
    ("capitalize", string::capitalize),
    ("trim", string::trim),
    ("reverse", reverse_any),
    ("slugify", string::slugify),
    ("padLeft", pad_left_default),
    // number
    ("round", round_default),
    ("floor", number::floor),
    ("ceil", number::ceil),
    ("abs", number::abs),
    ("formatCurrency", format_currency_default),
    ("pow", pow_default),
    ("sqrt", number::sqrt),
    ("log", number::log),
    ("percentage", percentage_default),
    // date
    ("formatDate", date::format_date),
    ("dateOnly", date::date_only),
    ("timeOnly", date::time_only),
    ("toTimestamp", date::to_timestamp),
    ("addDays", add_days_default),
    ("subtractDays", subtract_days_default),
    ("extractYear", date::extract_year),
    ("extractMonth", date::extract_month),
    ("extractDay", date::extract_day),
    // array
    ("first", array::first),
    ("last", array::last),
    ("unique", array::unique),
    ("size", array::size),
    ("join", join_default),
    ("slice", slice_default),
];

/// Static registry of parameterized modifiers, including the built-in
/// fallbacks that have no simple-registry counterpart (extractHour,
/// extractMinute, length, arrayReverse, padRight)
pub const PARAMETERIZED: &[(&str, ParamModifierFn)] = &[
    ("padLeft", pad_left_params),
    ("padRight", pad_right_params),
    ("round", round_params),
    ("formatCurrency", format_currency_params),
    ("pow", pow_params),
    ("percentage", percentage_params),
    ("addDays", add_days_params),
    ("subtractDays", subtract_days_params),
    ("join", join_params),
    ("slice", slice_params),
    ("extractHour", extract_hour_params),
    ("extractMinute", extract_minute_params),
    ("length", length_params),
    ("arrayReverse", array_reverse_params),
];

/// Apply a simple modifier by name. `None` means the name is unknown and
/// the caller should pass the value through (with a warning).
pub fn apply(name: &str, value: &Value) -> Option<Value> {
    SIMPLE
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, function)| function(value))
}

/// Apply a parameterized modifier by name, falling back to the simple
/// registry (parameters ignored) for names registered only there.
pub fn apply_with_params(name: &str, value: &Value, params: &[Value]) -> Option<Value> {
    if let Some((_, function)) = PARAMETERIZED.iter().find(|(candidate, _)| *candidate == name) {
        return Some(function(value, params));
    }
    apply(name, value)
}

/// Whether the name exists in either registry
pub fn is_known(name: &str) -> bool {
    SIMPLE.iter().any(|(candidate, _)| *candidate == name)
        || PARAMETERIZED.iter().any(|(candidate, _)| *candidate == name)
}

// Dispatch helpers shared by the registries

fn reverse_any(value: &Value) -> Value {
    match value {
        Value::String(_) => string::reverse(value),
        Value::Array(_) => array::reverse(value),
        _ => value.clone(),
    }
}

fn param_f64(params: &[Value], index: usize) -> Option<f64> {
    params.get(index).and_then(Value::as_f64)
}

fn param_i64(params: &[Value], index: usize) -> Option<i64> {
    params.get(index).and_then(Value::as_i64)
}

fn param_char(params: &[Value], index: usize, default: char) -> char {
    params
        .get(index)
        .and_then(Value::as_str)
        .and_then(|text| text.chars().next())
        .unwrap_or(default)
}

fn param_str<'a>(params: &'a [Value], index: usize, default: &'a str) -> &'a str {
    params.get(index).and_then(Value::as_str).unwrap_or(default)
}

// Simple-registry wrappers fixing the documented defaults

fn pad_left_default(value: &Value) -> Value {
    string::pad_left(value, 0, ' ')
}

fn round_default(value: &Value) -> Value {
    number::round(value, 0)
}

fn format_currency_default(value: &Value) -> Value {
    number::format_currency(value, "$", "en-US")
}

fn pow_default(value: &Value) -> Value {
    number::pow(value, 2.0)
}

fn percentage_default(value: &Value) -> Value {
    number::percentage(value, None, 2)
}

fn add_days_default(value: &Value) -> Value {
    date::add_days(value, 1)
}

fn subtract_days_default(value: &Value) -> Value {
    date::subtract_days(value, 1)
}

fn join_default(value: &Value) -> Value {
    array::join(value, ",")
}

fn slice_default(value: &Value) -> Value {
    array::slice(value, 0, None)
}

// Parameterized-registry adapters: fixed per-type argument order

fn pad_left_params(value: &Value, params: &[Value]) -> Value {
    let length = param_i64(params, 0).unwrap_or(0).max(0) as usize;
    string::pad_left(value, length, param_char(params, 1, ' '))
}

fn pad_right_params(value: &Value, params: &[Value]) -> Value {
    let length = param_i64(params, 0).unwrap_or(0).max(0) as usize;
    string::pad_right(value, length, param_char(params, 1, ' '))
}

fn round_params(value: &Value, params: &[Value]) -> Value {
    let decimals = param_i64(params, 0).unwrap_or(0).clamp(0, 12) as u32;
    number::round(value, decimals)
}

fn format_currency_params(value: &Value, params: &[Value]) -> Value {
    let symbol = param_str(params, 0, "$");
    let locale = param_str(params, 1, "en-US");
    number::format_currency(value, symbol, locale)
}

fn pow_params(value: &Value, params: &[Value]) -> Value {
    number::pow(value, param_f64(params, 0).unwrap_or(2.0))
}

fn percentage_params(value: &Value, params: &[Value]) -> Value {
    let total = param_f64(params, 0);
    let decimals = param_i64(params, 1).unwrap_or(2).clamp(0, 12) as u32;
    number::percentage(value, total, decimals)
}

fn add_days_params(value: &Value, params: &[Value]) -> Value {
    date::add_days(value, param_i64(params, 0).unwrap_or(1))
}

fn subtract_days_params(value: &Value, params: &[Value]) -> Value {
    date::subtract_days(value, param_i64(params, 0).unwrap_or(1))
}

fn join_params(value: &Value, params: &[Value]) -> Value {
    array::join(value, param_str(params, 0, ","))
}

fn slice_params(value: &Value, params: &[Value]) -> Value {
    let start = param_i64(params, 0).unwrap_or(0);
    array::slice(value, start, param_i64(params, 1))
}

fn extract_hour_params(value: &Value, _params: &[Value]) -> Value {
    date::extract_hour(value)
}

fn extract_minute_params(value: &Value, _params: &[Value]) -> Value {
    date::extract_minute(value)
}

fn length_params(value: &Value, _params: &[Value]) -> Value {
    array::length(value)
}

fn array_reverse_params(value: &Value, _params: &[Value]) -> Value {
    array::reverse(value)
}
