//! Date modifiers
//!
//! Every modifier parses its input through the value converter first and
//! passes the original value through unchanged when it does not parse into
//! a valid date.
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use super::super::convert::{to_date, to_date_string};
use chrono::{DateTime, Datelike, Duration, SecondsFormat, Timelike, Utc};
use serde_json::Value;

/// Render as a short locale-style date (`M/D/YYYY`)
pub fn format_date(value: &Value) -> Value {
    match to_date(value) {
        Some(date) => Value::String(format!("{}/{}/{}", date.month(), date.day(), date.year())),
        None => value.clone(),
    }
}

/// The date portion of the ISO rendering (`YYYY-MM-DD`)
pub fn date_only(value: &Value) -> Value {
    match to_date(value) {
        Some(date) => Value::String(date.format("%Y-%m-%d").to_string()),
        None => value.clone(),
    }
}

/// The time portion of the ISO rendering (`HH:MM:SS.mmmZ`)
pub fn time_only(value: &Value) -> Value {
    match to_date_string(value) {
        Some(iso) => match iso.split_once('T') {
            Some((_, time)) => Value::String(time.to_string()),
            None => value.clone(),
        },
        None => value.clone(),
    }
}

/// Unix timestamp in whole seconds
pub fn to_timestamp(value: &Value) -> Value {
    match to_date(value) {
        Some(date) => Value::from(date.timestamp()),
        None => value.clone(),
    }
}

/// Shift forward by `days`, rolling over month and year boundaries
pub fn add_days(value: &Value, days: i64) -> Value {
    shift_days(value, days)
}

/// Shift backward by `days`
pub fn subtract_days(value: &Value, days: i64) -> Value {
    shift_days(value, -days)
}

pub fn extract_year(value: &Value) -> Value {
    with_date(value, |date| Value::from(date.year()))
}

/// Calendar month, 1-12
pub fn extract_month(value: &Value) -> Value {
    with_date(value, |date| Value::from(date.month()))
}

pub fn extract_day(value: &Value) -> Value {
    with_date(value, |date| Value::from(date.day()))
}

pub fn extract_hour(value: &Value) -> Value {
    with_date(value, |date| Value::from(date.hour()))
}

pub fn extract_minute(value: &Value) -> Value {
    with_date(value, |date| Value::from(date.minute()))
}

fn shift_days(value: &Value, days: i64) -> Value {
    match to_date(value) {
        Some(date) => Value::String(
            (date + Duration::days(days)).to_rfc3339_opts(SecondsFormat::Millis, true),
        ),
        None => value.clone(),
    }
}

fn with_date(value: &Value, extract: impl Fn(DateTime<Utc>) -> Value) -> Value {
    match to_date(value) {
        Some(date) => extract(date),
        None => value.clone(),
    }
}
