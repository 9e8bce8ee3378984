//! Numeric modifiers
//!
//! All functions operate on JSON numbers and pass any other input through
//! unchanged. Results that fall outside the representable range (NaN,
//! infinities) also pass the input through rather than degrade.
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use super::super::convert::number_value;
use serde_json::Value;

/// Half-up rounding to the given number of decimal places
pub fn round(value: &Value, decimals: u32) -> Value {
    with_number(value, |n| {
        let factor = 10f64.powi(decimals as i32);
        ((n * factor + 0.5).floor()) / factor
    })
}

pub fn floor(value: &Value) -> Value {
    with_number(value, f64::floor)
}

pub fn ceil(value: &Value) -> Value {
    with_number(value, f64::ceil)
}

pub fn abs(value: &Value) -> Value {
    with_number(value, f64::abs)
}

pub fn pow(value: &Value, exponent: f64) -> Value {
    with_number(value, |n| n.powf(exponent))
}

pub fn sqrt(value: &Value) -> Value {
    with_number(value, f64::sqrt)
}

/// Base-10 logarithm
pub fn log(value: &Value) -> Value {
    with_number(value, f64::log10)
}

/// Format as a currency string. `$` and `USD` take the fast fixed-2 path;
/// other codes fall back to a known-symbol table, then `code + fixed(2)`.
pub fn format_currency(value: &Value, symbol_or_code: &str, _locale: &str) -> Value {
    let amount = match value.as_f64() {
        Some(amount) => amount,
        None => return value.clone(),
    };
    let formatted = match symbol_or_code {
        "$" | "USD" => format!("${:.2}", amount),
        code => match currency_symbol(code) {
            Some(symbol) => format!("{}{:.2}", symbol, amount),
            None => format!("{}{:.2}", code, amount),
        },
    };
    Value::String(formatted)
}

/// `value / total * 100` when a total is given, else `value * 100`,
/// rounded to `decimals` places
pub fn percentage(value: &Value, total: Option<f64>, decimals: u32) -> Value {
    let scaled = match (value.as_f64(), total) {
        (Some(n), Some(total)) if total != 0.0 => n / total * 100.0,
        (Some(n), None) => n * 100.0,
        _ => return value.clone(),
    };
    round(&number_value(scaled), decimals)
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "EUR" | "€" => Some("€"),
        "GBP" | "£" => Some("£"),
        "JPY" | "¥" => Some("¥"),
        "INR" => Some("₹"),
        _ => None,
    }
}

fn with_number(value: &Value, op: impl Fn(f64) -> f64) -> Value {
    match value.as_f64() {
        Some(n) => {
            let result = op(n);
            if result.is_finite() {
                number_value(result)
            } else {
                value.clone()
            }
        }
        None => value.clone(),
    }
}
