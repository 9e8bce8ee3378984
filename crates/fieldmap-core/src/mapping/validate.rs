//! Declarative value validation
//!
//! Evaluates a list of validation rules against a (possibly absent) value
//! and returns human-readable violations. Validation itself never errors:
//! an invalid regex pattern counts as valid, and `custom` rules are a
//! documented no-op.
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use super::convert;
use crate::types::{ValidationRule, ValidationType};
use regex::Regex;
use serde_json::Value;
use url::Url;

/// Check `value` against every enabled rule, collecting violation messages.
/// An empty result means the value passed.
pub fn validate_value(value: Option<&Value>, rules: &[ValidationRule]) -> Vec<String> {
    let mut violations = Vec::new();
    for rule in rules {
        if !rule.is_enabled() {
            continue;
        }
        if let Some(message) = check_rule(value, rule) {
            violations.push(message);
        }
    }
    violations
}

fn check_rule(value: Option<&Value>, rule: &ValidationRule) -> Option<String> {
    let failed = match rule.kind {
        ValidationType::Required => is_missing(value),
        ValidationType::MinLength => {
            let min = config_number(rule)?;
            measured_length(value).map(|len| (len as f64) < min).unwrap_or(false)
        }
        ValidationType::MaxLength => {
            let max = config_number(rule)?;
            measured_length(value).map(|len| (len as f64) > max).unwrap_or(false)
        }
        ValidationType::Min => {
            let min = config_number(rule)?;
            numeric(value).map(|n| n < min).unwrap_or(false)
        }
        ValidationType::Max => {
            let max = config_number(rule)?;
            numeric(value).map(|n| n > max).unwrap_or(false)
        }
        ValidationType::Pattern => {
            let pattern = config_string(rule)?;
            match Regex::new(&pattern) {
                Ok(regex) => {
                    let text = stringified(value);
                    !regex.is_match(&text)
                }
                // An unparsable pattern counts as valid rather than erroring
                Err(_) => false,
            }
        }
        ValidationType::Email => !looks_like_email(&stringified(value)),
        ValidationType::Url => Url::parse(&stringified(value)).is_err(),
        // Documented no-op: custom validators are not executed and always pass
        ValidationType::Custom => false,
    };

    if failed {
        Some(
            rule.error_message
                .clone()
                .unwrap_or_else(|| default_message(rule)),
        )
    } else {
        None
    }
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None => true,
        Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(_) => false,
    }
}

/// Character count for strings, element count for arrays; other types are
/// not length-checked
fn measured_length(value: Option<&Value>) -> Option<usize> {
    match value {
        Some(Value::String(text)) => Some(text.chars().count()),
        Some(Value::Array(items)) => Some(items.len()),
        _ => None,
    }
}

fn numeric(value: Option<&Value>) -> Option<f64> {
    value.and_then(convert::to_number)
}

fn stringified(value: Option<&Value>) -> String {
    value.map(convert::to_display_string).unwrap_or_default()
}

fn looks_like_email(text: &str) -> bool {
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !text.contains(char::is_whitespace)
        && !domain.contains('@')
}

/// Kind-specific config: accepts a bare number/string or an object carrying
/// the same under `value`/`pattern`
fn config_number(rule: &ValidationRule) -> Option<f64> {
    match rule.config.as_ref()? {
        Value::Number(number) => number.as_f64(),
        Value::Object(map) => map.get("value").and_then(Value::as_f64),
        _ => None,
    }
}

fn config_string(rule: &ValidationRule) -> Option<String> {
    match rule.config.as_ref()? {
        Value::String(text) => Some(text.clone()),
        Value::Object(map) => map
            .get("pattern")
            .or_else(|| map.get("value"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

fn default_message(rule: &ValidationRule) -> String {
    match rule.kind {
        ValidationType::Required => "value is required".to_string(),
        ValidationType::MinLength => match config_number(rule) {
            Some(min) => format!("must be at least {} characters long", min),
            None => "value is too short".to_string(),
        },
        ValidationType::MaxLength => match config_number(rule) {
            Some(max) => format!("must be at most {} characters long", max),
            None => "value is too long".to_string(),
        },
        ValidationType::Min => match config_number(rule) {
            Some(min) => format!("must be at least {}", min),
            None => "value is too small".to_string(),
        },
        ValidationType::Max => match config_number(rule) {
            Some(max) => format!("must be at most {}", max),
            None => "value is too large".to_string(),
        },
        ValidationType::Pattern => "value does not match the expected pattern".to_string(),
        ValidationType::Email => "must be a valid email address".to_string(),
        ValidationType::Url => "must be a valid URL".to_string(),
        ValidationType::Custom => "custom validation failed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValidationRule;
    use serde_json::json;

    fn rule(kind: ValidationType) -> ValidationRule {
        ValidationRule::new(kind)
    }

    fn rule_with(kind: ValidationType, config: Value) -> ValidationRule {
        ValidationRule::with_config(kind, config)
    }

    #[test]
    fn test_required() {
        let rules = [rule(ValidationType::Required)];
        assert_eq!(validate_value(Some(&json!("x")), &rules), Vec::<String>::new());
        assert_eq!(validate_value(Some(&json!(0)), &rules), Vec::<String>::new());
        assert_eq!(validate_value(None, &rules), vec!["value is required"]);
        assert_eq!(validate_value(Some(&json!(null)), &rules), vec!["value is required"]);
        assert_eq!(validate_value(Some(&json!("")), &rules), vec!["value is required"]);
    }

    #[test]
    fn test_length_rules_cover_strings_and_arrays() {
        let rules = [rule_with(ValidationType::MinLength, json!(3))];
        assert!(validate_value(Some(&json!("ab")), &rules).len() == 1);
        assert!(validate_value(Some(&json!("abc")), &rules).is_empty());
        assert!(validate_value(Some(&json!([1, 2])), &rules).len() == 1);
        // Non-measurable types are not length-checked
        assert!(validate_value(Some(&json!(42)), &rules).is_empty());

        let max = [rule_with(ValidationType::MaxLength, json!(2))];
        assert!(validate_value(Some(&json!("abc")), &max).len() == 1);
        assert!(validate_value(Some(&json!([1])), &max).is_empty());
    }

    #[test]
    fn test_numeric_range_rules() {
        let rules = [
            rule_with(ValidationType::Min, json!(18)),
            rule_with(ValidationType::Max, json!(65)),
        ];
        assert!(validate_value(Some(&json!(40)), &rules).is_empty());
        assert_eq!(validate_value(Some(&json!(10)), &rules), vec!["must be at least 18"]);
        assert_eq!(validate_value(Some(&json!(70)), &rules), vec!["must be at most 65"]);
        // Numeric strings coerce
        assert!(validate_value(Some(&json!("40")), &rules).is_empty());
    }

    #[test]
    fn test_pattern() {
        let rules = [rule_with(ValidationType::Pattern, json!("^[a-z]+$"))];
        assert!(validate_value(Some(&json!("abc")), &rules).is_empty());
        assert_eq!(validate_value(Some(&json!("ABC")), &rules).len(), 1);
    }

    #[test]
    fn test_invalid_pattern_counts_as_valid() {
        let rules = [rule_with(ValidationType::Pattern, json!("([unclosed"))];
        assert!(validate_value(Some(&json!("anything")), &rules).is_empty());
    }

    #[test]
    fn test_email() {
        let rules = [rule(ValidationType::Email)];
        assert!(validate_value(Some(&json!("a@b.co")), &rules).is_empty());
        assert_eq!(validate_value(Some(&json!("not-an-email")), &rules).len(), 1);
        assert_eq!(validate_value(Some(&json!("a @b.co")), &rules).len(), 1);
        assert_eq!(validate_value(Some(&json!("a@b")), &rules).len(), 1);
    }

    #[test]
    fn test_url() {
        let rules = [rule(ValidationType::Url)];
        assert!(validate_value(Some(&json!("https://example.com/x")), &rules).is_empty());
        assert_eq!(validate_value(Some(&json!("example dot com")), &rules).len(), 1);
    }

    #[test]
    fn test_custom_always_passes() {
        let rules = [rule_with(ValidationType::Custom, json!({"function": "checkTax"}))];
        assert!(validate_value(Some(&json!("anything")), &rules).is_empty());
        assert!(validate_value(None, &rules).is_empty());
    }

    #[test]
    fn test_disabled_rule_is_skipped() {
        let mut disabled = rule(ValidationType::Required);
        disabled.enabled = Some(false);
        assert!(validate_value(None, &[disabled]).is_empty());
    }

    #[test]
    fn test_custom_error_message_wins() {
        let mut required = rule(ValidationType::Required);
        required.error_message = Some("name must be filled in".to_string());
        assert_eq!(validate_value(None, &[required]), vec!["name must be filled in"]);
    }
}
