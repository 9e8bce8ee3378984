//! Transform execution: state-free dispatch over the eight transform kinds
//!
//! Given one rule's already-resolved source value(s), computes the
//! transformed value and runs the modifier pipeline. Only the `expression`
//! kind suspends; everything else is synchronous pure computation.
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use super::convert::{self, to_display_string};
use super::diagnostics::MappingDiagnostics;
use super::expression::{self, ExpressionEvaluator};
use super::modifier;
use crate::error::{Error, Result};
use crate::types::{
    ConditionNode, ConditionOperator, FieldType, LogicOperator, MappingRule, TransformOptions,
    TransformType,
};
use serde_json::Value;

/// Execute a rule's transform over its resolved source values.
///
/// `resolved` pairs each source key with its value (`None` = absent).
/// Returns the transformed value, `None` meaning "nothing to write".
pub async fn execute(
    rule: &MappingRule,
    resolved: &[(String, Option<Value>)],
    evaluator: Option<&dyn ExpressionEvaluator>,
    diagnostics: &mut MappingDiagnostics,
) -> Result<Option<Value>> {
    let config = &rule.transform;
    let options = config.options.clone().unwrap_or_default();
    let first = resolved.first().and_then(|(_, value)| value.clone());

    let transformed: Option<Value> = match config.kind {
        TransformType::Direct => first,

        TransformType::Convert => {
            let target = options.data_type.unwrap_or(FieldType::String);
            match first {
                Some(Value::Array(items)) => Some(Value::Array(
                    items
                        .iter()
                        .map(|item| convert::convert(item, target).unwrap_or(Value::Null))
                        .collect(),
                )),
                Some(value) => convert::convert(&value, target),
                None => convert::convert(&Value::Null, target),
            }
        }

        TransformType::Combine => {
            let separator = options.combine_with.as_deref().unwrap_or(" ");
            let parts: Vec<String> = resolved
                .iter()
                .filter_map(|(_, value)| value.as_ref())
                .filter(|value| !value.is_null() && value.as_str() != Some(""))
                .map(to_display_string)
                .collect();
            Some(Value::String(parts.join(separator)))
        }

        TransformType::Split => {
            let separator = options.split_on.as_deref().unwrap_or(",");
            let text = first.map(|value| to_display_string(&value)).unwrap_or_default();
            Some(Value::Array(
                text.split(separator)
                    .map(|piece| Value::String(piece.to_string()))
                    .collect(),
            ))
        }

        TransformType::Expression => {
            let source = options.expression.as_deref().ok_or_else(|| Error::Configuration {
                message: "expression transform requires an `expression` option".to_string(),
                rule_id: Some(rule.id.clone()),
            })?;
            let evaluator = evaluator.ok_or_else(|| Error::Configuration {
                message: "no expression evaluator configured".to_string(),
                rule_id: Some(rule.id.clone()),
            })?;
            let context = expression::build_context(resolved);
            Some(expression::evaluate(evaluator, source, &context).await?)
        }

        TransformType::Default => {
            let apply_on_null = options.apply_on_null.unwrap_or(true);
            let apply_on_empty = options.apply_on_empty.unwrap_or(false);
            let missing = first.as_ref().map_or(true, Value::is_null);
            let empty = first.as_ref().and_then(Value::as_str) == Some("");
            if (apply_on_null && missing) || (apply_on_empty && empty) {
                options.default_value.clone()
            } else {
                first
            }
        }

        TransformType::Conditional => evaluate_conditional(&first, &options),

        TransformType::Lookup => {
            let key = first
                .as_ref()
                .map(to_display_string)
                .unwrap_or_default();
            let hit = options
                .lookup_table
                .as_ref()
                .and_then(|table| table.get(&key))
                .cloned();
            match hit {
                Some(value) => Some(value),
                // On a miss the original source value survives, not the key
                None => options.lookup_default.clone().or(first),
            }
        }

        TransformType::Unknown => {
            diagnostics.warn_unknown_transform(&rule.id, rule.destination.address());
            first
        }
    };

    Ok(apply_modifiers(rule, transformed, diagnostics))
}

/// Run the rule's modifier pipeline over the transformed value. An absent
/// value skips the pipeline entirely.
fn apply_modifiers(
    rule: &MappingRule,
    value: Option<Value>,
    diagnostics: &mut MappingDiagnostics,
) -> Option<Value> {
    let config = &rule.transform;
    let mut current = value?;

    for name in &config.modifiers {
        match modifier::apply(name, &current) {
            Some(next) => current = next,
            None => diagnostics.warn_unknown_modifier(&rule.id, rule.destination.address(), name),
        }
    }
    for parameterized in &config.parameterized_modifiers {
        match modifier::apply_with_params(&parameterized.name, &current, &parameterized.params) {
            Some(next) => current = next,
            None => diagnostics.warn_unknown_parameterized_modifier(
                &rule.id,
                rule.destination.address(),
                &parameterized.name,
            ),
        }
    }
    Some(current)
}

/// Conditional dispatch, in priority order: advanced AND/OR tree, then
/// switch/case, then the flat operator comparison.
fn evaluate_conditional(value: &Option<Value>, options: &TransformOptions) -> Option<Value> {
    if let Some(tree) = &options.advanced_condition {
        return pick_branch(evaluate_node(value, tree), options);
    }

    if let Some(cases) = &options.switch_cases {
        for case in cases {
            if loose_eq_optional(value, Some(&case.condition)) {
                return Some(case.value.clone());
            }
        }
        return options.switch_default.clone();
    }

    let operator = options
        .condition_operator
        .unwrap_or(ConditionOperator::Equals);
    pick_branch(
        evaluate_operator(value, operator, options.condition_value.as_ref()),
        options,
    )
}

fn pick_branch(outcome: bool, options: &TransformOptions) -> Option<Value> {
    if outcome {
        options.true_value.clone()
    } else {
        options.false_value.clone()
    }
}

fn evaluate_node(value: &Option<Value>, node: &ConditionNode) -> bool {
    match node {
        ConditionNode::Group { logic, conditions } => match logic {
            LogicOperator::And => conditions.iter().all(|child| evaluate_node(value, child)),
            LogicOperator::Or => conditions.iter().any(|child| evaluate_node(value, child)),
        },
        ConditionNode::Leaf { operator, value: operand } => {
            evaluate_operator(value, *operator, operand.as_ref())
        }
    }
}

fn evaluate_operator(
    value: &Option<Value>,
    operator: ConditionOperator,
    operand: Option<&Value>,
) -> bool {
    match operator {
        ConditionOperator::Equals => loose_eq_optional(value, operand),
        ConditionOperator::NotEquals => !loose_eq_optional(value, operand),
        ConditionOperator::GreaterThan => match (numeric(value), operand.and_then(convert::to_number)) {
            (Some(left), Some(right)) => left > right,
            _ => false,
        },
        ConditionOperator::LessThan => match (numeric(value), operand.and_then(convert::to_number)) {
            (Some(left), Some(right)) => left < right,
            _ => false,
        },
        ConditionOperator::Contains => match (value, operand) {
            (Some(Value::String(haystack)), Some(Value::String(needle))) => {
                haystack.contains(needle.as_str())
            }
            _ => false,
        },
        ConditionOperator::IsEmpty => is_empty(value),
        ConditionOperator::IsNotEmpty => !is_empty(value),
    }
}

fn numeric(value: &Option<Value>) -> Option<f64> {
    value.as_ref().and_then(convert::to_number)
}

fn is_empty(value: &Option<Value>) -> bool {
    match value {
        None => true,
        Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Loose equality: strict JSON equality, plus numeric coercion across
/// number/string/bool operands, plus absent-equals-null.
fn loose_eq_optional(value: &Option<Value>, operand: Option<&Value>) -> bool {
    match (value, operand) {
        (None, None) => true,
        (None, Some(Value::Null)) | (Some(Value::Null), None) => true,
        (Some(left), Some(right)) => loose_eq(left, right),
        _ => false,
    }
}

fn loose_eq(left: &Value, right: &Value) -> bool {
    if left == right {
        return true;
    }
    match (coerce_for_eq(left), coerce_for_eq(right)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn coerce_for_eq(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        DestinationField, ParameterizedModifier, SourceField, SourceSpec, SwitchCase,
        TransformConfig,
    };
    use serde_json::json;

    fn rule_with(kind: TransformType, options: Option<TransformOptions>) -> MappingRule {
        MappingRule {
            id: "rule-under-test".to_string(),
            source: SourceSpec::Single(SourceField::new("input", FieldType::String)),
            destination: DestinationField::new("output", FieldType::String),
            transform: TransformConfig {
                kind,
                options,
                modifiers: Vec::new(),
                parameterized_modifiers: Vec::new(),
                validation_rules: Vec::new(),
                validation_timing: None,
            },
            enabled: None,
            error_strategy: None,
            error_default: None,
            tags: None,
            description: None,
        }
    }

    async fn run(rule: &MappingRule, values: Vec<Option<Value>>) -> Result<Option<Value>> {
        let resolved: Vec<(String, Option<Value>)> = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| (format!("source_{}", index), value))
            .collect();
        let mut diagnostics = MappingDiagnostics::new();
        execute(rule, &resolved, None, &mut diagnostics).await
    }

    #[tokio::test]
    async fn test_direct_is_identity() {
        let rule = rule_with(TransformType::Direct, None);
        for value in [json!("x"), json!(0), json!(null), json!([1, 2]), json!({"k": 1})] {
            let result = run(&rule, vec![Some(value.clone())]).await.unwrap();
            assert_eq!(result, Some(value));
        }
        assert_eq!(run(&rule, vec![None]).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_convert_number() {
        let options = TransformOptions {
            data_type: Some(FieldType::Number),
            ..Default::default()
        };
        let rule = rule_with(TransformType::Convert, Some(options));
        assert_eq!(
            run(&rule, vec![Some(json!("42"))]).await.unwrap(),
            Some(json!(42))
        );
        assert_eq!(run(&rule, vec![Some(json!("abc"))]).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_convert_array_converts_elements() {
        let options = TransformOptions {
            data_type: Some(FieldType::Number),
            ..Default::default()
        };
        let rule = rule_with(TransformType::Convert, Some(options));
        assert_eq!(
            run(&rule, vec![Some(json!(["1", "2", "x"]))]).await.unwrap(),
            Some(json!([1, 2, null]))
        );
    }

    #[tokio::test]
    async fn test_combine_filters_missing_values() {
        let options = TransformOptions {
            combine_with: Some(" ".to_string()),
            ..Default::default()
        };
        let rule = rule_with(TransformType::Combine, Some(options));
        let result = run(
            &rule,
            vec![Some(json!("John")), None, Some(json!("")), Some(json!("Doe"))],
        )
        .await
        .unwrap();
        assert_eq!(result, Some(json!("John Doe")));
    }

    #[tokio::test]
    async fn test_split_defaults_to_comma() {
        let rule = rule_with(TransformType::Split, None);
        assert_eq!(
            run(&rule, vec![Some(json!("a,b,c"))]).await.unwrap(),
            Some(json!(["a", "b", "c"]))
        );
        assert_eq!(run(&rule, vec![None]).await.unwrap(), Some(json!([""])));
    }

    #[tokio::test]
    async fn test_expression_without_option_is_configuration_error() {
        let rule = rule_with(TransformType::Expression, None);
        let error = run(&rule, vec![Some(json!(1))]).await.unwrap_err();
        assert!(matches!(error, Error::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_default_applies_on_null_but_not_empty() {
        let options = TransformOptions {
            default_value: Some(json!("fallback")),
            ..Default::default()
        };
        let rule = rule_with(TransformType::Default, Some(options));
        assert_eq!(run(&rule, vec![None]).await.unwrap(), Some(json!("fallback")));
        assert_eq!(
            run(&rule, vec![Some(json!(null))]).await.unwrap(),
            Some(json!("fallback"))
        );
        // applyOnEmpty defaults to false: empty strings survive
        assert_eq!(run(&rule, vec![Some(json!(""))]).await.unwrap(), Some(json!("")));
        assert_eq!(run(&rule, vec![Some(json!("v"))]).await.unwrap(), Some(json!("v")));
    }

    #[tokio::test]
    async fn test_default_apply_on_empty_opt_in() {
        let options = TransformOptions {
            default_value: Some(json!("fallback")),
            apply_on_empty: Some(true),
            ..Default::default()
        };
        let rule = rule_with(TransformType::Default, Some(options));
        assert_eq!(
            run(&rule, vec![Some(json!(""))]).await.unwrap(),
            Some(json!("fallback"))
        );
    }

    #[tokio::test]
    async fn test_conditional_flat_operator() {
        let options = TransformOptions {
            condition_operator: Some(ConditionOperator::GreaterThan),
            condition_value: Some(json!(18)),
            true_value: Some(json!("adult")),
            false_value: Some(json!("minor")),
            ..Default::default()
        };
        let rule = rule_with(TransformType::Conditional, Some(options));
        assert_eq!(run(&rule, vec![Some(json!(21))]).await.unwrap(), Some(json!("adult")));
        assert_eq!(run(&rule, vec![Some(json!(12))]).await.unwrap(), Some(json!("minor")));
    }

    #[tokio::test]
    async fn test_conditional_loose_equality() {
        let options = TransformOptions {
            condition_operator: Some(ConditionOperator::Equals),
            condition_value: Some(json!("1")),
            true_value: Some(json!("yes")),
            false_value: Some(json!("no")),
            ..Default::default()
        };
        let rule = rule_with(TransformType::Conditional, Some(options));
        assert_eq!(run(&rule, vec![Some(json!(1))]).await.unwrap(), Some(json!("yes")));
        assert_eq!(run(&rule, vec![Some(json!(2))]).await.unwrap(), Some(json!("no")));
    }

    #[tokio::test]
    async fn test_conditional_switch_cases() {
        let options = TransformOptions {
            switch_cases: Some(vec![
                SwitchCase { condition: json!("US"), value: json!("United States") },
                SwitchCase { condition: json!("CA"), value: json!("Canada") },
            ]),
            switch_default: Some(json!("Elsewhere")),
            ..Default::default()
        };
        let rule = rule_with(TransformType::Conditional, Some(options));
        assert_eq!(
            run(&rule, vec![Some(json!("CA"))]).await.unwrap(),
            Some(json!("Canada"))
        );
        assert_eq!(
            run(&rule, vec![Some(json!("FR"))]).await.unwrap(),
            Some(json!("Elsewhere"))
        );
    }

    #[tokio::test]
    async fn test_conditional_advanced_tree_outranks_flat() {
        let options = TransformOptions {
            advanced_condition: Some(ConditionNode::Group {
                logic: LogicOperator::And,
                conditions: vec![
                    ConditionNode::Leaf {
                        operator: ConditionOperator::IsNotEmpty,
                        value: None,
                    },
                    ConditionNode::Leaf {
                        operator: ConditionOperator::LessThan,
                        value: Some(json!(100)),
                    },
                ],
            }),
            // Flat operator present but must be ignored
            condition_operator: Some(ConditionOperator::IsEmpty),
            true_value: Some(json!("ok")),
            false_value: Some(json!("not ok")),
            ..Default::default()
        };
        let rule = rule_with(TransformType::Conditional, Some(options));
        assert_eq!(run(&rule, vec![Some(json!(42))]).await.unwrap(), Some(json!("ok")));
        assert_eq!(
            run(&rule, vec![Some(json!(150))]).await.unwrap(),
            Some(json!("not ok"))
        );
        assert_eq!(run(&rule, vec![None]).await.unwrap(), Some(json!("not ok")));
    }

    #[tokio::test]
    async fn test_conditional_or_tree() {
        let options = TransformOptions {
            advanced_condition: Some(ConditionNode::Group {
                logic: LogicOperator::Or,
                conditions: vec![
                    ConditionNode::Leaf {
                        operator: ConditionOperator::Equals,
                        value: Some(json!("a")),
                    },
                    ConditionNode::Leaf {
                        operator: ConditionOperator::Equals,
                        value: Some(json!("b")),
                    },
                ],
            }),
            true_value: Some(json!(true)),
            false_value: Some(json!(false)),
            ..Default::default()
        };
        let rule = rule_with(TransformType::Conditional, Some(options));
        assert_eq!(run(&rule, vec![Some(json!("b"))]).await.unwrap(), Some(json!(true)));
        assert_eq!(run(&rule, vec![Some(json!("c"))]).await.unwrap(), Some(json!(false)));
    }

    #[tokio::test]
    async fn test_lookup_miss_returns_source_value() {
        let mut table = std::collections::HashMap::new();
        table.insert("US".to_string(), json!("United States"));
        let options = TransformOptions {
            lookup_table: Some(table),
            ..Default::default()
        };
        let rule = rule_with(TransformType::Lookup, Some(options));
        assert_eq!(
            run(&rule, vec![Some(json!("US"))]).await.unwrap(),
            Some(json!("United States"))
        );
        // Miss without a default: the original value, not the key or null
        assert_eq!(
            run(&rule, vec![Some(json!("CA"))]).await.unwrap(),
            Some(json!("CA"))
        );
    }

    #[tokio::test]
    async fn test_lookup_miss_with_default() {
        let mut table = std::collections::HashMap::new();
        table.insert("US".to_string(), json!("United States"));
        let options = TransformOptions {
            lookup_table: Some(table),
            lookup_default: Some(json!("Unknown")),
            ..Default::default()
        };
        let rule = rule_with(TransformType::Lookup, Some(options));
        assert_eq!(
            run(&rule, vec![Some(json!("CA"))]).await.unwrap(),
            Some(json!("Unknown"))
        );
    }

    #[tokio::test]
    async fn test_unknown_kind_passes_through_with_warning() {
        let rule = rule_with(TransformType::Unknown, None);
        let resolved = vec![("input".to_string(), Some(json!("untouched")))];
        let mut diagnostics = MappingDiagnostics::new();
        let result = execute(&rule, &resolved, None, &mut diagnostics).await.unwrap();
        assert_eq!(result, Some(json!("untouched")));
        assert_eq!(diagnostics.warnings().len(), 1);
    }

    #[tokio::test]
    async fn test_modifier_pipeline_applies_in_order() {
        let mut rule = rule_with(TransformType::Direct, None);
        rule.transform.modifiers = vec!["trim".to_string(), "uppercase".to_string()];
        assert_eq!(
            run(&rule, vec![Some(json!("  hello  "))]).await.unwrap(),
            Some(json!("HELLO"))
        );
    }

    #[tokio::test]
    async fn test_unknown_modifier_passes_through_and_warns() {
        let mut rule = rule_with(TransformType::Direct, None);
        rule.transform.modifiers = vec!["sparkle".to_string(), "uppercase".to_string()];
        let resolved = vec![("input".to_string(), Some(json!("hello")))];
        let mut diagnostics = MappingDiagnostics::new();
        let result = execute(&rule, &resolved, None, &mut diagnostics).await.unwrap();
        assert_eq!(result, Some(json!("HELLO")));
        assert_eq!(diagnostics.warnings().len(), 1);
        assert!(diagnostics.warnings()[0].message.contains("'sparkle'"));
    }

    #[tokio::test]
    async fn test_parameterized_modifiers_run_after_simple_ones() {
        let mut rule = rule_with(TransformType::Direct, None);
        rule.transform.parameterized_modifiers = vec![ParameterizedModifier {
            name: "padLeft".to_string(),
            params: vec![json!(5), json!("0")],
        }];
        assert_eq!(
            run(&rule, vec![Some(json!("42"))]).await.unwrap(),
            Some(json!("00042"))
        );
    }
}
