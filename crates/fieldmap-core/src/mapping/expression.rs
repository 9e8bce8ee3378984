//! Bridge to an injected expression evaluator
//!
//! The engine does not implement an expression language. It is handed an
//! evaluator behind the [`ExpressionEvaluator`] capability interface,
//! registers the whole modifier/path/converter surface as callable
//! functions, builds the per-rule data context, and awaits the result of
//! the evaluation. Nothing beyond this contract is assumed about the
//! evaluator.
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use super::{convert, modifier, path};
use crate::error::Result;
use crate::types::FieldType;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// A named function callable from inside an expression
pub type ExpressionFunction = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// Capability interface for an embedded expression language
pub trait ExpressionEvaluator: Send + Sync {
    /// Compile an expression string into an evaluator-specific program
    fn compile(&self, expression: &str) -> Result<Box<dyn CompiledProgram>>;

    /// Make a named function available to compiled programs
    fn register_function(&mut self, name: &str, function: ExpressionFunction);
}

/// A compiled expression, ready to run against a data context
#[async_trait]
pub trait CompiledProgram: Send + Sync {
    /// Evaluate against the context; this is the engine's only suspension
    /// point and may run user-supplied code
    async fn evaluate(&self, context: &Value) -> Result<Value>;
}

/// Build the data context for one rule's expression evaluation.
///
/// Each resolved source value is exposed under its own key; with exactly
/// one source the value is additionally exposed as `value`; `sources`
/// always exposes the whole map.
pub fn build_context(resolved: &[(String, Option<Value>)]) -> Value {
    let mut context = Map::new();
    for (key, value) in resolved {
        context.insert(key.clone(), value.clone().unwrap_or(Value::Null));
    }
    let sources = Value::Object(context.clone());
    if let [(_, only)] = resolved {
        context.insert("value".to_string(), only.clone().unwrap_or(Value::Null));
    }
    context.insert("sources".to_string(), sources);
    Value::Object(context)
}

/// Compile and evaluate an expression against a context
pub async fn evaluate(
    evaluator: &dyn ExpressionEvaluator,
    expression: &str,
    context: &Value,
) -> Result<Value> {
    let program = evaluator.compile(expression)?;
    program.evaluate(context).await
}

/// Register the engine's whole function surface with an evaluator: every
/// modifier under its registry name (plus a `round2` alias), the path
/// resolver functions, and the value converter functions.
pub fn register_engine_functions(evaluator: &mut dyn ExpressionEvaluator) {
    for (name, function) in modifier::SIMPLE {
        let function = *function;
        evaluator.register_function(
            name,
            Arc::new(move |args: &[Value]| {
                args.first().map(function).unwrap_or(Value::Null)
            }),
        );
    }
    for (name, function) in modifier::PARAMETERIZED {
        // Simple names already registered take the zero-parameter shape;
        // parameterized registration wins so expressions can pass arguments
        let function = *function;
        evaluator.register_function(
            name,
            Arc::new(move |args: &[Value]| match args.split_first() {
                Some((value, params)) => function(value, params),
                None => Value::Null,
            }),
        );
    }
    evaluator.register_function(
        "round2",
        Arc::new(|args: &[Value]| {
            args.first()
                .map(|value| modifier::number::round(value, 2))
                .unwrap_or(Value::Null)
        }),
    );

    evaluator.register_function(
        "get",
        Arc::new(|args: &[Value]| match (args.first(), args.get(1)) {
            (Some(record), Some(Value::String(at))) => {
                path::get(record, at).unwrap_or(Value::Null)
            }
            _ => Value::Null,
        }),
    );
    evaluator.register_function(
        "has",
        Arc::new(|args: &[Value]| match (args.first(), args.get(1)) {
            (Some(record), Some(Value::String(at))) => Value::Bool(path::has(record, at)),
            _ => Value::Bool(false),
        }),
    );

    evaluator.register_function(
        "toNumber",
        Arc::new(|args: &[Value]| {
            args.first()
                .and_then(convert::to_number)
                .map(convert::number_value)
                .unwrap_or(Value::Null)
        }),
    );
    evaluator.register_function(
        "toBoolean",
        Arc::new(|args: &[Value]| {
            args.first()
                .and_then(convert::to_boolean)
                .map(Value::Bool)
                .unwrap_or(Value::Null)
        }),
    );
    evaluator.register_function(
        "toString",
        Arc::new(|args: &[Value]| {
            Value::String(args.first().map(convert::to_display_string).unwrap_or_default())
        }),
    );
    evaluator.register_function(
        "toDateString",
        Arc::new(|args: &[Value]| {
            args.first()
                .and_then(convert::to_date_string)
                .map(Value::String)
                .unwrap_or(Value::Null)
        }),
    );
    evaluator.register_function(
        "convert",
        Arc::new(|args: &[Value]| {
            let target = args
                .get(1)
                .cloned()
                .and_then(|kind| serde_json::from_value::<FieldType>(kind).ok())
                .unwrap_or(FieldType::String);
            args.first()
                .and_then(|value| convert::convert(value, target))
                .unwrap_or(Value::Null)
        }),
    );
}
