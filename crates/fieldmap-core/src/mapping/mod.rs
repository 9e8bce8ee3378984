//! Mapping engine: applies declarative field-mapping rules to records
//!
//! This module orchestrates the full pipeline for each rule (resolve
//! source value(s), pre-validate, transform, modify, post-validate) and
//! merges per-rule results into a destination record, isolating failures
//! per rule according to each rule's error strategy.
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

pub mod builder;
pub mod convert;
pub mod diagnostics;
pub mod expression;
pub mod modifier;
pub mod path;
pub mod rules;
pub mod transform;
pub mod validate;

use crate::error::{Error, Result};
use crate::types::{ErrorStrategy, MappingResult, MappingRule};
use serde_json::{Map, Value};
use std::sync::Arc;

pub use builder::MappingRuleBuilder;
pub use diagnostics::{MappingDiagnostics, MappingSummary, MappingWarning, WarningCode};
pub use expression::{CompiledProgram, ExpressionEvaluator, ExpressionFunction};

/// Outcome of applying a rule set to one record
#[derive(Debug, Clone)]
pub struct MappingOutcome {
    /// The accumulated destination record (possibly partial on failures)
    pub record: Value,
    /// `fail`-strategy errors, formatted `"<destination name>: <error>"`
    pub errors: Vec<String>,
    /// Structured degradation warnings collected during the run
    pub warnings: Vec<MappingWarning>,
    /// Aggregate rule counts
    pub summary: MappingSummary,
}

/// The mapping engine
///
/// Stateless between calls: applying a batch is a pure function of the rule
/// list and the source record, plus the optional injected expression
/// evaluator used by `expression` transforms.
#[derive(Default)]
pub struct MappingEngine {
    evaluator: Option<Arc<dyn ExpressionEvaluator>>,
}

impl MappingEngine {
    /// An engine without expression support; `expression` rules fail with a
    /// configuration error
    pub fn new() -> Self {
        Self { evaluator: None }
    }

    /// An engine with an injected expression evaluator. Call
    /// [`expression::register_engine_functions`] on the evaluator first to
    /// expose the modifier/path/converter surface to expressions.
    pub fn with_evaluator(evaluator: Arc<dyn ExpressionEvaluator>) -> Self {
        Self {
            evaluator: Some(evaluator),
        }
    }

    /// Apply a single rule to a record.
    ///
    /// Never panics and never escalates: any failure during resolution,
    /// validation, or transform execution is caught and reported in the
    /// returned [`MappingResult`].
    pub async fn apply_mapping(
        &self,
        rule: &MappingRule,
        record: &Value,
        diagnostics: &mut MappingDiagnostics,
    ) -> MappingResult {
        match self.run_rule(rule, record, diagnostics).await {
            Ok(value) => MappingResult {
                destination_key: rule.destination.key.clone(),
                value,
                success: true,
                error: None,
            },
            Err(error) => MappingResult {
                destination_key: rule.destination.key.clone(),
                value: None,
                success: false,
                error: Some(error.to_string()),
            },
        }
    }

    /// Apply every enabled rule in list order and merge the results.
    ///
    /// Rule order is significant: it is the destination-write order, so
    /// collisions on the same destination path resolve last-wins. One
    /// rule's failure never aborts the batch.
    pub async fn apply_all_mappings(&self, rules: &[MappingRule], record: &Value) -> MappingOutcome {
        let mut destination = Value::Object(Map::new());
        let mut errors = Vec::new();
        let mut diagnostics = MappingDiagnostics::new();
        let mut summary = MappingSummary::default();

        for rule in rules {
            if !rule.is_enabled() {
                summary.disabled += 1;
                continue;
            }
            summary.total += 1;

            let result = self.apply_mapping(rule, record, &mut diagnostics).await;
            if result.success {
                summary.succeeded += 1;
                if let Some(value) = result.value {
                    path::set(&mut destination, rule.destination.address(), value);
                }
                continue;
            }

            let message = result.error.unwrap_or_else(|| "unknown error".to_string());
            match rule.strategy() {
                ErrorStrategy::Skip => {
                    summary.skipped += 1;
                }
                ErrorStrategy::Default => match &rule.error_default {
                    Some(fallback) => {
                        path::set(&mut destination, rule.destination.address(), fallback.clone());
                        summary.defaulted += 1;
                    }
                    None => {
                        summary.skipped += 1;
                    }
                },
                ErrorStrategy::Fail => {
                    errors.push(format!("{}: {}", rule.destination.display_name(), message));
                    summary.failed += 1;
                }
            }
        }

        MappingOutcome {
            record: destination,
            errors,
            warnings: diagnostics.into_warnings(),
            summary,
        }
    }

    async fn run_rule(
        &self,
        rule: &MappingRule,
        record: &Value,
        diagnostics: &mut MappingDiagnostics,
    ) -> Result<Option<Value>> {
        let resolved: Vec<(String, Option<Value>)> = rule
            .source
            .fields()
            .iter()
            .map(|field| (field.key.clone(), path::get(record, field.address())))
            .collect();

        let timing = rule.transform.validation_timing;
        let validation_rules = &rule.transform.validation_rules;

        if timing.map(|timing| timing.includes_pre()).unwrap_or(false) {
            let first = resolved.first().and_then(|(_, value)| value.as_ref());
            let violations = validate::validate_value(first, validation_rules);
            if !violations.is_empty() {
                return Err(Error::Validation {
                    field: rule
                        .source
                        .first()
                        .map(|field| field.key.clone())
                        .unwrap_or_else(|| rule.destination.key.clone()),
                    violations,
                });
            }
        }

        let value =
            transform::execute(rule, &resolved, self.evaluator.as_deref(), diagnostics).await?;

        if timing.map(|timing| timing.includes_post()).unwrap_or(false) {
            let violations = validate::validate_value(value.as_ref(), validation_rules);
            if !violations.is_empty() {
                return Err(Error::Validation {
                    field: rule.destination.key.clone(),
                    violations,
                });
            }
        }

        Ok(value)
    }
}
