//! Structured diagnostics for mapping runs
//!
//! Degraded behavior (unknown modifier names, unrecognized transform kinds)
//! is recorded as typed warning values returned with the batch outcome, so
//! it is observable and testable. The `log` facade mirrors each warning for
//! operators tailing logs.
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Codes for the ways a mapping run can degrade without failing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningCode {
    /// A modifier name not present in the registry; value passed through
    UnknownModifier,
    /// A parameterized modifier name not present in the registry
    UnknownParameterizedModifier,
    /// A transform kind this engine does not recognize; identity applied
    UnknownTransformKind,
}

/// One recorded degradation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingWarning {
    pub code: WarningCode,
    /// The rule that triggered the warning
    pub rule_id: String,
    /// Destination address of that rule
    pub path: String,
    pub message: String,
}

/// Aggregate counts for one batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingSummary {
    /// Enabled rules processed
    pub total: usize,
    pub succeeded: usize,
    /// `fail`-strategy failures surfaced in the error list
    pub failed: usize,
    /// Failures silently dropped (`skip` strategy, or `default` with no
    /// `errorDefault` configured)
    pub skipped: usize,
    /// Failures replaced by the rule's `errorDefault`
    pub defaulted: usize,
    /// Rules not processed because `enabled` was false
    pub disabled: usize,
}

/// Collector threaded through one batch run
#[derive(Debug, Default)]
pub struct MappingDiagnostics {
    warnings: Vec<MappingWarning>,
}

impl MappingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn_unknown_modifier(&mut self, rule_id: &str, path: &str, name: &str) {
        self.record(
            WarningCode::UnknownModifier,
            rule_id,
            path,
            format!("unknown modifier '{}', value passed through unchanged", name),
        );
    }

    pub fn warn_unknown_parameterized_modifier(&mut self, rule_id: &str, path: &str, name: &str) {
        self.record(
            WarningCode::UnknownParameterizedModifier,
            rule_id,
            path,
            format!(
                "unknown parameterized modifier '{}', value passed through unchanged",
                name
            ),
        );
    }

    pub fn warn_unknown_transform(&mut self, rule_id: &str, path: &str) {
        self.record(
            WarningCode::UnknownTransformKind,
            rule_id,
            path,
            "unrecognized transform kind, source value passed through unchanged".to_string(),
        );
    }

    pub fn warnings(&self) -> &[MappingWarning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<MappingWarning> {
        self.warnings
    }

    /// Warning counts keyed by code
    pub fn counts_by_code(&self) -> HashMap<WarningCode, usize> {
        let mut counts = HashMap::new();
        for warning in &self.warnings {
            *counts.entry(warning.code).or_insert(0) += 1;
        }
        counts
    }

    fn record(&mut self, code: WarningCode, rule_id: &str, path: &str, message: String) {
        log::warn!("rule '{}' at '{}': {}", rule_id, path, message);
        self.warnings.push(MappingWarning {
            code,
            rule_id: rule_id.to_string(),
            path: path.to_string(),
            message,
        });
    }
}
