//! Builder for creating mapping rules
//!
//! A fluent API for constructing rules in code: required pieces up front,
//! everything else via chained setters, with configuration checked at
//! `build` time.
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::types::{
    DestinationField, ErrorStrategy, MappingRule, ParameterizedModifier, SourceField, SourceSpec,
    TransformConfig, ValidationRule, ValidationTiming,
};
use serde_json::Value;

/// Builder for [`MappingRule`]
pub struct MappingRuleBuilder {
    id: String,
    sources: Vec<SourceField>,
    destination: Option<DestinationField>,
    transform: TransformConfig,
    enabled: Option<bool>,
    error_strategy: Option<ErrorStrategy>,
    error_default: Option<Value>,
    tags: Vec<String>,
    description: Option<String>,
}

impl MappingRuleBuilder {
    /// Create a new rule builder; the transform defaults to `direct`
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sources: Vec::new(),
            destination: None,
            transform: TransformConfig::direct(),
            enabled: None,
            error_strategy: None,
            error_default: None,
            tags: Vec::new(),
            description: None,
        }
    }

    /// Add a source field (call repeatedly for multi-source rules)
    pub fn source(mut self, source: SourceField) -> Self {
        self.sources.push(source);
        self
    }

    /// Set the destination field
    pub fn destination(mut self, destination: DestinationField) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Set the transform configuration
    pub fn transform(mut self, transform: TransformConfig) -> Self {
        self.transform = transform;
        self
    }

    /// Append a simple modifier to the transform's pipeline
    pub fn modifier(mut self, name: impl Into<String>) -> Self {
        self.transform.modifiers.push(name.into());
        self
    }

    /// Append a parameterized modifier to the transform's pipeline
    pub fn parameterized_modifier(mut self, name: impl Into<String>, params: Vec<Value>) -> Self {
        self.transform
            .parameterized_modifiers
            .push(ParameterizedModifier {
                name: name.into(),
                params,
            });
        self
    }

    /// Add a validation rule and when it runs
    pub fn validation(mut self, rule: ValidationRule, timing: ValidationTiming) -> Self {
        self.transform.validation_rules.push(rule);
        self.transform.validation_timing = Some(timing);
        self
    }

    /// Disable the rule
    pub fn disabled(mut self) -> Self {
        self.enabled = Some(false);
        self
    }

    /// Set the error strategy
    pub fn error_strategy(mut self, strategy: ErrorStrategy) -> Self {
        self.error_strategy = Some(strategy);
        self
    }

    /// Set the value written when the rule fails under the `default` strategy
    pub fn error_default(mut self, value: Value) -> Self {
        self.error_default = Some(value);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build the mapping rule
    pub fn build(self) -> Result<MappingRule> {
        if self.sources.is_empty() {
            return Err(Error::Configuration {
                message: "at least one source field is required".to_string(),
                rule_id: Some(self.id),
            });
        }
        let destination = self.destination.ok_or_else(|| Error::Configuration {
            message: "a destination field is required".to_string(),
            rule_id: Some(self.id.clone()),
        })?;

        Ok(MappingRule {
            id: self.id,
            source: SourceSpec::from_fields(self.sources),
            destination,
            transform: self.transform,
            enabled: self.enabled,
            error_strategy: self.error_strategy,
            error_default: self.error_default,
            tags: if self.tags.is_empty() { None } else { Some(self.tags) },
            description: self.description,
        })
    }
}
