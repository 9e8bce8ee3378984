//! Core types for the Fieldmap mapping engine
//!
//! This module defines the data structures for mapping rules, transform
//! configurations, validation rules, and mapping results. All configuration
//! types serialize with camelCase field names, matching the wire shape rule
//! authors work with.
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Data kinds a field (or a conversion target) can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    Array,
    Object,
    /// Catch-all for field types this engine does not know about
    #[serde(other)]
    Unknown,
}

/// A field in the source record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceField {
    pub key: String,
    /// Addressing string into the source record; may contain array-flatten
    /// markers (`a[].b`). Falls back to `key` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_array_item: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

impl SourceField {
    /// Create a source field with just a key and type
    pub fn new(key: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            path: None,
            name: None,
            field_type,
            sample_value: None,
            is_array_item: None,
            level: None,
        }
    }

    /// The addressing string into the source record
    pub fn address(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.key)
    }

    /// Display name, falling back to the key
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.key)
    }
}

/// A field in the destination record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationField {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
}

impl DestinationField {
    /// Create a destination field with just a key and type
    pub fn new(key: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            path: None,
            name: None,
            field_type,
            required: false,
        }
    }

    /// The addressing string into the destination record
    pub fn address(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.key)
    }

    /// Display name, falling back to the key
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.key)
    }
}

/// One or more source fields feeding a rule
///
/// Serializes as a bare `SourceField` for single-source rules and as an
/// array for multi-source rules, preserving the wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceSpec {
    Single(SourceField),
    Multiple(Vec<SourceField>),
}

impl SourceSpec {
    /// All source fields, in declaration order
    pub fn fields(&self) -> &[SourceField] {
        match self {
            SourceSpec::Single(field) => std::slice::from_ref(field),
            SourceSpec::Multiple(fields) => fields,
        }
    }

    /// The first source field, if any
    pub fn first(&self) -> Option<&SourceField> {
        self.fields().first()
    }

    pub fn len(&self) -> usize {
        self.fields().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Whether this rule draws from more than one source
    pub fn is_multi(&self) -> bool {
        self.len() > 1
    }

    /// Normalize a field list back into the scalar-or-array wire shape
    pub fn from_fields(mut fields: Vec<SourceField>) -> Self {
        if fields.len() == 1 {
            SourceSpec::Single(fields.remove(0))
        } else {
            SourceSpec::Multiple(fields)
        }
    }
}

/// The eight built-in transform kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformType {
    Direct,
    Convert,
    Combine,
    Split,
    Expression,
    Default,
    Conditional,
    Lookup,
    /// Unrecognized kinds pass the first source value through unchanged
    #[serde(other)]
    Unknown,
}

/// Flat comparison operators for conditional transforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    Contains,
    IsEmpty,
    IsNotEmpty,
}

/// Combinator for nested condition trees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogicOperator {
    And,
    Or,
}

/// A node in an advanced condition tree: either a group of sub-conditions
/// joined by AND/OR, or a leaf comparison against the source value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionNode {
    Group {
        logic: LogicOperator,
        conditions: Vec<ConditionNode>,
    },
    Leaf {
        operator: ConditionOperator,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
    },
}

/// One arm of a switch/case conditional
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchCase {
    /// Matches when loosely equal to the source value
    pub condition: Value,
    pub value: Value,
}

/// Kind-specific transform options
///
/// Every field is optional; each transform kind reads the subset it cares
/// about and falls back to its documented defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOptions {
    // convert
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<FieldType>,
    // combine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combine_with: Option<String>,
    // split
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_on: Option<String>,
    // expression
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    // default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_on_null: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_on_empty: Option<bool>,
    // conditional (flat operator dialect)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_operator: Option<ConditionOperator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub true_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub false_value: Option<Value>,
    // conditional (nested tree dialect)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced_condition: Option<ConditionNode>,
    // conditional (switch/case dialect)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switch_cases: Option<Vec<SwitchCase>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switch_default: Option<Value>,
    // lookup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_table: Option<HashMap<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_default: Option<Value>,
}

/// A post-processing modifier invoked with explicit parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterizedModifier {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Value>,
}

/// When validation rules run relative to the transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationTiming {
    PreTransform,
    PostTransform,
    Both,
}

impl ValidationTiming {
    pub fn includes_pre(&self) -> bool {
        matches!(self, ValidationTiming::PreTransform | ValidationTiming::Both)
    }

    pub fn includes_post(&self) -> bool {
        matches!(self, ValidationTiming::PostTransform | ValidationTiming::Both)
    }
}

/// Declarative validation rule kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationType {
    Required,
    MinLength,
    MaxLength,
    Min,
    Max,
    Pattern,
    Email,
    Url,
    Custom,
}

/// One declarative validation rule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    #[serde(rename = "type")]
    pub kind: ValidationType,
    /// Kind-specific configuration: a bare number for the length/range
    /// rules, a bare string for `pattern`, or an object carrying the same
    /// under `value`/`pattern` keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl ValidationRule {
    pub fn new(kind: ValidationType) -> Self {
        Self {
            kind,
            config: None,
            error_message: None,
            enabled: None,
        }
    }

    pub fn with_config(kind: ValidationType, config: Value) -> Self {
        Self {
            kind,
            config: Some(config),
            error_message: None,
            enabled: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// A rule's complete transform configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformConfig {
    #[serde(rename = "type")]
    pub kind: TransformType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<TransformOptions>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameterized_modifiers: Vec<ParameterizedModifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_rules: Vec<ValidationRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_timing: Option<ValidationTiming>,
}

impl TransformConfig {
    /// A bare transform of the given kind with no options
    pub fn new(kind: TransformType) -> Self {
        Self {
            kind,
            options: None,
            modifiers: Vec::new(),
            parameterized_modifiers: Vec::new(),
            validation_rules: Vec::new(),
            validation_timing: None,
        }
    }

    /// The identity transform
    pub fn direct() -> Self {
        Self::new(TransformType::Direct)
    }

    /// A combine transform joining sources with the given separator
    pub fn combine(separator: impl Into<String>) -> Self {
        let mut config = Self::new(TransformType::Combine);
        config.options = Some(TransformOptions {
            combine_with: Some(separator.into()),
            ..Default::default()
        });
        config
    }
}

/// Per-rule policy governing how a batch reacts to that rule's failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorStrategy {
    /// Collect the error into the batch error list and continue
    Fail,
    /// Drop the rule's output silently
    Skip,
    /// Write the rule's `errorDefault` at the destination, when defined
    Default,
}

/// One declarative source-to-destination transformation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingRule {
    /// Caller-unique identifier; join key for the rule-editing helpers
    pub id: String,
    pub source: SourceSpec,
    pub destination: DestinationField,
    pub transform: TransformConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_strategy: Option<ErrorStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MappingRule {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// Effective error strategy, defaulting to `fail`
    pub fn strategy(&self) -> ErrorStrategy {
        self.error_strategy.unwrap_or(ErrorStrategy::Fail)
    }
}

/// Outcome of applying one rule to one record
///
/// `value: None` models an absent result: the rule succeeded but produced
/// nothing to write at the destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingResult {
    pub destination_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
