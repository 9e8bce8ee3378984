//! Fieldmap Core - declarative field mapping and transformation engine
//!
//! This crate computes destination records from source records by applying
//! user-authored mapping rules: resolve source values, transform them
//! (direct, convert, combine, split, expression, default, conditional,
//! lookup), run post-processing modifiers, validate, and write into the
//! destination shape, isolating failures per rule according to each
//! rule's error strategy.
//!
//! # Main Components
//!
//! - **Error Handling**: crate error enum built on `thiserror`, with
//!   per-rule failures caught and reported rather than escalated
//! - **Core Types**: mapping rules, transform configurations, validation
//!   rules, and results, all serde-serializable
//! - **Mapping Engine**: rule applier and batch applier, plus the path
//!   resolver, value converter, modifier library, validation engine, and
//!   the bridge to an injected expression evaluator
//!
//! # Example
//!
//! ```
//! use fieldmap_core::{MappingEngine, MappingRuleBuilder};
//! use fieldmap_core::{DestinationField, FieldType, SourceField};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> fieldmap_core::Result<()> {
//! let rule = MappingRuleBuilder::new("copy-name")
//!     .source(SourceField::new("name", FieldType::String))
//!     .destination(DestinationField::new("full_name", FieldType::String))
//!     .build()?;
//!
//! let engine = MappingEngine::new();
//! let outcome = engine
//!     .apply_all_mappings(&[rule], &json!({"name": "Ada"}))
//!     .await;
//! assert_eq!(outcome.record, json!({"full_name": "Ada"}));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod mapping;
pub mod types;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use types::{
    // Field and rule model
    DestinationField, ErrorStrategy, FieldType, MappingRule, MappingResult, SourceField,
    SourceSpec,

    // Transform configuration
    ConditionNode, ConditionOperator, LogicOperator, ParameterizedModifier, SwitchCase,
    TransformConfig, TransformOptions, TransformType,

    // Validation configuration
    ValidationRule, ValidationTiming, ValidationType,
};

pub use mapping::{
    builder::MappingRuleBuilder,
    diagnostics::{MappingDiagnostics, MappingSummary, MappingWarning, WarningCode},
    expression::{CompiledProgram, ExpressionEvaluator, ExpressionFunction},
    MappingEngine, MappingOutcome,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
