//! Rule-editing helpers
//!
//! All helpers are copy-on-write: they return a fresh rule list with fresh
//! rule values and never mutate their inputs, so callers holding older
//! lists never observe aliased edits.
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use crate::types::{
    DestinationField, MappingRule, SourceField, SourceSpec, TransformConfig, TransformType,
};
use uuid::Uuid;

/// Add `source` to the rule targeting `destination`, or append a new
/// `direct` rule when no rule targets that destination key yet.
///
/// When the addition makes the rule multi-source, the transform
/// auto-switches to `combine` with a single-space separator, but only if
/// the transform is still `direct`; an explicitly chosen transform is
/// preserved.
pub fn create_mapping(
    source: SourceField,
    destination: DestinationField,
    rules: &[MappingRule],
) -> Vec<MappingRule> {
    let mut next: Vec<MappingRule> = rules.to_vec();

    if let Some(rule) = next
        .iter_mut()
        .find(|rule| rule.destination.key == destination.key)
    {
        let mut fields = rule.source.fields().to_vec();
        fields.push(source);
        if fields.len() > 1 && rule.transform.kind == TransformType::Direct {
            rule.transform = TransformConfig::combine(" ");
        }
        rule.source = SourceSpec::from_fields(fields);
        return next;
    }

    next.push(MappingRule {
        id: generate_rule_id(),
        source: SourceSpec::Single(source),
        destination,
        transform: TransformConfig::direct(),
        enabled: None,
        error_strategy: None,
        error_default: None,
        tags: None,
        description: None,
    });
    next
}

/// Remove the rule with the given id
pub fn remove_mapping(id: &str, rules: &[MappingRule]) -> Vec<MappingRule> {
    rules.iter().filter(|rule| rule.id != id).cloned().collect()
}

/// Drop one source from a rule. A rule left with a single source is demoted
/// back to scalar shape with a `direct` transform; a rule left with none is
/// removed entirely.
pub fn remove_source_from_mapping(
    id: &str,
    source_key: &str,
    rules: &[MappingRule],
) -> Vec<MappingRule> {
    let mut next = Vec::with_capacity(rules.len());
    for rule in rules {
        if rule.id != id {
            next.push(rule.clone());
            continue;
        }

        let remaining: Vec<SourceField> = rule
            .source
            .fields()
            .iter()
            .filter(|field| field.key != source_key)
            .cloned()
            .collect();

        match remaining.len() {
            0 => {} // last source gone, the rule goes with it
            1 => {
                let mut updated = rule.clone();
                updated.source = SourceSpec::from_fields(remaining);
                updated.transform = TransformConfig::direct();
                next.push(updated);
            }
            _ => {
                let mut updated = rule.clone();
                updated.source = SourceSpec::from_fields(remaining);
                next.push(updated);
            }
        }
    }
    next
}

/// Propose `direct` mappings by matching destination fields to source
/// fields on normalized names (lower-cased, `_`/`-` stripped) or keys.
/// Unmatched destinations are left unmapped.
pub fn auto_generate_mappings(
    source_fields: &[SourceField],
    destination_fields: &[DestinationField],
) -> Vec<MappingRule> {
    let mut rules = Vec::new();
    for destination in destination_fields {
        let destination_name = normalize(destination.name.as_deref().unwrap_or(&destination.key));
        let destination_key = normalize(&destination.key);

        let matched = source_fields.iter().find(|source| {
            let source_name = normalize(source.name.as_deref().unwrap_or(&source.key));
            let source_key = normalize(&source.key);
            source_name == destination_name || source_key == destination_key
        });

        if let Some(source) = matched {
            rules.push(MappingRule {
                id: generate_rule_id(),
                source: SourceSpec::Single(source.clone()),
                destination: destination.clone(),
                transform: TransformConfig::direct(),
                enabled: None,
                error_strategy: None,
                error_default: None,
                tags: None,
                description: None,
            });
        }
    }
    rules
}

fn normalize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|ch| *ch != '_' && *ch != '-')
        .collect()
}

fn generate_rule_id() -> String {
    format!("map-{}", Uuid::new_v4())
}
