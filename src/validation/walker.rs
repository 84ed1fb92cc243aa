use std::collections::HashMap;

use tracing::debug;

use super::suggest::{CaseFoldMatcher, KeyMatcher};
use crate::node::{Source, SourceNode};
use crate::report::{Entry, Position, Report};
use crate::schema::{ConfigValue, Field, Shape, flattened_fields};

/// Walks a configuration value tree alongside the parse tree of the document
/// it was decoded from, invoking each value's validation hook and correlating
/// every diagnostic with its most specific source position.
pub struct Validator {
    matcher: Box<dyn KeyMatcher>,
}

impl Validator {
    pub fn new() -> Self {
        Self::with_matcher(Box::new(CaseFoldMatcher))
    }

    pub fn with_matcher(matcher: Box<dyn KeyMatcher>) -> Self {
        Self { matcher }
    }

    /// Source-correlated validation: diagnostics carry the line/column of the
    /// document node they concern, or of the nearest ancestor that has one.
    pub fn validate(
        &self,
        config: &dyn ConfigValue,
        node: Option<&dyn SourceNode>,
        source: Option<&Source>,
    ) -> Report {
        self.walk(config, node, source, true)
    }

    /// Structure-only validation: every diagnostic position is the unset
    /// sentinel.
    pub fn validate_without_source(&self, config: &dyn ConfigValue) -> Report {
        self.walk(config, None, None, true)
    }

    fn walk(
        &self,
        value: &dyn ConfigValue,
        node: Option<&dyn SourceNode>,
        source: Option<&Source>,
        at_root: bool,
    ) -> Report {
        let position = match (node, source) {
            (Some(node), Some(source)) => node.value_position(source),
            _ => Position::unset(),
        };

        let mut report = Report::new();
        if let Some(hook) = value.validator() {
            // Root diagnostics concern cross-field invariants, not one
            // document location, so they stay position-free.
            let sub = if at_root {
                hook.validate()
            } else {
                hook.validate().with_position(&position)
            };
            let fatal = sub.is_fatal();
            report.merge(sub);
            // Recursing below a value that is already known invalid mostly
            // produces misleading cascade diagnostics.
            if fatal {
                return report;
            }
        }

        match value.shape() {
            Shape::Scalar => {}
            Shape::Optional(None) => {}
            Shape::Optional(Some(inner)) => {
                let sub = self.walk(inner, node, source, false);
                report.merge(sub.with_position(&position));
            }
            Shape::Record(fields) => {
                let sub = self.walk_record(fields, node, source, &position);
                report.merge(sub.with_position(&position));
            }
            Shape::Sequence(items) => {
                for (index, item) in items.into_iter().enumerate() {
                    let child = node.and_then(|n| n.indexed_child(index)).or(node);
                    let sub = self.walk(item, child, source, false);
                    report.merge(sub.with_position(&position));
                }
            }
        }
        report
    }

    /// Reconciles a record's flattened fields with the mapping node's keys:
    /// fields found in the document recurse with their own sub-node, missing
    /// fields recurse detached, and document keys matching no field become
    /// unrecognized-key warnings with typo suggestions.
    fn walk_record(
        &self,
        fields: Vec<Field<'_>>,
        node: Option<&dyn SourceNode>,
        source: Option<&Source>,
        position: &Position,
    ) -> Report {
        let mut report = Report::new();

        let entries = node.and_then(|n| n.keyed_children());
        let children: HashMap<&str, &dyn SourceNode> = entries
            .as_deref()
            .unwrap_or_default()
            .iter()
            .copied()
            .collect();

        let mut tags = Vec::new();
        for field in flattened_fields(fields) {
            tags.push(field.tag);
            let sub = match children.get(field.tag) {
                Some(child) => self.walk(field.value, Some(*child), source, false),
                None => self.walk(field.value, None, None, false),
            };
            report.merge(sub.with_position(position));
        }

        // A record decoded from something other than a mapping (a scalar,
        // say) has no key set to check for unused keys.
        let Some(entries) = entries else {
            return report;
        };

        if let Some(node) = node {
            debug!(convention = node.tag(), "reconciled record fields");
        }

        for (key, child) in entries {
            if tags.iter().any(|tag| *tag == key) {
                continue;
            }
            let key_position = source
                .map(|s| child.key_position(s))
                .unwrap_or_else(Position::unset);
            report.add(
                Entry::warning(format!("unrecognized key: {key}")).at(key_position.clone()),
            );
            if let Some(suggestion) = self.matcher.suggest(key, &tags) {
                report.add(
                    Entry::info(format!("did you mean {suggestion} instead of {key}"))
                        .at(key_position),
                );
            }
        }

        report
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates `config` against the document it was decoded from, using the
/// default key matcher.
pub fn validate(
    config: &dyn ConfigValue,
    node: Option<&dyn SourceNode>,
    source: Option<&Source>,
) -> Report {
    Validator::new().validate(config, node, source)
}

/// Validates `config` without a source document; all positions are unset.
pub fn validate_without_source(config: &dyn ConfigValue) -> Report {
    Validator::new().validate_without_source(config)
}
