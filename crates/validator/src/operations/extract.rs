//! Operation rule extraction
//!
//! Resolves an entity's multi-operation declarative rules into the rule set
//! of one operation.

use crate::foundation::{ConditionEntry, SchemaError};
use crate::operations::declarative::{EntityValidations, FieldEntries, StrippedFields};
use crate::schema::{EntityTarget, Target};
use indexmap::IndexMap;
use serde::Serialize;

/// Stripped rules of one operation, per target.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRules {
    /// Rules over the acting principal.
    pub actor_rules: StrippedFields,
    /// Rules over the operation input.
    pub input_rules: StrippedFields,
    /// Rules over the stored record.
    pub record_rules: StrippedFields,
}

impl OperationRules {
    /// Rules of a target.
    #[must_use]
    pub fn get(&self, target: EntityTarget) -> &StrippedFields {
        match target {
            EntityTarget::Actor => &self.actor_rules,
            EntityTarget::Input => &self.input_rules,
            EntityTarget::Record => &self.record_rules,
        }
    }

    /// Rules of a target given by name (`"actor"`, `"input"`, `"record"`).
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnknownTarget`] for any other name.
    pub fn target(&self, name: &str) -> Result<&StrippedFields, SchemaError> {
        Ok(self.get(name.parse()?))
    }

    /// Targets with their rules, in `actor`, `input`, `record` order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityTarget, &StrippedFields)> {
        EntityTarget::ALL.iter().map(|target| (*target, self.get(*target)))
    }

    /// Whether no target has any rule.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actor_rules.is_empty() && self.input_rules.is_empty() && self.record_rules.is_empty()
    }

    fn get_mut(&mut self, target: EntityTarget) -> &mut StrippedFields {
        match target {
            EntityTarget::Actor => &mut self.actor_rules,
            EntityTarget::Input => &mut self.input_rules,
            EntityTarget::Record => &mut self.record_rules,
        }
    }
}

/// Output of [`extract`].
#[derive(Debug, Clone, Default)]
pub struct OperationValidations {
    /// The operation's stripped rules.
    pub op_validations: OperationRules,
    /// The entity's named-condition registry, passed through.
    pub conditions: Option<IndexMap<String, ConditionEntry>>,
}

/// Extracts the rules that apply to `operation`.
///
/// For every field entry, the first tag matching `operation` decides: the
/// entry is emitted without its `operations` key, carrying that tag's
/// conditions. Entries without tags never match. Fields with no matching
/// entry are left out; absent categories come back empty. Entries are never
/// merged.
///
/// ```rust
/// use gatekeep_validator::operations::{EntityValidations, extract};
/// use serde_json::json;
///
/// let validations: EntityValidations = serde_json::from_value(json!({
///     "actorRules": {"id": [{"operations": ["create"], "required": true}]}
/// }))
/// .unwrap();
///
/// let out = extract("create", &validations);
/// assert_eq!(
///     serde_json::to_value(&out.op_validations).unwrap(),
///     json!({"actorRules": {"id": [{"required": true}]}, "inputRules": {}, "recordRules": {}})
/// );
/// assert!(out.conditions.is_none());
/// ```
#[must_use]
pub fn extract(operation: &str, validations: &EntityValidations) -> OperationValidations {
    let mut rules = OperationRules::default();

    for target in EntityTarget::ALL {
        let declared = match target {
            EntityTarget::Actor => &validations.actor_rules,
            EntityTarget::Input => &validations.input_rules,
            EntityTarget::Record => &validations.record_rules,
        };
        if let Some(fields) = declared {
            *rules.get_mut(*target) = extract_fields(operation, *target, fields);
        }
    }

    OperationValidations {
        op_validations: rules,
        conditions: validations.conditions.clone(),
    }
}

fn extract_fields(operation: &str, target: EntityTarget, fields: &FieldEntries) -> StrippedFields {
    let mut out = StrippedFields::new();

    for (field, entries) in fields {
        let matched: Vec<_> = entries
            .iter()
            .filter_map(|entry| {
                let tag = entry.matching_tag(operation)?;
                let stripped = entry.strip(tag);
                if stripped.is_empty() {
                    tracing::warn!(
                        operation = %operation,
                        bag = %target,
                        field = %field,
                        "rule entry has no declarative keys besides operations"
                    );
                }
                Some(stripped)
            })
            .collect();

        if matched.is_empty() {
            tracing::trace!(operation = %operation, bag = %target, field = %field, "no entry matches");
        } else {
            out.insert(field.clone(), matched);
        }
    }

    out
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::declarative::{DeclarativeRuleEntry, StrippedEntry};
    use crate::operations::tag::{ConditionRef, OperationTag};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_empty_validations() {
        let out = extract("create", &EntityValidations::default());
        assert!(out.op_validations.is_empty());
        assert!(out.conditions.is_none());
        assert_eq!(
            serde_json::to_value(&out.op_validations).unwrap(),
            json!({"actorRules": {}, "inputRules": {}, "recordRules": {}})
        );
    }

    #[test]
    fn test_non_matching_fields_are_omitted() {
        let validations = EntityValidations::new()
            .input_rule(
                "title",
                DeclarativeRuleEntry::new()
                    .operations(["create"])
                    .option("required", json!(true)),
            )
            .input_rule(
                "slug",
                DeclarativeRuleEntry::new()
                    .operations(["update"])
                    .option("required", json!(true)),
            )
            .input_rule("body", DeclarativeRuleEntry::new().option("required", json!(true)));

        let out = extract("create", &validations);
        let input = &out.op_validations.input_rules;
        assert_eq!(input.keys().collect::<Vec<_>>(), vec!["title"]);
    }

    #[test]
    fn test_entries_are_not_merged() {
        let validations = EntityValidations::new()
            .record_rule(
                "price",
                DeclarativeRuleEntry::new().operations(["*"]).option("min", json!(0)),
            )
            .record_rule(
                "price",
                DeclarativeRuleEntry::new()
                    .operations([OperationTag::conditional(
                        "update",
                        ConditionRef::any(["isSale"]),
                    )])
                    .option("max", json!(100)),
            );

        let out = extract("update", &validations);
        assert_eq!(
            serde_json::to_value(&out.op_validations.record_rules).unwrap(),
            json!({"price": [{"min": 0}, {"max": 100, "conditions": ["isSale"]}]})
        );
    }

    #[test]
    fn test_empty_entry_is_still_emitted() {
        let validations =
            EntityValidations::new().actor_rule("id", DeclarativeRuleEntry::new().operations(["*"]));
        let out = extract("delete", &validations);
        assert_eq!(out.op_validations.actor_rules["id"], vec![StrippedEntry::default()]);
    }

    #[test]
    fn test_target_by_name() {
        let out = extract("create", &EntityValidations::default());
        assert!(out.op_validations.target("input").is_ok());

        let err = out.op_validations.target("body").unwrap_err();
        assert!(matches!(err, SchemaError::UnknownTarget { .. }));
        assert_eq!(
            err.to_string(),
            "unknown target 'body', expected one of: actor, input, record"
        );
    }
}
