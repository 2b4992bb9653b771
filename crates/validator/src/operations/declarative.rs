//! Declarative rule entries
//!
//! A [`DeclarativeRuleEntry`] is a flat JSON object of rule options plus an
//! `operations` tag list:
//!
//! ```json
//! { "operations": ["create", ["update", ["isDraft"]]], "required": true, "minLength": 3 }
//! ```
//!
//! Extraction turns matching entries into [`StrippedEntry`]s (no
//! `operations`, plus the matching tag's `conditions`), which compile into
//! rules with [`StrippedEntry::to_rule`].

use crate::combinators::RuleAggregator;
use crate::foundation::{ConditionEntry, SchemaError, ValidationRule};
use crate::operations::tag::{ConditionRef, OperationTag};
use crate::validators::{
    DataType, datatype, exact_length, integer, max, max_length, min, min_length, not_one_of,
    one_of, pattern, positive, required,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declarative entries per field name, in declaration order.
pub type FieldEntries = IndexMap<String, Vec<DeclarativeRuleEntry>>;

/// Stripped entries per field name, in declaration order.
pub type StrippedFields = IndexMap<String, Vec<StrippedEntry>>;

// ============================================================================
// DECLARATIVE RULE ENTRY
// ============================================================================

/// One declarative rule entry of a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclarativeRuleEntry {
    /// Operations the entry applies to. Entries without tags never match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operations: Option<Vec<OperationTag>>,
    /// Every other key of the entry.
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl DeclarativeRuleEntry {
    /// Creates an entry with no tags and no options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operation tags.
    #[must_use = "builder methods must be chained or built"]
    pub fn operations<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OperationTag>,
    {
        self.operations = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Sets one rule option.
    #[must_use = "builder methods must be chained or built"]
    pub fn option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// The first tag matching `operation`, if any.
    #[must_use]
    pub fn matching_tag(&self, operation: &str) -> Option<&OperationTag> {
        self.operations
            .as_deref()?
            .iter()
            .find(|tag| tag.matches(operation))
    }

    /// Copy without `operations`, carrying the conditions of `tag`.
    #[must_use]
    pub fn strip(&self, tag: &OperationTag) -> StrippedEntry {
        StrippedEntry {
            options: self.options.clone(),
            conditions: tag.condition_ref().cloned(),
        }
    }
}

// ============================================================================
// STRIPPED ENTRY
// ============================================================================

/// A declarative entry resolved for one operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrippedEntry {
    /// Conditions of the tag that matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<ConditionRef>,
    /// The entry's rule options.
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

/// Option keys compiled by [`StrippedEntry::to_rule`], in compilation order.
pub const KNOWN_OPTIONS: &[&str] = &[
    "required",
    "datatype",
    "integer",
    "positive",
    "min",
    "max",
    "minLength",
    "maxLength",
    "length",
    "pattern",
    "oneOf",
    "enum",
    "notOneOf",
    "message",
    "messageId",
];

impl StrippedEntry {
    /// Whether the entry has no rule options.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// A rule option.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Compiles the options into one rule.
    ///
    /// Known keys become built-in rules, run in [`KNOWN_OPTIONS`] order.
    /// Unknown keys are ignored. The entry's conditions gate the result.
    ///
    /// # Errors
    ///
    /// [`SchemaError::InvalidOption`] for malformed option values,
    /// [`SchemaError::InvalidPattern`] for bad regular expressions.
    pub fn to_rule(&self) -> Result<ValidationRule, SchemaError> {
        let mut rules = RuleAggregator::new();

        if self.flag("required")? {
            rules = rules.add(required());
        }
        if let Some(value) = self.option("datatype") {
            let name = value
                .as_str()
                .ok_or_else(|| SchemaError::invalid_option("datatype", "expected a type name"))?;
            rules = rules.add(datatype(name.parse::<DataType>()?));
        }
        if self.flag("integer")? {
            rules = rules.add(integer());
        }
        if self.flag("positive")? {
            rules = rules.add(positive());
        }
        if let Some(bound) = self.number("min")? {
            rules = rules.add(min(bound));
        }
        if let Some(bound) = self.number("max")? {
            rules = rules.add(max(bound));
        }
        if let Some(len) = self.length("minLength")? {
            rules = rules.add(min_length(len));
        }
        if let Some(len) = self.length("maxLength")? {
            rules = rules.add(max_length(len));
        }
        if let Some(len) = self.length("length")? {
            rules = rules.add(exact_length(len));
        }
        if let Some(value) = self.option("pattern") {
            let source = value
                .as_str()
                .ok_or_else(|| SchemaError::invalid_option("pattern", "expected a string"))?;
            rules = rules.add(pattern(source)?);
        }
        for key in ["oneOf", "enum"] {
            if let Some(values) = self.list(key)? {
                rules = rules.add(one_of(values));
            }
        }
        if let Some(values) = self.list("notOneOf")? {
            rules = rules.add(not_one_of(values));
        }

        for key in self.options.keys() {
            if !KNOWN_OPTIONS.contains(&key.as_str()) {
                tracing::debug!(option = %key, "ignoring unknown declarative option");
            }
        }

        let mut rule = rules.composite();
        if let Some(message) = self.text("message")? {
            rule = rule.with_message(message);
        }
        if let Some(id) = self.text("messageId")? {
            rule = rule.with_message_id(id);
        }
        if let Some(conditions) = &self.conditions {
            rule = rule.when_spec(conditions.to_spec());
        }
        Ok(rule)
    }

    fn flag(&self, key: &str) -> Result<bool, SchemaError> {
        match self.option(key) {
            None | Some(Value::Null) => Ok(false),
            Some(Value::Bool(flag)) => Ok(*flag),
            Some(_) => Err(SchemaError::invalid_option(key, "expected a boolean")),
        }
    }

    fn number(&self, key: &str) -> Result<Option<f64>, SchemaError> {
        self.option(key)
            .map(|v| {
                v.as_f64()
                    .ok_or_else(|| SchemaError::invalid_option(key, "expected a number"))
            })
            .transpose()
    }

    fn length(&self, key: &str) -> Result<Option<usize>, SchemaError> {
        self.option(key)
            .map(|v| {
                v.as_u64()
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or_else(|| {
                        SchemaError::invalid_option(key, "expected a non-negative integer")
                    })
            })
            .transpose()
    }

    fn list(&self, key: &str) -> Result<Option<Vec<Value>>, SchemaError> {
        self.option(key)
            .map(|v| {
                v.as_array()
                    .cloned()
                    .ok_or_else(|| SchemaError::invalid_option(key, "expected an array"))
            })
            .transpose()
    }

    fn text(&self, key: &str) -> Result<Option<&str>, SchemaError> {
        self.option(key)
            .map(|v| {
                v.as_str()
                    .ok_or_else(|| SchemaError::invalid_option(key, "expected a string"))
            })
            .transpose()
    }
}

// ============================================================================
// ENTITY VALIDATIONS
// ============================================================================

/// Declarative validations of one entity, covering every operation.
///
/// ```rust
/// use gatekeep_validator::operations::EntityValidations;
/// use serde_json::json;
///
/// let validations: EntityValidations = serde_json::from_value(json!({
///     "conditions": {"isDraft": false},
///     "inputRules": {
///         "title": [{"operations": ["create", ["update", ["isDraft"]]], "minLength": 3}]
///     }
/// }))
/// .unwrap();
/// assert!(validations.input_rules.is_some());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityValidations {
    /// Named-condition registry shared by every operation.
    #[serde(default)]
    pub conditions: Option<IndexMap<String, ConditionEntry>>,
    /// Rules over the acting principal.
    #[serde(default)]
    pub actor_rules: Option<FieldEntries>,
    /// Rules over the operation input.
    #[serde(default)]
    pub input_rules: Option<FieldEntries>,
    /// Rules over the stored record.
    #[serde(default)]
    pub record_rules: Option<FieldEntries>,
}

impl EntityValidations {
    /// Creates empty validations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a named condition.
    #[must_use = "builder methods must be chained or built"]
    pub fn condition(mut self, name: impl Into<String>, entry: impl Into<ConditionEntry>) -> Self {
        self.conditions
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), entry.into());
        self
    }

    /// Appends an entry to a field of the actor rules.
    #[must_use = "builder methods must be chained or built"]
    pub fn actor_rule(mut self, field: impl Into<String>, entry: DeclarativeRuleEntry) -> Self {
        push_entry(&mut self.actor_rules, field.into(), entry);
        self
    }

    /// Appends an entry to a field of the input rules.
    #[must_use = "builder methods must be chained or built"]
    pub fn input_rule(mut self, field: impl Into<String>, entry: DeclarativeRuleEntry) -> Self {
        push_entry(&mut self.input_rules, field.into(), entry);
        self
    }

    /// Appends an entry to a field of the record rules.
    #[must_use = "builder methods must be chained or built"]
    pub fn record_rule(mut self, field: impl Into<String>, entry: DeclarativeRuleEntry) -> Self {
        push_entry(&mut self.record_rules, field.into(), entry);
        self
    }
}

fn push_entry(rules: &mut Option<FieldEntries>, field: String, entry: DeclarativeRuleEntry) {
    rules
        .get_or_insert_with(IndexMap::new)
        .entry(field)
        .or_default()
        .push(entry);
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{Scope, ValidationContext, validate, validate_conditional};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn stripped(options: Value) -> StrippedEntry {
        serde_json::from_value(options).unwrap()
    }

    #[test]
    fn test_entry_wire_form() {
        let entry: DeclarativeRuleEntry = serde_json::from_value(json!({
            "operations": ["create", ["update", [["a", "b"], "all"]]],
            "required": true,
            "minLength": 2
        }))
        .unwrap();

        assert_eq!(entry.operations.as_ref().unwrap().len(), 2);
        assert_eq!(entry.options.get("minLength"), Some(&json!(2)));
        assert!(!entry.options.contains_key("operations"));
    }

    #[test]
    fn test_first_matching_tag_wins() {
        let entry = DeclarativeRuleEntry::new()
            .operations([
                OperationTag::conditional("update", ConditionRef::any(["first"])),
                OperationTag::conditional("*", ConditionRef::any(["second"])),
            ])
            .option("required", json!(true));

        let tag = entry.matching_tag("update").unwrap();
        let out = entry.strip(tag);
        assert_eq!(out.conditions.unwrap().names, vec!["first"]);
        assert!(entry.matching_tag("create").is_some());
        assert!(DeclarativeRuleEntry::new().matching_tag("create").is_none());
    }

    #[test]
    fn test_stripped_wire_form() {
        let entry = StrippedEntry {
            options: [("required".to_string(), json!(true))].into_iter().collect(),
            conditions: Some(ConditionRef::all(["c1"])),
        };
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({"required": true, "conditions": [["c1"], "all"]})
        );
        assert_eq!(
            serde_json::to_value(StrippedEntry::default()).unwrap(),
            json!({})
        );
    }

    #[tokio::test]
    async fn test_to_rule_compiles_known_options() {
        let rule = stripped(json!({"minLength": 3, "pattern": "^[a-z]+$"}))
            .to_rule()
            .unwrap();
        let ctx = ValidationContext::new();

        assert!(validate(&json!("abc"), &rule, &ctx).await.pass());
        let result = validate(&json!("A1"), &rule, &ctx).await;
        let ids: Vec<_> = result
            .errors()
            .iter()
            .map(|e| e.message_ids[0].as_str())
            .collect();
        assert_eq!(ids, vec!["validation.minLength", "validation.pattern"]);
    }

    #[tokio::test]
    async fn test_to_rule_required_and_message() {
        let rule = stripped(json!({"required": true, "message": "title needed", "label": "x"}))
            .to_rule()
            .unwrap();
        let result = validate(&Value::Null, &rule, &ValidationContext::new()).await;

        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].message.as_deref(), Some("title needed"));
    }

    #[tokio::test]
    async fn test_to_rule_attaches_conditions() {
        let mut entry = stripped(json!({"min": 10}));
        entry.conditions = Some(ConditionRef::all(["isPremium"]));
        let rule = entry.to_rule().unwrap();

        assert_eq!(rule.conditions.as_ref().unwrap().scope, Scope::All);
        let ctx = ValidationContext::builder().condition("isPremium", false).build();
        assert!(validate_conditional(&json!(1), &rule, &ctx).await.pass());
    }

    #[test]
    fn test_to_rule_rejects_malformed_options() {
        for bad in [
            json!({"required": "yes"}),
            json!({"minLength": -1}),
            json!({"min": "ten"}),
            json!({"oneOf": "a"}),
            json!({"datatype": "date"}),
        ] {
            assert!(matches!(
                stripped(bad).to_rule(),
                Err(SchemaError::InvalidOption { .. })
            ));
        }
        assert!(matches!(
            stripped(json!({"pattern": "("})).to_rule(),
            Err(SchemaError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_entity_validations_builder() {
        let validations = EntityValidations::new()
            .condition("isDraft", true)
            .input_rule("title", DeclarativeRuleEntry::new().operations(["*"]))
            .input_rule("title", DeclarativeRuleEntry::new().operations(["create"]));

        assert_eq!(validations.input_rules.unwrap()["title"].len(), 2);
        assert!(validations.actor_rules.is_none());
        assert_eq!(validations.conditions.unwrap().len(), 1);
    }
}
