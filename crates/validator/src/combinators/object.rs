//! Object schema
//!
//! Validates a JSON object field by field. Each field's rule is driven
//! through [`validate_conditional`], so per-field gating is honored here, and
//! the field name is prepended to every nested error path.

use crate::foundation::{
    BoxError, Rule, ValidationContext, ValidationError, ValidationResult, ValidationRule,
    validate_conditional,
};
use crate::validators::type_mismatch;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;

/// Message id of the aggregate unknown-fields error.
pub const UNKNOWN_FIELDS_ID: &str = "validation.unknownFields";

/// Field rules for a JSON object.
///
/// ```rust
/// use gatekeep_validator::combinators::ObjectSchema;
/// use gatekeep_validator::foundation::{ValidationContext, validate};
/// use gatekeep_validator::validators::{min_length, required};
/// use serde_json::json;
///
/// # futures::executor::block_on(async {
/// let address = ObjectSchema::new()
///     .field("street", required())
///     .field("zip", min_length(5))
///     .into_rule();
///
/// let result = validate(&json!({"zip": "123"}), &address, &ValidationContext::new()).await;
/// let paths: Vec<_> = result.errors().iter().map(|e| e.dotted_path()).collect();
/// assert_eq!(paths, ["street", "zip"]);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    fields: IndexMap<String, ValidationRule>,
    allow_unknown_fields: bool,
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self {
            fields: IndexMap::new(),
            allow_unknown_fields: true,
        }
    }
}

impl ObjectSchema {
    /// Creates a schema with no fields that accepts unknown fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the rule of a field.
    #[must_use = "builder methods must be chained or built"]
    pub fn field(mut self, name: impl Into<String>, rule: impl Into<ValidationRule>) -> Self {
        self.fields.insert(name.into(), rule.into());
        self
    }

    /// Adds several field rules.
    #[must_use = "builder methods must be chained or built"]
    pub fn fields<I, K>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, ValidationRule)>,
        K: Into<String>,
    {
        self.fields
            .extend(fields.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Whether fields without a rule are accepted (default `true`).
    #[must_use = "builder methods must be chained or built"]
    pub fn allow_unknown_fields(mut self, allow: bool) -> Self {
        self.allow_unknown_fields = allow;
        self
    }

    /// The declared fields, in declaration order.
    #[must_use]
    pub fn field_rules(&self) -> &IndexMap<String, ValidationRule> {
        &self.fields
    }

    /// Wraps the schema as a [`ValidationRule`].
    #[must_use]
    pub fn into_rule(self) -> ValidationRule {
        ValidationRule::new(self)
    }
}

#[async_trait]
impl Rule for ObjectSchema {
    async fn validate(
        &self,
        value: &Value,
        ctx: &ValidationContext,
    ) -> Result<ValidationResult, BoxError> {
        let Value::Object(object) = value else {
            return Ok(type_mismatch("object", value).into());
        };

        let mut result = ValidationResult::success();
        for (name, rule) in &self.fields {
            let field_value = object.get(name).unwrap_or(&Value::Null);
            let outcome = validate_conditional(field_value, rule, ctx).await;
            if !outcome.pass() {
                tracing::trace!(field = %name, errors = outcome.errors().len(), "object field failed");
            }
            result.merge(outcome.map_errors(|error| error.at(name.as_str())));
        }

        if !self.allow_unknown_fields {
            let unknown: Vec<Value> = object
                .keys()
                .filter(|key| !self.fields.contains_key(key.as_str()))
                .map(|key| Value::String(key.clone()))
                .collect();
            if !unknown.is_empty() {
                let names: Vec<&str> = unknown.iter().filter_map(Value::as_str).collect();
                result.merge(
                    ValidationError::new(format!("unknown fields: {}", names.join(", ")))
                        .with_message_id(UNKNOWN_FIELDS_ID)
                        .with_expected(
                            "allowedFields",
                            self.fields.keys().cloned().map(Value::String).collect(),
                        )
                        .with_received(Value::Array(unknown))
                        .into(),
                );
            }
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "object"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::validate;
    use crate::validators::{min, min_length, required};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_rejects_non_objects() {
        let schema = ObjectSchema::new().field("a", required()).into_rule();
        let ctx = ValidationContext::new();

        for value in [json!([1]), json!("x"), Value::Null] {
            let result = validate(&value, &schema, &ctx).await;
            assert_eq!(result.errors().len(), 1);
            assert_eq!(result.errors()[0].expected.as_ref().unwrap().value, json!("object"));
            assert_eq!(result.errors()[0].received.as_ref().unwrap().value, value);
        }
    }

    #[tokio::test]
    async fn test_unknown_fields_reported_once() {
        let schema = ObjectSchema::new()
            .field("a", min(0.0))
            .allow_unknown_fields(false)
            .into_rule();
        let result = validate(&json!({"a": 1, "b": "x"}), &schema, &ValidationContext::new()).await;

        assert!(!result.pass());
        assert_eq!(result.errors().len(), 1);
        let error = &result.errors()[0];
        assert_eq!(error.message.as_deref(), Some("unknown fields: b"));
        assert_eq!(error.received.as_ref().unwrap().value, json!(["b"]));
    }

    #[tokio::test]
    async fn test_unknown_fields_allowed_by_default() {
        let schema = ObjectSchema::new().field("a", min(0.0)).into_rule();
        let result = validate(&json!({"a": 1, "b": "x"}), &schema, &ValidationContext::new()).await;
        assert!(result.pass());
    }

    #[tokio::test]
    async fn test_nested_paths_and_gating() {
        let inner = ObjectSchema::new().field("zip", min_length(5)).into_rule();
        let schema = ObjectSchema::new()
            .field("address", inner)
            .field("nickname", min_length(3).when("hasNickname"))
            .into_rule();
        let ctx = ValidationContext::builder().condition("hasNickname", false).build();

        let result = validate(
            &json!({"address": {"zip": "1"}, "nickname": "x"}),
            &schema,
            &ctx,
        )
        .await;

        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].path, vec!["address", "zip"]);
    }
}
