//! Entity validation over actor, input and record
//!
//! ```rust
//! use gatekeep_validator::schema::{EntityRequest, EntitySchema, EntityTarget, EntityValidator};
//! use gatekeep_validator::foundation::ValidationContext;
//! use gatekeep_validator::validators::{min_length, required};
//! use serde_json::json;
//!
//! # futures::executor::block_on(async {
//! let schema = EntitySchema::builder()
//!     .add_field(EntityTarget::Actor, "id", required())
//!     .add_field(EntityTarget::Input, "title", min_length(3))
//!     .for_operations(["create", "update"])
//!     .build();
//! let validator = EntityValidator::new(schema);
//!
//! let request = EntityRequest::new("create")
//!     .actor(json!({"id": 1}))
//!     .input(json!({"title": "hi"}));
//! let result = validator.validate(&request, &ValidationContext::new()).await;
//!
//! assert_eq!(result.errors()[0].path, ["input", "title"]);
//! assert_eq!(result.errors()[0].target.as_deref(), Some("input"));
//! # });
//! ```

use crate::combinators::RuleAggregator;
use crate::foundation::SchemaError;
use crate::operations::{EntityValidations, extract};
use crate::schema::target::{SchemaBuilder, Target, TargetRequest, TargetSchema};
use crate::schema::validate::TargetValidator;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The three entity targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityTarget {
    /// The acting principal.
    Actor,
    /// The operation input.
    Input,
    /// The stored record.
    Record,
}

impl EntityTarget {
    const NAMES: [&'static str; 3] = ["actor", "input", "record"];
}

impl Target for EntityTarget {
    type Selector = String;

    const ALL: &'static [Self] = &[Self::Actor, Self::Input, Self::Record];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Actor => "actor",
            Self::Input => "input",
            Self::Record => "record",
        }
    }
}

impl fmt::Display for EntityTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityTarget {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "actor" => Ok(Self::Actor),
            "input" => Ok(Self::Input),
            "record" => Ok(Self::Record),
            other => Err(SchemaError::UnknownTarget {
                target: other.to_string(),
                expected: Self::NAMES.to_vec(),
            }),
        }
    }
}

/// Entity schema; the selector is the operation name.
pub type EntitySchema = TargetSchema<EntityTarget>;

/// Builder of [`EntitySchema`].
pub type EntitySchemaBuilder = SchemaBuilder<EntityTarget>;

/// Validator of [`EntityRequest`]s.
pub type EntityValidator = TargetValidator<EntityTarget>;

impl SchemaBuilder<EntityTarget> {
    /// Restricts the schema to the given operations.
    #[must_use = "builder methods must be chained or built"]
    pub fn for_operations<I, S>(self, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applies_to(operations.into_iter().map(Into::into))
    }
}

impl TargetSchema<EntityTarget> {
    /// Builds the schema of one operation from declarative validations.
    ///
    /// Each field's matching entries are compiled and combined with
    /// [`RuleAggregator::composite_conditional`], so conditions attached by
    /// operation tags gate at validation time. The entity's named conditions
    /// become schema conditions.
    ///
    /// # Errors
    ///
    /// Propagates [`SchemaError`]s from compiling the entries.
    pub fn for_operation(
        operation: &str,
        validations: &EntityValidations,
    ) -> Result<Self, SchemaError> {
        let extracted = extract(operation, validations);
        let mut builder = Self::builder();

        for (target, fields) in extracted.op_validations.iter() {
            for (field, entries) in fields {
                let rules = entries
                    .iter()
                    .map(|entry| entry.to_rule())
                    .collect::<Result<RuleAggregator, _>>()?;
                builder = builder.add_field(target, field.as_str(), rules.composite_conditional());
            }
        }

        if let Some(conditions) = extracted.conditions {
            builder = builder.define_conditions(conditions);
        }
        Ok(builder.build())
    }
}

/// One entity operation call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityRequest {
    /// Operation name, e.g. `"create"`.
    pub operation: String,
    /// Actor values.
    pub actor: Option<Value>,
    /// Input values.
    pub input: Option<Value>,
    /// Record values.
    pub record: Option<Value>,
}

impl EntityRequest {
    /// Creates a request with no value bags.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            ..Self::default()
        }
    }

    /// Sets the actor values.
    #[must_use = "builder methods must be chained or built"]
    pub fn actor(mut self, values: Value) -> Self {
        self.actor = Some(values);
        self
    }

    /// Sets the input values.
    #[must_use = "builder methods must be chained or built"]
    pub fn input(mut self, values: Value) -> Self {
        self.input = Some(values);
        self
    }

    /// Sets the record values.
    #[must_use = "builder methods must be chained or built"]
    pub fn record(mut self, values: Value) -> Self {
        self.record = Some(values);
        self
    }
}

impl TargetRequest<EntityTarget> for EntityRequest {
    fn selector(&self) -> &String {
        &self.operation
    }

    fn values(&self, target: EntityTarget) -> Option<&Value> {
        match target {
            EntityTarget::Actor => self.actor.as_ref(),
            EntityTarget::Input => self.input.as_ref(),
            EntityTarget::Record => self.record.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::ValidationContext;
    use crate::schema::ValidationOptions;
    use crate::validators::{max, min_length, required};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn schema() -> EntitySchema {
        EntitySchema::builder()
            .add_field(EntityTarget::Actor, "id", required())
            .add_field(EntityTarget::Input, "title", min_length(3))
            .add_field(EntityTarget::Input, "price", max(100.0))
            .add_field(EntityTarget::Record, "ownerId", required())
            .build()
    }

    #[test]
    fn test_target_names() {
        assert_eq!("record".parse::<EntityTarget>().unwrap(), EntityTarget::Record);
        let err = "body".parse::<EntityTarget>().unwrap_err();
        assert!(matches!(err, SchemaError::UnknownTarget { ref target, .. } if target == "body"));
    }

    #[tokio::test]
    async fn test_collects_errors_in_declaration_order() {
        let validator = EntityValidator::new(schema());
        let request = EntityRequest::new("update")
            .actor(json!({}))
            .input(json!({"title": "a", "price": 500}));

        let result = validator.validate(&request, &ValidationContext::new()).await;
        let paths: Vec<_> = result.errors().iter().map(|e| e.dotted_path()).collect();
        assert_eq!(paths, vec!["actor.id", "input.title", "input.price", "record.ownerId"]);
    }

    #[tokio::test]
    async fn test_fail_fast_stops_at_first_field() {
        let validator = EntityValidator::new(schema()).with_options(ValidationOptions::fail_fast());
        let request = EntityRequest::new("update").input(json!({"title": "a"}));

        let result = validator.validate(&request, &ValidationContext::new()).await;
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].dotted_path(), "actor.id");
    }

    #[tokio::test]
    async fn test_operation_filter() {
        let schema = EntitySchema::builder()
            .add_field(EntityTarget::Input, "title", required())
            .for_operations(["create"])
            .build();
        let validator = EntityValidator::new(schema);
        let ctx = ValidationContext::new();

        assert!(validator.validate(&EntityRequest::new("delete"), &ctx).await.pass());
        assert!(!validator.validate(&EntityRequest::new("create"), &ctx).await.pass());
    }

    #[tokio::test]
    async fn test_for_operation_compiles_declarations() {
        let validations: EntityValidations = serde_json::from_value(json!({
            "conditions": {"isPublished": true},
            "inputRules": {
                "title": [
                    {"operations": ["*"], "required": true},
                    {"operations": [["update", ["isPublished"]]], "minLength": 10}
                ]
            }
        }))
        .unwrap();

        let schema = EntitySchema::for_operation("update", &validations).unwrap();
        assert!(schema.conditions().contains_key("isPublished"));
        let validator = EntityValidator::new(schema);
        let request = EntityRequest::new("update").input(json!({"title": "short"}));

        let result = validator.validate(&request, &ValidationContext::new()).await;
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].message_ids, vec!["validation.minLength"]);

        // the caller's registry overrides the schema's
        let ctx = ValidationContext::builder().condition("isPublished", false).build();
        assert!(validator.validate(&request, &ctx).await.pass());
    }

    #[test]
    fn test_for_operation_propagates_schema_errors() {
        let validations = EntityValidations::new().input_rule(
            "title",
            crate::operations::DeclarativeRuleEntry::new()
                .operations(["*"])
                .option("minLength", json!("ten")),
        );
        assert!(matches!(
            EntitySchema::for_operation("create", &validations),
            Err(SchemaError::InvalidOption { .. })
        ));
    }
}
