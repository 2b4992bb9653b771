//! Target validator
//!
//! Applies a [`TargetSchema`] to the raw value bags of one call.

use crate::foundation::{ValidationContext, ValidationResult, validate};
use crate::schema::target::{Target, TargetRequest, TargetSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

// ============================================================================
// OPTIONS
// ============================================================================

/// Options of a [`TargetValidator`].
///
/// Deserializable with defaults, so hosts can load it from their own config:
///
/// ```rust
/// use gatekeep_validator::schema::ValidationOptions;
///
/// let options: ValidationOptions = serde_json::from_str("{}").unwrap();
/// assert!(options.collect_errors);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationOptions {
    /// Validate every field of every target (`true`, the default) or stop at
    /// the first failing field.
    pub collect_errors: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            collect_errors: true,
        }
    }
}

impl ValidationOptions {
    /// Stop at the first failing field.
    #[must_use]
    pub const fn fail_fast() -> Self {
        Self {
            collect_errors: false,
        }
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

/// Validates requests against one shared schema.
///
/// Cheap to clone; one validator may serve concurrent calls.
#[derive(Debug, Clone)]
pub struct TargetValidator<T: Target> {
    schema: Arc<TargetSchema<T>>,
    options: ValidationOptions,
}

impl<T: Target> TargetValidator<T> {
    /// Creates a validator with default options.
    #[must_use]
    pub fn new(schema: TargetSchema<T>) -> Self {
        Self::from_shared(Arc::new(schema))
    }

    /// Creates a validator over an already-shared schema.
    #[must_use]
    pub fn from_shared(schema: Arc<TargetSchema<T>>) -> Self {
        Self {
            schema,
            options: ValidationOptions::default(),
        }
    }

    /// Replaces the options.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// The schema.
    #[must_use]
    pub fn schema(&self) -> &TargetSchema<T> {
        &self.schema
    }

    /// The options.
    #[must_use]
    pub const fn options(&self) -> ValidationOptions {
        self.options
    }

    /// Validates `request`.
    ///
    /// - A schema that does not apply to the request's selector passes
    ///   without looking at any value.
    /// - Rules see a snapshot of `ctx` that also carries the raw bags and the
    ///   schema's named conditions; conditions of `ctx` win on name clashes.
    /// - Fields run in declaration order through the core
    ///   [`validate`](crate::foundation::validate); each error is prefixed
    ///   with `[target, field]` and tagged with its target.
    pub async fn validate<R>(&self, request: &R, ctx: &ValidationContext) -> ValidationResult
    where
        R: TargetRequest<T> + ?Sized,
    {
        let selector = request.selector();
        if !self.schema.applies(selector) {
            tracing::debug!(selector = ?selector, "schema does not apply, skipping validation");
            return ValidationResult::success();
        }

        let snapshot = self.snapshot(request, ctx);
        let mut result = ValidationResult::success();

        for (target, fields) in self.schema.targets() {
            let bag = request.values(*target);
            for (field, rule) in fields {
                let value = bag.and_then(|b| target.lookup(b, field)).unwrap_or(&Value::Null);
                tracing::trace!(bag = %target, field = %field, rule = rule.name(), "validating field");

                let outcome = validate(value, rule, &snapshot).await;
                if outcome.pass() {
                    continue;
                }

                let name = target.as_str();
                result.merge(outcome.map_errors(|error| {
                    error.prefixed([name, field.as_str()]).with_target(name)
                }));
                if !self.options.collect_errors {
                    return result;
                }
            }
        }

        result
    }

    fn snapshot<R>(&self, request: &R, ctx: &ValidationContext) -> ValidationContext
    where
        R: TargetRequest<T> + ?Sized,
    {
        let mut builder = ctx.to_builder();
        for target in T::ALL {
            if let Some(values) = request.values(*target) {
                builder = builder.target(target.as_str(), values.clone());
            }
        }
        builder.default_conditions(self.schema.conditions()).build()
    }
}
