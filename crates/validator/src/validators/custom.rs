//! Ad hoc rules from closures
//!
//! For rules that need the context or must await something, use
//! [`ValidationRule::from_fn`] instead.

use crate::foundation::{
    BoxError, Rule, ValidationContext, ValidationError, ValidationResult, ValidationRule,
};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// Rule backed by a synchronous predicate; see [`custom`].
pub struct Custom<F> {
    name: String,
    predicate: F,
}

impl<F> fmt::Debug for Custom<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Custom").field("name", &self.name).finish_non_exhaustive()
    }
}

#[async_trait]
impl<F> Rule for Custom<F>
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    async fn validate(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
    ) -> Result<ValidationResult, BoxError> {
        if value.is_null() || (self.predicate)(value) {
            return Ok(ValidationResult::success());
        }
        Ok(ValidationError::new(format!("failed check '{}'", self.name))
            .with_message_id("validation.custom")
            .with_expected(self.name.clone(), Value::Bool(true))
            .with_received(value.clone())
            .into())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Creates a rule that fails when `predicate` returns `false`.
///
/// The name appears in the message and as the expected constraint.
///
/// ```rust
/// use gatekeep_validator::validators::custom;
///
/// let even = custom("even", |v| v.as_i64().is_some_and(|n| n % 2 == 0))
///     .with_message("must be even");
/// # let _ = even;
/// ```
pub fn custom<F>(name: impl Into<String>, predicate: F) -> ValidationRule
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    ValidationRule::new(Custom {
        name: name.into(),
        predicate,
    })
}
