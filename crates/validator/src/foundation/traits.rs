//! Core traits for the validation system
//!
//! [`Rule`] is the unit of validation logic. [`ValidationRule`] wraps a rule
//! with the metadata the engine consults around it: message overrides and
//! the conditions that gate it.

use crate::foundation::condition::{Condition, ConditionsSpec, Scope};
use crate::foundation::context::ValidationContext;
use crate::foundation::error::{BoxError, ValidationError, ValidationResult};
use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

// ============================================================================
// RULE TRAIT
// ============================================================================

/// The trait every rule implements.
///
/// A rule reports data problems as a failing [`ValidationResult`]. An `Err`
/// means the rule itself broke; the core validator turns it into a single
/// failing error so callers never see it.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use gatekeep_validator::foundation::{
///     BoxError, Rule, ValidationContext, ValidationError, ValidationResult,
/// };
/// use serde_json::Value;
///
/// struct NotAdmin;
///
/// #[async_trait]
/// impl Rule for NotAdmin {
///     async fn validate(
///         &self,
///         value: &Value,
///         _ctx: &ValidationContext,
///     ) -> Result<ValidationResult, BoxError> {
///         if value == "admin" {
///             Ok(ValidationError::new("reserved name").into())
///         } else {
///             Ok(ValidationResult::success())
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Rule: Send + Sync {
    /// Checks `value`.
    async fn validate(
        &self,
        value: &Value,
        ctx: &ValidationContext,
    ) -> Result<ValidationResult, BoxError>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Future returned by closure rules.
pub type RuleFuture = BoxFuture<'static, Result<ValidationResult, BoxError>>;

/// Rule backed by a closure; see [`ValidationRule::from_fn`].
pub struct FnRule<F> {
    name: String,
    f: F,
}

#[async_trait]
impl<F> Rule for FnRule<F>
where
    F: Fn(&Value, &ValidationContext) -> RuleFuture + Send + Sync,
{
    async fn validate(
        &self,
        value: &Value,
        ctx: &ValidationContext,
    ) -> Result<ValidationResult, BoxError> {
        (self.f)(value, ctx).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// CHECK TRAIT
// ============================================================================

/// Synchronous, context-free rule logic.
///
/// Every `Check` is a [`Rule`]. `null` (an absent value) passes without
/// calling [`Check::check`] unless [`Check::CHECKS_NULL`] is set, so only
/// presence rules such as `required` see it.
///
/// Most checks are generated with [`crate::rule!`].
pub trait Check: Send + Sync {
    /// Name reported in logs.
    const NAME: &'static str;

    /// Whether `null` is handed to [`Check::check`].
    const CHECKS_NULL: bool = false;

    /// Checks `input`, returning the single error on failure.
    fn check(&self, input: &Value) -> Result<(), ValidationError>;
}

#[async_trait]
impl<T: Check> Rule for T {
    async fn validate(
        &self,
        value: &Value,
        _ctx: &ValidationContext,
    ) -> Result<ValidationResult, BoxError> {
        if value.is_null() && !T::CHECKS_NULL {
            return Ok(ValidationResult::success());
        }
        Ok(match self.check(value) {
            Ok(()) => ValidationResult::success(),
            Err(error) => ValidationResult::failure(error),
        })
    }

    fn name(&self) -> &str {
        T::NAME
    }
}

// ============================================================================
// VALIDATION RULE
// ============================================================================

/// A rule plus the metadata the engine applies around it.
///
/// When both `condition` and `conditions` are set, `conditions` decides.
/// `message` replaces the message of every error the rule returns and
/// `message_id` is appended to their message ids.
#[derive(Clone)]
pub struct ValidationRule {
    inner: Arc<dyn Rule>,
    /// Message override for every failure of this rule.
    pub message: Option<String>,
    /// Message id added to every failure of this rule.
    pub message_id: Option<String>,
    /// Single gating condition.
    pub condition: Option<Condition>,
    /// Quantified gating conditions.
    pub conditions: Option<ConditionsSpec>,
}

impl ValidationRule {
    /// Wraps a rule with no gating and no overrides.
    pub fn new(rule: impl Rule + 'static) -> Self {
        Self::from_arc(Arc::new(rule))
    }

    /// Wraps an already-shared rule.
    pub fn from_arc(inner: Arc<dyn Rule>) -> Self {
        Self {
            inner,
            message: None,
            message_id: None,
            condition: None,
            conditions: None,
        }
    }

    /// Builds a rule from an async closure.
    ///
    /// The closure must return a `'static` future, so clone what it needs:
    ///
    /// ```rust
    /// use gatekeep_validator::foundation::{
    ///     BoxError, ValidationError, ValidationResult, ValidationRule,
    /// };
    ///
    /// let even = ValidationRule::from_fn("even", |value, _ctx| {
    ///     let n = value.as_i64();
    ///     async move {
    ///         Ok::<_, BoxError>(match n {
    ///             Some(n) if n % 2 != 0 => ValidationError::new("must be even").into(),
    ///             _ => ValidationResult::success(),
    ///         })
    ///     }
    /// });
    /// # let _ = even;
    /// ```
    pub fn from_fn<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &ValidationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ValidationResult, BoxError>> + Send + 'static,
    {
        use futures::FutureExt;
        Self::new(FnRule {
            name: name.into(),
            f: move |value: &Value, ctx: &ValidationContext| -> RuleFuture {
                f(value, ctx).boxed()
            },
        })
    }

    /// The wrapped rule.
    #[must_use]
    pub fn rule(&self) -> &dyn Rule {
        &*self.inner
    }

    /// Name of the wrapped rule.
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Whether any gating condition is attached.
    #[must_use]
    pub fn is_gated(&self) -> bool {
        self.condition.is_some() || self.conditions.is_some()
    }

    /// Sets the message override.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the message id added to failures.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    /// Gates the rule on a single condition.
    #[must_use = "builder methods must be chained or built"]
    pub fn when(mut self, condition: impl Into<Condition>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Gates the rule on quantified conditions.
    #[must_use = "builder methods must be chained or built"]
    pub fn when_spec(mut self, conditions: ConditionsSpec) -> Self {
        self.conditions = Some(conditions);
        self
    }

    /// Gates the rule on every condition holding.
    #[must_use = "builder methods must be chained or built"]
    pub fn when_all<I, C>(self, conditions: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        self.when_spec(ConditionsSpec::new(conditions, Scope::All))
    }

    /// Gates the rule on at least one condition holding.
    #[must_use = "builder methods must be chained or built"]
    pub fn when_any<I, C>(self, conditions: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        self.when_spec(ConditionsSpec::new(conditions, Scope::Any))
    }

    /// Gates the rule on no condition holding.
    #[must_use = "builder methods must be chained or built"]
    pub fn when_none<I, C>(self, conditions: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        self.when_spec(ConditionsSpec::new(conditions, Scope::None))
    }

    /// Runs the wrapped rule and applies the message overrides.
    ///
    /// No gating and no error recovery happen here; see
    /// [`crate::foundation::validate`] and
    /// [`crate::foundation::validate_conditional`].
    pub async fn check(
        &self,
        value: &Value,
        ctx: &ValidationContext,
    ) -> Result<ValidationResult, BoxError> {
        let result = self.inner.validate(value, ctx).await?;
        if result.pass() || (self.message.is_none() && self.message_id.is_none()) {
            return Ok(result);
        }
        Ok(result.map_errors(|mut error| {
            if let Some(message) = &self.message {
                error.message = Some(message.clone());
            }
            if let Some(id) = &self.message_id {
                error.message_ids.push(id.clone());
            }
            error
        }))
    }
}

impl<R: Rule + 'static> From<R> for ValidationRule {
    fn from(rule: R) -> Self {
        Self::new(rule)
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("rule", &self.name())
            .field("message", &self.message)
            .field("message_id", &self.message_id)
            .field("condition", &self.condition)
            .field("conditions", &self.conditions)
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct AlwaysFails;

    #[async_trait]
    impl Rule for AlwaysFails {
        async fn validate(
            &self,
            _value: &Value,
            _ctx: &ValidationContext,
        ) -> Result<ValidationResult, BoxError> {
            Ok(ValidationError::new("nope")
                .with_message_id("validation.nope")
                .into())
        }
    }

    #[tokio::test]
    async fn test_message_overrides() {
        let rule = ValidationRule::new(AlwaysFails)
            .with_message("custom")
            .with_message_id("app.custom");
        let result = rule.check(&json!(1), &ValidationContext::new()).await.unwrap();

        let error = &result.errors()[0];
        assert_eq!(error.message.as_deref(), Some("custom"));
        assert_eq!(error.message_ids, vec!["validation.nope", "app.custom"]);
    }

    #[tokio::test]
    async fn test_from_fn() {
        let rule = ValidationRule::from_fn("positive", |value, _| {
            let ok = value.as_i64().is_some_and(|n| n > 0);
            async move {
                Ok::<_, BoxError>(if ok {
                    ValidationResult::success()
                } else {
                    ValidationError::new("not positive").into()
                })
            }
        });
        let ctx = ValidationContext::new();
        assert_eq!(rule.name(), "positive");
        assert!(rule.check(&json!(3), &ctx).await.unwrap().pass());
        assert!(!rule.check(&json!(-3), &ctx).await.unwrap().pass());
    }

    struct NoAdmins;

    impl Check for NoAdmins {
        const NAME: &'static str = "no_admins";

        fn check(&self, input: &Value) -> Result<(), ValidationError> {
            if input == "admin" {
                Err(ValidationError::with_id("validation.noAdmins"))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_check_skips_null() {
        let ctx = ValidationContext::new();
        assert_eq!(NoAdmins.name(), "no_admins");
        assert!(NoAdmins.validate(&Value::Null, &ctx).await.unwrap().pass());
        assert!(NoAdmins.validate(&json!("bob"), &ctx).await.unwrap().pass());
        assert!(!NoAdmins.validate(&json!("admin"), &ctx).await.unwrap().pass());
    }

    #[test]
    fn test_gating_builders() {
        let rule = ValidationRule::new(AlwaysFails).when("isDraft");
        assert!(rule.is_gated());
        assert!(rule.conditions.is_none());

        let rule = ValidationRule::new(AlwaysFails).when_none(["a", "b"]);
        let spec = rule.conditions.unwrap();
        assert_eq!(spec.scope, Scope::None);
        assert_eq!(spec.list.len(), 2);
    }
}
