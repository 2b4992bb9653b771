//! Core validator: runs one rule against one value.

use crate::foundation::condition::{evaluate, evaluate_all, panic_message};
use crate::foundation::context::ValidationContext;
use crate::foundation::error::{ValidationError, ValidationResult};
use crate::foundation::traits::ValidationRule;
use futures::FutureExt;
use serde_json::Value;
use std::panic::AssertUnwindSafe;

/// Message id carried by errors recovered from a broken rule.
pub const RULE_EXCEPTION_ID: &str = "validation.ruleException";

/// Runs `rule` against `value`, ignoring its gating conditions.
///
/// Never fails and never panics: a rule that returns `Err` or panics yields a
/// failing result with exactly one error carrying the error's message.
pub async fn validate(value: &Value, rule: &ValidationRule, ctx: &ValidationContext) -> ValidationResult {
    match AssertUnwindSafe(rule.check(value, ctx)).catch_unwind().await {
        Ok(Ok(result)) => result,
        Ok(Err(error)) => {
            tracing::debug!(rule = rule.name(), %error, "rule failed with an error");
            ValidationResult::failure(
                ValidationError::new(error.to_string()).with_message_id(RULE_EXCEPTION_ID),
            )
        }
        Err(payload) => {
            let message = panic_message(&*payload);
            tracing::warn!(rule = rule.name(), panic = %message, "rule panicked");
            ValidationResult::failure(
                ValidationError::new(message).with_message_id(RULE_EXCEPTION_ID),
            )
        }
    }
}

/// Runs `rule` against `value` if its gating conditions hold.
///
/// `conditions` (quantified) takes precedence over `condition`. A closed gate
/// makes the rule inert: the result passes and the rule is not invoked.
pub async fn validate_conditional(
    value: &Value,
    rule: &ValidationRule,
    ctx: &ValidationContext,
) -> ValidationResult {
    let open = if let Some(spec) = &rule.conditions {
        evaluate_all(spec, value, ctx).await
    } else if let Some(condition) = &rule.condition {
        evaluate(condition, value, ctx).await
    } else {
        true
    };

    if open {
        validate(value, rule, ctx).await
    } else {
        tracing::trace!(rule = rule.name(), "gate closed, rule skipped");
        ValidationResult::success()
    }
}
