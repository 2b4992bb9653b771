//! Presence rules
//!
//! - [`Required`]: the only rule that sees `null`; fails on it.
//! - [`NotEmpty`]: strings, arrays and objects must have content.
//!
//! # Examples
//!
//! ```rust
//! use gatekeep_validator::foundation::{ValidationContext, validate};
//! use gatekeep_validator::validators::required;
//! use serde_json::Value;
//!
//! # futures::executor::block_on(async {
//! let result = validate(&Value::Null, &required(), &ValidationContext::new()).await;
//! assert!(!result.pass());
//! # });
//! ```

use super::type_mismatch;
use crate::foundation::{Check, ValidationError, ValidationRule};
use serde_json::Value;

/// Message id of [`Required`] failures.
pub const REQUIRED_ID: &str = "validation.required";

/// Fails when the value is absent (`null`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Required;

impl Check for Required {
    const NAME: &'static str = "Required";
    const CHECKS_NULL: bool = true;

    fn check(&self, input: &Value) -> Result<(), ValidationError> {
        if input.is_null() {
            Err(ValidationError::new("is required")
                .with_message_id(REQUIRED_ID)
                .with_expected("required", Value::Bool(true))
                .with_received(Value::Null))
        } else {
            Ok(())
        }
    }
}

/// Creates a [`Required`] rule.
#[must_use]
pub fn required() -> ValidationRule {
    ValidationRule::new(Required)
}

crate::rule! {
    /// Fails on empty strings, arrays and objects.
    pub NotEmpty;
    rule(input) {
        match input {
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            _ => false,
        }
    }
    error(input) {
        match input {
            Value::String(_) | Value::Array(_) | Value::Object(_) => {
                ValidationError::new("must not be empty")
                    .with_message_id("validation.notEmpty")
                    .with_expected("notEmpty", Value::Bool(true))
                    .with_received(input.clone())
            }
            _ => type_mismatch("string, array or object", input),
        }
    }
    fn not_empty();
}
