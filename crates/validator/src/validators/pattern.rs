//! Regular-expression rule

use super::type_mismatch;
use crate::foundation::{SchemaError, ValidationError};
use regex::Regex;
use serde_json::Value;

crate::rule! {
    /// A string must match the regular expression.
    ///
    /// The pattern is not anchored; use `^...$` to match the whole string.
    pub Pattern { regex: Regex };
    rule(self, input) { input.as_str().is_some_and(|s| self.regex.is_match(s)) }
    error(self, input) {
        if input.is_string() {
            ValidationError::new(format!("must match pattern {}", self.regex.as_str()))
                .with_message_id("validation.pattern")
                .with_expected("pattern", Value::String(self.regex.as_str().to_owned()))
                .with_received(input.clone())
        } else {
            type_mismatch("string", input)
        }
    }
    new(pattern: &str) -> SchemaError {
        Regex::new(pattern)
            .map(|regex| Self { regex })
            .map_err(|e| SchemaError::InvalidPattern {
                pattern: pattern.to_owned(),
                reason: e.to_string(),
            })
    }
    fn pattern(pattern: &str) -> SchemaError;
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Self { regex }
    }
}
