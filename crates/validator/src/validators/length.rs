//! Length rules
//!
//! Length is measured in Unicode scalar values (chars) for strings and in
//! items for arrays. Any other type is a type mismatch.

use super::{length_of, type_mismatch};
use crate::foundation::{SchemaError, ValidationError};
use serde_json::Value;

const LENGTH_TYPES: &str = "string or array";

fn length_error(id: &str, message: String, expected: (&str, Value), input: &Value) -> ValidationError {
    match length_of(input) {
        Some(len) => ValidationError::new(message)
            .with_message_id(id)
            .with_expected(expected.0, expected.1)
            .with_received(input.clone())
            .with_refined(Value::from(len)),
        None => type_mismatch(LENGTH_TYPES, input),
    }
}

// ============================================================================
// MIN LENGTH
// ============================================================================

crate::rule! {
    /// Length must be at least `min`.
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub MinLength { min: usize };
    rule(self, input) { length_of(input).is_some_and(|len| len >= self.min) }
    error(self, input) {
        length_error(
            "validation.minLength",
            format!("length must be at least {}", self.min),
            ("minLength", Value::from(self.min)),
            input,
        )
    }
    fn min_length(min: usize);
}

// ============================================================================
// MAX LENGTH
// ============================================================================

crate::rule! {
    /// Length must not exceed `max`.
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub MaxLength { max: usize };
    rule(self, input) { length_of(input).is_some_and(|len| len <= self.max) }
    error(self, input) {
        length_error(
            "validation.maxLength",
            format!("length must be at most {}", self.max),
            ("maxLength", Value::from(self.max)),
            input,
        )
    }
    fn max_length(max: usize);
}

// ============================================================================
// EXACT LENGTH
// ============================================================================

crate::rule! {
    /// Length must equal `length`.
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub ExactLength { length: usize };
    rule(self, input) { length_of(input) == Some(self.length) }
    error(self, input) {
        length_error(
            "validation.exactLength",
            format!("length must be exactly {}", self.length),
            ("length", Value::from(self.length)),
            input,
        )
    }
    fn exact_length(length: usize);
}

// ============================================================================
// LENGTH RANGE
// ============================================================================

crate::rule! {
    /// Length must be within `min..=max`.
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub LengthRange { min: usize, max: usize };
    rule(self, input) { length_of(input).is_some_and(|len| (self.min..=self.max).contains(&len)) }
    error(self, input) {
        length_error(
            "validation.lengthRange",
            format!("length must be between {} and {}", self.min, self.max),
            ("lengthRange", serde_json::json!([self.min, self.max])),
            input,
        )
    }
    new(min: usize, max: usize) -> SchemaError {
        if min > max {
            return Err(SchemaError::InvalidRange {
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        Ok(Self { min, max })
    }
    fn length_range(min: usize, max: usize) -> SchemaError;
}
