//! Numeric range rules
//!
//! Bounds are inclusive and compared as `f64`. Non-numbers are a type
//! mismatch.

use super::{number_value, type_mismatch};
use crate::foundation::{SchemaError, ValidationError};
use serde_json::Value;

fn range_error(id: &str, message: String, expected: (&str, Value), input: &Value) -> ValidationError {
    if input.is_number() {
        ValidationError::new(message)
            .with_message_id(id)
            .with_expected(expected.0, expected.1)
            .with_received(input.clone())
    } else {
        type_mismatch("number", input)
    }
}

// ============================================================================
// MIN
// ============================================================================

crate::rule! {
    /// The number must be `>= min`.
    #[derive(Copy, PartialEq)]
    pub Min { min: f64 };
    rule(self, input) { input.as_f64().is_some_and(|n| n >= self.min) }
    error(self, input) {
        range_error(
            "validation.min",
            format!("must be at least {}", number_value(self.min)),
            ("min", number_value(self.min)),
            input,
        )
    }
    fn min(min: f64);
}

// ============================================================================
// MAX
// ============================================================================

crate::rule! {
    /// The number must be `<= max`.
    #[derive(Copy, PartialEq)]
    pub Max { max: f64 };
    rule(self, input) { input.as_f64().is_some_and(|n| n <= self.max) }
    error(self, input) {
        range_error(
            "validation.max",
            format!("must be at most {}", number_value(self.max)),
            ("max", number_value(self.max)),
            input,
        )
    }
    fn max(max: f64);
}

// ============================================================================
// IN RANGE
// ============================================================================

crate::rule! {
    /// The number must be within `min..=max`.
    #[derive(Copy, PartialEq)]
    pub InRange { min: f64, max: f64 };
    rule(self, input) { input.as_f64().is_some_and(|n| n >= self.min && n <= self.max) }
    error(self, input) {
        range_error(
            "validation.inRange",
            format!(
                "must be between {} and {}",
                number_value(self.min),
                number_value(self.max)
            ),
            ("inRange", Value::Array(vec![number_value(self.min), number_value(self.max)])),
            input,
        )
    }
    new(min: f64, max: f64) -> SchemaError {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(SchemaError::InvalidRange {
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        Ok(Self { min, max })
    }
    fn in_range(min: f64, max: f64) -> SchemaError;
}
