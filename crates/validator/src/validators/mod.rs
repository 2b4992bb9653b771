//! Built-in rules
//!
//! Ready-to-use rules over `serde_json::Value`. Every constructor returns a
//! [`ValidationRule`](crate::foundation::ValidationRule), so gating and
//! message overrides chain directly onto it.
//!
//! # Categories
//!
//! - **Presence**: [`required`], [`not_empty`]
//! - **Length** (strings count chars, arrays count items): [`min_length`],
//!   [`max_length`], [`exact_length`], [`length_range`]
//! - **String**: [`pattern`]
//! - **Membership**: [`one_of`], [`not_one_of`]
//! - **Numeric**: [`min`], [`max`], [`in_range`], [`integer`], [`positive`]
//! - **Type**: [`datatype`]
//! - **Ad hoc**: [`custom`]
//!
//! Every rule except [`required`] passes on `null`, so an absent optional
//! field is never reported by a constraint rule. A value of the wrong type
//! fails with a `validation.type` error naming the expected type.
//!
//! # Examples
//!
//! ```rust
//! use gatekeep_validator::validators::{in_range, min_length, required};
//!
//! let title = min_length(3).when("isPublished");
//! let age = in_range(18.0, 130.0).expect("valid range");
//! let id = required().with_message("an id is mandatory");
//! # let _ = (title, age, id);
//! ```

pub mod custom;
pub mod datatype;
pub mod length;
pub mod membership;
pub mod nullable;
pub mod pattern;
pub mod properties;
pub mod range;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use custom::custom;
pub use datatype::{DataType, TypeOf, datatype};
pub use length::{
    ExactLength, LengthRange, MaxLength, MinLength, exact_length, length_range, max_length,
    min_length,
};
pub use membership::{NotOneOf, OneOf, not_one_of, one_of};
pub use nullable::{NotEmpty, Required, not_empty, required};
pub use pattern::{Pattern, pattern};
pub use properties::{Integer, Positive, integer, positive};
pub use range::{InRange, Max, Min, in_range, max, min};

// ============================================================================
// SHARED HELPERS
// ============================================================================

use crate::foundation::ValidationError;
use serde_json::{Number, Value};

/// Message id of type-mismatch failures.
pub const TYPE_MISMATCH_ID: &str = "validation.type";

/// Length of a string (in chars) or an array (in items).
pub(crate) fn length_of(input: &Value) -> Option<usize> {
    match input {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Whether a number has no fractional part.
#[allow(clippy::float_cmp)]
pub(crate) fn is_whole_number(input: &Value) -> bool {
    input.is_i64() || input.is_u64() || input.as_f64().is_some_and(|n| n.fract() == 0.0)
}

/// JSON type name of a value, as used in messages.
pub(crate) const fn type_name(input: &Value) -> &'static str {
    match input {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Error for a value of the wrong JSON type.
pub(crate) fn type_mismatch(expected: &str, input: &Value) -> ValidationError {
    ValidationError::new(format!(
        "expected {expected}, received {}",
        type_name(input)
    ))
    .with_message_id(TYPE_MISMATCH_ID)
    .with_expected("type", Value::String(expected.to_owned()))
    .with_received(input.clone())
}

/// Renders a numeric bound as JSON, keeping whole numbers integral.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
pub(crate) fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(Value::Null, Value::Number)
}
