//! Numeric property rules

use super::{is_whole_number, type_mismatch};
use crate::foundation::ValidationError;
use serde_json::Value;

crate::rule! {
    /// The number must have no fractional part (`2.0` counts).
    pub Integer;
    rule(input) { input.is_number() && is_whole_number(input) }
    error(input) {
        if input.is_number() {
            ValidationError::new("must be an integer")
                .with_message_id("validation.integer")
                .with_expected("integer", Value::Bool(true))
                .with_received(input.clone())
        } else {
            type_mismatch("number", input)
        }
    }
    fn integer();
}

crate::rule! {
    /// The number must be strictly greater than zero.
    pub Positive;
    rule(input) { input.as_f64().is_some_and(|n| n > 0.0) }
    error(input) {
        if input.is_number() {
            ValidationError::new("must be positive")
                .with_message_id("validation.positive")
                .with_expected("positive", Value::Bool(true))
                .with_received(input.clone())
        } else {
            type_mismatch("number", input)
        }
    }
    fn positive();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::Check;
    use serde_json::json;

    #[test]
    fn test_integer() {
        assert!(Integer.check(&json!(3)).is_ok());
        assert!(Integer.check(&json!(u64::MAX)).is_ok());
        assert!(Integer.check(&json!(2.0)).is_ok());
        assert!(Integer.check(&json!(2.5)).is_err());
        assert_eq!(
            Integer.check(&json!("3")).unwrap_err().message_ids,
            vec!["validation.type"]
        );
    }

    #[test]
    fn test_positive() {
        assert!(Positive.check(&json!(0.1)).is_ok());
        assert!(Positive.check(&json!(0)).is_err());
        assert_eq!(
            Positive.check(&json!(-4)).unwrap_err().message_ids,
            vec!["validation.positive"]
        );
    }
}
