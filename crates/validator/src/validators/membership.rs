//! Membership rules
//!
//! Values are compared with JSON equality, so `1` and `1.0` differ.

use crate::foundation::ValidationError;
use serde_json::Value;

crate::rule! {
    /// The value must be one of `allowed`.
    pub OneOf { allowed: Vec<Value> };
    rule(self, input) { self.allowed.contains(input) }
    error(self, input) {
        ValidationError::new("must be one of the allowed values")
            .with_message_id("validation.oneOf")
            .with_expected("oneOf", Value::Array(self.allowed.clone()))
            .with_received(input.clone())
    }
    new(allowed: impl IntoIterator<Item = Value>) {
        Self { allowed: allowed.into_iter().collect() }
    }
    fn one_of(allowed: impl IntoIterator<Item = Value>);
}

crate::rule! {
    /// The value must not be one of `denied`.
    pub NotOneOf { denied: Vec<Value> };
    rule(self, input) { !self.denied.contains(input) }
    error(self, input) {
        ValidationError::new("must not be one of the denied values")
            .with_message_id("validation.notOneOf")
            .with_expected("notOneOf", Value::Array(self.denied.clone()))
            .with_received(input.clone())
    }
    new(denied: impl IntoIterator<Item = Value>) {
        Self { denied: denied.into_iter().collect() }
    }
    fn not_one_of(denied: impl IntoIterator<Item = Value>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::Check;
    use serde_json::json;

    #[test]
    fn test_one_of() {
        let rule = OneOf::new([json!("draft"), json!("published")]);
        assert!(rule.check(&json!("draft")).is_ok());

        let err = rule.check(&json!("archived")).unwrap_err();
        assert_eq!(err.message_ids, vec!["validation.oneOf"]);
        assert_eq!(err.expected.unwrap().value, json!(["draft", "published"]));
    }

    #[test]
    fn test_not_one_of() {
        let rule = NotOneOf::new([json!("root"), json!("admin")]);
        assert!(rule.check(&json!("alice")).is_ok());
        assert!(rule.check(&json!("root")).is_err());
    }
}
