//! Error and result types for validation
//!
//! This module provides the structured, path-qualified error type produced
//! by every rule, the aggregated [`ValidationResult`] handed back to callers,
//! and [`SchemaError`] for caller-side misuse of the schema API.
//!
//! Validation failures are always *values*. The only `Err` the engine
//! returns is a [`SchemaError`], and only for programmer errors such as an
//! unknown target name.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Boxed error returned by rule checks and condition predicates.
///
/// The core validator recovers these into a failing [`ValidationResult`];
/// condition evaluation degrades them to `false`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// What a rule expected to see: a constraint name and its parameter.
///
/// Example: `Expected { name: "minLength", value: 3 }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expected {
    /// Constraint name, e.g. `"minLength"` or `"type"`.
    pub name: String,
    /// Constraint parameter.
    pub value: Value,
}

/// What a rule actually received.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Received {
    /// The raw value that failed.
    pub value: Value,
    /// A derived measurement of the value (its length, its JSON type, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refined: Option<Value>,
}

/// A structured validation error.
///
/// Paths are ordered outermost to innermost: `["body", "user", "email"]`.
///
/// # Examples
///
/// ```rust
/// use gatekeep_validator::foundation::ValidationError;
/// use serde_json::json;
///
/// let error = ValidationError::new("Must be at least 3 characters")
///     .with_message_id("validation.minLength")
///     .with_expected("minLength", json!(3))
///     .with_received(json!("hi"))
///     .with_refined(json!(2))
///     .at("username");
///
/// assert_eq!(error.path, vec!["username".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Human-readable message in English.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Message identifiers for i18n lookup, most specific last.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub message_ids: Vec<String>,

    /// Field path, outermost first.
    pub path: Vec<String>,

    /// The constraint that was violated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<Expected>,

    /// The offending value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<Received>,

    /// Name of the value bag the error belongs to (`"body"`, `"actor"`, ...).
    ///
    /// Set by the target validators; `None` for standalone rule results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl ValidationError {
    /// Creates an error with a message and an empty path.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Creates an error carrying only a message id.
    pub fn with_id(message_id: impl Into<String>) -> Self {
        Self {
            message_ids: vec![message_id.into()],
            ..Self::default()
        }
    }

    /// Replaces the message.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Appends a message id.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_ids.push(message_id.into());
        self
    }

    /// Sets the violated constraint.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_expected(mut self, name: impl Into<String>, value: Value) -> Self {
        self.expected = Some(Expected {
            name: name.into(),
            value,
        });
        self
    }

    /// Sets the received value.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_received(mut self, value: Value) -> Self {
        self.received = Some(Received {
            value,
            refined: None,
        });
        self
    }

    /// Attaches a refined measurement to the received value.
    ///
    /// Creates a `received` entry holding `null` if none was set.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_refined(mut self, refined: Value) -> Self {
        match &mut self.received {
            Some(received) => received.refined = Some(refined),
            None => {
                self.received = Some(Received {
                    value: Value::Null,
                    refined: Some(refined),
                });
            }
        }
        self
    }

    /// Sets the target bag name.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Prepends one segment to the path.
    #[must_use = "builder methods must be chained or built"]
    pub fn at(mut self, segment: impl Into<String>) -> Self {
        self.path.insert(0, segment.into());
        self
    }

    /// Prepends several segments to the path, keeping their order.
    #[must_use = "builder methods must be chained or built"]
    pub fn prefixed<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut path: Vec<String> = segments.into_iter().map(Into::into).collect();
        path.append(&mut self.path);
        self.path = path;
        self
    }

    /// Path joined with `.`, for display.
    #[must_use]
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }

    /// Returns the expected constraint name, if any.
    #[must_use]
    pub fn expected_name(&self) -> Option<&str> {
        self.expected.as_ref().map(|e| e.name.as_str())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.path.is_empty() {
            write!(f, "[{}] ", self.dotted_path())?;
        }
        match (&self.message, self.message_ids.last()) {
            (Some(message), _) => write!(f, "{message}")?,
            (None, Some(id)) => write!(f, "{id}")?,
            (None, None) => write!(f, "validation failed")?,
        }
        if let Some(expected) = &self.expected {
            write!(f, " (expected {}={})", expected.name, expected.value)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// VALIDATION RESULT
// ============================================================================

/// Aggregated outcome of a validation pass.
///
/// `pass` is derived from the error list at construction, so
/// `pass == errors.is_empty()` always holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pass: bool,
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// A passing result.
    #[must_use]
    pub fn success() -> Self {
        Self {
            pass: true,
            errors: Vec::new(),
        }
    }

    /// A result with the given errors; passes only when `errors` is empty.
    #[must_use]
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            pass: errors.is_empty(),
            errors,
        }
    }

    /// A failing result holding a single error.
    #[must_use]
    pub fn failure(error: ValidationError) -> Self {
        Self::from_errors(vec![error])
    }

    /// Whether validation passed.
    #[must_use]
    pub fn pass(&self) -> bool {
        self.pass
    }

    /// The collected errors, in the order they were produced.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Consumes the result and returns its errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Appends another result's errors after this one's.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.pass = self.errors.is_empty();
    }

    /// Rewrites every error in place, e.g. to prefix paths.
    #[must_use]
    pub fn map_errors<F>(self, f: F) -> Self
    where
        F: FnMut(ValidationError) -> ValidationError,
    {
        Self::from_errors(self.errors.into_iter().map(f).collect())
    }

    /// Converts to a `Result`, keeping all errors on failure.
    pub fn into_result(self) -> Result<(), Vec<ValidationError>> {
        if self.pass { Ok(()) } else { Err(self.errors) }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::success()
    }
}

impl From<ValidationError> for ValidationResult {
    fn from(error: ValidationError) -> Self {
        Self::failure(error)
    }
}

impl FromIterator<ValidationError> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        Self::from_errors(iter.into_iter().collect())
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pass {
            return write!(f, "validation passed");
        }
        writeln!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

// ============================================================================
// SCHEMA ERROR
// ============================================================================

/// Caller-side misuse of the schema API.
///
/// These are programming errors, not data-validation failures: they surface
/// when a schema is being assembled, never while a value is being validated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// A target name that the schema family does not know.
    #[error("unknown target '{target}', expected one of: {}", expected.join(", "))]
    UnknownTarget {
        /// The name that was passed in.
        target: String,
        /// The names the schema family accepts.
        expected: Vec<&'static str>,
    },

    /// A declarative option whose value has the wrong shape.
    #[error("invalid value for declarative option '{option}': {reason}")]
    InvalidOption {
        /// Option key, e.g. `minLength`.
        option: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A range constructor received `min > max`.
    #[error("invalid range: min ({min}) must be <= max ({max})")]
    InvalidRange {
        /// Lower bound as given.
        min: String,
        /// Upper bound as given.
        max: String,
    },

    /// A pattern that does not compile.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The regular expression source.
        pattern: String,
        /// Compiler message.
        reason: String,
    },
}

impl SchemaError {
    /// Creates an [`SchemaError::InvalidOption`].
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_invariant() {
        assert!(ValidationResult::success().pass());
        assert!(ValidationResult::from_errors(Vec::new()).pass());
        assert!(!ValidationResult::failure(ValidationError::new("x")).pass());
    }

    #[test]
    fn test_merge_keeps_order() {
        let mut result = ValidationResult::failure(ValidationError::new("first"));
        result.merge(ValidationResult::success());
        result.merge(ValidationResult::failure(ValidationError::new("second")));

        assert!(!result.pass());
        let messages: Vec<_> = result
            .errors()
            .iter()
            .filter_map(|e| e.message.as_deref())
            .collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn test_path_prefixing() {
        let error = ValidationError::new("bad")
            .at("street")
            .prefixed(["body", "address"]);
        assert_eq!(error.path, vec!["body", "address", "street"]);
        assert_eq!(error.dotted_path(), "body.address.street");
    }

    #[test]
    fn test_refined_without_received() {
        let error = ValidationError::new("bad").with_refined(json!(2));
        let received = error.received.unwrap();
        assert_eq!(received.value, Value::Null);
        assert_eq!(received.refined, Some(json!(2)));
    }

    #[test]
    fn test_serialize_camel_case() {
        let error = ValidationError::new("too short")
            .with_message_id("validation.minLength")
            .with_expected("minLength", json!(3))
            .at("name");
        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(
            value,
            json!({
                "message": "too short",
                "messageIds": ["validation.minLength"],
                "path": ["name"],
                "expected": {"name": "minLength", "value": 3},
            })
        );
    }

    #[test]
    fn test_serialize_result() {
        let value = serde_json::to_value(ValidationResult::success()).unwrap();
        assert_eq!(value, json!({"pass": true, "errors": []}));
    }

    #[test]
    fn test_display() {
        let error = ValidationError::new("Required").at("email");
        assert_eq!(error.to_string(), "[email] Required");
        assert_eq!(
            ValidationError::with_id("validation.required").to_string(),
            "validation.required"
        );
    }

    #[test]
    fn test_unknown_target_message() {
        let err = SchemaError::UnknownTarget {
            target: "session".into(),
            expected: vec!["actor", "input", "record"],
        };
        assert_eq!(
            err.to_string(),
            "unknown target 'session', expected one of: actor, input, record"
        );
    }
}
