//! JSON type rule

use super::{is_whole_number, type_name};
use crate::foundation::{SchemaError, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// JSON data types a value can be required to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// A JSON string.
    String,
    /// Any JSON number.
    Number,
    /// A number without fractional part.
    Integer,
    /// `true` or `false`.
    Boolean,
    /// A JSON array.
    Array,
    /// A JSON object.
    Object,
}

impl DataType {
    /// All type names, in declaration order.
    pub const NAMES: &'static [&'static str] =
        &["string", "number", "integer", "boolean", "array", "object"];

    /// Whether `value` has this type.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_number() && is_whole_number(value),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }

    /// Lowercase name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "integer" => Ok(Self::Integer),
            "boolean" => Ok(Self::Boolean),
            "array" => Ok(Self::Array),
            "object" => Ok(Self::Object),
            other => Err(SchemaError::invalid_option(
                "datatype",
                format!("unknown type '{other}', expected one of: {}", Self::NAMES.join(", ")),
            )),
        }
    }
}

crate::rule! {
    /// The value must have the JSON type `kind`.
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub TypeOf { kind: DataType };
    rule(self, input) { self.kind.matches(input) }
    error(self, input) {
        ValidationError::new(format!("expected {}, received {}", self.kind, type_name(input)))
            .with_message_id("validation.datatype")
            .with_expected("datatype", Value::String(self.kind.to_string()))
            .with_received(input.clone())
    }
    fn datatype(kind: DataType);
}
