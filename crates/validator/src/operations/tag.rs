//! Operation tags
//!
//! An [`OperationTag`] marks which operations a declarative rule entry
//! applies to. On the wire a tag is one of:
//!
//! | JSON                                  | Tag                                   |
//! |---------------------------------------|---------------------------------------|
//! | `"*"`                                 | [`OperationTag::Wildcard`]            |
//! | `"create"`                            | [`OperationTag::Operation`]           |
//! | `["create", ["isDraft", "isOwner"]]`  | [`OperationTag::Conditional`], `any`  |
//! | `["create", [["isDraft"], "all"]]`    | [`OperationTag::Conditional`], `all`  |
//!
//! A conditional tag whose operation is `"*"` matches every operation.

use crate::foundation::{ConditionsSpec, Scope};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Operation name that matches every operation.
pub const WILDCARD: &str = "*";

// ============================================================================
// CONDITION REF
// ============================================================================

/// Named conditions attached to a conditional operation tag.
///
/// The scope defaults to [`Scope::Any`] when the wire form omits it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ConditionRef {
    /// Condition names, resolved through the validation context.
    pub names: Vec<String>,
    /// How the names combine.
    pub scope: Scope,
}

impl ConditionRef {
    /// Creates a reference from names and a scope.
    pub fn new<I, S>(names: I, scope: Scope) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            scope,
        }
    }

    /// At least one name must hold.
    pub fn any<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names, Scope::Any)
    }

    /// Every name must hold.
    pub fn all<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names, Scope::All)
    }

    /// No name may hold.
    pub fn none<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names, Scope::None)
    }

    /// Converts to a gating spec of named conditions.
    #[must_use]
    pub fn to_spec(&self) -> ConditionsSpec {
        ConditionsSpec::new(self.names.iter().map(String::as_str), self.scope)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ConditionRefRepr {
    One(String),
    Names(Vec<String>),
    Scoped(Vec<String>, Scope),
    Object {
        list: Vec<String>,
        #[serde(default)]
        scope: Scope,
    },
}

impl<'de> Deserialize<'de> for ConditionRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match ConditionRefRepr::deserialize(deserializer)? {
            ConditionRefRepr::One(name) => Self::any([name]),
            ConditionRefRepr::Names(names) => Self::any(names),
            ConditionRefRepr::Scoped(names, scope) => Self::new(names, scope),
            ConditionRefRepr::Object { list, scope } => Self::new(list, scope),
        })
    }
}

impl Serialize for ConditionRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.scope == Scope::Any {
            return self.names.serialize(serializer);
        }
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.names)?;
        tuple.serialize_element(&self.scope)?;
        tuple.end()
    }
}

// ============================================================================
// OPERATION TAG
// ============================================================================

/// Which operation(s) a declarative rule entry applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperationTag {
    /// Every operation.
    Wildcard,
    /// One named operation.
    Operation(String),
    /// One named operation (or `"*"`), gated on named conditions.
    Conditional {
        /// Operation name, or `"*"`.
        operation: String,
        /// Conditions attached to the entry when this tag matches.
        conditions: ConditionRef,
    },
}

impl OperationTag {
    /// Tag for a named operation; `"*"` yields [`OperationTag::Wildcard`].
    pub fn operation(name: impl Into<String>) -> Self {
        let name = name.into();
        if name == WILDCARD {
            Self::Wildcard
        } else {
            Self::Operation(name)
        }
    }

    /// Conditional tag.
    pub fn conditional(operation: impl Into<String>, conditions: ConditionRef) -> Self {
        Self::Conditional {
            operation: operation.into(),
            conditions,
        }
    }

    /// Whether the tag applies to `operation`.
    #[must_use]
    pub fn matches(&self, operation: &str) -> bool {
        match self {
            Self::Wildcard => true,
            Self::Operation(name) => name == operation,
            Self::Conditional {
                operation: name, ..
            } => name == WILDCARD || name == operation,
        }
    }

    /// Conditions carried by a conditional tag.
    #[must_use]
    pub fn condition_ref(&self) -> Option<&ConditionRef> {
        match self {
            Self::Conditional { conditions, .. } => Some(conditions),
            Self::Wildcard | Self::Operation(_) => None,
        }
    }
}

impl From<&str> for OperationTag {
    fn from(name: &str) -> Self {
        Self::operation(name)
    }
}

impl From<String> for OperationTag {
    fn from(name: String) -> Self {
        Self::operation(name)
    }
}

impl fmt::Display for OperationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wildcard => f.write_str(WILDCARD),
            Self::Operation(name) => f.write_str(name),
            Self::Conditional {
                operation,
                conditions,
            } => write!(
                f,
                "{operation} when {} [{}]",
                conditions.scope,
                conditions.names.join(", ")
            ),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OperationTagRepr {
    Plain(String),
    Conditional(String, ConditionRef),
}

impl<'de> Deserialize<'de> for OperationTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match OperationTagRepr::deserialize(deserializer)? {
            OperationTagRepr::Plain(name) => Self::operation(name),
            OperationTagRepr::Conditional(operation, conditions) => Self::Conditional {
                operation,
                conditions,
            },
        })
    }
}

impl Serialize for OperationTag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Wildcard => serializer.serialize_str(WILDCARD),
            Self::Operation(name) => serializer.serialize_str(name),
            Self::Conditional {
                operation,
                conditions,
            } => {
                let mut tuple = serializer.serialize_tuple(2)?;
                tuple.serialize_element(operation)?;
                tuple.serialize_element(conditions)?;
                tuple.end()
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
