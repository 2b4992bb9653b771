//! Prelude module for convenient imports.
//!
//! Provides a single `use gatekeep_validator::prelude::*;` import that brings
//! in the commonly needed traits, types, rules and builders.
//!
//! # Examples
//!
//! ```rust
//! use gatekeep_validator::prelude::*;
//!
//! let username = RuleAggregator::new()
//!     .add(required())
//!     .add(length_range(3, 20).expect("valid range"))
//!     .composite();
//! let age = in_range(18.0, 130.0).expect("valid range").when("isAdult");
//! # let _ = (username, age);
//! ```

// ============================================================================
// FOUNDATION: Core traits, results, conditions, context
// ============================================================================

pub use crate::foundation::{
    BoxError, Check, Condition, ConditionEntry, ConditionResolver, ConditionsSpec, Rule, Scope,
    SchemaError, ValidationContext, ValidationError, ValidationResult, ValidationRule, evaluate,
    evaluate_all, resolver_fn, validate, validate_conditional,
};

// ============================================================================
// VALIDATORS: All built-in rules
// ============================================================================

pub use crate::validators::{
    DataType, custom, datatype, exact_length, in_range, integer, length_range, max, max_length,
    min, min_length, not_empty, not_one_of, one_of, pattern, positive, required,
};

// ============================================================================
// COMBINATORS
// ============================================================================

pub use crate::combinators::{ObjectSchema, RuleAggregator};

// ============================================================================
// OPERATIONS AND SCHEMAS
// ============================================================================

pub use crate::operations::{
    ConditionRef, DeclarativeRuleEntry, EntityValidations, OperationTag, StrippedEntry, extract,
};
#[cfg(feature = "http")]
pub use crate::schema::{HttpRequest, HttpSchema, HttpTarget, HttpValidator};
pub use crate::schema::{
    EntityRequest, EntitySchema, EntityTarget, EntityValidator, Target, TargetValidator,
    ValidationOptions,
};

// ============================================================================
// MACROS
// ============================================================================

pub use crate::{compose, rule};
