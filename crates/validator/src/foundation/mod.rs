//! Core validation types and traits
//!
//! This module contains the fundamental building blocks of the engine:
//!
//! - **Traits**: [`Rule`], wrapped with gating metadata as [`ValidationRule`]
//! - **Errors**: [`ValidationError`], [`ValidationResult`], [`SchemaError`]
//! - **Conditions**: [`Condition`], [`ConditionsSpec`], [`Scope`] and the
//!   evaluator ([`evaluate`], [`evaluate_all`])
//! - **Context**: [`ValidationContext`] and its builder
//! - **Core validator**: [`validate`] and [`validate_conditional`]
//!
//! # Architecture
//!
//! ## 1. Failures are values
//!
//! Rules never raise data problems as errors; they return a failing
//! [`ValidationResult`] with path-qualified [`ValidationError`]s. The core
//! validator additionally recovers a rule's own `Err` (or panic) into a
//! single failing error, so nothing escapes a validation pass.
//!
//! ## 2. Gating is separate from checking
//!
//! A [`ValidationRule`] carries its conditions; [`validate_conditional`]
//! decides whether to run it, [`validate`] runs it unconditionally.
//!
//! ```rust
//! use gatekeep_validator::foundation::{ValidationContext, validate_conditional};
//! use gatekeep_validator::validators::min_length;
//! use serde_json::json;
//!
//! # futures::executor::block_on(async {
//! let rule = min_length(5).when("isPublished");
//! let ctx = ValidationContext::builder().condition("isPublished", false).build();
//!
//! // gate closed: the rule is inert
//! assert!(validate_conditional(&json!("hi"), &rule, &ctx).await.pass());
//! # });
//! ```

pub mod condition;
pub mod context;
pub mod error;
pub mod traits;
mod validate;

pub use condition::{
    Condition, ConditionEntry, ConditionsSpec, PredicateFn, PredicateFuture, Scope, evaluate,
    evaluate_all,
};
pub use context::{
    ConditionResolver, FnResolver, ValidationContext, ValidationContextBuilder, resolver_fn,
};
pub use error::{BoxError, Expected, Received, SchemaError, ValidationError, ValidationResult};
pub use traits::{Check, FnRule, Rule, RuleFuture, ValidationRule};

#[doc(hidden)]
pub use serde_json::Value;
pub use validate::{RULE_EXCEPTION_ID, validate, validate_conditional};

/// Common imports for working with the foundation.
pub mod prelude {
    pub use super::{
        BoxError, Check, Condition, ConditionEntry, ConditionsSpec, Rule, Scope, SchemaError,
        ValidationContext, ValidationError, ValidationResult, ValidationRule, validate,
        validate_conditional,
    };
}
