//! # gatekeep-validator
//!
//! A declarative, conditional validation engine over `serde_json::Value`.
//!
//! Rules can be switched on per operation and per named or computed runtime
//! condition. A generic target validator applies rule sets to a request's
//! value bags (`actor`/`input`/`record`, or HTTP
//! `body`/`headers`/`params`/`query`/`cookies`) and returns one flat result
//! with path-qualified errors.
//!
//! Field rules run ungated at the target layer; gating happens inside
//! [`RuleAggregator::composite_conditional`](combinators::RuleAggregator::composite_conditional)
//! and [`ObjectSchema`](combinators::ObjectSchema).
//!
//! ## Quick Start
//!
//! ```rust
//! use gatekeep_validator::prelude::*;
//! use serde_json::json;
//!
//! # futures::executor::block_on(async {
//! let schema = EntitySchema::builder()
//!     .add_field(EntityTarget::Input, "title", compose![required(), min_length(3)])
//!     .add_field(
//!         EntityTarget::Input,
//!         "summary",
//!         RuleAggregator::new().when("isPublished", min_length(20)).composite_conditional(),
//!     )
//!     .define_condition("isPublished", false)
//!     .build();
//!
//! let request = EntityRequest::new("create").input(json!({"title": "Hi", "summary": "tbd"}));
//! let result = EntityValidator::new(schema)
//!     .validate(&request, &ValidationContext::new())
//!     .await;
//!
//! assert!(!result.pass());
//! assert_eq!(result.errors().len(), 1);
//! assert_eq!(result.errors()[0].dotted_path(), "input.title");
//! # });
//! ```
//!
//! ## Layers
//!
//! - [`foundation`]: results, errors, conditions, context, the core
//!   validator ([`validate`](foundation::validate),
//!   [`validate_conditional`](foundation::validate_conditional))
//! - [`validators`]: the built-in rule library
//! - [`combinators`]: [`RuleAggregator`](combinators::RuleAggregator) and
//!   [`ObjectSchema`](combinators::ObjectSchema)
//! - [`operations`]: operation-tagged declarative rules and [`extract`](operations::extract)
//! - [`schema`]: target schemas and the target validator
//!
//! ## Creating Rules
//!
//! Use the [`rule!`] macro for synchronous rules, implement
//! [`Rule`](foundation::Rule) for async or context-aware ones, or wrap a
//! closure with [`ValidationRule::from_fn`](foundation::ValidationRule::from_fn).

// ValidationError is the fundamental error type of every rule; boxing it
// would add indirection to every check.
#![allow(clippy::result_large_err)]

pub mod combinators;
pub mod foundation;
mod macros;
pub mod operations;
pub mod prelude;
pub mod schema;
pub mod validators;
