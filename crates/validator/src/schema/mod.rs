//! Target schemas and their validator
//!
//! A schema maps *targets* (named value bags) to per-field rules. The same
//! generic machinery serves two instantiations:
//!
//! - [`EntitySchema`] / [`EntityValidator`]: `actor`, `input`, `record`,
//!   filtered by operation name
//! - [`HttpSchema`] / [`HttpValidator`] (feature `http`): `body`, `headers`,
//!   `params`, `query`, `cookies`, filtered by [`Method`](::http::Method)
//!
//! Errors come back flat, with `[target, field, ..]` paths and their
//! `target` set.

pub mod entity;
#[cfg(feature = "http")]
pub mod http;
pub mod target;
pub mod validate;

pub use entity::{EntityRequest, EntitySchema, EntitySchemaBuilder, EntityTarget, EntityValidator};
#[cfg(feature = "http")]
pub use self::http::{HttpRequest, HttpSchema, HttpSchemaBuilder, HttpTarget, HttpValidator};
pub use target::{SchemaBuilder, Target, TargetRequest, TargetSchema};
pub use validate::{TargetValidator, ValidationOptions};
