//! Rule combinators
//!
//! - [`RuleAggregator`]: ordered, optionally gated rule lists and composites
//! - [`ObjectSchema`]: nested field validation for JSON objects
//!
//! # Examples
//!
//! ```rust
//! use gatekeep_validator::combinators::{ObjectSchema, RuleAggregator};
//! use gatekeep_validator::validators::{max_length, min_length, required};
//!
//! let name = RuleAggregator::new()
//!     .add(required())
//!     .add(min_length(2))
//!     .add(max_length(64))
//!     .composite();
//!
//! let profile = ObjectSchema::new()
//!     .field("name", name)
//!     .allow_unknown_fields(false);
//! # let _ = profile;
//! ```

pub mod aggregator;
pub mod object;

pub use aggregator::{Composite, RuleAggregator};
pub use object::{ObjectSchema, UNKNOWN_FIELDS_ID};
