//! Declarative, operation-tagged rules
//!
//! Entities declare their rules once for every operation; each entry carries
//! [`OperationTag`]s saying which operations it applies to. [`extract`]
//! resolves the declaration for one operation, and
//! [`StrippedEntry::to_rule`] compiles the result into rules.
//!
//! ```rust
//! use gatekeep_validator::operations::{EntityValidations, extract};
//! use serde_json::json;
//!
//! let validations: EntityValidations = serde_json::from_value(json!({
//!     "inputRules": {
//!         "title": [
//!             {"operations": ["*"], "required": true},
//!             {"operations": [["update", ["isPublished"]]], "minLength": 10}
//!         ]
//!     }
//! }))
//! .unwrap();
//!
//! let create = extract("create", &validations);
//! assert_eq!(create.op_validations.input_rules["title"].len(), 1);
//!
//! let update = extract("update", &validations);
//! let entries = &update.op_validations.input_rules["title"];
//! assert_eq!(entries.len(), 2);
//! assert!(entries[1].conditions.is_some());
//! ```

pub mod declarative;
pub mod extract;
pub mod tag;

pub use declarative::{
    DeclarativeRuleEntry, EntityValidations, FieldEntries, KNOWN_OPTIONS, StrippedEntry,
    StrippedFields,
};
pub use extract::{OperationRules, OperationValidations, extract};
pub use tag::{ConditionRef, OperationTag, WILDCARD};
