//! Targets and target schemas
//!
//! A *target* is a named bag of values validated together (`body`,
//! `actor`, ...). A [`TargetSchema`] maps targets to per-field rules and may
//! restrict itself to some selectors (operations, HTTP methods).

use crate::foundation::{ConditionEntry, ValidationRule};
use indexmap::IndexMap;
use std::fmt;
use std::hash::Hash;

// ============================================================================
// TARGET TRAIT
// ============================================================================

/// A closed set of value bags one schema validates.
pub trait Target: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// What the applicability filter of a schema is made of.
    type Selector: Clone + PartialEq + fmt::Debug + Send + Sync;

    /// Every target, in canonical order.
    const ALL: &'static [Self];

    /// Wire name of the target, also used as the first error path segment.
    fn as_str(&self) -> &'static str;

    /// Reads `field` from a raw bag of this target.
    fn lookup<'v>(
        &self,
        bag: &'v serde_json::Value,
        field: &str,
    ) -> Option<&'v serde_json::Value> {
        bag.get(field)
    }
}

/// Raw value bags of one call, plus the selector the call runs under.
pub trait TargetRequest<T: Target> {
    /// Operation name, HTTP method, ...
    fn selector(&self) -> &T::Selector;

    /// Raw value bag of `target`, `None` when the call carries none.
    fn values(&self, target: T) -> Option<&serde_json::Value>;
}

// ============================================================================
// SCHEMA
// ============================================================================

/// Per-target field rules. Immutable once built.
#[derive(Debug, Clone)]
pub struct TargetSchema<T: Target> {
    targets: IndexMap<T, IndexMap<String, ValidationRule>>,
    applies_to: Option<Vec<T::Selector>>,
    conditions: IndexMap<String, ConditionEntry>,
}

impl<T: Target> TargetSchema<T> {
    /// Starts building a schema.
    #[must_use]
    pub fn builder() -> SchemaBuilder<T> {
        SchemaBuilder::new()
    }

    /// Field rules per target, in declaration order.
    #[must_use]
    pub fn targets(&self) -> &IndexMap<T, IndexMap<String, ValidationRule>> {
        &self.targets
    }

    /// Field rules of one target.
    #[must_use]
    pub fn fields(&self, target: T) -> Option<&IndexMap<String, ValidationRule>> {
        self.targets.get(&target)
    }

    /// The applicability filter; `None` means every selector.
    #[must_use]
    pub fn applies_to(&self) -> Option<&[T::Selector]> {
        self.applies_to.as_deref()
    }

    /// Whether the schema applies under `selector`.
    #[must_use]
    pub fn applies(&self, selector: &T::Selector) -> bool {
        self.applies_to
            .as_ref()
            .is_none_or(|selectors| selectors.contains(selector))
    }

    /// Named conditions defined by the schema.
    #[must_use]
    pub fn conditions(&self) -> &IndexMap<String, ConditionEntry> {
        &self.conditions
    }

    /// Whether no field has a rule.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.values().all(IndexMap::is_empty)
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Accumulates a [`TargetSchema`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder<T: Target> {
    schema: TargetSchema<T>,
}

impl<T: Target> Default for SchemaBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Target> SchemaBuilder<T> {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: TargetSchema {
                targets: IndexMap::new(),
                applies_to: None,
                conditions: IndexMap::new(),
            },
        }
    }

    /// Sets (or replaces) the rule of a field.
    #[must_use = "builder methods must be chained or built"]
    pub fn add_field(
        mut self,
        target: T,
        name: impl Into<String>,
        rule: impl Into<ValidationRule>,
    ) -> Self {
        self.schema
            .targets
            .entry(target)
            .or_default()
            .insert(name.into(), rule.into());
        self
    }

    /// Sets the rules of several fields of one target.
    #[must_use = "builder methods must be chained or built"]
    pub fn add_fields<I, K>(mut self, target: T, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, ValidationRule)>,
        K: Into<String>,
    {
        self.schema
            .targets
            .entry(target)
            .or_default()
            .extend(fields.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Restricts the schema to the given selectors.
    #[must_use = "builder methods must be chained or built"]
    pub fn applies_to<I>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = T::Selector>,
    {
        self.schema.applies_to = Some(selectors.into_iter().collect());
        self
    }

    /// Defines (or replaces) a named condition.
    #[must_use = "builder methods must be chained or built"]
    pub fn define_condition(
        mut self,
        name: impl Into<String>,
        entry: impl Into<ConditionEntry>,
    ) -> Self {
        self.schema.conditions.insert(name.into(), entry.into());
        self
    }

    /// Merges named conditions into the schema registry.
    #[must_use = "builder methods must be chained or built"]
    pub fn define_conditions<I, K>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, ConditionEntry)>,
        K: Into<String>,
    {
        self.schema
            .conditions
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Finishes the schema.
    #[must_use]
    pub fn build(self) -> TargetSchema<T> {
        self.schema
    }
}
