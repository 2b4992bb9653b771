//! Validation context
//!
//! A [`ValidationContext`] carries everything a rule or condition may look
//! at besides the value itself:
//!
//! - **data**: arbitrary caller data handed to predicate conditions
//! - **conditions**: the named-condition registry
//! - **resolver**: an optional [`ConditionResolver`]; when present it is the
//!   only way named conditions are resolved
//! - **targets**: the raw value bags of the current request (set by the
//!   target validators so rules can do cross-target checks)
//! - **extra**: free-form values
//!
//! A context is built once per validation call and never mutated by the
//! engine. Cloning is cheap enough to share one across concurrent calls.
//!
//! # Examples
//!
//! ```rust
//! use gatekeep_validator::foundation::{Condition, ValidationContext};
//! use serde_json::json;
//!
//! let ctx = ValidationContext::builder()
//!     .data(json!({"userId": 7}))
//!     .condition("isOwner", Condition::predicate(|v, data| v == &data["userId"]))
//!     .extra("locale", json!("en"))
//!     .build();
//!
//! assert_eq!(ctx.data()["userId"], json!(7));
//! assert_eq!(ctx.extra("locale"), Some(&json!("en")));
//! ```

use crate::foundation::condition::ConditionEntry;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

// ============================================================================
// CONDITION RESOLVER
// ============================================================================

/// Resolves named conditions, replacing registry lookup entirely.
///
/// Implemented for sets of active condition names, and for async closures via
/// [`resolver_fn`].
#[async_trait]
pub trait ConditionResolver: Send + Sync {
    /// Returns whether the named condition currently holds.
    async fn matches(&self, name: &str) -> bool;
}

#[async_trait]
impl ConditionResolver for HashSet<String> {
    async fn matches(&self, name: &str) -> bool {
        self.contains(name)
    }
}

#[async_trait]
impl ConditionResolver for BTreeSet<String> {
    async fn matches(&self, name: &str) -> bool {
        self.contains(name)
    }
}

/// Resolver backed by a closure returning a future.
pub struct FnResolver<F>(F);

#[async_trait]
impl<F, Fut> ConditionResolver for FnResolver<F>
where
    F: Fn(&str) -> Fut + Send + Sync,
    Fut: Future<Output = bool> + Send + 'static,
{
    async fn matches(&self, name: &str) -> bool {
        (self.0)(name).await
    }
}

/// Wraps a closure as a [`ConditionResolver`].
///
/// ```rust
/// use gatekeep_validator::foundation::{ValidationContext, resolver_fn};
///
/// let ctx = ValidationContext::builder()
///     .resolver(resolver_fn(|name| {
///         let active = name == "isPublished";
///         async move { active }
///     }))
///     .build();
/// assert!(ctx.resolver().is_some());
/// ```
pub fn resolver_fn<F, Fut>(f: F) -> FnResolver<F>
where
    F: Fn(&str) -> Fut + Send + Sync,
    Fut: Future<Output = bool> + Send + 'static,
{
    FnResolver(f)
}

// ============================================================================
// VALIDATION CONTEXT
// ============================================================================

/// Per-call evaluation context.
#[derive(Clone, Default)]
pub struct ValidationContext {
    data: Value,
    conditions: IndexMap<String, ConditionEntry>,
    resolver: Option<Arc<dyn ConditionResolver>>,
    targets: IndexMap<String, Value>,
    extra: Map<String, Value>,
}

impl ValidationContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts building a context.
    #[must_use]
    pub fn builder() -> ValidationContextBuilder {
        ValidationContextBuilder::new()
    }

    /// Starts a builder pre-filled with this context's contents.
    ///
    /// The target validators use this to derive a per-call snapshot.
    #[must_use]
    pub fn to_builder(&self) -> ValidationContextBuilder {
        ValidationContextBuilder {
            inner: self.clone(),
        }
    }

    /// Caller data passed to predicate conditions (`null` when unset).
    #[must_use]
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Looks up an entry of the named-condition registry.
    #[must_use]
    pub fn condition(&self, name: &str) -> Option<&ConditionEntry> {
        self.conditions.get(name)
    }

    /// The named-condition registry, in insertion order.
    #[must_use]
    pub fn conditions(&self) -> &IndexMap<String, ConditionEntry> {
        &self.conditions
    }

    /// The resolver, if one was supplied.
    #[must_use]
    pub fn resolver(&self) -> Option<&dyn ConditionResolver> {
        self.resolver.as_deref()
    }

    /// The raw value bag of a target, e.g. `"body"` or `"record"`.
    #[must_use]
    pub fn target(&self, name: &str) -> Option<&Value> {
        self.targets.get(name)
    }

    /// All raw value bags.
    #[must_use]
    pub fn targets(&self) -> &IndexMap<String, Value> {
        &self.targets
    }

    /// A free-form extra value.
    #[must_use]
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

impl fmt::Debug for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationContext")
            .field("data", &self.data)
            .field("conditions", &self.conditions.keys().collect::<Vec<_>>())
            .field("resolver", &self.resolver.as_ref().map(|_| "<resolver>"))
            .field("targets", &self.targets.keys().collect::<Vec<_>>())
            .field("extra", &self.extra)
            .finish()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`ValidationContext`].
#[derive(Debug, Default)]
pub struct ValidationContextBuilder {
    inner: ValidationContext,
}

impl ValidationContextBuilder {
    /// Creates a builder for an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the caller data.
    #[must_use = "builder methods must be chained or built"]
    pub fn data(mut self, data: Value) -> Self {
        self.inner.data = data;
        self
    }

    /// Registers (or replaces) a named condition.
    #[must_use = "builder methods must be chained or built"]
    pub fn condition(mut self, name: impl Into<String>, entry: impl Into<ConditionEntry>) -> Self {
        self.inner.conditions.insert(name.into(), entry.into());
        self
    }

    /// Registers several named conditions, replacing existing names.
    #[must_use = "builder methods must be chained or built"]
    pub fn conditions<I, K>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, ConditionEntry)>,
        K: Into<String>,
    {
        self.inner
            .conditions
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Registers named conditions that are not defined yet.
    ///
    /// Used for schema-level defaults that the caller's own registry may
    /// override.
    #[must_use = "builder methods must be chained or built"]
    pub fn default_conditions<'a, I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a ConditionEntry)>,
    {
        for (name, entry) in entries {
            if !self.inner.conditions.contains_key(name) {
                self.inner.conditions.insert(name.clone(), entry.clone());
            }
        }
        self
    }

    /// Installs a resolver for named conditions.
    #[must_use = "builder methods must be chained or built"]
    pub fn resolver(mut self, resolver: impl ConditionResolver + 'static) -> Self {
        self.inner.resolver = Some(Arc::new(resolver));
        self
    }

    /// Installs an already-shared resolver.
    #[must_use = "builder methods must be chained or built"]
    pub fn shared_resolver(mut self, resolver: Arc<dyn ConditionResolver>) -> Self {
        self.inner.resolver = Some(resolver);
        self
    }

    /// Sets the raw value bag of a target.
    #[must_use = "builder methods must be chained or built"]
    pub fn target(mut self, name: impl Into<String>, values: Value) -> Self {
        self.inner.targets.insert(name.into(), values);
        self
    }

    /// Sets a free-form extra value.
    #[must_use = "builder methods must be chained or built"]
    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.inner.extra.insert(key.into(), value);
        self
    }

    /// Finishes the context.
    #[must_use]
    pub fn build(self) -> ValidationContext {
        self.inner
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::condition::Condition;
    use serde_json::json;

    #[test]
    fn test_builder_roundtrip() {
        let ctx = ValidationContext::builder()
            .data(json!({"a": 1}))
            .condition("flag", true)
            .target("body", json!({"name": "x"}))
            .build();

        assert_eq!(ctx.data(), &json!({"a": 1}));
        assert!(matches!(
            ctx.condition("flag"),
            Some(ConditionEntry::Value(Value::Bool(true)))
        ));
        assert_eq!(ctx.target("body"), Some(&json!({"name": "x"})));
        assert!(ctx.resolver().is_none());
    }

    #[test]
    fn test_default_conditions_do_not_override() {
        let defaults: IndexMap<String, ConditionEntry> = [
            ("flag".to_string(), ConditionEntry::from(false)),
            ("other".to_string(), ConditionEntry::from(Condition::named("flag"))),
        ]
        .into_iter()
        .collect();

        let ctx = ValidationContext::builder()
            .condition("flag", true)
            .default_conditions(&defaults)
            .build();

        assert!(matches!(
            ctx.condition("flag"),
            Some(ConditionEntry::Value(Value::Bool(true)))
        ));
        assert!(ctx.condition("other").is_some());
        assert_eq!(ctx.conditions().len(), 2);
    }

    #[test]
    fn test_to_builder_keeps_contents() {
        let base = ValidationContext::builder()
            .data(json!(1))
            .resolver(HashSet::from(["x".to_string()]))
            .build();
        let snapshot = base.to_builder().target("query", json!({})).build();

        assert_eq!(snapshot.data(), &json!(1));
        assert!(snapshot.resolver().is_some());
        assert!(base.target("query").is_none());
    }

    #[tokio::test]
    async fn test_set_resolvers() {
        let set: BTreeSet<String> = ["published".to_string()].into_iter().collect();
        assert!(set.matches("published").await);
        assert!(!set.matches("draft").await);

        let resolver = resolver_fn(|name| {
            let hit = name.starts_with("is");
            async move { hit }
        });
        assert!(resolver.matches("isAdmin").await);
        assert!(!resolver.matches("admin").await);
    }
}
