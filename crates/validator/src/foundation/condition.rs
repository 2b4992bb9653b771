//! Conditions and the condition evaluator
//!
//! A [`Condition`] gates whether a rule runs. It is either a *name*, looked
//! up at evaluation time through the [`ValidationContext`], or a *predicate*
//! over `(value, context data)`.
//!
//! Evaluation never fails: unknown names, non-boolean registry values,
//! predicates that return `Err` and predicates that panic all resolve to
//! `false`.
//!
//! # Examples
//!
//! ```rust
//! use gatekeep_validator::foundation::{Condition, ConditionsSpec, ValidationContext, evaluate_all};
//! use serde_json::json;
//!
//! # futures::executor::block_on(async {
//! let ctx = ValidationContext::builder()
//!     .data(json!({"role": "admin"}))
//!     .condition("isDraft", false)
//!     .build();
//!
//! let is_admin = Condition::predicate(|_, data| data["role"] == "admin");
//! let spec = ConditionsSpec::any([Condition::named("isDraft"), is_admin]);
//! assert!(evaluate_all(&spec, &json!(null), &ctx).await);
//! # });
//! ```

use crate::foundation::context::ValidationContext;
use crate::foundation::error::BoxError;
use futures::FutureExt;
use futures::future::{self, BoxFuture};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Alias chains (`a -> b -> c`) longer than this are treated as cycles.
const MAX_ALIAS_DEPTH: usize = 16;

/// Future returned by a predicate condition.
pub type PredicateFuture = BoxFuture<'static, Result<bool, BoxError>>;

/// Type-erased predicate: `(value, context data) -> future<bool>`.
pub type PredicateFn = dyn Fn(&Value, &Value) -> PredicateFuture + Send + Sync;

// ============================================================================
// CONDITION
// ============================================================================

/// A named or functional condition.
#[derive(Clone)]
pub enum Condition {
    /// Resolved against the context's resolver or named-condition registry.
    Named(String),
    /// Invoked with the value under validation and the context data.
    Predicate(Arc<PredicateFn>),
}

impl Condition {
    /// A condition resolved by name at evaluation time.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// A synchronous, infallible predicate.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(move |value, data| {
            future::ready(Ok(f(value, data))).boxed()
        }))
    }

    /// A synchronous predicate that may fail. Failures evaluate to `false`.
    pub fn try_predicate<F, E>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<bool, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self::Predicate(Arc::new(move |value, data| {
            future::ready(f(value, data).map_err(Into::into)).boxed()
        }))
    }

    /// An asynchronous predicate.
    ///
    /// The closure borrows its arguments but must return a `'static`
    /// future, so clone what the future needs:
    ///
    /// ```rust
    /// use gatekeep_validator::foundation::{BoxError, Condition};
    ///
    /// let cond = Condition::async_predicate(|value, _data| {
    ///     let value = value.clone();
    ///     async move { Ok::<_, BoxError>(value.is_string()) }
    /// });
    /// ```
    pub fn async_predicate<F, Fut>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool, BoxError>> + Send + 'static,
    {
        Self::Predicate(Arc::new(move |value, data| f(value, data).boxed()))
    }

    /// Returns the name for [`Condition::Named`].
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Predicate(_) => None,
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Predicate(_) => f.write_str("Predicate(<function>)"),
        }
    }
}

impl From<&str> for Condition {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for Condition {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

// ============================================================================
// SCOPE / CONDITIONS SPEC
// ============================================================================

/// Quantifier combining several condition results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Every condition must hold.
    All,
    /// At least one condition must hold.
    #[default]
    Any,
    /// No condition may hold.
    None,
}

impl Scope {
    /// Combines already-evaluated condition results.
    ///
    /// On an empty list `All` and `None` hold, `Any` does not.
    #[must_use]
    pub fn combine(self, results: &[bool]) -> bool {
        match self {
            Self::All => results.iter().all(|r| *r),
            Self::Any => results.iter().any(|r| *r),
            Self::None => !results.iter().any(|r| *r),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Any => "any",
            Self::None => "none",
        })
    }
}

/// A list of conditions under one quantifier.
#[derive(Debug, Clone, Default)]
pub struct ConditionsSpec {
    /// The conditions, evaluated concurrently.
    pub list: Vec<Condition>,
    /// How their results combine.
    pub scope: Scope,
}

impl ConditionsSpec {
    /// Creates a spec from conditions and a scope.
    pub fn new<I, C>(list: I, scope: Scope) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        Self {
            list: list.into_iter().map(Into::into).collect(),
            scope,
        }
    }

    /// Every condition must hold.
    pub fn all<I, C>(list: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        Self::new(list, Scope::All)
    }

    /// At least one condition must hold.
    pub fn any<I, C>(list: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        Self::new(list, Scope::Any)
    }

    /// No condition may hold.
    pub fn none<I, C>(list: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        Self::new(list, Scope::None)
    }
}

// ============================================================================
// CONDITION ENTRY
// ============================================================================

/// A value in a named-condition registry.
///
/// Registries hold either plain values (only booleans resolve; anything else
/// evaluates to `false`) or conditions, which are evaluated when looked up.
#[derive(Debug, Clone)]
pub enum ConditionEntry {
    /// A plain value.
    Value(Value),
    /// A condition evaluated on lookup; a `Named` entry acts as an alias.
    Condition(Condition),
}

impl From<Condition> for ConditionEntry {
    fn from(condition: Condition) -> Self {
        Self::Condition(condition)
    }
}

impl From<Value> for ConditionEntry {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<bool> for ConditionEntry {
    fn from(value: bool) -> Self {
        Self::Value(Value::Bool(value))
    }
}

/// Registries loaded from data can only carry plain values.
impl<'de> Deserialize<'de> for ConditionEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::Value)
    }
}

// ============================================================================
// EVALUATOR
// ============================================================================

/// Resolves one condition to a boolean.
pub async fn evaluate(condition: &Condition, value: &Value, ctx: &ValidationContext) -> bool {
    match condition {
        Condition::Named(name) => evaluate_named(name, value, ctx).await,
        Condition::Predicate(predicate) => {
            run_predicate(predicate.as_ref(), value, ctx.data()).await
        }
    }
}

/// Evaluates every condition of `spec` concurrently and combines the
/// results by its scope.
pub async fn evaluate_all(spec: &ConditionsSpec, value: &Value, ctx: &ValidationContext) -> bool {
    let results =
        future::join_all(spec.list.iter().map(|condition| evaluate(condition, value, ctx))).await;
    spec.scope.combine(&results)
}

async fn evaluate_named(name: &str, value: &Value, ctx: &ValidationContext) -> bool {
    if let Some(resolver) = ctx.resolver() {
        return resolver.matches(name).await;
    }

    let mut current = name;
    for _ in 0..MAX_ALIAS_DEPTH {
        match ctx.condition(current) {
            Some(ConditionEntry::Condition(Condition::Predicate(predicate))) => {
                return run_predicate(predicate.as_ref(), value, ctx.data()).await;
            }
            Some(ConditionEntry::Condition(Condition::Named(alias))) => current = alias.as_str(),
            Some(ConditionEntry::Value(Value::Bool(flag))) => return *flag,
            Some(ConditionEntry::Value(_)) => {
                tracing::debug!(condition = %current, "named condition holds a non-boolean value");
                return false;
            }
            None => {
                tracing::debug!(condition = %current, "named condition not registered");
                return false;
            }
        }
    }

    tracing::warn!(condition = %name, "named condition alias chain too deep, treating as false");
    false
}

async fn run_predicate(predicate: &PredicateFn, value: &Value, data: &Value) -> bool {
    let fut = match std::panic::catch_unwind(AssertUnwindSafe(|| predicate(value, data))) {
        Ok(fut) => fut,
        Err(payload) => {
            tracing::warn!(panic = %panic_message(&*payload), "condition predicate panicked");
            return false;
        }
    };

    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(result)) => result,
        Ok(Err(error)) => {
            tracing::warn!(%error, "condition predicate failed, treating as false");
            false
        }
        Err(payload) => {
            tracing::warn!(panic = %panic_message(&*payload), "condition predicate panicked");
            false
        }
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}

// ============================================================================
// TESTS
// ============================================================================
