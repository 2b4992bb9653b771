//! Rule aggregator
//!
//! [`RuleAggregator`] accumulates rules (optionally gated) and hands them out
//! either as a list or as one composite rule.
//!
//! # Compatibility note: `composite()` ignores gating
//!
//! [`RuleAggregator::composite`] runs **every** added rule through the core
//! [`validate`], never through [`validate_conditional`]. Conditions attached
//! with [`when`](RuleAggregator::when) and friends are stored on the rules but
//! have no effect when the rules are consumed through `composite()`. This
//! matches the established behaviour callers depend on. Use
//! [`RuleAggregator::composite_conditional`] to get a composite that honors
//! each rule's gate.

use crate::foundation::{
    BoxError, Condition, Rule, ValidationContext, ValidationResult, ValidationRule, validate,
    validate_conditional,
};
use async_trait::async_trait;
use serde_json::Value;

// ============================================================================
// AGGREGATOR
// ============================================================================

/// Ordered accumulator of rules.
///
/// ```rust
/// use gatekeep_validator::combinators::RuleAggregator;
/// use gatekeep_validator::validators::{max_length, min_length, required};
///
/// let rules = RuleAggregator::new()
///     .add(required())
///     .when("isPublished", min_length(10))
///     .when_any(["isPremium", "isStaff"], max_length(5000))
///     .build();
/// assert_eq!(rules.len(), 3);
/// assert!(rules[1].condition.is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleAggregator {
    rules: Vec<ValidationRule>,
}

impl RuleAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule as-is.
    #[must_use = "builder methods must be chained or built"]
    pub fn add(mut self, rule: impl Into<ValidationRule>) -> Self {
        self.rules.push(rule.into());
        self
    }

    /// Appends a rule gated on a single condition.
    #[must_use = "builder methods must be chained or built"]
    pub fn when(self, condition: impl Into<Condition>, rule: impl Into<ValidationRule>) -> Self {
        self.add(rule.into().when(condition))
    }

    /// Appends a rule gated on every condition holding.
    #[must_use = "builder methods must be chained or built"]
    pub fn when_all<I, C>(self, conditions: I, rule: impl Into<ValidationRule>) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        self.add(rule.into().when_all(conditions))
    }

    /// Appends a rule gated on at least one condition holding.
    #[must_use = "builder methods must be chained or built"]
    pub fn when_any<I, C>(self, conditions: I, rule: impl Into<ValidationRule>) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        self.add(rule.into().when_any(conditions))
    }

    /// Appends a rule gated on no condition holding.
    #[must_use = "builder methods must be chained or built"]
    pub fn when_none<I, C>(self, conditions: I, rule: impl Into<ValidationRule>) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        self.add(rule.into().when_none(conditions))
    }

    /// Number of rules added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the rules in addition order.
    #[must_use]
    pub fn build(self) -> Vec<ValidationRule> {
        self.rules
    }

    /// One rule running every added rule, ignoring their gates.
    ///
    /// Errors are concatenated in addition order. See the module docs for
    /// why gating is not applied here.
    #[must_use]
    pub fn composite(self) -> ValidationRule {
        ValidationRule::new(Composite {
            rules: self.rules,
            gated: false,
        })
    }

    /// One rule running every added rule through [`validate_conditional`].
    #[must_use]
    pub fn composite_conditional(self) -> ValidationRule {
        ValidationRule::new(Composite {
            rules: self.rules,
            gated: true,
        })
    }
}

impl FromIterator<ValidationRule> for RuleAggregator {
    fn from_iter<I: IntoIterator<Item = ValidationRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// COMPOSITE RULE
// ============================================================================

/// Rule built by [`RuleAggregator::composite`] and
/// [`RuleAggregator::composite_conditional`].
#[derive(Debug, Clone)]
pub struct Composite {
    rules: Vec<ValidationRule>,
    gated: bool,
}

impl Composite {
    /// The composed rules, in order.
    #[must_use]
    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    /// Whether each rule's gate is honored.
    #[must_use]
    pub const fn is_gated(&self) -> bool {
        self.gated
    }
}

#[async_trait]
impl Rule for Composite {
    async fn validate(
        &self,
        value: &Value,
        ctx: &ValidationContext,
    ) -> Result<ValidationResult, BoxError> {
        let mut result = ValidationResult::success();
        for rule in &self.rules {
            let outcome = if self.gated {
                validate_conditional(value, rule, ctx).await
            } else {
                validate(value, rule, ctx).await
            };
            result.merge(outcome);
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        if self.gated {
            "composite_conditional"
        } else {
            "composite"
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
