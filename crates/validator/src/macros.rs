//! Macros for creating rules with minimal boilerplate.
//!
//! # Available Macros
//!
//! - [`rule!`]: Create a complete rule (struct + [`Check`] impl + factory fn)
//! - [`compose!`]: Run several rules as one composite rule
//!
//! [`Check`]: crate::foundation::Check
//!
//! # Examples
//!
//! ```rust
//! use gatekeep_validator::rule;
//! use gatekeep_validator::foundation::ValidationError;
//!
//! // Unit rule (no fields)
//! rule! {
//!     pub Lowercase;
//!     rule(input) { input.as_str().is_none_or(|s| s == s.to_lowercase()) }
//!     error(input) { ValidationError::with_id("validation.lowercase") }
//!     fn lowercase();
//! }
//!
//! // Struct with fields
//! rule! {
//!     pub StartsWith { prefix: String };
//!     rule(self, input) { input.as_str().is_none_or(|s| s.starts_with(&self.prefix)) }
//!     error(self, input) { ValidationError::new(format!("must start with {}", self.prefix)) }
//!     fn starts_with(prefix: String);
//! }
//! # let _ = (lowercase(), starts_with("x".into()));
//! ```

// ============================================================================
// RULE MACRO
// ============================================================================

/// Creates a complete rule: struct definition, [`Check`] implementation,
/// constructor, and factory function returning a
/// [`ValidationRule`](crate::foundation::ValidationRule).
///
/// `#[derive(Debug, Clone)]` is always applied. Add extra derives via `#[derive(...)]`.
/// The `rule` block is a `bool`, the `error` block builds the
/// [`ValidationError`](crate::foundation::ValidationError) returned when it is
/// `false`. Input is always a `&serde_json::Value`; `null` never reaches the
/// blocks (see [`Check::CHECKS_NULL`]).
///
/// [`Check`]: crate::foundation::Check
/// [`Check::CHECKS_NULL`]: crate::foundation::Check::CHECKS_NULL
///
/// # Variants
///
/// **Unit rule** (zero-sized, no fields):
/// ```rust,ignore
/// rule! {
///     pub Integer;
///     rule(input) { input.is_i64() || input.is_u64() }
///     error(input) { ValidationError::with_id("validation.integer") }
///     fn integer();
/// }
/// ```
///
/// **Struct with fields** (auto `new` from all fields):
/// ```rust,ignore
/// rule! {
///     pub MinLength { min: usize };
///     rule(self, input) { length_of(input).is_some_and(|l| l >= self.min) }
///     error(self, input) { ValidationError::with_id("validation.minLength") }
///     fn min_length(min: usize);
/// }
/// ```
///
/// **Custom constructor** (overrides auto `new`):
/// ```rust,ignore
/// rule! {
///     pub OneOf { allowed: Vec<Value> };
///     rule(self, input) { self.allowed.contains(input) }
///     error(self, input) { ValidationError::with_id("validation.oneOf") }
///     new(allowed: impl IntoIterator<Item = Value>) { Self { allowed: allowed.into_iter().collect() } }
///     fn one_of(allowed: impl IntoIterator<Item = Value>);
/// }
/// ```
///
/// **Fallible constructor** (the factory returns `Result`):
/// ```rust,ignore
/// rule! {
///     pub LengthRange { min: usize, max: usize };
///     rule(self, input) { ... }
///     error(self, input) { ... }
///     new(min: usize, max: usize) -> SchemaError { ... }
///     fn length_range(min: usize, max: usize) -> SchemaError;
/// }
/// ```
#[macro_export]
macro_rules! rule {
    // ── Variant 1a: Unit rule (no fields) + factory fn ───────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident;
        rule($inp:ident) $rule:block
        error($einp:ident) $err:block
        fn $factory:ident();
    ) => {
        $crate::rule! {
            $(#[$meta])*
            $vis $name;
            rule($inp) $rule
            error($einp) $err
        }

        #[must_use]
        $vis fn $factory() -> $crate::foundation::ValidationRule {
            $crate::foundation::ValidationRule::new($name)
        }
    };

    // ── Variant 1b: Unit rule (no fields), no factory ────────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident;
        rule($inp:ident) $rule:block
        error($einp:ident) $err:block
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $crate::foundation::Check for $name {
            const NAME: &'static str = stringify!($name);

            #[allow(unused_variables)]
            fn check(
                &self,
                $inp: &$crate::foundation::Value,
            ) -> ::std::result::Result<(), $crate::foundation::ValidationError> {
                if $rule {
                    Ok(())
                } else {
                    let $einp = $inp;
                    Err($err)
                }
            }
        }
    };

    // ── Variant 3a: Struct with fields + custom new + factory fn ─────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident { $($field:ident: $fty:ty),+ $(,)? };
        rule($self_:ident, $inp:ident) $rule:block
        error($self2:ident, $einp:ident) $err:block
        new($($narg:ident: $naty:ty),* $(,)?) $new_body:block
        fn $factory:ident($($farg:ident: $faty:ty),* $(,)?);
    ) => {
        $crate::rule! {
            $(#[$meta])*
            $vis $name { $($field: $fty),+ };
            rule($self_, $inp) $rule
            error($self2, $einp) $err
            new($($narg: $naty),*) $new_body
        }

        #[must_use]
        $vis fn $factory($($farg: $faty),*) -> $crate::foundation::ValidationRule {
            $crate::foundation::ValidationRule::new($name::new($($farg),*))
        }
    };

    // ── Variant 3b: Struct with fields + custom new, no factory ──────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident { $($field:ident: $fty:ty),+ $(,)? };
        rule($self_:ident, $inp:ident) $rule:block
        error($self2:ident, $einp:ident) $err:block
        new($($narg:ident: $naty:ty),* $(,)?) $new_body:block
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            $(pub $field: $fty,)+
        }

        #[allow(clippy::new_without_default)]
        impl $name {
            #[must_use]
            pub fn new($($narg: $naty),*) -> Self $new_body
        }

        $crate::rule!(@check $name; $self_, $inp, $einp; $rule; $err);
    };

    // ── Variant 3c: Struct with fields + fallible new + fallible factory ─
    //
    // For rules whose constructor can fail (returns Result).
    // The type after `->` is the error type; the macro wraps it in Result.
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident { $($field:ident: $fty:ty),+ $(,)? };
        rule($self_:ident, $inp:ident) $rule:block
        error($self2:ident, $einp:ident) $err:block
        new($($narg:ident: $naty:ty),* $(,)?) -> $ety:ty $new_body:block
        fn $factory:ident($($farg:ident: $faty:ty),* $(,)?) -> $efty:ty;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            $(pub $field: $fty,)+
        }

        impl $name {
            pub fn new($($narg: $naty),*) -> ::std::result::Result<Self, $ety> $new_body
        }

        $crate::rule!(@check $name; $self_, $inp, $einp; $rule; $err);

        $vis fn $factory(
            $($farg: $faty),*
        ) -> ::std::result::Result<$crate::foundation::ValidationRule, $efty> {
            Ok($crate::foundation::ValidationRule::new($name::new($($farg),*)?))
        }
    };

    // ── Variant 2a: Struct with fields + auto new + factory fn ───────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident { $($field:ident: $fty:ty),+ $(,)? };
        rule($self_:ident, $inp:ident) $rule:block
        error($self2:ident, $einp:ident) $err:block
        fn $factory:ident($($farg:ident: $faty:ty),* $(,)?);
    ) => {
        $crate::rule! {
            $(#[$meta])*
            $vis $name { $($field: $fty),+ };
            rule($self_, $inp) $rule
            error($self2, $einp) $err
        }

        #[must_use]
        $vis fn $factory($($farg: $faty),*) -> $crate::foundation::ValidationRule {
            $crate::foundation::ValidationRule::new($name::new($($farg),*))
        }
    };

    // ── Variant 2b: Struct with fields + auto new, no factory ────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident { $($field:ident: $fty:ty),+ $(,)? };
        rule($self_:ident, $inp:ident) $rule:block
        error($self2:ident, $einp:ident) $err:block
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            $(pub $field: $fty,)+
        }

        impl $name {
            #[must_use]
            pub fn new($($field: $fty),+) -> Self {
                Self { $($field),+ }
            }
        }

        $crate::rule!(@check $name; $self_, $inp, $einp; $rule; $err);
    };

    // ── Internal: Check impl for struct rules ────────────────────────────
    (@check $name:ident; $self_:ident, $inp:ident, $einp:ident; $rule:block; $err:block) => {
        impl $crate::foundation::Check for $name {
            const NAME: &'static str = stringify!($name);

            #[allow(unused_variables)]
            fn check(
                &$self_,
                $inp: &$crate::foundation::Value,
            ) -> ::std::result::Result<(), $crate::foundation::ValidationError> {
                if $rule {
                    Ok(())
                } else {
                    let $einp = $inp;
                    Err($err)
                }
            }
        }
    };
}

// ============================================================================
// COMPOSE MACRO
// ============================================================================

/// Runs several rules as one, concatenating their errors in order.
///
/// Expands to [`RuleAggregator::composite`], so gating attached to the
/// individual rules is not consulted.
///
/// [`RuleAggregator::composite`]: crate::combinators::RuleAggregator::composite
///
/// ```rust
/// use gatekeep_validator::compose;
/// use gatekeep_validator::validators::{max_length, min_length};
///
/// let username = compose![min_length(3), max_length(20)];
/// # let _ = username;
/// ```
#[macro_export]
macro_rules! compose {
    ($($rule:expr),+ $(,)?) => {
        $crate::combinators::RuleAggregator::new()
            $(.add($rule))+
            .composite()
    };
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::foundation::{Check, SchemaError, ValidationContext, ValidationError, validate};
    use serde_json::{Value, json};

    rule! {
        TestEven;
        rule(input) { input.as_i64().is_some_and(|n| n % 2 == 0) }
        error(input) { ValidationError::with_id("test.even").with_received(input.clone()) }
        fn test_even();
    }

    rule! {
        TestMinLen { min: usize };
        rule(self, input) { input.as_str().is_some_and(|s| s.len() >= self.min) }
        error(self, input) { ValidationError::new(format!("need {} chars", self.min)) }
        fn test_min_len(min: usize);
    }

    rule! {
        TestBetween { lo: i64, hi: i64 };
        rule(self, input) { input.as_i64().is_some_and(|n| (self.lo..=self.hi).contains(&n)) }
        error(self, input) { ValidationError::with_id("test.between") }
        new(lo: i64, hi: i64) -> SchemaError {
            if lo > hi {
                return Err(SchemaError::InvalidRange { min: lo.to_string(), max: hi.to_string() });
            }
            Ok(Self { lo, hi })
        }
        fn test_between(lo: i64, hi: i64) -> SchemaError;
    }

    rule! {
        TestPrefix { prefix: String };
        rule(self, input) { input.as_str().is_some_and(|s| s.starts_with(&self.prefix)) }
        error(self, input) { ValidationError::with_id("test.prefix") }
        new(prefix: &str) { Self { prefix: prefix.to_owned() } }
        fn test_prefix(prefix: &str);
    }

    #[test]
    fn test_unit_rule() {
        assert!(TestEven.check(&json!(4)).is_ok());
        let err = TestEven.check(&json!(3)).unwrap_err();
        assert_eq!(err.message_ids, vec!["test.even"]);
        assert_eq!(err.received.unwrap().value, json!(3));
        assert_eq!(TestEven::NAME, "TestEven");
    }

    #[test]
    fn test_struct_rule() {
        let rule = TestMinLen::new(3);
        assert!(rule.check(&json!("abc")).is_ok());
        assert_eq!(
            rule.check(&json!("ab")).unwrap_err().message.as_deref(),
            Some("need 3 chars")
        );
    }

    #[test]
    fn test_custom_new() {
        assert!(TestPrefix::new("ab").check(&json!("abc")).is_ok());
        assert!(TestPrefix::new("ab").check(&json!("xbc")).is_err());
    }

    #[test]
    fn test_fallible_factory() {
        assert!(test_between(1, 5).is_ok());
        assert!(matches!(
            test_between(5, 1),
            Err(SchemaError::InvalidRange { .. })
        ));
    }

    #[tokio::test]
    async fn test_factories_build_rules() {
        let ctx = ValidationContext::new();
        assert!(validate(&json!(2), &test_even(), &ctx).await.pass());
        assert!(!validate(&json!("a"), &test_min_len(2), &ctx).await.pass());
        assert!(!validate(&json!("zz"), &test_prefix("a"), &ctx).await.pass());
        // null never reaches the rule block
        assert!(validate(&Value::Null, &test_min_len(2), &ctx).await.pass());
    }

    #[tokio::test]
    async fn test_compose_concatenates() {
        let rule = compose![test_min_len(5), test_prefix("x")];
        let result = validate(&json!("abc"), &rule, &ValidationContext::new()).await;
        assert_eq!(result.errors().len(), 2);
    }
}
