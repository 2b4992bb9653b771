//! Property-based tests for gatekeep-validator.

use futures::executor::block_on;
use gatekeep_validator::prelude::*;
use proptest::prelude::*;
use serde_json::{Value, json};

fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1.0e6..1.0e6f64).prop_map(|n| json!(n)),
        ".{0,12}".prop_map(Value::String),
    ]
}

fn json_value() -> impl Strategy<Value = Value> {
    json_leaf().prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-c]", inner, 0..3)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn library() -> Vec<ValidationRule> {
    vec![
        required(),
        not_empty(),
        datatype(DataType::Number),
        integer(),
        positive(),
        min(0.0),
        max(10.0),
        in_range(-5.0, 5.0).unwrap(),
        min_length(2),
        max_length(4),
        exact_length(3),
        pattern("^[a-z]*$").unwrap(),
        one_of([json!("a"), json!(1)]),
        not_one_of([json!(true)]),
        custom("isShort", |v| v.as_str().is_some_and(|s| s.len() < 5)),
    ]
}

// ============================================================================
// RESULT INVARIANTS
// ============================================================================

proptest! {
    #[test]
    fn pass_iff_no_errors(value in json_value()) {
        let ctx = ValidationContext::new();
        for rule in library() {
            let result = block_on(validate(&value, &rule, &ctx));
            prop_assert_eq!(result.pass(), result.errors().is_empty(), "rule {}", rule.name());
        }
    }

    #[test]
    fn composite_is_concatenation(value in json_value()) {
        let ctx = ValidationContext::new();
        let separate: Vec<_> = library()
            .iter()
            .flat_map(|rule| block_on(validate(&value, rule, &ctx)).into_errors())
            .collect();
        let combined = block_on(validate(&value, &library().into_iter().collect::<RuleAggregator>().composite(), &ctx));
        prop_assert_eq!(combined.errors(), separate.as_slice());
    }

    #[test]
    fn null_passes_everything_but_required(_seed in any::<u8>()) {
        let ctx = ValidationContext::new();
        for rule in library().into_iter().skip(1) {
            prop_assert!(block_on(validate(&Value::Null, &rule, &ctx)).pass(), "rule {}", rule.name());
        }
        prop_assert!(!block_on(validate(&Value::Null, &required(), &ctx)).pass());
    }

    #[test]
    fn length_counts_chars(s in "\\PC{0,10}", n in 0usize..12) {
        let ctx = ValidationContext::new();
        let value = Value::String(s.clone());
        let result = block_on(validate(&value, &min_length(n), &ctx));
        prop_assert_eq!(result.pass(), s.chars().count() >= n);
    }
}

// ============================================================================
// SCOPE ALGEBRA
// ============================================================================

proptest! {
    #[test]
    fn scope_combine(results in prop::collection::vec(any::<bool>(), 0..8)) {
        prop_assert_eq!(Scope::All.combine(&results), results.iter().all(|r| *r));
        prop_assert_eq!(Scope::Any.combine(&results), results.iter().any(|r| *r));
        prop_assert_eq!(Scope::None.combine(&results), !Scope::Any.combine(&results));
    }

    #[test]
    fn named_conditions_follow_scope(
        flags in prop::collection::vec(any::<bool>(), 1..6),
        scope in prop_oneof![Just(Scope::All), Just(Scope::Any), Just(Scope::None)],
    ) {
        let names: Vec<String> = (0..flags.len()).map(|i| format!("c{i}")).collect();
        let ctx = ValidationContext::builder()
            .conditions(names.iter().cloned().zip(flags.iter().map(|f| ConditionEntry::from(*f))))
            .build();
        let spec = ConditionsSpec::new(names.iter().map(String::as_str), scope);

        let open = block_on(evaluate_all(&spec, &Value::Null, &ctx));
        prop_assert_eq!(open, scope.combine(&flags));

        // a closed gate never fails
        let rule = required().when_spec(spec);
        let result = block_on(validate_conditional(&Value::Null, &rule, &ctx));
        prop_assert_eq!(result.pass(), !open);
    }

    #[test]
    fn wildcard_tag_matches_any_operation(op in "[a-zA-Z_]{1,16}") {
        prop_assert!(OperationTag::Wildcard.matches(&op));
        prop_assert!(OperationTag::operation("*").matches(&op));
        prop_assert_eq!(OperationTag::operation(op.clone()).matches("other-op"), op == "other-op");
    }
}
