//! Tests for the reverse factory.

use super::*;
use crate::convert::build_predicate;
use crate::schema::EntitySchema;
use serde_json::json;

fn registry() -> SchemaRegistry {
    SchemaRegistry::new()
        .with(
            EntitySchema::new("user")
                .field("age", ValueType::Integer)
                .field("name", ValueType::Text)
                .field("status", ValueType::Text)
                .field("score", ValueType::Float)
                .relation("address", "address"),
        )
        .with(EntitySchema::new("address").field("city", ValueType::Text))
}

fn age(n: i64) -> Predicate {
    Predicate::leaf(Criterion::new(
        "age",
        ValueType::Integer,
        Test::Eq(Value::Integer(n)),
    ))
}

fn reverse(predicate: &Predicate) -> FilterResult<FilterWrapper> {
    build_dsl(&registry(), predicate, "user")
}

fn condition(n: i64) -> FilterCondition {
    FilterCondition::new("age", FilterOperation::Eq, n)
}

/// Reverse then forward must give back the same tree.
fn assert_round_trip(predicate: &Predicate) {
    let registry = registry();
    let wrapper = build_dsl(&registry, predicate, "user").unwrap();
    let rebuilt = build_predicate(&registry, &wrapper, "user").unwrap();
    assert_eq!(&rebuilt, predicate, "via {wrapper:?}");
}

// ==================== Shapes ====================

#[test]
fn test_always_is_empty() {
    assert_eq!(reverse(&Predicate::Always).unwrap(), FilterWrapper::Empty);
}

#[test]
fn test_leaf_is_single_element_list() {
    assert_eq!(
        reverse(&age(1)).unwrap(),
        FilterWrapper::Simple(vec![condition(1)])
    );
}

#[test]
fn test_and_chain_collapses_to_list() {
    let predicate = Predicate::conjunction(vec![age(1), age(2), age(3)]);
    assert_eq!(
        reverse(&predicate).unwrap(),
        FilterWrapper::Simple(vec![condition(1), condition(2), condition(3)])
    );
}

#[test]
fn test_or_chain_stays_a_group() {
    let predicate = Predicate::or(Predicate::or(age(1), age(2)), age(3));
    assert_eq!(
        reverse(&predicate).unwrap(),
        FilterWrapper::Complex(FilterGroup::or([condition(1), condition(2), condition(3)]))
    );
}

#[test]
fn test_mixed_chain_records_non_priority_operators() {
    let predicate = Predicate::and(Predicate::or(age(1), age(2)), age(3));
    let FilterWrapper::Complex(group) = reverse(&predicate).unwrap() else {
        panic!("expected a group");
    };

    assert_eq!(group.operator, Connective::Or);
    assert_eq!(
        group.non_priority_operators,
        Some(vec![Connective::Or, Connective::And])
    );
    assert_eq!(group.operations.len(), 3);
    assert!(group.right_side_operands.is_none());
}

#[test]
fn test_composite_right_operand_becomes_right_side() {
    let predicate = Predicate::or(age(1), Predicate::and(age(2), age(3)));
    let FilterWrapper::Complex(group) = reverse(&predicate).unwrap() else {
        panic!("expected a group");
    };

    assert_eq!(group.operator, Connective::Or);
    assert_eq!(
        group.operations,
        vec![GroupOperation::Condition(condition(1))]
    );
    assert_eq!(group.non_priority_operators, None);
    assert_eq!(
        group.right_side_operands.as_deref(),
        Some(&FilterGroup::and([condition(2), condition(3)]))
    );
}

#[test]
fn test_and_with_composite_right_is_not_collapsed() {
    let predicate = Predicate::and(age(1), Predicate::and(age(2), age(3)));
    assert!(matches!(
        reverse(&predicate).unwrap(),
        FilterWrapper::Complex(_)
    ));
    assert_round_trip(&predicate);
}

#[test]
fn test_leaf_after_right_side_nests_left_part() {
    // (a OR (b AND c)) AND d
    let predicate = Predicate::and(
        Predicate::or(age(1), Predicate::and(age(2), age(3))),
        age(4),
    );
    let FilterWrapper::Complex(group) = reverse(&predicate).unwrap() else {
        panic!("expected a group");
    };

    assert_eq!(group.operator, Connective::And);
    assert_eq!(group.operations.len(), 2);
    assert!(matches!(group.operations[0], GroupOperation::Group(_)));
    assert_eq!(group.operations[1], GroupOperation::Condition(condition(4)));
    assert_round_trip(&predicate);
}

#[test]
fn test_composite_after_right_side_nests_left_part() {
    // (a AND (b OR c)) OR (d AND e)
    let predicate = Predicate::or(
        Predicate::and(age(1), Predicate::or(age(2), age(3))),
        Predicate::and(age(4), age(5)),
    );
    let FilterWrapper::Complex(group) = reverse(&predicate).unwrap() else {
        panic!("expected a group");
    };

    assert_eq!(group.operations.len(), 1);
    assert!(group.right_side_operands.is_some());
    assert_round_trip(&predicate);
}

#[test]
fn test_round_trip_assorted_shapes() {
    let shapes = vec![
        Predicate::or(age(1), age(2)),
        Predicate::and(Predicate::or(age(1), age(2)), Predicate::or(age(3), age(4))),
        Predicate::or(
            Predicate::and(Predicate::and(age(1), age(2)), age(3)),
            Predicate::and(age(4), Predicate::or(age(5), age(6))),
        ),
        Predicate::and(
            Predicate::or(Predicate::and(age(1), age(2)), age(3)),
            Predicate::or(age(4), age(5)),
        ),
    ];

    for shape in &shapes {
        assert_round_trip(shape);
    }
}

// ==================== Leaves ====================

#[test]
fn test_patterns_are_classified() {
    let cases = [
        ("%Jo%", FilterOperation::Like),
        ("Jo%", FilterOperation::BeginsWith),
        ("%Jo", FilterOperation::EndsWith),
    ];

    for (like, operator) in cases {
        let predicate = Predicate::leaf(Criterion::new(
            "name",
            ValueType::Text,
            Test::Like(like.to_string()),
        ));
        assert_eq!(
            reverse(&predicate).unwrap(),
            FilterWrapper::Simple(vec![FilterCondition::new("name", operator, "Jo")])
        );
    }
}

#[test]
fn test_escaped_pattern_recovers_literal_text() {
    let predicate = Predicate::leaf(Criterion::new(
        "name",
        ValueType::Text,
        Test::Like("%100\\%%".to_string()),
    ));
    assert_eq!(
        reverse(&predicate).unwrap(),
        FilterWrapper::Simple(vec![FilterCondition::new(
            "name",
            FilterOperation::Like,
            "100%"
        )])
    );
}

#[test]
fn test_list_operators_render_arrays() {
    let predicate = Predicate::and(
        Predicate::leaf(Criterion::new(
            "age",
            ValueType::Integer,
            Test::In(vec![Value::Integer(7)]),
        )),
        Predicate::leaf(Criterion::new(
            "score",
            ValueType::Float,
            Test::Between(Value::Float(1.5), Value::Float(2.0)),
        )),
    );

    assert_eq!(
        reverse(&predicate).unwrap(),
        FilterWrapper::Simple(vec![
            FilterCondition::new("age", FilterOperation::In, json!([7])),
            FilterCondition::new("score", FilterOperation::Between, json!([1.5, 2.0])),
        ])
    );
}

#[test]
fn test_null_checks_carry_no_value() {
    let predicate = Predicate::leaf(Criterion::new("address.city", ValueType::Text, Test::IsNull));
    assert_eq!(
        reverse(&predicate).unwrap(),
        FilterWrapper::Simple(vec![FilterCondition::without_value(
            "address.city",
            FilterOperation::IsNull
        )])
    );
}

// ==================== Errors ====================

#[test]
fn test_negation_is_unsupported() {
    let err = reverse(&Predicate::negate(age(1))).unwrap_err();
    assert!(matches!(err, FilterError::UnsupportedPredicateShape { .. }));

    let err = reverse(&Predicate::and(age(1), Predicate::negate(age(2)))).unwrap_err();
    assert!(matches!(err, FilterError::UnsupportedPredicateShape { .. }));
}

#[test]
fn test_raw_and_nested_always_are_unsupported() {
    let err = reverse(&Predicate::or(Predicate::raw("x = 1"), age(1))).unwrap_err();
    assert!(matches!(err, FilterError::UnsupportedPredicateShape { .. }));

    let err = reverse(&Predicate::and(age(1), Predicate::Always)).unwrap_err();
    assert_eq!(
        err,
        FilterError::unsupported_shape("nested always-true predicate")
    );
}

#[test]
fn test_inner_wildcard_pattern_is_unsupported() {
    let predicate = Predicate::leaf(Criterion::new(
        "name",
        ValueType::Text,
        Test::Like("J%o".to_string()),
    ));
    assert!(matches!(
        reverse(&predicate).unwrap_err(),
        FilterError::UnsupportedPredicateShape { .. }
    ));
}

#[test]
fn test_unknown_field_is_rejected() {
    let predicate = Predicate::or(
        age(1),
        Predicate::leaf(Criterion::new(
            "nickname",
            ValueType::Text,
            Test::Eq(Value::from("x")),
        )),
    );
    assert!(matches!(
        reverse(&predicate).unwrap_err(),
        FilterError::UnknownField { .. }
    ));
}

#[test]
fn test_literal_of_wrong_type_is_rejected() {
    let predicate = Predicate::leaf(Criterion::new(
        "age",
        ValueType::Integer,
        Test::Eq(Value::from("old")),
    ));
    assert_eq!(
        reverse(&predicate).unwrap_err(),
        FilterError::type_coercion("age", "integer", "\"old\"")
    );
}

#[test]
fn test_literal_that_only_coerces_is_rejected() {
    let predicate = Predicate::leaf(Criterion::new(
        "age",
        ValueType::Integer,
        Test::Eq(Value::from("5")),
    ));
    assert_eq!(
        reverse(&predicate).unwrap_err(),
        FilterError::type_coercion("age", "integer", "\"5\"")
    );

    let predicate = Predicate::leaf(Criterion::new(
        "name",
        ValueType::Text,
        Test::In(vec![Value::from("Jo"), Value::Integer(5)]),
    ));
    assert!(matches!(
        reverse(&predicate).unwrap_err(),
        FilterError::TypeCoercion { .. }
    ));
}

#[test]
fn test_integer_literal_on_float_field_is_accepted() {
    let predicate = Predicate::leaf(Criterion::new(
        "score",
        ValueType::Float,
        Test::Gt(Value::Integer(2)),
    ));
    let wrapper = reverse(&predicate).unwrap();
    assert_eq!(
        wrapper,
        FilterWrapper::Simple(vec![FilterCondition::new("score", FilterOperation::Gt, 2)])
    );

    let rebuilt = build_predicate(&registry(), &wrapper, "user").unwrap();
    let row = json!({"score": 2.5});
    assert_eq!(rebuilt.matches(&row), predicate.matches(&row));
}

#[test]
fn test_leaf_typed_differently_from_field_is_rejected() {
    let predicate = Predicate::leaf(Criterion::new(
        "age",
        ValueType::Text,
        Test::Eq(Value::from("5")),
    ));
    assert!(matches!(
        reverse(&predicate).unwrap_err(),
        FilterError::UnsupportedPredicateShape { .. }
    ));
}
