//! End-to-end tests for filter ↔ predicate conversion through the facade.

use requery_rs::schema::{EntitySchema, SchemaRegistry};
use requery_rs::{
    Connective, DefaultFilterFactory, FilterCondition, FilterError, FilterFactory, FilterGroup,
    FilterOperation, FilterResolver, FilterWrapper, GroupOperation, Predicate, ValueType,
};
use serde_json::{json, Value as Json};

fn factory() -> DefaultFilterFactory {
    SchemaRegistry::new()
        .with(
            EntitySchema::new("user")
                .field("age", ValueType::Integer)
                .field("name", ValueType::Text)
                .field("status", ValueType::Text)
                .field("active", ValueType::Boolean)
                .field("joined", ValueType::Date)
                .relation("address", "address"),
        )
        .with(EntitySchema::new("address").field("city", ValueType::Text))
        .into()
}

fn rows() -> Vec<Json> {
    let statuses = ["A", "B", "C"];
    let names = ["John", "Joanna", "Bob", "jo", "100% Jo"];
    let cities = ["Sofia", "Varna"];

    let mut rows = vec![json!({}), json!({"age": null, "status": "A"})];
    for (i, age) in [5, 18, 19, 29, 30, 45].into_iter().enumerate() {
        rows.push(json!({
            "age": age,
            "name": names[i % names.len()],
            "status": statuses[i % statuses.len()],
            "active": i % 2 == 0,
            "joined": format!("2024-0{}-15", i % 9 + 1),
            "address": {"city": cities[i % cities.len()]},
        }));
    }
    rows
}

fn matching(predicate: &Predicate, rows: &[Json]) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| predicate.matches(row))
        .map(|(i, _)| i)
        .collect()
}

/// forward(reverse(forward(d))) matches the same rows as forward(d).
fn assert_stable(dsl: &str) -> FilterWrapper {
    let factory = factory();
    let rows = rows();

    let wrapper = FilterWrapper::from_json(dsl).unwrap();
    let predicate = factory.to_predicate(&wrapper, "user").unwrap();
    let reversed = factory.to_wrapper(&predicate, "user").unwrap();
    let again = factory.to_predicate(&reversed, "user").unwrap();

    assert_eq!(
        matching(&again, &rows),
        matching(&predicate, &rows),
        "{dsl} reversed to {reversed:?}"
    );
    assert_eq!(again, predicate);
    reversed
}

#[test]
fn test_simple_list_scenario() {
    let dsl = r#"[{"field":"age","operator":"gt","value":18},
                  {"field":"name","operator":"like","value":"Jo"}]"#;

    let factory = factory();
    let wrapper = FilterWrapper::from_json(dsl).unwrap();
    let predicate = factory.to_predicate(&wrapper, "user").unwrap();
    assert_eq!(predicate.to_string(), "age > 18 AND name LIKE '%Jo%'");

    let reversed = assert_stable(dsl);
    assert_eq!(
        reversed,
        FilterWrapper::Simple(vec![
            FilterCondition::new("age", FilterOperation::Gt, 18),
            FilterCondition::new("name", FilterOperation::Like, "Jo"),
        ])
    );

    let matched: Vec<String> = rows()
        .iter()
        .filter(|row| predicate.matches(row))
        .map(|row| row["name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(matched, vec!["100% Jo", "John"]);
}

#[test]
fn test_nested_group_scenario() {
    let dsl = r#"{"operator":"OR","operations":[
        {"field":"status","operator":"eq","value":"A"},
        {"operator":"AND","operations":[
            {"field":"status","operator":"eq","value":"B"},
            {"field":"age","operator":"lt","value":30}]}]}"#;

    let factory = factory();
    let predicate = factory
        .to_predicate(&FilterWrapper::from_json(dsl).unwrap(), "user")
        .unwrap();
    assert_eq!(
        predicate.to_string(),
        "status = 'A' OR (status = 'B' AND age < 30)"
    );

    let reversed = assert_stable(dsl);
    let FilterWrapper::Complex(group) = &reversed else {
        panic!("expected a group, got {reversed:?}");
    };
    assert_eq!(group.operator, Connective::Or);
    assert!(group.right_side_operands.is_some());

    // One more forward pass over the reversed form is stable too.
    let json = serde_json::to_string(&reversed).unwrap();
    assert_eq!(assert_stable(&json), reversed);
}

#[test]
fn test_empty_filter_matches_every_row() {
    let factory = factory();
    let predicate = factory.to_predicate(&FilterWrapper::Empty, "user").unwrap();
    let rows = rows();
    assert_eq!(matching(&predicate, &rows).len(), rows.len());
    assert_eq!(
        factory.to_wrapper(&Predicate::Always, "user").unwrap(),
        FilterWrapper::Empty
    );
}

#[test]
fn test_single_condition_and_one_element_list_agree() {
    let factory = factory();
    let single = FilterWrapper::from_json(r#"{"field":"status","operator":"eq","value":"A"}"#)
        .unwrap();
    let list = FilterWrapper::from_json(r#"[{"field":"status","operator":"eq","value":"A"}]"#)
        .unwrap();
    assert_eq!(
        factory.to_predicate(&single, "user").unwrap(),
        factory.to_predicate(&list, "user").unwrap()
    );
}

#[test]
fn test_uniform_and_group_collapses_to_list() {
    let reversed = assert_stable(
        r#"{"operator":"AND","operations":[
            {"field":"age","operator":"gte","value":18},
            {"field":"active","operator":"eq","value":true},
            {"field":"address.city","operator":"in","value":["Sofia"]}]}"#,
    );
    assert!(matches!(reversed, FilterWrapper::Simple(ref c) if c.len() == 3));
}

#[test]
fn test_uniform_or_group_stays_a_group() {
    let reversed = assert_stable(
        r#"{"operator":"OR","operations":[
            {"field":"age","operator":"lt","value":18},
            {"field":"name","operator":"begins_with","value":"Jo"}]}"#,
    );
    assert_eq!(
        reversed,
        FilterWrapper::Complex(FilterGroup::or([
            FilterCondition::new("age", FilterOperation::Lt, 18),
            FilterCondition::new("name", FilterOperation::BeginsWith, "Jo"),
        ]))
    );
}

#[test]
fn test_mixed_connectives_round_trip() {
    let dsl = r#"{"operator":"AND","nonPriorityGroupOperators":["OR","AND"],"operations":[
        {"field":"status","operator":"eq","value":"A"},
        {"field":"status","operator":"eq","value":"B"},
        {"field":"age","operator":"between","value":[18,30]}]}"#;

    let reversed = assert_stable(dsl);
    let FilterWrapper::Complex(group) = reversed else {
        panic!("expected a group");
    };
    assert_eq!(
        group.non_priority_operators,
        Some(vec![Connective::Or, Connective::And])
    );
}

#[test]
fn test_deeply_nested_groups_round_trip() {
    assert_stable(
        r#"{"operator":"AND","operations":[
            {"operator":"OR","operations":[
                {"field":"status","operator":"eq","value":"A"},
                {"field":"status","operator":"eq","value":"C"}]},
            {"operator":"OR","operations":[
                {"field":"age","operator":"is_null"},
                {"operator":"AND","operations":[
                    {"field":"age","operator":"gte","value":19},
                    {"field":"name","operator":"ends_with","value":"b"}]}]},
            {"field":"joined","operator":"gt","value":"2024-02-01"}]}"#,
    );
}

#[test]
fn test_all_operators_round_trip() {
    assert_stable(
        r#"[{"field":"age","operator":"ne","value":5},
            {"field":"age","operator":"lte","value":"45"},
            {"field":"age","operator":"not_in","value":[1,2]},
            {"field":"name","operator":"contains","value":"o"},
            {"field":"name","operator":"is_not_null"},
            {"field":"joined","operator":"between","value":["2024-01-01","2024-12-31"]}]"#,
    );
}

#[test]
fn test_arity_errors() {
    let factory = factory();
    for dsl in [
        r#"{"field":"age","operator":"between","value":[1]}"#,
        r#"{"field":"age","operator":"between","value":[1,2,3]}"#,
        r#"{"field":"age","operator":"is_null","value":3}"#,
    ] {
        let err = factory
            .to_predicate(&FilterWrapper::from_json(dsl).unwrap(), "user")
            .unwrap_err();
        assert!(
            matches!(err, FilterError::UnsupportedOperatorArity { .. }),
            "{dsl}: {err}"
        );
    }
}

#[test]
fn test_unknown_field_deep_in_group_aborts() {
    let factory = factory();
    let wrapper = FilterWrapper::Complex(FilterGroup::and([
        GroupOperation::Condition(FilterCondition::new("age", FilterOperation::Gt, 1)),
        GroupOperation::Group(FilterGroup::or([
            GroupOperation::Condition(FilterCondition::new("status", FilterOperation::Eq, "A")),
            GroupOperation::Group(FilterGroup::and([FilterCondition::new(
                "address.ciyt",
                FilterOperation::Eq,
                "Sofia",
            )])),
        ])),
    ]));

    let err = factory.to_predicate(&wrapper, "user").unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown field 'address.ciyt' on entity 'user' (did you mean 'address.city'?)"
    );
}

#[test]
fn test_resolver_to_sql() {
    let resolver = FilterResolver::default();
    let wrapper = resolver.resolve_query(
        "page=3&complexFilter=%7B%22operator%22%3A%22OR%22%2C%22operations%22%3A%5B%7B%22field%22%3A%22age%22%2C%22operator%22%3A%22lt%22%2C%22value%22%3A18%7D%2C%7B%22field%22%3A%22address.city%22%2C%22operator%22%3A%22eq%22%2C%22value%22%3A%22Sofia%22%7D%5D%7D",
    );

    let sql = factory().to_predicate(&wrapper, "user").unwrap().to_sql();
    assert_eq!(sql.clause, r#""age" < ? OR "address"."city" = ?"#);
    assert_eq!(sql.params.len(), 2);
}

#[test]
fn test_malformed_query_filter_is_no_filter() {
    let wrapper = FilterResolver::default().resolve_query("filter=%5B%7B");
    assert!(wrapper.is_empty());
}
