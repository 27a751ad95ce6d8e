//! The JSON filter DSL.
//!
//! A filter is either a flat list of conditions that are implicitly
//! AND-combined, or a group that states its own connective and may nest
//! further groups:
//!
//! ```text
//! [{"field": "age", "operator": "gt", "value": 18},
//!  {"field": "name", "operator": "like", "value": "Jo"}]
//!
//! {"operator": "OR", "operations": [
//!     {"field": "status", "operator": "eq", "value": "A"},
//!     {"operator": "AND", "operations": [
//!         {"field": "status", "operator": "eq", "value": "B"},
//!         {"field": "age", "operator": "lt", "value": 30}]}]}
//! ```
//!
//! [`FilterWrapper`] tags which of the two forms (or neither) a request
//! carried.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::error::{FilterError, FilterResult};

/// Query parameter carrying the simple (flat list) form.
pub const SIMPLE_FILTER_PARAM: &str = "filter";

/// Query parameter carrying the complex (group) form.
pub const COMPLEX_FILTER_PARAM: &str = "complexFilter";

// ==================== Operators ====================

/// How many values an operator takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many values.
    Exactly(usize),
    /// One or more values.
    AtLeastOne,
}

impl Arity {
    /// Returns true if `count` values satisfy this arity.
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == *n,
            Arity::AtLeastOne => count >= 1,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {n}"),
            Arity::AtLeastOne => f.write_str("at least 1"),
        }
    }
}

/// The operator of a single filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FilterOperation {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Substring match.
    Like,
    BeginsWith,
    EndsWith,
    In,
    NotIn,
    Between,
    IsNull,
    IsNotNull,
}

impl FilterOperation {
    /// Returns the canonical JSON spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperation::Eq => "eq",
            FilterOperation::Ne => "ne",
            FilterOperation::Gt => "gt",
            FilterOperation::Gte => "gte",
            FilterOperation::Lt => "lt",
            FilterOperation::Lte => "lte",
            FilterOperation::Like => "like",
            FilterOperation::BeginsWith => "begins_with",
            FilterOperation::EndsWith => "ends_with",
            FilterOperation::In => "in",
            FilterOperation::NotIn => "not_in",
            FilterOperation::Between => "between",
            FilterOperation::IsNull => "is_null",
            FilterOperation::IsNotNull => "is_not_null",
        }
    }

    /// Returns how many values the operator takes.
    pub fn arity(&self) -> Arity {
        match self {
            FilterOperation::In | FilterOperation::NotIn => Arity::AtLeastOne,
            FilterOperation::Between => Arity::Exactly(2),
            FilterOperation::IsNull | FilterOperation::IsNotNull => Arity::Exactly(0),
            _ => Arity::Exactly(1),
        }
    }

    /// Returns true for operators whose value is always written as an array.
    pub fn takes_list(&self) -> bool {
        matches!(
            self,
            FilterOperation::In | FilterOperation::NotIn | FilterOperation::Between
        )
    }

    /// Returns true for the text pattern operators.
    pub fn is_pattern(&self) -> bool {
        matches!(
            self,
            FilterOperation::Like | FilterOperation::BeginsWith | FilterOperation::EndsWith
        )
    }

    /// Returns true for the ordering operators.
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            FilterOperation::Gt
                | FilterOperation::Gte
                | FilterOperation::Lt
                | FilterOperation::Lte
                | FilterOperation::Between
        )
    }

    /// Checks that `count` values fit this operator.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnsupportedOperatorArity` on mismatch.
    pub fn check_arity(&self, count: usize) -> FilterResult<()> {
        let arity = self.arity();
        if arity.accepts(count) {
            Ok(())
        } else {
            Err(FilterError::arity(self.as_str(), arity.to_string(), count))
        }
    }
}

impl fmt::Display for FilterOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperation {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        let operation = match normalized.as_str() {
            "eq" | "equals" | "=" => FilterOperation::Eq,
            "ne" | "neq" | "not_eq" | "!=" => FilterOperation::Ne,
            "gt" | ">" => FilterOperation::Gt,
            "gte" | "ge" | ">=" => FilterOperation::Gte,
            "lt" | "<" => FilterOperation::Lt,
            "lte" | "le" | "<=" => FilterOperation::Lte,
            "like" | "contains" => FilterOperation::Like,
            "begins_with" | "starts_with" => FilterOperation::BeginsWith,
            "ends_with" => FilterOperation::EndsWith,
            "in" => FilterOperation::In,
            "not_in" | "nin" => FilterOperation::NotIn,
            "between" => FilterOperation::Between,
            "is_null" | "null" | "empty" => FilterOperation::IsNull,
            "is_not_null" | "not_null" | "not_empty" => FilterOperation::IsNotNull,
            _ => return Err(FilterError::parse(format!("unknown operator: {s}"))),
        };
        Ok(operation)
    }
}

impl TryFrom<String> for FilterOperation {
    type Error = FilterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FilterOperation> for String {
    fn from(op: FilterOperation) -> Self {
        op.as_str().to_string()
    }
}

/// The logical connective of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    /// Returns the canonical JSON spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Connective {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AND" | "&&" | "&" => Ok(Connective::And),
            "OR" | "||" | "|" => Ok(Connective::Or),
            _ => Err(FilterError::parse(format!("unknown group operator: {s}"))),
        }
    }
}

impl TryFrom<String> for Connective {
    type Error = FilterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Connective> for String {
    fn from(c: Connective) -> Self {
        c.as_str().to_string()
    }
}

// ==================== Conditions and groups ====================

/// A single `field`/`operator`/`value` filter unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// Field name or dotted path in the target entity.
    pub field: String,
    /// The comparison to apply.
    pub operator: FilterOperation,
    /// A scalar, an array of scalars, or null when the operator takes none.
    #[serde(default, skip_serializing_if = "Json::is_null")]
    pub value: Json,
}

impl FilterCondition {
    /// Creates a condition with a scalar or array value.
    pub fn new(field: impl Into<String>, operator: FilterOperation, value: impl Into<Json>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Creates a condition that carries no value, such as a null check.
    pub fn without_value(field: impl Into<String>, operator: FilterOperation) -> Self {
        Self {
            field: field.into(),
            operator,
            value: Json::Null,
        }
    }

    /// Returns the supplied literals: the array elements, the single
    /// scalar, or nothing for null.
    pub fn values(&self) -> &[Json] {
        match &self.value {
            Json::Null => &[],
            Json::Array(items) => items,
            scalar => std::slice::from_ref(scalar),
        }
    }
}

/// One entry of a group: a condition or a nested group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GroupOperation {
    Condition(FilterCondition),
    Group(FilterGroup),
}

impl<'de> Deserialize<'de> for GroupOperation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = Json::deserialize(deserializer)?;
        let is_group = json
            .as_object()
            .is_some_and(|obj| obj.contains_key("operations") || obj.contains_key("groupOperations"));

        if is_group {
            FilterGroup::deserialize(json)
                .map(GroupOperation::Group)
                .map_err(de::Error::custom)
        } else {
            FilterCondition::deserialize(json)
                .map(GroupOperation::Condition)
                .map_err(de::Error::custom)
        }
    }
}

impl From<FilterCondition> for GroupOperation {
    fn from(condition: FilterCondition) -> Self {
        GroupOperation::Condition(condition)
    }
}

impl From<FilterGroup> for GroupOperation {
    fn from(group: FilterGroup) -> Self {
        GroupOperation::Group(group)
    }
}

/// A logical combination of conditions and nested groups.
///
/// `non_priority_operators` and `right_side_operands` are reconstruction
/// artifacts written by the reverse factory when a predicate tree does not
/// fold into a single uniform group. Hand-written filters should leave them
/// unset and nest groups instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    /// Connective applied between operations unless overridden per position.
    #[serde(alias = "groupOperator")]
    pub operator: Connective,

    /// Ordered operands of the group.
    #[serde(alias = "groupOperations")]
    pub operations: Vec<GroupOperation>,

    /// Per-position connectives for mixed AND/OR chains. Entry `i` joins the
    /// fold of operations `0..=i` with operation `i + 1`; a trailing extra
    /// entry joins `right_side_operands`.
    #[serde(
        rename = "nonPriorityGroupOperators",
        alias = "nonPriorityOperators",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub non_priority_operators: Option<Vec<Connective>>,

    /// Right-hand sub-expression joined after all operations.
    #[serde(
        rename = "rightSideOperands",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub right_side_operands: Option<Box<FilterGroup>>,
}

impl FilterGroup {
    /// Creates a uniform group.
    pub fn new(operator: Connective, operations: Vec<GroupOperation>) -> Self {
        Self {
            operator,
            operations,
            non_priority_operators: None,
            right_side_operands: None,
        }
    }

    /// Creates a uniform AND group.
    pub fn and(operations: impl IntoIterator<Item = impl Into<GroupOperation>>) -> Self {
        Self::new(
            Connective::And,
            operations.into_iter().map(Into::into).collect(),
        )
    }

    /// Creates a uniform OR group.
    pub fn or(operations: impl IntoIterator<Item = impl Into<GroupOperation>>) -> Self {
        Self::new(
            Connective::Or,
            operations.into_iter().map(Into::into).collect(),
        )
    }

    /// Returns the connective joining position `index` (0-based pair index),
    /// honoring per-position overrides.
    pub fn connective_at(&self, index: usize) -> Connective {
        self.non_priority_operators
            .as_ref()
            .and_then(|ops| ops.get(index).copied())
            .unwrap_or(self.operator)
    }

    /// Returns true if the group carries reconstruction artifacts.
    pub fn is_reconstructed(&self) -> bool {
        self.non_priority_operators.is_some() || self.right_side_operands.is_some()
    }
}

// ==================== Wrapper ====================

/// The filter carried by a request: nothing, a flat list, or a group.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FilterWrapper {
    /// No filter was supplied.
    #[default]
    Empty,
    /// Conditions combined with AND, in order.
    Simple(Vec<FilterCondition>),
    /// A nested logical group.
    Complex(FilterGroup),
}

impl FilterWrapper {
    /// Folds the wrapper by form.
    ///
    /// This is the only way the converters look at the tag, so adding a form
    /// forces every consumer to handle it.
    pub fn resolve<'a, R>(
        &'a self,
        on_simple: impl FnOnce(&'a [FilterCondition]) -> R,
        on_complex: impl FnOnce(&'a FilterGroup) -> R,
        on_empty: impl FnOnce() -> R,
    ) -> R {
        match self {
            FilterWrapper::Simple(conditions) => on_simple(conditions),
            FilterWrapper::Complex(group) => on_complex(group),
            FilterWrapper::Empty => on_empty(),
        }
    }

    /// Returns true if no filter was supplied.
    pub fn is_empty(&self) -> bool {
        matches!(self, FilterWrapper::Empty)
    }

    /// Parses the simple form: a single condition object, or an array of them.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Parse` if the JSON is malformed.
    pub fn from_simple_json(input: &str) -> FilterResult<Self> {
        let trimmed = input.trim();
        if trimmed.starts_with('[') {
            let conditions: Vec<FilterCondition> = serde_json::from_str(trimmed)?;
            return Ok(FilterWrapper::Simple(conditions));
        }

        let condition: Option<FilterCondition> = serde_json::from_str(trimmed)?;
        Ok(condition
            .map(|c| FilterWrapper::Simple(vec![c]))
            .unwrap_or_default())
    }

    /// Parses the complex form: a single group object.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Parse` if the JSON is malformed.
    pub fn from_complex_json(input: &str) -> FilterResult<Self> {
        let group: Option<FilterGroup> = serde_json::from_str(input.trim())?;
        Ok(group.map(FilterWrapper::Complex).unwrap_or_default())
    }

    /// Parses either form, telling them apart by shape: `null` is empty, an
    /// array or an object without `operations` is simple, anything else is a
    /// group.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Parse` if the JSON is malformed.
    pub fn from_json(input: &str) -> FilterResult<Self> {
        let json: Json = serde_json::from_str(input.trim())?;
        Ok(serde_json::from_value(json)?)
    }

    /// Returns the query parameter name and JSON payload that carry this
    /// filter, or `None` for the empty wrapper.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Parse` if serialization fails.
    pub fn to_query_param(&self) -> FilterResult<Option<(&'static str, String)>> {
        let param = match self {
            FilterWrapper::Empty => None,
            FilterWrapper::Simple(conditions) => {
                Some((SIMPLE_FILTER_PARAM, serde_json::to_string(conditions)?))
            }
            FilterWrapper::Complex(group) => {
                Some((COMPLEX_FILTER_PARAM, serde_json::to_string(group)?))
            }
        };
        Ok(param)
    }
}

impl From<FilterCondition> for FilterWrapper {
    fn from(condition: FilterCondition) -> Self {
        FilterWrapper::Simple(vec![condition])
    }
}

impl From<Vec<FilterCondition>> for FilterWrapper {
    fn from(conditions: Vec<FilterCondition>) -> Self {
        FilterWrapper::Simple(conditions)
    }
}

impl From<FilterGroup> for FilterWrapper {
    fn from(group: FilterGroup) -> Self {
        FilterWrapper::Complex(group)
    }
}

impl Serialize for FilterWrapper {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FilterWrapper::Empty => serializer.serialize_none(),
            FilterWrapper::Simple(conditions) => conditions.serialize(serializer),
            FilterWrapper::Complex(group) => group.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for FilterWrapper {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = Json::deserialize(deserializer)?;
        let is_group = json
            .as_object()
            .is_some_and(|obj| obj.contains_key("operations") || obj.contains_key("groupOperations"));

        match json {
            Json::Null => Ok(FilterWrapper::Empty),
            Json::Array(_) => Vec::<FilterCondition>::deserialize(json)
                .map(FilterWrapper::Simple)
                .map_err(de::Error::custom),
            Json::Object(_) if is_group => FilterGroup::deserialize(json)
                .map(FilterWrapper::Complex)
                .map_err(de::Error::custom),
            Json::Object(_) => FilterCondition::deserialize(json)
                .map(FilterWrapper::from)
                .map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "expected a filter object or array, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_parse_is_case_insensitive_with_aliases() {
        assert_eq!("EQ".parse::<FilterOperation>().unwrap(), FilterOperation::Eq);
        assert_eq!("gte".parse::<FilterOperation>().unwrap(), FilterOperation::Gte);
        assert_eq!(">=".parse::<FilterOperation>().unwrap(), FilterOperation::Gte);
        assert_eq!(
            "Contains".parse::<FilterOperation>().unwrap(),
            FilterOperation::Like
        );
        assert_eq!(
            "not-in".parse::<FilterOperation>().unwrap(),
            FilterOperation::NotIn
        );
        assert!(matches!(
            "regex".parse::<FilterOperation>(),
            Err(FilterError::Parse { .. })
        ));
    }

    #[test]
    fn test_operation_arity() {
        assert!(FilterOperation::Between.arity().accepts(2));
        assert!(!FilterOperation::Between.arity().accepts(3));
        assert!(FilterOperation::In.arity().accepts(5));
        assert!(!FilterOperation::In.arity().accepts(0));
        assert!(FilterOperation::IsNull.arity().accepts(0));
        assert!(FilterOperation::IsNull.check_arity(1).is_err());
    }

    #[test]
    fn test_condition_values_cardinality() {
        let scalar = FilterCondition::new("age", FilterOperation::Gt, 18);
        assert_eq!(scalar.values(), &[json!(18)]);

        let list = FilterCondition::new("age", FilterOperation::Between, json!([1, 2]));
        assert_eq!(list.values().len(), 2);

        let none = FilterCondition::without_value("age", FilterOperation::IsNull);
        assert!(none.values().is_empty());
    }

    #[test]
    fn test_condition_deserialize_without_value() {
        let condition: FilterCondition =
            serde_json::from_str(r#"{"field":"deletedAt","operator":"IS_NULL"}"#).unwrap();
        assert_eq!(condition.operator, FilterOperation::IsNull);
        assert!(condition.value.is_null());
    }

    #[test]
    fn test_condition_serialize_skips_null_value() {
        let condition = FilterCondition::without_value("deletedAt", FilterOperation::IsNull);
        assert_eq!(
            serde_json::to_value(&condition).unwrap(),
            json!({"field": "deletedAt", "operator": "is_null"})
        );
    }

    #[test]
    fn test_group_deserialize_nested() {
        let group: FilterGroup = serde_json::from_value(json!({
            "operator": "or",
            "operations": [
                {"field": "status", "operator": "eq", "value": "A"},
                {"operator": "AND", "operations": [
                    {"field": "status", "operator": "eq", "value": "B"},
                    {"field": "age", "operator": "lt", "value": 30}
                ]}
            ]
        }))
        .unwrap();

        assert_eq!(group.operator, Connective::Or);
        assert!(matches!(group.operations[0], GroupOperation::Condition(_)));
        let GroupOperation::Group(inner) = &group.operations[1] else {
            panic!("expected nested group");
        };
        assert_eq!(inner.operator, Connective::And);
        assert_eq!(inner.operations.len(), 2);
        assert!(!group.is_reconstructed());
    }

    #[test]
    fn test_group_reconstruction_fields_round_trip_names() {
        let group = FilterGroup {
            operator: Connective::And,
            operations: vec![FilterCondition::new("a", FilterOperation::Eq, 1).into()],
            non_priority_operators: Some(vec![Connective::Or]),
            right_side_operands: Some(Box::new(FilterGroup::and([FilterCondition::new(
                "b",
                FilterOperation::Eq,
                2,
            )]))),
        };

        assert!(group.is_reconstructed());

        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json["nonPriorityGroupOperators"], json!(["OR"]));
        assert_eq!(json["rightSideOperands"]["operator"], json!("AND"));

        let back: FilterGroup = serde_json::from_value(json).unwrap();
        assert_eq!(back, group);
    }

    #[test]
    fn test_group_accepts_short_alias_for_non_priority() {
        let group: FilterGroup = serde_json::from_value(json!({
            "operator": "AND",
            "operations": [
                {"field": "a", "operator": "eq", "value": 1},
                {"field": "b", "operator": "eq", "value": 2}
            ],
            "nonPriorityOperators": ["OR"]
        }))
        .unwrap();
        assert_eq!(group.connective_at(0), Connective::Or);
        assert_eq!(group.connective_at(5), Connective::And);
    }

    #[test]
    fn test_group_rejects_bad_connective() {
        let result: Result<FilterGroup, _> = serde_json::from_value(json!({
            "operator": "XOR",
            "operations": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_wrapper_from_simple_json_single_object() {
        let wrapper =
            FilterWrapper::from_simple_json(r#"{"field":"age","operator":"gt","value":18}"#)
                .unwrap();
        assert_eq!(
            wrapper,
            FilterWrapper::Simple(vec![FilterCondition::new("age", FilterOperation::Gt, 18)])
        );
    }

    #[test]
    fn test_wrapper_from_simple_json_array() {
        let wrapper = FilterWrapper::from_simple_json(
            r#" [{"field":"age","operator":"gt","value":18},
                 {"field":"name","operator":"like","value":"Jo"}]"#,
        )
        .unwrap();
        let FilterWrapper::Simple(conditions) = wrapper else {
            panic!("expected simple form");
        };
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[1].operator, FilterOperation::Like);
    }

    #[test]
    fn test_wrapper_from_simple_json_null_is_empty() {
        assert_eq!(
            FilterWrapper::from_simple_json("null").unwrap(),
            FilterWrapper::Empty
        );
    }

    #[test]
    fn test_wrapper_from_simple_json_malformed() {
        assert!(matches!(
            FilterWrapper::from_simple_json("{\"field\":"),
            Err(FilterError::Parse { .. })
        ));
    }

    #[test]
    fn test_wrapper_from_complex_json() {
        let wrapper = FilterWrapper::from_complex_json(
            r#"{"operator":"AND","operations":[{"field":"a","operator":"eq","value":1}]}"#,
        )
        .unwrap();
        assert!(matches!(wrapper, FilterWrapper::Complex(_)));
    }

    #[test]
    fn test_wrapper_from_json_detects_form() {
        assert!(matches!(
            FilterWrapper::from_json(r#"{"field":"a","operator":"eq","value":1}"#).unwrap(),
            FilterWrapper::Simple(ref c) if c.len() == 1
        ));
        assert!(matches!(
            FilterWrapper::from_json(r#"{"operator":"OR","operations":[]}"#).unwrap(),
            FilterWrapper::Complex(_)
        ));
        assert_eq!(FilterWrapper::from_json("null").unwrap(), FilterWrapper::Empty);
        assert!(FilterWrapper::from_json("42").is_err());
    }

    #[test]
    fn test_wrapper_resolve_dispatches_by_form() {
        let simple = FilterWrapper::from(FilterCondition::new("a", FilterOperation::Eq, 1));
        let complex = FilterWrapper::from(FilterGroup::or([FilterCondition::new(
            "a",
            FilterOperation::Eq,
            1,
        )]));

        let describe = |w: &FilterWrapper| {
            w.resolve(
                |c| format!("simple:{}", c.len()),
                |g| format!("complex:{}", g.operator),
                || "empty".to_string(),
            )
        };

        assert_eq!(describe(&simple), "simple:1");
        assert_eq!(describe(&complex), "complex:OR");
        assert_eq!(describe(&FilterWrapper::Empty), "empty");
    }

    #[test]
    fn test_wrapper_to_query_param() {
        let simple = FilterWrapper::from(FilterCondition::new("a", FilterOperation::Eq, 1));
        let (name, payload) = simple.to_query_param().unwrap().unwrap();
        assert_eq!(name, SIMPLE_FILTER_PARAM);
        assert_eq!(payload, r#"[{"field":"a","operator":"eq","value":1}]"#);

        let complex = FilterWrapper::from(FilterGroup::and([FilterCondition::new(
            "a",
            FilterOperation::Eq,
            1,
        )]));
        let (name, _) = complex.to_query_param().unwrap().unwrap();
        assert_eq!(name, COMPLEX_FILTER_PARAM);

        assert!(FilterWrapper::Empty.to_query_param().unwrap().is_none());
    }
}
