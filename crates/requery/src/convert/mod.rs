//! Forward conversion: filter DSL to [`Predicate`].
//!
//! Every condition is resolved against the entity schema, arity-checked and
//! coerced before it becomes a leaf. The first failure aborts the build.
//!
//! # Example
//!
//! ```
//! use requery_rs::convert::build_predicate;
//! use requery_rs::schema::{EntitySchema, SchemaRegistry};
//! use requery_rs::{FilterWrapper, ValueType};
//!
//! let registry = SchemaRegistry::new().with(
//!     EntitySchema::new("user")
//!         .field("age", ValueType::Integer)
//!         .field("name", ValueType::Text),
//! );
//!
//! let wrapper = FilterWrapper::from_json(
//!     r#"[{"field": "age", "operator": "gt", "value": 18},
//!         {"field": "name", "operator": "like", "value": "Jo"}]"#,
//! )
//! .unwrap();
//!
//! let predicate = build_predicate(&registry, &wrapper, "user").unwrap();
//! assert_eq!(predicate.to_string(), "age > 18 AND name LIKE '%Jo%'");
//! ```

use serde_json::Value as Json;

use crate::dsl::{FilterCondition, FilterGroup, FilterOperation, FilterWrapper, GroupOperation};
use crate::error::{FilterError, FilterResult};
use crate::predicate::{pattern, Criterion, Predicate, Test};
use crate::schema::SchemaRegistry;
use crate::value::{Value, ValueType};


/// Builds a predicate from a filter for the given entity.
///
/// Shorthand for [`PredicateBuilder::new`] followed by
/// [`PredicateBuilder::build`].
///
/// # Errors
///
/// See [`PredicateBuilder::build`].
pub fn build_predicate(
    registry: &SchemaRegistry,
    wrapper: &FilterWrapper,
    entity: &str,
) -> FilterResult<Predicate> {
    PredicateBuilder::new(registry, entity).build(wrapper)
}

/// Converts DSL filters into predicates against one entity.
#[derive(Debug, Clone, Copy)]
pub struct PredicateBuilder<'a> {
    registry: &'a SchemaRegistry,
    entity: &'a str,
}

impl<'a> PredicateBuilder<'a> {
    /// Creates a builder resolving fields against `entity`.
    pub fn new(registry: &'a SchemaRegistry, entity: &'a str) -> Self {
        Self { registry, entity }
    }

    /// Builds the predicate for a filter.
    ///
    /// An empty filter, and an empty flat list, yield [`Predicate::Always`].
    ///
    /// # Errors
    ///
    /// - `UnknownEntity` / `UnknownField` if a field does not resolve.
    /// - `UnsupportedOperatorArity` if a value count does not fit its operator.
    /// - `UnsupportedOperatorType` if an operator does not apply to the
    ///   field's type.
    /// - `TypeCoercion` if a literal does not fit the field's type.
    /// - `InvalidGroup` for an empty group or misaligned per-position
    ///   connectives.
    pub fn build(&self, wrapper: &FilterWrapper) -> FilterResult<Predicate> {
        wrapper.resolve(
            |conditions| {
                tracing::debug!(
                    entity = self.entity,
                    conditions = conditions.len(),
                    "building predicate from condition list"
                );
                self.build_conditions(conditions)
            },
            |group| {
                tracing::debug!(
                    entity = self.entity,
                    operator = %group.operator,
                    operations = group.operations.len(),
                    reconstructed = group.is_reconstructed(),
                    "building predicate from group"
                );
                self.build_group(group)
            },
            || Ok(Predicate::Always),
        )
    }

    fn build_conditions(&self, conditions: &[FilterCondition]) -> FilterResult<Predicate> {
        let leaves = conditions
            .iter()
            .map(|condition| self.build_condition(condition))
            .collect::<FilterResult<Vec<_>>>()?;
        Ok(Predicate::conjunction(leaves))
    }

    fn build_group(&self, group: &FilterGroup) -> FilterResult<Predicate> {
        let count = group.operations.len();
        if count == 0 {
            return Err(FilterError::invalid_group("group has no operations"));
        }

        if let Some(connectives) = &group.non_priority_operators {
            let expected = count - 1 + usize::from(group.right_side_operands.is_some());
            if connectives.len() != expected {
                return Err(FilterError::invalid_group(format!(
                    "expected {expected} non-priority operator(s) for {count} operation(s), got {}",
                    connectives.len()
                )));
            }
        }

        let mut operations = group.operations.iter();
        let mut predicate = match operations.next() {
            Some(first) => self.build_operation(first)?,
            None => return Err(FilterError::invalid_group("group has no operations")),
        };

        for (index, operation) in operations.enumerate() {
            let right = self.build_operation(operation)?;
            predicate = Predicate::combine(predicate, group.connective_at(index), right);
        }

        if let Some(right_side) = &group.right_side_operands {
            let right = self.build_group(right_side)?;
            predicate = Predicate::combine(predicate, group.connective_at(count - 1), right);
        }

        Ok(predicate)
    }

    fn build_operation(&self, operation: &GroupOperation) -> FilterResult<Predicate> {
        match operation {
            GroupOperation::Condition(condition) => self.build_condition(condition),
            GroupOperation::Group(group) => self.build_group(group),
        }
    }

    fn build_condition(&self, condition: &FilterCondition) -> FilterResult<Predicate> {
        let field = condition.field.as_str();
        let operator = condition.operator;
        let value_type = self.registry.resolve_field_type(self.entity, field)?;

        let values = condition.values();
        operator.check_arity(values.len())?;

        if (operator.is_pattern() && value_type != ValueType::Text)
            || (operator.is_range() && !value_type.is_ordered())
        {
            return Err(FilterError::UnsupportedOperatorType {
                operator: operator.as_str().to_string(),
                field: field.to_string(),
                value_type: value_type.as_str().to_string(),
            });
        }

        let literals = values
            .iter()
            .map(|json| coerce(field, value_type, json))
            .collect::<FilterResult<Vec<_>>>()?;

        let test = match operator {
            FilterOperation::In => Test::In(literals),
            FilterOperation::NotIn => Test::NotIn(literals),
            _ => fixed_arity_test(operator, &literals)?,
        };

        Ok(Predicate::leaf(Criterion::new(field, value_type, test)))
    }
}

fn fixed_arity_test(operator: FilterOperation, literals: &[Value]) -> FilterResult<Test> {
    let test = match (operator, literals) {
        (FilterOperation::Eq, [v]) => Test::Eq(v.clone()),
        (FilterOperation::Ne, [v]) => Test::Ne(v.clone()),
        (FilterOperation::Gt, [v]) => Test::Gt(v.clone()),
        (FilterOperation::Gte, [v]) => Test::Gte(v.clone()),
        (FilterOperation::Lt, [v]) => Test::Lt(v.clone()),
        (FilterOperation::Lte, [v]) => Test::Lte(v.clone()),
        (_, [v]) if operator.is_pattern() => {
            let text = v.as_text().unwrap_or_default();
            match pattern::for_operation(operator, text) {
                Some(like) => Test::Like(like),
                None => return Err(arity_error(operator, literals.len())),
            }
        }
        (FilterOperation::Between, [low, high]) => Test::Between(low.clone(), high.clone()),
        (FilterOperation::IsNull, []) => Test::IsNull,
        (FilterOperation::IsNotNull, []) => Test::IsNotNull,
        _ => return Err(arity_error(operator, literals.len())),
    };
    Ok(test)
}

fn coerce(field: &str, value_type: ValueType, json: &Json) -> FilterResult<Value> {
    value_type
        .coerce(json)
        .ok_or_else(|| FilterError::type_coercion(field, value_type.as_str(), json.to_string()))
}

fn arity_error(operator: FilterOperation, actual: usize) -> FilterError {
    FilterError::arity(operator.as_str(), operator.arity().to_string(), actual)
}
