//! Reverse conversion: [`Predicate`] back to the filter DSL.
//!
//! The predicate tree is binary, so the walk follows its left spine. Each
//! leaf on the right of a composition becomes the next condition of the
//! current group and its connective is recorded. A composite right operand
//! cannot be appended as a condition, so it is reconstructed on its own and
//! stored as `rightSideOperands`. Mixed connectives are kept per position in
//! `nonPriorityGroupOperators`.
//!
//! A result that is a plain AND of conditions collapses to the flat list
//! form, so a filter that started out as a list comes back as a list.

use serde_json::Value as Json;

use crate::dsl::{
    Connective, FilterCondition, FilterGroup, FilterOperation, FilterWrapper, GroupOperation,
};
use crate::error::{FilterError, FilterResult};
use crate::predicate::{pattern, Criterion, Predicate, Test};
use crate::schema::SchemaRegistry;
use crate::value::{Value, ValueType};

#[cfg(test)]
mod tests;

/// Reconstructs the filter that produces `predicate` for the given entity.
///
/// Shorthand for [`DslBuilder::new`] followed by [`DslBuilder::build`].
///
/// # Errors
///
/// See [`DslBuilder::build`].
pub fn build_dsl(
    registry: &SchemaRegistry,
    predicate: &Predicate,
    entity: &str,
) -> FilterResult<FilterWrapper> {
    DslBuilder::new(registry, entity).build(predicate)
}

/// Converts predicates back into DSL filters for one entity.
#[derive(Debug, Clone, Copy)]
pub struct DslBuilder<'a> {
    registry: &'a SchemaRegistry,
    entity: &'a str,
}

/// A group under construction.
#[derive(Debug, Default)]
struct PartialGroup {
    operations: Vec<GroupOperation>,
    connectives: Vec<Connective>,
    right_side: Option<FilterGroup>,
}

impl PartialGroup {
    fn single(operation: GroupOperation) -> Self {
        Self {
            operations: vec![operation],
            ..Self::default()
        }
    }

    fn is_flat_conjunction(&self) -> bool {
        self.right_side.is_none()
            && self.connectives.iter().all(|c| *c == Connective::And)
            && self
                .operations
                .iter()
                .all(|op| matches!(op, GroupOperation::Condition(_)))
    }

    fn finish(self) -> FilterGroup {
        let uniform = self.connectives.windows(2).all(|pair| pair[0] == pair[1]);
        let operator = self.connectives.first().copied().unwrap_or(Connective::And);

        FilterGroup {
            operator,
            operations: self.operations,
            non_priority_operators: (!uniform).then_some(self.connectives),
            right_side_operands: self.right_side.map(Box::new),
        }
    }
}

impl<'a> DslBuilder<'a> {
    /// Creates a builder validating fields against `entity`.
    pub fn new(registry: &'a SchemaRegistry, entity: &'a str) -> Self {
        Self { registry, entity }
    }

    /// Builds the filter for a predicate.
    ///
    /// [`Predicate::Always`] at the root yields [`FilterWrapper::Empty`]. A
    /// predicate that is only conditions joined by AND yields
    /// [`FilterWrapper::Simple`]; anything else yields
    /// [`FilterWrapper::Complex`].
    ///
    /// # Errors
    ///
    /// - `UnsupportedPredicateShape` for negation, raw SQL, a nested
    ///   always-true node, a leaf typed differently from its field, or a
    ///   `LIKE` pattern that is not a plain contains/prefix/suffix match.
    /// - `UnknownEntity` / `UnknownField` if a leaf's field does not resolve.
    /// - `UnsupportedOperatorType` for a pattern on a non-text field.
    /// - `TypeCoercion` if a literal is not of the field's declared type.
    pub fn build(&self, predicate: &Predicate) -> FilterResult<FilterWrapper> {
        if predicate.is_always() {
            return Ok(FilterWrapper::Empty);
        }

        let partial = self.reverse(predicate)?;
        let wrapper = if partial.is_flat_conjunction() {
            let conditions = partial
                .operations
                .into_iter()
                .filter_map(|op| match op {
                    GroupOperation::Condition(condition) => Some(condition),
                    GroupOperation::Group(_) => None,
                })
                .collect();
            FilterWrapper::Simple(conditions)
        } else {
            FilterWrapper::Complex(partial.finish())
        };

        tracing::debug!(
            entity = self.entity,
            simple = matches!(wrapper, FilterWrapper::Simple(_)),
            "reconstructed filter from predicate"
        );
        Ok(wrapper)
    }

    fn reverse(&self, predicate: &Predicate) -> FilterResult<PartialGroup> {
        match predicate {
            Predicate::Leaf(criterion) => Ok(PartialGroup::single(GroupOperation::Condition(
                self.condition(criterion)?,
            ))),
            Predicate::And(left, right) => self.reverse_binary(left, Connective::And, right),
            Predicate::Or(left, right) => self.reverse_binary(left, Connective::Or, right),
            other => Err(unsupported(other)),
        }
    }

    fn reverse_binary(
        &self,
        left: &Predicate,
        connective: Connective,
        right: &Predicate,
    ) -> FilterResult<PartialGroup> {
        let mut group = self.reverse(left)?;

        match right {
            Predicate::Leaf(criterion) => {
                let condition = GroupOperation::Condition(self.condition(criterion)?);
                if group.right_side.is_none() {
                    group.operations.push(condition);
                    group.connectives.push(connective);
                    Ok(group)
                } else {
                    Ok(PartialGroup {
                        operations: vec![GroupOperation::Group(group.finish()), condition],
                        connectives: vec![connective],
                        right_side: None,
                    })
                }
            }
            Predicate::And(..) | Predicate::Or(..) => {
                let right_side = self.reverse(right)?.finish();
                if group.right_side.is_none() {
                    group.right_side = Some(right_side);
                    group.connectives.push(connective);
                    Ok(group)
                } else {
                    Ok(PartialGroup {
                        operations: vec![GroupOperation::Group(group.finish())],
                        connectives: vec![connective],
                        right_side: Some(right_side),
                    })
                }
            }
            other => Err(unsupported(other)),
        }
    }

    fn condition(&self, criterion: &Criterion) -> FilterResult<FilterCondition> {
        let field = criterion.field.as_str();
        let declared = self.registry.resolve_field_type(self.entity, field)?;

        if criterion.value_type != declared {
            return Err(FilterError::unsupported_shape(format!(
                "'{field}' compared as {} but declared {declared}",
                criterion.value_type
            )));
        }

        for literal in criterion.literals() {
            if !literal_fits(declared, literal) {
                return Err(FilterError::type_coercion(
                    field,
                    declared.as_str(),
                    literal.to_json().to_string(),
                ));
            }
        }

        let (operator, values) = match &criterion.test {
            Test::Eq(v) => (FilterOperation::Eq, vec![v.to_json()]),
            Test::Ne(v) => (FilterOperation::Ne, vec![v.to_json()]),
            Test::Gt(v) => (FilterOperation::Gt, vec![v.to_json()]),
            Test::Gte(v) => (FilterOperation::Gte, vec![v.to_json()]),
            Test::Lt(v) => (FilterOperation::Lt, vec![v.to_json()]),
            Test::Lte(v) => (FilterOperation::Lte, vec![v.to_json()]),
            Test::Like(like) => {
                if declared != ValueType::Text {
                    return Err(FilterError::UnsupportedOperatorType {
                        operator: FilterOperation::Like.as_str().to_string(),
                        field: field.to_string(),
                        value_type: declared.as_str().to_string(),
                    });
                }
                let (operator, text) = pattern::classify(like).ok_or_else(|| {
                    FilterError::unsupported_shape(format!("LIKE pattern '{like}' on '{field}'"))
                })?;
                (operator, vec![Json::String(text)])
            }
            Test::In(vs) => (FilterOperation::In, vs.iter().map(Value::to_json).collect()),
            Test::NotIn(vs) => (
                FilterOperation::NotIn,
                vs.iter().map(Value::to_json).collect(),
            ),
            Test::Between(low, high) => (
                FilterOperation::Between,
                vec![low.to_json(), high.to_json()],
            ),
            Test::IsNull => return Ok(FilterCondition::without_value(field, FilterOperation::IsNull)),
            Test::IsNotNull => {
                return Ok(FilterCondition::without_value(
                    field,
                    FilterOperation::IsNotNull,
                ))
            }
        };

        Ok(FilterCondition::new(field, operator, render_values(operator, values)))
    }
}

/// The forward pass must rebuild the same literal from its JSON form, so the
/// literal has to carry the declared type. Integers are also accepted on
/// float fields since they read back as the same number.
fn literal_fits(declared: ValueType, literal: &Value) -> bool {
    let actual = literal.value_type();
    actual == declared || (declared == ValueType::Float && actual == ValueType::Integer)
}

/// A single value is written as a scalar unless the operator always takes
/// a list.
fn render_values(operator: FilterOperation, mut values: Vec<Json>) -> Json {
    if values.len() == 1 && !operator.takes_list() {
        values.swap_remove(0)
    } else {
        Json::Array(values)
    }
}

fn unsupported(predicate: &Predicate) -> FilterError {
    let node = match predicate {
        Predicate::Always => "nested always-true predicate".to_string(),
        Predicate::Not(inner) => format!("negation NOT ({inner})"),
        Predicate::Raw(sql) => format!("raw SQL fragment ({sql})"),
        other => other.to_string(),
    };
    FilterError::unsupported_shape(node)
}
