//! Composable query predicates.
//!
//! A [`Predicate`] is the tree the forward converter builds and the reverse
//! factory reads. Leaves are typed [`Criterion`]s over a single field; inner
//! nodes are binary `And`/`Or`, mirroring how query builders compose
//! conditions two at a time.
//!
//! # Example
//!
//! ```
//! use requery_rs::predicate::{Criterion, Predicate, Test};
//! use requery_rs::{Value, ValueType};
//!
//! let adult = Predicate::leaf(Criterion::new(
//!     "age",
//!     ValueType::Integer,
//!     Test::Gt(Value::Integer(18)),
//! ));
//! let named = Predicate::leaf(Criterion::new(
//!     "name",
//!     ValueType::Text,
//!     Test::Like("%Jo%".to_string()),
//! ));
//!
//! let predicate = Predicate::and(adult, named);
//! assert_eq!(predicate.to_string(), "age > 18 AND name LIKE '%Jo%'");
//! ```

mod evaluator;
pub mod pattern;
mod sql;

use std::fmt;

pub use evaluator::RowEvaluator;
pub use sql::SqlWhere;

use crate::dsl::Connective;
use crate::value::{Value, ValueType};

/// A boolean expression over entity fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every row.
    Always,
    /// A single field comparison.
    Leaf(Criterion),
    /// Both sides must match.
    And(Box<Predicate>, Box<Predicate>),
    /// Either side must match.
    Or(Box<Predicate>, Box<Predicate>),
    /// Negation of the inner predicate.
    Not(Box<Predicate>),
    /// A hand-written SQL condition. It can be rendered but not evaluated
    /// or reversed.
    Raw(String),
}

impl Predicate {
    /// Creates a leaf predicate.
    pub fn leaf(criterion: Criterion) -> Self {
        Predicate::Leaf(criterion)
    }

    /// Creates an AND of two predicates.
    pub fn and(left: Predicate, right: Predicate) -> Self {
        Predicate::And(Box::new(left), Box::new(right))
    }

    /// Creates an OR of two predicates.
    pub fn or(left: Predicate, right: Predicate) -> Self {
        Predicate::Or(Box::new(left), Box::new(right))
    }

    /// Combines two predicates with the given connective.
    pub fn combine(left: Predicate, connective: Connective, right: Predicate) -> Self {
        match connective {
            Connective::And => Predicate::and(left, right),
            Connective::Or => Predicate::or(left, right),
        }
    }

    /// Creates a NOT of a predicate.
    pub fn negate(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    /// Creates a raw SQL predicate.
    pub fn raw(sql: impl Into<String>) -> Self {
        Predicate::Raw(sql.into())
    }

    /// Left-folds predicates with AND.
    ///
    /// An empty input yields [`Predicate::Always`]; a single predicate is
    /// returned unchanged.
    pub fn conjunction(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        predicates
            .into_iter()
            .reduce(Predicate::and)
            .unwrap_or(Predicate::Always)
    }

    /// Returns true if this is the always-true predicate.
    pub fn is_always(&self) -> bool {
        matches!(self, Predicate::Always)
    }

    /// Returns the connective of a binary node.
    pub fn connective(&self) -> Option<Connective> {
        match self {
            Predicate::And(..) => Some(Connective::And),
            Predicate::Or(..) => Some(Connective::Or),
            _ => None,
        }
    }

    /// Returns true if `row` matches, using SQL null semantics: a comparison
    /// against a missing field is unknown, and unknown does not match.
    pub fn matches(&self, row: &serde_json::Value) -> bool {
        RowEvaluator::new(self).matches(row)
    }

    /// Renders the predicate as a parameterized SQL `WHERE` clause.
    pub fn to_sql(&self) -> SqlWhere {
        SqlWhere::from_predicate(self)
    }
}

impl fmt::Display for Predicate {
    /// Formats the predicate as readable SQL with inline literals.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        sql::render(self, &mut out, &mut sql::InlineLiterals);
        f.write_str(&out)
    }
}

/// A typed comparison on one field.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    /// Field name or dotted path.
    pub field: String,
    /// Declared type of the field; literals in `test` have this type.
    pub value_type: ValueType,
    /// The comparison.
    pub test: Test,
}

impl Criterion {
    /// Creates a criterion.
    pub fn new(field: impl Into<String>, value_type: ValueType, test: Test) -> Self {
        Self {
            field: field.into(),
            value_type,
            test,
        }
    }

    /// Returns all literals referenced by the test, in order.
    pub fn literals(&self) -> Vec<&Value> {
        match &self.test {
            Test::Eq(v) | Test::Ne(v) | Test::Gt(v) | Test::Gte(v) | Test::Lt(v) | Test::Lte(v) => {
                vec![v]
            }
            Test::In(vs) | Test::NotIn(vs) => vs.iter().collect(),
            Test::Between(low, high) => vec![low, high],
            Test::Like(_) | Test::IsNull | Test::IsNotNull => vec![],
        }
    }
}

/// The comparison performed by a [`Criterion`].
#[derive(Debug, Clone, PartialEq)]
pub enum Test {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    /// SQL `LIKE` with `%`/`_` wildcards and `\` escapes.
    Like(String),
    In(Vec<Value>),
    NotIn(Vec<Value>),
    /// Inclusive range.
    Between(Value, Value),
    IsNull,
    IsNotNull,
}
