//! Predicate evaluation against JSON rows.
//!
//! Rows are JSON objects; a criterion's field is looked up as a dotted path,
//! so `address.city` reads `row["address"]["city"]`. Evaluation follows SQL
//! three-valued logic: comparing against a missing or null field yields
//! *unknown*, `AND` is false if either side is false, `OR` is true if either
//! side is true, and a row only matches when the whole predicate is true.

use std::cmp::Ordering;
use std::collections::HashMap;

use regex::Regex;
use serde_json::Value as Json;

use super::{pattern, Criterion, Predicate, Test};
use crate::value::Value;

/// Evaluates a [`Predicate`] against rows.
///
/// `LIKE` patterns are compiled once when the evaluator is created.
#[derive(Debug)]
pub struct RowEvaluator<'a> {
    predicate: &'a Predicate,
    patterns: HashMap<&'a str, Regex>,
}

impl<'a> RowEvaluator<'a> {
    /// Creates a new evaluator for `predicate`.
    pub fn new(predicate: &'a Predicate) -> Self {
        let mut patterns = HashMap::new();
        collect_patterns(predicate, &mut patterns);
        Self {
            predicate,
            patterns,
        }
    }

    /// Returns true if the row matches the predicate.
    pub fn matches(&self, row: &Json) -> bool {
        self.evaluate(self.predicate, row) == Some(true)
    }

    /// Filters a slice of rows, returning only those that match.
    pub fn filter_rows<'b>(&self, rows: &'b [Json]) -> Vec<&'b Json> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }

    /// Evaluates a predicate node; `None` is SQL unknown.
    fn evaluate(&self, predicate: &Predicate, row: &Json) -> Option<bool> {
        match predicate {
            Predicate::Always => Some(true),
            Predicate::Leaf(criterion) => self.evaluate_criterion(criterion, row),
            Predicate::And(left, right) => {
                match (self.evaluate(left, row), self.evaluate(right, row)) {
                    (Some(false), _) | (_, Some(false)) => Some(false),
                    (Some(true), Some(true)) => Some(true),
                    _ => None,
                }
            }
            Predicate::Or(left, right) => {
                match (self.evaluate(left, row), self.evaluate(right, row)) {
                    (Some(true), _) | (_, Some(true)) => Some(true),
                    (Some(false), Some(false)) => Some(false),
                    _ => None,
                }
            }
            Predicate::Not(inner) => self.evaluate(inner, row).map(|b| !b),
            // Raw SQL has no meaning outside a database.
            Predicate::Raw(_) => None,
        }
    }

    fn evaluate_criterion(&self, criterion: &Criterion, row: &Json) -> Option<bool> {
        let cell = lookup(row, &criterion.field).filter(|v| !v.is_null());

        match &criterion.test {
            Test::IsNull => return Some(cell.is_none()),
            Test::IsNotNull => return Some(cell.is_some()),
            _ => {}
        }

        let cell = cell?;
        let Some(actual) = criterion.value_type.coerce(cell) else {
            return Some(false);
        };

        let result = match &criterion.test {
            Test::Eq(expected) => ordering(&actual, expected)? == Ordering::Equal,
            Test::Ne(expected) => ordering(&actual, expected)? != Ordering::Equal,
            Test::Gt(expected) => ordering(&actual, expected)? == Ordering::Greater,
            Test::Gte(expected) => ordering(&actual, expected)? != Ordering::Less,
            Test::Lt(expected) => ordering(&actual, expected)? == Ordering::Less,
            Test::Lte(expected) => ordering(&actual, expected)? != Ordering::Greater,
            Test::Like(like) => actual.as_text().is_some_and(|text| {
                self.patterns
                    .get(like.as_str())
                    .is_some_and(|re| re.is_match(text))
            }),
            Test::In(options) => options.iter().any(|option| is_equal(&actual, option)),
            Test::NotIn(options) => !options.iter().any(|option| is_equal(&actual, option)),
            Test::Between(low, high) => {
                ordering(&actual, low)? != Ordering::Less
                    && ordering(&actual, high)? != Ordering::Greater
            }
            Test::IsNull => false,
            Test::IsNotNull => true,
        };

        Some(result)
    }
}

/// Compiles every distinct `LIKE` pattern in the tree. A pattern that fails
/// to compile is left out and never matches.
fn collect_patterns<'a>(predicate: &'a Predicate, patterns: &mut HashMap<&'a str, Regex>) {
    match predicate {
        Predicate::Leaf(criterion) => {
            let Test::Like(like) = &criterion.test else {
                return;
            };
            if patterns.contains_key(like.as_str()) {
                return;
            }
            match pattern::compile(like) {
                Ok(re) => {
                    patterns.insert(like.as_str(), re);
                }
                Err(err) => {
                    tracing::warn!(pattern = %like, error = %err, "LIKE pattern does not compile");
                }
            }
        }
        Predicate::And(left, right) | Predicate::Or(left, right) => {
            collect_patterns(left, patterns);
            collect_patterns(right, patterns);
        }
        Predicate::Not(inner) => collect_patterns(inner, patterns),
        Predicate::Always | Predicate::Raw(_) => {}
    }
}

fn ordering(actual: &Value, expected: &Value) -> Option<Ordering> {
    actual.compare(expected)
}

fn is_equal(actual: &Value, expected: &Value) -> bool {
    actual.compare(expected) == Some(Ordering::Equal)
}

/// Follows a dotted path through nested JSON objects.
fn lookup<'r>(row: &'r Json, path: &str) -> Option<&'r Json> {
    path.split('.')
        .try_fold(row, |current, segment| current.as_object()?.get(segment))
}
