//! SQL rendering of predicates.

use super::{Criterion, Predicate, Test};
use crate::value::Value;

/// A parameterized `WHERE` clause.
///
/// `clause` uses `?` placeholders; `params` holds the bound values in
/// placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlWhere {
    pub clause: String,
    pub params: Vec<Value>,
}

impl SqlWhere {
    pub(crate) fn from_predicate(predicate: &Predicate) -> Self {
        let mut sink = BoundParams::default();
        let mut clause = String::new();
        render(predicate, &mut clause, &mut sink);
        Self {
            clause,
            params: sink.params,
        }
    }
}

/// Decides how columns and literals appear in rendered output.
pub(crate) trait Dialect {
    fn column(&self, field: &str, out: &mut String);
    fn literal(&mut self, value: &Value, out: &mut String);
    fn pattern(&mut self, pattern: &str, out: &mut String);
}

/// Readable output: bare column paths, literals inlined.
pub(crate) struct InlineLiterals;

impl Dialect for InlineLiterals {
    fn column(&self, field: &str, out: &mut String) {
        out.push_str(field);
    }

    fn literal(&mut self, value: &Value, out: &mut String) {
        out.push_str(&value.to_string());
    }

    fn pattern(&mut self, pattern: &str, out: &mut String) {
        out.push_str(&Value::from(pattern).to_string());
    }
}

/// Executable output: quoted identifiers, `?` placeholders.
#[derive(Default)]
struct BoundParams {
    params: Vec<Value>,
}

impl Dialect for BoundParams {
    fn column(&self, field: &str, out: &mut String) {
        let quoted: Vec<String> = field
            .split('.')
            .map(|segment| format!("\"{}\"", segment.replace('"', "\"\"")))
            .collect();
        out.push_str(&quoted.join("."));
    }

    fn literal(&mut self, value: &Value, out: &mut String) {
        self.params.push(value.clone());
        out.push('?');
    }

    fn pattern(&mut self, pattern: &str, out: &mut String) {
        self.params.push(Value::from(pattern));
        out.push_str("? ESCAPE '\\'");
    }
}

pub(crate) fn render(predicate: &Predicate, out: &mut String, dialect: &mut impl Dialect) {
    match predicate {
        Predicate::Always => out.push_str("TRUE"),
        Predicate::Leaf(criterion) => render_leaf(criterion, out, dialect),
        Predicate::And(left, right) | Predicate::Or(left, right) => {
            let keyword = if matches!(predicate, Predicate::And(..)) {
                " AND "
            } else {
                " OR "
            };
            render_operand(predicate, left, false, out, dialect);
            out.push_str(keyword);
            render_operand(predicate, right, true, out, dialect);
        }
        Predicate::Not(inner) => {
            out.push_str("NOT (");
            render(inner, out, dialect);
            out.push(')');
        }
        Predicate::Raw(sql) => {
            out.push('(');
            out.push_str(sql);
            out.push(')');
        }
    }
}

/// Renders one side of a binary node, parenthesizing it when it is a binary
/// node of a different connective, or any binary node on the right.
fn render_operand(
    parent: &Predicate,
    operand: &Predicate,
    is_right: bool,
    out: &mut String,
    dialect: &mut impl Dialect,
) {
    let needs_parens = match operand.connective() {
        Some(connective) => is_right || Some(connective) != parent.connective(),
        None => false,
    };

    if needs_parens {
        out.push('(');
        render(operand, out, dialect);
        out.push(')');
    } else {
        render(operand, out, dialect);
    }
}

fn render_leaf(criterion: &Criterion, out: &mut String, dialect: &mut impl Dialect) {
    dialect.column(&criterion.field, out);

    let (symbol, value) = match &criterion.test {
        Test::Eq(v) => (" = ", v),
        Test::Ne(v) => (" <> ", v),
        Test::Gt(v) => (" > ", v),
        Test::Gte(v) => (" >= ", v),
        Test::Lt(v) => (" < ", v),
        Test::Lte(v) => (" <= ", v),
        Test::Like(pattern) => {
            out.push_str(" LIKE ");
            dialect.pattern(pattern, out);
            return;
        }
        Test::In(values) | Test::NotIn(values) => {
            out.push_str(if matches!(criterion.test, Test::In(_)) {
                " IN ("
            } else {
                " NOT IN ("
            });
            for (index, value) in values.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                dialect.literal(value, out);
            }
            out.push(')');
            return;
        }
        Test::Between(low, high) => {
            out.push_str(" BETWEEN ");
            dialect.literal(low, out);
            out.push_str(" AND ");
            dialect.literal(high, out);
            return;
        }
        Test::IsNull => {
            out.push_str(" IS NULL");
            return;
        }
        Test::IsNotNull => {
            out.push_str(" IS NOT NULL");
            return;
        }
    };

    out.push_str(symbol);
    dialect.literal(value, out);
}
