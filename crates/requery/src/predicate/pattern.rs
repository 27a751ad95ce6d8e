//! SQL `LIKE` patterns: building them from user text, classifying them back
//! into the DSL pattern operators, and matching them against text.
//!
//! Patterns use `%` for any run of characters, `_` for a single character
//! and `\` as the escape character.

use regex::Regex;

use crate::dsl::FilterOperation;

/// Escape character used in generated patterns.
pub const LIKE_ESCAPE: char = '\\';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(char),
    AnyRun,
    AnyChar,
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        let token = match c {
            LIKE_ESCAPE => Token::Literal(chars.next().unwrap_or(LIKE_ESCAPE)),
            '%' => Token::AnyRun,
            '_' => Token::AnyChar,
            c => Token::Literal(c),
        };
        tokens.push(token);
    }

    tokens
}

/// Escapes wildcards and the escape character so `text` matches literally.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Builds the pattern for one of the DSL pattern operators.
///
/// Returns `None` for operators that are not pattern operators.
pub fn for_operation(operation: FilterOperation, text: &str) -> Option<String> {
    let literal = escape(text);
    match operation {
        FilterOperation::Like => Some(format!("%{literal}%")),
        FilterOperation::BeginsWith => Some(format!("{literal}%")),
        FilterOperation::EndsWith => Some(format!("%{literal}")),
        _ => None,
    }
}

/// Recovers the operator and literal text from a pattern built by
/// [`for_operation`].
///
/// Returns `None` when the pattern has wildcards anywhere other than a
/// leading and/or trailing `%`, or has no wildcard at all.
pub fn classify(pattern: &str) -> Option<(FilterOperation, String)> {
    let tokens = tokenize(pattern);

    let leading = tokens.first() == Some(&Token::AnyRun);
    let trailing = tokens.len() > usize::from(leading) && tokens.last() == Some(&Token::AnyRun);

    let start = usize::from(leading);
    let end = tokens.len() - usize::from(trailing);

    let literal: Option<String> = tokens[start..end]
        .iter()
        .map(|token| match token {
            Token::Literal(c) => Some(*c),
            _ => None,
        })
        .collect();
    let literal = literal?;

    let operation = match (leading, trailing) {
        (true, true) => FilterOperation::Like,
        (false, true) => FilterOperation::BeginsWith,
        (true, false) => FilterOperation::EndsWith,
        (false, false) => return None,
    };
    Some((operation, literal))
}

/// Compiles a `LIKE` pattern into an anchored, case-sensitive regex.
pub fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    let mut expr = String::from("(?s)^");
    for token in tokenize(pattern) {
        match token {
            Token::Literal(c) => expr.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
            Token::AnyRun => expr.push_str(".*"),
            Token::AnyChar => expr.push('.'),
        }
    }
    expr.push('$');

    Regex::new(&expr)
}
