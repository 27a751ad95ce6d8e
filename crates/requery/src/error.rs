//! Error types for filter conversion.

use thiserror::Error;

/// A specialized Result type for filter conversion operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while converting between the filter DSL and predicates.
///
/// Every variant aborts the conversion that raised it: neither direction ever
/// hands back a partially built predicate or DSL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The DSL input is not valid JSON or does not have the expected shape.
    #[error("malformed filter: {message}")]
    Parse {
        /// Description of the syntax problem.
        message: String,
    },

    /// The target entity has not been registered in the schema.
    #[error("unknown entity: {entity}")]
    UnknownEntity {
        /// The entity name that was looked up.
        entity: String,
    },

    /// The field is not a declared, filterable attribute of the entity.
    #[error("unknown field '{field}' on entity '{entity}'{}", suggestion_suffix(.suggestion))]
    UnknownField {
        /// The entity the field was resolved against.
        entity: String,
        /// The full field path as written in the filter.
        field: String,
        /// A declared field with a similar name, if any.
        suggestion: Option<String>,
    },

    /// A literal could not be converted to the declared type of its field.
    #[error("cannot use {value} as {expected} for field '{field}'")]
    TypeCoercion {
        /// The field the literal was compared against.
        field: String,
        /// The declared type of the field.
        expected: String,
        /// The offending literal, rendered as JSON.
        value: String,
    },

    /// The number of supplied values does not fit the operator.
    #[error("operator '{operator}' expects {expected} value(s), got {actual}")]
    UnsupportedOperatorArity {
        /// The operator name.
        operator: String,
        /// Human-readable expected cardinality.
        expected: String,
        /// Number of values supplied.
        actual: usize,
    },

    /// The operator cannot be applied to a field of this type.
    #[error("operator '{operator}' cannot be applied to {value_type} field '{field}'")]
    UnsupportedOperatorType {
        /// The operator name.
        operator: String,
        /// The field the operator was applied to.
        field: String,
        /// The declared type of the field.
        value_type: String,
    },

    /// A group is structurally invalid.
    #[error("invalid group: {message}")]
    InvalidGroup {
        /// Description of the problem.
        message: String,
    },

    /// The predicate contains a node that has no DSL representation.
    #[error("unsupported predicate shape: {node}")]
    UnsupportedPredicateShape {
        /// Short description of the node that could not be classified.
        node: String,
    },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{}'?)", s),
        None => String::new(),
    }
}

impl FilterError {
    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        FilterError::Parse {
            message: message.into(),
        }
    }

    /// Creates an unknown entity error.
    pub fn unknown_entity(entity: impl Into<String>) -> Self {
        FilterError::UnknownEntity {
            entity: entity.into(),
        }
    }

    /// Creates an unknown field error without a suggestion.
    pub fn unknown_field(entity: impl Into<String>, field: impl Into<String>) -> Self {
        FilterError::UnknownField {
            entity: entity.into(),
            field: field.into(),
            suggestion: None,
        }
    }

    /// Creates a type coercion error.
    pub fn type_coercion(
        field: impl Into<String>,
        expected: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        FilterError::TypeCoercion {
            field: field.into(),
            expected: expected.into(),
            value: value.into(),
        }
    }

    /// Creates an arity error.
    pub fn arity(operator: impl Into<String>, expected: impl Into<String>, actual: usize) -> Self {
        FilterError::UnsupportedOperatorArity {
            operator: operator.into(),
            expected: expected.into(),
            actual,
        }
    }

    /// Creates an invalid group error.
    pub fn invalid_group(message: impl Into<String>) -> Self {
        FilterError::InvalidGroup {
            message: message.into(),
        }
    }

    /// Creates an unsupported predicate shape error.
    pub fn unsupported_shape(node: impl Into<String>) -> Self {
        FilterError::UnsupportedPredicateShape { node: node.into() }
    }
}

impl From<serde_json::Error> for FilterError {
    fn from(err: serde_json::Error) -> Self {
        FilterError::parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_field_message_with_suggestion() {
        let err = FilterError::UnknownField {
            entity: "user".to_string(),
            field: "agee".to_string(),
            suggestion: Some("age".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "unknown field 'agee' on entity 'user' (did you mean 'age'?)"
        );
    }

    #[test]
    fn test_unknown_field_message_without_suggestion() {
        let err = FilterError::unknown_field("user", "zzz");
        assert_eq!(err.to_string(), "unknown field 'zzz' on entity 'user'");
    }

    #[test]
    fn test_arity_message() {
        let err = FilterError::arity("between", "exactly 2", 3);
        assert_eq!(
            err.to_string(),
            "operator 'between' expects exactly 2 value(s), got 3"
        );
    }

    #[test]
    fn test_from_serde_json_error_is_parse() {
        let err: FilterError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, FilterError::Parse { .. }));
    }
}
