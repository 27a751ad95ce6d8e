//! Common helper functions for output formatting.

use owo_colors::OwoColorize;
use requery_rs::FieldType;

/// Appends a table header line, dimmed when colors are enabled.
pub fn push_header(output: &mut String, header: &str, use_colors: bool) {
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(header);
        output.push('\n');
    }
}

/// Formats a declared field type: the scalar type name, or an arrow to the
/// related entity.
pub fn format_field_type(field_type: &FieldType, use_colors: bool) -> String {
    match field_type {
        FieldType::Scalar(value_type) => value_type.to_string(),
        FieldType::Relation { entity } => {
            let label = format!("-> {entity}");
            if use_colors {
                label.cyan().to_string()
            } else {
                label
            }
        }
    }
}

/// Pluralizes a count for summaries, e.g. "1 row" or "3 rows".
pub fn count_label(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use requery_rs::ValueType;

    #[test]
    fn test_format_field_type_plain() {
        assert_eq!(
            format_field_type(&FieldType::Scalar(ValueType::DateTime), false),
            "date_time"
        );
        assert_eq!(
            format_field_type(
                &FieldType::Relation {
                    entity: "address".to_string()
                },
                false
            ),
            "-> address"
        );
    }

    #[test]
    fn test_push_header_without_colors() {
        let mut output = String::new();
        push_header(&mut output, "Field", false);
        assert_eq!(output, "Field\n");
    }

    #[test]
    fn test_count_label() {
        assert_eq!(count_label(0, "row"), "0 rows");
        assert_eq!(count_label(1, "row"), "1 row");
        assert_eq!(count_label(2, "field"), "2 fields");
    }
}
