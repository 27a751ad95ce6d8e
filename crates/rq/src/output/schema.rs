//! Schema output formatting.

use std::collections::BTreeMap;

use requery_rs::{EntitySchema, FieldType};
use serde::Serialize;

use super::helpers::{format_field_type, push_header};

/// JSON output structure for one entity.
#[derive(Serialize)]
pub struct EntityOutput<'a> {
    pub name: &'a str,
    pub is_default: bool,
    pub fields: &'a BTreeMap<String, FieldType>,
}

/// Formats entities with their fields as JSON.
pub fn format_entities_json(
    entities: &[&EntitySchema],
    default_entity: Option<&str>,
) -> Result<String, serde_json::Error> {
    let output: Vec<EntityOutput> = entities
        .iter()
        .map(|entity| EntityOutput {
            name: entity.name(),
            is_default: default_entity == Some(entity.name()),
            fields: entity.fields(),
        })
        .collect();

    serde_json::to_string_pretty(&serde_json::json!({ "entities": output }))
}

/// Formats the entity list as a table.
pub fn format_entities_table(
    entities: &[&EntitySchema],
    default_entity: Option<&str>,
    use_colors: bool,
) -> String {
    if entities.is_empty() {
        return "No entities configured. Run 'rq config init' to create an example.\n".to_string();
    }

    let mut output = String::new();
    push_header(
        &mut output,
        &format!("{:<3} {:<20} {}", "", "Entity", "Fields"),
        use_colors,
    );

    for entity in entities {
        let marker = if default_entity == Some(entity.name()) {
            "*"
        } else {
            ""
        };
        output.push_str(&format!(
            "{:<3} {:<20} {}\n",
            marker,
            entity.name(),
            entity.fields().len()
        ));
    }

    output
}

/// Formats the fields of one entity as a table.
pub fn format_fields_table(entity: &EntitySchema, use_colors: bool) -> String {
    if entity.fields().is_empty() {
        return format!("Entity '{}' has no fields.\n", entity.name());
    }

    let mut output = String::new();
    push_header(&mut output, &format!("{:<24} {}", "Field", "Type"), use_colors);

    for (name, field_type) in entity.fields() {
        output.push_str(&format!(
            "{:<24} {}\n",
            name,
            format_field_type(field_type, use_colors)
        ));
    }

    output
}
