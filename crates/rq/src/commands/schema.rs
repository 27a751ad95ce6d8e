//! Schema command implementation.
//!
//! Lists the configured entities, or the fields of one of them.

use requery_rs::FilterError;

use super::{CommandContext, LoadedSchema, Result};
use crate::output::{format_entities_json, format_entities_table, format_fields_table};

/// Executes the schema command.
pub fn execute(ctx: &CommandContext, schema: &LoadedSchema, entity: Option<&str>) -> Result<()> {
    let registry = schema.factory.registry();
    let default_entity = schema.default_entity();

    let Some(name) = entity else {
        let entities = registry.entities();
        if ctx.json_output {
            println!("{}", format_entities_json(&entities, default_entity)?);
        } else if !ctx.quiet {
            print!(
                "{}",
                format_entities_table(&entities, default_entity, ctx.use_colors)
            );
        }
        return Ok(());
    };

    let found = registry
        .entity(name)
        .ok_or_else(|| FilterError::unknown_entity(name))?;

    if ctx.json_output {
        println!("{}", format_entities_json(&[found], default_entity)?);
    } else if !ctx.quiet {
        print!("{}", format_fields_table(found, ctx.use_colors));
    }

    Ok(())
}
