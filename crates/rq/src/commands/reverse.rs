//! Reverse command implementation.
//!
//! Compiles a filter and converts the predicate back into the filter DSL,
//! showing the canonical form a client would send.

use requery_rs::FilterFactory;

use super::{CommandContext, LoadedSchema, Result};
use crate::cli::FilterArgs;
use crate::output::{format_reversed_json, format_reversed_text};

/// Executes the reverse command.
pub fn execute(ctx: &CommandContext, schema: &LoadedSchema, filter: &FilterArgs) -> Result<()> {
    let entity = schema.entity(filter.entity.as_deref())?;
    let wrapper = schema.wrapper(filter)?;
    let predicate = schema.factory.to_predicate(&wrapper, &entity)?;
    let reversed = schema.factory.to_wrapper(&predicate, &entity)?;

    if ctx.verbose {
        eprintln!("predicate: {predicate}");
    }

    if ctx.json_output {
        println!("{}", format_reversed_json(&entity, &predicate, &reversed)?);
    } else {
        print!("{}", format_reversed_text(&reversed, ctx.use_colors)?);
    }

    Ok(())
}
