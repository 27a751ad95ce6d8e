//! Compile command implementation.
//!
//! Converts a filter into a predicate and prints it, either readably or as
//! a parameterized SQL clause.

use requery_rs::FilterFactory;

use super::{CommandContext, LoadedSchema, Result};
use crate::cli::FilterArgs;
use crate::output::{format_compiled_json, format_compiled_text, format_sql_text};

/// Options for the compile command.
pub struct CompileOptions<'a> {
    pub filter: &'a FilterArgs,
    pub sql: bool,
}

/// Executes the compile command.
pub fn execute(ctx: &CommandContext, schema: &LoadedSchema, opts: &CompileOptions) -> Result<()> {
    let entity = schema.entity(opts.filter.entity.as_deref())?;
    let wrapper = schema.wrapper(opts.filter)?;
    let predicate = schema.factory.to_predicate(&wrapper, &entity)?;

    if ctx.json_output {
        println!("{}", format_compiled_json(&entity, &predicate)?);
    } else if opts.sql {
        print!("{}", format_sql_text(&predicate, ctx.use_colors));
    } else {
        print!("{}", format_compiled_text(&predicate));
    }

    Ok(())
}
