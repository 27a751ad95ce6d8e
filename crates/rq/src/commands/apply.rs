//! Apply command implementation.
//!
//! Filters a JSON array of rows with a compiled predicate.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use requery_rs::predicate::RowEvaluator;
use requery_rs::FilterFactory;
use serde_json::Value as Json;

use super::{CommandContext, CommandError, LoadedSchema, Result};
use crate::cli::FilterArgs;
use crate::output::helpers::count_label;
use crate::output::{format_rows_json, format_rows_lines};

/// Options for the apply command.
pub struct ApplyOptions<'a> {
    pub filter: &'a FilterArgs,
    /// Rows file, or `-` for stdin.
    pub rows: &'a Path,
}

/// Executes the apply command.
pub fn execute(ctx: &CommandContext, schema: &LoadedSchema, opts: &ApplyOptions) -> Result<()> {
    let entity = schema.entity(opts.filter.entity.as_deref())?;
    let wrapper = schema.wrapper(opts.filter)?;
    let predicate = schema.factory.to_predicate(&wrapper, &entity)?;
    let rows = read_rows(opts.rows)?;

    let matched = RowEvaluator::new(&predicate).filter_rows(&rows);
    tracing::debug!(
        matched = matched.len(),
        total = rows.len(),
        %predicate,
        "applied filter"
    );

    if ctx.json_output {
        println!("{}", format_rows_json(&matched, rows.len())?);
    } else {
        print!("{}", format_rows_lines(&matched)?);
        if !ctx.quiet {
            eprintln!(
                "{} of {} matched",
                count_label(matched.len(), "row"),
                rows.len()
            );
        }
    }

    Ok(())
}

/// Reads a JSON array of rows from a file or stdin.
fn read_rows(path: &Path) -> Result<Vec<Json>> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)?
    };

    parse_rows(&content)
}

fn parse_rows(content: &str) -> Result<Vec<Json>> {
    match serde_json::from_str::<Json>(content)? {
        Json::Array(rows) => Ok(rows),
        other => Err(CommandError::Input(format!(
            "rows must be a JSON array, got {}",
            kind(&other)
        ))),
    }
}

fn kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}
