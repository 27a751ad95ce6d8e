//! Output formatting for compiled predicates and reversed filters.

use owo_colors::OwoColorize;
use requery_rs::{FilterResult, FilterWrapper, Predicate, SqlWhere};
use serde::Serialize;
use serde_json::Value as Json;

/// JSON output structure for the compile command.
#[derive(Serialize)]
pub struct CompiledOutput<'a> {
    pub entity: &'a str,
    pub predicate: String,
    pub sql: SqlOutput,
}

/// A parameterized clause with its bound values.
#[derive(Serialize)]
pub struct SqlOutput {
    pub clause: String,
    pub params: Vec<Json>,
}

impl From<SqlWhere> for SqlOutput {
    fn from(sql: SqlWhere) -> Self {
        Self {
            clause: sql.clause,
            params: sql.params.iter().map(|value| value.to_json()).collect(),
        }
    }
}

/// Formats a compiled predicate as JSON, carrying both renderings.
pub fn format_compiled_json(entity: &str, predicate: &Predicate) -> Result<String, serde_json::Error> {
    let output = CompiledOutput {
        entity,
        predicate: predicate.to_string(),
        sql: predicate.to_sql().into(),
    };
    serde_json::to_string_pretty(&output)
}

/// Formats a compiled predicate as readable text.
pub fn format_compiled_text(predicate: &Predicate) -> String {
    format!("{predicate}\n")
}

/// Formats a parameterized SQL clause followed by its numbered parameters.
pub fn format_sql_text(predicate: &Predicate, use_colors: bool) -> String {
    let sql = predicate.to_sql();
    let mut output = format!("{}\n", sql.clause);

    for (index, value) in sql.params.iter().enumerate() {
        let label = format!("?{}", index + 1);
        let type_name = value.value_type().to_string();
        if use_colors {
            output.push_str(&format!(
                "  {} {} {}\n",
                label.dimmed(),
                value,
                type_name.dimmed()
            ));
        } else {
            output.push_str(&format!("  {label} {value} {type_name}\n"));
        }
    }

    output
}

/// JSON output structure for the reverse command.
#[derive(Serialize)]
pub struct ReversedOutput<'a> {
    pub entity: &'a str,
    pub predicate: String,
    /// Query parameter that carries the filter, absent for no filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<&'static str>,
    pub filter: &'a FilterWrapper,
}

/// Formats a reversed filter as JSON, with the predicate it came from.
pub fn format_reversed_json(
    entity: &str,
    predicate: &Predicate,
    wrapper: &FilterWrapper,
) -> FilterResult<String> {
    let output = ReversedOutput {
        entity,
        predicate: predicate.to_string(),
        param: wrapper.to_query_param()?.map(|(name, _)| name),
        filter: wrapper,
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Formats a reversed filter as text: the parameter name and the DSL.
pub fn format_reversed_text(wrapper: &FilterWrapper, use_colors: bool) -> FilterResult<String> {
    let Some((param, _)) = wrapper.to_query_param()? else {
        return Ok("No filter (matches every row).\n".to_string());
    };

    let label = format!("{param}:");
    let body = serde_json::to_string_pretty(wrapper)?;
    if use_colors {
        Ok(format!("{}\n{body}\n", label.green().bold()))
    } else {
        Ok(format!("{label}\n{body}\n"))
    }
}
