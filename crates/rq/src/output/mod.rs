//! Output formatting utilities for the rq CLI.
//!
//! - [`predicate`] - compiled predicates and reversed filters
//! - [`rows`] - rows matched by `apply`
//! - [`schema`] - configured entities and their fields
//! - [`helpers`] - common formatting utilities

pub mod helpers;
mod predicate;
mod rows;
mod schema;

pub use predicate::{
    format_compiled_json, format_compiled_text, format_reversed_json, format_reversed_text,
    format_sql_text,
};
pub use rows::{format_rows_json, format_rows_lines};
pub use schema::{format_entities_json, format_entities_table, format_fields_table};
