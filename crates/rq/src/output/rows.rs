//! Output formatting for rows matched by a filter.

use serde::Serialize;
use serde_json::Value as Json;

/// JSON output structure for the apply command.
#[derive(Serialize)]
pub struct MatchedRowsOutput<'a> {
    pub matched: usize,
    pub total: usize,
    pub rows: &'a [&'a Json],
}

/// Formats matched rows as JSON with counts.
pub fn format_rows_json(rows: &[&Json], total: usize) -> Result<String, serde_json::Error> {
    let output = MatchedRowsOutput {
        matched: rows.len(),
        total,
        rows,
    };
    serde_json::to_string_pretty(&output)
}

/// Formats matched rows as JSON lines, one compact object per line.
pub fn format_rows_lines(rows: &[&Json]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for row in rows {
        output.push_str(&serde_json::to_string(row)?);
        output.push('\n');
    }
    Ok(output)
}
