// ABOUTME: Query command: run ad-hoc SQL against the destination DuckDB file
// ABOUTME: Used to spot-check migrated data, results rendered as strings

use crate::destination::{self, converter::duckdb_value_to_string};
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl QueryResult {
    /// Render as a tab-separated table with a header line
    pub fn to_tsv(&self) -> String {
        let mut out = self.columns.join("\t");
        for row in &self.rows {
            out.push('\n');
            out.push_str(&row.join("\t"));
        }
        out
    }
}

/// Execute one SQL statement against `target` and collect all rows
///
/// The target must be an existing DuckDB file.
pub fn query(target: &str, sql: &str) -> Result<QueryResult> {
    let conn = destination::open_existing_duckdb(target)
        .context("Failed to open target DuckDB database")?;

    let mut stmt = conn
        .prepare(sql)
        .with_context(|| format!("Failed to prepare query: {}", sql))?;
    let mut rows = stmt.query([]).context("Failed to execute query")?;

    let mut data = Vec::new();
    while let Some(row) = rows.next().context("Failed to read query row")? {
        let column_count = row.as_ref().column_count();
        let mut values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            let value: duckdb::types::Value = row.get(idx).with_context(|| {
                format!("Failed to read column {} of row {}", idx, data.len() + 1)
            })?;
            values.push(duckdb_value_to_string(&value));
        }
        data.push(values);
    }
    drop(rows);

    // Column names are only available once the statement has executed
    Ok(QueryResult {
        columns: stmt.column_names(),
        rows: data,
    })
}
