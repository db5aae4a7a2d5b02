// ABOUTME: Load CSV files into DuckDB tables with the built-in CSV reader
// ABOUTME: One CREATE TABLE AS SELECT per file; DuckDB sniffs the dialect and column types

use crate::destination::writer::row_count;
use crate::error::{MigrateError, Result};
use crate::utils::{quote_ident, quote_literal};
use duckdb::Connection;
use std::path::Path;

/// Build the statement that loads one CSV file into `table`
pub fn ingest_csv_sql(csv_path: &Path, table: &str, replace: bool) -> String {
    format!(
        "CREATE {}TABLE {} AS SELECT * FROM read_csv_auto({})",
        if replace { "OR REPLACE " } else { "" },
        quote_ident(table),
        quote_literal(&csv_path.to_string_lossy())
    )
}

/// Create `table` from a CSV file
///
/// The header row names the columns. Without `replace`, an existing
/// destination table makes the statement fail and nothing is changed.
///
/// # Returns
///
/// Row count of the new destination table
pub fn ingest_csv(
    conn: &Connection,
    csv_path: &Path,
    table: &str,
    replace: bool,
) -> Result<u64> {
    if !csv_path.is_file() {
        return Err(MigrateError::connection(
            csv_path.to_string_lossy(),
            "CSV file does not exist or is not a regular file",
        ));
    }

    let sql = ingest_csv_sql(csv_path, table, replace);
    tracing::debug!("{}", sql);

    conn.execute_batch(&sql)
        .map_err(|e| MigrateError::execution(table, format!("CSV ingest failed: {}", e)))?;

    row_count(conn, table)
}
