// ABOUTME: Bulk import of SQLite tables through DuckDB's sqlite scanner
// ABOUTME: One CREATE TABLE AS SELECT per table; DuckDB infers column types

use crate::destination::writer::row_count;
use crate::error::{MigrateError, Result};
use crate::utils::{quote_ident, quote_literal};
use duckdb::Connection;
use std::path::Path;

/// Load DuckDB's sqlite extension, installing it first if requested
///
/// Installing downloads the extension from the DuckDB extension repository
/// unless it is already cached locally.
pub fn load_sqlite_extension(conn: &Connection, install: bool) -> Result<()> {
    if install {
        tracing::info!("Installing DuckDB sqlite extension");
        conn.execute_batch("INSTALL sqlite")
            .map_err(|e| MigrateError::execution("sqlite extension", format!("INSTALL failed: {}", e)))?;
    }

    conn.execute_batch("LOAD sqlite")
        .map_err(|e| MigrateError::execution("sqlite extension", format!("LOAD failed: {}", e)))?;

    tracing::debug!("DuckDB sqlite extension loaded");

    Ok(())
}

/// Build the statement that copies one table in a single engine-native step
pub fn import_table_sql(source_path: &Path, table: &str, replace: bool) -> String {
    format!(
        "CREATE {}TABLE {} AS SELECT * FROM sqlite_scan({}, {})",
        if replace { "OR REPLACE " } else { "" },
        quote_ident(table),
        quote_literal(&source_path.to_string_lossy()),
        quote_literal(table)
    )
}

/// Copy one SQLite table into DuckDB via `sqlite_scan`
///
/// Structure and data move in one statement. Without `replace`, an existing
/// destination table makes the statement fail.
///
/// # Returns
///
/// Row count of the new destination table
pub fn import_table(
    conn: &Connection,
    source_path: &Path,
    table: &str,
    replace: bool,
) -> Result<u64> {
    let sql = import_table_sql(source_path, table, replace);
    tracing::debug!("{}", sql);

    conn.execute_batch(&sql)
        .map_err(|e| MigrateError::execution(table, format!("Bulk scan import failed: {}", e)))?;

    row_count(conn, table)
}
