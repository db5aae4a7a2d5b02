// ABOUTME: SQLite schema discovery for the table migrator
// ABOUTME: Lists user tables, reads column schemas, and counts rows

use crate::error::{MigrateError, Result};
use crate::migration::schema::Column;
use crate::utils::quote_ident;
use rusqlite::Connection;

/// List all user tables in a SQLite database
///
/// Queries sqlite_master for user-created tables, excluding the internal
/// `sqlite_*` catalog tables (sqlite_sequence, sqlite_stat1, ...).
///
/// # Returns
///
/// Sorted vector of table names
///
/// # Examples
///
/// ```no_run
/// # use sqlite_duckdb_migrator::sqlite::{open_sqlite, reader::list_tables};
/// # fn example() -> sqlite_duckdb_migrator::error::Result<()> {
/// let conn = open_sqlite("data_files/index.db")?;
/// for table in list_tables(&conn)? {
///     println!("Table: {}", table);
/// }
/// # Ok(())
/// # }
/// ```
pub fn list_tables(conn: &Connection) -> Result<Vec<String>> {
    tracing::debug!("Listing tables from SQLite database");

    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master \
             WHERE type='table' \
             AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )
        .map_err(|e| MigrateError::schema("sqlite_master", e))?;

    let tables = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| MigrateError::schema("sqlite_master", e))?
        .collect::<std::result::Result<Vec<String>, _>>()
        .map_err(|e| MigrateError::schema("sqlite_master", e))?;

    tracing::info!("Found {} user tables in SQLite database", tables.len());

    Ok(tables)
}

/// Read the ordered column schema of a table
///
/// Uses `PRAGMA table_info`. Each column's declared type is returned as
/// written in the DDL (possibly empty, SQLite allows untyped columns).
/// An unknown table yields an empty pragma result, which is reported as a
/// schema error rather than an empty schema.
pub fn get_table_schema(conn: &Connection, table: &str) -> Result<Vec<Column>> {
    tracing::debug!("Reading schema for table '{}'", table);

    let query = format!("PRAGMA table_info({})", quote_ident(table));
    let mut stmt = conn
        .prepare(&query)
        .map_err(|e| MigrateError::schema(table, e))?;

    let columns = stmt
        .query_map([], |row| {
            Ok(Column::new(row.get::<_, String>(1)?, row.get::<_, String>(2)?))
        })
        .map_err(|e| MigrateError::schema(table, e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| MigrateError::schema(table, e))?;

    if columns.is_empty() {
        return Err(MigrateError::schema(
            table,
            "table has no columns or does not exist",
        ));
    }

    tracing::debug!(
        "Table '{}' has {} columns: {:?}",
        table,
        columns.len(),
        columns
    );

    Ok(columns)
}

/// Get row count for a specific table
pub fn get_table_row_count(conn: &Connection, table: &str) -> Result<u64> {
    tracing::debug!("Getting row count for table '{}'", table);

    let query = format!("SELECT COUNT(*) FROM {}", quote_ident(table));

    let count: i64 = conn
        .query_row(&query, [], |row| row.get(0))
        .map_err(|e| MigrateError::execution(table, format!("Failed to count rows: {}", e)))?;

    Ok(count as u64)
}

/// Check whether a table is declared `WITHOUT ROWID`
///
/// Read from the `wr` flag of `pragma_table_list`, not from the DDL text.
pub fn is_without_rowid(conn: &Connection, table: &str) -> Result<bool> {
    let wr: i64 = conn
        .query_row(
            "SELECT wr FROM pragma_table_list WHERE schema = 'main' AND name = ?1",
            [table],
            |row| row.get(0),
        )
        .map_err(|e| MigrateError::schema(table, e))?;

    Ok(wr != 0)
}
