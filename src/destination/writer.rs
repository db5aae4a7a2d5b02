// ABOUTME: Write migrated tables to DuckDB
// ABOUTME: Handles table creation, schema checks, batch inserts, drops, and counts

use crate::destination::converter::sqlite_value_to_duckdb;
use crate::error::{MigrateError, Result};
use crate::migration::schema::{column_definitions, column_list, Column};
use crate::sqlite::stream::Row;
use crate::utils::quote_ident;
use duckdb::{params, params_from_iter, Connection};

/// Maximum rows per INSERT statement
///
/// A source batch is split into statements of at most this many rows to
/// keep statement text and parameter vectors bounded.
pub const INSERT_CHUNK_ROWS: usize = 1000;

/// Look up a table's stored name in the current schema
///
/// DuckDB resolves identifiers case-insensitively, so `"Users"` and
/// `"users"` name the same table. Returns the name as the catalog stores it.
pub fn resolve_table_name(conn: &Connection, table: &str) -> Result<Option<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT table_name FROM information_schema.tables \
             WHERE lower(table_name) = lower(?) AND table_schema = current_schema()",
        )
        .map_err(|e| MigrateError::execution(table, e))?;

    let names = stmt
        .query_map(params![table], |row| row.get::<_, String>(0))
        .map_err(|e| MigrateError::execution(table, e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| MigrateError::execution(table, e))?;

    Ok(names.into_iter().next())
}

/// Check whether a table exists in the current schema, ignoring case
pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    Ok(resolve_table_name(conn, table)?.is_some())
}

/// Read a destination table's columns in ordinal order
///
/// The table name is matched case-insensitively; an unknown table yields
/// an empty list.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<Column>> {
    let Some(stored) = resolve_table_name(conn, table)? else {
        return Ok(Vec::new());
    };

    let mut stmt = conn
        .prepare(
            "SELECT column_name, data_type FROM information_schema.columns \
             WHERE table_name = ? AND table_schema = current_schema() \
             ORDER BY ordinal_position",
        )
        .map_err(|e| MigrateError::schema(table, e))?;

    let columns = stmt
        .query_map(params![stored], |row| {
            Ok(Column::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(|e| MigrateError::schema(table, e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| MigrateError::schema(table, e))?;

    Ok(columns)
}

/// Ensure a destination table exists with the translated schema
///
/// Create-if-absent: calling this twice with the same schema is a no-op the
/// second time. If a table with this name already exists, its column names
/// and count must match `columns`, otherwise a
/// [`MigrateError::SchemaMismatch`] is returned and nothing is changed.
/// Column types are not compared, DuckDB reports them in normalized form
/// (`DECIMAL` becomes `DECIMAL(18,3)`).
pub fn create_table(conn: &Connection, table: &str, columns: &[Column]) -> Result<()> {
    if columns.is_empty() {
        return Err(MigrateError::schema(table, "cannot create a table with no columns"));
    }

    if let Some(stored) = resolve_table_name(conn, table)? {
        let existing = table_columns(conn, &stored)?;
        let matches = existing.len() == columns.len()
            && existing
                .iter()
                .zip(columns)
                .all(|(found, wanted)| found.name.eq_ignore_ascii_case(&wanted.name));

        if !matches {
            return Err(MigrateError::SchemaMismatch {
                table: stored,
                expected: describe_columns(columns),
                found: describe_columns(&existing),
            });
        }

        tracing::info!(
            "DuckDB table '{}' already exists with matching columns",
            stored
        );
        return Ok(());
    }

    let create_sql = format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_ident(table),
        column_definitions(columns)
    );
    tracing::debug!("{}", create_sql);

    conn.execute_batch(&create_sql)
        .map_err(|e| MigrateError::execution(table, format!("Failed to create table: {}", e)))?;

    tracing::info!("Created DuckDB table: {}", table);

    Ok(())
}

/// Insert one batch of rows
///
/// Builds parameterized multi-row INSERT statements of the form
/// `INSERT INTO "t" ("a", "b") VALUES (?, ?), (?, ?), ...`. Identifiers come
/// from schema metadata and are quoted; every value is a bound parameter.
///
/// # Returns
///
/// Number of rows inserted
pub fn insert_batch(
    conn: &Connection,
    table: &str,
    columns: &[Column],
    rows: Vec<Row>,
) -> Result<usize> {
    if rows.is_empty() {
        return Ok(0);
    }

    let width = columns.len();
    if let Some(bad) = rows.iter().find(|row| row.len() != width) {
        return Err(MigrateError::execution(
            table,
            format!(
                "row has {} values but the table has {} columns",
                bad.len(),
                width
            ),
        ));
    }

    let total = rows.len();
    let row_placeholder = format!("({})", vec!["?"; width].join(", "));
    let insert_prefix = format!(
        "INSERT INTO {} ({}) VALUES ",
        quote_ident(table),
        column_list(columns)
    );

    let mut rows = rows.into_iter().peekable();
    let mut chunk_num = 0;

    while rows.peek().is_some() {
        let chunk: Vec<Row> = rows.by_ref().take(INSERT_CHUNK_ROWS).collect();
        let chunk_len = chunk.len();

        let insert_sql = format!(
            "{}{}",
            insert_prefix,
            vec![row_placeholder.as_str(); chunk_len].join(", ")
        );

        let values = chunk
            .into_iter()
            .flatten()
            .map(sqlite_value_to_duckdb)
            .collect::<Vec<_>>();

        conn.execute(&insert_sql, params_from_iter(values))
            .map_err(|e| {
                MigrateError::execution(
                    table,
                    format!(
                        "Failed to insert chunk {} ({} rows): {}",
                        chunk_num, chunk_len, e
                    ),
                )
            })?;

        tracing::debug!(
            "Inserted chunk {} ({} rows) into '{}'",
            chunk_num,
            chunk_len,
            table
        );
        chunk_num += 1;
    }

    Ok(total)
}

/// Drop a table if present
///
/// Idempotent and irreversible; no backup is taken.
pub fn drop_table(conn: &Connection, table: &str) -> Result<()> {
    let drop_sql = format!("DROP TABLE IF EXISTS {}", quote_ident(table));

    conn.execute_batch(&drop_sql)
        .map_err(|e| MigrateError::execution(table, format!("Failed to drop table: {}", e)))?;

    tracing::info!("Dropped DuckDB table (if it existed): {}", table);

    Ok(())
}

/// Count rows in a destination table
///
/// Fails with [`MigrateError::TableNotFound`] if no table matches `table`,
/// ignoring case.
pub fn row_count(conn: &Connection, table: &str) -> Result<u64> {
    let stored = resolve_table_name(conn, table)?
        .ok_or_else(|| MigrateError::TableNotFound(table.to_string()))?;

    let query = format!("SELECT COUNT(*) FROM {}", quote_ident(&stored));
    let count: i64 = conn
        .query_row(&query, [], |row| row.get(0))
        .map_err(|e| MigrateError::execution(table, format!("Failed to count rows: {}", e)))?;

    Ok(count as u64)
}

fn describe_columns(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|c| format!("{} {}", c.name, c.type_tag))
        .collect::<Vec<_>>()
        .join(", ")
}
