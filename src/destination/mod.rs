// ABOUTME: DuckDB destination store access
// ABOUTME: Opens the target database file, creating it on first connect unless it must exist

pub mod converter;
pub mod csv;
pub mod scan;
pub mod writer;

use crate::error::{MigrateError, Result};
use std::path::Path;

/// Open (or create) a DuckDB database
///
/// `:memory:` opens an in-memory database. For a file path, the parent
/// directory must exist; the database file itself is created if absent.
///
/// ```no_run
/// # use sqlite_duckdb_migrator::destination::open_duckdb;
/// # fn example() -> sqlite_duckdb_migrator::error::Result<()> {
/// let conn = open_duckdb("data_files/index.duckdb")?;
/// # Ok(())
/// # }
/// ```
pub fn open_duckdb(path: &str) -> Result<duckdb::Connection> {
    if path.trim().is_empty() {
        return Err(MigrateError::connection(
            path,
            "DuckDB file path cannot be empty",
        ));
    }

    if path == ":memory:" {
        tracing::debug!("Opening in-memory DuckDB database");
        return duckdb::Connection::open_in_memory()
            .map_err(|e| MigrateError::connection(path, format!("Failed to create in-memory DuckDB: {}", e)));
    }

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(MigrateError::connection(
                path,
                format!("Parent directory '{}' does not exist", parent.display()),
            ));
        }
    }

    tracing::info!("Opening DuckDB database: {}", path);

    let conn = duckdb::Connection::open(path)
        .map_err(|e| MigrateError::connection(path, format!("Failed to open DuckDB database: {}", e)))?;

    conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0))
        .map_err(|e| MigrateError::connection(path, format!("DuckDB health check failed: {}", e)))?;

    Ok(conn)
}

/// Open a DuckDB database that must already exist
///
/// Used by read-side commands so that a mistyped path fails instead of
/// leaving an empty database behind.
pub fn open_existing_duckdb(path: &str) -> Result<duckdb::Connection> {
    if path != ":memory:" && !Path::new(path).is_file() {
        return Err(MigrateError::connection(
            path,
            "DuckDB database file does not exist",
        ));
    }

    open_duckdb(path)
}
