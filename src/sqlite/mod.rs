// ABOUTME: SQLite source store access for migration to DuckDB
// ABOUTME: Provides file path validation and read-only database connections

pub mod reader;
pub mod stream;

use crate::error::{MigrateError, Result};
use std::path::PathBuf;

/// Validate a SQLite file path
///
/// Security checks:
/// - Canonicalizes path to resolve symlinks and relative paths
/// - Verifies file exists and is a regular file (not directory)
/// - Checks file extension is .db, .sqlite, or .sqlite3
///
/// # Arguments
///
/// * `path` - Path to SQLite file (can be relative or absolute)
///
/// # Returns
///
/// Canonicalized absolute path if valid, `MigrateError::Connection` otherwise
///
/// # Examples
///
/// ```no_run
/// # use sqlite_duckdb_migrator::sqlite::validate_sqlite_path;
/// assert!(validate_sqlite_path("data_files/index.db").is_ok());
/// assert!(validate_sqlite_path("../../../etc/passwd").is_err());
/// ```
pub fn validate_sqlite_path(path: &str) -> Result<PathBuf> {
    if path.is_empty() {
        return Err(MigrateError::connection(
            path,
            "SQLite file path cannot be empty",
        ));
    }

    let path_buf = PathBuf::from(path);

    // Canonicalize also validates that the file exists
    let canonical = path_buf.canonicalize().map_err(|e| {
        MigrateError::connection(
            path,
            format!(
                "Failed to resolve SQLite file path ({}). File may not exist or may not be readable.",
                e
            ),
        )
    })?;

    if !canonical.is_file() {
        return Err(MigrateError::connection(
            path,
            "Path is not a regular file (may be a directory)",
        ));
    }

    match canonical.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ["db", "sqlite", "sqlite3"].contains(&ext) => {}
        Some(ext) => {
            return Err(MigrateError::connection(
                path,
                format!(
                    "Invalid SQLite file extension '{}'. Must be .db, .sqlite, or .sqlite3",
                    ext
                ),
            ))
        }
        None => {
            return Err(MigrateError::connection(
                path,
                "SQLite file has no extension. Must be .db, .sqlite, or .sqlite3",
            ))
        }
    }

    tracing::debug!("Validated SQLite path: {}", canonical.display());

    Ok(canonical)
}

/// Open a SQLite database in read-only mode
///
/// The path is validated first, the database is opened with
/// `SQLITE_OPEN_READ_ONLY`, and a version check confirms the file is a
/// readable SQLite database.
///
/// ```no_run
/// # use sqlite_duckdb_migrator::sqlite::open_sqlite;
/// # fn example() -> sqlite_duckdb_migrator::error::Result<()> {
/// let conn = open_sqlite("data_files/index.db")?;
/// # Ok(())
/// # }
/// ```
pub fn open_sqlite(path: &str) -> Result<rusqlite::Connection> {
    let canonical = validate_sqlite_path(path)?;

    tracing::info!("Opening SQLite database: {}", canonical.display());

    let conn = rusqlite::Connection::open_with_flags(
        &canonical,
        rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
    )
    .map_err(|e| MigrateError::connection(path, format!("Failed to open SQLite database: {}", e)))?;

    let version: String = conn
        .query_row("SELECT sqlite_version()", [], |row| row.get(0))
        .map_err(|e| {
            MigrateError::connection(
                path,
                format!(
                    "Failed to query SQLite version (database may be corrupted): {}",
                    e
                ),
            )
        })?;

    tracing::debug!("Opened SQLite database (version {})", version);

    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_validate_empty_path() {
        let result = validate_sqlite_path("");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_validate_nonexistent_file() {
        let result = validate_sqlite_path("/nonexistent/database.db");
        assert!(matches!(result, Err(MigrateError::Connection { .. })));
    }

    #[test]
    fn test_validate_no_extension() {
        let temp_dir = tempfile::tempdir().unwrap();
        let no_ext_path = temp_dir.path().join("test_file_no_ext");
        File::create(&no_ext_path).unwrap();

        let result = validate_sqlite_path(no_ext_path.to_str().unwrap());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("no extension"));
    }

    #[test]
    fn test_validate_wrong_extension() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wrong_ext_path = temp_dir.path().join("test_file.txt");
        File::create(&wrong_ext_path).unwrap();

        let result = validate_sqlite_path(wrong_ext_path.to_str().unwrap());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid SQLite file extension"));
    }

    #[test]
    fn test_validate_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = validate_sqlite_path(temp_dir.path().to_str().unwrap());
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_valid_extensions() {
        let temp_dir = tempfile::tempdir().unwrap();

        for ext in &["db", "sqlite", "sqlite3"] {
            let file_path = temp_dir.path().join(format!("test_file.{}", ext));
            File::create(&file_path).unwrap();

            let result = validate_sqlite_path(file_path.to_str().unwrap());
            assert!(
                result.is_ok(),
                "Extension .{} should be valid, but got error: {:?}",
                ext,
                result.err()
            );
        }
    }

    #[test]
    fn test_open_sqlite_invalid_path() {
        let result = open_sqlite("/nonexistent/database.db");
        assert!(matches!(result, Err(MigrateError::Connection { .. })));
    }

    #[test]
    fn test_open_sqlite_creates_readonly_connection() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("test_readonly.db");

        {
            let conn = rusqlite::Connection::open(&db_path).unwrap();
            conn.execute("CREATE TABLE test (id INTEGER)", []).unwrap();
        }

        let conn = open_sqlite(db_path.to_str().unwrap()).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM test", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);

        // Writes must fail on a read-only connection
        let write_result = conn.execute("INSERT INTO test VALUES (1)", []);
        assert!(write_result.is_err());
        assert!(write_result
            .unwrap_err()
            .to_string()
            .to_lowercase()
            .contains("read"));
    }
}
