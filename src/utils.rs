// ABOUTME: Utility functions for SQL quoting, validation, and display
// ABOUTME: Shared by the SQLite reader, the DuckDB writer, and the commands

use anyhow::{bail, Result};
use std::path::Path;

/// Quote an identifier for SQLite or DuckDB
///
/// Both engines accept standard double-quoted identifiers. Embedded quotes
/// are doubled, so any name read from catalog metadata can be interpolated
/// safely. Row values must never go through this function; they are always
/// bound as parameters.
///
/// # Examples
///
/// ```
/// # use sqlite_duckdb_migrator::utils::quote_ident;
/// assert_eq!(quote_ident("users"), "\"users\"");
/// assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
/// ```
pub fn quote_ident(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Quote a string literal with single quotes
///
/// Only used where DuckDB does not accept bound parameters (table function
/// arguments in `CREATE TABLE AS`).
///
/// ```
/// # use sqlite_duckdb_migrator::utils::quote_literal;
/// assert_eq!(quote_literal("it's"), "'it''s'");
/// ```
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Sanitize an identifier (table name, column name) for display
///
/// Removes control characters and limits length to prevent log injection.
/// This is for display purposes only.
///
/// ```
/// # use sqlite_duckdb_migrator::utils::sanitize_identifier;
/// assert_eq!(sanitize_identifier("normal_table"), "normal_table");
/// assert_eq!(sanitize_identifier("table\nname"), "tablename");
/// ```
pub fn sanitize_identifier(identifier: &str) -> String {
    identifier
        .chars()
        .filter(|c| !c.is_control())
        .take(100)
        .collect()
}

/// Format a row count with thousands separators
///
/// ```
/// # use sqlite_duckdb_migrator::utils::format_count;
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Validate that source and target paths refer to different files
///
/// Opening the source SQLite file as a DuckDB database would fail at best
/// and corrupt it at worst.
pub fn validate_source_target_different(source: &str, target: &str) -> Result<()> {
    let same = match (
        Path::new(source).canonicalize(),
        Path::new(target).canonicalize(),
    ) {
        (Ok(a), Ok(b)) => a == b,
        // Target not created yet
        _ => source == target,
    };

    if same {
        bail!(
            "Source and target point to the same file: {}\n\
             The destination must be a separate DuckDB file.",
            source
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
        assert_eq!(quote_ident("with space"), "\"with space\"");
    }

    #[test]
    fn test_quote_literal_escapes_single_quotes() {
        assert_eq!(quote_literal("/tmp/o'brien.db"), "'/tmp/o''brien.db'");
    }

    #[test]
    fn test_format_count_groups() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(50000), "50,000");
    }

    #[test]
    fn test_same_path_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.db");
        std::fs::File::create(&path).unwrap();
        let p = path.to_str().unwrap();

        assert!(validate_source_target_different(p, p).is_err());
        let other = dir.path().join("index.duckdb");
        assert!(validate_source_target_different(p, other.to_str().unwrap()).is_ok());
    }
}
