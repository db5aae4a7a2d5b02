// ABOUTME: SQLite to DuckDB value conversion for bound insert parameters
// ABOUTME: Also renders DuckDB values as text for ad-hoc query output

use duckdb::types::Value as DuckValue;
use rusqlite::types::Value as SqliteValue;

/// Convert a SQLite value into a DuckDB parameter value
///
/// Maps SQLite storage classes one to one:
/// - INTEGER → BIGINT
/// - REAL → DOUBLE
/// - TEXT → VARCHAR
/// - BLOB → BLOB
/// - NULL → NULL
///
/// No coercion happens here; DuckDB casts to the destination column type on
/// insert.
pub fn sqlite_value_to_duckdb(value: SqliteValue) -> DuckValue {
    match value {
        SqliteValue::Null => DuckValue::Null,
        SqliteValue::Integer(i) => DuckValue::BigInt(i),
        SqliteValue::Real(f) => DuckValue::Double(f),
        SqliteValue::Text(s) => DuckValue::Text(s),
        SqliteValue::Blob(b) => DuckValue::Blob(b),
    }
}

/// Render a DuckDB value for console output
pub fn duckdb_value_to_string(value: &DuckValue) -> String {
    match value {
        DuckValue::Null => "NULL".to_string(),
        DuckValue::Boolean(b) => b.to_string(),
        DuckValue::TinyInt(i) => i.to_string(),
        DuckValue::SmallInt(i) => i.to_string(),
        DuckValue::Int(i) => i.to_string(),
        DuckValue::BigInt(i) => i.to_string(),
        DuckValue::HugeInt(i) => i.to_string(),
        DuckValue::UTinyInt(i) => i.to_string(),
        DuckValue::USmallInt(i) => i.to_string(),
        DuckValue::UInt(i) => i.to_string(),
        DuckValue::UBigInt(i) => i.to_string(),
        DuckValue::Float(f) => f.to_string(),
        DuckValue::Double(f) => f.to_string(),
        DuckValue::Text(s) => s.clone(),
        DuckValue::Blob(b) => format!("<{} bytes>", b.len()),
        other => format!("{:?}", other),
    }
}
