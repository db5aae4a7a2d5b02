// ABOUTME: Integration tests for the bulk-scan importer
// ABOUTME: Needs DuckDB's sqlite extension; run with `cargo test -- --ignored`

use rusqlite::Connection;
use sqlite_duckdb_migrator::commands;
use sqlite_duckdb_migrator::filters::TableFilter;
use tempfile::TempDir;

fn create_source(dir: &TempDir) -> (String, String) {
    let source = dir.path().join("index.db");
    let target = dir.path().join("index.duckdb");

    let conn = Connection::open(&source).unwrap();
    conn.execute_batch(
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);
         INSERT INTO users VALUES (1, 'Alice'), (2, 'Bob'), (3, 'Carol');
         CREATE TABLE notes (id INTEGER, body TEXT);
         INSERT INTO notes VALUES (1, 'hello');",
    )
    .unwrap();

    (
        source.to_str().unwrap().to_string(),
        target.to_str().unwrap().to_string(),
    )
}

#[test]
#[ignore] // INSTALL sqlite downloads the extension
fn test_import_copies_all_tables() {
    let dir = TempDir::new().unwrap();
    let (source, target) = create_source(&dir);

    let report = commands::import(&source, &target, &TableFilter::empty(), false, true).unwrap();

    assert_eq!(report.tables.len(), 2);
    let users = report.table("users").unwrap();
    assert_eq!(users.source_rows, 3);
    assert_eq!(users.destination_rows, 3);
    assert_eq!(users.pagination, None);
    assert!(users.batch_sizes.is_empty());

    let result = commands::query(&target, "SELECT name FROM users ORDER BY id").unwrap();
    let names: Vec<&str> = result.rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
}

#[test]
#[ignore] // INSTALL sqlite downloads the extension
fn test_import_existing_table_requires_replace() {
    let dir = TempDir::new().unwrap();
    let (source, target) = create_source(&dir);
    let filter = TableFilter::new(Some(vec!["users".to_string()]), None).unwrap();

    commands::import(&source, &target, &filter, false, true).unwrap();
    assert!(commands::import(&source, &target, &filter, false, true).is_err());

    let report = commands::import(&source, &target, &filter, true, true).unwrap();
    assert_eq!(report.table("users").unwrap().destination_rows, 3);
}
