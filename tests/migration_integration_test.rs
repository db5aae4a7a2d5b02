// ABOUTME: Integration tests for the SQLite-to-DuckDB migration workflow
// ABOUTME: Runs the migrate, inspect, query, and drop commands against real temp files

use rusqlite::Connection;
use sqlite_duckdb_migrator::commands;
use sqlite_duckdb_migrator::config::{self, OptionOverrides};
use sqlite_duckdb_migrator::destination::{self, writer};
use sqlite_duckdb_migrator::filters::TableFilter;
use sqlite_duckdb_migrator::migration::MigrationOptions;
use sqlite_duckdb_migrator::sqlite::stream::Pagination;
use sqlite_duckdb_migrator::MigrateError;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

struct Fixture {
    _dir: TempDir,
    source: String,
    target: String,
}

/// Create a SQLite database with multiple tables and data types
fn create_fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("index.db");
    let target = dir.path().join("index.duckdb");

    let conn = Connection::open(&source).unwrap();
    conn.execute_batch(
        "
        CREATE TABLE users (
            id INTEGER PRIMARY KEY,
            name TEXT
        );

        CREATE TABLE posts (
            id INTEGER PRIMARY KEY,
            user_id INTEGER,
            title TEXT NOT NULL,
            score REAL,
            body BLOB
        );

        CREATE TABLE empty_table (
            id INTEGER PRIMARY KEY,
            data TEXT
        );

        CREATE INDEX idx_posts_user ON posts(user_id);

        INSERT INTO users VALUES (1, 'Alice'), (2, 'Bob'), (3, 'Carol');

        INSERT INTO posts VALUES
            (1, 1, 'First Post', 4.5, X'48656c6c6f'),
            (2, 1, 'Second Post', NULL, NULL),
            (3, 2, 'Bob Post', 1.25, X'576f726c64');
    ",
    )
    .unwrap();

    Fixture {
        source: source.to_str().unwrap().to_string(),
        target: target.to_str().unwrap().to_string(),
        _dir: dir,
    }
}

fn options(batch_size: usize) -> MigrationOptions {
    MigrationOptions {
        batch_size,
        ..MigrationOptions::default()
    }
}

fn count(target: &str, table: &str) -> i64 {
    let conn = duckdb::Connection::open(target).unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM \"{}\"", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn test_migrate_all_tables() {
    let fx = create_fixture();

    let report =
        commands::migrate(&fx.source, &fx.target, &TableFilter::empty(), &options(2), true)
            .unwrap();

    let names: Vec<&str> = report.tables.iter().map(|t| t.table.as_str()).collect();
    assert_eq!(names, vec!["empty_table", "posts", "users"]);
    assert_eq!(report.total_rows(), 6);

    let users = report.table("users").unwrap();
    assert_eq!(users.batch_sizes, vec![2, 1]);
    assert_eq!(users.pagination, Some(Pagination::Keyset));
    assert_eq!(users.source_rows, 3);
    assert_eq!(users.destination_rows, 3);

    let empty = report.table("empty_table").unwrap();
    assert_eq!(empty.destination_rows, 0);
    assert!(empty.batch_sizes.is_empty());

    assert_eq!(count(&fx.target, "users"), 3);
    assert_eq!(count(&fx.target, "posts"), 3);
    assert_eq!(count(&fx.target, "empty_table"), 0);
}

#[test]
fn test_migrated_values_round_trip() {
    let fx = create_fixture();
    commands::migrate(&fx.source, &fx.target, &TableFilter::empty(), &options(10), true).unwrap();

    let result = commands::query(
        &fx.target,
        "SELECT id, user_id, title, score FROM posts ORDER BY id",
    )
    .unwrap();
    assert_eq!(result.columns, vec!["id", "user_id", "title", "score"]);
    assert_eq!(result.rows[0], vec!["1", "1", "First Post", "4.5"]);
    assert_eq!(result.rows[2][2], "Bob Post");

    let conn = duckdb::Connection::open(&fx.target).unwrap();
    let null_scores: i64 = conn
        .query_row("SELECT COUNT(*) FROM posts WHERE score IS NULL", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(null_scores, 1);

    let body: Vec<u8> = conn
        .query_row("SELECT body FROM posts WHERE id = 1", [], |row| row.get(0))
        .unwrap();
    assert_eq!(body, b"Hello".to_vec());
}

#[test]
fn test_destination_column_types() {
    let fx = create_fixture();
    commands::migrate(&fx.source, &fx.target, &TableFilter::empty(), &options(10), true).unwrap();

    let conn = destination::open_duckdb(&fx.target).unwrap();
    let columns = writer::table_columns(&conn, "posts").unwrap();
    let types: Vec<&str> = columns.iter().map(|c| c.type_tag.as_str()).collect();
    assert_eq!(types, vec!["INTEGER", "INTEGER", "VARCHAR", "DOUBLE", "BLOB"]);
}

#[test]
fn test_system_tables_and_indexes_not_migrated() {
    let fx = create_fixture();
    {
        let conn = Connection::open(&fx.source).unwrap();
        conn.execute_batch(
            "CREATE TABLE seq (id INTEGER PRIMARY KEY AUTOINCREMENT, v TEXT);
             INSERT INTO seq (v) VALUES ('x');",
        )
        .unwrap();
    }

    let report =
        commands::migrate(&fx.source, &fx.target, &TableFilter::empty(), &options(10), true)
            .unwrap();

    assert!(report.table("sqlite_sequence").is_none());
    assert!(report.table("idx_posts_user").is_none());
    assert_eq!(report.table("seq").unwrap().destination_rows, 1);
}

#[test]
fn test_include_and_exclude_filters() {
    let fx = create_fixture();

    let include = TableFilter::new(Some(vec!["users".to_string()]), None).unwrap();
    let report = commands::migrate(&fx.source, &fx.target, &include, &options(10), true).unwrap();
    assert_eq!(report.tables.len(), 1);

    let conn = destination::open_duckdb(&fx.target).unwrap();
    assert!(writer::table_exists(&conn, "users").unwrap());
    assert!(!writer::table_exists(&conn, "posts").unwrap());
    drop(conn);

    let exclude = TableFilter::new(None, Some(vec!["users".to_string()])).unwrap();
    let report = commands::migrate(&fx.source, &fx.target, &exclude, &options(10), true).unwrap();
    let names: Vec<&str> = report.tables.iter().map(|t| t.table.as_str()).collect();
    assert_eq!(names, vec!["empty_table", "posts"]);
}

#[test]
fn test_rerun_appends_unless_drop_existing() {
    let fx = create_fixture();
    let filter = TableFilter::new(Some(vec!["users".to_string()]), None).unwrap();

    commands::migrate(&fx.source, &fx.target, &filter, &options(10), true).unwrap();
    commands::migrate(&fx.source, &fx.target, &filter, &options(10), true).unwrap();
    assert_eq!(count(&fx.target, "users"), 6);

    let mut replace = options(10);
    replace.drop_existing = true;
    commands::migrate(&fx.source, &fx.target, &filter, &replace, true).unwrap();
    assert_eq!(count(&fx.target, "users"), 3);
}

#[test]
fn test_unsupported_type_stops_run_and_creates_nothing() {
    let fx = create_fixture();
    {
        let conn = Connection::open(&fx.source).unwrap();
        conn.execute_batch(
            "CREATE TABLE zz_shapes (id INTEGER, outline GEOMETRY);
             INSERT INTO zz_shapes VALUES (1, 'POINT(0 0)');",
        )
        .unwrap();
    }

    let err = commands::migrate(&fx.source, &fx.target, &TableFilter::empty(), &options(10), true)
        .unwrap_err();
    let migrate_err = err.downcast_ref::<MigrateError>().unwrap();
    assert!(matches!(
        migrate_err,
        MigrateError::UnsupportedType { type_tag, .. } if type_tag == "GEOMETRY"
    ));

    // Tables sorted before the failure stay committed
    let conn = destination::open_duckdb(&fx.target).unwrap();
    assert!(writer::table_exists(&conn, "users").unwrap());
    assert!(!writer::table_exists(&conn, "zz_shapes").unwrap());
}

#[test]
fn test_fallback_type_from_config() {
    let fx = create_fixture();
    {
        let conn = Connection::open(&fx.source).unwrap();
        conn.execute_batch(
            "CREATE TABLE shapes (id INTEGER, outline GEOMETRY);
             INSERT INTO shapes VALUES (1, 'POINT(0 0)');",
        )
        .unwrap();
    }

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "batch_size = 1\npagination = \"offset\"\n\n[type_mapping]\nfallback = \"VARCHAR\""
    )
    .unwrap();

    let options = config::load_options(
        Some(file.path().to_str().unwrap()),
        &OptionOverrides::default(),
    )
    .unwrap();
    assert_eq!(options.pagination, Pagination::Offset);

    let filter = TableFilter::new(Some(vec!["shapes".to_string()]), None).unwrap();
    let report = commands::migrate(&fx.source, &fx.target, &filter, &options, true).unwrap();
    let shapes = report.table("shapes").unwrap();
    assert_eq!(shapes.pagination, Some(Pagination::Offset));
    assert_eq!(shapes.destination_rows, 1);

    let result = commands::query(&fx.target, "SELECT outline FROM shapes").unwrap();
    assert_eq!(result.rows[0][0], "POINT(0 0)");
}

#[test]
fn test_without_rowid_table_falls_back_to_offset() {
    let fx = create_fixture();
    {
        let conn = Connection::open(&fx.source).unwrap();
        conn.execute_batch(
            "CREATE TABLE tags (tag TEXT PRIMARY KEY, uses INTEGER) WITHOUT ROWID;
             INSERT INTO tags VALUES ('a', 1), ('b', 2), ('c', 3);",
        )
        .unwrap();
    }

    let filter = TableFilter::new(Some(vec!["tags".to_string()]), None).unwrap();
    let report = commands::migrate(&fx.source, &fx.target, &filter, &options(2), true).unwrap();

    let tags = report.table("tags").unwrap();
    assert_eq!(tags.pagination, Some(Pagination::Offset));
    assert_eq!(tags.batch_sizes, vec![2, 1]);
    assert_eq!(count(&fx.target, "tags"), 3);
}

#[test]
fn test_inspect_matches_migration_plan() {
    let fx = create_fixture();
    let tables = commands::inspect(
        &fx.source,
        &TableFilter::empty(),
        &MigrationOptions::default().type_mapping,
    )
    .unwrap();

    assert_eq!(tables.len(), 3);
    assert!(tables.iter().all(|t| t.is_migratable()));
    let posts = tables.iter().find(|t| t.table == "posts").unwrap();
    assert_eq!(posts.rows, 3);
    assert_eq!(posts.columns[3].destination_type.as_deref(), Some("DOUBLE"));
}

#[test]
fn test_teardown_drops_migrated_tables() {
    let fx = create_fixture();
    commands::migrate(&fx.source, &fx.target, &TableFilter::empty(), &options(10), true).unwrap();

    let dropped = commands::teardown(&fx.source, &fx.target, &TableFilter::empty(), true).unwrap();
    assert_eq!(dropped, vec!["empty_table", "posts", "users"]);

    let conn = destination::open_duckdb(&fx.target).unwrap();
    for table in &dropped {
        assert!(!writer::table_exists(&conn, table).unwrap());
    }

    let err = writer::row_count(&conn, "users").unwrap_err();
    assert!(matches!(err, MigrateError::TableNotFound(_)));

    // Dropping again is a no-op
    drop(conn);
    commands::teardown(&fx.source, &fx.target, &TableFilter::empty(), true).unwrap();
}

#[test]
fn test_missing_source_is_connection_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.db");
    let target = dir.path().join("out.duckdb");

    let err = commands::migrate(
        missing.to_str().unwrap(),
        target.to_str().unwrap(),
        &TableFilter::empty(),
        &MigrationOptions::default(),
        true,
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<MigrateError>(),
        Some(MigrateError::Connection { .. })
    ));
}
