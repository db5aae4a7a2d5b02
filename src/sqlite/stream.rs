// ABOUTME: Batched, forward-only streaming of SQLite table rows
// ABOUTME: Keyset pagination over rowid with LIMIT/OFFSET as fallback

use crate::error::{MigrateError, Result};
use crate::migration::schema::{column_list, Column};
use crate::sqlite::reader::is_without_rowid;
use crate::utils::{format_count, quote_ident};
use rusqlite::types::Value;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

/// Rows fetched per batch unless configured otherwise
pub const DEFAULT_BATCH_SIZE: usize = 50_000;

/// Names SQLite accepts for the implicit rowid, in order of preference
const ROWID_ALIASES: [&str; 3] = ["rowid", "_rowid_", "oid"];

/// How the stream pages through a table
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Pagination {
    /// `WHERE rowid > last ORDER BY rowid LIMIT n`, robust to concurrent
    /// inserts and deletes
    #[default]
    Keyset,
    /// `LIMIT n OFFSET k` in the store's scan order; the table must not be
    /// mutated during the scan or rows can be skipped or duplicated
    Offset,
}

/// One source row, values in column order
pub type Row = Vec<Value>;

/// A bounded chunk of rows taken from the source in one fetch
#[derive(Debug, Clone, PartialEq)]
pub struct RowBatch {
    /// 1-based position of the first row within the scan
    pub first_row: u64,
    pub rows: Vec<Row>,
}

impl RowBatch {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 1-based position of the last row within the scan
    pub fn last_row(&self) -> u64 {
        self.first_row + self.rows.len() as u64 - 1
    }
}

#[derive(Debug, Clone, Copy)]
enum Cursor {
    Offset(u64),
    Keyset(Option<i64>),
}

/// Lazy sequence of [`RowBatch`] covering every row of a table once
///
/// The stream borrows the source connection, so the connection stays open
/// for the whole scan and is released by its owner once the stream is
/// dropped, whether exhausted or abandoned early. The stream is finite and
/// cannot be restarted; after an error it yields nothing more.
///
/// ```no_run
/// # use sqlite_duckdb_migrator::sqlite::{open_sqlite, reader::get_table_schema};
/// # use sqlite_duckdb_migrator::sqlite::stream::{BatchStream, Pagination};
/// # fn example() -> sqlite_duckdb_migrator::error::Result<()> {
/// let conn = open_sqlite("data_files/index.db")?;
/// let schema = get_table_schema(&conn, "users")?;
/// for batch in BatchStream::new(&conn, "users", &schema, 50_000, Pagination::Keyset)? {
///     let batch = batch?;
///     println!("rows {}..={}", batch.first_row, batch.last_row());
/// }
/// # Ok(())
/// # }
/// ```
pub struct BatchStream<'conn> {
    conn: &'conn Connection,
    table: String,
    first_sql: String,
    next_sql: String,
    column_count: usize,
    batch_size: usize,
    pagination: Pagination,
    cursor: Cursor,
    rows_yielded: u64,
    done: bool,
}

impl<'conn> BatchStream<'conn> {
    /// Prepare a stream over `table`
    ///
    /// With [`Pagination::Keyset`] the table needs a usable rowid: tables
    /// declared `WITHOUT ROWID`, or whose columns shadow every rowid alias,
    /// fall back to offset paging with a warning.
    pub fn new(
        conn: &'conn Connection,
        table: &str,
        columns: &[Column],
        batch_size: usize,
        pagination: Pagination,
    ) -> Result<Self> {
        if batch_size == 0 {
            return Err(MigrateError::Config(
                "batch size must be greater than zero".to_string(),
            ));
        }
        if columns.is_empty() {
            return Err(MigrateError::schema(table, "cannot stream a table with no columns"));
        }

        let table_ref = quote_ident(table);
        let cols = column_list(columns);

        let rowid_alias = match pagination {
            Pagination::Keyset => {
                let alias = if is_without_rowid(conn, table)? {
                    None
                } else {
                    rowid_alias(columns)
                };
                if alias.is_none() {
                    tracing::warn!(
                        "Table '{}' has no usable rowid, falling back to offset pagination",
                        table
                    );
                }
                alias
            }
            Pagination::Offset => None,
        };

        let (pagination, first_sql, next_sql, cursor) = match rowid_alias {
            Some(alias) => (
                Pagination::Keyset,
                format!(
                    "SELECT {alias}, {cols} FROM {table_ref} ORDER BY {alias} LIMIT ?1"
                ),
                format!(
                    "SELECT {alias}, {cols} FROM {table_ref} WHERE {alias} > ?1 ORDER BY {alias} LIMIT ?2"
                ),
                Cursor::Keyset(None),
            ),
            None => {
                let sql = format!("SELECT {cols} FROM {table_ref} LIMIT ?1 OFFSET ?2");
                (Pagination::Offset, sql.clone(), sql, Cursor::Offset(0))
            }
        };

        tracing::debug!(
            "Streaming '{}' with {:?} pagination, batch size {}",
            table,
            pagination,
            batch_size
        );

        Ok(Self {
            conn,
            table: table.to_string(),
            first_sql,
            next_sql,
            column_count: columns.len(),
            batch_size,
            pagination,
            cursor,
            rows_yielded: 0,
            done: false,
        })
    }

    /// Pagination actually in use after any fallback
    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Rows yielded so far
    pub fn rows_yielded(&self) -> u64 {
        self.rows_yielded
    }

    fn fetch(&mut self) -> Result<Vec<Row>> {
        let conn = self.conn;
        let limit = self.batch_size as i64;
        let sql = match self.cursor {
            Cursor::Keyset(None) => &self.first_sql,
            _ => &self.next_sql,
        };

        let mut stmt = conn
            .prepare_cached(sql)
            .map_err(|e| MigrateError::execution(&self.table, e))?;

        let mut rows = match self.cursor {
            Cursor::Offset(offset) => stmt.query(params![limit, offset as i64]),
            Cursor::Keyset(None) => stmt.query(params![limit]),
            Cursor::Keyset(Some(last)) => stmt.query(params![last, limit]),
        }
        .map_err(|e| MigrateError::execution(&self.table, e))?;

        let key_offset = match self.cursor {
            Cursor::Keyset(_) => 1,
            Cursor::Offset(_) => 0,
        };

        let mut batch = Vec::with_capacity(self.batch_size.min(4096));
        let mut last_key = None;

        while let Some(row) = rows
            .next()
            .map_err(|e| MigrateError::execution(&self.table, e))?
        {
            if key_offset == 1 {
                last_key = Some(
                    row.get::<_, i64>(0)
                        .map_err(|e| MigrateError::execution(&self.table, e))?,
                );
            }

            let mut values = Vec::with_capacity(self.column_count);
            for idx in 0..self.column_count {
                let value: Value = row
                    .get(idx + key_offset)
                    .map_err(|e| MigrateError::execution(&self.table, e))?;
                values.push(value);
            }
            batch.push(values);
        }

        self.cursor = match self.cursor {
            Cursor::Offset(offset) => Cursor::Offset(offset + self.batch_size as u64),
            Cursor::Keyset(previous) => Cursor::Keyset(last_key.or(previous)),
        };

        Ok(batch)
    }
}

impl Iterator for BatchStream<'_> {
    type Item = Result<RowBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.fetch() {
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
            Ok(rows) if rows.is_empty() => {
                self.done = true;
                None
            }
            Ok(rows) => {
                // A short fetch can only be the last one
                if rows.len() < self.batch_size {
                    self.done = true;
                }

                let batch = RowBatch {
                    first_row: self.rows_yielded + 1,
                    rows,
                };
                self.rows_yielded += batch.len() as u64;

                tracing::debug!(
                    "Yielding batch from '{}': rows {} to {}",
                    self.table,
                    format_count(batch.first_row),
                    format_count(batch.last_row())
                );

                Some(Ok(batch))
            }
        }
    }
}

/// First rowid alias not shadowed by a real column
fn rowid_alias(columns: &[Column]) -> Option<&'static str> {
    ROWID_ALIASES
        .iter()
        .copied()
        .find(|alias| !columns.iter().any(|c| c.name.eq_ignore_ascii_case(alias)))
}
