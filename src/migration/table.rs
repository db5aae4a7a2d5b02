// ABOUTME: Streams one SQLite table into DuckDB under a single transaction
// ABOUTME: Schema is translated before any DDL; failures roll the table back

use super::report::TableReport;
use super::schema::Column;
use super::MigrationOptions;
use crate::destination::writer::{create_table, drop_table, insert_batch, row_count};
use crate::error::{MigrateError, Result};
use crate::sqlite::reader::{get_table_row_count, get_table_schema};
use crate::sqlite::stream::BatchStream;
use crate::typemap::translate_schema;
use crate::utils::format_count;
use indicatif::ProgressBar;

/// Migrate one table from SQLite to DuckDB
///
/// Steps:
/// 1. Read the source schema and translate it through the type mapping.
///    An unmapped type fails here, before the destination is touched.
/// 2. Open one DuckDB transaction covering the optional drop, the
///    create-if-absent, and every batch insert.
/// 3. Stream the source in batches and append each batch.
/// 4. Commit once, then read back the destination row count.
///
/// On any failure after step 2 the transaction is rolled back, so the
/// destination table is left as it was before the call (absent, or at its
/// previously committed content).
///
/// `progress` is advanced by the number of rows in each batch; pass
/// `ProgressBar::hidden()` when no output is wanted.
pub fn migrate_table(
    source: &rusqlite::Connection,
    destination: &mut duckdb::Connection,
    table: &str,
    options: &MigrationOptions,
    progress: &ProgressBar,
) -> Result<TableReport> {
    let source_schema = get_table_schema(source, table)?;
    let destination_schema = translate_schema(table, &source_schema, &options.type_mapping)?;

    let source_rows = get_table_row_count(source, table)?;
    tracing::info!(
        "Streaming {} rows from {}",
        format_count(source_rows),
        table
    );
    progress.set_length(source_rows);
    progress.set_position(0);
    progress.set_message(table.to_string());

    let stream = BatchStream::new(
        source,
        table,
        &source_schema,
        options.batch_size,
        options.pagination,
    )?;
    let pagination = stream.pagination();

    let tx = destination
        .transaction()
        .map_err(|e| MigrateError::execution(table, format!("Failed to begin transaction: {}", e)))?;

    let (rows_inserted, batch_sizes) =
        match write_table(&tx, table, &destination_schema, stream, options, progress) {
            Ok(written) => written,
            Err(e) => {
                tracing::warn!("Rolling back migration of '{}': {}", table, e);
                if let Err(rollback_err) = tx.rollback() {
                    tracing::error!("Rollback of '{}' failed: {}", table, rollback_err);
                }
                return Err(e);
            }
        };

    tx.commit()
        .map_err(|e| MigrateError::execution(table, format!("Failed to commit: {}", e)))?;

    let destination_rows = row_count(destination, table)?;
    tracing::info!(
        "Migration complete! DuckDB table {} now has {} rows",
        table,
        format_count(destination_rows)
    );

    Ok(TableReport {
        table: table.to_string(),
        pagination: Some(pagination),
        source_rows,
        rows_inserted,
        batch_sizes,
        destination_rows,
    })
}

fn write_table(
    conn: &duckdb::Connection,
    table: &str,
    columns: &[Column],
    mut stream: BatchStream<'_>,
    options: &MigrationOptions,
    progress: &ProgressBar,
) -> Result<(u64, Vec<usize>)> {
    if options.drop_existing {
        drop_table(conn, table)?;
    }
    create_table(conn, table, columns)?;

    let mut total_inserted = 0u64;
    let mut batch_sizes = Vec::new();

    for batch in stream.by_ref() {
        let batch = batch?;
        let inserted = insert_batch(conn, table, columns, batch.rows)?;

        total_inserted += inserted as u64;
        batch_sizes.push(inserted);
        progress.inc(inserted as u64);

        // Keep log lines from tearing through the bar
        progress.suspend(|| {
            tracing::info!(
                "Inserted {} rows (total: {})",
                format_count(inserted as u64),
                format_count(total_inserted)
            )
        });
    }

    tracing::debug!(
        "Read {} rows from source table '{}'",
        format_count(stream.rows_yielded()),
        table
    );

    Ok((total_inserted, batch_sizes))
}
