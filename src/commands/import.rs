// ABOUTME: Import command: copy SQLite tables via DuckDB's sqlite scanner
// ABOUTME: One engine-native CREATE TABLE AS statement per table, no client batching

use crate::destination::{self, scan};
use crate::filters::TableFilter;
use crate::migration::{MigrationReport, TableReport};
use crate::sqlite;
use crate::utils::{format_count, validate_source_target_different};
use anyhow::{Context, Result};

/// Copy tables with `sqlite_scan`
///
/// Destination column types are inferred by DuckDB; no type mapping is
/// applied. Without `replace_existing`, a table that already exists in the
/// destination makes the run fail.
///
/// `install_extension` runs `INSTALL sqlite` first, which may download the
/// extension.
pub fn import(
    source: &str,
    target: &str,
    filter: &TableFilter,
    replace_existing: bool,
    install_extension: bool,
) -> Result<MigrationReport> {
    validate_source_target_different(source, target)?;

    let source_path = sqlite::validate_sqlite_path(source)?;
    let source_conn =
        sqlite::open_sqlite(source).context("Failed to connect to source SQLite database")?;
    let tables = filter.apply(
        sqlite::reader::list_tables(&source_conn)
            .context("Failed to discover tables in source database")?,
    );

    let target_conn =
        destination::open_duckdb(target).context("Failed to open target DuckDB database")?;
    scan::load_sqlite_extension(&target_conn, install_extension)
        .context("Failed to load DuckDB sqlite extension")?;

    tracing::info!("Importing {} tables from SQLite to DuckDB...", tables.len());

    let mut report = MigrationReport::new(source, target);

    for table in &tables {
        let source_rows = sqlite::reader::get_table_row_count(&source_conn, table)?;
        let copied = scan::import_table(&target_conn, &source_path, table, replace_existing)
            .with_context(|| format!("Failed to import table '{}'", table))?;

        if copied != source_rows {
            tracing::warn!(
                "⚠ Table '{}': source has {} rows but destination has {}",
                table,
                format_count(source_rows),
                format_count(copied)
            );
        }

        let table_report = TableReport {
            table: table.clone(),
            pagination: None,
            source_rows,
            rows_inserted: copied,
            batch_sizes: Vec::new(),
            destination_rows: copied,
        };
        tracing::info!("{}", table_report.summary_line());
        report.tables.push(table_report);
    }

    tracing::info!(
        "🎉 Import complete! DuckDB database written to: {}",
        target
    );

    Ok(report)
}
