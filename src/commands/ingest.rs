// ABOUTME: Ingest-CSV command: load a CSV file into a DuckDB table
// ABOUTME: Uses DuckDB's CSV reader; no type mapping or client batching

use crate::destination::{self, csv};
use crate::migration::{MigrationReport, TableReport};
use anyhow::{Context, Result};
use std::path::Path;

/// Load `file` into `table` of the DuckDB database at `target`
///
/// Fails if the table already exists unless `replace_existing` is set.
pub fn ingest_csv(
    file: &str,
    target: &str,
    table: &str,
    replace_existing: bool,
) -> Result<MigrationReport> {
    let csv_path = Path::new(file)
        .canonicalize()
        .with_context(|| format!("Failed to resolve CSV file path: {}", file))?;

    let conn = destination::open_duckdb(target).context("Failed to open target DuckDB database")?;

    let rows = csv::ingest_csv(&conn, &csv_path, table, replace_existing)
        .with_context(|| format!("Failed to ingest '{}' into table '{}'", file, table))?;

    let table_report = TableReport {
        table: table.to_string(),
        pagination: None,
        source_rows: rows,
        rows_inserted: rows,
        batch_sizes: Vec::new(),
        destination_rows: rows,
    };
    tracing::info!("{}", table_report.summary_line());

    let mut report = MigrationReport::new(file, target);
    report.tables.push(table_report);
    Ok(report)
}
