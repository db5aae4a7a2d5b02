// ABOUTME: Migrate command: stream every selected SQLite table into DuckDB
// ABOUTME: Discovers, translates, creates, and copies tables one at a time

use crate::destination;
use crate::filters::TableFilter;
use crate::migration::{migrate_table, MigrationOptions, MigrationReport};
use crate::sqlite;
use crate::utils::{format_count, validate_source_target_different};
use anyhow::{Context, Result};

/// Migrate tables from a SQLite file into a DuckDB file
///
/// Tables are migrated sequentially, each in its own DuckDB transaction.
/// The first failing table stops the run: its transaction is rolled back
/// and the error is returned, while tables committed before it stay in the
/// destination.
///
/// # Arguments
///
/// * `source` - Path to the SQLite database
/// * `target` - Path to the DuckDB database (created if absent)
/// * `filter` - Which source tables to migrate
/// * `options` - Batch size, pagination, type mapping, drop behavior
/// * `quiet` - Suppress progress bars
///
/// # Examples
///
/// ```no_run
/// # use sqlite_duckdb_migrator::commands;
/// # use sqlite_duckdb_migrator::filters::TableFilter;
/// # use sqlite_duckdb_migrator::migration::MigrationOptions;
/// # fn example() -> anyhow::Result<()> {
/// let report = commands::migrate(
///     "data_files/index.db",
///     "data_files/index.duckdb",
///     &TableFilter::empty(),
///     &MigrationOptions::default(),
///     false,
/// )?;
/// println!("{} rows copied", report.total_rows());
/// # Ok(())
/// # }
/// ```
pub fn migrate(
    source: &str,
    target: &str,
    filter: &TableFilter,
    options: &MigrationOptions,
    quiet: bool,
) -> Result<MigrationReport> {
    validate_source_target_different(source, target)?;

    let source_conn =
        sqlite::open_sqlite(source).context("Failed to connect to source SQLite database")?;
    tracing::info!("Connected to database: {}", source);

    let tables = sqlite::reader::list_tables(&source_conn)
        .context("Failed to discover tables in source database")?;
    let discovered = tables.len();
    let tables = filter.apply(tables);
    if !filter.is_empty() {
        tracing::info!(
            "Table filter selected {} of {} tables",
            tables.len(),
            discovered
        );
    }

    let mut target_conn =
        destination::open_duckdb(target).context("Failed to open target DuckDB database")?;

    tracing::info!(
        "Migrating {} tables from SQLite to DuckDB (batch size {}, {:?} pagination)...",
        tables.len(),
        format_count(options.batch_size as u64),
        options.pagination
    );

    let mut report = MigrationReport::new(source, target);

    for table in &tables {
        let progress = super::table_progress_bar(quiet)?;

        let table_report = migrate_table(&source_conn, &mut target_conn, table, options, &progress)
            .with_context(|| format!("Failed to migrate table '{}'", table));
        progress.finish_and_clear();

        let table_report = table_report?;
        tracing::info!("{}", table_report.summary_line());
        report.tables.push(table_report);
    }

    tracing::info!(
        "🎉 Migration complete! {} rows in {} tables written to {}",
        format_count(report.total_rows()),
        report.tables.len(),
        target
    );

    Ok(report)
}
