// ABOUTME: Teardown command: drop destination tables named after source tables
// ABOUTME: Resets migration state before a re-run; irreversible, no backup

use crate::destination::{self, writer};
use crate::filters::TableFilter;
use crate::interactive;
use crate::sqlite;
use crate::utils::sanitize_identifier;
use anyhow::{Context, Result};

/// Drop every selected source table's counterpart in the destination
///
/// Tables that do not exist in the destination are skipped silently.
/// Asks for confirmation unless `yes` is set.
///
/// # Returns
///
/// Names of the tables the drop was issued for (empty if cancelled)
pub fn teardown(source: &str, target: &str, filter: &TableFilter, yes: bool) -> Result<Vec<String>> {
    let source_conn =
        sqlite::open_sqlite(source).context("Failed to connect to source SQLite database")?;
    let tables = filter.apply(
        sqlite::reader::list_tables(&source_conn)
            .context("Failed to discover tables in source database")?,
    );
    drop(source_conn);

    if tables.is_empty() {
        tracing::info!("No tables to drop");
        return Ok(tables);
    }

    let prompt = format!(
        "Drop {} table(s) from {}? This cannot be undone",
        tables.len(),
        target
    );
    if !interactive::confirm(&prompt, yes)? {
        tracing::info!("Teardown cancelled");
        return Ok(Vec::new());
    }

    let target_conn =
        destination::open_duckdb(target).context("Failed to open target DuckDB database")?;

    for table in &tables {
        writer::drop_table(&target_conn, table)
            .with_context(|| format!("Failed to drop table '{}'", table))?;
        tracing::info!(
            "All data deleted from DuckDB table {}",
            sanitize_identifier(table)
        );
    }

    Ok(tables)
}
