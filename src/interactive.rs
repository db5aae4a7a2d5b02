// ABOUTME: Interactive terminal UI for source table selection
// ABOUTME: Provides a multi-select prompt and a confirmation step

use crate::filters::TableFilter;
use crate::sqlite;
use anyhow::{bail, Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, MultiSelect};

/// Interactive table selection
///
/// Discovers the source tables, presents them in a multi-select list (all
/// pre-selected), shows a summary, and asks for confirmation.
///
/// Returns a `TableFilter` including exactly the selected tables.
///
/// # Examples
///
/// ```no_run
/// # use sqlite_duckdb_migrator::interactive::select_tables;
/// # fn example() -> anyhow::Result<()> {
/// let filter = select_tables("data_files/index.db")?;
/// # Ok(())
/// # }
/// ```
pub fn select_tables(source_path: &str) -> Result<TableFilter> {
    tracing::info!("Starting interactive table selection...");

    let conn = sqlite::open_sqlite(source_path).context("Failed to open source database")?;
    let tables =
        sqlite::reader::list_tables(&conn).context("Failed to list tables in source database")?;

    if tables.is_empty() {
        tracing::warn!("⚠ No user tables found in source");
        return Ok(TableFilter::empty());
    }

    println!("Select tables to migrate:");
    println!("(Use arrow keys to navigate, Space to select, Enter to confirm)");
    println!();

    let defaults = vec![true; tables.len()];
    let selections = MultiSelect::with_theme(&ColorfulTheme::default())
        .items(&tables)
        .defaults(&defaults)
        .interact()
        .context("Failed to get table selection")?;

    if selections.is_empty() {
        bail!("No tables selected");
    }

    let selected: Vec<String> = selections.iter().map(|&idx| tables[idx].clone()).collect();

    println!();
    println!("Selected {} of {} table(s):", selected.len(), tables.len());
    for table in &selected {
        println!("  - {}", table);
    }
    println!();

    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Proceed with this selection?")
        .default(true)
        .interact()
        .context("Failed to get confirmation")?;

    if !confirmed {
        bail!("Table selection cancelled by user");
    }

    TableFilter::new(Some(selected), None)
}

/// Ask before an irreversible operation unless `assume_yes` is set
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("Failed to get confirmation")
}
