// ABOUTME: Command implementations for each CLI subcommand
// ABOUTME: Exports migrate, import, ingest-csv, teardown, inspect, and query commands

pub mod import;
pub mod ingest;
pub mod inspect;
pub mod migrate;
pub mod query;
pub mod teardown;

pub use import::import;
pub use ingest::ingest_csv;
pub use inspect::inspect;
pub use migrate::migrate;
pub use query::query;
pub use teardown::teardown;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

/// Per-table progress bar over source rows
///
/// Hidden when `quiet` is set (JSON output, tests).
pub(crate) fn table_progress_bar(quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("{msg:>20} [{bar:40.cyan/blue}] {pos}/{len} rows ({eta})")
            .context("Invalid progress bar template")?
            .progress_chars("=> "),
    );
    Ok(pb)
}
