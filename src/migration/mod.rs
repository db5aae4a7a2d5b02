// ABOUTME: Migration module: schema types, per-table migration, and reports
// ABOUTME: Ties the SQLite stream to the DuckDB writer under one transaction per table

pub mod report;
pub mod schema;
pub mod table;

use crate::sqlite::stream::{Pagination, DEFAULT_BATCH_SIZE};
use crate::typemap::TypeMapping;

pub use report::{MigrationReport, TableReport};
pub use schema::Column;
pub use table::migrate_table;

/// Settings for the streaming table migrator
#[derive(Debug, Clone)]
pub struct MigrationOptions {
    /// Rows fetched from the source and inserted per batch
    pub batch_size: usize,
    pub pagination: Pagination,
    /// Drop the destination table before recreating it
    pub drop_existing: bool,
    pub type_mapping: TypeMapping,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            pagination: Pagination::default(),
            drop_existing: false,
            type_mapping: TypeMapping::default(),
        }
    }
}
