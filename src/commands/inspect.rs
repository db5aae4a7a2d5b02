// ABOUTME: Inspect command: show source tables, row counts, and translated types
// ABOUTME: Read-only preview of what a migration would create

use crate::filters::TableFilter;
use crate::sqlite::{self, reader};
use crate::typemap::TypeMapping;
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ColumnInspection {
    pub name: String,
    pub source_type: String,
    /// `None` when the type mapping has no entry and no fallback
    pub destination_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableInspection {
    pub table: String,
    pub rows: u64,
    /// Keyset pagination is unavailable for WITHOUT ROWID tables
    pub without_rowid: bool,
    pub columns: Vec<ColumnInspection>,
}

impl TableInspection {
    /// True if every column has a destination type
    pub fn is_migratable(&self) -> bool {
        self.columns.iter().all(|c| c.destination_type.is_some())
    }
}

/// Describe each selected source table and its translated schema
pub fn inspect(
    source: &str,
    filter: &TableFilter,
    mapping: &TypeMapping,
) -> Result<Vec<TableInspection>> {
    let conn = sqlite::open_sqlite(source).context("Failed to connect to source SQLite database")?;
    let tables = filter.apply(
        reader::list_tables(&conn).context("Failed to discover tables in source database")?,
    );

    let mut inspections = Vec::with_capacity(tables.len());
    for table in tables {
        let schema = reader::get_table_schema(&conn, &table)?;
        let rows = reader::get_table_row_count(&conn, &table)?;
        let without_rowid = reader::is_without_rowid(&conn, &table)?;

        let columns = schema
            .into_iter()
            .map(|column| ColumnInspection {
                destination_type: mapping.resolve(&column.type_tag).map(str::to_string),
                name: column.name,
                source_type: column.type_tag,
            })
            .collect();

        inspections.push(TableInspection {
            table,
            rows,
            without_rowid,
            columns,
        });
    }

    Ok(inspections)
}
