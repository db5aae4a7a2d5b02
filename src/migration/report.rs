// ABOUTME: Row-count reports produced by migration and import runs
// ABOUTME: Serializable for the --json summary

use crate::sqlite::stream::Pagination;
use crate::utils::format_count;
use serde::Serialize;

/// Outcome of migrating one table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableReport {
    pub table: String,
    /// Pagination in use after any fallback; `None` for bulk scan imports
    pub pagination: Option<Pagination>,
    /// Row count reported by the source before streaming
    pub source_rows: u64,
    pub rows_inserted: u64,
    /// Size of each insertion call, in order
    pub batch_sizes: Vec<usize>,
    /// Row count of the destination table after commit
    pub destination_rows: u64,
}

impl TableReport {
    pub fn summary_line(&self) -> String {
        format!(
            "✓ Copied table '{}': {} rows",
            self.table,
            format_count(self.destination_rows)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MigrationReport {
    pub source: String,
    pub target: String,
    pub tables: Vec<TableReport>,
}

impl MigrationReport {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            tables: Vec::new(),
        }
    }

    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|t| t.destination_rows).sum()
    }

    pub fn table(&self, name: &str) -> Option<&TableReport> {
        self.tables.iter().find(|t| t.table == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(table: &str, rows: u64) -> TableReport {
        TableReport {
            table: table.to_string(),
            pagination: Some(Pagination::Keyset),
            source_rows: rows,
            rows_inserted: rows,
            batch_sizes: vec![rows as usize],
            destination_rows: rows,
        }
    }

    #[test]
    fn test_totals_and_lookup() {
        let mut summary = MigrationReport::new("index.db", "index.duckdb");
        summary.tables.push(report("users", 1200));
        summary.tables.push(report("posts", 34));

        assert_eq!(summary.total_rows(), 1234);
        assert_eq!(summary.table("posts").unwrap().rows_inserted, 34);
        assert!(summary.table("missing").is_none());
    }

    #[test]
    fn test_summary_line_formats_count() {
        assert_eq!(
            report("users", 50000).summary_line(),
            "✓ Copied table 'users': 50,000 rows"
        );
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(report("users", 3)).unwrap();
        assert_eq!(json["table"], "users");
        assert_eq!(json["pagination"], "keyset");
        assert_eq!(json["batch_sizes"], serde_json::json!([3]));
    }
}
