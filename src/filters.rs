// ABOUTME: Table include/exclude filtering for selective migration
// ABOUTME: Applied to the discovered source table list

use crate::utils::sanitize_identifier;
use anyhow::{bail, Result};

/// Represents table filtering rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableFilter {
    include_tables: Option<Vec<String>>,
    exclude_tables: Option<Vec<String>>,
}

impl TableFilter {
    /// Creates a filter from CLI arguments
    pub fn new(
        include_tables: Option<Vec<String>>,
        exclude_tables: Option<Vec<String>>,
    ) -> Result<Self> {
        if include_tables.is_some() && exclude_tables.is_some() {
            bail!("Cannot use both --include-tables and --exclude-tables");
        }

        for tables in [&include_tables, &exclude_tables].into_iter().flatten() {
            if tables.iter().any(|t| t.trim().is_empty()) {
                bail!("Table names in filters cannot be empty");
            }
        }

        Ok(Self {
            include_tables,
            exclude_tables,
        })
    }

    /// Creates an empty filter (migrate everything)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.include_tables.is_none() && self.exclude_tables.is_none()
    }

    /// Determines if a table should be migrated
    pub fn should_include(&self, table: &str) -> bool {
        if let Some(ref include) = self.include_tables {
            return include.iter().any(|t| t == table);
        }
        if let Some(ref exclude) = self.exclude_tables {
            return !exclude.iter().any(|t| t == table);
        }
        true
    }

    /// Filter a discovered table list, preserving its order
    ///
    /// Included names that were not discovered are logged and skipped.
    pub fn apply(&self, tables: Vec<String>) -> Vec<String> {
        if let Some(ref include) = self.include_tables {
            for name in include {
                if !tables.contains(name) {
                    tracing::warn!(
                        "⚠ Table '{}' not found in source, skipping",
                        sanitize_identifier(name)
                    );
                }
            }
        }

        tables
            .into_iter()
            .filter(|t| self.should_include(t))
            .collect()
    }
}
