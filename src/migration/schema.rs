// ABOUTME: Column schema types shared by the SQLite reader and DuckDB writer
// ABOUTME: Ordered (name, type) pairs; insertion is positional so order matters

use crate::utils::quote_ident;
use serde::Serialize;

/// One column of a table: name plus a type tag in some store's vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub type_tag: String,
}

impl Column {
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
        }
    }
}

/// Quoted, comma-separated column list for SELECT and INSERT statements
pub fn column_list(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|c| quote_ident(&c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Column definitions for CREATE TABLE
pub fn column_definitions(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|c| format!("{} {}", quote_ident(&c.name), c.type_tag))
        .collect::<Vec<_>>()
        .join(", ")
}
