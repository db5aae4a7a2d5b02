// ABOUTME: Type mapping between SQLite declared types and DuckDB types
// ABOUTME: Translates a source column schema before any destination DDL is issued

use crate::error::{MigrateError, Result};
use crate::migration::schema::Column;
use std::collections::BTreeMap;

/// Built-in SQLite to DuckDB type mapping
pub const DEFAULT_TYPE_MAPPING: &[(&str, &str)] = &[
    ("INTEGER", "INTEGER"),
    ("TEXT", "VARCHAR"),
    ("REAL", "DOUBLE"),
    ("BLOB", "BLOB"),
    ("NUMERIC", "DECIMAL"),
    ("VARCHAR", "VARCHAR"),
    ("DATETIME", "TIMESTAMP"),
    ("DATE", "DATE"),
];

/// Mapping from source type tag to destination type tag
///
/// Keys are stored normalized (see [`normalize_type_tag`]). Without a
/// fallback, a tag with no entry is rejected with
/// [`MigrateError::UnsupportedType`]; with a fallback, the fallback type is
/// used instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    types: BTreeMap<String, String>,
    fallback: Option<String>,
}

impl Default for TypeMapping {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_TYPE_MAPPING.iter().copied())
    }
}

impl TypeMapping {
    /// A mapping with no entries and no fallback
    pub fn empty() -> Self {
        Self {
            types: BTreeMap::new(),
            fallback: None,
        }
    }

    pub fn from_pairs<I, S, D>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, D)>,
        S: AsRef<str>,
        D: Into<String>,
    {
        let mut mapping = Self::empty();
        for (source, destination) in pairs {
            mapping.insert(source.as_ref(), destination);
        }
        mapping
    }

    /// Add or replace an entry
    pub fn insert(&mut self, source_type: &str, destination_type: impl Into<String>) {
        self.types
            .insert(normalize_type_tag(source_type), destination_type.into());
    }

    pub fn set_fallback(&mut self, fallback: Option<String>) {
        self.fallback = fallback;
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Resolve a source type tag
    ///
    /// Lookup order: exact normalized tag, then the tag with any
    /// parenthesized parameters removed (`VARCHAR(255)` resolves through
    /// `VARCHAR`), then the fallback.
    pub fn resolve(&self, source_type: &str) -> Option<&str> {
        let normalized = normalize_type_tag(source_type);
        if let Some(found) = self.types.get(&normalized) {
            return Some(found.as_str());
        }

        let base = base_type_tag(&normalized);
        if base != normalized {
            if let Some(found) = self.types.get(base) {
                return Some(found.as_str());
            }
        }

        self.fallback.as_deref()
    }
}

/// Normalize a declared type: trim, upper-case, collapse inner whitespace
pub fn normalize_type_tag(tag: &str) -> String {
    tag.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn base_type_tag(normalized: &str) -> &str {
    match normalized.find('(') {
        Some(idx) => normalized[..idx].trim_end(),
        None => normalized,
    }
}

/// Translate a source schema into the destination type vocabulary
///
/// Column names and order are preserved. Fails on the first column whose
/// type has no mapping, before anything touches the destination.
pub fn translate_schema(
    table: &str,
    schema: &[Column],
    mapping: &TypeMapping,
) -> Result<Vec<Column>> {
    schema
        .iter()
        .map(|column| match mapping.resolve(&column.type_tag) {
            Some(destination_type) => Ok(Column::new(&column.name, destination_type)),
            None => Err(MigrateError::UnsupportedType {
                table: table.to_string(),
                column: column.name.clone(),
                type_tag: column.type_tag.clone(),
            }),
        })
        .collect()
}
