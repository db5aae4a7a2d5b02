// ABOUTME: Parses migration configuration files (batch size, pagination, type mapping)
// ABOUTME: Converts TOML into MigrationOptions, with CLI flags taking precedence

use crate::error::{MigrateError, Result};
use crate::migration::MigrationOptions;
use crate::sqlite::stream::Pagination;
use crate::typemap::TypeMapping;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct MigrationConfig {
    batch_size: Option<usize>,
    pagination: Option<Pagination>,
    #[serde(default)]
    type_mapping: TypeMappingConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TypeMappingConfig {
    fallback: Option<String>,
    #[serde(default)]
    replace_defaults: bool,
    #[serde(default)]
    types: BTreeMap<String, String>,
}

/// Command-line overrides applied on top of the config file
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    pub batch_size: Option<usize>,
    pub pagination: Option<Pagination>,
    pub drop_existing: bool,
}

/// Parse a TOML config document into migration options
///
/// ```
/// # use sqlite_duckdb_migrator::config::parse_options;
/// let options = parse_options(r#"
///     batch_size = 1000
///
///     [type_mapping.types]
///     BOOLEAN = "BOOLEAN"
/// "#).unwrap();
/// assert_eq!(options.batch_size, 1000);
/// assert_eq!(options.type_mapping.resolve("boolean"), Some("BOOLEAN"));
/// ```
pub fn parse_options(raw: &str) -> Result<MigrationOptions> {
    let parsed: MigrationConfig = toml::from_str(raw)
        .map_err(|e| MigrateError::Config(format!("Failed to parse TOML config: {}", e)))?;

    let mut options = MigrationOptions::default();

    if let Some(batch_size) = parsed.batch_size {
        options.batch_size = batch_size;
    }
    if let Some(pagination) = parsed.pagination {
        options.pagination = pagination;
    }

    let mut mapping = if parsed.type_mapping.replace_defaults {
        TypeMapping::empty()
    } else {
        TypeMapping::default()
    };
    for (source_type, destination_type) in parsed.type_mapping.types {
        if destination_type.trim().is_empty() {
            return Err(MigrateError::Config(format!(
                "Type mapping for '{}' has an empty destination type",
                source_type
            )));
        }
        mapping.insert(&source_type, destination_type);
    }
    if let Some(fallback) = parsed.type_mapping.fallback {
        if fallback.trim().is_empty() {
            return Err(MigrateError::Config(
                "Type mapping fallback cannot be empty".to_string(),
            ));
        }
        mapping.set_fallback(Some(fallback));
    }
    options.type_mapping = mapping;

    validate_options(&options)?;

    Ok(options)
}

/// Load migration options from an optional config file plus CLI overrides
pub fn load_options(path: Option<&str>, overrides: &OptionOverrides) -> Result<MigrationOptions> {
    let mut options = match path {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|e| {
                MigrateError::Config(format!("Failed to read config file at {}: {}", path, e))
            })?;
            tracing::debug!("Loaded config file {}", path);
            parse_options(&raw)?
        }
        None => MigrationOptions::default(),
    };

    if let Some(batch_size) = overrides.batch_size {
        options.batch_size = batch_size;
    }
    if let Some(pagination) = overrides.pagination {
        options.pagination = pagination;
    }
    options.drop_existing = overrides.drop_existing;

    validate_options(&options)?;

    for (source_type, destination_type) in options.type_mapping.entries() {
        tracing::debug!("Type mapping: {} -> {}", source_type, destination_type);
    }

    Ok(options)
}

fn validate_options(options: &MigrationOptions) -> Result<()> {
    if options.batch_size == 0 {
        return Err(MigrateError::Config(
            "batch_size must be greater than zero".to_string(),
        ));
    }
    if options.type_mapping.is_empty() && options.type_mapping.fallback().is_none() {
        return Err(MigrateError::Config(
            "Type mapping is empty and has no fallback; every column would be rejected"
                .to_string(),
        ));
    }
    Ok(())
}
