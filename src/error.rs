// ABOUTME: Error taxonomy for SQLite-to-DuckDB migration operations
// ABOUTME: Separates connection, schema, type-mapping, and execution failures

use thiserror::Error;

/// Main error type for migration operations.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Store file missing, unreadable, or failed to open
    #[error("Connection error for '{path}': {message}")]
    Connection { path: String, message: String },

    /// Metadata query failed or returned no usable schema
    #[error("Schema error for table '{table}': {message}")]
    Schema { table: String, message: String },

    /// A source type tag has no entry in the type mapping
    #[error("Unsupported type '{type_tag}' for column '{column}' in table '{table}'")]
    UnsupportedType {
        table: String,
        column: String,
        type_tag: String,
    },

    /// Destination table exists with different columns
    #[error("Schema mismatch for table '{table}': expected columns [{expected}], found [{found}]")]
    SchemaMismatch {
        table: String,
        expected: String,
        found: String,
    },

    /// DDL or DML rejected by a store
    #[error("Execution failed for table '{table}': {message}")]
    Execution { table: String, message: String },

    #[error("Table '{0}' not found")]
    TableNotFound(String),

    /// Invalid configuration file or option
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MigrateError {
    pub fn connection(path: impl Into<String>, message: impl ToString) -> Self {
        MigrateError::Connection {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn schema(table: impl Into<String>, message: impl ToString) -> Self {
        MigrateError::Schema {
            table: table.into(),
            message: message.to_string(),
        }
    }

    /// Create an Execution error from any store error
    pub fn execution(table: impl Into<String>, message: impl ToString) -> Self {
        MigrateError::Execution {
            table: table.into(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
