// ABOUTME: Library module for sqlite-duckdb-migrator
// ABOUTME: Exports all core functionality for use in binary and tests

pub mod commands;
pub mod config;
pub mod destination;
pub mod error;
pub mod filters;
pub mod interactive;
pub mod migration;
pub mod sqlite;
pub mod typemap;
pub mod utils;

pub use error::{MigrateError, Result};
