// ABOUTME: CLI entry point for sqlite-duckdb-migrator
// ABOUTME: Parses commands and routes to appropriate handlers

use clap::{Parser, Subcommand};
use sqlite_duckdb_migrator::commands;
use sqlite_duckdb_migrator::config::{self, OptionOverrides};
use sqlite_duckdb_migrator::filters::TableFilter;
use sqlite_duckdb_migrator::interactive;
use sqlite_duckdb_migrator::migration::MigrationReport;
use sqlite_duckdb_migrator::sqlite::stream::Pagination;

#[derive(Parser)]
#[command(name = "sqlite-duckdb-migrator")]
#[command(about = "Migrate SQLite tables into a DuckDB database", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream tables from SQLite into DuckDB in batches
    Migrate {
        /// Path to the source SQLite database
        #[arg(long)]
        source: String,
        /// Path to the target DuckDB database (created if absent)
        #[arg(long)]
        target: String,
        /// TOML file with batch size, pagination, and type mapping
        #[arg(long)]
        config: Option<String>,
        /// Rows per batch (overrides config file)
        #[arg(long)]
        batch_size: Option<usize>,
        /// Pagination strategy (overrides config file)
        #[arg(long, value_enum)]
        pagination: Option<Pagination>,
        /// Include only these tables (comma-separated)
        #[arg(long, value_delimiter = ',')]
        include_tables: Option<Vec<String>>,
        /// Exclude these tables (comma-separated)
        #[arg(long, value_delimiter = ',')]
        exclude_tables: Option<Vec<String>>,
        /// Interactive mode for selecting tables
        #[arg(long, conflicts_with_all = ["include_tables", "exclude_tables"])]
        interactive: bool,
        /// Drop existing tables on target before copying
        #[arg(long)]
        drop_existing: bool,
        /// Print the migration report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Copy tables with DuckDB's sqlite scanner in one statement per table
    Import {
        #[arg(long)]
        source: String,
        #[arg(long)]
        target: String,
        /// Include only these tables (comma-separated)
        #[arg(long, value_delimiter = ',')]
        include_tables: Option<Vec<String>>,
        /// Exclude these tables (comma-separated)
        #[arg(long, value_delimiter = ',')]
        exclude_tables: Option<Vec<String>>,
        /// Replace tables that already exist on target
        #[arg(long)]
        drop_existing: bool,
        /// Load the sqlite extension without trying to install it first
        #[arg(long)]
        no_install: bool,
        /// Print the import report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load a CSV file into a DuckDB table using DuckDB's CSV reader
    IngestCsv {
        /// Path to the CSV file (header row required)
        #[arg(long)]
        file: String,
        #[arg(long)]
        target: String,
        /// Destination table name
        #[arg(long)]
        table: String,
        /// Replace the table if it already exists on target
        #[arg(long)]
        drop_existing: bool,
        #[arg(long)]
        json: bool,
    },
    /// Drop target tables that correspond to source tables
    Drop {
        #[arg(long)]
        source: String,
        #[arg(long)]
        target: String,
        /// Include only these tables (comma-separated)
        #[arg(long, value_delimiter = ',')]
        include_tables: Option<Vec<String>>,
        /// Exclude these tables (comma-separated)
        #[arg(long, value_delimiter = ',')]
        exclude_tables: Option<Vec<String>>,
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Show source tables, row counts, and translated column types
    Inspect {
        #[arg(long)]
        source: String,
        /// TOML file with type mapping
        #[arg(long)]
        config: Option<String>,
        /// Include only these tables (comma-separated)
        #[arg(long, value_delimiter = ',')]
        include_tables: Option<Vec<String>>,
        /// Exclude these tables (comma-separated)
        #[arg(long, value_delimiter = ',')]
        exclude_tables: Option<Vec<String>>,
        #[arg(long)]
        json: bool,
    },
    /// Run a SQL statement against the target DuckDB database
    Query {
        #[arg(long)]
        target: String,
        #[arg(long)]
        sql: String,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging - default to INFO level if RUST_LOG not set
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate {
            source,
            target,
            config,
            batch_size,
            pagination,
            include_tables,
            exclude_tables,
            interactive,
            drop_existing,
            json,
        } => {
            let filter = if interactive {
                // Interactive mode - prompt user to select tables
                interactive::select_tables(&source)?
            } else {
                TableFilter::new(include_tables, exclude_tables)?
            };
            let overrides = OptionOverrides {
                batch_size,
                pagination,
                drop_existing,
            };
            let options = config::load_options(config.as_deref(), &overrides)?;
            let report = commands::migrate(&source, &target, &filter, &options, json)?;
            print_report(&report, json)
        }
        Commands::Import {
            source,
            target,
            include_tables,
            exclude_tables,
            drop_existing,
            no_install,
            json,
        } => {
            let filter = TableFilter::new(include_tables, exclude_tables)?;
            let report = commands::import(&source, &target, &filter, drop_existing, !no_install)?;
            print_report(&report, json)
        }
        Commands::IngestCsv {
            file,
            target,
            table,
            drop_existing,
            json,
        } => {
            let report = commands::ingest_csv(&file, &target, &table, drop_existing)?;
            print_report(&report, json)
        }
        Commands::Drop {
            source,
            target,
            include_tables,
            exclude_tables,
            yes,
        } => {
            let filter = TableFilter::new(include_tables, exclude_tables)?;
            commands::teardown(&source, &target, &filter, yes)?;
            Ok(())
        }
        Commands::Inspect {
            source,
            config,
            include_tables,
            exclude_tables,
            json,
        } => {
            let filter = TableFilter::new(include_tables, exclude_tables)?;
            let options = config::load_options(config.as_deref(), &OptionOverrides::default())?;
            let tables = commands::inspect(&source, &filter, &options.type_mapping)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&tables)?);
                return Ok(());
            }

            for table in &tables {
                let marker = if table.is_migratable() { "✓" } else { "✗" };
                println!("{} {} ({} rows)", marker, table.table, table.rows);
                for column in &table.columns {
                    println!(
                        "    {:<24} {:<16} -> {}",
                        column.name,
                        column.source_type,
                        column.destination_type.as_deref().unwrap_or("<unmapped>")
                    );
                }
            }
            Ok(())
        }
        Commands::Query { target, sql } => {
            let result = commands::query(&target, &sql)?;
            println!("{}", result.to_tsv());
            Ok(())
        }
    }
}

fn print_report(report: &MigrationReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    }
    Ok(())
}
