//! CLI entry point for structgen

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use structgen::config::{GenConfig, Overrides};
use structgen::{
    Column, ColumnSource, DdlSchema, FieldCase, MySqlIntrospector, UnknownTypePolicy,
};

#[derive(Parser)]
#[command(name = "structgen")]
#[command(about = "Generate Go structs from MySQL table metadata")]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Table name (used only when TABLES is not set)
    #[arg(short = 't', long = "table")]
    table: Option<String>,

    /// Database name (overrides DB_NAME)
    #[arg(short = 'd', long = "db")]
    db: Option<String>,

    /// Go package name for generated files [default: main]
    #[arg(short = 'm', long = "mp", visible_alias = "model-package")]
    model_package: Option<String>,

    /// Output directory [default: current directory]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Read columns from a CREATE TABLE schema file instead of a live server
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// What to emit for column types outside the mapping table
    #[arg(long, value_enum)]
    unknown_types: Option<UnknownTypePolicy>,

    /// How table and column names become Go identifiers
    #[arg(long, value_enum)]
    field_case: Option<FieldCase>,

    /// Continue with the next table after a failure
    #[arg(long)]
    keep_going: bool,

    /// Run gofmt -w on written files
    #[arg(long)]
    format: bool,

    /// Dry run - print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Go files (default)
    Generate,
    /// Show the columns of the selected tables
    Inspect {
        /// Print JSON instead of a listing
        #[arg(long)]
        json: bool,
    },
}

/// Single-dash long flags accepted as written, e.g. `-db shop -mp models`
const SINGLE_DASH_FLAGS: &[(&str, &str)] = &[("-db", "--db"), ("-mp", "--mp")];

/// Rewrite `-db`/`-mp` to their double-dash form; clap would read them as
/// `-d b` and `-m p`. Only whole tokens are touched.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            SINGLE_DASH_FLAGS
                .iter()
                .find(|(short, _)| arg == *short)
                .map(|(_, long)| OsString::from(*long))
                .unwrap_or(arg)
        })
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    // .env first so its variables are visible to the config loader
    let dotenv_path = GenConfig::load_dotenv()?;
    let mut config = GenConfig::load(cli.config.as_deref())?;

    // Initialize logging
    // Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    match &dotenv_path {
        Some(path) => debug!("Loaded environment from {}", path.display()),
        None => debug!("No .env file found, using the process environment"),
    }

    // Apply CLI overrides
    Overrides {
        table: cli.table,
        db_name: cli.db,
        model_package: cli.model_package,
        output_dir: cli.output,
        unknown_types: cli.unknown_types,
        field_case: cli.field_case,
        keep_going: cli.keep_going,
        format: cli.format,
        dry_run: cli.dry_run,
    }
    .apply(&mut config);

    // Single-threaded: one connection, tables processed one after another
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Some(Commands::Inspect { json }) => {
            runtime.block_on(inspect(&config, cli.schema, json))
        }
        Some(Commands::Generate) | None => runtime.block_on(generate(&config, cli.schema)),
    }
}

async fn generate(config: &GenConfig, schema: Option<PathBuf>) -> Result<()> {
    let report = match &schema {
        Some(path) => structgen::generate_from_schema_file(config, path).await?,
        None => structgen::generate_from_mysql(config).await?,
    };

    if config.dry_run {
        println!("Dry run mode - would generate:");
        for table in &report.generated {
            println!("\n// {}", table.path.display());
            print!("{}", table.source);
        }
    }

    // each failure was already logged as it happened
    if !report.is_success() {
        let failed: Vec<&str> = report.failed.iter().map(|f| f.table.as_str()).collect();
        bail!(
            "{} of {} table(s) failed: {}",
            failed.len(),
            failed.len() + report.generated.len(),
            failed.join(", ")
        );
    }

    info!("Code generation completed successfully");
    Ok(())
}

#[derive(Serialize)]
struct InspectedTable {
    table: String,
    columns: Vec<Column>,
}

async fn inspect(config: &GenConfig, schema: Option<PathBuf>, json: bool) -> Result<()> {
    let tables = config.table_list()?;

    let inspected = match &schema {
        Some(path) => {
            let mut source = DdlSchema::from_file(path)?;
            collect_columns(&mut source, &tables).await?
        }
        None => {
            config.validate_credentials()?;
            let mut source = MySqlIntrospector::connect(config).await?;
            let result = collect_columns(&mut source, &tables).await;
            source.disconnect().await?;
            result?
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&inspected)?);
        return Ok(());
    }

    for table in &inspected {
        println!("Table: {}", table.table);
        println!("  Columns:");
        for col in &table.columns {
            let nullable = if col.is_nullable() { "NULL" } else { "NOT NULL" };
            let key = if col.key.is_empty() {
                String::new()
            } else {
                format!(" {}", col.key)
            };
            let extra = if col.extra.is_empty() {
                String::new()
            } else {
                format!(" {}", col.extra.to_uppercase())
            };
            println!(
                "    - {} {} {}{}{}",
                col.field, col.declared_type, nullable, key, extra
            );
            if let Some(default) = &col.default {
                println!("      DEFAULT {}", default);
            }
        }
        println!();
    }

    Ok(())
}

async fn collect_columns<S: ColumnSource>(
    source: &mut S,
    tables: &[String],
) -> structgen::Result<Vec<InspectedTable>> {
    let mut inspected = Vec::with_capacity(tables.len());
    for table in tables {
        inspected.push(InspectedTable {
            table: table.clone(),
            columns: source.columns(table).await?,
        });
    }
    Ok(inspected)
}
