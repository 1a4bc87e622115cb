//! structgen: Generate Go structs from MySQL table metadata
//!
//! This crate provides both a CLI tool and a library. For every requested
//! table it reads the column metadata (`SHOW COLUMNS FROM <table>`), maps
//! each declared type to a Go primitive and writes `<table>.go` holding a
//! single struct whose fields follow the table's column order.
//!
//! # CLI Usage
//!
//! ```bash
//! # credentials come from the environment or a local .env file
//! DB_USER=app DB_PASSWORD=secret DB_NAME=shop structgen -t users --mp models
//!
//! # several tables at once
//! TABLES=users,orders structgen --mp models
//! ```
//!
//! # Library Usage
//!
//! ```rust,ignore
//! use structgen::{GenConfig, MySqlIntrospector};
//!
//! let config = GenConfig::load(None)?;
//! let report = structgen::generate_from_mysql(&config).await?;
//! ```
//!
//! Any [`ColumnSource`] can feed the generator; [`DdlSchema`] reads
//! `CREATE TABLE` statements instead of a live server:
//!
//! ```rust,ignore
//! let mut schema = structgen::DdlSchema::from_file("schema.sql".as_ref())?;
//! structgen::GeneratorBuilder::new()
//!     .tables(&["users", "orders"])
//!     .model_package("models")
//!     .generate(&mut schema)
//!     .await?;
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod introspect;

use std::path::Path;

use tracing::{info, warn};

pub use codegen::{
    CodeGenerator, FieldCase, GeneratedTable, GenerationReport, GoType, TableFailure,
    UnknownTypePolicy,
};
pub use config::GenConfig;
pub use error::{GenError, Result};
pub use introspect::{Column, ColumnSource, DdlSchema, MySqlIntrospector};

/// Main entry point for code generation from any column source
pub async fn generate<S>(config: &GenConfig, source: &mut S) -> Result<GenerationReport>
where
    S: ColumnSource + ?Sized,
{
    config.validate()?;
    let tables = config.table_list()?;
    info!("Generating {} table(s): {}", tables.len(), tables.join(", "));

    let report = CodeGenerator::new(config).generate(&tables, source).await?;

    info!(
        "Code generation complete ({} generated, {} failed)",
        report.generated.len(),
        report.failed.len()
    );
    Ok(report)
}

/// Generate from a live MySQL server.
///
/// The table list and credentials are checked before connecting. The
/// connection is held for the whole run and closed afterwards.
pub async fn generate_from_mysql(config: &GenConfig) -> Result<GenerationReport> {
    config.validate()?;
    config.validate_credentials()?;

    let mut source = MySqlIntrospector::connect(config).await?;
    let result = generate(config, &mut source).await;

    if let Err(err) = source.disconnect().await {
        warn!("Failed to close MySQL connection: {}", err);
    }
    result
}

/// Generate from a file of `CREATE TABLE` statements
pub async fn generate_from_schema_file(
    config: &GenConfig,
    schema_file: &Path,
) -> Result<GenerationReport> {
    config.validate()?;
    info!("Parsing schema: {:?}", schema_file);
    let mut schema = DdlSchema::from_file(schema_file)?;
    generate(config, &mut schema).await
}

/// Builder pattern for programmatic configuration
pub struct GeneratorBuilder {
    config: GenConfig,
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: GenConfig::default(),
        }
    }

    /// Set the tables to generate, in order
    pub fn tables(mut self, tables: &[&str]) -> Self {
        self.config.tables = tables.join(",");
        self
    }

    /// Set the Go package name
    pub fn model_package(mut self, name: &str) -> Self {
        self.config.model_package = name.to_string();
        self
    }

    /// Set the output directory
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the identifier casing
    pub fn field_case(mut self, case: FieldCase) -> Self {
        self.config.field_case = case;
        self
    }

    /// Set the policy for unmapped column types
    pub fn unknown_types(mut self, policy: UnknownTypePolicy) -> Self {
        self.config.unknown_types = policy;
        self
    }

    /// Continue past failing tables and report them at the end
    pub fn keep_going(mut self) -> Self {
        self.config.keep_going = true;
        self
    }

    /// Enable dry run mode (render without writing files)
    pub fn dry_run(mut self) -> Self {
        self.config.dry_run = true;
        self
    }

    /// Generate the code
    pub async fn generate<S>(self, source: &mut S) -> Result<GenerationReport>
    where
        S: ColumnSource + ?Sized,
    {
        generate(&self.config, source).await
    }
}
