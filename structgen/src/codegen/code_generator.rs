//! Main code generator orchestrator

use std::fs;
use std::path::PathBuf;

use tracing::{debug, error, info};

use super::go_generator::{format_file, SourceUnit};
use crate::config::GenConfig;
use crate::error::{GenError, Result};
use crate::introspect::ColumnSource;

/// One table's generated output
#[derive(Debug, Clone)]
pub struct GeneratedTable {
    pub table: String,
    /// Target path (`<output_dir>/<table>.go`)
    pub path: PathBuf,
    /// Rendered Go source
    pub source: String,
    /// False in dry-run mode
    pub written: bool,
}

/// A table that failed while running in keep-going mode
#[derive(Debug)]
pub struct TableFailure {
    pub table: String,
    pub error: GenError,
}

/// Outcome of a generation run
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub generated: Vec<GeneratedTable>,
    pub failed: Vec<TableFailure>,
}

impl GenerationReport {
    /// True when every requested table was generated
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Main code generator: drives introspection, mapping and rendering per table
pub struct CodeGenerator<'a> {
    config: &'a GenConfig,
}

impl<'a> CodeGenerator<'a> {
    /// Create a new code generator with the given configuration
    pub fn new(config: &'a GenConfig) -> Self {
        Self { config }
    }

    /// Generate every table, strictly in the given order.
    ///
    /// Without `keep_going` the first error is returned immediately; files
    /// already written stay on disk and later tables are not attempted.
    pub async fn generate<S>(&self, tables: &[String], source: &mut S) -> Result<GenerationReport>
    where
        S: ColumnSource + ?Sized,
    {
        if !self.config.dry_run {
            let dir = &self.config.output_dir;
            fs::create_dir_all(dir).map_err(|source| GenError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }

        let mut report = GenerationReport::default();
        for table in tables {
            match self.generate_table(table, source).await {
                Ok(generated) => report.generated.push(generated),
                Err(err) if self.config.keep_going => {
                    error!("Table {} failed: {}", table, err);
                    report.failed.push(TableFailure {
                        table: table.clone(),
                        error: err,
                    });
                }
                Err(err) => return Err(err),
            }
        }

        Ok(report)
    }

    /// Introspect, map, render and write a single table
    pub async fn generate_table<S>(&self, table: &str, source: &mut S) -> Result<GeneratedTable>
    where
        S: ColumnSource + ?Sized,
    {
        info!("Generating table {}", table);
        let columns = source.columns(table).await?;
        debug!("Table {} has {} columns", table, columns.len());

        let unit = SourceUnit::build(
            table,
            &columns,
            &self.config.model_package,
            self.config.field_case,
            self.config.unknown_types,
        )?;
        let rendered = unit.render();

        if self.config.dry_run {
            return Ok(GeneratedTable {
                table: table.to_string(),
                path: self.config.output_dir.join(unit.file_name()),
                source: rendered,
                written: false,
            });
        }

        let path = unit.write_to(&self.config.output_dir)?;
        if self.config.format {
            format_file(&path);
        }
        info!("Wrote {}", path.display());

        Ok(GeneratedTable {
            table: table.to_string(),
            path,
            source: rendered,
            written: true,
        })
    }
}
