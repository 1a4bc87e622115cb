//! Go generator - renders one struct per table into `<table>.go`

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::naming::{to_field_name, to_struct_name, FieldCase};
use super::type_mapper::{map_type, GoType};
use crate::error::{GenError, Result};
use crate::introspect::Column;

/// Go type emitted for unknown columns under [`UnknownTypePolicy::Placeholder`]
pub const PLACEHOLDER_TYPE: &str = "interface{}";

/// Extension of generated files
pub const SOURCE_EXTENSION: &str = "go";

/// What to do with a column whose declared type maps to [`GoType::Unknown`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum UnknownTypePolicy {
    /// Emit `interface{}` and log a warning
    #[default]
    Placeholder,
    /// Leave the column out of the struct and log a warning
    Skip,
    /// Fail the table
    Error,
}

/// A rendered field: Go identifier plus Go type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub name: String,
    pub go_type: GoType,
}

impl FieldMapping {
    /// Type token written into the struct body
    pub fn type_token(&self) -> &'static str {
        if self.go_type.is_unknown() {
            PLACEHOLDER_TYPE
        } else {
            self.go_type.as_go()
        }
    }
}

/// One generated file: package clause plus a single struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub table: String,
    pub package: String,
    pub struct_name: String,
    pub fields: Vec<FieldMapping>,
}

impl SourceUnit {
    /// Build the unit for a table from its columns, in column order
    pub fn build(
        table: &str,
        columns: &[Column],
        package: &str,
        case: FieldCase,
        policy: UnknownTypePolicy,
    ) -> Result<Self> {
        let mut fields = Vec::with_capacity(columns.len());

        for col in columns {
            let go_type = map_type(&col.declared_type);
            debug!("{}.{}: {} -> {:?}", table, col.field, col.declared_type, go_type);

            if go_type.is_unknown() {
                match policy {
                    UnknownTypePolicy::Placeholder => {
                        warn!(
                            "{}.{}: unsupported type `{}`, using {}",
                            table, col.field, col.declared_type, PLACEHOLDER_TYPE
                        );
                    }
                    UnknownTypePolicy::Skip => {
                        warn!(
                            "{}.{}: unsupported type `{}`, skipping column",
                            table, col.field, col.declared_type
                        );
                        continue;
                    }
                    UnknownTypePolicy::Error => {
                        return Err(GenError::UnknownType {
                            table: table.to_string(),
                            column: col.field.clone(),
                            declared_type: col.declared_type.clone(),
                        });
                    }
                }
            }

            fields.push(FieldMapping {
                name: to_field_name(&col.field, case),
                go_type,
            });
        }

        Ok(Self {
            table: table.to_string(),
            package: package.to_string(),
            struct_name: to_struct_name(table, case),
            fields,
        })
    }

    /// Render the Go source text
    pub fn render(&self) -> String {
        let mut code = String::new();

        code.push_str(&format!("package {}\n\n", self.package));
        code.push_str(&format!("type {} struct {{\n", self.struct_name));
        for field in &self.fields {
            code.push_str(&format!("\t{} {}\n", field.name, field.type_token()));
        }
        code.push_str("}\n");

        code
    }

    /// File name for this unit: `<table>.go`
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.table, SOURCE_EXTENSION)
    }

    /// Write the unit into `output_dir`, truncating any previous file
    pub fn write_to(&self, output_dir: &Path) -> Result<PathBuf> {
        let path = output_dir.join(self.file_name());
        fs::write(&path, self.render()).map_err(|source| GenError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Best-effort gofmt on a generated file.
pub(crate) fn format_file(path: &Path) {
    match std::process::Command::new("gofmt").arg("-w").arg(path).status() {
        Ok(status) if status.success() => {}
        Ok(status) => warn!("gofmt exited with {} for {}", status, path.display()),
        Err(err) => warn!("gofmt unavailable ({}), leaving {} as is", err, path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(field: &str, declared_type: &str) -> Column {
        Column {
            field: field.to_string(),
            declared_type: declared_type.to_string(),
            null: "YES".to_string(),
            key: String::new(),
            default: None,
            extra: String::new(),
        }
    }

    fn users_columns() -> Vec<Column> {
        vec![
            column("id", "int(11)"),
            column("name", "varchar(100)"),
            column("balance", "decimal(10,2)"),
            column("avatar", "longblob"),
        ]
    }

    #[test]
    fn test_render_users() {
        let unit = SourceUnit::build(
            "users",
            &users_columns(),
            "models",
            FieldCase::Title,
            UnknownTypePolicy::Placeholder,
        )
        .unwrap();

        assert_eq!(unit.file_name(), "users.go");
        assert_eq!(
            unit.render(),
            "package models\n\ntype Users struct {\n\tId int\n\tName string\n\tBalance float64\n\tAvatar []byte\n}\n"
        );
    }

    #[test]
    fn test_unknown_placeholder() {
        let columns = vec![column("state", "enum('a','b')")];
        let unit = SourceUnit::build(
            "flags",
            &columns,
            "main",
            FieldCase::Title,
            UnknownTypePolicy::Placeholder,
        )
        .unwrap();
        assert_eq!(unit.fields[0].go_type, GoType::Unknown);
        assert!(unit.render().contains("\tState interface{}\n"));
    }

    #[test]
    fn test_unknown_skip() {
        let columns = vec![column("id", "int"), column("state", "enum('a','b')")];
        let unit = SourceUnit::build(
            "flags",
            &columns,
            "main",
            FieldCase::Title,
            UnknownTypePolicy::Skip,
        )
        .unwrap();
        assert_eq!(unit.fields.len(), 1);
        assert_eq!(unit.fields[0].name, "Id");
    }

    #[test]
    fn test_unknown_error() {
        let columns = vec![column("state", "enum('a','b')")];
        let err = SourceUnit::build(
            "flags",
            &columns,
            "main",
            FieldCase::Title,
            UnknownTypePolicy::Error,
        )
        .unwrap_err();
        assert!(matches!(err, GenError::UnknownType { ref column, .. } if column == "state"));
    }

    #[test]
    fn test_write_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.go");
        fs::write(&path, "stale content that is longer than the new file ".repeat(20)).unwrap();

        let unit = SourceUnit::build(
            "users",
            &[column("id", "int")],
            "main",
            FieldCase::Title,
            UnknownTypePolicy::Placeholder,
        )
        .unwrap();
        let written = unit.write_to(dir.path()).unwrap();

        assert_eq!(written, path);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "package main\n\ntype Users struct {\n\tId int\n}\n"
        );
    }

    #[test]
    fn test_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let unit = SourceUnit::build(
            "users",
            &[column("id", "int")],
            "main",
            FieldCase::Title,
            UnknownTypePolicy::Placeholder,
        )
        .unwrap();
        assert!(matches!(
            unit.write_to(&missing),
            Err(GenError::Write { .. })
        ));
    }
}
