//! Offline introspection from `CREATE TABLE` DDL using sqlparser-rs
//!
//! Produces the same [`Column`] records `SHOW COLUMNS` would report, so a
//! schema file can stand in for a live server.

use std::path::Path;

use async_trait::async_trait;
use sqlparser::ast::{
    ColumnOption, Expr, Ident, IndexColumn, IndexConstraint, ObjectName, PrimaryKeyConstraint,
    Statement, TableConstraint, UniqueConstraint,
};
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;
use tracing::debug;

use super::column::Column;
use super::ColumnSource;
use crate::error::{GenError, Result};

/// Tables parsed from a schema file, in declaration order
#[derive(Debug, Clone, Default)]
pub struct DdlSchema {
    tables: Vec<(String, Vec<Column>)>,
}

impl DdlSchema {
    /// Parse a SQL schema string
    pub fn parse(sql: &str) -> Result<Self> {
        let dialect = MySqlDialect {};
        let statements = Parser::parse_sql(&dialect, sql)?;

        let mut tables = Vec::new();
        for stmt in statements {
            if let Statement::CreateTable(create_table) = stmt {
                let name = extract_table_name(&create_table.name);
                let columns = extract_columns(&create_table);
                debug!("Parsed table {} ({} columns)", name, columns.len());
                tables.push((name, columns));
            }
        }

        Ok(Self { tables })
    }

    /// Read and parse a schema file
    pub fn from_file(path: &Path) -> Result<Self> {
        let sql = std::fs::read_to_string(path).map_err(|source| GenError::ReadSchema {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&sql)
    }

    /// Names of all parsed tables, in declaration order
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Get the columns of a table by name
    pub fn get_table(&self, name: &str) -> Option<&[Column]> {
        self.tables
            .iter()
            .find(|(table, _)| table == name)
            .map(|(_, columns)| columns.as_slice())
    }
}

#[async_trait]
impl ColumnSource for DdlSchema {
    async fn columns(&mut self, table: &str) -> Result<Vec<Column>> {
        let columns = self
            .get_table(table)
            .ok_or_else(|| GenError::TableNotFound(table.to_string()))?;
        if columns.is_empty() {
            return Err(GenError::NoColumns(table.to_string()));
        }
        Ok(columns.to_vec())
    }
}

/// Extract `SHOW COLUMNS`-shaped records from a CREATE TABLE statement
fn extract_columns(create: &sqlparser::ast::CreateTable) -> Vec<Column> {
    let mut columns = Vec::with_capacity(create.columns.len());

    for col_def in &create.columns {
        let mut nullable = true; // Default to nullable
        let mut key = "";
        let mut default = None;
        let mut extra = String::new();

        for option in &col_def.options {
            match &option.option {
                ColumnOption::NotNull => nullable = false,
                ColumnOption::Null => nullable = true,
                ColumnOption::Default(expr) => default = default_value(expr),
                ColumnOption::PrimaryKey(_) => {
                    nullable = false;
                    key = "PRI";
                }
                ColumnOption::Unique(_) => key = stronger_key(key, "UNI"),
                ColumnOption::DialectSpecific(tokens) => {
                    let token_str = tokens
                        .iter()
                        .map(|t| t.to_string())
                        .collect::<Vec<_>>()
                        .join(" ")
                        .to_uppercase();
                    if token_str.contains("AUTO_INCREMENT") {
                        extra = "auto_increment".to_string();
                    }
                }
                _ => {}
            }
        }

        columns.push(Column {
            field: extract_ident(&col_def.name),
            declared_type: format!("{}", col_def.data_type).to_lowercase(),
            null: if nullable { "YES" } else { "NO" }.to_string(),
            key: key.to_string(),
            default,
            extra,
        });
    }

    // Table-level constraints refine nullability and key flags
    for constraint in &create.constraints {
        match constraint {
            TableConstraint::PrimaryKey(PrimaryKeyConstraint {
                columns: pk_cols, ..
            }) => {
                for pk_col in pk_cols {
                    let name = extract_ident_from_index_column(pk_col);
                    if let Some(col) = columns.iter_mut().find(|c| c.field == name) {
                        col.null = "NO".to_string();
                        col.key = "PRI".to_string();
                    }
                }
            }
            TableConstraint::Unique(UniqueConstraint {
                columns: uniq_cols,
                ..
            }) => {
                let flag = if uniq_cols.len() == 1 { "UNI" } else { "MUL" };
                mark_first_column(&mut columns, uniq_cols, flag);
            }
            TableConstraint::Index(IndexConstraint {
                columns: idx_cols, ..
            }) => {
                mark_first_column(&mut columns, idx_cols, "MUL");
            }
            _ => {}
        }
    }

    columns
}

/// Flag the leading column of an index, keeping a stronger flag already set
fn mark_first_column(columns: &mut [Column], index_cols: &[IndexColumn], flag: &'static str) {
    let Some(first) = index_cols.first() else {
        return;
    };
    let name = extract_ident_from_index_column(first);
    if let Some(col) = columns.iter_mut().find(|c| c.field == name) {
        col.key = stronger_key(&col.key, flag).to_string();
    }
}

/// MySQL reports a single key flag per column: PRI over UNI over MUL
fn stronger_key<'a>(current: &'a str, candidate: &'a str) -> &'a str {
    fn rank(key: &str) -> u8 {
        match key {
            "PRI" => 3,
            "UNI" => 2,
            "MUL" => 1,
            _ => 0,
        }
    }
    if rank(candidate) > rank(current) {
        candidate
    } else {
        current
    }
}

/// Render a DEFAULT expression the way `SHOW COLUMNS` does (unquoted, NULL as none)
fn default_value(expr: &Expr) -> Option<String> {
    let rendered = format!("{}", expr);
    if rendered.eq_ignore_ascii_case("NULL") {
        return None;
    }
    let unquoted = rendered
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(&rendered);
    Some(unquoted.to_string())
}

/// Extract a simple string from an ObjectName
fn extract_table_name(name: &ObjectName) -> String {
    name.0
        .last()
        .and_then(|part| part.as_ident())
        .map(|ident| ident.value.clone())
        .unwrap_or_default()
}

/// Extract a string from an Ident, removing backticks if present
fn extract_ident(ident: &Ident) -> String {
    ident.value.clone()
}

/// Extract a column name string from an IndexColumn
fn extract_ident_from_index_column(ic: &IndexColumn) -> String {
    match &ic.column.expr {
        Expr::Identifier(ident) => ident.value.clone(),
        other => format!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_table() {
        let sql = r#"
            CREATE TABLE users (
                id INT(11) NOT NULL AUTO_INCREMENT PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                balance DECIMAL(10,2) DEFAULT '0.00',
                avatar LONGBLOB
            );
        "#;

        let schema = DdlSchema::parse(sql).unwrap();
        assert_eq!(schema.table_names(), vec!["users"]);

        let columns = schema.get_table("users").unwrap();
        let fields: Vec<&str> = columns.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["id", "name", "balance", "avatar"]);

        assert_eq!(columns[0].declared_type, "int(11)");
        assert_eq!(columns[0].key, "PRI");
        assert_eq!(columns[0].null, "NO");
        assert_eq!(columns[0].extra, "auto_increment");

        assert_eq!(columns[1].declared_type, "varchar(100)");
        assert_eq!(columns[2].declared_type, "decimal(10,2)");
        assert_eq!(columns[2].default.as_deref(), Some("0.00"));
        assert_eq!(columns[2].null, "YES");
        assert_eq!(columns[3].declared_type, "longblob");
    }

    #[test]
    fn test_parse_table_level_keys() {
        let sql = r#"
            CREATE TABLE order_items (
                order_id BIGINT NOT NULL,
                product_id BIGINT NOT NULL,
                sku VARCHAR(32) NOT NULL,
                warehouse_id INT,
                PRIMARY KEY (order_id, product_id),
                UNIQUE INDEX idx_sku (sku),
                INDEX idx_warehouse (warehouse_id)
            );
        "#;

        let schema = DdlSchema::parse(sql).unwrap();
        let columns = schema.get_table("order_items").unwrap();
        assert_eq!(columns[0].key, "PRI");
        assert_eq!(columns[1].key, "PRI");
        assert_eq!(columns[2].key, "UNI");
        assert_eq!(columns[3].key, "MUL");
    }

    #[test]
    fn test_null_default_is_absent() {
        let sql = "CREATE TABLE notes (body TEXT DEFAULT NULL);";
        let schema = DdlSchema::parse(sql).unwrap();
        let columns = schema.get_table("notes").unwrap();
        assert_eq!(columns[0].default, None);
    }

    #[test]
    fn test_missing_schema_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.sql");
        match DdlSchema::from_file(&path) {
            Err(GenError::ReadSchema { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected ReadSchema error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_table() {
        let mut schema = DdlSchema::parse("CREATE TABLE users (id INT);").unwrap();
        assert!(schema.columns("users").await.is_ok());
        assert!(matches!(
            schema.columns("orders").await,
            Err(GenError::TableNotFound(_))
        ));
    }
}
