//! Live introspection over a single MySQL connection

use async_trait::async_trait;
use mysql_async::prelude::*;
use mysql_async::{Conn, Opts, OptsBuilder, Row};
use tracing::{debug, info};

use super::column::Column;
use super::ColumnSource;
use crate::config::GenConfig;
use crate::error::{GenError, Result};

/// Raw `SHOW COLUMNS` row: Field, Type, Null, Key, Default, Extra
type ShowColumnsRow = (String, String, String, String, Option<String>, String);

/// A MySQL schema introspector.
///
/// Holds exactly one connection for its whole lifetime. The orchestrator
/// owns it and lends it out by `&mut` for each table.
///
/// # Example
///
/// ```ignore
/// let mut source = MySqlIntrospector::connect(&config).await?;
/// let columns = source.columns("users").await?;
/// source.disconnect().await?;
/// ```
pub struct MySqlIntrospector {
    conn: Conn,
}

impl MySqlIntrospector {
    /// Open the connection and make sure the server answers a ping.
    pub async fn connect(config: &GenConfig) -> Result<Self> {
        let opts = connection_opts(config);
        info!(
            "Connecting to MySQL at {}:{} (database {:?})",
            opts.ip_or_hostname(),
            opts.tcp_port(),
            opts.db_name().unwrap_or_default()
        );

        let mut conn = Conn::new(opts).await.map_err(GenError::Connection)?;
        conn.ping().await.map_err(GenError::Liveness)?;
        debug!("MySQL connection is alive");

        Ok(Self { conn })
    }

    /// Close the connection.
    pub async fn disconnect(self) -> Result<()> {
        self.conn.disconnect().await.map_err(GenError::Connection)?;
        Ok(())
    }
}

#[async_trait]
impl ColumnSource for MySqlIntrospector {
    async fn columns(&mut self, table: &str) -> Result<Vec<Column>> {
        let sql = show_columns_sql(table);
        debug!("Executing: {}", sql);

        let rows: Vec<Row> = self
            .conn
            .query(sql)
            .await
            .map_err(|source| GenError::Query {
                table: table.to_string(),
                source,
            })?;

        if rows.is_empty() {
            return Err(GenError::NoColumns(table.to_string()));
        }

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            let (field, declared_type, null, key, default, extra) =
                mysql_async::from_row_opt::<ShowColumnsRow>(row).map_err(|e| {
                    GenError::RowDecode {
                        table: table.to_string(),
                        message: e.to_string(),
                    }
                })?;
            columns.push(Column {
                field,
                declared_type,
                null,
                key,
                default,
                extra,
            });
        }

        Ok(columns)
    }
}

/// Build connection options from the configured credentials
pub fn connection_opts(config: &GenConfig) -> Opts {
    OptsBuilder::default()
        .ip_or_hostname(config.db_host.clone())
        .tcp_port(config.db_port)
        .user(config.db_user.clone())
        .pass(config.db_password.clone())
        .db_name(config.db_name.clone())
        .into()
}

/// Build the column-metadata query for a table
pub fn show_columns_sql(table: &str) -> String {
    format!("SHOW COLUMNS FROM {}", quote_identifier(table))
}

/// Quote a MySQL identifier with backticks, doubling embedded backticks
fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
