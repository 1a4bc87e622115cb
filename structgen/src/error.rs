//! Error types for structgen

use thiserror::Error;

/// Result type alias for structgen operations
pub type Result<T> = std::result::Result<T, GenError>;

/// Errors that can occur while introspecting tables and generating code
#[derive(Error, Debug)]
pub enum GenError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("no table selected: set TABLES or use -t <table>")]
    NoTablesSelected,

    /// Opening the connection failed
    #[error("Failed to connect to MySQL: {0}")]
    Connection(#[source] mysql_async::Error),

    /// The connection opened but did not answer a ping
    #[error("MySQL did not respond to ping: {0}")]
    Liveness(#[source] mysql_async::Error),

    #[error("Failed to read columns of table `{table}`: {source}")]
    Query {
        table: String,
        #[source]
        source: mysql_async::Error,
    },

    #[error("Failed to decode a column row of `{table}`: {message}")]
    RowDecode { table: String, message: String },

    #[error("Table `{0}` reported no columns")]
    NoColumns(String),

    #[error("Table `{0}` not found in schema")]
    TableNotFound(String),

    #[error("Failed to parse SQL schema: {0}")]
    ParseError(String),

    #[error("Unsupported column type `{declared_type}` for `{table}.{column}`")]
    UnknownType {
        table: String,
        column: String,
        declared_type: String,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read schema file {path}: {source}")]
    ReadSchema {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<sqlparser::parser::ParserError> for GenError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        GenError::ParseError(err.to_string())
    }
}

impl From<config::ConfigError> for GenError {
    fn from(err: config::ConfigError) -> Self {
        GenError::ConfigError(err.to_string())
    }
}

impl From<dotenvy::Error> for GenError {
    fn from(err: dotenvy::Error) -> Self {
        GenError::ConfigError(format!("Failed to load .env file: {}", err))
    }
}
