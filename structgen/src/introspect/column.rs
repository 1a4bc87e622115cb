//! Column records as reported by `SHOW COLUMNS`

use serde::{Deserialize, Serialize};

/// One column of a table, in the shape MySQL reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub field: String,

    /// Declared type as reported (e.g., "varchar(255)", "decimal(10,2)")
    pub declared_type: String,

    /// Nullability, "YES" or "NO"
    pub null: String,

    /// Key indicator: "PRI", "UNI", "MUL" or empty
    pub key: String,

    /// Default value expression (if any)
    pub default: Option<String>,

    /// Extra attributes (e.g., "auto_increment")
    pub extra: String,
}

impl Column {
    /// Check whether the column accepts NULL
    pub fn is_nullable(&self) -> bool {
        self.null.eq_ignore_ascii_case("YES")
    }

    /// Check whether the column is part of the primary key
    pub fn is_primary_key(&self) -> bool {
        self.key == "PRI"
    }

    /// Check whether this column is auto-increment
    pub fn is_auto_increment(&self) -> bool {
        self.extra.to_ascii_lowercase().contains("auto_increment")
    }
}
