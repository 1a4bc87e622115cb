//! Naming utilities for code generation

use heck::ToPascalCase;
use serde::{Deserialize, Serialize};

/// How table and column names become Go identifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum FieldCase {
    /// Capitalize every word, keep delimiters: `user_id` -> `User_Id`
    #[default]
    Title,
    /// Idiomatic Go: `user_id` -> `UserId`
    Pascal,
}

impl FieldCase {
    /// Apply this case to a name
    pub fn apply(&self, name: &str) -> String {
        match self {
            FieldCase::Title => title_case(name),
            FieldCase::Pascal => name.to_pascal_case(),
        }
    }
}

/// Title-case a name.
///
/// Words are delimited by whitespace or `_`. The first letter of each word
/// is upper-cased and the rest lower-cased; delimiters are kept as-is.
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut word_start = true;

    for c in name.chars() {
        if c.is_whitespace() || c == '_' {
            out.push(c);
            word_start = true;
        } else if word_start {
            out.extend(c.to_uppercase());
            word_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }

    out
}

/// Convert a table name to a struct name
pub fn to_struct_name(table_name: &str, case: FieldCase) -> String {
    case.apply(table_name)
}

/// Convert a column name to a field name
pub fn to_field_name(column_name: &str, case: FieldCase) -> String {
    case.apply(column_name)
}
