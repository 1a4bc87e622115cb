//! Schema introspection: where column metadata comes from

mod column;
mod ddl;
mod mysql;

pub use column::*;
pub use ddl::*;
pub use mysql::*;

use async_trait::async_trait;

use crate::error::Result;

/// A source of per-table column metadata.
///
/// Implementations return columns in the table's native order; that order
/// becomes the field order of the generated struct.
#[async_trait]
pub trait ColumnSource: Send {
    /// Fetch the columns of `table`.
    async fn columns(&mut self, table: &str) -> Result<Vec<Column>>;
}

#[async_trait]
impl<S: ColumnSource + ?Sized> ColumnSource for &mut S {
    async fn columns(&mut self, table: &str) -> Result<Vec<Column>> {
        (**self).columns(table).await
    }
}
