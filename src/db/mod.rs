//! Provides database interaction functionalities.
//!
//! - `postgres`: the export source, read through `information_schema`.
//! - `sqlite`: the import destination, a single embedded database file.

mod postgres;
mod sqlite;

pub use postgres::*;
pub use sqlite::*;

use crate::error::Result;
use crate::models::Table;

/// A database whose tables can be enumerated and read in full.
///
/// Implemented by `PostgresSource`; tests substitute an in-memory source.
#[allow(async_fn_in_trait)]
pub trait TableSource {
    /// Names of every table to export, in export order.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Full contents of one table.
    async fn fetch_table(&self, table: &str) -> Result<Table>;
}
