//! The two table transfers this tool performs.
//!
//! - `exporter`: every table of a source database to `<table>.csv`.
//! - `importer`: a list of `<table>.csv` files into a SQLite database.
//!
//! Both walk their table list in order and stop at the first error; files or tables
//! written before the failure are left as they are.

mod exporter;
mod importer;

pub use exporter::*;
pub use importer::*;

use crate::error::Result;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over a list of tables, drawn on stderr.
pub fn table_progress(len: u64) -> Result<ProgressBar> {
    let style = ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")?
        .progress_chars("=> ");
    Ok(ProgressBar::new(len).with_style(style))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::db::TableSource;
    use crate::error::{AppError, Result};
    use crate::models::Table;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    /// In-memory stand-in for PostgreSQL: tables keyed (and listed) by name.
    #[derive(Clone, Default)]
    pub struct MemorySource {
        tables: BTreeMap<String, Table>,
        fail_on: Option<String>,
        fetched: Arc<Mutex<Vec<String>>>,
    }

    impl MemorySource {
        pub fn with_table(mut self, table: Table) -> Self {
            self.tables.insert(table.name.clone(), table);
            self
        }

        /// Makes `fetch_table` fail for `table`.
        pub fn failing_on(mut self, table: &str) -> Self {
            self.fail_on = Some(table.to_string());
            self
        }

        pub fn table(&self, name: &str) -> &Table {
            &self.tables[name]
        }

        /// Tables fetched so far, in call order.
        pub fn fetched(&self) -> Vec<String> {
            self.fetched.lock().unwrap().clone()
        }

        pub fn northwind_sample() -> Self {
            let text = |v: &str| Some(v.to_string());
            Self::default()
                .with_table(Table::from_text_rows(
                    "region",
                    vec!["region_id".into(), "region_description".into()],
                    vec![
                        vec![text("1"), text("Eastern")],
                        vec![text("2"), text("Western")],
                        vec![text("3"), text("Northern")],
                        vec![text("4"), None],
                    ],
                ))
                .with_table(Table::from_text_rows(
                    "shippers",
                    vec!["shipper_id".into(), "company_name".into(), "phone".into()],
                    vec![
                        vec![text("1"), text("Speedy Express"), text("(503) 555-9831")],
                        vec![text("2"), text("United Package"), text("(503) 555-3199")],
                    ],
                ))
                .with_table(Table::from_text_rows(
                    "categories",
                    vec!["category_id".into(), "category_name".into(), "markup".into()],
                    vec![
                        vec![text("1"), text("Beverages"), text("1.25")],
                        vec![text("2"), text("Condiments, Sauces"), text("0.5")],
                    ],
                ))
        }
    }

    impl TableSource for MemorySource {
        async fn list_tables(&self) -> Result<Vec<String>> {
            Ok(self.tables.keys().cloned().collect())
        }

        async fn fetch_table(&self, table: &str) -> Result<Table> {
            self.fetched.lock().unwrap().push(table.to_string());
            if self.fail_on.as_deref() == Some(table) {
                return Err(AppError::from(sqlx::Error::RowNotFound));
            }
            self.tables
                .get(table)
                .cloned()
                .ok_or_else(|| AppError::from(sqlx::Error::RowNotFound))
        }
    }
}
