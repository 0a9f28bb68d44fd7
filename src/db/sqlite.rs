//! Provides the SQLite import destination using `sqlx`.
//!
//! Each table is replaced wholesale: dropped, recreated with the column types inferred
//! from its CSV, then filled, all inside one transaction per table.

use crate::error::{AppError, Result};
use crate::models::{quote_ident, Cell, Table};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

/// An open SQLite database file.
pub struct SqliteDestination {
    pool: Pool<Sqlite>,
}

impl SqliteDestination {
    /// Opens `path`, creating the file and its parent directory if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the parent directory cannot be created and
    /// `AppError::Db` if the database cannot be opened.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        info!("Opening SQLite database {}", path.display());
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            // Rollback journal keeps the result a single file with no -wal/-shm siblings.
            .journal_mode(SqliteJournalMode::Delete);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| {
                error!("Failed to open SQLite database {}: {}", path.display(), e);
                AppError::Db(e.into())
            })?;

        Ok(Self { pool })
    }

    /// Replaces any table named `table.name` with the contents of `table`.
    ///
    /// Returns the number of rows inserted. The drop, create and inserts share one
    /// transaction, so a failure leaves the previous version of the table in place.
    pub async fn replace_table(&self, table: &Table) -> Result<u64> {
        let name = quote_ident(&table.name);
        let column_defs = table
            .columns
            .iter()
            .zip(&table.column_types)
            .map(|(column, ty)| format!("{} {}", quote_ident(column), ty.sqlite_type()))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; table.columns.len()].join(", ");
        let insert_sql = format!("INSERT INTO {} VALUES ({})", name, placeholders);

        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!("DROP TABLE IF EXISTS {}", name))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!("CREATE TABLE {} ({})", name, column_defs))
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!("Failed to create table {}: {}", table.name, e);
                AppError::Db(e.into())
            })?;

        let mut inserted = 0;
        for row in &table.rows {
            let mut query = sqlx::query(&insert_sql);
            for cell in row {
                query = match cell {
                    Cell::Null => query.bind(None::<String>),
                    Cell::Integer(v) => query.bind(*v),
                    Cell::Real(v) => query.bind(*v),
                    Cell::Boolean(v) => query.bind(*v),
                    Cell::Text(v) => query.bind(v.as_str()),
                };
            }
            inserted += query
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    error!("Failed to insert into {}: {}", table.name, e);
                    AppError::Db(e.into())
                })?
                .rows_affected();
        }

        tx.commit().await?;

        debug!("Replaced table {} with {} rows", table.name, inserted);
        Ok(inserted)
    }

    /// Closes the pool, flushing the database file.
    pub async fn close(self) {
        self.pool.close().await;
    }

    /// Number of rows currently stored in `table`.
    #[cfg(test)]
    pub async fn count_rows(&self, table: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", quote_ident(table)))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// `(name, declared type)` of each column of `table`.
    #[cfg(test)]
    pub async fn column_info(&self, table: &str) -> Result<Vec<(String, String)>> {
        let columns = sqlx::query_as::<_, (String, String)>(
            "SELECT name, type FROM pragma_table_info(?) ORDER BY cid",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;
        Ok(columns)
    }

    /// Whether a table named `table` exists.
    #[cfg(test)]
    pub async fn has_table(&self, table: &str) -> Result<bool> {
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(&self.pool)
        .await?;
        Ok(found > 0)
    }

    #[cfg(test)]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}
