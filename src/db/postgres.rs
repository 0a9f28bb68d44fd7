//! Provides PostgreSQL read access using `sqlx`.
//!
//! Enumerates the base tables of one schema through `information_schema` and reads each
//! table in full, rendering every value as PostgreSQL text so it can be written to CSV
//! without per-type handling.
//! Also contains integration tests (requires the `integration-tests` feature).

use super::TableSource;
use crate::error::{AppError, Result};
use crate::models::{quote_ident, Table};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, error, info};

/// A connection to the source PostgreSQL database, bound to one schema.
pub struct PostgresSource {
    pool: Pool<Postgres>,
    schema: String,
}

impl PostgresSource {
    /// Connects to PostgreSQL and resolves the schema to export.
    ///
    /// # Arguments
    ///
    /// * `options` - Connection settings for the PostgreSQL database.
    /// * `schema` - Schema to read; `None` means the connection's `current_schema()`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the connection cannot be established, and
    /// `AppError::Config` if no schema was given and the search path is empty.
    pub async fn connect(options: PgConnectOptions, schema: Option<&str>) -> Result<Self> {
        info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                AppError::Db(e.into())
            })?;

        let schema = match schema {
            Some(schema) => schema.to_string(),
            None => sqlx::query_scalar::<_, Option<String>>("SELECT current_schema()::text")
                .fetch_one(&pool)
                .await?
                .ok_or_else(|| {
                    AppError::Config("search_path is empty and no --schema was given".to_string())
                })?,
        };

        info!("Connected to PostgreSQL, exporting schema {}", schema);
        Ok(Self { pool, schema })
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Column names of `table` in declaration order.
    pub async fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        let columns = sqlx::query_scalar::<_, String>(
            r#"
            SELECT column_name::text
            FROM information_schema.columns
            WHERE table_schema = $1 AND table_name = $2
            ORDER BY ordinal_position
            "#,
        )
        .bind(&self.schema)
        .bind(table)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to list columns of {}: {}", table, e);
            AppError::Db(e.into())
        })?;

        debug!("Table {} has columns {:?}", table, columns);
        Ok(columns)
    }

    /// Closes the pool, waiting for the connection to shut down.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

/// Builds `SELECT "a"::text, "b"::text FROM "schema"."table"`.
///
/// PostgreSQL accepts an empty select list, so zero-column tables need no special case.
fn select_as_text(schema: &str, table: &str, columns: &[String]) -> String {
    let select_list = columns
        .iter()
        .map(|c| format!("{}::text", quote_ident(c)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT {} FROM {}.{}",
        select_list,
        quote_ident(schema),
        quote_ident(table)
    )
}

impl TableSource for PostgresSource {
    /// Lists the base tables (views excluded) of the bound schema, ordered by name.
    async fn list_tables(&self) -> Result<Vec<String>> {
        let tables = sqlx::query_scalar::<_, String>(
            r#"
            SELECT table_name::text
            FROM information_schema.tables
            WHERE table_schema = $1 AND table_type = 'BASE TABLE'
            ORDER BY table_name
            "#,
        )
        .bind(&self.schema)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to list tables: {}", e);
            AppError::Db(e.into())
        })?;

        info!("Found {} tables in schema {}", tables.len(), self.schema);
        Ok(tables)
    }

    /// Reads every row of `table`. SQL `NULL` stays null; everything else is text.
    async fn fetch_table(&self, table: &str) -> Result<Table> {
        let columns = self.table_columns(table).await?;
        let query = select_as_text(&self.schema, table, &columns);

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to read table {}: {}", table, e);
                AppError::Db(e.into())
            })?;

        let mut values = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut record = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                record.push(row.try_get::<Option<String>, _>(i)?);
            }
            values.push(record);
        }

        debug!("Read {} rows from {}", values.len(), table);
        Ok(Table::from_text_rows(table, columns, values))
    }
}
