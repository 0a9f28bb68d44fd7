//! Defines the application's primary error type `AppError` and a convenience `Result` alias.
//!
//! Uses the `thiserror` crate for ergonomic error definition and provides `From`
//! implementations to convert common external errors into `AppError` variants.
//! Errors that do not implement `Clone` are wrapped in `Arc` to allow `AppError` to be cloneable.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// The primary error enumeration for all application-specific errors.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    /// Error originating from database operations (`sqlx`), on either the PostgreSQL or SQLite side.
    #[error("Database Error: {0}")]
    Db(Arc<sqlx::Error>),

    /// Error raised by the CSV reader or writer.
    #[error("CSV Error: {0}")]
    Csv(Arc<csv::Error>),

    /// A CSV file named by the import list is not present in the input directory.
    #[error("Missing CSV file: {}", .0.display())]
    MissingCsv(PathBuf),

    /// CSV content that parses but cannot be turned into a table.
    #[error("Malformed CSV file {}: {reason}", path.display())]
    MalformedCsv { path: PathBuf, reason: String },

    /// Error related to standard I/O operations.
    #[error("I/O Error: {0}")]
    Io(Arc<std::io::Error>),

    /// Incomplete or invalid connection settings.
    #[error("Configuration Error: {0}")]
    Config(String),

    /// Error related to progress bar style templating (`indicatif`).
    #[error("Progress Style Template Error: {0}")]
    Template(Arc<indicatif::style::TemplateError>),
}

/// A specialized `Result` type using the application's `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

// --- From implementations ---

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Db(Arc::new(err))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Csv(Arc::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(Arc::new(err))
    }
}

impl From<indicatif::style::TemplateError> for AppError {
    fn from(err: indicatif::style::TemplateError) -> Self {
        AppError::Template(Arc::new(err))
    }
}
