//! Defines the data structures used throughout the application.
//!
//! The central type is `Table`, the in-memory form every table takes between its
//! source (PostgreSQL or a CSV file) and its destination (a CSV file or SQLite).

mod table;

pub use table::*;
