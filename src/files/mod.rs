//! Reads and writes tables as CSV files on disk.
//!
//! Each table maps to `<dir>/<table>.csv`: a header row of column names followed by
//! one record per row, with no index column.

mod csv_table;

pub use csv_table::*;
