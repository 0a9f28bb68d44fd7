use crate::error::{AppError, Result};
use crate::models::{dedupe_column_names, Cell, Table};
use csv::{ReaderBuilder, Writer};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path of the CSV file holding `table` inside `dir`.
pub fn csv_path(dir: &Path, table: &str) -> PathBuf {
    dir.join(format!("{}.csv", table))
}

/// Writes `table` to `<dir>/<name>.csv`, replacing any existing file.
///
/// Returns the path written. Null cells become empty fields.
pub fn write_table(dir: &Path, table: &Table) -> Result<PathBuf> {
    let path = csv_path(dir, &table.name);
    debug!("Writing {} rows to {}", table.row_count(), path.display());

    let mut writer = Writer::from_path(&path)?;
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(Cell::to_csv_field))?;
    }
    writer.flush()?;

    Ok(path)
}

/// Reads `<dir>/<name>.csv` into a typed table named `name`.
///
/// # Errors
///
/// * `AppError::MissingCsv` if the file does not exist.
/// * `AppError::MalformedCsv` if the file has no header row.
/// * `AppError::Csv` if a record cannot be parsed, including records whose field
///   count differs from the header.
pub fn read_table(dir: &Path, name: &str) -> Result<Table> {
    let path = csv_path(dir, name);
    if !path.is_file() {
        return Err(AppError::MissingCsv(path));
    }

    let mut reader = ReaderBuilder::new().has_headers(true).from_path(&path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(AppError::MalformedCsv {
            path,
            reason: "no header row".to_string(),
        });
    }
    let columns = dedupe_column_names(headers);

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    debug!(
        "Read {} records with {} columns from {}",
        records.len(),
        columns.len(),
        path.display()
    );
    Ok(Table::from_raw_records(name, columns, records))
}
