use crate::db::SqliteDestination;
use crate::error::Result;
use crate::files::read_table;
use crate::models::ColumnType;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table as SummaryTable};
use indicatif::ProgressBar;
use std::path::Path;
use tracing::info;

/// Tables loaded by `import` when no list is given, in load order.
pub const DEFAULT_TABLES: [&str; 14] = [
    "suppliers",
    "customers",
    "territories",
    "region",
    "us_states",
    "customer_demographics",
    "customer_customer_demo",
    "employees",
    "employee_territories",
    "orders",
    "order_details",
    "products",
    "shippers",
    "categories",
];

/// What was written for one table.
#[derive(Debug, Clone)]
pub struct ImportedTable {
    pub name: String,
    pub columns: Vec<String>,
    pub column_types: Vec<ColumnType>,
    pub rows: u64,
}

/// Loads `<input_dir>/<name>.csv` into `destination` for each name in `tables`, in order.
///
/// Each table replaces any existing table of the same name. A missing or malformed CSV
/// stops the run; tables loaded before it stay loaded.
pub async fn import_tables(
    destination: &SqliteDestination,
    input_dir: &Path,
    tables: &[String],
    progress: &ProgressBar,
) -> Result<Vec<ImportedTable>> {
    progress.set_length(tables.len() as u64);

    let mut imported = Vec::with_capacity(tables.len());
    for name in tables {
        progress.set_message(name.clone());
        info!("Importing {}", name);

        let table = read_table(input_dir, name)?;
        let rows = destination.replace_table(&table).await?;
        info!("Loaded {} rows into {}", rows, name);

        imported.push(ImportedTable {
            name: table.name,
            columns: table.columns,
            column_types: table.column_types,
            rows,
        });
        progress.inc(1);
    }
    progress.finish_and_clear();

    Ok(imported)
}

/// Renders the per-table result of an import for the terminal.
pub fn import_summary(imported: &[ImportedTable]) -> SummaryTable {
    let mut summary = SummaryTable::new();
    summary
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Table", "Columns", "Rows", "Types"]);

    for table in imported {
        let types = table
            .columns
            .iter()
            .zip(&table.column_types)
            .map(|(column, ty)| format!("{}: {}", column, ty))
            .collect::<Vec<_>>()
            .join(", ");
        summary.add_row(vec![
            table.name.clone(),
            table.columns.len().to_string(),
            table.rows.to_string(),
            types,
        ]);
    }
    summary
}
