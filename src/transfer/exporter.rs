use crate::db::TableSource;
use crate::error::Result;
use crate::files::write_table;
use indicatif::ProgressBar;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Outcome of a completed export.
#[derive(Debug)]
pub struct ExportSummary {
    pub output_dir: PathBuf,
    /// `(table, file written)` in export order.
    pub files: Vec<(String, PathBuf)>,
}

impl ExportSummary {
    pub fn table_count(&self) -> usize {
        self.files.len()
    }
}

/// Writes every table of `source` to `<output_dir>/<table>.csv`.
///
/// Creates `output_dir` if needed and overwrites existing files. The first failing table
/// aborts the export; files already written remain. An `Exporting <table>...` line goes
/// to `out` for every table, whether or not the progress bar is drawn.
pub async fn export_tables<S: TableSource, W: Write>(
    source: &S,
    output_dir: &Path,
    progress: &ProgressBar,
    out: &mut W,
) -> Result<ExportSummary> {
    fs::create_dir_all(output_dir)?;

    let tables = source.list_tables().await?;
    progress.set_length(tables.len() as u64);

    let mut files = Vec::with_capacity(tables.len());
    for table in tables {
        progress.set_message(table.clone());
        progress.suspend(|| writeln!(out, "Exporting {}...", table))?;
        info!("Exporting {}", table);

        let data = source.fetch_table(&table).await?;
        let path = write_table(output_dir, &data)?;
        info!("Wrote {} rows to {}", data.row_count(), path.display());

        files.push((table, path));
        progress.inc(1);
    }
    progress.finish_and_clear();

    Ok(ExportSummary {
        output_dir: output_dir.to_path_buf(),
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::transfer::test_support::MemorySource;
    use std::collections::BTreeSet;
    use std::io;
    use tempfile::tempdir;

    #[tokio::test]
    async fn writes_one_file_per_table() {
        let dir = tempdir().unwrap();
        let source = MemorySource::northwind_sample();

        let summary = export_tables(&source, dir.path(), &ProgressBar::hidden(), &mut io::sink())
            .await
            .unwrap();

        assert_eq!(summary.table_count(), 3);
        let written: BTreeSet<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        let expected: BTreeSet<String> = ["categories.csv", "region.csv", "shippers.csv"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(written, expected);

        let region = fs::read_to_string(dir.path().join("region.csv")).unwrap();
        let mut lines = region.lines();
        assert_eq!(lines.next(), Some("region_id,region_description"));
        assert_eq!(lines.count(), 4);
    }

    #[tokio::test]
    async fn creates_missing_output_directory() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("binder").join("data");
        assert!(!out.exists());

        let source = MemorySource::northwind_sample();
        export_tables(&source, &out, &ProgressBar::hidden(), &mut io::sink())
            .await
            .unwrap();

        assert!(out.join("shippers.csv").is_file());
    }

    #[tokio::test]
    async fn failing_table_aborts_remaining_exports() {
        let dir = tempdir().unwrap();
        let source = MemorySource::northwind_sample().failing_on("region");

        let result = export_tables(&source, dir.path(), &ProgressBar::hidden(), &mut io::sink()).await;

        assert!(matches!(result, Err(AppError::Db(_))));
        // Tables are exported in name order: categories, region, shippers.
        assert!(dir.path().join("categories.csv").is_file());
        assert!(!dir.path().join("region.csv").exists());
        assert!(!dir.path().join("shippers.csv").exists());
        assert_eq!(source.fetched(), vec!["categories", "region"]);
    }

    #[tokio::test]
    async fn empty_source_exports_nothing() {
        let dir = tempdir().unwrap();
        let source = MemorySource::default();

        let summary = export_tables(&source, dir.path(), &ProgressBar::hidden(), &mut io::sink())
            .await
            .unwrap();

        assert_eq!(summary.table_count(), 0);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn announces_each_table_with_hidden_progress_bar() {
        let dir = tempdir().unwrap();
        let source = MemorySource::northwind_sample();
        let progress = ProgressBar::hidden();
        let mut out: Vec<u8> = Vec::new();

        export_tables(&source, dir.path(), &progress, &mut out)
            .await
            .unwrap();

        assert!(progress.is_hidden());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Exporting categories...\nExporting region...\nExporting shippers...\n"
        );
    }
}
