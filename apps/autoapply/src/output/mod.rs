//! Output Writer — serializes application records to CSV, JSON or PDF.
//!
//! Whole batch, single pass; existing files are overwritten on rerun.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::models::ApplicationRecord;

pub mod app_log;
pub mod csv_writer;
pub mod json_writer;
pub mod pdf;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PDF error: {0}")]
    Pdf(String),
}

impl OutputError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        OutputError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Pdf,
}

impl OutputFormat {
    /// Default target: a file in the current directory for CSV/JSON, the
    /// configured output directory for PDF.
    pub fn default_target(self, output_dir: &Path) -> PathBuf {
        match self {
            OutputFormat::Csv => PathBuf::from("answers.csv"),
            OutputFormat::Json => PathBuf::from("answers.json"),
            OutputFormat::Pdf => output_dir.to_path_buf(),
        }
    }
}

/// Writes `records` in `format` to `target` (a file for CSV/JSON, a directory
/// for PDF). Returns every file written.
pub fn write_records(
    records: &[ApplicationRecord],
    format: OutputFormat,
    target: &Path,
) -> Result<Vec<PathBuf>, OutputError> {
    let written = match format {
        OutputFormat::Csv => {
            csv_writer::write_csv_file(records, target)?;
            vec![target.to_path_buf()]
        }
        OutputFormat::Json => {
            json_writer::write_json_file(records, target)?;
            vec![target.to_path_buf()]
        }
        OutputFormat::Pdf => pdf::write_pdfs(records, target)?,
    };

    info!(
        "Wrote {} record(s) as {:?} to {} file(s)",
        records.len(),
        format,
        written.len()
    );
    Ok(written)
}

/// Creates the parent directory of `path` when it has one.
pub(crate) fn ensure_parent(path: &Path) -> Result<(), OutputError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| OutputError::io(parent, e))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::sample_job;
    use crate::models::AnswerSet;

    #[test]
    fn test_default_targets() {
        let dir = Path::new("out");
        assert_eq!(OutputFormat::Csv.default_target(dir), PathBuf::from("answers.csv"));
        assert_eq!(OutputFormat::Json.default_target(dir), PathBuf::from("answers.json"));
        assert_eq!(OutputFormat::Pdf.default_target(dir), PathBuf::from("out"));
    }

    #[test]
    fn test_write_records_creates_nested_parent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/deeper/answers.json");
        let records = vec![ApplicationRecord::new(
            sample_job("Acme", &["Why?"]),
            AnswerSet::new(),
            None,
        )];

        let written = write_records(&records, OutputFormat::Json, &target).unwrap();
        assert_eq!(written, vec![target.clone()]);
        assert!(target.exists());
    }
}
