use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;

use crate::models::JobPosting;
use crate::output::{ensure_parent, OutputError};

const HEADER: [&str; 4] = ["Date Applied", "Company", "Job Title", "Job URL"];
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only CSV record of every application the autofill driver prepared.
#[derive(Debug, Clone)]
pub struct ApplicationLog {
    path: PathBuf,
}

impl ApplicationLog {
    /// Opens the log, writing the header row if the file does not exist yet.
    pub fn open(path: &Path) -> Result<Self, OutputError> {
        if !path.exists() {
            ensure_parent(path)?;
            let file = std::fs::File::create(path).map_err(|e| OutputError::io(path, e))?;
            let mut wtr = csv::Writer::from_writer(file);
            wtr.write_record(HEADER)?;
            wtr.flush().map_err(|e| OutputError::io(path, e))?;
            info!("Created application log {}", path.display());
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, job: &JobPosting, applied_at: DateTime<Local>) -> Result<(), OutputError> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| OutputError::io(&self.path, e))?;
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        let date = applied_at.format(TIMESTAMP_FORMAT).to_string();
        wtr.write_record([
            date.as_str(),
            job.company.as_str(),
            job.title.as_str(),
            job.url.as_str(),
        ])?;
        wtr.flush().map_err(|e| OutputError::io(&self.path, e))?;
        Ok(())
    }
}
