//! Input Loader — reads job postings from CSV or JSON files.
//!
//! CSV: header `Company, Job Title, Job URL, Job Description, Questions`, with
//! questions separated by `|`. JSON: an array of objects with the same keys,
//! `Questions` being a list. Missing description/questions columns default to empty.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::models::JobPosting;

const QUESTION_SEPARATOR: char = '|';

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot infer input format from '{0}'; use .csv or .json or pass --input-format")]
    UnknownFormat(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Infers the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(InputFormat::Csv),
            "json" => Some(InputFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CsvJobRow {
    #[serde(rename = "Company")]
    company: String,
    #[serde(rename = "Job Title")]
    title: String,
    #[serde(rename = "Job URL")]
    url: String,
    #[serde(rename = "Job Description", default)]
    description: String,
    #[serde(rename = "Questions", default)]
    questions: String,
}

#[derive(Debug, Deserialize)]
struct JsonJobRow {
    #[serde(rename = "Company")]
    company: String,
    #[serde(rename = "Job Title")]
    title: String,
    #[serde(rename = "Job URL")]
    url: String,
    #[serde(rename = "Job Description", default)]
    description: String,
    #[serde(rename = "Questions", default)]
    questions: Vec<String>,
}

/// Loads every job posting from `path`. `format` overrides extension-based detection.
pub fn load_jobs(path: &Path, format: Option<InputFormat>) -> Result<Vec<JobPosting>, InputError> {
    let format = format
        .or_else(|| InputFormat::from_path(path))
        .ok_or_else(|| InputError::UnknownFormat(path.to_path_buf()))?;

    let content = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let jobs = match format {
        InputFormat::Csv => parse_csv(&content)?,
        InputFormat::Json => parse_json(&content)?,
    };

    info!("Loaded {} job(s) from {}", jobs.len(), path.display());
    Ok(jobs)
}

pub fn parse_csv(content: &str) -> Result<Vec<JobPosting>, InputError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut jobs = Vec::new();
    for row in reader.deserialize::<CsvJobRow>() {
        let row = row?;
        jobs.push(JobPosting {
            company: row.company,
            title: row.title,
            url: row.url,
            description: row.description,
            questions: clean_questions(row.questions.split(QUESTION_SEPARATOR)),
        });
    }
    Ok(jobs)
}

pub fn parse_json(content: &str) -> Result<Vec<JobPosting>, InputError> {
    let rows: Vec<JsonJobRow> = serde_json::from_str(content)?;
    Ok(rows
        .into_iter()
        .map(|row| JobPosting {
            company: row.company,
            title: row.title,
            url: row.url,
            description: row.description,
            questions: clean_questions(row.questions.iter().map(String::as_str)),
        })
        .collect())
}

fn clean_questions<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    raw.map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV_FIXTURE: &str = "\
Company,Job Title,Job URL,Job Description,Questions
Acme,Backend Engineer,https://boards.greenhouse.io/acme/1,\"Rust, Postgres\",Why Acme? | What is your notice period?
Globex,SRE,https://jobs.lever.co/globex/2,On-call rotation,
";

    #[test]
    fn test_csv_splits_pipe_separated_questions() {
        let jobs = parse_csv(CSV_FIXTURE).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].company, "Acme");
        assert_eq!(jobs[0].description, "Rust, Postgres");
        assert_eq!(
            jobs[0].questions,
            vec!["Why Acme?", "What is your notice period?"]
        );
    }

    #[test]
    fn test_csv_empty_questions_cell_gives_no_questions() {
        let jobs = parse_csv(CSV_FIXTURE).unwrap();
        assert!(jobs[1].questions.is_empty());
    }

    #[test]
    fn test_csv_without_questions_column() {
        let csv = "Company,Job Title,Job URL,Job Description\nAcme,Dev,https://a.example,Build\n";
        let jobs = parse_csv(csv).unwrap();
        assert_eq!(jobs.len(), 1);
        assert!(jobs[0].questions.is_empty());
    }

    #[test]
    fn test_csv_missing_required_column_errors() {
        let csv = "Company,Job URL\nAcme,https://a.example\n";
        assert!(matches!(parse_csv(csv), Err(InputError::Csv(_))));
    }

    #[test]
    fn test_json_questions_list_is_trimmed() {
        let json = r#"[
            {
                "Company": "Initech",
                "Job Title": "Platform Engineer",
                "Job URL": "https://initech.example/jobs/9",
                "Job Description": "TPS reports, but in Rust.",
                "Questions": ["  Why Initech? ", "", "Favourite stapler?"]
            },
            {
                "Company": "Hooli",
                "Job Title": "Data Engineer",
                "Job URL": "https://hooli.example/jobs/1"
            }
        ]"#;
        let jobs = parse_json(json).unwrap();
        assert_eq!(jobs[0].questions, vec!["Why Initech?", "Favourite stapler?"]);
        assert!(jobs[1].questions.is_empty());
        assert!(jobs[1].description.is_empty());
    }

    #[test]
    fn test_format_inferred_from_extension() {
        assert_eq!(
            InputFormat::from_path(Path::new("jobs.CSV")),
            Some(InputFormat::Csv)
        );
        assert_eq!(
            InputFormat::from_path(Path::new("jobs.json")),
            Some(InputFormat::Json)
        );
        assert_eq!(InputFormat::from_path(Path::new("jobs.txt")), None);
    }

    #[test]
    fn test_load_jobs_unknown_extension_errors() {
        let err = load_jobs(Path::new("jobs.xlsx"), None).unwrap_err();
        assert!(matches!(err, InputError::UnknownFormat(_)));
    }

    #[test]
    fn test_load_jobs_missing_file_is_io_error() {
        let err = load_jobs(Path::new("/nonexistent/jobs.csv"), None).unwrap_err();
        assert!(matches!(err, InputError::Io { .. }));
    }

    #[test]
    fn test_load_jobs_reads_file_with_format_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV_FIXTURE.as_bytes()).unwrap();
        let jobs = load_jobs(file.path(), Some(InputFormat::Csv)).unwrap();
        assert_eq!(jobs.len(), 2);
    }
}
