use std::io;
use std::path::Path;

use serde::Serialize;

use crate::models::{ApplicationRecord, QuestionAnswer};
use crate::output::{ensure_parent, OutputError};

#[derive(Debug, Serialize)]
struct JsonRecord<'a> {
    #[serde(rename = "Company")]
    company: &'a str,
    #[serde(rename = "Job Title")]
    title: &'a str,
    #[serde(rename = "Job URL")]
    url: &'a str,
    #[serde(rename = "Questions")]
    questions: Vec<QuestionAnswer>,
    #[serde(rename = "CoverLetter")]
    cover_letter: Option<&'a str>,
}

impl<'a> From<&'a ApplicationRecord> for JsonRecord<'a> {
    fn from(record: &'a ApplicationRecord) -> Self {
        JsonRecord {
            company: &record.job.company,
            title: &record.job.title,
            url: &record.job.url,
            questions: record.question_answers(),
            cover_letter: record.cover_letter.as_deref(),
        }
    }
}

/// Writes a pretty-printed JSON array mirroring the record shape.
pub fn write_json<W: io::Write>(records: &[ApplicationRecord], writer: W) -> Result<(), OutputError> {
    let rows: Vec<JsonRecord<'_>> = records.iter().map(JsonRecord::from).collect();
    serde_json::to_writer_pretty(writer, &rows)?;
    Ok(())
}

pub fn write_json_file(records: &[ApplicationRecord], path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    let file = std::fs::File::create(path).map_err(|e| OutputError::io(path, e))?;
    let mut writer = io::BufWriter::new(file);
    write_json(records, &mut writer)?;
    io::Write::flush(&mut writer).map_err(|e| OutputError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::sample_job;
    use crate::models::AnswerSet;
    use serde_json::{json, Value};

    fn to_value(records: &[ApplicationRecord]) -> Value {
        let mut buf = Vec::new();
        write_json(records, &mut buf).unwrap();
        serde_json::from_slice(&buf).unwrap()
    }

    #[test]
    fn test_record_shape() {
        let mut answers = AnswerSet::new();
        answers.insert(1, "Two weeks");
        let records = vec![ApplicationRecord::new(
            sample_job("Acme", &["Why?", "Notice?"]),
            answers,
            Some("Dear Acme".to_string()),
        )];

        let value = to_value(&records);
        assert_eq!(
            value,
            json!([{
                "Company": "Acme",
                "Job Title": "Software Engineer",
                "Job URL": "https://jobs.example.com/acme",
                "Questions": [
                    {"question": "Why?", "answer": ""},
                    {"question": "Notice?", "answer": "Two weeks"}
                ],
                "CoverLetter": "Dear Acme"
            }])
        );
    }

    #[test]
    fn test_zero_questions_and_no_cover_letter() {
        let records = vec![ApplicationRecord::new(
            sample_job("Acme", &[]),
            AnswerSet::new(),
            None,
        )];
        let value = to_value(&records);
        assert_eq!(value[0]["Questions"], json!([]));
        assert_eq!(value[0]["CoverLetter"], Value::Null);
    }

    #[test]
    fn test_empty_batch_is_empty_array() {
        assert_eq!(to_value(&[]), json!([]));
    }
}
