use std::io;
use std::path::Path;

use crate::models::ApplicationRecord;
use crate::output::{ensure_parent, OutputError};

/// Writes one row per record. Question/Answer column pairs are sized to the
/// largest question count; shorter records leave the trailing cells empty.
/// A `Cover Letter` column is added only when some record has one.
pub fn write_csv<W: io::Write>(records: &[ApplicationRecord], writer: W) -> Result<(), OutputError> {
    let max_questions = records
        .iter()
        .map(|r| r.job.questions.len())
        .max()
        .unwrap_or(0);
    let with_cover = records.iter().any(|r| r.cover_letter.is_some());

    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![
        "Company".to_string(),
        "Job Title".to_string(),
        "Job URL".to_string(),
    ];
    for n in 1..=max_questions {
        header.push(format!("Question {n}"));
        header.push(format!("Answer {n}"));
    }
    if with_cover {
        header.push("Cover Letter".to_string());
    }
    wtr.write_record(&header)?;

    for record in records {
        let mut row = vec![
            record.job.company.clone(),
            record.job.title.clone(),
            record.job.url.clone(),
        ];
        let pairs = record.question_answers();
        for i in 0..max_questions {
            match pairs.get(i) {
                Some(qa) => {
                    row.push(qa.question.clone());
                    row.push(qa.answer.clone());
                }
                None => {
                    row.push(String::new());
                    row.push(String::new());
                }
            }
        }
        if with_cover {
            row.push(record.cover_letter.clone().unwrap_or_default());
        }
        wtr.write_record(&row)?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_csv_file(records: &[ApplicationRecord], path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    let file = std::fs::File::create(path).map_err(|e| OutputError::io(path, e))?;
    write_csv(records, file)
}
