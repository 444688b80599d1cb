use serde::{Deserialize, Serialize};

use crate::models::AnswerSet;

/// A job posting as read from the input file. Not mutated after loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub company: String,
    pub title: String,
    pub url: String,
    pub description: String,
    pub questions: Vec<String>,
}

/// One question paired with its answer, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
}

/// A job posting bundled with its drafted answers and optional cover letter.
#[derive(Debug, Clone)]
pub struct ApplicationRecord {
    pub job: JobPosting,
    pub answers: AnswerSet,
    pub cover_letter: Option<String>,
}

impl ApplicationRecord {
    pub fn new(job: JobPosting, answers: AnswerSet, cover_letter: Option<String>) -> Self {
        Self {
            job,
            answers,
            cover_letter,
        }
    }

    /// Pairs each question with its answer, keeping question order.
    /// Unanswered questions get an empty answer; answers for indices beyond
    /// the question list are dropped.
    pub fn question_answers(&self) -> Vec<QuestionAnswer> {
        self.job
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| QuestionAnswer {
                question: q.clone(),
                answer: self.answers.answer_or_empty(i).to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) fn sample_job(company: &str, questions: &[&str]) -> JobPosting {
    JobPosting {
        company: company.to_string(),
        title: "Software Engineer".to_string(),
        url: format!("https://jobs.example.com/{}", company.to_lowercase()),
        description: "Build reliable backend services.".to_string(),
        questions: questions.iter().map(|q| q.to_string()).collect(),
    }
}
