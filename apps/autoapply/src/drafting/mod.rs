//! Answer Drafting — composes prompts, calls the text generator, and turns the
//! numbered reply back into an [`AnswerSet`].
//!
//! All model calls go through [`TextGenerator`]; nothing here knows which
//! service is behind it.

use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::NUMBERED_FORMAT_INSTRUCTION;
use crate::llm_client::{strip_code_fences, LlmError, TextGenerator};
use crate::models::{AnswerSet, JobPosting};
use crate::parser::{reconcile, NumberingMode};

pub mod prompts;
pub mod resume;

use prompts::{ANSWERS_PROMPT_TEMPLATE, COVER_LETTER_PROMPT_TEMPLATE};

/// Drafts answers and cover letters for one applicant.
#[derive(Clone)]
pub struct AnswerDrafter {
    generator: Arc<dyn TextGenerator>,
    resume_summary: String,
    mode: NumberingMode,
}

impl AnswerDrafter {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        resume_summary: String,
        mode: NumberingMode,
    ) -> Self {
        Self {
            generator,
            resume_summary,
            mode,
        }
    }

    /// Drafts answers for all `questions` in a single model call.
    ///
    /// No questions means no call. In lenient mode a reply that does not line
    /// up with the questions is logged and returned as-is; missing answers are
    /// simply absent from the set.
    pub async fn draft_answers(
        &self,
        job_description: &str,
        questions: &[String],
    ) -> Result<AnswerSet, AppError> {
        if questions.is_empty() {
            return Ok(AnswerSet::new());
        }

        let prompt = build_answers_prompt(&self.resume_summary, job_description, questions);
        info!("Drafting answers for {} question(s)", questions.len());

        let reply = self.generator.generate(&prompt).await?;
        let answers = self
            .mode
            .parse(strip_code_fences(&reply), Some(questions.len()))?;

        let rec = reconcile(&answers, questions.len());
        if !rec.is_complete() {
            warn!(
                "Model reply does not match the questions: expected {}, parsed {}, missing {:?}, unexpected {:?}",
                rec.expected,
                answers.len(),
                rec.missing,
                rec.unexpected
            );
        }

        Ok(answers)
    }

    pub async fn draft_cover_letter(&self, job: &JobPosting) -> Result<String, AppError> {
        let prompt = COVER_LETTER_PROMPT_TEMPLATE
            .replace("{resume_summary}", &self.resume_summary)
            .replace("{company}", &job.company)
            .replace("{title}", &job.title)
            .replace("{job_description}", &job.description);

        info!("Drafting cover letter for {} - {}", job.company, job.title);
        let reply = self.generator.generate(&prompt).await?;
        let letter = strip_code_fences(&reply).to_string();
        if letter.is_empty() {
            return Err(LlmError::EmptyContent {
                finish_reason: "blank cover letter".to_string(),
            }
            .into());
        }
        Ok(letter)
    }
}

/// Numbers the questions `1.`, `2.`, … and fills the answers template.
pub fn build_answers_prompt(
    resume_summary: &str,
    job_description: &str,
    questions: &[String],
) -> String {
    let question_text = questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q))
        .collect::<Vec<_>>()
        .join("\n");

    ANSWERS_PROMPT_TEMPLATE
        .replace("{resume_summary}", resume_summary)
        .replace("{job_description}", job_description)
        .replace("{question_text}", &question_text)
        .replace("{format_instruction}", NUMBERED_FORMAT_INSTRUCTION)
}

#[cfg(test)]
pub(crate) mod fake {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llm_client::{LlmError, TextGenerator};

    /// Replays canned replies in order and records every prompt it receives.
    #[derive(Default)]
    pub struct ScriptedGenerator {
        replies: Mutex<VecDeque<String>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        pub fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn prompt_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or(LlmError::RateLimited { retries: 0 })
        }
    }
}
