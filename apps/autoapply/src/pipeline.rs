//! The two end-to-end flows: batch drafting to files, and interactive browser
//! autofill. Jobs are processed one at a time, in input order.

use chrono::Local;
use tracing::{info, warn};

use crate::browser::autofill::Autofiller;
use crate::browser::review::Reviewer;
use crate::drafting::AnswerDrafter;
use crate::errors::AppError;
use crate::models::{ApplicationRecord, JobPosting};
use crate::output::app_log::ApplicationLog;

const PAUSE_PROMPT: &str =
    "Review the application in the browser, then press Enter to continue to the next job...";

/// Drafts answers (and optionally a cover letter) for every job.
pub async fn draft_batch(
    drafter: &AnswerDrafter,
    jobs: Vec<JobPosting>,
    with_cover_letter: bool,
) -> Result<Vec<ApplicationRecord>, AppError> {
    let total = jobs.len();
    let mut records = Vec::with_capacity(total);

    for (n, job) in jobs.into_iter().enumerate() {
        info!("[{}/{}] {} at {}", n + 1, total, job.title, job.company);
        let answers = drafter
            .draft_answers(&job.description, &job.questions)
            .await?;
        let cover_letter = if with_cover_letter {
            Some(drafter.draft_cover_letter(&job).await?)
        } else {
            None
        };
        records.push(ApplicationRecord::new(job, answers, cover_letter));
    }

    Ok(records)
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ApplySummary {
    pub prepared: usize,
    pub skipped: usize,
}

/// Autofills every job page, logs each prepared application, and waits for
/// the operator between jobs. A page the browser cannot handle is skipped;
/// model and console errors stop the run.
pub async fn apply_all(
    autofiller: &Autofiller,
    reviewer: &dyn Reviewer,
    log: &ApplicationLog,
    jobs: &[JobPosting],
) -> Result<ApplySummary, AppError> {
    let mut summary = ApplySummary::default();

    for (n, job) in jobs.iter().enumerate() {
        println!(
            "\n=== [{}/{}] {} at {} ===",
            n + 1,
            jobs.len(),
            job.title,
            job.company
        );

        let report = match autofiller.fill_application(job).await {
            Ok(report) => report,
            Err(AppError::Browser(e)) => {
                warn!("Skipping {}: {}", job.url, e);
                summary.skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        println!("\n{report}");
        log.append(job, Local::now())?;
        summary.prepared += 1;
        info!("Logged application to {} in {}", job.company, log.path().display());

        reviewer.pause(PAUSE_PROMPT).await?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::browser::fake::FakePage;
    use crate::browser::review::fake::ScriptedReviewer;
    use crate::config::ApplicantProfile;
    use crate::drafting::fake::ScriptedGenerator;
    use crate::models::job::sample_job;
    use crate::parser::NumberingMode;

    fn drafter(generator: Arc<ScriptedGenerator>, mode: NumberingMode) -> AnswerDrafter {
        AnswerDrafter::new(generator, "Rust engineer".to_string(), mode)
    }

    #[tokio::test]
    async fn test_draft_batch_keeps_job_order() {
        let generator = Arc::new(ScriptedGenerator::new(&[
            "1. Rockets.\n2. Now.",
            "1. Widgets.",
        ]));
        let jobs = vec![
            sample_job("Acme", &["Why?", "When?"]),
            sample_job("Globex", &["Why?"]),
            sample_job("Initech", &[]),
        ];

        let records = draft_batch(&drafter(generator.clone(), NumberingMode::Lenient), jobs, false)
            .await
            .unwrap();

        assert_eq!(generator.prompt_count(), 2);
        let companies: Vec<&str> = records.iter().map(|r| r.job.company.as_str()).collect();
        assert_eq!(companies, vec!["Acme", "Globex", "Initech"]);
        assert_eq!(records[0].answers.get(1), Some("Now."));
        assert_eq!(records[1].answers.get(0), Some("Widgets."));
        assert!(records[2].answers.is_empty());
        assert!(records.iter().all(|r| r.cover_letter.is_none()));
    }

    #[tokio::test]
    async fn test_draft_batch_with_cover_letters() {
        let generator = Arc::new(ScriptedGenerator::new(&["1. Rockets.", "Dear Acme team,"]));
        let records = draft_batch(
            &drafter(generator, NumberingMode::Lenient),
            vec![sample_job("Acme", &["Why?"])],
            true,
        )
        .await
        .unwrap();
        assert_eq!(records[0].cover_letter.as_deref(), Some("Dear Acme team,"));
    }

    #[tokio::test]
    async fn test_draft_batch_strict_mode_fails_on_bad_numbering() {
        let generator = Arc::new(ScriptedGenerator::new(&["1. One\n3. Three"]));
        let err = draft_batch(
            &drafter(generator, NumberingMode::Strict),
            vec![sample_job("Acme", &["A?", "B?"])],
            false,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Numbering(_)));
    }

    #[tokio::test]
    async fn test_apply_all_logs_prepared_and_skips_unreachable() {
        let dir = tempfile::tempdir().unwrap();
        let log = ApplicationLog::open(&dir.path().join("applications_log.csv")).unwrap();

        let jobs = vec![sample_job("Acme", &[]), sample_job("Globex", &[])];
        let page = Arc::new(FakePage::new().unreachable(&jobs[0].url));
        let reviewer = Arc::new(ScriptedReviewer::new(&[]));
        let autofiller = Autofiller::new(
            page.clone(),
            drafter(Arc::new(ScriptedGenerator::new(&[])), NumberingMode::Lenient),
            reviewer.clone(),
            ApplicantProfile::default(),
        );

        let summary = apply_all(&autofiller, reviewer.as_ref(), &log, &jobs)
            .await
            .unwrap();

        assert_eq!(
            summary,
            ApplySummary {
                prepared: 1,
                skipped: 1
            }
        );
        assert_eq!(*reviewer.pauses.lock().unwrap(), 1);
        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("Globex"));
        assert!(!content.contains("Acme"));
    }
}
