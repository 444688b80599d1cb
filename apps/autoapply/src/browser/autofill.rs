//! Per-job autofill flow: profile fields, drafted answers for the empty
//! free-text fields, operator review, then platform overrides.
//!
//! Field-level failures are recorded in the report and never abort the job.
//! Only navigation, the model call and console I/O propagate as errors.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::fields::{FieldRole, FieldValue, FillOutcome, PROFILE_ROLES};
use super::platform::Platform;
use super::review::Reviewer;
use super::{BrowserDriver, BrowserError, ElementId};
use crate::config::ApplicantProfile;
use crate::drafting::AnswerDrafter;
use crate::errors::AppError;
use crate::models::JobPosting;

const FREE_TEXT_SELECTOR: &str = "textarea, input[type='text']";
const DEFAULT_QUESTION_LABEL: &str = "Why do you want this role?";

/// A free-text field left blank after profile fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyField {
    pub element: ElementId,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct FieldReport {
    pub field: String,
    pub outcome: FillOutcome,
}

/// What happened on one application page.
#[derive(Debug, Clone)]
pub struct AutofillReport {
    pub platform: Platform,
    pub profile: Vec<FieldReport>,
    pub answers: Vec<FieldReport>,
    pub overrides: Vec<FieldReport>,
}

impl AutofillReport {
    pub fn filled_count(&self) -> usize {
        self.all().filter(|r| r.outcome.is_filled()).count()
    }

    fn all(&self) -> impl Iterator<Item = &FieldReport> {
        self.profile
            .iter()
            .chain(&self.answers)
            .chain(&self.overrides)
    }
}

impl fmt::Display for AutofillReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Platform: {:?}", self.platform)?;
        for report in self.all() {
            writeln!(f, "  {:<40} {}", report.field, report.outcome)?;
        }
        write!(f, "{} field(s) filled", self.filled_count())
    }
}

/// Fills application pages for one applicant.
pub struct Autofiller {
    driver: Arc<dyn BrowserDriver>,
    drafter: AnswerDrafter,
    reviewer: Arc<dyn Reviewer>,
    profile: ApplicantProfile,
}

impl Autofiller {
    pub fn new(
        driver: Arc<dyn BrowserDriver>,
        drafter: AnswerDrafter,
        reviewer: Arc<dyn Reviewer>,
        profile: ApplicantProfile,
    ) -> Self {
        Self {
            driver,
            drafter,
            reviewer,
            profile,
        }
    }

    /// Opens the job page and fills everything it can. Never submits.
    pub async fn fill_application(&self, job: &JobPosting) -> Result<AutofillReport, AppError> {
        info!("Opening {} ({} at {})", job.url, job.title, job.company);
        self.driver.goto(&job.url).await?;

        let mut profile = Vec::with_capacity(PROFILE_ROLES.len());
        for role in PROFILE_ROLES {
            profile.push(self.fill_role(role).await);
        }

        let empty = self.find_empty_fields().await?;
        let answers = self.draft_and_review(job, &empty).await?;

        let platform = Platform::detect(&job.url);
        let overrides = self.apply_platform_overrides(platform).await;

        Ok(AutofillReport {
            platform,
            profile,
            answers,
            overrides,
        })
    }

    /// Fills one profile field using the first locator that matches anything.
    pub async fn fill_role(&self, role: FieldRole) -> FieldReport {
        let outcome = self.fill_role_outcome(role).await;
        match &outcome {
            FillOutcome::Failed { reason } => warn!("Could not fill {}: {}", role, reason),
            FillOutcome::Ambiguous { candidates } => {
                warn!("{} matched {} fields; filled the first", role, candidates)
            }
            other => debug!("{}: {}", role, other),
        }
        FieldReport {
            field: role.to_string(),
            outcome,
        }
    }

    async fn fill_role_outcome(&self, role: FieldRole) -> FillOutcome {
        let Some(value) = role.profile_value(&self.profile) else {
            return FillOutcome::Skipped {
                reason: format!("{} not set", role.env_var()),
            };
        };

        for locator in role.locators() {
            let found = match self.driver.find_all(locator).await {
                Ok(found) => found,
                Err(e) => {
                    return FillOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            let Some(first) = found.first() else {
                continue;
            };

            let result = match &value {
                FieldValue::Text(text) => self.driver.fill(first, text).await,
                FieldValue::File(path) => self.driver.upload(first, path).await,
            };
            return match result {
                Err(e) => FillOutcome::Failed {
                    reason: e.to_string(),
                },
                Ok(()) if found.len() > 1 => FillOutcome::Ambiguous {
                    candidates: found.len(),
                },
                Ok(()) => FillOutcome::Filled,
            };
        }

        FillOutcome::NotFound
    }

    /// Free-text fields whose value is blank, labelled by `aria-label`, then
    /// `placeholder`, then a generic motivation question.
    pub async fn find_empty_fields(&self) -> Result<Vec<EmptyField>, BrowserError> {
        let mut empty = Vec::new();
        for element in self.driver.find_all(FREE_TEXT_SELECTOR).await? {
            match self.driver.value(&element).await {
                Ok(value) if value.trim().is_empty() => {}
                Ok(_) => continue,
                Err(e) => {
                    warn!("Skipping field {}: {}", element.as_str(), e);
                    continue;
                }
            }
            let label = self.label_for(&element).await;
            empty.push(EmptyField { element, label });
        }
        debug!("Found {} empty free-text field(s)", empty.len());
        Ok(empty)
    }

    async fn label_for(&self, element: &ElementId) -> String {
        for name in ["aria-label", "placeholder"] {
            if let Ok(Some(label)) = self.driver.attribute(element, name).await {
                if !label.trim().is_empty() {
                    return label.trim().to_string();
                }
            }
        }
        DEFAULT_QUESTION_LABEL.to_string()
    }

    async fn draft_and_review(
        &self,
        job: &JobPosting,
        empty: &[EmptyField],
    ) -> Result<Vec<FieldReport>, AppError> {
        if empty.is_empty() {
            return Ok(Vec::new());
        }

        println!(
            "\nFound {} empty question(s). Generating answers...",
            empty.len()
        );
        let labels: Vec<String> = empty.iter().map(|f| f.label.clone()).collect();
        let drafted = self.drafter.draft_answers(&job.description, &labels).await?;

        // Review everything first, then fill, so a slow operator never races the page.
        let mut finals = Vec::with_capacity(empty.len());
        for (idx, field) in empty.iter().enumerate() {
            let answer = self
                .reviewer
                .review(&field.label, drafted.answer_or_empty(idx))
                .await?;
            finals.push(answer);
        }

        let mut reports = Vec::with_capacity(empty.len());
        for (field, answer) in empty.iter().zip(finals) {
            let outcome = match self.driver.fill(&field.element, &answer).await {
                Ok(()) => FillOutcome::Filled,
                Err(e) => {
                    warn!("Could not fill answer for '{}': {}", field.label, e);
                    FillOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            reports.push(FieldReport {
                field: field.label.clone(),
                outcome,
            });
        }
        Ok(reports)
    }

    async fn apply_platform_overrides(&self, platform: Platform) -> Vec<FieldReport> {
        match platform {
            Platform::Greenhouse => self.pick_first_options().await,
            Platform::Lever => vec![
                self.fill_role(FieldRole::LinkedIn).await,
                self.fill_role(FieldRole::GitHub).await,
            ],
            Platform::Generic => Vec::new(),
        }
    }

    /// Greenhouse: choose the first real option (index 1) in every select
    /// that has one.
    async fn pick_first_options(&self) -> Vec<FieldReport> {
        let selects = match self.driver.find_all("select").await {
            Ok(selects) => selects,
            Err(e) => {
                warn!("Could not list select fields: {}", e);
                return vec![FieldReport {
                    field: "select".to_string(),
                    outcome: FillOutcome::Failed {
                        reason: e.to_string(),
                    },
                }];
            }
        };

        let mut reports = Vec::new();
        for select in selects {
            let outcome = match self.driver.find_all_within(&select, "option").await {
                Ok(options) if options.len() < 2 => FillOutcome::Skipped {
                    reason: "no non-blank option".to_string(),
                },
                Ok(_) => match self.driver.select_index(&select, 1).await {
                    Ok(()) => FillOutcome::Filled,
                    Err(e) => FillOutcome::Failed {
                        reason: e.to_string(),
                    },
                },
                Err(e) => FillOutcome::Failed {
                    reason: e.to_string(),
                },
            };
            if let FillOutcome::Failed { reason } = &outcome {
                warn!("Select {}: {}", select.as_str(), reason);
            }
            reports.push(FieldReport {
                field: format!("select {}", select.as_str()),
                outcome,
            });
        }
        reports
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::browser::fake::{el, FakePage};
    use crate::browser::review::fake::ScriptedReviewer;
    use crate::drafting::fake::ScriptedGenerator;
    use crate::models::job::sample_job;
    use crate::parser::NumberingMode;

    fn profile() -> ApplicantProfile {
        ApplicantProfile {
            name: Some("Ada Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            phone: None,
            resume_path: Some(PathBuf::from("resume.pdf")),
            linkedin_url: Some("https://linkedin.com/in/ada".to_string()),
            github_url: None,
        }
    }

    struct Harness {
        page: Arc<FakePage>,
        generator: Arc<ScriptedGenerator>,
        reviewer: Arc<ScriptedReviewer>,
        autofiller: Autofiller,
    }

    fn harness(page: FakePage, replies: &[&str], inputs: &[&str]) -> Harness {
        let page = Arc::new(page);
        let generator = Arc::new(ScriptedGenerator::new(replies));
        let reviewer = Arc::new(ScriptedReviewer::new(inputs));
        let drafter = AnswerDrafter::new(
            generator.clone(),
            "Rust engineer".to_string(),
            NumberingMode::Lenient,
        );
        let autofiller = Autofiller::new(page.clone(), drafter, reviewer.clone(), profile());
        Harness {
            page,
            generator,
            reviewer,
            autofiller,
        }
    }

    fn job(url: &str) -> JobPosting {
        JobPosting {
            url: url.to_string(),
            ..sample_job("Acme", &[])
        }
    }

    #[tokio::test]
    async fn test_profile_outcomes() {
        let page = FakePage::new()
            .with(r#"input[name*="name" i]"#, &["first_name", "last_name"])
            .with(r#"input[type="email"]"#, &["email"])
            .with(r#"input[type="file"]"#, &["resume"]);
        let h = harness(page, &[], &[]);

        let name = h.autofiller.fill_role(FieldRole::Name).await;
        let email = h.autofiller.fill_role(FieldRole::Email).await;
        let phone = h.autofiller.fill_role(FieldRole::Phone).await;
        let resume = h.autofiller.fill_role(FieldRole::Resume).await;
        let github = h.autofiller.fill_role(FieldRole::GitHub).await;

        assert_eq!(name.outcome, FillOutcome::Ambiguous { candidates: 2 });
        assert_eq!(h.page.value_of("first_name").as_deref(), Some("Ada Lovelace"));
        assert_eq!(h.page.value_of("last_name"), None);
        assert_eq!(email.outcome, FillOutcome::Filled);
        assert!(matches!(phone.outcome, FillOutcome::Skipped { .. }));
        assert_eq!(resume.outcome, FillOutcome::Filled);
        assert_eq!(
            *h.page.uploads.lock().unwrap(),
            vec![(el("resume"), "resume.pdf".to_string())]
        );
        assert!(matches!(github.outcome, FillOutcome::Skipped { .. }));
    }

    #[tokio::test]
    async fn test_missing_and_failing_fields_do_not_abort() {
        let page = FakePage::new()
            .with(r#"input[type="email"]"#, &["email"])
            .failing("email");
        let h = harness(page, &[], &[]);

        assert_eq!(
            h.autofiller.fill_role(FieldRole::Name).await.outcome,
            FillOutcome::NotFound
        );
        assert!(matches!(
            h.autofiller.fill_role(FieldRole::Email).await.outcome,
            FillOutcome::Failed { .. }
        ));
    }

    #[tokio::test]
    async fn test_empty_field_labels_fall_back() {
        let page = FakePage::new()
            .with(FREE_TEXT_SELECTOR, &["q1", "q2", "q3", "filled"])
            .with_attribute("q1", "aria-label", "Why Acme?")
            .with_attribute("q2", "aria-label", "  ")
            .with_attribute("q2", "placeholder", "Notice period")
            .with_value("q3", "   ")
            .with_value("filled", "already here");
        let h = harness(page, &[], &[]);

        let empty = h.autofiller.find_empty_fields().await.unwrap();
        let labels: Vec<&str> = empty.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Why Acme?", "Notice period", DEFAULT_QUESTION_LABEL]
        );
    }

    #[tokio::test]
    async fn test_drafted_answers_reviewed_and_filled() {
        let page = FakePage::new()
            .with(FREE_TEXT_SELECTOR, &["q1", "q2"])
            .with_attribute("q1", "aria-label", "Why Acme?")
            .with_attribute("q2", "placeholder", "Notice period");
        let h = harness(
            page,
            &["1. I love rockets.\n2. Two weeks."],
            &["", "One month"],
        );

        let report = h
            .autofiller
            .fill_application(&job("https://careers.acme.com/apply"))
            .await
            .unwrap();

        assert_eq!(h.generator.prompt_count(), 1);
        assert_eq!(h.page.value_of("q1").as_deref(), Some("I love rockets."));
        assert_eq!(h.page.value_of("q2").as_deref(), Some("One month"));
        assert_eq!(
            h.reviewer.questions.lock().unwrap()[1],
            ("Notice period".to_string(), "Two weeks.".to_string())
        );
        assert_eq!(report.answers.len(), 2);
        assert_eq!(report.platform, Platform::Generic);
        assert!(report.overrides.is_empty());
        assert_eq!(
            *h.page.visited.lock().unwrap(),
            vec!["https://careers.acme.com/apply".to_string()]
        );
    }

    #[tokio::test]
    async fn test_no_empty_fields_means_no_model_call() {
        let h = harness(FakePage::new(), &[], &[]);
        let report = h
            .autofiller
            .fill_application(&job("https://careers.acme.com/apply"))
            .await
            .unwrap();
        assert_eq!(h.generator.prompt_count(), 0);
        assert!(report.answers.is_empty());
    }

    #[tokio::test]
    async fn test_greenhouse_selects_first_real_option() {
        let page = FakePage::new()
            .with("select", &["s1", "s2"])
            .with_children("s1", "option", &["o0", "o1", "o2"])
            .with_children("s2", "option", &["only"]);
        let h = harness(page, &[], &[]);

        let report = h
            .autofiller
            .fill_application(&job("https://boards.greenhouse.io/acme/jobs/1"))
            .await
            .unwrap();

        assert_eq!(report.platform, Platform::Greenhouse);
        assert_eq!(*h.page.selected.lock().unwrap(), vec![(el("s1"), 1)]);
        assert_eq!(report.overrides[0].outcome, FillOutcome::Filled);
        assert!(matches!(
            report.overrides[1].outcome,
            FillOutcome::Skipped { .. }
        ));
    }

    #[tokio::test]
    async fn test_lever_fills_profile_links() {
        let page = FakePage::new().with(r#"input[name*="linkedin" i]"#, &["li"]);
        let h = harness(page, &[], &[]);

        let report = h
            .autofiller
            .fill_application(&job("https://jobs.lever.co/acme/123"))
            .await
            .unwrap();

        assert_eq!(report.platform, Platform::Lever);
        assert_eq!(
            h.page.value_of("li").as_deref(),
            Some("https://linkedin.com/in/ada")
        );
        assert_eq!(report.overrides[0].outcome, FillOutcome::Filled);
        assert!(matches!(
            report.overrides[1].outcome,
            FillOutcome::Skipped { .. }
        ));
    }

    #[test]
    fn test_report_summary_counts_filled() {
        let report = AutofillReport {
            platform: Platform::Generic,
            profile: vec![
                FieldReport {
                    field: "name".to_string(),
                    outcome: FillOutcome::Filled,
                },
                FieldReport {
                    field: "phone".to_string(),
                    outcome: FillOutcome::NotFound,
                },
            ],
            answers: vec![FieldReport {
                field: "Why?".to_string(),
                outcome: FillOutcome::Ambiguous { candidates: 2 },
            }],
            overrides: Vec::new(),
        };
        assert_eq!(report.filled_count(), 2);
        let text = report.to_string();
        assert!(text.contains("not found"));
        assert!(text.ends_with("2 field(s) filled"));
    }
}
