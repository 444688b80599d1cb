use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_APPLICATION_LOG: &str = "applications_log.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required environment variable '{0}' is not set")]
    MissingVar(String),
}

/// Applicant details used to fill profile fields on application forms.
/// Every field is optional; a missing value means the matching form field is skipped.
#[derive(Debug, Clone, Default)]
pub struct ApplicantProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub resume_path: Option<PathBuf>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
}

/// Settings for the text-generation service.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
}

/// Application configuration loaded from environment variables.
///
/// The API key is not resolved here: commands that talk to the model call
/// [`Config::llm`], which fails hard when `GEMINI_API_KEY` is absent.
#[derive(Debug, Clone)]
pub struct Config {
    pub profile: ApplicantProfile,
    pub resume_summary_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub application_log: PathBuf,
    pub webdriver_url: String,
    api_key: Option<String>,
    model: String,
    api_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Config {
            profile: ApplicantProfile {
                name: get("APPLICANT_NAME"),
                email: get("APPLICANT_EMAIL"),
                phone: get("APPLICANT_PHONE"),
                resume_path: get("RESUME_PATH").map(PathBuf::from),
                linkedin_url: get("LINKEDIN_URL"),
                github_url: get("GITHUB_URL"),
            },
            resume_summary_path: get("RESUME_SUMMARY_PATH").map(PathBuf::from),
            output_dir: get("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            application_log: get("APPLICATION_LOG")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_APPLICATION_LOG)),
            webdriver_url: get("WEBDRIVER_URL")
                .unwrap_or_else(|| DEFAULT_WEBDRIVER_URL.to_string()),
            api_key: get("GEMINI_API_KEY"),
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_url: get("GEMINI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }

    /// Returns the generation-service settings, or an error when the API key is missing.
    pub fn llm(&self) -> Result<LlmConfig, ConfigError> {
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| ConfigError::MissingVar("GEMINI_API_KEY".to_string()))?;

        Ok(LlmConfig {
            api_key,
            model: self.model.clone(),
            api_url: self.api_url.trim_end_matches('/').to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_api_key_is_a_hard_error() {
        let config = config_from(&[]);
        let err = config.llm().unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(ref k) if k == "GEMINI_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = config_from(&[("GEMINI_API_KEY", "   ")]);
        assert!(config.llm().is_err());
    }

    #[test]
    fn test_defaults_applied() {
        let config = config_from(&[("GEMINI_API_KEY", "k")]);
        let llm = config.llm().unwrap();
        assert_eq!(llm.model, DEFAULT_MODEL);
        assert_eq!(llm.api_url, DEFAULT_API_URL);
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.application_log, PathBuf::from("applications_log.csv"));
        assert_eq!(config.webdriver_url, DEFAULT_WEBDRIVER_URL);
        assert!(config.profile.name.is_none());
    }

    #[test]
    fn test_profile_and_overrides_loaded() {
        let config = config_from(&[
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_MODEL", "gemini-1.5-pro"),
            ("GEMINI_API_URL", "http://127.0.0.1:9000/"),
            ("APPLICANT_NAME", "Ada Lovelace"),
            ("APPLICANT_EMAIL", "ada@example.com"),
            ("RESUME_PATH", "/tmp/resume.pdf"),
            ("LINKEDIN_URL", "https://linkedin.com/in/ada"),
        ]);
        let llm = config.llm().unwrap();
        assert_eq!(llm.model, "gemini-1.5-pro");
        assert_eq!(llm.api_url, "http://127.0.0.1:9000");
        assert_eq!(config.profile.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(
            config.profile.resume_path,
            Some(PathBuf::from("/tmp/resume.pdf"))
        );
        assert!(config.profile.github_url.is_none());
    }
}
