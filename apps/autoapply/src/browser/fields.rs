use std::fmt;
use std::path::PathBuf;

use crate::config::ApplicantProfile;

/// Semantic role of a profile field on an application form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    Name,
    Email,
    Phone,
    Resume,
    LinkedIn,
    GitHub,
}

/// Roles filled on every page. LinkedIn and GitHub are platform overrides.
pub const PROFILE_ROLES: [FieldRole; 4] = [
    FieldRole::Name,
    FieldRole::Email,
    FieldRole::Phone,
    FieldRole::Resume,
];

/// Value to put into a field: typed text or a file to attach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File(PathBuf),
}

impl FieldRole {
    /// Ordered CSS locators; the first one with any match wins.
    pub fn locators(self) -> &'static [&'static str] {
        match self {
            FieldRole::Name => &[
                r#"input[autocomplete="name"]"#,
                r#"input[name*="full_name" i]"#,
                r#"input[name*="name" i]"#,
            ],
            FieldRole::Email => &[r#"input[type="email"]"#, r#"input[name*="email" i]"#],
            FieldRole::Phone => &[r#"input[type="tel"]"#, r#"input[name*="phone" i]"#],
            FieldRole::Resume => &[
                r#"input[type="file"][name*="resume" i]"#,
                r#"input[type="file"]"#,
            ],
            FieldRole::LinkedIn => &[r#"input[name*="linkedin" i]"#],
            FieldRole::GitHub => &[r#"input[name*="github" i]"#],
        }
    }

    /// Environment variable that supplies this role's value.
    pub fn env_var(self) -> &'static str {
        match self {
            FieldRole::Name => "APPLICANT_NAME",
            FieldRole::Email => "APPLICANT_EMAIL",
            FieldRole::Phone => "APPLICANT_PHONE",
            FieldRole::Resume => "RESUME_PATH",
            FieldRole::LinkedIn => "LINKEDIN_URL",
            FieldRole::GitHub => "GITHUB_URL",
        }
    }

    pub fn profile_value(self, profile: &ApplicantProfile) -> Option<FieldValue> {
        let text = |v: &Option<String>| v.clone().map(FieldValue::Text);
        match self {
            FieldRole::Name => text(&profile.name),
            FieldRole::Email => text(&profile.email),
            FieldRole::Phone => text(&profile.phone),
            FieldRole::Resume => profile.resume_path.clone().map(FieldValue::File),
            FieldRole::LinkedIn => text(&profile.linkedin_url),
            FieldRole::GitHub => text(&profile.github_url),
        }
    }
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldRole::Name => "name",
            FieldRole::Email => "email",
            FieldRole::Phone => "phone",
            FieldRole::Resume => "resume",
            FieldRole::LinkedIn => "LinkedIn",
            FieldRole::GitHub => "GitHub",
        };
        f.write_str(name)
    }
}

/// Result of trying to fill one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillOutcome {
    Filled,
    NotFound,
    /// Several elements matched; the first one was filled.
    Ambiguous { candidates: usize },
    Skipped { reason: String },
    Failed { reason: String },
}

impl FillOutcome {
    pub fn is_filled(&self) -> bool {
        matches!(self, FillOutcome::Filled | FillOutcome::Ambiguous { .. })
    }
}

impl fmt::Display for FillOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillOutcome::Filled => f.write_str("filled"),
            FillOutcome::NotFound => f.write_str("not found"),
            FillOutcome::Ambiguous { candidates } => {
                write!(f, "filled first of {candidates} matches")
            }
            FillOutcome::Skipped { reason } => write!(f, "skipped ({reason})"),
            FillOutcome::Failed { reason } => write!(f, "failed ({reason})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_has_locators() {
        for role in PROFILE_ROLES
            .iter()
            .chain([FieldRole::LinkedIn, FieldRole::GitHub].iter())
        {
            assert!(!role.locators().is_empty(), "{role} has no locators");
        }
    }

    #[test]
    fn test_generic_locators_come_last() {
        assert_eq!(
            FieldRole::Name.locators().last(),
            Some(&r#"input[name*="name" i]"#)
        );
        assert_eq!(
            FieldRole::Resume.locators().last(),
            Some(&r#"input[type="file"]"#)
        );
    }

    #[test]
    fn test_profile_value_maps_fields() {
        let profile = ApplicantProfile {
            email: Some("a@b.c".to_string()),
            resume_path: Some(PathBuf::from("cv.pdf")),
            ..Default::default()
        };
        assert_eq!(
            FieldRole::Email.profile_value(&profile),
            Some(FieldValue::Text("a@b.c".to_string()))
        );
        assert_eq!(
            FieldRole::Resume.profile_value(&profile),
            Some(FieldValue::File(PathBuf::from("cv.pdf")))
        );
        assert_eq!(FieldRole::Phone.profile_value(&profile), None);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(
            FillOutcome::Ambiguous { candidates: 3 }.to_string(),
            "filled first of 3 matches"
        );
        assert!(FillOutcome::Ambiguous { candidates: 2 }.is_filled());
        assert!(!FillOutcome::NotFound.is_filled());
    }
}
