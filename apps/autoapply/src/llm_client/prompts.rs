// Shared prompt fragments.
// Each module that calls the model defines its own prompts.rs alongside it;
// this file holds the pieces used by more than one of them.

/// Resume summary used when no summary file is configured.
pub const DEFAULT_RESUME_SUMMARY: &str = "\
- Software engineer with 3 years experience in Python, React, and cloud systems.\n\
- Built scalable APIs, automated workflows, and improved reliability at scale.";

/// Appended to every prompt whose reply goes through the numbered parser.
pub const NUMBERED_FORMAT_INSTRUCTION: &str = "\
Return them in numbered format (1., 2., 3., etc), one answer per number, \
in the same order as the questions. Do not add any text before the first answer.";

/// Prompt used by the connectivity check.
pub const CONNECTIVITY_PROMPT: &str = "Say hello!";
