use std::path::Path;

use anyhow::{anyhow, Context};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::DEFAULT_RESUME_SUMMARY;

/// Loads the resume summary sent with every prompt.
///
/// `.pdf` files go through text extraction; anything else is read as UTF-8.
/// No path, or a file with no usable text, falls back to the built-in summary.
pub fn load_resume_summary(path: Option<&Path>) -> Result<String, AppError> {
    let Some(path) = path else {
        return Ok(DEFAULT_RESUME_SUMMARY.to_string());
    };

    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    let text = if is_pdf {
        pdf_extract::extract_text(path)
            .map_err(|e| anyhow!("failed to extract text from {}: {e}", path.display()))?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read resume summary {}", path.display()))?
    };

    let summary = normalize_summary(&text);
    if summary.is_empty() {
        warn!(
            "Resume summary {} has no text; using the default summary",
            path.display()
        );
        return Ok(DEFAULT_RESUME_SUMMARY.to_string());
    }

    info!(
        "Loaded resume summary from {} ({} chars)",
        path.display(),
        summary.len()
    );
    Ok(summary)
}

/// Trims every line and collapses runs of blank lines (PDF extraction produces many).
fn normalize_summary(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() && out.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        out.push(line);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_no_path_uses_default() {
        assert_eq!(load_resume_summary(None).unwrap(), DEFAULT_RESUME_SUMMARY);
    }

    #[test]
    fn test_text_file_is_normalized() {
        let mut file = tempfile::Builder::new().suffix(".md").tempfile().unwrap();
        write!(file, "\n\n  Rust engineer  \n\n\n\nLoves parsers\n\n").unwrap();
        let summary = load_resume_summary(Some(file.path())).unwrap();
        assert_eq!(summary, "Rust engineer\n\nLoves parsers");
    }

    #[test]
    fn test_blank_file_falls_back_to_default() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        assert_eq!(
            load_resume_summary(Some(file.path())).unwrap(),
            DEFAULT_RESUME_SUMMARY
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_resume_summary(Some(Path::new("/nonexistent/summary.txt")));
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
