//! Numbered answer parsing.
//!
//! The model is asked to answer questions as `1. …`, `2. …`. Its reply is
//! loosely formatted: answers wrap across lines, blank lines appear between
//! them, and a preamble ("Here are your answers:") is common.
//!
//! Two rules are provided:
//!
//! * **Lenient** — a line (after trimming) is a marker when it starts with a
//!   digit and contains a `.`; the number is whatever precedes the first dot.
//!   Never fails. Known flaw: `2.5 is my experience rating` at the start of a
//!   line is taken as the marker for answer 2 (index 1). Kept as-is because
//!   output produced by existing runs depends on it.
//! * **Strict** — the marker must be the first token, `<digits>.` followed by
//!   whitespace or end of line, numbers must run 1, 2, 3, … and every answer
//!   must have text. Optionally the answer count is checked against the
//!   number of questions asked.

use thiserror::Error;

use crate::models::AnswerSet;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberingError {
    #[error("expected answer {expected} but found {found} on line {line}")]
    OutOfSequence {
        expected: usize,
        found: usize,
        line: usize,
    },

    #[error("answer {number} has no text")]
    EmptyAnswer { number: usize },

    #[error("expected {expected} answers, parsed {parsed}")]
    CountMismatch { expected: usize, parsed: usize },
}

/// Which marker rule to apply to a model response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumberingMode {
    #[default]
    Lenient,
    Strict,
}

impl NumberingMode {
    pub fn from_strict_flag(strict: bool) -> Self {
        if strict {
            NumberingMode::Strict
        } else {
            NumberingMode::Lenient
        }
    }

    /// Parses `text` under this mode. Lenient parsing never fails.
    pub fn parse(self, text: &str, expected: Option<usize>) -> Result<AnswerSet, NumberingError> {
        match self {
            NumberingMode::Lenient => Ok(parse_lenient(text)),
            NumberingMode::Strict => parse_strict(text, expected),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient rule
// ────────────────────────────────────────────────────────────────────────────

/// Parses numbered answers with the lenient marker rule.
///
/// Lines are scanned in order. On a marker the buffered answer is stored under
/// the previous index and a new buffer starts from the text after the first
/// dot. Other non-blank lines are appended to the buffer with a single space.
/// Text before the first marker is dropped. A repeated number replaces the
/// earlier answer.
pub fn parse_lenient(text: &str) -> AnswerSet {
    let mut answers = AnswerSet::new();
    let mut current: Option<usize> = None;
    let mut buffer = String::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((index, rest)) = lenient_marker(line) {
            flush(&mut answers, current, &mut buffer);
            current = Some(index);
            append(&mut buffer, rest);
        } else if current.is_some() {
            append(&mut buffer, line);
        }
    }

    flush(&mut answers, current, &mut buffer);
    answers
}

/// Returns `(zero_based_index, text_after_first_dot)` when `line` is a lenient marker.
/// A prefix that is not a positive integer (`3a.`, `0.`) is not a marker.
fn lenient_marker(line: &str) -> Option<(usize, &str)> {
    if !line.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let (number, rest) = line.split_once('.')?;
    let number: usize = number.trim().parse().ok()?;
    Some((number.checked_sub(1)?, rest))
}

// ────────────────────────────────────────────────────────────────────────────
// Strict rule
// ────────────────────────────────────────────────────────────────────────────

/// Parses numbered answers with the strict marker rule.
///
/// When `expected` is given, the number of answers must match it.
pub fn parse_strict(text: &str, expected: Option<usize>) -> Result<AnswerSet, NumberingError> {
    let mut answers = AnswerSet::new();
    let mut current: Option<usize> = None;
    let mut buffer = String::new();

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        match strict_marker(line) {
            Some((number, rest)) => {
                let next = current.map_or(1, |i| i + 2);
                if number != next {
                    return Err(NumberingError::OutOfSequence {
                        expected: next,
                        found: number,
                        line: line_no + 1,
                    });
                }
                close_strict(&mut answers, current, &mut buffer)?;
                current = Some(number - 1);
                append(&mut buffer, rest);
            }
            None if current.is_some() => append(&mut buffer, line),
            None => {}
        }
    }

    close_strict(&mut answers, current, &mut buffer)?;

    if let Some(expected) = expected {
        if answers.len() != expected {
            return Err(NumberingError::CountMismatch {
                expected,
                parsed: answers.len(),
            });
        }
    }

    Ok(answers)
}

/// `<digits>.` followed by whitespace or end of line. Returns the 1-based number.
fn strict_marker(line: &str) -> Option<(usize, &str)> {
    let digits_end = line
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(line.len());
    if digits_end == 0 {
        return None;
    }
    let rest = line[digits_end..].strip_prefix('.')?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let number: usize = line[..digits_end].parse().ok()?;
    if number == 0 {
        return None;
    }
    Some((number, rest))
}

fn close_strict(
    answers: &mut AnswerSet,
    current: Option<usize>,
    buffer: &mut String,
) -> Result<(), NumberingError> {
    if let Some(index) = current {
        if buffer.is_empty() {
            return Err(NumberingError::EmptyAnswer { number: index + 1 });
        }
    }
    flush(answers, current, buffer);
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Buffer helpers
// ────────────────────────────────────────────────────────────────────────────

fn append(buffer: &mut String, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if !buffer.is_empty() {
        buffer.push(' ');
    }
    buffer.push_str(text);
}

fn flush(answers: &mut AnswerSet, current: Option<usize>, buffer: &mut String) {
    if let Some(index) = current {
        if !buffer.is_empty() {
            answers.insert(index, std::mem::take(buffer));
        }
    }
    buffer.clear();
}
