use thiserror::Error;

use crate::browser::BrowserError;
use crate::config::ConfigError;
use crate::input::InputError;
use crate::llm_client::LlmError;
use crate::output::OutputError;
use crate::parser::NumberingError;

/// Application-level error type.
/// Every module seam has its own error enum; this aggregates them so pipeline
/// code can use `?` across seams and `main` can report a single chain.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Answer numbering error: {0}")]
    Numbering(#[from] NumberingError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
