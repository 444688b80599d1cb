//! Browser Autofill — drives a job-application page through a [`BrowserDriver`].
//!
//! The driver is a thin element-level surface. Everything page-specific
//! (which fields to fill, platform quirks, the review loop) lives in
//! [`autofill`] on top of it, so the heuristics run against an in-memory fake
//! in tests and against a real WebDriver server at runtime.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

pub mod autofill;
pub mod fields;
pub mod platform;
pub mod review;
pub mod webdriver;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("WebDriver HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebDriver error '{error}': {message}")]
    WebDriver { error: String, message: String },

    #[error("Unexpected WebDriver response: {0}")]
    Protocol(String),

    #[error("cannot upload {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Opaque handle to an element on the current page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementId(pub String);

impl ElementId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Element-level browser operations needed by the autofill flow.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    async fn goto(&self, url: &str) -> Result<(), BrowserError>;

    /// All elements matching a CSS selector, in document order. No match is `Ok(vec![])`.
    async fn find_all(&self, css: &str) -> Result<Vec<ElementId>, BrowserError>;

    async fn find_all_within(
        &self,
        parent: &ElementId,
        css: &str,
    ) -> Result<Vec<ElementId>, BrowserError>;

    /// Replaces the element's current value with `text`.
    async fn fill(&self, element: &ElementId, text: &str) -> Result<(), BrowserError>;

    /// Attaches a local file to a file input.
    async fn upload(&self, element: &ElementId, path: &Path) -> Result<(), BrowserError>;

    /// Current value of an input or textarea.
    async fn value(&self, element: &ElementId) -> Result<String, BrowserError>;

    async fn attribute(
        &self,
        element: &ElementId,
        name: &str,
    ) -> Result<Option<String>, BrowserError>;

    /// Selects the `index`-th `<option>` of a `<select>`.
    async fn select_index(&self, select: &ElementId, index: usize) -> Result<(), BrowserError>;

    async fn close(&self) -> Result<(), BrowserError>;
}
