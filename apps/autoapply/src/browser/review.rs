//! Operator interaction: accepting or editing drafted answers, and the pause
//! before moving on to the next job.

use std::io::{self, BufRead, Write};

use async_trait::async_trait;

const EDIT_PROMPT: &str = "Edit answer or press Enter to use as-is: ";

#[async_trait]
pub trait Reviewer: Send + Sync {
    /// Shows a drafted answer and returns the text to fill in.
    async fn review(&self, question: &str, suggestion: &str) -> io::Result<String>;

    /// Blocks until the operator is done with the current page.
    async fn pause(&self, message: &str) -> io::Result<()>;
}

/// Reviews on the terminal. Reads run on the blocking pool so the runtime stays free.
pub struct ConsoleReviewer;

#[async_trait]
impl Reviewer for ConsoleReviewer {
    async fn review(&self, question: &str, suggestion: &str) -> io::Result<String> {
        println!("\nQuestion: {question}\nSuggested answer:\n{suggestion}\n");
        let input = read_line(EDIT_PROMPT).await?;
        Ok(resolve_edit(suggestion, &input))
    }

    async fn pause(&self, message: &str) -> io::Result<()> {
        read_line(message).await.map(|_| ())
    }
}

/// Blank input keeps the suggestion; anything else replaces it.
pub fn resolve_edit(suggestion: &str, input: &str) -> String {
    let input = input.trim();
    if input.is_empty() {
        suggestion.to_string()
    } else {
        input.to_string()
    }
}

async fn read_line(prompt: &str) -> io::Result<String> {
    let prompt = prompt.to_string();
    tokio::task::spawn_blocking(move || {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    })
    .await
    .map_err(io::Error::other)?
}
