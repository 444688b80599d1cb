use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::input::InputFormat;
use crate::output::OutputFormat;

/// Drafts job-application answers with a language model and pre-fills
/// application forms in a browser. Never submits anything.
#[derive(Debug, Parser)]
#[command(name = "autoapply", version, about)]
pub struct Cli {
    /// Debug-level logging for this crate.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Draft answers for every job in the input file and write them out.
    Draft(DraftArgs),
    /// Open each job in a browser and autofill the application form.
    Apply(ApplyArgs),
    /// Run the numbered-answer parser on a saved model reply.
    Parse(ParseArgs),
    /// Send a test prompt to the model and print the reply.
    Check,
}

/// Options shared by every command that reads a job list.
#[derive(Debug, Args)]
pub struct JobsArgs {
    /// Job list (.csv or .json).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Overrides the format implied by the input file extension.
    #[arg(long, value_enum)]
    pub input_format: Option<InputFormat>,

    /// Reject model replies whose numbering is out of sequence or incomplete.
    #[arg(long)]
    pub strict: bool,

    /// Resume summary file (.txt, .md or .pdf). Defaults to RESUME_SUMMARY_PATH.
    #[arg(long)]
    pub resume_summary: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DraftArgs {
    #[command(flatten)]
    pub jobs: JobsArgs,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Output file (CSV/JSON) or directory (PDF).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also draft a cover letter for each job.
    #[arg(long)]
    pub cover_letter: bool,
}

#[derive(Debug, Args)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub jobs: JobsArgs,

    /// Application log CSV. Defaults to APPLICATION_LOG.
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Run the browser without a window.
    #[arg(long)]
    pub headless: bool,
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// File containing the raw model reply.
    pub file: PathBuf,

    /// Number of answers the reply should contain.
    #[arg(long)]
    pub expect: Option<usize>,

    #[arg(long)]
    pub strict: bool,
}
