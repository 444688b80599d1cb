mod browser;
mod cli;
mod config;
mod drafting;
mod errors;
mod input;
mod llm_client;
mod models;
mod output;
mod parser;
mod pipeline;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::browser::autofill::Autofiller;
use crate::browser::review::ConsoleReviewer;
use crate::browser::webdriver::WebDriverSession;
use crate::browser::BrowserDriver;
use crate::cli::{ApplyArgs, Cli, Command, DraftArgs, JobsArgs, ParseArgs};
use crate::config::Config;
use crate::drafting::resume::load_resume_summary;
use crate::drafting::AnswerDrafter;
use crate::llm_client::prompts::CONNECTIVITY_PROMPT;
use crate::llm_client::{GeminiClient, TextGenerator};
use crate::output::app_log::ApplicationLog;
use crate::parser::{reconcile, NumberingMode};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();

    // Logs go to stderr; stdout is for prompts and results.
    let filter = if cli.verbose {
        EnvFilter::new(format!("{}=debug", env!("CARGO_PKG_NAME")))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", env!("CARGO_PKG_NAME"))))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Draft(args) => draft(&config, args).await,
        Command::Apply(args) => apply(&config, args).await,
        Command::Parse(args) => parse(args),
        Command::Check => check(&config).await,
    }
}

/// Builds the model client. Fails when `GEMINI_API_KEY` is missing.
fn generator(config: &Config) -> Result<Arc<GeminiClient>> {
    let llm = config
        .llm()
        .context("GEMINI_API_KEY must be set to call the language model")?;
    info!("LLM client initialized (model: {})", llm.model);
    Ok(Arc::new(GeminiClient::new(&llm)?))
}

fn drafter(config: &Config, jobs: &JobsArgs) -> Result<AnswerDrafter> {
    let generator = generator(config)?;
    let summary_path = jobs
        .resume_summary
        .as_deref()
        .or(config.resume_summary_path.as_deref());
    let resume_summary = load_resume_summary(summary_path)?;
    Ok(AnswerDrafter::new(
        generator,
        resume_summary,
        NumberingMode::from_strict_flag(jobs.strict),
    ))
}

async fn draft(config: &Config, args: DraftArgs) -> Result<()> {
    let drafter = drafter(config, &args.jobs)?;
    let jobs = input::load_jobs(&args.jobs.input, args.jobs.input_format)
        .with_context(|| format!("failed to load jobs from {}", args.jobs.input.display()))?;
    info!("Loaded {} job(s)", jobs.len());

    let records = pipeline::draft_batch(&drafter, jobs, args.cover_letter).await?;

    let target = args
        .output
        .unwrap_or_else(|| args.format.default_target(&config.output_dir));
    let written = output::write_records(&records, args.format, &target)?;
    for path in written {
        println!("Saved {}", path.display());
    }
    Ok(())
}

async fn apply(config: &Config, args: ApplyArgs) -> Result<()> {
    let drafter = drafter(config, &args.jobs)?;
    let jobs = input::load_jobs(&args.jobs.input, args.jobs.input_format)
        .with_context(|| format!("failed to load jobs from {}", args.jobs.input.display()))?;
    info!("Loaded {} job(s)", jobs.len());

    let log_path = args.log.unwrap_or_else(|| config.application_log.clone());
    let log = ApplicationLog::open(&log_path)?;

    let driver = Arc::new(
        WebDriverSession::connect(&config.webdriver_url, args.headless)
            .await
            .with_context(|| format!("failed to start a browser via {}", config.webdriver_url))?,
    );
    let reviewer = Arc::new(ConsoleReviewer);
    let autofiller = Autofiller::new(
        driver.clone(),
        drafter,
        reviewer.clone(),
        config.profile.clone(),
    );

    let result = pipeline::apply_all(&autofiller, reviewer.as_ref(), &log, &jobs).await;
    if let Err(e) = driver.close().await {
        warn!("Failed to close browser session: {}", e);
    }

    let summary = result?;
    println!(
        "\nPrepared {} application(s), skipped {}. Logged to {}",
        summary.prepared,
        summary.skipped,
        log.path().display()
    );
    Ok(())
}

fn parse(args: ParseArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let text = llm_client::strip_code_fences(&text);

    let answers = NumberingMode::from_strict_flag(args.strict).parse(text, args.expect)?;
    if let Some(expected) = args.expect {
        let rec = reconcile(&answers, expected);
        if !rec.is_complete() {
            warn!(
                "Expected {} answers: missing {:?}, unexpected {:?}",
                rec.expected, rec.missing, rec.unexpected
            );
        }
    }

    println!("{}", serde_json::to_string_pretty(&answers)?);
    Ok(())
}

async fn check(config: &Config) -> Result<()> {
    let client = generator(config)?;
    let reply = client
        .generate(CONNECTIVITY_PROMPT)
        .await
        .context("connectivity check failed")?;
    println!("{}", reply.trim());
    Ok(())
}
