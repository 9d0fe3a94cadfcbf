//! services/summarizer/src/bin/summarize.rs

use clap::{ArgGroup, Parser, Subcommand};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;
use summarizer_core::{
    AccessMode, DocumentId, InputSelection, RequestOutcome, SummaryRequestConfig,
};
use summarizer_lib::{
    adapters::{HttpSummaryAdapter, StaticCredentialSource},
    config::Config,
    error::ClientError,
    workflow::{DocumentCollectionManager, ProgressEstimator, SummarizationOrchestrator},
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line driver for the summarization client.
#[derive(Parser, Debug)]
#[command(name = "summarize", about = "Summarize documents through the gateway")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a file or a piece of text.
    #[command(group(ArgGroup::new("input").required(true).args(["file", "text"])))]
    Run {
        /// Document to upload.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Text to summarize instead of a file.
        #[arg(long)]
        text: Option<String>,

        /// Target summary length in words (50-500).
        #[arg(long)]
        word_count: Option<u32>,

        /// Maximum summary length in pages, for long inputs.
        #[arg(long)]
        page_limit: Option<NonZeroU32>,

        /// Use the anonymous endpoint; the summary is not saved.
        #[arg(long, default_value = "false")]
        public: bool,
    },
    /// List saved summaries, newest first.
    List,
    /// Delete a saved summary.
    Delete { id: DocumentId },
}

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let args = Args::parse();
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Gateway at {}", config.api_base_url);

    // --- 2. Initialize Adapters ---
    let http = Arc::new(HttpSummaryAdapter::from_config(&config)?);
    let credentials = Arc::new(StaticCredentialSource::new(config.api_token.clone()));
    let documents = Arc::new(DocumentCollectionManager::new(http.clone(), credentials.clone()));

    // --- 3. Dispatch ---
    match args.command {
        Command::Run {
            file,
            text,
            word_count,
            page_limit,
            public,
        } => {
            let mut selection = InputSelection::default();
            if let Some(path) = file {
                let contents = tokio::fs::read(&path).await?;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "document.pdf".to_string());
                selection.select_file(contents, file_name);
            } else if let Some(text) = text {
                selection.set_text(text);
            }
            let request_config = SummaryRequestConfig::new(
                word_count.unwrap_or(config.default_word_count),
                page_limit,
            )?;
            if page_limit.is_some() && !selection.shows_page_limit() {
                warn!("Page limit ignored: input is short enough to use the word count.");
            }

            let access_mode = if public || config.api_token.is_none() {
                AccessMode::Public
            } else {
                AccessMode::Authenticated
            };
            let orchestrator = Arc::new(
                SummarizationOrchestrator::new(
                    http.clone(),
                    credentials.clone(),
                    &config.api_base_url,
                    access_mode,
                    ProgressEstimator::new(config.progress_tick),
                )?
                .with_listener(documents.clone()),
            );
            run(orchestrator, selection, request_config).await?;
        }
        Command::List => {
            let collection = documents.fetch().await;
            if collection.is_empty() {
                println!("You have no saved documents yet.");
            }
            for doc in &collection {
                println!(
                    "[{}] {} ({})\n{}\n",
                    doc.id,
                    doc.filename,
                    doc.created_at.format("%Y-%m-%d"),
                    doc.summary_text
                );
            }
        }
        Command::Delete { id } => {
            documents.fetch().await;
            documents.remove(id).await?;
            println!("Deleted document {}.", id);
        }
    }

    Ok(())
}

/// Submits one attempt, logging progress and cancelling on Ctrl-C.
async fn run(
    orchestrator: Arc<SummarizationOrchestrator>,
    selection: InputSelection,
    config: SummaryRequestConfig,
) -> Result<(), ClientError> {
    let mut updates = orchestrator.subscribe();
    let mut submit = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.submit(&selection, config).await })
    };

    let mut last_logged = 0u32;
    let mut watching = true;
    let mut interrupted = false;
    let result = loop {
        tokio::select! {
            result = &mut submit => break result,
            changed = updates.changed(), if watching => {
                if changed.is_err() {
                    watching = false;
                    continue;
                }
                let progress = updates.borrow_and_update().progress;
                if let Some(progress) = progress {
                    let percent = progress as u32;
                    if percent >= last_logged + 10 {
                        info!("Progress: {}%", percent);
                        last_logged = percent;
                    }
                }
            }
            _ = tokio::signal::ctrl_c(), if !interrupted => {
                interrupted = true;
                orchestrator.cancel();
            }
        }
    };

    let outcome = result.map_err(|e| ClientError::Internal(e.to_string()))??;
    if outcome.is_alarming() {
        eprintln!("{}", outcome.message());
    } else {
        println!("{}", outcome.message());
    }
    if let RequestOutcome::Success {
        notice: Some(notice),
        ..
    } = &outcome
    {
        eprintln!("{}", notice);
    }
    Ok(())
}
