use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use coordination::{
    CitationTracker, DebateOrchestrator, DebaterBackend, FileTranscriptStore, OrchestratorError,
    Position,
};
use debate_agents::{render_summary, run_debate, AppConfig, OpenAiDebater, ScriptedDebater};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Run a structured debate between two language models.
#[derive(Debug, Parser)]
#[command(name = "debate-agents", version)]
struct Args {
    /// Motion to debate.
    #[arg(long)]
    topic: String,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum words per statement.
    #[arg(long)]
    word_limit: Option<u32>,

    /// Preparation deadline in seconds.
    #[arg(long)]
    preparation_time: Option<u64>,

    /// Directory for final and partial transcripts.
    #[arg(long)]
    transcript_dir: Option<PathBuf>,

    /// Use scripted offline debaters instead of HTTP endpoints.
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(n) = self.word_limit {
            config.debate.word_limit = Some(n);
        }
        if let Some(secs) = self.preparation_time {
            config.debate.preparation_time = Some(secs);
        }
        if let Some(ref dir) = self.transcript_dir {
            config.transcript_dir = dir.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let mut config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply(&mut config);

    let (affirmative, negative): (Arc<dyn DebaterBackend>, Arc<dyn DebaterBackend>) = if args.dry_run {
        (
            Arc::new(ScriptedDebater::new("scripted-affirmative")),
            Arc::new(ScriptedDebater::new("scripted-negative")),
        )
    } else {
        (
            Arc::new(
                OpenAiDebater::new(config.affirmative.clone(), &args.topic, Position::Affirmative)
                    .context("Failed to build affirmative debater")?,
            ),
            Arc::new(
                OpenAiDebater::new(config.negative.clone(), &args.topic, Position::Negative)
                    .context("Failed to build negative debater")?,
            ),
        )
    };

    info!(
        affirmative = %affirmative.model_name(),
        negative = %negative.model_name(),
        transcripts = %config.transcript_dir.display(),
        dry_run = args.dry_run,
        "Debate runner starting"
    );

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; cutting preparation short");
            ctrl_c.cancel();
        }
    });

    let store = Arc::new(FileTranscriptStore::new(config.transcript_dir.clone()));
    let orchestrator = DebateOrchestrator::new(affirmative, negative, store).with_cancel(cancel);
    let mut tracker = CitationTracker::new();

    match run_debate(&orchestrator, &args.topic, config.debate.clone(), &mut tracker).await {
        Ok(outcome) => {
            println!("{}", render_summary(&outcome.debate));
            if !tracker.is_empty() {
                println!("\n== Sources ==\n{}", tracker.bibliography());
            }
            if let Some(path) = outcome.transcript {
                println!("\nTranscript: {}", path.display());
            }
            Ok(())
        }
        Err(e) => {
            if let Some(debate) = e.snapshot() {
                println!("{}", render_summary(debate));
            }
            match e.saved_to() {
                Some(path) => eprintln!("Partial transcript: {}", path.display()),
                None if matches!(e, OrchestratorError::ModelGeneration { .. }) => {
                    eprintln!("Partial transcript could not be saved")
                }
                None => {}
            }
            Err(e).context("Debate failed")
        }
    }
}
