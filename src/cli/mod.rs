//! CLI argument parsing and command dispatch

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use quiz_bots_client::{config::DEFAULT_BASE_URL, ClientConfig, HttpQuizClient};
use quiz_bots_core::{
    ensure_quiz_started, BotEvent, BotEventKind, BotOutcome, OrchestratorBuilder, QuizApi,
    QuizError, QuizStatus, RunConfig, StopHandle,
};
use quiz_bots_report::{render_summary, JsonExporter};
use quiz_bots_samplers::sampler_for;

/// Quiz bots - simulate many participants answering a live quiz
#[derive(Parser, Debug)]
#[command(name = "quiz-bots")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the quiz service
    #[arg(short, long, env = "QUIZ_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10, global = true)]
    pub timeout_secs: u64,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch a bot swarm and wait for every bot to finish
    Run(RunArgs),
    /// Print the current quiz status
    Status,
    /// Start the loaded quiz unless it is already running
    Start,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Number of bots (clamped to 1-200)
    #[arg(short = 'n', long)]
    pub bots: Option<usize>,

    /// Maximum thinking time per question in seconds (clamped to 0-10)
    #[arg(short = 'd', long)]
    pub max_delay: Option<f64>,

    /// Start the quiz before launching bots
    #[arg(long)]
    pub auto_start: bool,

    /// Seed for reproducible answers and delays
    #[arg(long)]
    pub seed: Option<u64>,

    /// Display name prefix for bots
    #[arg(long)]
    pub name_prefix: Option<String>,

    /// JSON run configuration; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the run report as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Write only the run summary as JSON to this path
    #[arg(long)]
    pub summary_json: Option<PathBuf>,
}

impl RunArgs {
    /// Run configuration from the optional file plus flag overrides
    pub fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => load_run_config(path)?,
            None => RunConfig::default(),
        };

        if let Some(bots) = self.bots {
            config.total_bots = bots;
        }
        if let Some(delay) = self.max_delay {
            config.max_delay_secs = delay;
        }
        if self.auto_start {
            config.auto_start = true;
        }
        if let Some(prefix) = &self.name_prefix {
            config.name_prefix = prefix.clone();
        }

        Ok(config)
    }
}

fn load_run_config(path: &Path) -> Result<RunConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

/// Running tally of bot lifecycle events
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct LiveCounts {
    running: usize,
    completed: usize,
    submitted: usize,
    stopped: usize,
    failed: usize,
}

impl LiveCounts {
    fn apply(&mut self, event: &BotEvent) {
        match &event.kind {
            BotEventKind::Launched => self.running += 1,
            BotEventKind::Transition(_) => {}
            BotEventKind::Finished(outcome) => {
                self.running = self.running.saturating_sub(1);
                self.completed += 1;
                match outcome {
                    BotOutcome::Completed { .. } => self.submitted += 1,
                    BotOutcome::Stopped { .. } => self.stopped += 1,
                    BotOutcome::Failed { .. } => self.failed += 1,
                }
            }
        }
    }
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.url).with_request_timeout(Duration::from_secs(self.timeout_secs))
    }

    /// Dispatch the selected command
    pub async fn run(&self) -> Result<()> {
        let client = Arc::new(
            HttpQuizClient::new(self.client_config()).context("invalid client configuration")?,
        );

        match &self.command {
            Commands::Status => {
                let status = client
                    .status()
                    .await
                    .with_context(|| format!("failed to read status from {}", self.url))?;
                print_status(&status);
                Ok(())
            }
            Commands::Start => {
                ensure_quiz_started(client.as_ref())
                    .await
                    .context("failed to start quiz")?;
                println!("Quiz is running");
                Ok(())
            }
            Commands::Run(args) => self.run_swarm(client, args).await,
        }
    }

    async fn run_swarm(&self, client: Arc<HttpQuizClient>, args: &RunArgs) -> Result<()> {
        let config = args.run_config()?;

        let (orchestrator, mut events_rx) = OrchestratorBuilder::new()
            .config(config)
            .api(client)
            .sampler(sampler_for(args.seed))
            .build()
            .context("failed to build orchestrator")?;

        let config = orchestrator.config();
        println!("\n{}", "=".repeat(60));
        println!("   Quiz Bots");
        println!("{}", "=".repeat(60));
        println!("  Target:       {}", self.url);
        println!("  Bots:         {}", config.total_bots);
        println!("  Max delay:    {:.1} s", config.max_delay_secs);
        println!("  Auto-start:   {}", if config.auto_start { "yes" } else { "no" });
        println!("{}", "=".repeat(60));
        println!();

        let stop = orchestrator.stop_handle();
        let monitor = tokio::spawn(async move { monitor_events(&mut events_rx, stop).await });

        let result = orchestrator.run_with_signal_handling().await;

        // Drop orchestrator to close the event channel
        drop(orchestrator);
        if let Err(e) = monitor.await {
            tracing::warn!(error = %e, "Event monitor failed");
        }

        let report = result.map_err(run_error)?;
        print!("{}", render_summary(&report));

        if let Some(path) = &args.json {
            JsonExporter::export(&report, path)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            tracing::info!(path = %path.display(), "Report written");
        }
        if let Some(path) = &args.summary_json {
            JsonExporter::export_summary(&report, path)
                .with_context(|| format!("failed to write summary to {}", path.display()))?;
            tracing::info!(path = %path.display(), "Summary written");
        }

        Ok(())
    }
}

fn run_error(err: QuizError) -> anyhow::Error {
    let context = if err.is_preflight() {
        "auto-start pre-flight failed, no bots launched"
    } else {
        "run aborted before any bot was launched"
    };
    anyhow::Error::new(err).context(context)
}

/// Log live counters after every terminal event
async fn monitor_events(
    events_rx: &mut tokio::sync::mpsc::Receiver<BotEvent>,
    stop: StopHandle,
) -> LiveCounts {
    let mut counts = LiveCounts::default();
    while let Some(event) = events_rx.recv().await {
        counts.apply(&event);
        match &event.kind {
            BotEventKind::Finished(outcome) => tracing::info!(
                bot_id = event.bot_id,
                outcome = %outcome.state(),
                running = counts.running,
                completed = counts.completed,
                stopped = stop.is_stop_requested(),
                "Bot finished"
            ),
            BotEventKind::Launched => tracing::debug!(bot_id = event.bot_id, "Bot launched"),
            BotEventKind::Transition(_) => {}
        }
    }
    tracing::info!(
        submitted = counts.submitted,
        stopped = counts.stopped,
        failed = counts.failed,
        "All bots finished"
    );
    counts
}

fn print_status(status: &QuizStatus) {
    println!("Quiz loaded:      {}", status.quiz_loaded);
    if let Some(title) = &status.quiz_title {
        println!("Title:            {title}");
    }
    println!("In progress:      {}", status.quiz_in_progress);
    match status.active_question() {
        Some(index) => println!("Current question: {}", index + 1),
        None => println!("Current question: -"),
    }
    if let Some(n) = status.num_questions {
        println!("Questions:        {n}");
    }
    if let Some(total) = status.total_clients {
        println!(
            "Clients:          {} ({} completed)",
            total,
            status.completed_clients.unwrap_or(0)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_bots_core::{BotState, FailureReason, SubmitResult};
    use std::io::Write;

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::parse_from([
            "quiz-bots",
            "--url",
            "http://quiz.local:8080",
            "run",
            "-n",
            "25",
            "--max-delay",
            "2.5",
            "--auto-start",
            "--seed",
            "9",
        ]);

        assert_eq!(cli.url, "http://quiz.local:8080");
        let Commands::Run(args) = &cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.seed, Some(9));

        let config = args.run_config().unwrap();
        assert_eq!(config.total_bots, 25);
        assert_eq!(config.max_delay_secs, 2.5);
        assert!(config.auto_start);
        assert_eq!(config.name_prefix, "WebBot");
    }

    #[test]
    fn test_parse_output_paths() {
        let cli = Cli::parse_from([
            "quiz-bots",
            "run",
            "--json",
            "report.json",
            "--summary-json",
            "summary.json",
        ]);
        let Commands::Run(args) = &cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.json, Some(PathBuf::from("report.json")));
        assert_eq!(args.summary_json, Some(PathBuf::from("summary.json")));
    }

    #[test]
    fn test_run_error_names_preflight() {
        let err = run_error(QuizError::NoQuizLoaded);
        assert!(err.to_string().contains("pre-flight"));

        let err = run_error(QuizError::config("bad"));
        assert!(!err.to_string().contains("pre-flight"));
    }

    #[test]
    fn test_parse_status_and_start() {
        let cli = Cli::parse_from(["quiz-bots", "status", "--timeout-secs", "3"]);
        assert!(matches!(cli.command, Commands::Status));
        assert_eq!(cli.client_config().request_timeout, Duration::from_secs(3));

        let cli = Cli::parse_from(["quiz-bots", "start"]);
        assert!(matches!(cli.command, Commands::Start));
    }

    #[test]
    fn test_config_file_with_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"total_bots": 40, "max_delay_secs": 8.0, "name_prefix": "Load"}}"#
        )
        .unwrap();

        let args = RunArgs {
            config: Some(file.path().to_path_buf()),
            bots: Some(12),
            ..Default::default()
        };
        let config = args.run_config().unwrap();

        assert_eq!(config.total_bots, 12);
        assert_eq!(config.max_delay_secs, 8.0);
        assert_eq!(config.name_prefix, "Load");
        assert_eq!(config.answer_poll_interval_ms, 1000);
    }

    #[test]
    fn test_missing_config_file() {
        let args = RunArgs {
            config: Some(PathBuf::from("/definitely/not/here.json")),
            ..Default::default()
        };
        let err = args.run_config().unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }

    #[test]
    fn test_live_counts() {
        let mut counts = LiveCounts::default();
        let events = [
            BotEvent { bot_id: 0, kind: BotEventKind::Launched },
            BotEvent { bot_id: 1, kind: BotEventKind::Launched },
            BotEvent { bot_id: 0, kind: BotEventKind::Transition(BotState::Connecting) },
            BotEvent {
                bot_id: 0,
                kind: BotEventKind::Finished(BotOutcome::Completed {
                    result: SubmitResult::default(),
                }),
            },
            BotEvent {
                bot_id: 1,
                kind: BotEventKind::Finished(BotOutcome::Failed {
                    reason: FailureReason::ConnectError,
                    message: String::new(),
                }),
            },
        ];
        for event in &events {
            counts.apply(event);
        }

        assert_eq!(
            counts,
            LiveCounts {
                running: 0,
                completed: 2,
                submitted: 1,
                stopped: 0,
                failed: 1,
            }
        );
    }
}
