//! Orchestrator execution logic

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::bot::{BotOutcome, BotSessionBuilder};
use crate::channel::{BotEvent, BotEventKind};
use crate::config::RunConfig;
use crate::error::{FailureReason, QuizError, QuizResult};
use crate::quiz::QuizStatus;
use crate::report::{BotRecord, RunReport};
use crate::traits::{AnswerSampler, QuizApi};

use super::aggregator::{RunStats, RunStatsSnapshot};

/// Orchestrator manages the run lifecycle
///
/// Responsible for the start-quiz pre-flight, spawning bot sessions,
/// propagating stop requests and collecting results.
pub struct Orchestrator {
    /// Run configuration, already clamped
    pub(crate) config: RunConfig,

    /// Quiz service client (shared across bots)
    pub(crate) api: Arc<dyn QuizApi>,

    /// Sampler (shared across bots)
    pub(crate) sampler: Arc<dyn AnswerSampler>,

    /// Event sender (cloned for each bot)
    pub(crate) events_tx: mpsc::Sender<BotEvent>,

    /// Live counters and stop signal
    pub(crate) stats: Arc<RunStats>,
}

/// Cloneable handle that requests a stop of the current run
#[derive(Debug, Clone)]
pub struct StopHandle {
    stats: Arc<RunStats>,
}

impl StopHandle {
    /// Ask every in-flight bot to stop at its next check point.
    ///
    /// Returns `true` if this call set the flag.
    pub fn request_stop(&self) -> bool {
        self.stats.request_stop()
    }

    /// Whether a stop has been requested in the current run
    pub fn is_stop_requested(&self) -> bool {
        self.stats.stop_requested()
    }
}

impl Orchestrator {
    /// Create a new orchestrator
    ///
    /// Use `OrchestratorBuilder` for a more ergonomic construction.
    pub fn new(
        config: RunConfig,
        api: Arc<dyn QuizApi>,
        sampler: Arc<dyn AnswerSampler>,
        events_tx: mpsc::Sender<BotEvent>,
    ) -> Self {
        Self {
            config,
            api,
            sampler,
            events_tx,
            stats: Arc::new(RunStats::new()),
        }
    }

    /// Get the run configuration
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Current run counters
    pub fn stats(&self) -> RunStatsSnapshot {
        self.stats.snapshot()
    }

    /// Handle for stopping the run from another task
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            stats: Arc::clone(&self.stats),
        }
    }

    /// Ask every in-flight bot to stop at its next check point
    pub fn request_stop(&self) {
        if self.stats.request_stop() {
            tracing::info!("Stop requested");
        }
    }

    /// Fetch one status snapshot
    pub async fn probe_status(&self) -> QuizResult<QuizStatus> {
        Ok(self.api.status().await?)
    }

    /// Make sure the quiz is running before bots launch.
    ///
    /// See [`ensure_quiz_started`].
    pub async fn ensure_started(&self) -> QuizResult<()> {
        ensure_quiz_started(self.api.as_ref()).await
    }

    /// Run the swarm
    ///
    /// Launches `total_bots` sessions and returns once every one of them is
    /// terminal. Per-bot failures are recorded in the report; the run only
    /// fails when the auto-start pre-flight does, in which case no bot is
    /// launched.
    pub async fn run(&self) -> QuizResult<RunReport> {
        self.stats.reset();
        let cancel = self.stats.token();
        let total_bots = self.config.total_bots;

        tracing::info!(
            total_bots,
            max_delay_secs = self.config.max_delay_secs,
            auto_start = self.config.auto_start,
            base_url = %self.api.base_url(),
            "Starting run"
        );

        if self.config.auto_start {
            if let Err(e) = self.ensure_started().await {
                tracing::error!(error = %e, "Pre-flight failed, no bots launched");
                return Err(e);
            }
        } else {
            match self.probe_status().await {
                Ok(status) => log_status(&status),
                Err(e) => tracing::warn!(error = %e, "Status probe failed"),
            }
        }

        let sessions = (0..total_bots)
            .map(|bot_id| {
                BotSessionBuilder::for_run(bot_id, &self.config)
                    .api(Arc::clone(&self.api))
                    .sampler(Arc::clone(&self.sampler))
                    .cancel(cancel.clone())
                    .events_tx(self.events_tx.clone())
                    .build()
            })
            .collect::<QuizResult<Vec<_>>>()?;

        let start = Instant::now();
        let started_at = Utc::now();
        let mut handles = Vec::with_capacity(total_bots);

        for bot in sessions {
            let bot_id = bot.id();
            let stats = Arc::clone(&self.stats);

            self.stats.launch();
            self.emit(bot_id, BotEventKind::Launched);

            handles.push((
                bot_id,
                tokio::spawn(async move {
                    let record = bot.run().await;
                    stats.finish(&record.outcome);
                    record
                }),
            ));
        }

        // Wait for all bots to reach a terminal state
        let mut bots = Vec::with_capacity(handles.len());
        for (bot_id, handle) in handles {
            match handle.await {
                Ok(record) => bots.push(record),
                Err(e) => {
                    tracing::error!(bot_id, error = %e, "Bot task panicked");
                    let outcome = BotOutcome::Failed {
                        reason: FailureReason::Aborted,
                        message: e.to_string(),
                    };
                    self.stats.finish(&outcome);
                    self.emit(bot_id, BotEventKind::Finished(outcome.clone()));
                    bots.push(BotRecord {
                        bot_id,
                        name: self.config.display_name(bot_id),
                        outcome,
                        answers: Vec::new(),
                        question_times: Vec::new(),
                        elapsed_ms: 0,
                    });
                }
            }
        }

        let snapshot = self.stats.snapshot();
        tracing::info!(
            elapsed_secs = start.elapsed().as_secs_f64(),
            submitted = snapshot.submitted,
            stopped = snapshot.stopped,
            failed = snapshot.failed,
            "Run completed"
        );

        Ok(RunReport {
            total_bots,
            max_delay_secs: self.config.max_delay_secs,
            stop_requested: snapshot.stop_requested,
            started_at,
            finished_at: Utc::now(),
            bots,
        })
    }

    /// Run with Ctrl+C signal handling
    ///
    /// Ctrl+C requests a stop; the run still waits for every bot.
    pub async fn run_with_signal_handling(&self) -> QuizResult<RunReport> {
        let stop = self.stop_handle();

        // Spawn signal handler task
        let signal_handle = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Received Ctrl+C, stopping bots...");
                    stop.request_stop();
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                }
            }
        });

        let result = self.run().await;

        // Abort signal handler if still running
        signal_handle.abort();

        result
    }

    fn emit(&self, bot_id: usize, kind: BotEventKind) {
        // A full or closed channel drops the event
        if let Err(mpsc::error::TrySendError::Full(_)) =
            self.events_tx.try_send(BotEvent { bot_id, kind })
        {
            tracing::debug!(bot_id, "Event channel full, dropping event");
        }
    }
}

/// Start the quiz unless it is already running.
///
/// Succeeds without calling start when the quiz is already in progress.
///
/// # Errors
///
/// [`QuizError::NoQuizLoaded`] if nothing is uploaded,
/// [`QuizError::StartQuiz`] if the start call fails, and
/// [`QuizError::Api`] if the status itself cannot be read.
pub async fn ensure_quiz_started(api: &dyn QuizApi) -> QuizResult<()> {
    let status = api.status().await?;
    log_status(&status);

    if !status.quiz_loaded {
        return Err(QuizError::NoQuizLoaded);
    }
    if status.quiz_in_progress {
        tracing::info!("Quiz already in progress, not starting");
        return Ok(());
    }

    api.start_quiz().await.map_err(QuizError::StartQuiz)?;
    tracing::info!("Quiz started");
    Ok(())
}

fn log_status(status: &QuizStatus) {
    tracing::info!(
        loaded = status.quiz_loaded,
        in_progress = status.quiz_in_progress,
        questions = ?status.num_questions,
        title = ?status.quiz_title,
        "Quiz status"
    );
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("base_url", &self.api.base_url())
            .field("sampler", &self.sampler.name())
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}
