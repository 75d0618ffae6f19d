//! Bot session state machine

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::channel::{BotEvent, BotEventKind};
use crate::error::FailureReason;
use crate::poller::{pause, Pause, PollOutcome, StatusPoller};
use crate::quiz::{
    AnswerRecord, AnswerSheet, BotConfig, ClientSession, Quiz, QuizStatus, DEFAULT_NUM_QUESTIONS,
    MAX_QUESTIONS,
};
use crate::report::BotRecord;
use crate::traits::{AnswerSampler, ApiError, QuizApi};

use super::state::{BotOutcome, BotState};

/// How the answer loop ended
enum AnswerFlow {
    /// Quiz ended or every question was answered
    Done,
    /// Stop observed
    Cancelled,
    /// Status poll failed
    Failed(ApiError),
}

/// One simulated participant: connect -> await start -> answer -> submit
///
/// Sessions own their answers and timers; the only shared state is the
/// cancellation token and the optional event channel.
pub struct BotSession {
    /// Immutable per-bot settings
    config: BotConfig,

    /// Quiz service client (shared across bots via Arc)
    api: Arc<dyn QuizApi>,

    /// Random source (shared across bots via Arc)
    sampler: Arc<dyn AnswerSampler>,

    /// Run-wide stop signal
    cancel: CancellationToken,

    /// Observer channel for transitions
    events_tx: Option<mpsc::Sender<BotEvent>>,

    /// Poll interval while waiting for the start
    start_poll_interval: Duration,

    /// Poll interval while answering
    answer_poll_interval: Duration,
}

impl BotSession {
    /// Create a new session
    ///
    /// Use `BotSessionBuilder` for a more ergonomic construction.
    pub fn new(
        config: BotConfig,
        api: Arc<dyn QuizApi>,
        sampler: Arc<dyn AnswerSampler>,
        cancel: CancellationToken,
        start_poll_interval: Duration,
        answer_poll_interval: Duration,
    ) -> Self {
        Self {
            config,
            api,
            sampler,
            cancel,
            events_tx: None,
            start_poll_interval,
            answer_poll_interval,
        }
    }

    /// Report transitions on `tx`
    pub fn with_events(mut self, tx: mpsc::Sender<BotEvent>) -> Self {
        self.events_tx = Some(tx);
        self
    }

    /// Get the bot ID
    pub fn id(&self) -> usize {
        self.config.id
    }

    /// Drive the session to a terminal state.
    ///
    /// Never fails: every error becomes a [`BotOutcome::Failed`] in the
    /// returned record.
    pub async fn run(self) -> BotRecord {
        let started = Instant::now();
        let mut sheet = AnswerSheet::default();

        let outcome = self.drive(&mut sheet).await;

        match &outcome {
            BotOutcome::Completed { result } => tracing::info!(
                bot_id = self.config.id,
                score = %result.score_label(),
                percentage = ?result.percent(),
                time_taken = ?result.time_taken,
                "Bot submitted"
            ),
            BotOutcome::Stopped { during } => tracing::info!(
                bot_id = self.config.id,
                during = %during,
                "Bot stopped before submit"
            ),
            BotOutcome::Failed { reason, message } => tracing::warn!(
                bot_id = self.config.id,
                reason = %reason,
                error = %message,
                "Bot failed"
            ),
        }
        self.emit(BotEventKind::Finished(outcome.clone()));

        BotRecord {
            bot_id: self.config.id,
            name: self.config.display_name.clone(),
            answers: sheet.answers(),
            question_times: sheet.question_times(),
            outcome,
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }

    async fn drive(&self, sheet: &mut AnswerSheet) -> BotOutcome {
        if self.cancel.is_cancelled() {
            return BotOutcome::Stopped {
                during: BotState::Connecting,
            };
        }

        // Connecting
        self.enter(BotState::Connecting);
        let session = match self.api.connect(&self.config.display_name).await {
            Ok(resp) => {
                tracing::info!(
                    bot_id = self.config.id,
                    client_id = %resp.client_id,
                    quiz_inlined = resp.quiz_data.is_some(),
                    quiz_in_progress = ?resp.quiz_in_progress,
                    total_clients = ?resp.total_clients,
                    "Bot joined"
                );
                ClientSession::from(resp)
            }
            Err(e) => return failed(FailureReason::ConnectError, e),
        };

        // AwaitingStart
        self.enter(BotState::AwaitingStart);
        let quiz = match session.quiz {
            Some(quiz) => quiz,
            None => match self.api.fetch_quiz().await {
                Ok(quiz) => quiz,
                Err(e) => return failed(FailureReason::QuizFetchError, e),
            },
        };

        let poller = StatusPoller::new(Arc::clone(&self.api), self.cancel.clone());
        let status = match poller
            .await_condition(|s| s.quiz_in_progress, self.start_poll_interval)
            .await
        {
            PollOutcome::Ready(status) => status,
            PollOutcome::Cancelled => {
                return BotOutcome::Stopped {
                    during: BotState::AwaitingStart,
                }
            }
            PollOutcome::Failed(e) => return failed(FailureReason::StatusError, e),
        };

        let num_questions = resolve_num_questions(&status, &quiz);
        tracing::info!(
            bot_id = self.config.id,
            num_questions,
            "Quiz started"
        );
        *sheet = AnswerSheet::new(num_questions);

        // Answering
        if num_questions > 0 {
            self.enter(BotState::Answering);
            match self.answer_questions(&poller, &quiz, status, sheet).await {
                AnswerFlow::Done => {}
                AnswerFlow::Cancelled => {
                    return BotOutcome::Stopped {
                        during: BotState::Answering,
                    }
                }
                AnswerFlow::Failed(e) => return failed(FailureReason::StatusError, e),
            }
        }

        // Submitting
        if self.cancel.is_cancelled() {
            return BotOutcome::Stopped {
                during: BotState::Submitting,
            };
        }
        self.enter(BotState::Submitting);
        let payload = sheet.to_payload(session.client_id);
        match self.api.submit(&payload).await {
            Ok(result) => BotOutcome::Completed { result },
            Err(e) => failed(FailureReason::SubmitError, e),
        }
    }

    /// Answer each question the first time it is observed as current.
    ///
    /// `observed` is the snapshot that showed the quiz running; it is acted on
    /// before the first poll.
    async fn answer_questions(
        &self,
        poller: &StatusPoller,
        quiz: &Quiz,
        mut observed: QuizStatus,
        sheet: &mut AnswerSheet,
    ) -> AnswerFlow {
        let max_think = self.config.max_think_secs();

        loop {
            if !observed.quiz_in_progress {
                tracing::info!(
                    bot_id = self.config.id,
                    answered = sheet.answered(),
                    "Bot detected quiz ended"
                );
                return AnswerFlow::Done;
            }

            if let Some(index) = observed.active_question().filter(|i| sheet.accepts(*i)) {
                let chosen_option = self.sampler.choose_option(quiz.option_count(index));
                let time_spent_secs = self.sampler.think_time(max_think).clamp(1, max_think);

                if pause(Duration::from_secs(time_spent_secs), &self.cancel).await
                    == Pause::Cancelled
                {
                    return AnswerFlow::Cancelled;
                }

                sheet.record(AnswerRecord {
                    index,
                    chosen_option,
                    time_spent_secs,
                });
                tracing::debug!(
                    bot_id = self.config.id,
                    question = index + 1,
                    option = chosen_option,
                    secs = time_spent_secs,
                    "Bot answered"
                );

                if sheet.is_complete() {
                    return AnswerFlow::Done;
                }
            }

            let next = poller
                .await_condition(
                    |s| !s.quiz_in_progress || s.active_question().is_some_and(|i| sheet.accepts(i)),
                    self.answer_poll_interval,
                )
                .await;
            observed = match next {
                PollOutcome::Ready(status) => status,
                PollOutcome::Cancelled => return AnswerFlow::Cancelled,
                PollOutcome::Failed(e) => return AnswerFlow::Failed(e),
            };
        }
    }

    fn enter(&self, state: BotState) {
        tracing::info!(bot_id = self.config.id, state = %state, "Bot transition");
        self.emit(BotEventKind::Transition(state));
    }

    fn emit(&self, kind: BotEventKind) {
        if let Some(tx) = &self.events_tx {
            let event = BotEvent {
                bot_id: self.config.id,
                kind,
            };
            // A full or closed channel drops the event; the session never waits on observers.
            if let Err(mpsc::error::TrySendError::Full(event)) = tx.try_send(event) {
                tracing::debug!(bot_id = event.bot_id, "Event channel full, dropping event");
            }
        }
    }
}

impl std::fmt::Debug for BotSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotSession")
            .field("config", &self.config)
            .field("base_url", &self.api.base_url())
            .field("sampler", &self.sampler.name())
            .field("start_poll_interval", &self.start_poll_interval)
            .field("answer_poll_interval", &self.answer_poll_interval)
            .finish()
    }
}

fn failed(reason: FailureReason, error: ApiError) -> BotOutcome {
    BotOutcome::Failed {
        reason,
        message: error.to_string(),
    }
}

/// Question count for the answer sheet.
///
/// The status value wins when present (a non-positive value yields an empty
/// sheet); otherwise the quiz length, otherwise [`DEFAULT_NUM_QUESTIONS`].
/// Never exceeds [`MAX_QUESTIONS`].
pub fn resolve_num_questions(status: &QuizStatus, quiz: &Quiz) -> usize {
    let n = match status.num_questions {
        Some(n) => usize::try_from(n).unwrap_or(0),
        None if !quiz.is_empty() => quiz.len(),
        None => DEFAULT_NUM_QUESTIONS,
    };
    n.min(MAX_QUESTIONS)
}
