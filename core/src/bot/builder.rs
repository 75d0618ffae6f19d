//! Builder pattern for BotSession construction

use crate::channel::BotEvent;
use crate::config::RunConfig;
use crate::error::{QuizError, QuizResult};
use crate::quiz::BotConfig;
use crate::traits::{AnswerSampler, QuizApi};

use super::executor::BotSession;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Builder for creating BotSession instances
///
/// # Example
/// ```ignore
/// let bot = BotSessionBuilder::new(BotConfig::new(0, "WebBot 0", 5.0))
///     .api(api)
///     .sampler(sampler)
///     .cancel(token)
///     .events_tx(tx)
///     .build()?;
/// ```
pub struct BotSessionBuilder {
    config: BotConfig,
    api: Option<Arc<dyn QuizApi>>,
    sampler: Option<Arc<dyn AnswerSampler>>,
    cancel: Option<CancellationToken>,
    events_tx: Option<mpsc::Sender<BotEvent>>,
    start_poll_interval: Duration,
    answer_poll_interval: Duration,
}

impl BotSessionBuilder {
    /// Create a new builder for the given bot
    pub fn new(config: BotConfig) -> Self {
        let defaults = RunConfig::default();
        Self {
            config,
            api: None,
            sampler: None,
            cancel: None,
            events_tx: None,
            start_poll_interval: defaults.start_poll_interval(),
            answer_poll_interval: defaults.answer_poll_interval(),
        }
    }

    /// Builder for bot `id` of a run
    pub fn for_run(id: usize, run: &RunConfig) -> Self {
        Self::new(BotConfig::new(id, run.display_name(id), run.max_delay_secs))
            .poll_intervals(run.start_poll_interval(), run.answer_poll_interval())
    }

    /// Set the quiz service client
    pub fn api(mut self, api: Arc<dyn QuizApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Set the answer sampler
    pub fn sampler(mut self, sampler: Arc<dyn AnswerSampler>) -> Self {
        self.sampler = Some(sampler);
        self
    }

    /// Set the cancellation token
    pub fn cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Set the event channel sender
    pub fn events_tx(mut self, tx: mpsc::Sender<BotEvent>) -> Self {
        self.events_tx = Some(tx);
        self
    }

    /// Set the start and answer poll intervals
    pub fn poll_intervals(mut self, start: Duration, answer: Duration) -> Self {
        self.start_poll_interval = start;
        self.answer_poll_interval = answer;
        self
    }

    /// Build the BotSession
    ///
    /// # Errors
    /// Returns an error if the api or sampler is missing, or an interval is zero.
    pub fn build(self) -> QuizResult<BotSession> {
        let api = self.api.ok_or(QuizError::missing_config("api"))?;
        let sampler = self.sampler.ok_or(QuizError::missing_config("sampler"))?;

        if self.start_poll_interval.is_zero() || self.answer_poll_interval.is_zero() {
            return Err(QuizError::config("poll intervals must be non-zero"));
        }

        let session = BotSession::new(
            self.config,
            api,
            sampler,
            self.cancel.unwrap_or_default(),
            self.start_poll_interval,
            self.answer_poll_interval,
        );

        Ok(match self.events_tx {
            Some(tx) => session.with_events(tx),
            None => session,
        })
    }
}
