//! Builder pattern for Orchestrator construction

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::channel::{BotEvent, ChannelConfig};
use crate::config::RunConfig;
use crate::error::{QuizError, QuizResult};
use crate::traits::{AnswerSampler, QuizApi};

use super::executor::Orchestrator;

/// Builder for creating an Orchestrator with proper configuration
///
/// # Example
///
/// ```ignore
/// let (orchestrator, events_rx) = OrchestratorBuilder::new()
///     .total_bots(50)
///     .max_delay(3.0)
///     .auto_start(true)
///     .api(api)
///     .sampler(sampler)
///     .build()?;
/// ```
pub struct OrchestratorBuilder {
    config: RunConfig,
    api: Option<Arc<dyn QuizApi>>,
    sampler: Option<Arc<dyn AnswerSampler>>,
    channel_config: ChannelConfig,
}

impl OrchestratorBuilder {
    /// Create a new orchestrator builder with default configuration
    pub fn new() -> Self {
        Self {
            config: RunConfig::default(),
            api: None,
            sampler: None,
            channel_config: ChannelConfig::default(),
        }
    }

    /// Set the full run configuration
    pub fn config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the number of bots
    pub fn total_bots(mut self, total_bots: usize) -> Self {
        self.config.total_bots = total_bots;
        self
    }

    /// Set the per-question delay ceiling in seconds
    pub fn max_delay(mut self, secs: f64) -> Self {
        self.config.max_delay_secs = secs;
        self
    }

    /// Start the quiz before launching bots
    pub fn auto_start(mut self, auto_start: bool) -> Self {
        self.config.auto_start = auto_start;
        self
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

    /// Set the channel configuration
    pub fn channel_config(mut self, config: ChannelConfig) -> Self {
        self.channel_config = config;
        self
    }

    /// Build the orchestrator and return it along with the event receiver
    ///
    /// Bot count and delay are clamped rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if api or sampler are not set, or if configuration
    /// validation fails.
    pub fn build(self) -> QuizResult<(Orchestrator, mpsc::Receiver<BotEvent>)> {
        let api = self.api.ok_or_else(|| QuizError::missing_config("api"))?;

        let sampler = self
            .sampler
            .ok_or_else(|| QuizError::missing_config("sampler"))?;

        let config = self.config.normalized();
        config.validate()?;

        if self.channel_config.events_buffer == 0 {
            return Err(QuizError::config("events buffer must be non-zero"));
        }

        let (events_tx, events_rx) = mpsc::channel(self.channel_config.events_buffer);

        let orchestrator = Orchestrator::new(config, api, sampler, events_tx);

        Ok((orchestrator, events_rx))
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
