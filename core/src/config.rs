//! Run configuration types

use crate::error::QuizError;
use crate::quiz::clamp_delay;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Smallest accepted bot count
pub const MIN_BOTS: usize = 1;

/// Largest accepted bot count
pub const MAX_BOTS: usize = 200;

/// Run configuration
///
/// Defines how many bots join, how long they think per question, and how
/// often they poll. Out-of-range values are clamped by [`RunConfig::normalized`]
/// rather than rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of bots to launch
    pub total_bots: usize,

    /// Maximum thinking time per question in seconds
    pub max_delay_secs: f64,

    /// Start the quiz before launching bots
    pub auto_start: bool,

    /// Poll interval while waiting for the quiz to start (ms)
    #[serde(alias = "start_poll_interval")]
    pub start_poll_interval_ms: u64,

    /// Poll interval while answering (ms)
    #[serde(alias = "answer_poll_interval")]
    pub answer_poll_interval_ms: u64,

    /// Display name prefix, suffixed with the bot id
    pub name_prefix: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            total_bots: 10,
            max_delay_secs: 5.0,
            auto_start: false,
            start_poll_interval_ms: 2000,
            answer_poll_interval_ms: 1000,
            name_prefix: "WebBot".to_string(),
        }
    }
}

impl RunConfig {
    /// Create a new config with the given bot count
    pub fn new(total_bots: usize) -> Self {
        Self {
            total_bots,
            ..Default::default()
        }
    }

    /// Set the maximum thinking time
    pub fn with_max_delay(mut self, secs: f64) -> Self {
        self.max_delay_secs = secs;
        self
    }

    /// Enable or disable auto-start
    pub fn with_auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    /// Set both poll intervals
    pub fn with_poll_intervals(mut self, start: Duration, answer: Duration) -> Self {
        self.start_poll_interval_ms = start.as_millis() as u64;
        self.answer_poll_interval_ms = answer.as_millis() as u64;
        self
    }

    /// Set the display name prefix
    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    /// Poll interval while waiting for the quiz to start
    pub fn start_poll_interval(&self) -> Duration {
        Duration::from_millis(self.start_poll_interval_ms)
    }

    /// Poll interval while answering
    pub fn answer_poll_interval(&self) -> Duration {
        Duration::from_millis(self.answer_poll_interval_ms)
    }

    /// Display name for bot `id`
    pub fn display_name(&self, id: usize) -> String {
        format!("{} {}", self.name_prefix, id)
    }

    /// Copy with bot count and delay clamped to their accepted ranges
    pub fn normalized(&self) -> Self {
        let max_delay_secs = if self.max_delay_secs.is_nan() {
            Self::default().max_delay_secs
        } else {
            clamp_delay(self.max_delay_secs)
        };
        Self {
            total_bots: self.total_bots.clamp(MIN_BOTS, MAX_BOTS),
            max_delay_secs,
            ..self.clone()
        }
    }

    /// Validate the parts of the configuration that cannot be clamped
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.start_poll_interval_ms == 0 || self.answer_poll_interval_ms == 0 {
            return Err(QuizError::config("poll intervals must be at least 1ms"));
        }
        if self.name_prefix.trim().is_empty() {
            return Err(QuizError::config("name prefix must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.total_bots, 10);
        assert_eq!(config.max_delay_secs, 5.0);
        assert!(!config.auto_start);
        assert_eq!(config.start_poll_interval(), Duration::from_secs(2));
        assert_eq!(config.answer_poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_config_builder_pattern() {
        let config = RunConfig::new(25)
            .with_max_delay(3.5)
            .with_auto_start(true)
            .with_name_prefix("Bot");

        assert_eq!(config.total_bots, 25);
        assert_eq!(config.max_delay_secs, 3.5);
        assert!(config.auto_start);
        assert_eq!(config.display_name(7), "Bot 7");
    }

    #[test]
    fn test_normalized_clamps_bot_count() {
        assert_eq!(RunConfig::new(0).normalized().total_bots, 1);
        assert_eq!(RunConfig::new(1000).normalized().total_bots, 200);
        assert_eq!(RunConfig::new(42).normalized().total_bots, 42);
    }

    #[test]
    fn test_normalized_clamps_delay() {
        assert_eq!(RunConfig::new(1).with_max_delay(99.0).normalized().max_delay_secs, 10.0);
        assert_eq!(RunConfig::new(1).with_max_delay(-1.0).normalized().max_delay_secs, 0.0);
        assert_eq!(
            RunConfig::new(1).with_max_delay(f64::NAN).normalized().max_delay_secs,
            5.0
        );
    }

    #[test]
    fn test_validation_zero_interval() {
        let config = RunConfig::new(1)
            .with_poll_intervals(Duration::ZERO, Duration::from_millis(10));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_empty_prefix() {
        assert!(RunConfig::new(1).with_name_prefix("  ").validate().is_err());
        assert!(RunConfig::new(1).validate().is_ok());
    }

    #[test]
    fn test_config_partial_json() {
        let config: RunConfig =
            serde_json::from_str(r#"{"total_bots": 3, "auto_start": true}"#).unwrap();
        assert_eq!(config.total_bots, 3);
        assert!(config.auto_start);
        assert_eq!(config.max_delay_secs, 5.0);
        assert_eq!(config.name_prefix, "WebBot");
    }

    #[test]
    fn test_poll_interval_names() {
        let config: RunConfig = serde_json::from_str(
            r#"{"start_poll_interval_ms": 500, "answer_poll_interval": 250}"#,
        )
        .unwrap();
        assert_eq!(config.start_poll_interval_ms, 500);
        assert_eq!(config.answer_poll_interval_ms, 250);
    }
}
