//! Channel configuration and event types for orchestrator communication

use serde::Serialize;

use crate::bot::{BotOutcome, BotState};

/// Channel buffer configuration for orchestrator communication
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Event channel buffer size (bots -> observer)
    pub events_buffer: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            events_buffer: 10_000,
        }
    }
}

impl ChannelConfig {
    /// Create a new channel config with custom event buffer size
    pub fn with_events_buffer(mut self, size: usize) -> Self {
        self.events_buffer = size;
        self
    }
}

/// Something that happened to one bot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BotEvent {
    /// Bot the event belongs to
    pub bot_id: usize,

    /// What happened
    pub kind: BotEventKind,
}

/// Kind of [`BotEvent`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BotEventKind {
    /// Task spawned
    Launched,
    /// Entered a non-terminal state
    Transition(BotState),
    /// Reached a terminal state
    Finished(BotOutcome),
}

impl BotEvent {
    /// Whether this event marks the end of a session
    pub fn is_finished(&self) -> bool {
        matches!(self.kind, BotEventKind::Finished(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_config_default() {
        let config = ChannelConfig::default();
        assert_eq!(config.events_buffer, 10_000);
    }

    #[test]
    fn test_channel_config_builder() {
        let config = ChannelConfig::default().with_events_buffer(64);
        assert_eq!(config.events_buffer, 64);
    }

    #[test]
    fn test_finished_event() {
        let event = BotEvent {
            bot_id: 3,
            kind: BotEventKind::Finished(BotOutcome::Stopped {
                during: BotState::Answering,
            }),
        };
        assert!(event.is_finished());
        assert!(!BotEvent {
            bot_id: 3,
            kind: BotEventKind::Launched
        }
        .is_finished());
    }
}
