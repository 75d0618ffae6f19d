//! Status polling with cooperative cancellation
//!
//! Every wait in a bot session goes through this module so that a stop
//! request is observed within one poll interval or one thinking delay.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::quiz::QuizStatus;
use crate::traits::{ApiError, QuizApi};

/// Result of [`StatusPoller::await_condition`]
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The predicate held for this snapshot
    Ready(QuizStatus),
    /// Stop was requested before the predicate held
    Cancelled,
    /// A status fetch failed
    Failed(ApiError),
}

/// Result of [`pause`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// The full duration elapsed
    Elapsed,
    /// Stop was requested first
    Cancelled,
}

/// Sleep for `duration` unless `cancel` fires first.
///
/// An already-cancelled token returns immediately without sleeping.
pub async fn pause(duration: Duration, cancel: &CancellationToken) -> Pause {
    tokio::select! {
        biased;

        _ = cancel.cancelled() => Pause::Cancelled,
        _ = tokio::time::sleep(duration) => Pause::Elapsed,
    }
}

/// Polls `GET /api/status` until a condition holds
#[derive(Clone)]
pub struct StatusPoller {
    api: Arc<dyn QuizApi>,
    cancel: CancellationToken,
}

impl StatusPoller {
    /// Create a poller sharing the run's cancellation token
    pub fn new(api: Arc<dyn QuizApi>, cancel: CancellationToken) -> Self {
        Self { api, cancel }
    }

    /// Fetch status every `interval` until `predicate` holds.
    ///
    /// The first fetch happens immediately. Cancellation is checked before
    /// every fetch and during every sleep; a fetch already in flight is not
    /// interrupted.
    pub async fn await_condition<F>(&self, mut predicate: F, interval: Duration) -> PollOutcome
    where
        F: FnMut(&QuizStatus) -> bool,
    {
        loop {
            if self.cancel.is_cancelled() {
                return PollOutcome::Cancelled;
            }

            match self.api.status().await {
                Ok(status) if predicate(&status) => return PollOutcome::Ready(status),
                Ok(_) => {}
                Err(e) => return PollOutcome::Failed(e),
            }

            if pause(interval, &self.cancel).await == Pause::Cancelled {
                return PollOutcome::Cancelled;
            }
        }
    }
}

impl std::fmt::Debug for StatusPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusPoller")
            .field("base_url", &self.api.base_url())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
