//! Live run statistics shared between the orchestrator and its bots

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::bot::BotOutcome;

/// Point-in-time copy of [`RunStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStatsSnapshot {
    /// Bots launched and not yet terminal
    pub running: usize,

    /// Bots that reached any terminal state
    pub completed: usize,

    /// Terminal bots that submitted
    pub submitted: usize,

    /// Terminal bots that were stopped
    pub stopped: usize,

    /// Terminal bots that failed
    pub failed: usize,

    /// Whether a stop has been requested
    pub stop_requested: bool,
}

impl RunStatsSnapshot {
    /// Bots launched so far
    pub fn launched(&self) -> usize {
        self.running + self.completed
    }
}

impl std::fmt::Display for RunStatsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Running: {}  |  Completed: {}  |  Stopped: {}",
            self.running, self.completed, self.stop_requested
        )
    }
}

#[derive(Debug, Default)]
struct Counters {
    running: usize,
    completed: usize,
    submitted: usize,
    stopped: usize,
    failed: usize,
}

/// Counters and stop signal for one run
///
/// Counter updates happen under one lock so a snapshot never observes a bot
/// that has left `running` but not yet reached `completed`. The stop flag is
/// monotonic within a run; [`RunStats::reset`] starts a new run with a fresh
/// token.
#[derive(Debug)]
pub struct RunStats {
    counters: Mutex<Counters>,
    stop_requested: AtomicBool,
    token: Mutex<CancellationToken>,
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStats {
    /// Create zeroed stats
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(Counters::default()),
            stop_requested: AtomicBool::new(false),
            token: Mutex::new(CancellationToken::new()),
        }
    }

    fn counters(&self) -> MutexGuard<'_, Counters> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Zero the counters, clear the stop flag and arm a fresh token
    pub fn reset(&self) {
        *self.counters() = Counters::default();
        let mut token = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        self.stop_requested.store(false, Ordering::SeqCst);
        *token = CancellationToken::new();
    }

    /// Token bots of the current run observe
    pub fn token(&self) -> CancellationToken {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// A bot was launched
    pub fn launch(&self) {
        self.counters().running += 1;
    }

    /// A launched bot reached a terminal state
    pub fn finish(&self, outcome: &BotOutcome) {
        let mut c = self.counters();
        c.running = c.running.saturating_sub(1);
        c.completed += 1;
        match outcome {
            BotOutcome::Completed { .. } => c.submitted += 1,
            BotOutcome::Stopped { .. } => c.stopped += 1,
            BotOutcome::Failed { .. } => c.failed += 1,
        }
    }

    /// Set the stop flag and cancel the current token.
    ///
    /// Returns `true` only for the call that flipped the flag.
    pub fn request_stop(&self) -> bool {
        let token = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        let first = !self.stop_requested.swap(true, Ordering::SeqCst);
        token.cancel();
        first
    }

    /// Whether a stop has been requested in the current run
    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    /// Current counter values
    pub fn snapshot(&self) -> RunStatsSnapshot {
        let c = self.counters();
        RunStatsSnapshot {
            running: c.running,
            completed: c.completed,
            submitted: c.submitted,
            stopped: c.stopped,
            failed: c.failed,
            stop_requested: self.stop_requested(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::BotState;
    use crate::error::FailureReason;
    use crate::quiz::SubmitResult;
    use std::sync::Arc;

    #[test]
    fn test_launch_and_finish() {
        let stats = RunStats::new();
        stats.launch();
        stats.launch();
        stats.finish(&BotOutcome::Completed {
            result: SubmitResult::default(),
        });

        let snap = stats.snapshot();
        assert_eq!(snap.running, 1);
        assert_eq!(snap.completed, 1);
        assert_eq!(snap.submitted, 1);
        assert_eq!(snap.launched(), 2);
    }

    #[test]
    fn test_running_never_negative() {
        let stats = RunStats::new();
        stats.finish(&BotOutcome::Stopped {
            during: BotState::Connecting,
        });
        assert_eq!(stats.snapshot().running, 0);
    }

    #[test]
    fn test_stop_is_monotonic() {
        let stats = RunStats::new();
        let token = stats.token();
        assert!(!stats.stop_requested());

        assert!(stats.request_stop());
        assert!(!stats.request_stop());
        assert!(stats.stop_requested());
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_reset_arms_fresh_token() {
        let stats = RunStats::new();
        stats.launch();
        stats.request_stop();
        let old = stats.token();

        stats.reset();

        assert_eq!(stats.snapshot(), RunStatsSnapshot::default());
        assert!(old.is_cancelled());
        assert!(!stats.token().is_cancelled());
    }

    #[test]
    fn test_concurrent_finish_no_lost_updates() {
        let stats = Arc::new(RunStats::new());
        for _ in 0..200 {
            stats.launch();
        }

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let stats = Arc::clone(&stats);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        if t % 2 == 0 {
                            stats.finish(&BotOutcome::Failed {
                                reason: FailureReason::SubmitError,
                                message: String::new(),
                            });
                        } else {
                            stats.finish(&BotOutcome::Completed {
                                result: SubmitResult::default(),
                            });
                        }
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let snap = stats.snapshot();
        assert_eq!(snap.running, 0);
        assert_eq!(snap.completed, 200);
        assert_eq!(snap.failed, 100);
        assert_eq!(snap.submitted, 100);
    }

    #[test]
    fn test_snapshot_display() {
        let stats = RunStats::new();
        stats.launch();
        assert_eq!(
            stats.snapshot().to_string(),
            "Running: 1  |  Completed: 0  |  Stopped: false"
        );
    }
}
