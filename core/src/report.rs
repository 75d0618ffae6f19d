//! Run report: per-bot outcomes and the run summary

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bot::BotOutcome;
use crate::error::FailureReason;

/// Terminal record of one bot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotRecord {
    /// Bot index
    pub bot_id: usize,

    /// Display name used on connect
    pub name: String,

    /// How the session ended
    pub outcome: BotOutcome,

    /// Answers as they were (or would have been) submitted
    pub answers: Vec<i64>,

    /// Thinking time per question in seconds
    pub question_times: Vec<u64>,

    /// Session wall time (ms)
    pub elapsed_ms: u64,
}

impl BotRecord {
    /// Number of questions this bot answered
    pub fn answered(&self) -> usize {
        self.answers.iter().filter(|a| **a >= 0).count()
    }

    /// Sum of thinking times, as submitted in `timeTaken`
    pub fn time_taken(&self) -> u64 {
        self.question_times.iter().sum()
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Bots requested (after clamping)
    pub total_bots: usize,

    /// Per-question delay ceiling (after clamping)
    pub max_delay_secs: f64,

    /// Whether a stop was requested during the run
    pub stop_requested: bool,

    /// When the first bot was launched
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// When the last bot finished
    pub finished_at: chrono::DateTime<chrono::Utc>,

    /// One record per launched bot, ordered by bot id
    pub bots: Vec<BotRecord>,
}

/// Aggregated view of a [`RunReport`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Bots requested
    pub total_bots: usize,

    /// Bots that reached a terminal state
    pub finished: usize,

    /// Bots whose submission was accepted
    pub submitted: usize,

    /// Bots stopped before submitting
    pub stopped: usize,

    /// Bots that failed
    pub failed: usize,

    /// Failure counts per reason
    pub failures: BTreeMap<FailureReason, usize>,

    /// Questions answered across all bots
    pub total_answers: usize,

    /// Mean score percentage over bots that reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_percentage: Option<f64>,

    /// Run wall time (ms)
    pub duration_ms: u64,
}

impl RunSummary {
    /// Fraction of finished bots that submitted (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        if self.finished > 0 {
            self.submitted as f64 / self.finished as f64
        } else {
            0.0
        }
    }
}

impl RunReport {
    /// Aggregate the per-bot records
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            total_bots: self.total_bots,
            finished: self.bots.len(),
            duration_ms: (self.finished_at - self.started_at)
                .num_milliseconds()
                .max(0) as u64,
            ..Default::default()
        };

        let mut percentages = Vec::new();
        for bot in &self.bots {
            summary.total_answers += bot.answered();
            match &bot.outcome {
                BotOutcome::Completed { result } => {
                    summary.submitted += 1;
                    if let Some(p) = result.percent() {
                        percentages.push(p);
                    }
                }
                BotOutcome::Stopped { .. } => summary.stopped += 1,
                BotOutcome::Failed { reason, .. } => {
                    summary.failed += 1;
                    *summary.failures.entry(*reason).or_default() += 1;
                }
            }
        }

        if !percentages.is_empty() {
            summary.mean_percentage =
                Some(percentages.iter().sum::<f64>() / percentages.len() as f64);
        }

        summary
    }

    /// Record for bot `id`
    pub fn bot(&self, id: usize) -> Option<&BotRecord> {
        self.bots.iter().find(|b| b.bot_id == id)
    }
}
