//! Bot session states and terminal outcomes

use serde::{Deserialize, Serialize};

use crate::error::FailureReason;
use crate::quiz::SubmitResult;

/// Phase of a bot session
///
/// Sessions move strictly forward:
/// `Connecting → AwaitingStart → Answering → Submitting → {Completed, Stopped, Failed}`.
/// `Answering` is skipped when the quiz has no questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotState {
    /// Joining the quiz
    Connecting,
    /// Joined, waiting for the quiz to start
    AwaitingStart,
    /// Answering questions as they become current
    Answering,
    /// Sending collected answers
    Submitting,
    /// Answers submitted
    Completed,
    /// Stop requested before submission
    Stopped,
    /// Ended by an error
    Failed,
}

impl std::fmt::Display for BotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Connecting => "connecting",
            Self::AwaitingStart => "awaiting_start",
            Self::Answering => "answering",
            Self::Submitting => "submitting",
            Self::Completed => "completed",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// How a bot session ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BotOutcome {
    /// Submission accepted
    Completed {
        /// Grading returned by the server
        result: SubmitResult,
    },
    /// Stop observed before submission
    Stopped {
        /// Phase in which the stop was observed
        during: BotState,
    },
    /// A call failed
    Failed {
        /// Failure category
        reason: FailureReason,
        /// Underlying error
        message: String,
    },
}

impl BotOutcome {
    /// Terminal state corresponding to this outcome
    pub fn state(&self) -> BotState {
        match self {
            Self::Completed { .. } => BotState::Completed,
            Self::Stopped { .. } => BotState::Stopped,
            Self::Failed { .. } => BotState::Failed,
        }
    }

    /// Failure reason, if the session failed
    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            Self::Failed { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// Server grading, if the session completed
    pub fn result(&self) -> Option<&SubmitResult> {
        match self {
            Self::Completed { result } => Some(result),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_state_mapping() {
        let failed = BotOutcome::Failed {
            reason: FailureReason::ConnectError,
            message: "HTTP 500".into(),
        };
        assert_eq!(failed.state(), BotState::Failed);
        assert_eq!(failed.failure_reason(), Some(FailureReason::ConnectError));
        assert!(failed.result().is_none());

        let stopped = BotOutcome::Stopped {
            during: BotState::Answering,
        };
        assert_eq!(stopped.state(), BotState::Stopped);
        assert_eq!(stopped.failure_reason(), None);
    }

    #[test]
    fn test_outcome_tagged_json() {
        let json = serde_json::to_string(&BotOutcome::Stopped {
            during: BotState::AwaitingStart,
        })
        .unwrap();
        assert_eq!(json, r#"{"status":"stopped","during":"awaiting_start"}"#);
    }
}
