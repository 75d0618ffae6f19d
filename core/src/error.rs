//! Error types for quiz-bots-core

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::traits::ApiError;

/// Core error type
///
/// Per-bot failures never surface here; they are recorded as
/// [`FailureReason`]s in the run report. `QuizError` covers construction
/// problems and the auto-start pre-flight, which is the only way a run
/// can fail as a whole.
#[derive(Error, Debug)]
pub enum QuizError {
    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// A required builder field was not set
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),

    /// Auto-start requested but the server has no quiz loaded
    #[error("no quiz loaded on server; upload one via the admin panel first")]
    NoQuizLoaded,

    /// Auto-start requested and the start-quiz call failed
    #[error("start quiz failed: {0}")]
    StartQuiz(#[source] ApiError),

    /// Quiz service call failed outside of a bot session
    #[error("quiz service error: {0}")]
    Api(#[from] ApiError),
}

impl QuizError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a missing-field error
    pub fn missing_config(field: &'static str) -> Self {
        Self::MissingConfig(field)
    }

    /// Whether this error came from the auto-start pre-flight
    pub fn is_preflight(&self) -> bool {
        matches!(self, Self::NoQuizLoaded | Self::StartQuiz(_))
    }
}

/// Result type alias
pub type QuizResult<T> = std::result::Result<T, QuizError>;

/// Why a bot session ended in the `Failed` state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Joining the quiz failed
    ConnectError,
    /// Quiz was not inlined on connect and fetching it failed
    QuizFetchError,
    /// A status poll failed
    StatusError,
    /// Submitting answers failed
    SubmitError,
    /// The bot task panicked or was aborted by the runtime
    Aborted,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ConnectError => "connect_error",
            Self::QuizFetchError => "quiz_fetch_error",
            Self::StatusError => "status_error",
            Self::SubmitError => "submit_error",
            Self::Aborted => "aborted",
        };
        f.pad(s)
    }
}
