//! Core traits for the quiz service client and answer samplers
//!
//! These traits are defined in core so the session and orchestrator logic
//! never depends on a transport or an RNG. Implementations live in their
//! respective crates (client/, samplers/).

use crate::quiz::{ConnectResponse, Quiz, QuizStatus, SubmissionPayload, SubmitResult};
use async_trait::async_trait;
use std::time::Duration;

// ============================================================================
// Quiz API Trait
// ============================================================================

/// Outbound calls to the quiz service
///
/// One call is one request. Implementations never retry; the caller decides
/// whether a failure aborts the bot.
#[async_trait]
pub trait QuizApi: Send + Sync {
    /// Base URL of the service, for logging
    fn base_url(&self) -> &str;

    /// `POST /api/client/connect`
    async fn connect(&self, name: &str) -> Result<ConnectResponse, ApiError>;

    /// `GET /api/status`
    async fn status(&self) -> Result<QuizStatus, ApiError>;

    /// `GET /api/quiz`
    async fn fetch_quiz(&self) -> Result<Quiz, ApiError>;

    /// `POST /api/quiz/start`
    async fn start_quiz(&self) -> Result<(), ApiError>;

    /// `POST /api/client/submit`
    async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmitResult, ApiError>;
}

/// Quiz service call failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Network unreachable, connection reset, etc.
    #[error("transport error: {0}")]
    Transport(String),

    /// No response within the per-call timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Non-2xx response
    #[error("HTTP {code}: {message}")]
    HttpStatus {
        /// HTTP status code
        code: u16,
        /// Response body, possibly empty
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether the request never produced a response
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Timeout(_))
    }

    /// HTTP status code, if the server answered
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { code, .. } => Some(*code),
            _ => None,
        }
    }
}

// ============================================================================
// Answer Sampler Trait
// ============================================================================

/// Source of randomized choices for bots
///
/// Shared by all bots of a run, so implementations must be safe to call
/// concurrently.
pub trait AnswerSampler: Send + Sync {
    /// Sampler name for identification
    fn name(&self) -> &str;

    /// Pick an option uniformly in `[0, option_count)`. Returns 0 when
    /// `option_count` is 0.
    fn choose_option(&self, option_count: usize) -> usize;

    /// Pick a thinking time uniformly in `[1, max_secs]` seconds. `max_secs`
    /// below 1 is treated as 1.
    fn think_time(&self, max_secs: u64) -> u64;
}
