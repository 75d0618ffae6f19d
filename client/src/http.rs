//! `reqwest` implementation of [`QuizApi`]

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use quiz_bots_core::{
    ApiError, ConnectRequest, ConnectResponse, Quiz, QuizApi, QuizStatus, SubmissionPayload,
    SubmitResult,
};

use crate::config::{ClientConfig, ConfigValidationError};

/// Failure to construct an [`HttpQuizClient`]
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration rejected
    #[error(transparent)]
    Config(#[from] ConfigValidationError),

    /// The HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Error body the quiz service returns on non-2xx responses
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Quiz service client over HTTP/JSON.
///
/// One pooled `reqwest::Client` is shared by every bot; each call is a single
/// request with no retries.
///
/// # Example
///
/// ```rust,ignore
/// let client = HttpQuizClient::new(ClientConfig::new("http://localhost:5000"))?;
/// let status = client.status().await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpQuizClient {
    client: Client,
    base_url: String,
    config: ClientConfig,
}

impl HttpQuizClient {
    /// Create a client for `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;

        let client = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: config.normalized_base_url().to_string(),
            config,
        })
    }

    /// Get the configuration for this client.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(ApiError::HttpStatus {
                code: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(request).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn transport_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(self.config.request_timeout)
        } else if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Transport(error.to_string())
        }
    }
}

/// The service's `error` field when present, otherwise the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[async_trait]
impl QuizApi for HttpQuizClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn connect(&self, name: &str) -> Result<ConnectResponse, ApiError> {
        let body = ConnectRequest {
            name: name.to_string(),
        };
        self.send_json(self.client.post(self.url("/api/client/connect")).json(&body))
            .await
    }

    async fn status(&self) -> Result<QuizStatus, ApiError> {
        self.send_json(self.client.get(self.url("/api/status"))).await
    }

    async fn fetch_quiz(&self) -> Result<Quiz, ApiError> {
        self.send_json(self.client.get(self.url("/api/quiz"))).await
    }

    async fn start_quiz(&self) -> Result<(), ApiError> {
        let body = self
            .send(
                self.client
                    .post(self.url("/api/quiz/start"))
                    .json(&serde_json::json!({})),
            )
            .await?;
        tracing::debug!(response = %body, "Start quiz accepted");
        Ok(())
    }

    async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmitResult, ApiError> {
        self.send_json(self.client.post(self.url("/api/client/submit")).json(payload))
            .await
    }
}
