//! HTTP client configuration

use std::time::Duration;

use thiserror::Error;

/// Default quiz service address
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Configuration validation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// The base URL is empty or not http(s).
    #[error("invalid base url: {0:?}")]
    InvalidBaseUrl(String),

    /// A timeout value is out of acceptable range.
    #[error("invalid timeout: {0:?}")]
    InvalidTimeout(Duration),
}

/// Settings for [`crate::HttpQuizClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Service root, e.g. `http://localhost:5000`
    pub base_url: String,

    /// Per-call timeout
    pub request_timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Maximum idle connections kept to the service
    pub pool_max_idle_per_host: usize,

    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            pool_max_idle_per_host: 200,
            user_agent: format!("quiz-bots/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create config for the given service root.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the per-call timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Base URL without trailing slashes.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let url = self.normalized_base_url();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigValidationError::InvalidBaseUrl(self.base_url.clone()));
        }

        // 1ms to 1h per call
        if self.request_timeout.is_zero() || self.request_timeout > Duration::from_secs(3600) {
            return Err(ConfigValidationError::InvalidTimeout(self.request_timeout));
        }
        if self.connect_timeout.is_zero() || self.connect_timeout > Duration::from_secs(300) {
            return Err(ConfigValidationError::InvalidTimeout(self.connect_timeout));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("quiz-bots/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ClientConfig::new("https://quiz.example.com//");
        assert_eq!(config.normalized_base_url(), "https://quiz.example.com");
    }

    #[test]
    fn test_invalid_base_url() {
        for url in ["", "localhost:5000", "ftp://quiz"] {
            assert!(matches!(
                ClientConfig::new(url).validate(),
                Err(ConfigValidationError::InvalidBaseUrl(_))
            ));
        }
    }

    #[test]
    fn test_invalid_timeout() {
        let config = ClientConfig::default().with_request_timeout(Duration::ZERO);
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidTimeout(Duration::ZERO))
        );

        let config = ClientConfig::default().with_connect_timeout(Duration::from_secs(900));
        assert!(config.validate().is_err());
    }
}
