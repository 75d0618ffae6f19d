//! HTTP client for the quiz service
//!
//! This crate implements `QuizApi` over `reqwest`:
//!
//! - `GET  /api/status`
//! - `GET  /api/quiz`
//! - `POST /api/quiz/start`
//! - `POST /api/client/connect`
//! - `POST /api/client/submit`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod http;

pub use config::{ClientConfig, ConfigValidationError};
pub use http::{ClientError, HttpQuizClient};
