//! Custom error types for the whisper-stt-server.
//!
//! This module provides a centralized error handling system using the `thiserror` crate
//! to define structured, typed errors with clear messages and proper error conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::future::Future;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Primary error type for the application, covering all possible error cases.
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors from invalid user input or requests.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Errors related to audio decoding or resampling.
    #[error("Audio processing error: {0}")]
    Audio(String),

    /// Errors occurring during model inference.
    #[error("Inference error: {0}")]
    Inference(String),

    /// Errors from invalid configuration or model loading.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors from the underlying IO system.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Timeouts in various operations.
    #[error("Operation timeout: {0}")]
    Timeout(String),

    /// Internal server errors.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// True for errors caused by a malformed request rather than a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

/// Implementation to convert AppError into an HTTP response for Axum.
///
/// Client errors map to 400 with an `{"error": ...}` body carrying the bare
/// message. Everything else is a processing failure and maps to 500 with an
/// `{"ok": false, "error": ...}` body so callers can branch on `ok` alone.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(message) => {
                let body = Json(json!({
                    "error": message,
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            other => {
                let body = Json(json!({
                    "ok": false,
                    "error": other.to_string(),
                }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

/// Convenience type alias for Results with AppError.
pub type Result<T> = std::result::Result<T, AppError>;

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Add context to the error.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to the error.
    fn with_static_context(self, context: &'static str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::Internal(format!("{}: {}", f(), e)))
    }

    fn with_static_context(self, context: &'static str) -> Result<T> {
        self.map_err(|e| AppError::Internal(format!("{}: {}", context, e)))
    }
}

/// Standardized async operation with timeout handling.
///
/// Errors from the operation itself pass through unchanged; only an elapsed
/// timeout is converted into [`AppError::Timeout`].
pub async fn with_timeout<T, F>(
    operation: F,
    timeout_duration: Duration,
    context: &'static str,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout_duration, operation).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Timeout(format!(
            "{}: operation timed out after {:?}",
            context, timeout_duration
        ))),
    }
}
