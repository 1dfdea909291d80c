//! Error types for the sklad client.

use sklad_core::{ApiError, CoreError};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when using the sklad client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from server.
        message: String,
        /// Structured error records, when the body was an error document.
        errors: Vec<ApiError>,
    },

    /// Failed to deserialize response.
    #[error("Failed to deserialize response: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// Entity could not be classified or decoded.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid response format.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// The caller cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,

    /// An asynchronous operation did not finish in time.
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// An asynchronous operation finished with errors.
    #[error("Async operation failed: {}", join_messages(.errors))]
    AsyncFailed {
        /// Errors reported by the task.
        errors: Vec<ApiError>,
    },

    /// Client configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

fn join_messages(errors: &[ApiError]) -> String {
    errors
        .iter()
        .map(|e| e.error.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ClientError {
    /// HTTP status of an API error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the server rejected the request (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Whether retrying the same request may succeed.
    ///
    /// Covers server errors, rate limiting and transport timeouts or
    /// connection failures. The client itself never retries.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) if e.is_timeout() || e.is_connect() => true,
            _ => self
                .status()
                .is_some_and(|s| s == 429 || (500..600).contains(&s)),
        }
    }

    /// Whether the error reports a missing entity.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api { status, errors, .. } => {
                *status == 404 || errors.iter().any(ApiError::is_not_found)
            }
            _ => false,
        }
    }

    /// Whether the operation was cancelled by the caller.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use sklad_core::ENTITY_NOT_FOUND_CODE;

    fn api(status: u16, code: Option<i64>) -> ClientError {
        ClientError::Api {
            status,
            message: "failed".to_string(),
            errors: vec![ApiError::new("failed", code)],
        }
    }

    #[test]
    fn test_classification() {
        assert!(api(400, None).is_client_error());
        assert!(!api(400, None).is_transient());
        assert!(api(503, None).is_transient());
        assert!(api(429, None).is_transient());
        assert!(api(429, None).is_client_error());
        assert!(api(404, None).is_not_found());
        assert!(api(400, Some(ENTITY_NOT_FOUND_CODE)).is_not_found());
        assert!(ClientError::Cancelled.is_cancelled());
        assert!(!ClientError::Timeout(Duration::from_secs(1)).is_transient());
    }

    #[test]
    fn test_async_failed_message() {
        let error = ClientError::AsyncFailed {
            errors: vec![ApiError::new("first", None), ApiError::new("second", None)],
        };
        assert_eq!(error.to_string(), "Async operation failed: first; second");
    }
}
