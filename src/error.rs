// src/error.rs

//! Unified error handling for the site content client.

use std::fmt;

use thiserror::Error;

/// Result type alias for content client operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request failed before a response arrived
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("HTTP error: {status}")]
    HttpStatus { status: u16, status_text: String },

    /// No response within the configured window
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Response body is not valid JSON
    #[error("Invalid JSON response: {0}")]
    Parse(#[source] serde_json::Error),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Section slug not in the catalogue
    #[error("Unknown section: {0}")]
    UnknownSection(String),

    /// Section fetch failed
    #[error("Fetch failed for {context}: {message}")]
    Fetch { context: String, message: String },

    /// Path not in the route table
    #[error("No route for path: {0}")]
    UnknownRoute(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a fetch error with context.
    pub fn fetch(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create an HTTP status error from a response status.
    pub fn http_status(status: reqwest::StatusCode) -> Self {
        Self::HttpStatus {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
        }
    }

    /// Whether this error came from the request timeout firing.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_message_carries_code() {
        let err = AppError::http_status(reqwest::StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "HTTP error: 404");
        match err {
            AppError::HttpStatus { status_text, .. } => assert_eq!(status_text, "Not Found"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_timeout_is_flagged() {
        let err = AppError::Timeout { timeout_ms: 250 };
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "Request timed out after 250ms");
    }
}
