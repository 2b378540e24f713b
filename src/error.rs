// src/error.rs

//! Unified error handling for the odds feed.

use std::fmt;

use thiserror::Error;

/// Result type alias for feed operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Event id discovery failed
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// Rendering surface failed
    #[error("Browser error during {context}: {message}")]
    Browser { context: String, message: String },

    /// A wait on the rendered document ran out of time
    #[error("Timed out after {waited_ms}ms waiting for {context}")]
    Timeout { context: String, waited_ms: u64 },

    /// Snapshot could not be written or moved into place
    #[error("Publish error: {0}")]
    Publish(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a discovery error.
    pub fn discovery(message: impl Into<String>) -> Self {
        Self::Discovery(message.into())
    }

    /// Create a browser error with context.
    pub fn browser(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Browser {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(context: impl Into<String>, waited_ms: u64) -> Self {
        Self::Timeout {
            context: context.into(),
            waited_ms,
        }
    }

    /// Create a publish error.
    pub fn publish(message: impl fmt::Display) -> Self {
        Self::Publish(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_error_message() {
        let err = AppError::browser("goto https://x/1", "connection refused");
        assert_eq!(
            err.to_string(),
            "Browser error during goto https://x/1: connection refused"
        );
    }

    #[test]
    fn test_timeout_message() {
        let err = AppError::timeout("content", 7000);
        assert!(err.to_string().contains("7000ms"));
    }
}
