// src/error.rs

//! Unified error handling for the course watcher.

use std::fmt;

use thiserror::Error;

/// Result type alias for watcher operations.
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

    /// Stored last-check timestamp could not be parsed
    #[error("Malformed timestamp in {location}: {value:?} ({message})")]
    Timestamp {
        location: String,
        value: String,
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Course data could not be fetched
    #[error("Fetch error for {context}: {message}")]
    Fetch { context: String, message: String },

    /// Chat message could not be delivered
    #[error("Notify error: {0}")]
    Notify(String),
}

impl AppError {
    /// Create a malformed timestamp error.
    pub fn timestamp(
        location: impl Into<String>,
        value: impl Into<String>,
        message: impl fmt::Display,
    ) -> Self {
        Self::Timestamp {
            location: location.into(),
            value: value.into(),
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

    /// Create a fetch error with context.
    pub fn fetch(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a notify error.
    pub fn notify(message: impl fmt::Display) -> Self {
        Self::Notify(message.to_string())
    }

    /// Whether the watch loop must stop on this error.
    ///
    /// Operator-facing problems (bad config, corrupt watermark) never fix
    /// themselves on the next tick; network failures might.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Timestamp { .. } | Self::Config(_) | Self::Validation(_) | Self::Toml(_) | Self::Url(_)
        )
    }
}
