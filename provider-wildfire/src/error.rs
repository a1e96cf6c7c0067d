//! Error types for the WildFire provider

use thiserror::Error;

/// WildFire errors
///
/// These are scoped to one file: the walker logs them and continues.
#[derive(Error, Debug)]
pub enum WildFireError {
    /// `.panrc` missing, unreadable, or without an `api_key`
    #[error("WildFire configuration error: {0}")]
    Config(String),

    /// API answered with a non-200 status
    #[error("{action}: {status} {reason}{}", .message.as_deref().map(|m| format!(": {}", m)).unwrap_or_default())]
    ApiError {
        action: &'static str,
        status: u16,
        reason: &'static str,
        message: Option<String>,
    },

    /// Response body was not the expected XML document
    #[error("Failed to parse WildFire {action} response: {message}")]
    ParseError {
        action: &'static str,
        message: String,
    },

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Result type for WildFire operations
pub type Result<T> = std::result::Result<T, WildFireError>;
