//! Error types for the Box provider

use thiserror::Error;

/// Box provider errors
///
/// Every variant ends the walk; there is no per-item recovery at this layer.
#[derive(Error, Debug)]
pub enum BoxError {
    /// Box rejected the bearer token (HTTP 401/403). `error` and
    /// `description` come from the `WWW-Authenticate` challenge.
    #[error("Box authorization failed for {resource} {id} (status {status}){}", describe(.error, .description))]
    Unauthorized {
        resource: &'static str,
        id: String,
        status: u16,
        error: Option<String>,
        description: Option<String>,
    },

    /// API request returned an unexpected status
    #[error("Box API error for {resource} {id} (status {status}): {message}")]
    ApiError {
        resource: &'static str,
        id: String,
        status: u16,
        message: String,
    },

    /// Content request answered 302 without a `Location` header
    #[error("No download location for file {file_id}")]
    MissingLocation { file_id: String },

    /// Failed to parse API response
    #[error("Failed to parse Box response: {0}")]
    ParseError(String),

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),
}

fn describe(error: &Option<String>, description: &Option<String>) -> String {
    let mut out = String::new();
    if let Some(error) = error {
        out.push_str(&format!("\nerror: {}", error));
    }
    if let Some(description) = description {
        out.push_str(&format!("\nerror_description: {}", description));
    }
    out
}

/// Result type for Box operations
pub type Result<T> = std::result::Result<T, BoxError>;
