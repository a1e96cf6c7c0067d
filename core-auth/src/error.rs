use bridge_traits::error::BridgeError;
use bridge_traits::http::HttpResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Credential storage error: {0}")]
    Storage(#[from] BridgeError),

    /// The token endpoint answered with a non-success status. The raw
    /// response is kept for diagnostics.
    #[error(
        "Error: grant_type={grant_type} (HTTP {status}{})",
        describe_provider_error(.error, .error_description)
    )]
    ExchangeFailed {
        grant_type: String,
        status: u16,
        error: Option<String>,
        error_description: Option<String>,
        response: Box<HttpResponse>,
    },

    #[error("Anti-forgery token invalid.")]
    StateMismatch,

    #[error("Authorization denied: {error}{}", .description.as_deref().map(|d| format!(": {}", d)).unwrap_or_default())]
    ProviderDenied {
        error: String,
        description: Option<String>,
    },

    #[error("Malformed callback: {0}")]
    MalformedCallback(String),

    #[error("Callback listener error: {0}")]
    Listener(#[source] std::io::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

fn describe_provider_error(error: &Option<String>, description: &Option<String>) -> String {
    match (error, description) {
        (Some(error), Some(description)) => format!(", error: {}, error_description: {}", error, description),
        (Some(error), None) => format!(", error: {}", error),
        _ => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::collections::HashMap;

    #[test]
    fn test_exchange_failed_display() {
        let err = AuthError::ExchangeFailed {
            grant_type: "refresh_token".to_string(),
            status: 400,
            error: Some("invalid_grant".to_string()),
            error_description: Some("Refresh token has expired".to_string()),
            response: Box::new(HttpResponse {
                status: 400,
                headers: HashMap::new(),
                body: Bytes::new(),
            }),
        };

        assert_eq!(
            err.to_string(),
            "Error: grant_type=refresh_token (HTTP 400, error: invalid_grant, \
             error_description: Refresh token has expired)"
        );
    }

    #[test]
    fn test_provider_denied_display() {
        let err = AuthError::ProviderDenied {
            error: "access_denied".to_string(),
            description: None,
        };
        assert_eq!(err.to_string(), "Authorization denied: access_denied");
    }
}
