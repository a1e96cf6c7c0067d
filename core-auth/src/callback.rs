//! One-shot local listener for the OAuth2 redirect.
//!
//! The listener accepts exactly one connection, answers it with a plain-text
//! status and shuts down. Binding is separate from waiting so the caller can
//! print the authorization URL once the port is known to be free.

use crate::error::{AuthError, Result};
use crate::types::StateToken;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// Upper bound on the request head we are willing to buffer
const MAX_REQUEST_HEAD: usize = 8192;

/// What the single callback request told us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// `code` present and `state` matched
    Authorized { code: String },
    /// `code` present but `state` missing or wrong
    StateMismatch,
    /// Provider redirected with `error`
    ProviderDenied {
        error: String,
        description: Option<String>,
    },
    /// Neither `code` nor `error`; carries the raw query string
    Malformed { query: String },
}

impl CallbackOutcome {
    /// Map the outcome onto a `Result`, handing back the code on success.
    pub fn into_code(self) -> Result<String> {
        match self {
            CallbackOutcome::Authorized { code } => Ok(code),
            CallbackOutcome::StateMismatch => Err(AuthError::StateMismatch),
            CallbackOutcome::ProviderDenied { error, description } => {
                Err(AuthError::ProviderDenied { error, description })
            }
            CallbackOutcome::Malformed { query } => Err(AuthError::MalformedCallback(query)),
        }
    }
}

/// A bound, not yet accepting, callback listener.
pub struct CallbackListener {
    listener: TcpListener,
}

impl CallbackListener {
    /// Bind `host:port`. Fails if the port is taken.
    pub async fn bind(host: &str, port: u16) -> Result<Self> {
        let listener = TcpListener::bind((host, port))
            .await
            .map_err(AuthError::Listener)?;
        debug!(host = host, port = port, "Callback listener bound");
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().map_err(AuthError::Listener)
    }

    /// Wait for one request, answer it, and report what it carried.
    ///
    /// Consumes both the listener and the expected state, so neither can be
    /// reused for a second request.
    pub async fn accept_one(self, expected: StateToken) -> Result<CallbackOutcome> {
        let (mut socket, peer) = self.listener.accept().await.map_err(AuthError::Listener)?;
        debug!(peer = %peer, "Callback connection accepted");

        let head = read_request_head(&mut socket).await?;
        let query = match extract_query(&head) {
            Some(query) => query,
            None => {
                let reply = head.lines().next().unwrap_or_default().to_string();
                write_response(&mut socket, 400, &reply).await;
                return Ok(CallbackOutcome::Malformed { query: reply });
            }
        };

        let (outcome, status, body) = classify(&query, expected);
        match status {
            200 => info!("Authorization code received"),
            _ => warn!(status = status, body = %body, "Callback rejected"),
        }
        write_response(&mut socket, status, &body).await;

        Ok(outcome)
    }
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) -> Result<String> {
    let mut buffer = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];

    loop {
        let read = socket.read(&mut chunk).await.map_err(AuthError::Listener)?;
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
        if buffer.windows(4).any(|w| w == b"\r\n\r\n") || buffer.len() >= MAX_REQUEST_HEAD {
            break;
        }
    }

    if buffer.is_empty() {
        return Err(AuthError::MalformedCallback("empty request".to_string()));
    }

    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Query string of the request target, or `""` when the target has none.
/// Returns `None` if the request line is not `<METHOD> <target> ...`.
fn extract_query(head: &str) -> Option<String> {
    let request_line = head.lines().next()?;
    let mut parts = request_line.split_whitespace();
    let _method = parts.next()?;
    let target = parts.next()?;

    Some(
        target
            .split_once('?')
            .map(|(_, query)| query.to_string())
            .unwrap_or_default(),
    )
}

/// Decide the outcome and the HTTP reply for a callback query string.
fn classify(query: &str, expected: StateToken) -> (CallbackOutcome, u16, String) {
    let mut code = None;
    let mut state = None;
    let mut error = None;
    let mut error_description = None;

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        // Blank values count as absent; first non-blank occurrence wins
        if value.is_empty() {
            continue;
        }
        let slot = match key.as_ref() {
            "code" => &mut code,
            "state" => &mut state,
            "error" => &mut error,
            "error_description" => &mut error_description,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }

    if let Some(code) = code {
        return if expected.verify(state.as_deref()) {
            (
                CallbackOutcome::Authorized { code },
                200,
                "Authorization code received.".to_string(),
            )
        } else {
            (
                CallbackOutcome::StateMismatch,
                401,
                "Anti-forgery token invalid.".to_string(),
            )
        };
    }

    if let Some(error) = error {
        let body = match &error_description {
            Some(description) => format!("Error: {}.", description),
            None => format!("Error: {}.", query),
        };
        return (
            CallbackOutcome::ProviderDenied {
                error,
                description: error_description,
            },
            403,
            body,
        );
    }

    (
        CallbackOutcome::Malformed {
            query: query.to_string(),
        },
        400,
        query.to_string(),
    )
}

async fn write_response(socket: &mut tokio::net::TcpStream, status: u16, body: &str) {
    let reason = match status {
        200 => "OK",
        401 => "Unauthorized",
        403 => "Forbidden",
        _ => "Bad Request",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    if let Err(e) = socket.write_all(response.as_bytes()).await {
        warn!(error = %e, "Failed to write callback response");
    }
    let _ = socket.shutdown().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(value: &str) -> StateToken {
        StateToken::from(value.to_string())
    }

    #[test]
    fn test_classify_authorized() {
        let (outcome, status, body) = classify("state=s1&code=abc", state("s1"));
        assert_eq!(
            outcome,
            CallbackOutcome::Authorized {
                code: "abc".to_string()
            }
        );
        assert_eq!(status, 200);
        assert_eq!(body, "Authorization code received.");
    }

    #[test]
    fn test_classify_state_mismatch() {
        let (outcome, status, body) = classify("state=evil&code=abc", state("s1"));
        assert_eq!(outcome, CallbackOutcome::StateMismatch);
        assert_eq!(status, 401);
        assert_eq!(body, "Anti-forgery token invalid.");
    }

    #[test]
    fn test_classify_missing_state() {
        let (outcome, status, _) = classify("code=abc", state("s1"));
        assert_eq!(outcome, CallbackOutcome::StateMismatch);
        assert_eq!(status, 401);
    }

    #[test]
    fn test_classify_provider_error() {
        let (outcome, status, body) = classify(
            "error=access_denied&error_description=The+user+denied+access",
            state("s1"),
        );
        assert_eq!(status, 403);
        assert_eq!(body, "Error: The user denied access.");
        assert_eq!(
            outcome,
            CallbackOutcome::ProviderDenied {
                error: "access_denied".to_string(),
                description: Some("The user denied access".to_string()),
            }
        );
    }

    #[test]
    fn test_classify_provider_error_without_description() {
        let (_, status, body) = classify("error=server_error", state("s1"));
        assert_eq!(status, 403);
        assert_eq!(body, "Error: error=server_error.");
    }

    #[test]
    fn test_classify_other() {
        let (outcome, status, body) = classify("foo=bar", state("s1"));
        assert_eq!(status, 400);
        assert_eq!(body, "foo=bar");
        assert!(matches!(outcome, CallbackOutcome::Malformed { .. }));
    }

    #[test]
    fn test_classify_blank_values_are_absent() {
        let (outcome, status, body) = classify("code=&state=s1", state("s1"));
        assert_eq!(status, 400);
        assert_eq!(body, "code=&state=s1");
        assert!(matches!(outcome, CallbackOutcome::Malformed { .. }));

        let (outcome, status, _) = classify("error=&state=s1", state("s1"));
        assert_eq!(status, 400);
        assert!(matches!(outcome, CallbackOutcome::Malformed { .. }));

        let (outcome, _, _) = classify("code=&code=abc&state=s1", state("s1"));
        assert_eq!(
            outcome,
            CallbackOutcome::Authorized {
                code: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_extract_query() {
        assert_eq!(
            extract_query("GET /?code=1&state=2 HTTP/1.1\r\nHost: x\r\n\r\n"),
            Some("code=1&state=2".to_string())
        );
        assert_eq!(extract_query("GET / HTTP/1.1\r\n\r\n"), Some(String::new()));
        assert_eq!(extract_query("garbage"), None);
    }

    #[test]
    fn test_into_code() {
        assert_eq!(
            CallbackOutcome::Authorized {
                code: "c".to_string()
            }
            .into_code()
            .unwrap(),
            "c"
        );
        assert!(matches!(
            CallbackOutcome::StateMismatch.into_code(),
            Err(AuthError::StateMismatch)
        ));
    }

    #[tokio::test]
    async fn test_listener_answers_single_request() {
        let listener = CallbackListener::bind("127.0.0.1", 0).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(listener.accept_one(state("s1")));

        let mut client = tokio::net::TcpStream::connect(addr).await.unwrap();
        client
            .write_all(b"GET /?code=abc&state=s1 HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();
        let mut reply = String::new();
        client.read_to_string(&mut reply).await.unwrap();

        assert!(reply.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(reply.ends_with("Authorization code received."));

        let outcome = server.await.unwrap().unwrap();
        assert_eq!(
            outcome,
            CallbackOutcome::Authorized {
                code: "abc".to_string()
            }
        );

        // Listener is gone after one request
        assert!(tokio::net::TcpStream::connect(addr).await.is_err());
    }
}
