//! OAuth 2.0 Authorization Code Client
//!
//! Implements the two grants the Box token endpoint needs:
//! - `authorization_code` → refresh token (one time, after browser login)
//! - `refresh_token` → new refresh token + access token (every run)
//!
//! Both calls are sent once; there is no retry. Every exchange hands the raw
//! [`HttpResponse`] back to the caller, either inside [`Exchange`] or inside
//! [`AuthError::ExchangeFailed`].
//!
//! # Example
//!
//! ```no_run
//! use core_auth::oauth::{OAuthEndpoints, OAuthFlowManager};
//! use core_auth::StateToken;
//! use std::sync::Arc;
//!
//! # async fn example() -> core_auth::Result<()> {
//! # use bridge_traits::http::HttpClient;
//! # let http_client: Arc<dyn HttpClient> = todo!();
//! let config = core_runtime::CoreConfig::default();
//! let manager = OAuthFlowManager::new(OAuthEndpoints::from_config(&config), http_client);
//!
//! let state = StateToken::generate();
//! let url = manager.build_auth_url("my-client-id", &state, None)?;
//! println!("{}", url);
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::StateToken;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use core_runtime::logging::redact_if_sensitive;
use core_runtime::CoreConfig;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, trace, warn};
use url::Url;

/// Endpoints and redirect address for one OAuth2 provider.
#[derive(Debug, Clone)]
pub struct OAuthEndpoints {
    /// Authorization endpoint URL
    pub auth_url: String,
    /// Token endpoint URL
    pub token_url: String,
    /// Redirect URI for the local callback listener
    pub redirect_uri: String,
}

impl OAuthEndpoints {
    pub fn from_config(config: &CoreConfig) -> Self {
        Self {
            auth_url: config.authorize_url.clone(),
            token_url: config.token_url.clone(),
            redirect_uri: config.redirect_uri(),
        }
    }
}

/// Result of a token exchange along with the response that produced it.
#[derive(Debug, Clone)]
pub struct Exchange<T> {
    pub value: T,
    pub response: HttpResponse,
}

/// Tokens returned by the `refresh_token` grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedTokens {
    /// Replaces the stored refresh token
    pub refresh_token: String,
    /// Short-lived bearer token for API calls
    pub access_token: String,
}

/// Token endpoint success body. Fields are optional because a 200 without
/// them is reported as "no token", not as a parse failure.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Token endpoint error body
#[derive(Debug, Default, Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// OAuth 2.0 flow manager.
pub struct OAuthFlowManager {
    endpoints: OAuthEndpoints,
    http_client: Arc<dyn HttpClient>,
}

impl OAuthFlowManager {
    pub fn new(endpoints: OAuthEndpoints, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            endpoints,
            http_client,
        }
    }

    pub fn endpoints(&self) -> &OAuthEndpoints {
        &self.endpoints
    }

    /// Build the URL the operator opens in a browser.
    ///
    /// Query order: `response_type`, `client_id`, optional `box_login`,
    /// `state`, `redirect_uri`.
    #[instrument(skip(self, state))]
    pub fn build_auth_url(
        &self,
        client_id: &str,
        state: &StateToken,
        box_login: Option<&str>,
    ) -> Result<String> {
        let mut url = Url::parse(&self.endpoints.auth_url).map_err(|e| {
            AuthError::Parse(format!(
                "Invalid authorization URL '{}': {}",
                self.endpoints.auth_url, e
            ))
        })?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("response_type", "code");
            query.append_pair("client_id", client_id);
            if let Some(login) = box_login {
                query.append_pair("box_login", login);
            }
            query.append_pair("state", state.as_str());
            query.append_pair("redirect_uri", &self.endpoints.redirect_uri);
        }

        debug!(redirect_uri = %self.endpoints.redirect_uri, "Built authorization URL");
        Ok(url.into())
    }

    /// Exchange an authorization code for a refresh token.
    ///
    /// `value` is `None` when the endpoint answered 200 without a
    /// `refresh_token` field.
    #[instrument(skip(self, client_secret, code))]
    pub async fn exchange_code_for_refresh_token(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
    ) -> Result<Exchange<Option<String>>> {
        let response = self
            .post_grant(
                "authorization_code",
                &[
                    ("grant_type", "authorization_code"),
                    ("client_id", client_id),
                    ("client_secret", client_secret),
                    ("code", code),
                ],
            )
            .await?;

        let body: TokenResponse = parse_token_body(&response)?;
        if body.refresh_token.is_none() {
            warn!("Token endpoint returned no refresh_token");
        } else {
            info!("Exchanged authorization code for refresh token");
        }

        Ok(Exchange {
            value: body.refresh_token,
            response,
        })
    }

    /// Exchange a refresh token for a new refresh token and an access token.
    ///
    /// `value` is `None` unless both tokens are present in a 200 response.
    #[instrument(skip(self, client_secret, refresh_token))]
    pub async fn exchange_refresh_token_for_access_token(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<Exchange<Option<RefreshedTokens>>> {
        let response = self
            .post_grant(
                "refresh_token",
                &[
                    ("grant_type", "refresh_token"),
                    ("client_id", client_id),
                    ("client_secret", client_secret),
                    ("refresh_token", refresh_token),
                ],
            )
            .await?;

        let body: TokenResponse = parse_token_body(&response)?;
        let value = match (body.refresh_token, body.access_token) {
            (Some(refresh_token), Some(access_token)) => {
                info!("Refreshed access token");
                Some(RefreshedTokens {
                    refresh_token,
                    access_token,
                })
            }
            _ => {
                warn!("Token endpoint response is missing refresh_token or access_token");
                None
            }
        };

        Ok(Exchange { value, response })
    }

    async fn post_grant(&self, grant_type: &str, fields: &[(&str, &str)]) -> Result<HttpResponse> {
        let redacted: Vec<String> = fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, redact_if_sensitive(k, v)))
            .collect();
        trace!(form = ?redacted, "Token request");

        let request = HttpRequest::new(HttpMethod::Post, self.endpoints.token_url.clone())
            .form(fields)
            .map_err(|e| AuthError::Parse(format!("Failed to encode token request: {}", e)))?;

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if response.is_success() {
            return Ok(response);
        }

        let status = response.status;
        let detail: TokenErrorResponse = response.json().unwrap_or_default();

        warn!(
            status = status,
            grant_type = grant_type,
            error = detail.error.as_deref().unwrap_or("-"),
            error_description = detail.error_description.as_deref().unwrap_or("-"),
            "Token exchange failed"
        );

        Err(AuthError::ExchangeFailed {
            grant_type: grant_type.to_string(),
            status,
            error: detail.error,
            error_description: detail.error_description,
            response: Box::new(response),
        })
    }
}

fn parse_token_body(response: &HttpResponse) -> Result<TokenResponse> {
    response
        .json()
        .map_err(|e| AuthError::Parse(format!("Failed to parse token response: {}", e)))
}
