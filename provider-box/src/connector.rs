//! Box Content API connector
//!
//! Three read-only calls against `https://api.box.com/2.0/`:
//! folder listing, file metadata, and the content redirect.

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, instrument, trace, warn};

use crate::error::{BoxError, Result};
use crate::types::{FileInfo, FolderListing};
use crate::www_authenticate::parse_www_authenticate;

/// Box API base URL
pub const BOX_API_BASE: &str = "https://api.box.com/2.0/";

/// Id of the "All Files" root folder
pub const ROOT_FOLDER_ID: &str = "0";

/// Box API connector
///
/// # Example
///
/// ```ignore
/// use provider_box::{BoxConnector, ROOT_FOLDER_ID};
///
/// let connector = BoxConnector::new(http_client, access_token);
/// let listing = connector.folder(ROOT_FOLDER_ID).await?;
/// ```
pub struct BoxConnector {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// OAuth 2.0 access token
    access_token: String,

    /// API base, always ending in `/`
    api_base: String,
}

impl BoxConnector {
    /// Create a connector against the public Box API
    pub fn new(http_client: Arc<dyn HttpClient>, access_token: String) -> Self {
        Self::with_api_base(http_client, access_token, BOX_API_BASE)
    }

    /// Create a connector against another API base (must end with `/`)
    pub fn with_api_base(
        http_client: Arc<dyn HttpClient>,
        access_token: String,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            access_token,
            api_base: api_base.into(),
        }
    }

    /// `GET folders/{id}`
    #[instrument(skip(self))]
    pub async fn folder(&self, id: &str) -> Result<FolderListing> {
        let url = format!("{}folders/{}", self.api_base, id);
        let response = self.get(url, true).await?;
        self.expect_ok(&response, "folder", id)?;
        parse_json(&response)
    }

    /// `GET files/{id}`
    #[instrument(skip(self))]
    pub async fn file(&self, id: &str) -> Result<FileInfo> {
        let url = format!("{}files/{}", self.api_base, id);
        let response = self.get(url, true).await?;
        self.expect_ok(&response, "file", id)?;
        parse_json(&response)
    }

    /// `GET files/{id}/content` without following the redirect.
    ///
    /// Returns the short-lived download URL from the `Location` header.
    #[instrument(skip(self))]
    pub async fn file_content_location(&self, id: &str) -> Result<String> {
        let url = format!("{}files/{}/content", self.api_base, id);
        let response = self.get(url, false).await?;

        if response.status != 302 {
            self.check_auth(&response, "file", id)?;
            return Err(api_error(&response, "file", id));
        }

        let location = response
            .header("location")
            .ok_or_else(|| BoxError::MissingLocation {
                file_id: id.to_string(),
            })?;

        trace!(location = location, "Download location");
        Ok(location.to_string())
    }

    async fn get(&self, url: String, follow_redirects: bool) -> Result<HttpResponse> {
        let mut request = HttpRequest::new(HttpMethod::Get, url)
            .bearer_token(&self.access_token)
            .header("Accept", "application/json");
        if !follow_redirects {
            request = request.no_redirect();
        }

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| BoxError::NetworkError(e.to_string()))?;

        debug!(status = response.status, "Box API response");
        trace!(headers = ?response.headers, "Box API response headers");
        Ok(response)
    }

    fn expect_ok(&self, response: &HttpResponse, resource: &'static str, id: &str) -> Result<()> {
        if response.status == 200 {
            return Ok(());
        }
        self.check_auth(response, resource, id)?;
        Err(api_error(response, resource, id))
    }

    /// Turn a 401/403 into [`BoxError::Unauthorized`] using the challenge header.
    fn check_auth(&self, response: &HttpResponse, resource: &'static str, id: &str) -> Result<()> {
        if response.status != 401 && response.status != 403 {
            return Ok(());
        }

        let challenge = response
            .header("www-authenticate")
            .map(parse_www_authenticate)
            .unwrap_or_default();

        warn!(
            status = response.status,
            error = challenge.error.as_deref().unwrap_or("-"),
            "Box rejected the access token"
        );

        Err(BoxError::Unauthorized {
            resource,
            id: id.to_string(),
            status: response.status,
            error: challenge.error,
            description: challenge.error_description,
        })
    }
}

fn api_error(response: &HttpResponse, resource: &'static str, id: &str) -> BoxError {
    let message = response
        .text()
        .unwrap_or_else(|_| "Unable to read error response".to_string());

    BoxError::ApiError {
        resource,
        id: id.to_string(),
        status: response.status,
        message,
    }
}

fn parse_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    response
        .json()
        .map_err(|e| BoxError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    fn response(status: u16, headers: &[(&str, &str)], body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
            body: Bytes::from(body.to_string()),
        }
    }

    #[tokio::test]
    async fn test_folder_request_shape() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .withf(|req| {
                req.url == "https://api.box.com/2.0/folders/0"
                    && req.headers.get("Authorization").map(String::as_str) == Some("Bearer tok")
                    && req.follow_redirects
            })
            .returning(|_| {
                Ok(response(
                    200,
                    &[],
                    r#"{"id":"0","name":"All Files","item_collection":{"entries":[]}}"#,
                ))
            });

        let connector = BoxConnector::new(Arc::new(mock), "tok".to_string());
        let listing = connector.folder(ROOT_FOLDER_ID).await.unwrap();
        assert_eq!(listing.name, "All Files");
    }

    #[tokio::test]
    async fn test_content_location_does_not_follow_redirect() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .withf(|req| req.url.ends_with("files/7/content") && !req.follow_redirects)
            .returning(|_| {
                Ok(response(
                    302,
                    &[("Location", "https://dl.boxcloud.com/d/1/abc/download")],
                    "",
                ))
            });

        let connector = BoxConnector::new(Arc::new(mock), "tok".to_string());
        assert_eq!(
            connector.file_content_location("7").await.unwrap(),
            "https://dl.boxcloud.com/d/1/abc/download"
        );
    }

    #[tokio::test]
    async fn test_content_without_location() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .returning(|_| Ok(response(302, &[], "")));

        let connector = BoxConnector::new(Arc::new(mock), "tok".to_string());
        assert!(matches!(
            connector.file_content_location("7").await,
            Err(BoxError::MissingLocation { .. })
        ));
    }

    #[tokio::test]
    async fn test_content_not_redirected_is_error() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .returning(|_| Ok(response(202, &[("Retry-After", "10")], "")));

        let connector = BoxConnector::new(Arc::new(mock), "tok".to_string());
        assert!(matches!(
            connector.file_content_location("7").await,
            Err(BoxError::ApiError { status: 202, .. })
        ));
    }

    #[tokio::test]
    async fn test_unauthorized_reads_challenge() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute().returning(|_| {
            Ok(response(
                401,
                &[(
                    "WWW-Authenticate",
                    r#"Bearer realm="Service", error="invalid_token", error_description="The access token provided is invalid.""#,
                )],
                "",
            ))
        });

        let connector = BoxConnector::new(Arc::new(mock), "expired".to_string());
        match connector.file("42").await.unwrap_err() {
            BoxError::Unauthorized {
                resource,
                id,
                status,
                error,
                description,
            } => {
                assert_eq!(resource, "file");
                assert_eq!(id, "42");
                assert_eq!(status, 401);
                assert_eq!(error.as_deref(), Some("invalid_token"));
                assert_eq!(
                    description.as_deref(),
                    Some("The access token provided is invalid.")
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_not_found_is_api_error() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .returning(|_| Ok(response(404, &[], r#"{"type":"error","status":404}"#)));

        let connector = BoxConnector::new(Arc::new(mock), "tok".to_string());
        assert!(matches!(
            connector.folder("123").await,
            Err(BoxError::ApiError { status: 404, .. })
        ));
    }
}
