//! WildFire public API client
//!
//! Two calls, both `multipart/form-data` POSTs answered with XML:
//! - `submit/url`: hand WildFire a download URL to fetch and analyse
//! - `get/verdict`: look up the verdict for a SHA-256

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, instrument, trace, warn};

use crate::error::{Result, WildFireError};
use crate::panrc::PanRc;
use crate::types::{
    status_reason, ErrorResponse, SubmitResponse, UploadFileInfo, VerdictInfo, VerdictResponse,
};

pub struct WildFireClient {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    /// `https://<hostname>/publicapi/`
    base_url: String,
}

impl WildFireClient {
    pub fn new(http_client: Arc<dyn HttpClient>, panrc: PanRc) -> Self {
        let base_url = format!("https://{}/publicapi/", panrc.hostname);
        Self::with_base_url(http_client, panrc.api_key, base_url)
    }

    /// Point the client at an explicit API root (must end with `/`)
    pub fn with_base_url(
        http_client: Arc<dyn HttpClient>,
        api_key: String,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            api_key,
            base_url: base_url.into(),
        }
    }

    /// Submit a URL for analysis.
    #[instrument(skip(self, url))]
    pub async fn submit_url(&self, url: &str) -> Result<UploadFileInfo> {
        let response = self
            .post("submit", "submit/url", &[("apikey", self.api_key.as_str()), ("url", url)])
            .await?;
        let parsed: SubmitResponse = parse_xml("submit", &response)?;
        debug!(
            sha256 = %parsed.upload_file_info.sha256,
            filetype = parsed.upload_file_info.filetype.as_deref().unwrap_or("-"),
            "Submitted URL"
        );
        Ok(parsed.upload_file_info)
    }

    /// Look up the verdict for `sha256`.
    #[instrument(skip(self))]
    pub async fn verdict(&self, sha256: &str) -> Result<VerdictInfo> {
        let response = self
            .post("verdict", "get/verdict", &[("apikey", self.api_key.as_str()), ("hash", sha256)])
            .await?;
        let parsed: VerdictResponse = parse_xml("verdict", &response)?;
        Ok(parsed.verdict_info)
    }

    async fn post(
        &self,
        action: &'static str,
        path: &str,
        fields: &[(&str, &str)],
    ) -> Result<HttpResponse> {
        let request = HttpRequest::new(HttpMethod::Post, format!("{}{}", self.base_url, path))
            .multipart_text(fields);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| WildFireError::NetworkError(e.to_string()))?;

        trace!(
            action = action,
            status = response.status,
            body = %String::from_utf8_lossy(&response.body),
            "WildFire response"
        );

        if response.status == 200 {
            return Ok(response);
        }

        let message = response
            .text()
            .ok()
            .and_then(|body| quick_xml::de::from_str::<ErrorResponse>(&body).ok())
            .map(|e| e.error_message.trim_matches('\'').to_string());

        warn!(
            action = action,
            status = response.status,
            reason = status_reason(response.status),
            "WildFire request failed"
        );

        Err(WildFireError::ApiError {
            action,
            status: response.status,
            reason: status_reason(response.status),
            message,
        })
    }
}

fn parse_xml<T: DeserializeOwned>(action: &'static str, response: &HttpResponse) -> Result<T> {
    let body = response.text().map_err(|e| WildFireError::ParseError {
        action,
        message: e.to_string(),
    })?;

    quick_xml::de::from_str(&body).map_err(|e| WildFireError::ParseError {
        action,
        message: e.to_string(),
    })
}
