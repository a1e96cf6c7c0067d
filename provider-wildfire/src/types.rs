//! WildFire XML response types and the verdict table.

use serde::Deserialize;
use std::fmt;

/// `<wildfire><upload-file-info>…</upload-file-info></wildfire>`
#[derive(Debug, Deserialize)]
pub(crate) struct SubmitResponse {
    #[serde(rename = "upload-file-info")]
    pub upload_file_info: UploadFileInfo,
}

/// What WildFire recorded for a submitted URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UploadFileInfo {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub filetype: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    pub sha256: String,
    #[serde(default)]
    pub md5: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// `<wildfire><get-verdict-info>…</get-verdict-info></wildfire>`
#[derive(Debug, Deserialize)]
pub(crate) struct VerdictResponse {
    #[serde(rename = "get-verdict-info")]
    pub verdict_info: VerdictInfo,
}

/// Raw verdict lookup result. `verdict` is kept as text because the
/// service is not guaranteed to send an integer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VerdictInfo {
    #[serde(default)]
    pub sha256: Option<String>,
    pub verdict: String,
    #[serde(default)]
    pub md5: Option<String>,
}

/// `<error><error-message>…</error-message></error>`
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(rename = "error-message")]
    pub error_message: String,
}

/// Known verdict codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Benign,
    Malware,
    Grayware,
    Phishing,
    C2,
    Pending,
    Error,
    Unknown,
    InvalidHash,
}

impl Verdict {
    pub const ALL: [Verdict; 9] = [
        Verdict::Benign,
        Verdict::Malware,
        Verdict::Grayware,
        Verdict::Phishing,
        Verdict::C2,
        Verdict::Pending,
        Verdict::Error,
        Verdict::Unknown,
        Verdict::InvalidHash,
    ];

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.code() == code)
    }

    pub fn code(&self) -> i64 {
        match self {
            Verdict::Benign => 0,
            Verdict::Malware => 1,
            Verdict::Grayware => 2,
            Verdict::Phishing => 4,
            Verdict::C2 => 5,
            Verdict::Pending => -100,
            Verdict::Error => -101,
            Verdict::Unknown => -102,
            Verdict::InvalidHash => -103,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Benign => "benign",
            Verdict::Malware => "malware",
            Verdict::Grayware => "grayware",
            Verdict::Phishing => "phishing",
            Verdict::C2 => "C2",
            Verdict::Pending => "pending",
            Verdict::Error => "error",
            Verdict::Unknown => "unknown",
            Verdict::InvalidHash => "invalid hash value",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reason phrase for WildFire API status codes
pub fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Invalid API key",
        403 => "Forbidden",
        404 => "Not found",
        405 => "Invalid request method",
        413 => "Request entity too large",
        418 => "Unsupported file type",
        419 => "Max number of uploads per day exceeded",
        420 => "Insufficient arguments",
        421 => "Invalid arguments",
        422 => "URL download error",
        500 => "Internal error",
        513 => "File upload failed",
        _ => "Unexpected status",
    }
}
