//! Submit Box download URLs to WildFire and report verdicts.

use async_trait::async_trait;
use provider_box::{FileDescriptor, FileHandler};
use std::io::Write;
use std::sync::Mutex;
use tracing::{info, warn};

use crate::client::WildFireClient;
use crate::error::Result;
use crate::types::{UploadFileInfo, Verdict};

/// How the verdict lookup for a submission turned out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerdictOutcome {
    Known(Verdict),
    /// The `verdict` element was not an integer
    NotAnInteger(String),
    /// The lookup answered for a different hash than was submitted
    HashMismatch { returned: String, expected: String },
    /// An integer outside the verdict table
    UnknownCode(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    pub upload: UploadFileInfo,
    pub verdict: VerdictOutcome,
}

pub struct ScanSubmitter {
    client: WildFireClient,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ScanSubmitter {
    pub fn new(client: WildFireClient) -> Self {
        Self {
            client,
            out: Mutex::new(Box::new(std::io::stdout())),
        }
    }

    /// Where the submission report lines go; stdout by default.
    pub fn with_output(mut self, out: impl Write + Send + 'static) -> Self {
        self.out = Mutex::new(Box::new(out));
        self
    }

    /// Submit `download_url` for `file`, then look up the verdict for the
    /// hash WildFire reported.
    ///
    /// Output:
    ///
    /// ```text
    /// "setup.exe" (PE32 executable) uploaded to WildFire
    ///     sha256 3c1e…
    ///     verdict malware
    /// ```
    ///
    /// The verdict line is only written for a recognised verdict; the other
    /// outcomes are logged as warnings.
    pub async fn submit(&self, file: &FileDescriptor, download_url: &str) -> Result<SubmissionResult> {
        let upload = self.client.submit_url(download_url).await?;
        self.emit(&format!(
            "\"{}\" ({}) uploaded to WildFire\n    sha256 {}",
            file.name,
            upload.filetype.as_deref().unwrap_or("unknown"),
            upload.sha256
        ));

        let info = self.client.verdict(&upload.sha256).await?;
        let verdict = classify(&upload.sha256, info.sha256.as_deref(), &info.verdict);

        match &verdict {
            VerdictOutcome::Known(v) => {
                info!(file = %file.name, verdict = %v, "Verdict");
                self.emit(&format!("    verdict {}", v));
            }
            VerdictOutcome::NotAnInteger(raw) => {
                warn!(file = %file.name, verdict = %raw, "verdict not int");
            }
            VerdictOutcome::HashMismatch { returned, expected } => {
                warn!(file = %file.name, "{} != {}", returned, expected);
            }
            VerdictOutcome::UnknownCode(code) => {
                warn!(file = %file.name, code = code, "unknown verdict");
            }
        }

        Ok(SubmissionResult { upload, verdict })
    }

    fn emit(&self, text: &str) {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(out, "{}", text) {
            warn!(error = %e, "Failed to write submission report");
        }
    }
}

/// Checked in order: integer verdict, matching hash, known code.
fn classify(expected: &str, returned: Option<&str>, raw: &str) -> VerdictOutcome {
    let code = match raw.trim().parse::<i64>() {
        Ok(code) => code,
        Err(_) => return VerdictOutcome::NotAnInteger(raw.to_string()),
    };

    if let Some(returned) = returned {
        if returned != expected {
            return VerdictOutcome::HashMismatch {
                returned: returned.to_string(),
                expected: expected.to_string(),
            };
        }
    }

    match Verdict::from_code(code) {
        Some(v) => VerdictOutcome::Known(v),
        None => VerdictOutcome::UnknownCode(code),
    }
}

#[async_trait]
impl FileHandler for ScanSubmitter {
    async fn handle(&self, file: &FileDescriptor, download_url: &str) -> anyhow::Result<()> {
        self.submit(file, download_url).await?;
        Ok(())
    }
}
