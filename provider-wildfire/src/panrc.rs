//! `.panrc` WildFire key file.
//!
//! ```text
//! # default credentials
//! api_key=0123456789abcdef
//! # tagged credentials, selected with --tag lab
//! api_key%lab=fedcba9876543210
//! hostname%lab=wildfire.lab.example.com
//! ```
//!
//! Untagged lines apply when no tag is requested; `key%tag` lines apply only
//! to that tag.

use crate::error::{Result, WildFireError};
use std::path::Path;
use tracing::debug;

/// Default WildFire cloud host
pub const DEFAULT_HOSTNAME: &str = "wildfire.paloaltonetworks.com";

#[derive(Clone, PartialEq, Eq)]
pub struct PanRc {
    pub api_key: String,
    pub hostname: String,
}

impl PanRc {
    /// Parse `.panrc` text for `tag`, falling back to `default_hostname`
    /// when no `hostname` line applies.
    pub fn parse(text: &str, tag: Option<&str>, default_hostname: &str) -> Result<Self> {
        let mut api_key = None;
        let mut hostname = None;

        for (number, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| {
                WildFireError::Config(format!("line {}: expected key=value", number + 1))
            })?;

            let (name, line_tag) = match key.trim().split_once('%') {
                Some((name, line_tag)) => (name, Some(line_tag)),
                None => (key.trim(), None),
            };
            if line_tag != tag {
                continue;
            }

            let value = value.trim().to_string();
            match name {
                "api_key" => api_key = Some(value),
                "hostname" => hostname = Some(value),
                _ => {}
            }
        }

        let api_key = api_key.ok_or_else(|| match tag {
            Some(tag) => WildFireError::Config(format!("api_key required for tag '{}'", tag)),
            None => WildFireError::Config("api_key required".to_string()),
        })?;

        Ok(Self {
            api_key,
            hostname: hostname.unwrap_or_else(|| default_hostname.to_string()),
        })
    }

    /// Read and parse the file at `path`.
    pub async fn load(path: &Path, tag: Option<&str>, default_hostname: &str) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| WildFireError::Config(format!("{}: {}", path.display(), e)))?;

        let panrc = Self::parse(&text, tag, default_hostname)?;
        debug!(path = %path.display(), hostname = %panrc.hostname, "Loaded WildFire key");
        Ok(panrc)
    }
}

impl std::fmt::Debug for PanRc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanRc")
            .field("api_key", &"[REDACTED]")
            .field("hostname", &self.hostname)
            .finish()
    }
}
