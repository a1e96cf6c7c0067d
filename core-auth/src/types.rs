//! Credential and state types

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Tag used when the operator does not pass `--fbtag`
pub const DEFAULT_TAG: &str = "default";

/// One tag's worth of Box application credentials.
///
/// Keys the record does not know about are carried through untouched so a
/// save never drops fields written by something else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CredentialRecord {
    pub fn get(&self, field: CredentialField) -> Option<&str> {
        match field {
            CredentialField::ClientId => self.client_id.as_deref(),
            CredentialField::ClientSecret => self.client_secret.as_deref(),
            CredentialField::RefreshToken => self.refresh_token.as_deref(),
        }
    }

    /// Replace `field`; the previous value is discarded.
    pub fn set(&mut self, field: CredentialField, value: impl Into<String>) {
        let slot = match field {
            CredentialField::ClientId => &mut self.client_id,
            CredentialField::ClientSecret => &mut self.client_secret,
            CredentialField::RefreshToken => &mut self.refresh_token,
        };
        *slot = Some(value.into());
    }

    /// Return `field` or fail with a message naming it.
    pub fn require(&self, field: CredentialField) -> crate::Result<&str> {
        self.get(field)
            .ok_or_else(|| crate::AuthError::MissingCredential(format!("No {}", field)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialField {
    ClientId,
    ClientSecret,
    RefreshToken,
}

impl CredentialField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialField::ClientId => "client_id",
            CredentialField::ClientSecret => "client_secret",
            CredentialField::RefreshToken => "refresh_token",
        }
    }
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anti-forgery value sent as the OAuth `state` parameter.
///
/// Verification takes the token by value, so each token can be checked once.
#[derive(PartialEq, Eq)]
pub struct StateToken(String);

impl StateToken {
    /// 16 random bytes, URL-safe base64 without padding
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the token and compare it with the value echoed by the provider.
    pub fn verify(self, returned: Option<&str>) -> bool {
        returned == Some(self.0.as_str())
    }
}

impl From<String> for StateToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for StateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StateToken([REDACTED])")
    }
}
