//! Tag-scoped Credential Storage
//!
//! [`TokenStore`] binds one tag of a [`SecureStore`] to a typed
//! [`CredentialRecord`]. Reads and writes go to an in-memory copy; nothing
//! reaches disk until [`TokenStore::save`].
//!
//! ## Example
//!
//! ```no_run
//! use core_auth::{CredentialField, TokenStore};
//! use std::sync::Arc;
//! # use bridge_traits::storage::SecureStore;
//! # async fn example(secure_store: Arc<dyn SecureStore>) -> core_auth::Result<()> {
//! let mut store = TokenStore::load(secure_store, None).await?;
//! store.set(CredentialField::RefreshToken, "new-refresh-token");
//! store.save().await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::{CredentialField, CredentialRecord, DEFAULT_TAG};
use bridge_traits::storage::SecureStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Credential record for a single tag, backed by a [`SecureStore`]
pub struct TokenStore {
    secure_store: Arc<dyn SecureStore>,
    tag: String,
    record: CredentialRecord,
}

impl TokenStore {
    /// Load the record stored under `tag` (or [`DEFAULT_TAG`]).
    ///
    /// A tag with no stored record starts out empty.
    pub async fn load(secure_store: Arc<dyn SecureStore>, tag: Option<&str>) -> Result<Self> {
        let tag = tag.unwrap_or(DEFAULT_TAG).to_string();

        let record = match secure_store.get_secret(&tag).await? {
            Some(raw) => serde_json::from_slice(&raw).map_err(|e| {
                warn!(tag = %tag, error = %e, "Stored credentials are not a record");
                AuthError::Parse(format!("credentials for tag '{}': {}", tag, e))
            })?,
            None => {
                debug!(tag = %tag, "No credentials stored for tag");
                CredentialRecord::default()
            }
        };

        Ok(Self {
            secure_store,
            tag,
            record,
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn record(&self) -> &CredentialRecord {
        &self.record
    }

    pub fn get(&self, field: CredentialField) -> Option<&str> {
        self.record.get(field)
    }

    pub fn set(&mut self, field: CredentialField, value: impl Into<String>) {
        self.record.set(field, value);
    }

    /// Write this tag's record back and persist the whole mapping.
    ///
    /// Other tags in the backing store are left as they were loaded.
    pub async fn save(&self) -> Result<()> {
        let json = serde_json::to_vec(&self.record)
            .map_err(|e| AuthError::Parse(format!("credential serialization: {}", e)))?;

        self.secure_store.set_secret(&self.tag, &json).await?;
        self.secure_store.flush().await?;

        info!(
            tag = %self.tag,
            has_refresh_token = self.record.refresh_token.is_some(),
            "Credentials saved"
        );
        Ok(())
    }

    /// Human-readable location of the backing store
    pub fn location(&self) -> String {
        self.secure_store.location()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    /// In-memory SecureStore for testing
    #[derive(Default)]
    struct MockSecureStore {
        storage: Mutex<HashMap<String, Vec<u8>>>,
        flushes: AtomicUsize,
    }

    #[async_trait]
    impl SecureStore for MockSecureStore {
        async fn set_secret(&self, key: &str, value: &[u8]) -> BridgeResult<()> {
            self.storage
                .lock()
                .await
                .insert(key.to_string(), value.to_vec());
            Ok(())
        }

        async fn get_secret(&self, key: &str) -> BridgeResult<Option<Vec<u8>>> {
            Ok(self.storage.lock().await.get(key).cloned())
        }

        async fn delete_secret(&self, key: &str) -> BridgeResult<()> {
            self.storage.lock().await.remove(key);
            Ok(())
        }

        async fn list_keys(&self) -> BridgeResult<Vec<String>> {
            Ok(self.storage.lock().await.keys().cloned().collect())
        }

        async fn flush(&self) -> BridgeResult<()> {
            self.flushes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn location(&self) -> String {
            "memory".to_string()
        }
    }

    #[tokio::test]
    async fn test_load_absent_tag_is_empty() {
        let store = TokenStore::load(Arc::new(MockSecureStore::default()), None)
            .await
            .unwrap();

        assert_eq!(store.tag(), DEFAULT_TAG);
        assert_eq!(store.record(), &CredentialRecord::default());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let backing = Arc::new(MockSecureStore::default());

        let mut store = TokenStore::load(backing.clone(), Some("work")).await.unwrap();
        store.set(CredentialField::ClientId, "cid");
        store.set(CredentialField::ClientSecret, "sec");
        store.set(CredentialField::RefreshToken, "r1");
        store.save().await.unwrap();

        let reloaded = TokenStore::load(backing.clone(), Some("work")).await.unwrap();
        assert_eq!(reloaded.record(), store.record());
        assert_eq!(backing.flushes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_tags_are_independent() {
        let backing = Arc::new(MockSecureStore::default());

        let mut work = TokenStore::load(backing.clone(), Some("work")).await.unwrap();
        work.set(CredentialField::RefreshToken, "w");
        work.save().await.unwrap();

        let home = TokenStore::load(backing.clone(), Some("home")).await.unwrap();
        assert_eq!(home.get(CredentialField::RefreshToken), None);
    }

    #[tokio::test]
    async fn test_refresh_replaces_token() {
        let backing = Arc::new(MockSecureStore::default());
        let mut store = TokenStore::load(backing.clone(), None).await.unwrap();
        store.set(CredentialField::RefreshToken, "r1");
        store.save().await.unwrap();

        let mut store = TokenStore::load(backing.clone(), None).await.unwrap();
        store.set(CredentialField::RefreshToken, "r2");
        store.save().await.unwrap();

        let raw = backing.get_secret(DEFAULT_TAG).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(value, serde_json::json!({"refresh_token": "r2"}));
    }

    #[tokio::test]
    async fn test_non_record_value_rejected() {
        let backing = Arc::new(MockSecureStore::default());
        backing.set_secret("default", b"[1,2]").await.unwrap();

        assert!(matches!(
            TokenStore::load(backing, None).await,
            Err(AuthError::Parse(_))
        ));
    }
}
