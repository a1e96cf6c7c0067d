//! Credential Storage Abstraction
//!
//! Provides a keyed secret store. Keys are profile tags; values are opaque
//! byte payloads that the caller serializes (the auth layer stores JSON).

use async_trait::async_trait;

use crate::error::Result;

/// Secure credential storage trait
///
/// Implementations keep an in-memory view that can be mutated freely and is
/// only written to the backing medium on [`SecureStore::flush`].
///
/// # Security Requirements
///
/// Implementations MUST:
/// - Restrict access to the backing medium to the current user
/// - Never log or expose secret values
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::SecureStore;
///
/// async fn store_record(store: &dyn SecureStore, record: &[u8]) -> Result<()> {
///     store.set_secret("default", record).await?;
///     store.flush().await
/// }
/// ```
#[async_trait]
pub trait SecureStore: Send + Sync {
    /// Store a secret value, replacing any previous value for `key`
    async fn set_secret(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Retrieve a secret value
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    async fn get_secret(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Delete a secret
    async fn delete_secret(&self, key: &str) -> Result<()>;

    /// Check if a secret exists without retrieving it
    async fn has_secret(&self, key: &str) -> Result<bool> {
        Ok(self.get_secret(key).await?.is_some())
    }

    /// List all secret keys (without values)
    async fn list_keys(&self) -> Result<Vec<String>>;

    /// Persist every key to the backing medium
    async fn flush(&self) -> Result<()>;

    /// Human-readable location of the backing medium, for operator messages
    fn location(&self) -> String;
}
