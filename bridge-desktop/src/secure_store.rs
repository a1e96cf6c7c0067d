//! Credential storage in a JSON dotfile
//!
//! The file holds one JSON object mapping a tag to that tag's record. The
//! whole document is read on open and rewritten on every flush.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::SecureStore,
};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::paths::find_in_search_path;

/// JSON-file-backed secure storage
///
/// Lookup order on [`JsonFileSecureStore::open`]: every directory in the
/// search path is checked for an existing file; if none is found the file is
/// created in the current directory with mode `0600`.
pub struct JsonFileSecureStore {
    path: PathBuf,
    secrets: Mutex<Map<String, Value>>,
}

impl JsonFileSecureStore {
    /// Locate (or create) `filename` using `search_path` and load it.
    pub async fn open(search_path: &[String], filename: &str) -> Result<Self> {
        Self::open_or_create_in(search_path, filename, Path::new(".")).await
    }

    /// Like [`JsonFileSecureStore::open`], creating the file in `fallback_dir`
    /// when no search-path directory has it.
    pub async fn open_or_create_in(
        search_path: &[String],
        filename: &str,
        fallback_dir: &Path,
    ) -> Result<Self> {
        let path = match find_in_search_path(search_path, filename) {
            Some(existing) => existing,
            None => {
                let path = fallback_dir.join(filename);
                create_owner_only(&path).await?;
                info!(path = %path.display(), "Created secrets file");
                path
            }
        };

        Self::open_at(path).await
    }

    /// Load the store from an explicit path, creating the file if missing.
    pub async fn open_at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !tokio::fs::try_exists(&path)
            .await
            .map_err(|e| storage_error(&path, "stat", e))?
        {
            create_owner_only(&path).await?;
        }

        let secrets = read_document(&path).await?;
        debug!(path = %path.display(), tags = secrets.len(), "Loaded secrets file");

        Ok(Self {
            path,
            secrets: Mutex::new(secrets),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn create_owner_only(path: &Path) -> Result<()> {
    let mut options = OpenOptions::new();
    options.create(true).write(true);
    #[cfg(unix)]
    options.mode(0o600);

    options
        .open(path)
        .await
        .map(drop)
        .map_err(|e| storage_error(path, "create", e))
}

async fn read_document(path: &Path) -> Result<Map<String, Value>> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|e| storage_error(path, "open", e))?;

    if raw.is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(&raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(BridgeError::Storage {
            path: path.display().to_string(),
            reason: "not a dictionary".to_string(),
        }),
        Err(e) => Err(storage_error(path, "parse", e)),
    }
}

fn storage_error(path: &Path, action: &str, e: impl std::fmt::Display) -> BridgeError {
    BridgeError::Storage {
        path: path.display().to_string(),
        reason: format!("{}: {}", action, e),
    }
}

#[async_trait]
impl SecureStore for JsonFileSecureStore {
    async fn set_secret(&self, key: &str, value: &[u8]) -> Result<()> {
        let value: Value = serde_json::from_slice(value).map_err(|e| {
            BridgeError::OperationFailed(format!("secret for '{}' is not JSON: {}", key, e))
        })?;

        self.secrets.lock().await.insert(key.to_string(), value);
        debug!(key = key, "Stored secret");
        Ok(())
    }

    async fn get_secret(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let secrets = self.secrets.lock().await;
        secrets
            .get(key)
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| BridgeError::OperationFailed(e.to_string()))
    }

    async fn delete_secret(&self, key: &str) -> Result<()> {
        self.secrets.lock().await.remove(key);
        Ok(())
    }

    async fn has_secret(&self, key: &str) -> Result<bool> {
        Ok(self.secrets.lock().await.contains_key(key))
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.secrets.lock().await.keys().cloned().collect())
    }

    async fn flush(&self) -> Result<()> {
        let document = {
            let secrets = self.secrets.lock().await;
            serde_json::to_string_pretty(&*secrets)
                .map_err(|e| storage_error(&self.path, "serialize", e))?
        };

        let mut options = OpenOptions::new();
        options.create(true).write(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options
            .open(&self.path)
            .await
            .map_err(|e| storage_error(&self.path, "open", e))?;
        file.write_all(document.as_bytes())
            .await
            .map_err(|e| storage_error(&self.path, "write", e))?;
        file.flush()
            .await
            .map_err(|e| storage_error(&self.path, "write", e))?;

        debug!(path = %self.path.display(), "Flushed secrets file");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
