//! Durable local storage for the device key.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::{fs, io::AsyncWriteExt};

use crate::crypto::{DeviceKey, KEY_LEN};

/// Version tag written into every key file.
const KEY_FILE_VERSION: u32 = 1;

/// Errors from a [`KeyStore`] backend.
#[derive(Debug, Error)]
pub enum KeyStoreError {
    /// The backing store could not be read or written.
    #[error("key store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted key material failed validation.
    #[error("key store is corrupted: {0}")]
    Corrupted(&'static str),
}

/// Origin-scoped durable storage for exactly one device key.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Load the persisted key, or `None` if nothing has been stored yet.
    async fn load(&self) -> Result<Option<DeviceKey>, KeyStoreError>;

    /// Persist `key`, replacing any previous key.
    async fn save(&self, key: &DeviceKey) -> Result<(), KeyStoreError>;
}

/// On-disk representation of the key file.
#[derive(Serialize, Deserialize)]
struct KeyFile {
    version: u32,
    /// Base64 key bytes.
    key: String,
    /// Base64 SHA-256 of the raw key bytes; detects truncation and bit rot.
    checksum: String,
}

/// A [`KeyStore`] backed by a single JSON file on the local filesystem.
///
/// Writes go to a sibling temp file which is then renamed into place, so a
/// crash mid-write never leaves a half-written key behind. On Unix the file is
/// created with mode `0600`.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    path: PathBuf,
}

impl FileKeyStore {
    /// Create a store that persists the key at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the key file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl KeyStore for FileKeyStore {
    async fn load(&self) -> Result<Option<DeviceKey>, KeyStoreError> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let file: KeyFile = serde_json::from_str(&text)
            .map_err(|_| KeyStoreError::Corrupted("key file is not valid JSON"))?;
        if file.version != KEY_FILE_VERSION {
            return Err(KeyStoreError::Corrupted("unsupported key file version"));
        }

        let raw = STANDARD
            .decode(&file.key)
            .map_err(|_| KeyStoreError::Corrupted("key is not valid base64"))?;
        if raw.len() != KEY_LEN {
            return Err(KeyStoreError::Corrupted("key has the wrong length"));
        }
        if STANDARD.encode(Sha256::digest(&raw)) != file.checksum {
            return Err(KeyStoreError::Corrupted("key checksum mismatch"));
        }

        Ok(DeviceKey::from_slice(&raw))
    }

    async fn save(&self, key: &DeviceKey) -> Result<(), KeyStoreError> {
        let file = KeyFile {
            version: KEY_FILE_VERSION,
            key: STANDARD.encode(key.as_bytes()),
            checksum: STANDARD.encode(Sha256::digest(key.as_bytes())),
        };
        let body = serde_json::to_vec(&file)
            .map_err(|_| KeyStoreError::Corrupted("key file could not be encoded"))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("tmp");
        let mut opts = fs::OpenOptions::new();
        opts.write(true).create(true).truncate(true);
        #[cfg(unix)]
        opts.mode(0o600);

        let mut f = opts.open(&tmp).await?;
        f.write_all(&body).await?;
        f.sync_all().await?;
        drop(f);

        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// In-memory [`KeyStore`] for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    inner: tokio::sync::Mutex<Option<DeviceKey>>,
}

#[cfg(test)]
impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
#[async_trait]
impl KeyStore for MemoryKeyStore {
    async fn load(&self) -> Result<Option<DeviceKey>, KeyStoreError> {
        Ok(self.inner.lock().await.clone())
    }

    async fn save(&self, key: &DeviceKey) -> Result<(), KeyStoreError> {
        *self.inner.lock().await = Some(key.clone());
        Ok(())
    }
}
