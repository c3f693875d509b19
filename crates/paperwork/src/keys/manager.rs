//! [`KeyManager`]: memoised access to the device key.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::store::KeyStore;
use crate::crypto::DeviceKey;

/// Errors produced by the key layer.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The local key store is unreadable, unwritable or corrupted.
    ///
    /// Fatal for this session's crypto operations; never "no data present".
    #[error("device key unavailable: {0}")]
    Unavailable(String),
}

/// Explicit device-key service, injected into everything that encrypts or decrypts.
///
/// Cheap to clone; clones share the same cache and creation lock.
#[derive(Clone)]
pub struct KeyManager {
    store: Arc<dyn KeyStore>,
    cached: Arc<ArcSwapOption<DeviceKey>>,
    // Serialises the load-or-generate path so concurrent first callers
    // observe one key.
    init: Arc<Mutex<()>>,
}

impl KeyManager {
    /// Create a manager over `store`. Nothing is loaded until first use.
    pub fn new(store: Arc<dyn KeyStore>) -> Self {
        Self {
            store,
            cached: Arc::new(ArcSwapOption::empty()),
            init: Arc::new(Mutex::new(())),
        }
    }

    /// Returns `true` if a key is currently cached in memory.
    pub fn is_ready(&self) -> bool {
        self.cached.load().is_some()
    }

    /// Return the device key, loading or generating it on first use.
    ///
    /// Idempotent for as long as the underlying store persists.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Unavailable`] if the store cannot be read or
    /// written, or holds corrupted key material.
    pub async fn get_or_create_key(&self) -> Result<Arc<DeviceKey>, KeyError> {
        if let Some(key) = self.cached.load_full() {
            return Ok(key);
        }

        let _guard = self.init.lock().await;
        // Another caller may have finished while we waited.
        if let Some(key) = self.cached.load_full() {
            return Ok(key);
        }

        let key = match self.store.load().await {
            Ok(Some(key)) => {
                info!("device key loaded from local store");
                key
            }
            Ok(None) => {
                let key = DeviceKey::generate();
                self.store.save(&key).await.map_err(|e| {
                    warn!(error = %e, "failed to persist new device key");
                    KeyError::Unavailable(e.to_string())
                })?;
                info!("generated and persisted new device key");
                key
            }
            Err(e) => {
                warn!(error = %e, "device key store unavailable");
                return Err(KeyError::Unavailable(e.to_string()));
            }
        };

        let key = Arc::new(key);
        self.cached.store(Some(key.clone()));
        Ok(key)
    }

    /// Drop the in-memory key (sign-out). The durable copy is left in place.
    ///
    /// Waits for any in-flight first load, so that load cannot repopulate the
    /// cache after this returns.
    pub async fn invalidate(&self) {
        let _guard = self.init.lock().await;
        self.cached.store(None);
        info!("device key cache invalidated");
    }
}

impl std::fmt::Debug for KeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyManager")
            .field("ready", &self.is_ready())
            .finish_non_exhaustive()
    }
}
