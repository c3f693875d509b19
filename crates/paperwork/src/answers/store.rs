//! [`AnswerStore`]: the ciphertext key/value backend seam.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use common::protocol::EncryptedAnswer;
use thiserror::Error;
use tokio::{fs, sync::Mutex};

/// Errors from an answer store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("answer store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("answer store contents are malformed")]
    Malformed,
}

/// Persists one ciphertext per answer field. Writes replace.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnswerStore: Send + Sync {
    /// Every stored answer, in field order.
    async fn list(&self) -> Result<Vec<EncryptedAnswer>, StoreError>;

    /// Insert or replace the ciphertext for `answer.field`.
    async fn set(&self, answer: EncryptedAnswer) -> Result<(), StoreError>;
}

/// In-memory [`AnswerStore`] for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryAnswerStore {
    inner: Mutex<BTreeMap<String, String>>,
}

#[cfg(test)]
impl MemoryAnswerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
#[async_trait]
impl AnswerStore for MemoryAnswerStore {
    async fn list(&self) -> Result<Vec<EncryptedAnswer>, StoreError> {
        Ok(to_records(&*self.inner.lock().await))
    }

    async fn set(&self, answer: EncryptedAnswer) -> Result<(), StoreError> {
        self.inner
            .lock()
            .await
            .insert(answer.field, answer.ciphertext);
        Ok(())
    }
}

/// An [`AnswerStore`] backed by one JSON file mapping field → ciphertext.
///
/// Each `set` rewrites the whole file through a temp file and rename. A
/// process-local lock serialises writers.
#[derive(Debug)]
pub struct FileAnswerStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileAnswerStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    async fn read_map(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|_| StoreError::Malformed),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl AnswerStore for FileAnswerStore {
    async fn list(&self) -> Result<Vec<EncryptedAnswer>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(to_records(&self.read_map().await?))
    }

    async fn set(&self, answer: EncryptedAnswer) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map().await?;
        map.insert(answer.field, answer.ciphertext);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_vec_pretty(&map).map_err(|_| StoreError::Malformed)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, body).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

fn to_records(map: &BTreeMap<String, String>) -> Vec<EncryptedAnswer> {
    map.iter()
        .map(|(field, ciphertext)| EncryptedAnswer {
            field: field.clone(),
            ciphertext: ciphertext.clone(),
        })
        .collect()
}
