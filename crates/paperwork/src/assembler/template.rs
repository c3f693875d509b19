//! PDF template assets: read-only, addressed by an opaque reference.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::fs;

/// Errors from a [`TemplateSource`].
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template not found: {0}")]
    NotFound(String),

    /// The reference is absolute or climbs out of the template root.
    #[error("invalid template reference: {0}")]
    InvalidRef(String),

    #[error("template I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Supplies the raw bytes of a PDF template.
///
/// Callers parse a private copy per call; sources never hand out anything
/// that could be mutated in place.
#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn load(&self, template_ref: &str) -> Result<Bytes, TemplateError>;
}

/// Templates stored as files under a root directory.
#[derive(Debug, Clone)]
pub struct DirTemplateSource {
    root: PathBuf,
}

impl DirTemplateSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn resolve(&self, template_ref: &str) -> Result<PathBuf, TemplateError> {
        let rel = Path::new(template_ref);
        let is_plain = !template_ref.is_empty()
            && rel.components().all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(TemplateError::InvalidRef(template_ref.to_owned()));
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl TemplateSource for DirTemplateSource {
    async fn load(&self, template_ref: &str) -> Result<Bytes, TemplateError> {
        let path = self.resolve(template_ref)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Bytes::from(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(TemplateError::NotFound(template_ref.to_owned()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Templates held in memory, for tests.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateSource {
    templates: std::collections::HashMap<String, Bytes>,
}

#[cfg(test)]
impl MemoryTemplateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, template_ref: impl Into<String>, bytes: impl Into<Bytes>) {
        self.templates.insert(template_ref.into(), bytes.into());
    }
}

#[cfg(test)]
#[async_trait]
impl TemplateSource for MemoryTemplateSource {
    async fn load(&self, template_ref: &str) -> Result<Bytes, TemplateError> {
        self.templates
            .get(template_ref)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound(template_ref.to_owned()))
    }
}
