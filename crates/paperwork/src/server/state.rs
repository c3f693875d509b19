//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::answers::AnswerVault;
use crate::assembler::DocumentAssembler;
use crate::forms::FormRegistry;
use crate::keys::KeyManager;

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable (`Arc`-wrapped or already `Arc`-backed) so
/// that Axum can clone the state for each request without copying expensive data.
#[derive(Clone)]
pub struct AppState {
    /// Memoised device key.
    pub keys: KeyManager,
    /// Encrypted answer persistence.
    pub vault: AnswerVault,
    /// Every supported form.
    pub forms: Arc<FormRegistry>,
    /// Template filling.
    pub assembler: DocumentAssembler,
    /// Cancelled on shutdown; in-flight assemblies derive child tokens from it.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        keys: KeyManager,
        vault: AnswerVault,
        forms: FormRegistry,
        assembler: DocumentAssembler,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            keys,
            vault,
            forms: Arc::new(forms),
            assembler,
            shutdown,
        }
    }
}

#[cfg(test)]
impl AppState {
    /// In-memory stores, the builtin forms, and the given templates.
    pub fn for_tests(templates: crate::assembler::MemoryTemplateSource) -> Self {
        use crate::answers::MemoryAnswerStore;
        use crate::keys::MemoryKeyStore;

        Self::new(
            KeyManager::new(Arc::new(MemoryKeyStore::new())),
            AnswerVault::new(Arc::new(MemoryAnswerStore::new())),
            FormRegistry::builtin().expect("builtin forms are unique"),
            DocumentAssembler::new(Arc::new(templates), std::time::Duration::from_secs(5)),
            CancellationToken::new(),
        )
    }
}
