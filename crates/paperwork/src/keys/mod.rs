//! Device key lifecycle: load-or-generate, persist locally, cache in memory.
//!
//! # Lifecycle
//!
//! 1. The first [`KeyManager::get_or_create_key`] call loads the key from the
//!    configured [`store::KeyStore`], or generates and persists a new one if the
//!    store is empty.
//! 2. The key then lives in memory behind an [`arc_swap::ArcSwapOption`]; later
//!    calls are lock-free reads.
//! 3. [`KeyManager::invalidate`] drops the in-memory copy on sign-out.
//!
//! # Security invariants
//!
//! - The key is **never** transmitted, logged, or included in traces.
//! - A missing or corrupted store surfaces as [`KeyError::Unavailable`];
//!   callers fail closed and never treat stored answers as plaintext.

pub mod manager;
pub mod store;

pub use manager::{KeyError, KeyManager};
pub use store::FileKeyStore;
#[cfg(test)]
pub use store::MemoryKeyStore;
