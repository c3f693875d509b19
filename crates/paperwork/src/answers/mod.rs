//! Encrypted answer persistence and the decrypt-on-load path.
//!
//! The backend only ever sees `{field, ciphertext}` pairs. Everything here
//! runs on the device: values are encrypted before [`store::AnswerStore::set`]
//! and decrypted after [`store::AnswerStore::list`].

pub mod store;
pub mod vault;

pub use store::FileAnswerStore;
#[cfg(test)]
pub use store::{AnswerStore, MemoryAnswerStore};
pub use vault::{AnswerVault, VaultError};
