//! [`AnswerVault`]: encrypt-on-submit and decrypt-on-load over an [`AnswerStore`].

use std::sync::Arc;

use common::protocol::EncryptedAnswer;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::store::{AnswerStore, StoreError};
use crate::crypto::{decrypt_batch, encrypt_field, CipherError, DeviceKey};
use crate::forms::Answers;

/// Errors from the answer vault.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The field is not part of the questionnaire.
    #[error("unknown answer field: {0}")]
    UnknownField(String),

    /// The value does not have the field's type.
    #[error("invalid value for answer field: {0}")]
    InvalidAnswer(String),

    /// Encryption failed; nothing was stored.
    #[error("could not encrypt answer field {field}: {source}")]
    Cipher { field: String, source: CipherError },

    /// The backend rejected the read or write.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Some stored answers could not be decrypted or parsed.
    #[error("stored answers could not be read: {}", .0.join(", "))]
    Incomplete(Vec<String>),
}

/// The outcome of loading every stored answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedAnswers {
    /// Every answer that decrypted and parsed cleanly.
    pub answers: Answers,
    /// Fields whose ciphertext failed to decrypt or no longer fits the record.
    pub failed_fields: Vec<String>,
}

impl LoadedAnswers {
    /// Return the answers only if every stored field was readable.
    ///
    /// Document assembly goes through here: a legal form is never produced
    /// from a partial answer set.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Incomplete`] naming the unreadable fields.
    pub fn into_complete(self) -> Result<Answers, VaultError> {
        if self.failed_fields.is_empty() {
            Ok(self.answers)
        } else {
            Err(VaultError::Incomplete(self.failed_fields))
        }
    }
}

/// Encrypts answers before they reach the store and decrypts them on the way back.
#[derive(Clone)]
pub struct AnswerVault {
    store: Arc<dyn AnswerStore>,
}

impl AnswerVault {
    pub fn new(store: Arc<dyn AnswerStore>) -> Self {
        Self { store }
    }

    /// Validate, encrypt and store one answer, replacing any previous value.
    ///
    /// # Errors
    ///
    /// [`VaultError::UnknownField`] / [`VaultError::InvalidAnswer`] for bad
    /// input, [`VaultError::Cipher`] or [`VaultError::Store`] otherwise.
    pub async fn submit(
        &self,
        field: &str,
        value: &Value,
        key: &DeviceKey,
    ) -> Result<(), VaultError> {
        if !Answers::is_known_field(field) {
            return Err(VaultError::UnknownField(field.to_owned()));
        }
        if !Answers::accepts(field, value) {
            return Err(VaultError::InvalidAnswer(field.to_owned()));
        }

        let ciphertext =
            encrypt_field(&value.to_string(), key).map_err(|source| VaultError::Cipher {
                field: field.to_owned(),
                source,
            })?;

        self.store
            .set(EncryptedAnswer {
                field: field.to_owned(),
                ciphertext,
            })
            .await?;
        debug!(field, "answer stored");
        Ok(())
    }

    /// List, decrypt and parse every stored answer.
    ///
    /// Per-field failures are collected in [`LoadedAnswers::failed_fields`]
    /// and never abort the remaining fields. Stored fields the record no
    /// longer knows about are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Store`] if the backend cannot be listed.
    pub async fn load(&self, key: &DeviceKey) -> Result<LoadedAnswers, VaultError> {
        let records = self.store.list().await?;
        let ciphertexts: Vec<&str> = records.iter().map(|r| r.ciphertext.as_str()).collect();
        let decrypted = decrypt_batch(&ciphertexts, key);

        let mut fields = serde_json::Map::new();
        let mut failed_fields = Vec::new();

        for (record, result) in records.iter().zip(decrypted) {
            let field = record.field.as_str();
            if !Answers::is_known_field(field) {
                debug!(field, "skipping stored answer with no matching field");
                continue;
            }
            let parsed = result
                .ok()
                .and_then(|plain| serde_json::from_str::<Value>(&plain).ok())
                .filter(|value| Answers::accepts(field, value));
            match parsed {
                Some(value) => {
                    fields.insert(field.to_owned(), value);
                }
                None => {
                    warn!(field, "stored answer could not be decrypted");
                    failed_fields.push(field.to_owned());
                }
            }
        }

        let loaded = fields.len();
        let field_names: Vec<String> = fields.keys().cloned().collect();
        // Each value already type-checked on its own; a combined failure means
        // the record shape itself changed.
        let answers = serde_json::from_value(Value::Object(fields))
            .map_err(|_| VaultError::Incomplete(field_names))?;
        info!(loaded, failed = failed_fields.len(), "answers loaded");
        Ok(LoadedAnswers {
            answers,
            failed_fields,
        })
    }
}
