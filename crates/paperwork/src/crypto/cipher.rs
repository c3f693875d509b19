//! AES-256-GCM encryption and decryption of individual answer values.
//!
//! **Algorithm choice:** plain AES-256-GCM with a random 96-bit IV per call.
//! Ciphertext is non-deterministic: the same answer encrypted twice produces
//! two different strings, so the backend learns nothing from equal answers.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use super::key::DeviceKey;

/// Byte length of an AES-GCM IV (12 bytes = 96 bits).
pub const IV_LEN: usize = 12;

/// Byte length of the AES-GCM authentication tag.
pub const TAG_LEN: usize = 16;

/// Errors produced by the cipher layer.
///
/// Neither variant carries the offending input: plaintext and key bytes must
/// never reach an error message or log line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// Tag mismatch, wrong key, bad base64, truncated input or non-UTF-8 plaintext.
    #[error("decryption failed")]
    DecryptionFailed,

    /// AES-GCM encryption failed (unreachable with a valid key).
    #[error("encryption failed")]
    EncryptionFailed,
}

/// Encrypt a plaintext answer value.
///
/// Returns `base64(iv ‖ ciphertext ‖ tag)`.
///
/// # Errors
///
/// Returns [`CipherError::EncryptionFailed`] on an internal AEAD error.
pub fn encrypt_field(plaintext: &str, key: &DeviceKey) -> Result<String, CipherError> {
    let cipher = build_cipher(key);
    let iv = Aes256Gcm::generate_nonce(&mut OsRng);

    let sealed = cipher
        .encrypt(&iv, plaintext.as_bytes())
        .map_err(|_| CipherError::EncryptionFailed)?;

    let mut out = Vec::with_capacity(IV_LEN + sealed.len());
    out.extend_from_slice(iv.as_slice());
    out.extend_from_slice(&sealed);
    Ok(STANDARD.encode(out))
}

/// Decrypt a ciphertext produced by [`encrypt_field`].
///
/// Authentication is checked before any plaintext is returned; there is no
/// partial output.
///
/// # Errors
///
/// Returns [`CipherError::DecryptionFailed`] for any malformed or
/// unauthenticated input.
pub fn decrypt_field(ciphertext: &str, key: &DeviceKey) -> Result<String, CipherError> {
    let raw = STANDARD
        .decode(ciphertext)
        .map_err(|_| CipherError::DecryptionFailed)?;
    if raw.len() < IV_LEN + TAG_LEN {
        return Err(CipherError::DecryptionFailed);
    }

    let (iv, sealed) = raw.split_at(IV_LEN);
    let plaintext = build_cipher(key)
        .decrypt(Nonce::from_slice(iv), sealed)
        .map_err(|_| CipherError::DecryptionFailed)?;

    String::from_utf8(plaintext).map_err(|_| CipherError::DecryptionFailed)
}

/// Decrypt an ordered batch of ciphertexts.
///
/// The output has the same length and order as the input. A failure in one
/// item is reported in its slot and never aborts the others.
pub fn decrypt_batch<S: AsRef<str>>(
    ciphertexts: &[S],
    key: &DeviceKey,
) -> Vec<Result<String, CipherError>> {
    ciphertexts
        .iter()
        .map(|c| decrypt_field(c.as_ref(), key))
        .collect()
}

fn build_cipher(key: &DeviceKey) -> Aes256Gcm {
    Aes256Gcm::new(key.as_bytes().into())
}
