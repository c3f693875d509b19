//! AES-256-GCM field encryption primitives.
//!
//! This module is free of storage and HTTP dependencies. It owns the
//! [`DeviceKey`] type and the only code that produces or parses the
//! ciphertext wire format.
//!
//! # Ciphertext format
//!
//! ```text
//! base64(iv[12] ‖ aes-gcm ciphertext ‖ tag[16])
//! ```
//!
//! A fresh IV is drawn from the OS CSPRNG for every call, so encrypting the
//! same answer twice never yields the same string.

pub mod cipher;
pub mod key;

pub use cipher::{decrypt_batch, encrypt_field, CipherError};
pub use key::{DeviceKey, KEY_LEN};
