//! [`DeviceKey`]: the symmetric key used for field-level answer encryption.

use aes_gcm::{
    aead::{KeyInit, OsRng},
    Aes256Gcm,
};

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Fixed-size key buffer that holds exactly [`KEY_LEN`] bytes.
///
/// Generated once per device and held only in process memory and the local
/// key store. When this type is dropped, the memory is overwritten with
/// zeroes to minimise the window during which key material lives in RAM.
#[derive(Clone)]
pub struct DeviceKey(Box<[u8; KEY_LEN]>);

impl DeviceKey {
    /// Generate a fresh key from the OS CSPRNG.
    pub fn generate() -> Self {
        let key = Aes256Gcm::generate_key(OsRng);
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(key.as_slice());
        Self(buf)
    }

    /// Wrap existing key bytes, returning `None` unless exactly [`KEY_LEN`] bytes long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != KEY_LEN {
            return None;
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(bytes);
        Some(Self(buf))
    }

    /// Raw key bytes. Only the cipher and the local key store may read these.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Drop for DeviceKey {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for DeviceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        f.write_str("DeviceKey([REDACTED])")
    }
}

impl PartialEq for DeviceKey {
    fn eq(&self, other: &Self) -> bool {
        // Constant-time comparison; used only to check memoisation in tests
        // and reloads.
        self.0
            .iter()
            .zip(other.0.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl Eq for DeviceKey {}
