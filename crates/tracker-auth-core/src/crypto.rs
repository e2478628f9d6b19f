//! Keyed MAC used to sign session tokens
//!
//! The key is process-wide and immutable once built. Verification goes
//! through `Mac::verify_slice`, which compares in constant time.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Pre-keyed HMAC-SHA256 state.
///
/// Keying happens once in [`HmacKey::new`]; every signature clones the keyed
/// state instead of re-deriving it from the raw bytes.
#[derive(Clone)]
pub struct HmacKey {
    mac: HmacSha256,
    key_len: usize,
}

impl HmacKey {
    /// Minimum allowed key length in bytes (256 bits)
    pub const MIN_KEY_LENGTH: usize = 32;

    /// Length of a signature in bytes
    pub const SIGNATURE_LENGTH: usize = 32;

    /// Create a new HMAC key from bytes.
    ///
    /// # Errors
    /// Returns error if key is shorter than [`Self::MIN_KEY_LENGTH`].
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self, HmacKeyError> {
        let key = key.as_ref();
        if key.len() < Self::MIN_KEY_LENGTH {
            return Err(HmacKeyError::KeyTooShort {
                actual: key.len(),
                minimum: Self::MIN_KEY_LENGTH,
            });
        }
        let mac = HmacSha256::new_from_slice(key).map_err(|_| HmacKeyError::Rejected)?;
        Ok(Self {
            mac,
            key_len: key.len(),
        })
    }

    /// Sign data and return the MAC bytes
    pub fn sign(&self, data: &[u8]) -> [u8; 32] {
        let mut mac = self.mac.clone();
        mac.update(data);
        mac.finalize().into_bytes().into()
    }

    /// Check `signature` against `data` in constant time
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        let mut mac = self.mac.clone();
        mac.update(data);
        mac.verify_slice(signature).is_ok()
    }
}

impl std::fmt::Debug for HmacKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacKey")
            .field("key_length", &self.key_len)
            .finish_non_exhaustive()
    }
}

/// Errors that can occur when creating an HMAC key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HmacKeyError {
    #[error("HMAC key too short: got {actual} bytes, need at least {minimum}")]
    KeyTooShort { actual: usize, minimum: usize },

    #[error("HMAC key rejected by MAC implementation")]
    Rejected,
}
