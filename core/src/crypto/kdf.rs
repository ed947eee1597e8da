//! crypto/kdf.rs
//! Passphrase -> key material.
//!
//! Design:
//! - SHA-256(passphrase), truncated to the algorithm's key length.
//! - No salt and no iteration count: the same passphrase must rebuild the
//!   same key on every run, so the output is a pure function of its inputs.
//!
//! Security notes:
//! - This is a fast digest, not a password hash. Low-entropy passphrases are
//!   open to offline guessing against any ciphertext.

use std::fmt;

use sha2::{Digest as _, Sha256};

use crate::config::Algorithm;
use crate::types::CryptError;

/// Secret key bytes. `Debug` never prints the material.
#[derive(Clone, PartialEq, Eq)]
pub struct Key {
    bytes: Vec<u8>,
}

impl Key {
    pub fn from_bytes(bytes: Vec<u8>, algorithm: Algorithm) -> Result<Self, CryptError> {
        if bytes.len() != algorithm.key_len() {
            return Err(CryptError::InvalidArgument(format!(
                "{algorithm} needs a {}-byte key, got {}",
                algorithm.key_len(),
                bytes.len()
            )));
        }
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key([REDACTED; {}])", self.bytes.len())
    }
}

/// Derive the key for `algorithm` from `passphrase`.
///
/// Errors:
/// - Empty passphrase returns `CryptError::InvalidArgument`.
#[inline]
pub fn derive_key(passphrase: &str, algorithm: Algorithm) -> Result<Key, CryptError> {
    if passphrase.is_empty() {
        return Err(CryptError::InvalidArgument("passphrase must not be empty".into()));
    }

    let digest = Sha256::digest(passphrase.as_bytes());
    Key::from_bytes(digest[..algorithm.key_len()].to_vec(), algorithm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_does_not_leak_key_bytes() {
        let key = derive_key("secret", Algorithm::Aes256Cbc).unwrap();
        assert_eq!(format!("{key:?}"), "Key([REDACTED; 32])");
    }

    #[test]
    fn shorter_keys_are_digest_prefixes() {
        let k256 = derive_key("secret", Algorithm::Aes256Cbc).unwrap();
        let k128 = derive_key("secret", Algorithm::Aes128Cbc).unwrap();
        assert_eq!(&k256.as_bytes()[..16], k128.as_bytes());
    }
}
