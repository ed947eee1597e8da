//! config/mod.rs
//! Cipher configuration: algorithm, output encoding, key material, IV length.
//!
//! Design:
//! - `CipherConfigBuilder` is the only place configuration is mutated.
//! - `build()` freezes it into a `CipherConfig`, which every engine call
//!   borrows. There is no process-wide state.

pub mod settings;
pub mod types;

pub use settings::*;
pub use types::*;

use crate::constants::DEFAULT_IV_LENGTH;
use crate::crypto::kdf::{derive_key, Key};
use crate::types::CryptError;

/// Frozen configuration shared by value, file and tree operations.
#[derive(Clone, Debug)]
pub struct CipherConfig {
    algorithm: Algorithm,
    encoding: Encoding,
    key: Option<Key>,
    iv_length: usize,
}

impl CipherConfig {
    pub fn builder(algorithm: Algorithm) -> CipherConfigBuilder {
        CipherConfigBuilder::new(algorithm)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn iv_length(&self) -> usize {
        self.iv_length
    }

    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    /// Key material, or `KeyNotSet` when none was derived.
    pub(crate) fn require_key(&self) -> Result<&Key, CryptError> {
        self.key.as_ref().ok_or(CryptError::KeyNotSet)
    }
}

impl Default for CipherConfig {
    fn default() -> Self {
        CipherConfigBuilder::default().build()
    }
}

#[derive(Clone, Debug)]
pub struct CipherConfigBuilder {
    algorithm: Algorithm,
    encoding: Encoding,
    key: Option<Key>,
    iv_length: usize,
}

impl Default for CipherConfigBuilder {
    fn default() -> Self {
        Self::new(Algorithm::default())
    }
}

impl CipherConfigBuilder {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            encoding: Encoding::default(),
            key: None,
            iv_length: DEFAULT_IV_LENGTH,
        }
    }

    /// Apply loaded settings through the regular setters, so the same
    /// validation runs for files and for code.
    pub fn from_settings(settings: &CipherSettings) -> Result<Self, CryptError> {
        let algorithm = match settings.algorithm.as_deref() {
            Some(name) if !name.trim().is_empty() => name.parse()?,
            _ => Algorithm::default(),
        };

        let mut builder = Self::new(algorithm);
        builder.set_encoding(settings.encoding.as_deref())?;
        if let Some(n) = settings.iv_length {
            builder.set_iv_length(Some(n))?;
        }
        Ok(builder)
    }

    /// Derive key material from `passphrase`, store it and hand a copy back.
    pub fn set_key(&mut self, passphrase: &str) -> Result<Key, CryptError> {
        let key = derive_key(passphrase, self.algorithm)?;
        self.key = Some(key.clone());
        Ok(key)
    }

    pub fn set_encoding(&mut self, encoding: Option<&str>) -> Result<(), CryptError> {
        self.encoding = Encoding::parse(encoding)?;
        Ok(())
    }

    pub fn set_iv_length(&mut self, iv_length: Option<usize>) -> Result<(), CryptError> {
        let n = match iv_length {
            None | Some(0) => {
                return Err(CryptError::InvalidArgument("IV length must be a positive number of bytes".into()))
            }
            Some(n) => n,
        };

        if let Some(max) = self.algorithm.max_iv_len() {
            if n > max {
                return Err(CryptError::ConstraintViolation(format!(
                    "IV length {n} exceeds the {max}-byte maximum of {}",
                    self.algorithm
                )));
            }
        }

        self.iv_length = n;
        Ok(())
    }

    /// Chainable form of [`set_key`](Self::set_key).
    pub fn with_passphrase(mut self, passphrase: &str) -> Result<Self, CryptError> {
        self.set_key(passphrase)?;
        Ok(self)
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn build(self) -> CipherConfig {
        CipherConfig {
            algorithm: self.algorithm,
            encoding: self.encoding,
            key: self.key,
            iv_length: self.iv_length,
        }
    }
}
