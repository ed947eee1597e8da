//! String mode.
//!
//! The IV is all zero, so output is a pure function of (key, plaintext):
//! equal inputs give equal tokens and repeated plaintexts are visible.
//! Use it for reproducible identifiers, not for confidential values that
//! are encrypted more than once.

use crate::config::CipherConfig;
use crate::crypto::{decrypt_bytes, encrypt_bytes, zero_iv};
use crate::engine::CipherEngine;
use crate::types::CryptError;

/// UTF-8 text -> cipher -> configured encoding.
pub fn encrypt_value(config: &CipherConfig, plaintext: &str) -> Result<String, CryptError> {
    let key = config.require_key()?;
    let iv = zero_iv(config.iv_length());
    let ciphertext = encrypt_bytes(config.algorithm(), key, &iv, plaintext.as_bytes())?;
    Ok(config.encoding().encode(&ciphertext))
}

/// Configured encoding -> cipher -> UTF-8 text.
pub fn decrypt_value(config: &CipherConfig, encoded: &str) -> Result<String, CryptError> {
    let key = config.require_key()?;
    let iv = zero_iv(config.iv_length());
    let ciphertext = config.encoding().decode(encoded)?;
    let plaintext = decrypt_bytes(config.algorithm(), key, &iv, &ciphertext)?;
    String::from_utf8(plaintext)
        .map_err(|_| CryptError::DecryptionFailed("recovered plaintext is not valid UTF-8".into()))
}

impl<'c, F> CipherEngine<'c, F> {
    pub fn encrypt_value(&self, plaintext: &str) -> Result<String, CryptError> {
        encrypt_value(self.config, plaintext)
    }

    pub fn decrypt_value(&self, encoded: &str) -> Result<String, CryptError> {
        decrypt_value(self.config, encoded)
    }
}
