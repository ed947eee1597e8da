use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::constants::{key_lens, AES_BLOCK_LEN, MAX_AES_IV_LENGTH};
use crate::types::CryptError;

/// Symmetric cipher selection. Every variant is AES in CBC mode; they differ
/// only in key length.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "aes-128-cbc")]
    Aes128Cbc,
    #[serde(rename = "aes-192-cbc")]
    Aes192Cbc,
    #[default]
    #[serde(rename = "aes-256-cbc")]
    Aes256Cbc,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Aes128Cbc, Algorithm::Aes192Cbc, Algorithm::Aes256Cbc];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Aes128Cbc => "aes-128-cbc",
            Algorithm::Aes192Cbc => "aes-192-cbc",
            Algorithm::Aes256Cbc => "aes-256-cbc",
        }
    }

    /// Key material length the cipher expects.
    pub fn key_len(&self) -> usize {
        match self {
            Algorithm::Aes128Cbc => key_lens::AES128,
            Algorithm::Aes192Cbc => key_lens::AES192,
            Algorithm::Aes256Cbc => key_lens::AES256,
        }
    }

    pub fn block_len(&self) -> usize {
        AES_BLOCK_LEN
    }

    pub fn is_aes(&self) -> bool {
        matches!(self, Algorithm::Aes128Cbc | Algorithm::Aes192Cbc | Algorithm::Aes256Cbc)
    }

    /// Upper bound on the configured IV length, if the family imposes one.
    pub fn max_iv_len(&self) -> Option<usize> {
        self.is_aes().then_some(MAX_AES_IV_LENGTH)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = CryptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.name() == wanted)
            .ok_or_else(|| CryptError::InvalidArgument(format!("unsupported algorithm: {s:?}")))
    }
}

/// Binary-to-text codec for string-mode ciphertext.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    Hex,
    Base64,
    /// URL-safe alphabet, no padding.
    Base64Url,
}

impl Encoding {
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Hex => "hex",
            Encoding::Base64 => "base64",
            Encoding::Base64Url => "base64url",
        }
    }

    /// Resolve an optional encoding name; empty or absent means hex.
    pub fn parse(name: Option<&str>) -> Result<Self, CryptError> {
        match name.map(str::trim) {
            None | Some("") => Ok(Encoding::Hex),
            Some(other) => other.parse(),
        }
    }

    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            Encoding::Hex => hex::encode(bytes),
            Encoding::Base64 => STANDARD.encode(bytes),
            Encoding::Base64Url => URL_SAFE_NO_PAD.encode(bytes),
        }
    }

    pub fn decode(&self, text: &str) -> Result<Vec<u8>, CryptError> {
        let decoded = match self {
            Encoding::Hex => hex::decode(text).map_err(|e| e.to_string()),
            Encoding::Base64 => STANDARD.decode(text).map_err(|e| e.to_string()),
            Encoding::Base64Url => URL_SAFE_NO_PAD.decode(text).map_err(|e| e.to_string()),
        };
        decoded.map_err(|msg| CryptError::DecryptionFailed(format!("input is not valid {}: {msg}", self.name())))
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = CryptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hex" => Ok(Encoding::Hex),
            "base64" => Ok(Encoding::Base64),
            "base64url" => Ok(Encoding::Base64Url),
            _ => Err(CryptError::InvalidArgument(format!("unsupported encoding: {s:?}"))),
        }
    }
}
