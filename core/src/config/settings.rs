//! Serializable cipher settings, e.g. from a JSON file shipped next to the
//! data. Passphrases never live here.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::CryptError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CipherSettings {
    pub algorithm: Option<String>,
    pub encoding: Option<String>,
    pub iv_length: Option<usize>,
}

impl CipherSettings {
    pub fn from_json(text: &str) -> Result<Self, CryptError> {
        serde_json::from_str(text).map_err(|e| CryptError::InvalidArgument(format!("malformed settings: {e}")))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CryptError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => CryptError::not_found(path),
            _ => CryptError::Io(e),
        })?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, CryptError> {
        serde_json::to_string_pretty(self).map_err(|e| CryptError::InvalidArgument(e.to_string()))
    }
}
