//! engine: cipher operations bound to one frozen configuration.
//!
//! Two modes with different security properties, kept as separate calls:
//! - value mode (`encrypt_value` / `decrypt_value`): zero IV, deterministic;
//! - file mode (`encrypt_file` / `decrypt_file`): random IV stored in front
//!   of the ciphertext.

pub mod file;
pub mod naming;
pub mod value;

pub use file::FileOutcome;
pub use naming::{decrypted_path, encrypted_path, is_encrypted_name};
pub use value::{decrypt_value, encrypt_value};

use crate::config::CipherConfig;
use crate::io::{Filesystem, LocalFs};

/// Borrowed configuration plus the filesystem the file mode works on.
pub struct CipherEngine<'c, F = LocalFs> {
    config: &'c CipherConfig,
    fs: F,
}

impl<'c> CipherEngine<'c> {
    pub fn new(config: &'c CipherConfig) -> Self {
        Self { config, fs: LocalFs }
    }
}

impl<'c, F: Filesystem> CipherEngine<'c, F> {
    pub fn with_filesystem(config: &'c CipherConfig, fs: F) -> Self {
        Self { config, fs }
    }

    pub fn config(&self) -> &CipherConfig {
        self.config
    }

    pub fn filesystem(&self) -> &F {
        &self.fs
    }
}
