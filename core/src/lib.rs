//! treecrypt-core
//!
//! Passphrase-keyed AES-CBC for strings, files and directory trees.
//! Synchronous, single-threaded, no async runtime.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

pub mod config;
pub mod crypto;
pub mod io;
pub mod telemetry;

// Operations
pub mod engine;
pub mod walker;

pub use types::{CryptError, ErrorKind, Result};

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::config::{Algorithm, CipherConfig, CipherConfigBuilder, CipherSettings, Encoding};
    pub use crate::crypto::{derive_key, Key};
    pub use crate::engine::{CipherEngine, FileOutcome};
    pub use crate::io::{Filesystem, LocalFs, OutputFile};
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::{CryptError, ErrorKind};
    pub use crate::walker::{TreeWalk, TreeWalker, WalkEntry};
}
