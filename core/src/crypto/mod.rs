//! crypto: key derivation, IVs and AES-CBC contexts.

pub mod context;
pub mod iv;
pub mod kdf;

pub use context::*;
pub use iv::*;
pub use kdf::*;
