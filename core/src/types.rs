use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Coarse error taxonomy. Callers match on this instead of on variants.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    PreconditionFailed,
    InvalidArgument,
    ConstraintViolation,
    NotFound,
    DecryptionFailed,
    IoFailure,
}

/// Unified error for configuration, cipher, file and tree operations.
/// - `From<io::Error>` enables `?` across every filesystem call.
/// - Messages are stable enough to log.
#[derive(Debug, Error)]
pub enum CryptError {
    /// A cipher operation was attempted before a key was configured.
    #[error("precondition failed: no key configured")]
    KeyNotSet,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A value is well-formed but breaks a limit of the cipher family.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Padding check, encoding or UTF-8 failure while decrypting.
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The transform succeeded and `output` is on disk, but the source
    /// could not be deleted. Both files are present.
    #[error("wrote {} but could not remove source {}: {error}", output.display(), source_path.display())]
    SourceNotRemoved {
        source_path: PathBuf,
        output: PathBuf,
        #[source]
        error: io::Error,
    },
}

impl CryptError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CryptError::KeyNotSet => ErrorKind::PreconditionFailed,
            CryptError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            CryptError::ConstraintViolation(_) => ErrorKind::ConstraintViolation,
            CryptError::NotFound { .. } => ErrorKind::NotFound,
            CryptError::DecryptionFailed(_) => ErrorKind::DecryptionFailed,
            CryptError::Io(_) | CryptError::SourceNotRemoved { .. } => ErrorKind::IoFailure,
        }
    }

    pub(crate) fn not_found(path: impl Into<PathBuf>) -> Self {
        CryptError::NotFound { path: path.into() }
    }
}

pub type Result<T, E = CryptError> = std::result::Result<T, E>;
