//! File mode.
//!
//! On-disk format: `[IV: iv_length bytes][CBC ciphertext]`. No header, no
//! tag, no length field.
//!
//! Ordering:
//! - the cipher context is built (and the IV validated) before the output is
//!   created;
//! - the output is flushed and synced before the source is touched;
//! - output is staged and only replaces the target on commit, so a failed
//!   transform touches neither the source nor an existing target.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::constants::STREAM_CHUNK_SIZE;
use crate::crypto::{random_iv, Decryptor, Encryptor};
use crate::engine::naming::{decrypted_path, encrypted_path};
use crate::engine::CipherEngine;
use crate::io::{read_exact_or_eof, EntryKind, Filesystem, OutputFile};
use crate::types::CryptError;

/// Result of one file transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub output: PathBuf,
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub source_removed: bool,
}

#[derive(Default)]
struct Transferred {
    read: u64,
    written: u64,
}

impl<'c, F: Filesystem> CipherEngine<'c, F> {
    /// Encrypt `path` into `path.sex` with a fresh random IV and return the
    /// output path. With `force`, the source is removed afterwards.
    pub fn encrypt_file(&self, path: impl AsRef<Path>, force: bool) -> Result<PathBuf, CryptError> {
        Ok(self.encrypt_file_outcome(path.as_ref(), force)?.output)
    }

    /// Decrypt `path.sex` back into `path` and return the output path. With
    /// `force`, the encrypted file is removed afterwards.
    pub fn decrypt_file(&self, path: impl AsRef<Path>, force: bool) -> Result<PathBuf, CryptError> {
        Ok(self.decrypt_file_outcome(path.as_ref(), force)?.output)
    }

    pub fn encrypt_file_outcome(&self, path: &Path, force: bool) -> Result<FileOutcome, CryptError> {
        let key = self.config.require_key()?;
        self.require_file(path)?;
        let output = encrypted_path(path)?;

        let iv = random_iv(self.config.iv_length());
        let mut encryptor = Encryptor::new(self.config.algorithm(), key, &iv)?;
        let mut reader = self.fs.open_read(path)?;

        debug!(source = %path.display(), output = %output.display(), "encrypting file");
        let transferred = self.stream_into(&output, |sink| {
            let mut t = Transferred::default();
            sink.write_all(&iv)?;
            t.written += iv.len() as u64;

            let mut out = Vec::with_capacity(STREAM_CHUNK_SIZE + iv.len());
            loop {
                let chunk = read_exact_or_eof(&mut reader, STREAM_CHUNK_SIZE)?;
                if chunk.is_empty() {
                    break;
                }
                t.read += chunk.len() as u64;

                out.clear();
                encryptor.update(&chunk, &mut out);
                sink.write_all(&out)?;
                t.written += out.len() as u64;
            }

            out.clear();
            encryptor.finalize(&mut out);
            sink.write_all(&out)?;
            t.written += out.len() as u64;
            Ok(t)
        })?;

        self.finish(path, output, force, transferred)
    }

    pub fn decrypt_file_outcome(&self, path: &Path, force: bool) -> Result<FileOutcome, CryptError> {
        let key = self.config.require_key()?;
        self.require_file(path)?;
        let output = decrypted_path(path)?;

        let iv_len = self.config.iv_length();
        let mut reader = self.fs.open_read(path)?;
        let iv = read_exact_or_eof(&mut reader, iv_len)?;
        if iv.len() < iv_len {
            return Err(CryptError::DecryptionFailed(format!(
                "{} is shorter than its {iv_len}-byte IV",
                path.display()
            )));
        }
        let mut decryptor = Decryptor::new(self.config.algorithm(), key, &iv)?;

        debug!(source = %path.display(), output = %output.display(), "decrypting file");
        let transferred = self.stream_into(&output, |sink| {
            let mut t = Transferred {
                read: iv.len() as u64,
                written: 0,
            };

            let mut out = Vec::with_capacity(STREAM_CHUNK_SIZE);
            loop {
                let chunk = read_exact_or_eof(&mut reader, STREAM_CHUNK_SIZE)?;
                if chunk.is_empty() {
                    break;
                }
                t.read += chunk.len() as u64;

                out.clear();
                decryptor.update(&chunk, &mut out);
                sink.write_all(&out)?;
                t.written += out.len() as u64;
            }

            out.clear();
            decryptor.finalize(&mut out)?;
            sink.write_all(&out)?;
            t.written += out.len() as u64;
            Ok(t)
        })?;

        self.finish(path, output, force, transferred)
    }

    fn require_file(&self, path: &Path) -> Result<(), CryptError> {
        if !self.fs.exists(path) {
            return Err(CryptError::not_found(path));
        }
        match self.fs.entry_kind(path)? {
            EntryKind::File => Ok(()),
            _ => Err(CryptError::InvalidArgument(format!("{} is not a regular file", path.display()))),
        }
    }

    /// Stage `output`, run `pump` against it and commit. On failure the
    /// staged data is discarded and any existing file at `output` is left
    /// as it was.
    fn stream_into<P>(&self, output: &Path, pump: P) -> Result<Transferred, CryptError>
    where
        P: FnOnce(&mut dyn OutputFile) -> Result<Transferred, CryptError>,
    {
        let mut sink = self.fs.create(output)?;

        let pumped = pump(sink.as_mut());
        let result = match pumped {
            Ok(t) => sink.commit().map(|_| t).map_err(CryptError::from),
            Err(e) => {
                drop(sink);
                Err(e)
            }
        };

        if let Err(e) = &result {
            warn!(output = %output.display(), error = %e, "transform failed, staged output discarded");
        }
        result
    }

    /// Runs only after the output is committed.
    fn finish(&self, source: &Path, output: PathBuf, force: bool, t: Transferred) -> Result<FileOutcome, CryptError> {
        if force {
            self.fs.remove_file(source).map_err(|error| CryptError::SourceNotRemoved {
                source_path: source.to_path_buf(),
                output: output.clone(),
                error,
            })?;
        }

        info!(
            source = %source.display(),
            output = %output.display(),
            bytes_read = t.read,
            bytes_written = t.written,
            source_removed = force,
            "file transformed"
        );

        Ok(FileOutcome {
            output,
            bytes_read: t.read,
            bytes_written: t.written,
            source_removed: force,
        })
    }
}
