//! Derived file names.
//!
//! Encryption appends the reserved suffix to the final path component;
//! decryption removes it again. Names that already contain the suffix
//! anywhere else are rejected, so stripping is never ambiguous.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::constants::ENCRYPTED_SUFFIX;
use crate::types::CryptError;

fn file_name_lossy(path: &Path) -> Result<String, CryptError> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| CryptError::InvalidArgument(format!("{} has no file name", path.display())))
}

/// True when the final component ends with the reserved suffix.
pub fn is_encrypted_name(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().ends_with(ENCRYPTED_SUFFIX))
        .unwrap_or(false)
}

/// `dir/name` -> `dir/name.sex`
pub fn encrypted_path(path: &Path) -> Result<PathBuf, CryptError> {
    let name = file_name_lossy(path)?;
    if name.contains(ENCRYPTED_SUFFIX) {
        return Err(CryptError::InvalidArgument(format!(
            "{} already contains the reserved suffix {ENCRYPTED_SUFFIX}",
            path.display()
        )));
    }

    let mut encrypted = path.file_name().map(OsString::from).unwrap_or_default();
    encrypted.push(ENCRYPTED_SUFFIX);
    Ok(path.with_file_name(encrypted))
}

/// `dir/name.sex` -> `dir/name`
pub fn decrypted_path(path: &Path) -> Result<PathBuf, CryptError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CryptError::InvalidArgument(format!("{} has no UTF-8 file name", path.display())))?;

    let stem = name.strip_suffix(ENCRYPTED_SUFFIX).ok_or_else(|| {
        CryptError::InvalidArgument(format!("{} does not end with {ENCRYPTED_SUFFIX}", path.display()))
    })?;

    if stem.is_empty() || stem.contains(ENCRYPTED_SUFFIX) {
        return Err(CryptError::InvalidArgument(format!(
            "{} is not a name this tool produces",
            path.display()
        )));
    }

    Ok(path.with_file_name(stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;

    #[test]
    fn appends_and_strips_suffix() {
        let enc = encrypted_path(Path::new("/data/report.txt")).unwrap();
        assert_eq!(enc, Path::new("/data/report.txt.sex"));
        assert_eq!(decrypted_path(&enc).unwrap(), Path::new("/data/report.txt"));
    }

    #[test]
    fn suffix_only_in_directory_part_is_fine() {
        let enc = encrypted_path(Path::new("backup.sex/notes")).unwrap();
        assert_eq!(enc, Path::new("backup.sex/notes.sex"));
        assert_eq!(decrypted_path(&enc).unwrap(), Path::new("backup.sex/notes"));
    }

    #[test]
    fn ambiguous_names_are_rejected() {
        for bad in ["a.sex", "a.sex.txt", "x.sexy"] {
            let err = encrypted_path(Path::new(bad)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{bad}");
        }
        for bad in ["a.sex.sex", ".sex", "plain.txt", "a.sex.txt"] {
            let err = decrypted_path(Path::new(bad)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{bad}");
        }
    }

    #[test]
    fn detects_encrypted_names() {
        assert!(is_encrypted_name(Path::new("d/a.txt.sex")));
        assert!(!is_encrypted_name(Path::new("d/a.txt")));
        assert!(!is_encrypted_name(Path::new("/")));
    }
}
