//! Filesystem capability used by the engine and the tree walker.
//!
//! Everything that touches disk goes through [`Filesystem`], so an
//! alternative implementation (an in-memory store, or one that injects
//! failures) can be dropped in without changing the cipher code.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// What a directory entry is, as far as traversal cares.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Sockets, devices, dangling links, symlinks to directories.
    Other,
}

/// Destination of a transform. Nothing is visible at the target path until
/// `commit`; dropping it uncommitted leaves whatever was there untouched.
pub trait OutputFile: Write {
    /// Flush, make the content durable and publish it at the target path.
    fn commit(self: Box<Self>) -> io::Result<()>;
}

pub trait Filesystem {
    fn exists(&self, path: &Path) -> bool;

    fn entry_kind(&self, path: &Path) -> io::Result<EntryKind>;

    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + '_>>;

    /// Stage a new file that replaces `path` on commit.
    fn create(&self, path: &Path) -> io::Result<Box<dyn OutputFile + '_>>;

    /// Entries of `path`, in whatever order the platform lists them.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Follows symlinks, unlike `entry_kind`.
    fn is_dir(&self, path: &Path) -> bool;
}

impl<F: Filesystem + ?Sized> Filesystem for &F {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn entry_kind(&self, path: &Path) -> io::Result<EntryKind> {
        (**self).entry_kind(path)
    }

    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        (**self).open_read(path)
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn OutputFile + '_>> {
        (**self).create(path)
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        (**self).list_dir(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        (**self).remove_file(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }
}

/// The local disk via `std::fs`.
#[derive(Copy, Clone, Debug, Default)]
pub struct LocalFs;

impl Filesystem for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn entry_kind(&self, path: &Path) -> io::Result<EntryKind> {
        let meta = fs::symlink_metadata(path)?;
        let file_type = meta.file_type();

        if file_type.is_dir() {
            return Ok(EntryKind::Dir);
        }
        if file_type.is_file() {
            return Ok(EntryKind::File);
        }
        if file_type.is_symlink() {
            // Links to files are followed; links to directories are not, so a
            // walk can never cycle.
            return Ok(match fs::metadata(path) {
                Ok(target) if target.is_file() => EntryKind::File,
                _ => EntryKind::Other,
            });
        }
        Ok(EntryKind::Other)
    }

    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn OutputFile + '_>> {
        // Same directory as the target, so the final rename never crosses
        // filesystems.
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        Ok(Box::new(LocalOutput {
            writer: BufWriter::new(NamedTempFile::new_in(parent)?),
            target: path.to_path_buf(),
        }))
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect()
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
    }
}

/// Writes into a temporary sibling of `target`. The temporary file is
/// deleted on drop unless `commit` renamed it into place.
struct LocalOutput {
    writer: BufWriter<NamedTempFile>,
    target: PathBuf,
}

impl Write for LocalOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl OutputFile for LocalOutput {
    fn commit(self: Box<Self>) -> io::Result<()> {
        let LocalOutput { writer, target } = *self;
        let staged = writer.into_inner().map_err(|e| e.into_error())?;
        staged.as_file().sync_all()?;
        staged.persist(&target).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Fill up to `len` bytes, stopping early only at EOF.
pub fn read_exact_or_eof<R: Read + ?Sized>(r: &mut R, len: usize) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    let mut off = 0;

    while off < len {
        let n = match r.read(&mut buf[off..]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        off += n;
    }

    buf.truncate(off);
    Ok(buf)
}
