#![allow(dead_code)]

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::cell::Cell;
use std::sync::Once;

use treecrypt_core::config::{Algorithm, CipherConfig};
use treecrypt_core::io::{EntryKind, Filesystem, LocalFs, OutputFile};

static INIT: Once = Once::new();
static DISK: LocalFs = LocalFs;

/// Route `tracing` output to the test harness. `RUST_LOG=treecrypt_core=debug`
/// shows per-file events.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("treecrypt_core=warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

pub fn keyed_config(passphrase: &str) -> CipherConfig {
    CipherConfig::builder(Algorithm::Aes256Cbc)
        .with_passphrase(passphrase)
        .unwrap()
        .build()
}

/// `LocalFs` with injected failures: outputs that fail after `fail_after`
/// bytes, a `create` that fails on call number `fail_create_at` (1-based),
/// or a `remove_file` that always fails.
#[derive(Default)]
pub struct FaultyFs {
    pub fail_after: Option<usize>,
    pub fail_create_at: Option<usize>,
    pub fail_remove: bool,
    creates: Cell<usize>,
}

impl FaultyFs {
    pub fn failing_writes_after(bytes: usize) -> Self {
        Self { fail_after: Some(bytes), ..Self::default() }
    }

    pub fn failing_create_at(call: usize) -> Self {
        Self { fail_create_at: Some(call), ..Self::default() }
    }

    pub fn failing_remove() -> Self {
        Self { fail_remove: true, ..Self::default() }
    }
}

impl Filesystem for FaultyFs {
    fn exists(&self, path: &Path) -> bool {
        DISK.exists(path)
    }

    fn entry_kind(&self, path: &Path) -> io::Result<EntryKind> {
        DISK.entry_kind(path)
    }

    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        DISK.open_read(path)
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn OutputFile + '_>> {
        let call = self.creates.get() + 1;
        self.creates.set(call);
        if self.fail_create_at == Some(call) {
            return Err(io::Error::new(io::ErrorKind::Other, "injected create failure"));
        }
        let inner = DISK.create(path)?;
        Ok(Box::new(FaultyOutput {
            inner,
            budget: self.fail_after,
        }))
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        DISK.list_dir(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        if self.fail_remove {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "remove disabled"));
        }
        DISK.remove_file(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        DISK.is_dir(path)
    }
}

struct FaultyOutput<'a> {
    inner: Box<dyn OutputFile + 'a>,
    budget: Option<usize>,
}

impl io::Write for FaultyOutput<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(left) = self.budget.as_mut() {
            if *left < buf.len() {
                return Err(io::Error::new(io::ErrorKind::Other, "injected write failure"));
            }
            *left -= buf.len();
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl OutputFile for FaultyOutput<'_> {
    fn commit(self: Box<Self>) -> io::Result<()> {
        self.inner.commit()
    }
}
