//! Whole-tree encrypt and decrypt.
//!
//! Strictly sequential: one file is completely transformed (and, with
//! `force`, its source removed) before the walk moves on. The first error
//! aborts the traversal; files handled earlier keep their new state.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::engine::{decrypted_path, encrypted_path, is_encrypted_name, CipherEngine};
use crate::io::Filesystem;
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::CryptError;
use crate::walker::walk::{TreeWalk, WalkEntry};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Direction {
    Encrypt,
    Decrypt,
}

impl Direction {
    fn stage(self) -> Stage {
        match self {
            Direction::Encrypt => Stage::Encrypt,
            Direction::Decrypt => Stage::Decrypt,
        }
    }
}

pub struct TreeWalker<'e, 'c, F: Filesystem> {
    engine: &'e CipherEngine<'c, F>,
}

impl<'e, 'c, F: Filesystem> TreeWalker<'e, 'c, F> {
    pub fn new(engine: &'e CipherEngine<'c, F>) -> Self {
        Self { engine }
    }

    /// Encrypt every regular file below `dir` into a `.sex` sibling.
    ///
    /// Files whose name already carries the suffix are skipped.
    pub fn encrypt_tree(&self, dir: impl AsRef<Path>, force: bool) -> Result<TelemetrySnapshot, CryptError> {
        self.run(dir.as_ref(), force, Direction::Encrypt)
    }

    /// Decrypt every `.sex` file below `dir`. Names that would not strip
    /// cleanly are skipped.
    pub fn decrypt_tree(&self, dir: impl AsRef<Path>, force: bool) -> Result<TelemetrySnapshot, CryptError> {
        self.run(dir.as_ref(), force, Direction::Decrypt)
    }

    fn run(&self, root: &Path, force: bool, direction: Direction) -> Result<TelemetrySnapshot, CryptError> {
        self.engine.config().require_key()?;

        let mut timer = TelemetryTimer::new();
        let mut counters = TelemetryCounters::default();

        let fs = self.engine.filesystem();
        let mut walk = timer.measure(Stage::Walk, || TreeWalk::new(fs, root))?;
        counters.add_directory();

        info!(root = %root.display(), ?direction, force, "tree traversal started");

        loop {
            let Some(entry) = timer.measure(Stage::Walk, || walk.next()) else {
                break;
            };

            let step = entry.and_then(|entry| {
                timer.measure(direction.stage(), || self.visit(entry, force, direction, &mut counters))
            });

            if let Err(e) = step {
                warn!(root = %root.display(), ?direction, error = %e, "tree traversal aborted");
                return Err(e);
            }
        }

        timer.finish();
        let snapshot = TelemetrySnapshot::from(&counters, &timer);
        info!(
            root = %root.display(),
            ?direction,
            files = snapshot.files_processed(),
            skipped = snapshot.files_skipped,
            directories = snapshot.directories_visited,
            elapsed_ms = snapshot.elapsed.as_millis() as u64,
            "tree traversal finished"
        );
        Ok(snapshot)
    }

    fn visit(
        &self,
        entry: WalkEntry,
        force: bool,
        direction: Direction,
        counters: &mut TelemetryCounters,
    ) -> Result<(), CryptError> {
        match entry {
            WalkEntry::Dir(_) => counters.add_directory(),
            WalkEntry::Other(path) => {
                debug!(path = %path.display(), "skipping special entry");
                counters.add_skipped();
            }
            WalkEntry::File(path) => match direction {
                Direction::Encrypt if encrypted_path(&path).is_ok() => {
                    let outcome = self.engine.encrypt_file_outcome(&path, force)?;
                    counters.add_encrypted(&outcome);
                }
                Direction::Decrypt if is_encrypted_name(&path) => {
                    if decrypted_path(&path).is_err() {
                        warn!(path = %path.display(), "ambiguous encrypted name, skipping");
                        counters.add_skipped();
                        return Ok(());
                    }
                    let outcome = self.engine.decrypt_file_outcome(&path, force)?;
                    counters.add_decrypted(&outcome);
                }
                _ => {
                    debug!(path = %path.display(), "skipping file");
                    counters.add_skipped();
                }
            },
        }
        Ok(())
    }
}

impl<'c, F: Filesystem> CipherEngine<'c, F> {
    pub fn walker(&self) -> TreeWalker<'_, 'c, F> {
        TreeWalker::new(self)
    }
}
