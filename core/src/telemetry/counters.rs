//! telemetry/counters.rs
//! Mutable counters collected while a tree is being transformed.
//! Converted into an immutable TelemetrySnapshot at the end of the walk.

use serde::{Deserialize, Serialize};

use crate::engine::FileOutcome;

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub files_encrypted: u64,
    pub files_decrypted: u64,
    /// Entries left untouched: non-`.sex` files on decrypt, special files.
    pub files_skipped: u64,
    /// Includes the root.
    pub directories_visited: u64,
    pub sources_removed: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
}

impl TelemetryCounters {
    pub fn add_encrypted(&mut self, outcome: &FileOutcome) {
        self.files_encrypted += 1;
        self.add_io(outcome);
    }

    pub fn add_decrypted(&mut self, outcome: &FileOutcome) {
        self.files_decrypted += 1;
        self.add_io(outcome);
    }

    pub fn add_skipped(&mut self) {
        self.files_skipped += 1;
    }

    pub fn add_directory(&mut self) {
        self.directories_visited += 1;
    }

    fn add_io(&mut self, outcome: &FileOutcome) {
        self.bytes_read += outcome.bytes_read;
        self.bytes_written += outcome.bytes_written;
        if outcome.source_removed {
            self.sources_removed += 1;
        }
    }

    pub fn files_processed(&self) -> u64 {
        self.files_encrypted + self.files_decrypted
    }
}
