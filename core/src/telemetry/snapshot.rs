use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{StageTimes, TelemetryTimer};

/// Immutable summary of one completed tree operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub files_encrypted: u64,
    pub files_decrypted: u64,
    pub files_skipped: u64,
    pub directories_visited: u64,
    pub sources_removed: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub throughput_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_read as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            files_encrypted: counters.files_encrypted,
            files_decrypted: counters.files_decrypted,
            files_skipped: counters.files_skipped,
            directories_visited: counters.directories_visited,
            sources_removed: counters.sources_removed,
            bytes_read: counters.bytes_read,
            bytes_written: counters.bytes_written,
            throughput_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn files_processed(&self) -> u64 {
        self.files_encrypted + self.files_decrypted
    }

    /// Stage times can never add up to more than the whole walk.
    pub fn sanity_check(&self) -> bool {
        self.stage_times.total() <= self.elapsed
    }
}
