//! Outcome aggregation shared by all workers

use crate::job::{ErrorCode, SUCCESS_CODE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Thread-safe tally of job outcomes
///
/// Owned by the orchestrator and handed to every worker through an `Arc`.
/// Each `record_outcome` call is a single atomic increment, either of the
/// success counter or of one entry in the failure map.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    successes: AtomicU64,
    failures: Mutex<BTreeMap<ErrorCode, u64>>,
}

impl StatsAggregator {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one job outcome
    pub fn record_outcome(&self, code: ErrorCode) {
        if code == SUCCESS_CODE {
            self.successes.fetch_add(1, Ordering::Relaxed);
            return;
        }

        // Increments never leave the map half-updated, so a poisoned lock is still usable.
        let mut failures = self
            .failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *failures.entry(code).or_insert(0) += 1;
    }

    /// Snapshot the counters
    ///
    /// Meant to be called after every worker has terminated.
    pub fn summary(&self) -> RunStats {
        let failures = self
            .failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();

        RunStats {
            total_success: self.successes.load(Ordering::Relaxed),
            failures,
        }
    }
}

/// Aggregate outcome counts for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Jobs that completed successfully
    pub total_success: u64,

    /// Failed jobs per error code
    pub failures: BTreeMap<ErrorCode, u64>,
}

impl RunStats {
    /// Total failed jobs across all codes
    pub fn total_failures(&self) -> u64 {
        self.failures.values().sum()
    }

    /// Total recorded jobs
    pub fn total(&self) -> u64 {
        self.total_success + self.total_failures()
    }

    /// Failures recorded for one code
    pub fn failures_for(&self, code: ErrorCode) -> u64 {
        self.failures.get(&code).copied().unwrap_or(0)
    }

    /// Success rate (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.total_success as f64 / total as f64
        }
    }
}
