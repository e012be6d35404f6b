//! Result aggregation from the worker pool

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::metrics::RunStats;
use crate::worker::WorkerStats;

/// Everything known about a finished run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Jobs generated by the dispatcher
    pub num_jobs: usize,

    /// Size of the worker pool
    pub num_workers: usize,

    /// Outcome counts from the shared aggregator
    pub stats: RunStats,

    /// Per-worker statistics, indexed by worker id
    pub workers: Vec<WorkerStats>,

    /// Run duration in time units
    pub elapsed: f64,

    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,

    /// Name of the error model, if one was used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_model: Option<String>,
}

impl RunReport {
    /// Successful jobs
    pub fn total_success(&self) -> u64 {
        self.stats.total_success
    }

    /// Failed jobs (total minus successes)
    pub fn total_failures(&self) -> u64 {
        (self.num_jobs as u64).saturating_sub(self.stats.total_success)
    }

    /// Whether every generated job has exactly one recorded outcome
    pub fn is_consistent(&self) -> bool {
        self.stats.total() == self.num_jobs as u64
    }

    /// Totals across the pool
    pub fn pool_totals(&self) -> AggregatedStats {
        aggregate_worker_stats(&self.workers)
    }
}

/// Aggregated statistics from all workers
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregatedStats {
    /// Number of workers that terminated
    pub total_workers: usize,

    /// Total successful jobs
    pub total_completed: usize,

    /// Total failed jobs
    pub total_failed: usize,

    /// Total jobs aborted by the timeout
    pub total_timeouts: usize,

    /// Processing time summed over workers, in time units
    pub total_busy: f64,

    /// Largest number of jobs processed by a single worker
    pub max_jobs_per_worker: usize,
}

impl AggregatedStats {
    /// Total number of processed jobs
    pub fn total_jobs(&self) -> usize {
        self.total_completed + self.total_failed
    }

    /// Success rate (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        let total = self.total_jobs();
        if total > 0 {
            self.total_completed as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Fraction of `elapsed` the pool spent processing
    pub fn utilization(&self, elapsed: f64) -> f64 {
        let capacity = elapsed * self.total_workers as f64;
        if capacity > 0.0 {
            (self.total_busy / capacity).min(1.0)
        } else {
            0.0
        }
    }
}

/// Aggregate statistics from multiple workers
pub fn aggregate_worker_stats(stats: &[WorkerStats]) -> AggregatedStats {
    if stats.is_empty() {
        return AggregatedStats::default();
    }

    let mut totals = WorkerStats::default();
    for worker in stats {
        totals.merge(worker);
    }

    AggregatedStats {
        total_workers: stats.len(),
        total_completed: totals.completed,
        total_failed: totals.failed,
        total_timeouts: totals.timeouts,
        total_busy: totals.busy,
        max_jobs_per_worker: stats.iter().map(WorkerStats::total_jobs).max().unwrap_or(0),
    }
}
