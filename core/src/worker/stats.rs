//! Worker statistics tracking

use serde::Serialize;
use tokio::time::Instant;

use crate::job::{CompletedJob, JobOutcome};

/// Statistics tracked by each worker
#[derive(Debug, Default, Clone, Serialize)]
pub struct WorkerStats {
    /// Worker identifier
    pub worker_id: usize,

    /// Jobs that completed successfully
    pub completed: usize,

    /// Jobs recorded with a failure code
    pub failed: usize,

    /// Jobs aborted by the timeout (a subset of `failed`)
    pub timeouts: usize,

    /// Processing time spent, in time units
    pub busy: f64,

    /// Names of processed jobs, in processing order
    pub processed: Vec<String>,

    /// Worker start time
    #[serde(skip)]
    pub started_at: Option<Instant>,

    /// Worker end time
    #[serde(skip)]
    pub ended_at: Option<Instant>,
}

impl WorkerStats {
    /// Create new empty stats for a worker
    pub fn new(worker_id: usize) -> Self {
        Self {
            worker_id,
            ..Default::default()
        }
    }

    /// Start tracking (records start time)
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Stop tracking (records end time)
    pub fn stop(&mut self) {
        self.ended_at = Some(Instant::now());
    }

    /// Total number of processed jobs
    pub fn total_jobs(&self) -> usize {
        self.completed + self.failed
    }

    /// Success rate (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        if self.total_jobs() == 0 {
            0.0
        } else {
            self.completed as f64 / self.total_jobs() as f64
        }
    }

    /// Elapsed clock time since start
    pub fn elapsed(&self) -> Option<std::time::Duration> {
        self.started_at.map(|start| {
            self.ended_at
                .map(|end| end.duration_since(start))
                .unwrap_or_else(|| start.elapsed())
        })
    }

    /// Record a processed job
    pub fn record(&mut self, job: &CompletedJob) {
        match job.outcome {
            JobOutcome::Success => self.completed += 1,
            JobOutcome::TimedOut(_) => {
                self.failed += 1;
                self.timeouts += 1;
            }
            JobOutcome::Injected(_) => self.failed += 1,
        }
        self.busy += job.elapsed;
        self.processed.push(job.item.name.clone());
    }

    /// Merge counters from another worker
    pub fn merge(&mut self, other: &WorkerStats) {
        self.completed += other.completed;
        self.failed += other.failed;
        self.timeouts += other.timeouts;
        self.busy += other.busy;
    }
}
