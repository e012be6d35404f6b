//! Job model
//!
//! A [`Job`] is either a unit of work or the termination signal sent to a
//! worker once the dispatcher has nothing left for it. Ownership of a job
//! moves through the worker queue, and the outcome of a [`WorkItem`] can only
//! be written once: [`WorkItem::finish`] consumes the item.

use serde::{Deserialize, Serialize};

/// Integer outcome code. `0` is success, anything else is a failure kind.
pub type ErrorCode = i32;

/// Code recorded for a successful job
pub const SUCCESS_CODE: ErrorCode = 0;

/// Code recorded when a job is aborted by the processing timeout
pub const TIMEOUT_ERROR_CODE: ErrorCode = -1;

/// Message carried by a worker queue
#[derive(Debug, Clone, PartialEq)]
pub enum Job {
    /// Work to process
    Work(WorkItem),
    /// Stop the worker loop
    Terminate,
}

impl Job {
    /// Create a work job for the given dispatch index and load
    pub fn work(index: usize, load: f64) -> Self {
        Job::Work(WorkItem::new(index, load))
    }

    /// Whether this is the termination signal
    pub fn is_terminate(&self) -> bool {
        matches!(self, Job::Terminate)
    }
}

/// A generated job waiting to be processed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Position in the dispatch stream
    pub index: usize,

    /// Unique name (`job<index>`)
    pub name: String,

    /// Required processing time in time units
    pub load: f64,
}

impl WorkItem {
    /// Create a work item named after its dispatch index
    pub fn new(index: usize, load: f64) -> Self {
        Self {
            index,
            name: format!("job{index}"),
            load,
        }
    }

    /// Record the outcome, turning this item into a completed job
    pub fn finish(self, worker_id: usize, outcome: JobOutcome, elapsed: f64) -> CompletedJob {
        CompletedJob {
            item: self,
            worker_id,
            outcome,
            elapsed,
        }
    }
}

/// Final state of a processed job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobOutcome {
    /// Completed within the timeout
    Success,
    /// Aborted by the processing timeout
    TimedOut(ErrorCode),
    /// Completed, but a failure code was injected from the error model
    Injected(ErrorCode),
}

impl JobOutcome {
    /// Integer code recorded in the run statistics
    pub fn code(&self) -> ErrorCode {
        match self {
            JobOutcome::Success => SUCCESS_CODE,
            JobOutcome::TimedOut(code) | JobOutcome::Injected(code) => *code,
        }
    }

    /// Whether the job counts as a success
    pub fn is_success(&self) -> bool {
        self.code() == SUCCESS_CODE
    }
}

/// A work item together with its write-once outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedJob {
    /// The job that was processed
    pub item: WorkItem,

    /// Worker that processed it
    pub worker_id: usize,

    /// Recorded outcome
    pub outcome: JobOutcome,

    /// Processing time actually spent, in time units
    pub elapsed: f64,
}

impl CompletedJob {
    /// Integer outcome code
    pub fn error_code(&self) -> ErrorCode {
        self.outcome.code()
    }

    /// Job name
    pub fn name(&self) -> &str {
        &self.item.name
    }
}
