//! Worker execution loop

use crate::channel::QueueReceiver;
use crate::config::InjectionMode;
use crate::error::{Error, Result};
use crate::job::{CompletedJob, Job, JobOutcome, WorkItem, TIMEOUT_ERROR_CODE};
use crate::metrics::StatsAggregator;
use crate::traits::ErrorSampler;

use super::protocol::ProcessingProtocol;
use super::stats::WorkerStats;

use std::sync::Arc;

/// Worker processes jobs from its queue: receive -> process -> record -> repeat
///
/// Each worker is a tokio task bound to one queue. It stops on
/// [`Job::Terminate`]; a job that runs into the timeout is recorded as a
/// failure and the loop carries on with the next job.
pub struct Worker {
    /// Unique worker identifier
    id: usize,

    /// Private job queue
    queue: QueueReceiver,

    /// Outcome tally shared with every other worker
    aggregator: Arc<StatsAggregator>,

    /// Slice/timeout protocol
    protocol: ProcessingProtocol,

    /// How sampled error codes are applied
    injection: InjectionMode,

    /// Historical error model, if one was loaded
    error_sampler: Option<Arc<dyn ErrorSampler>>,
}

impl Worker {
    /// Create a new worker
    ///
    /// Use `WorkerBuilder` for a more ergonomic construction.
    pub fn new(
        id: usize,
        queue: QueueReceiver,
        aggregator: Arc<StatsAggregator>,
        protocol: ProcessingProtocol,
        injection: InjectionMode,
        error_sampler: Option<Arc<dyn ErrorSampler>>,
    ) -> Self {
        Self {
            id,
            queue,
            aggregator,
            protocol,
            injection,
            error_sampler,
        }
    }

    /// Run the worker loop until the termination signal arrives
    ///
    /// # Errors
    /// Returns [`Error::Worker`] if the queue closes before a termination
    /// signal was received.
    pub async fn run(mut self) -> Result<WorkerStats> {
        let mut stats = WorkerStats::new(self.id);
        stats.start();

        tracing::info!(worker_id = self.id, "Worker starting");

        loop {
            let item = match self.queue.recv().await {
                Some(Job::Work(item)) => item,
                Some(Job::Terminate) => {
                    tracing::info!(worker_id = self.id, "Received termination signal");
                    break;
                }
                None => {
                    return Err(Error::Worker(format!(
                        "queue for worker{} closed without a termination signal",
                        self.id
                    )));
                }
            };

            tracing::info!(
                worker_id = self.id,
                job = %item.name,
                load = item.load,
                "Received job"
            );

            let done = self.process(item).await;
            self.aggregator.record_outcome(done.error_code());
            stats.record(&done);
        }

        stats.stop();
        tracing::debug!(
            worker_id = self.id,
            completed = stats.completed,
            failed = stats.failed,
            timeouts = stats.timeouts,
            "Worker finished"
        );

        Ok(stats)
    }

    /// Process one job and decide its outcome
    pub async fn process(&self, item: WorkItem) -> CompletedJob {
        let processing = self.protocol.execute(item.load).await;
        let elapsed = self.protocol.to_units(processing.elapsed);

        if processing.timed_out {
            tracing::info!(
                worker_id = self.id,
                job = %item.name,
                elapsed,
                "Aborting job after timeout"
            );
        }

        let outcome = self.decide_outcome(processing.timed_out);
        match outcome {
            JobOutcome::Success => tracing::info!(
                worker_id = self.id,
                job = %item.name,
                elapsed,
                "Completed job"
            ),
            _ => tracing::info!(
                worker_id = self.id,
                job = %item.name,
                error_code = outcome.code(),
                "Job finished with error code"
            ),
        }

        item.finish(self.id, outcome, elapsed)
    }

    /// Map the processing result to an outcome, consulting the error model
    fn decide_outcome(&self, timed_out: bool) -> JobOutcome {
        let sampler = self.error_sampler.as_deref();

        if timed_out {
            let code = sampler
                .and_then(|s| s.sample_error_code())
                .unwrap_or(TIMEOUT_ERROR_CODE);
            return JobOutcome::TimedOut(code);
        }

        match (self.injection, sampler) {
            (InjectionMode::Override { rate }, Some(s)) => s
                .sample_error_code_with_probability(rate)
                .map(JobOutcome::Injected)
                .unwrap_or(JobOutcome::Success),
            _ => JobOutcome::Success,
        }
    }

    /// Get the worker ID
    pub fn id(&self) -> usize {
        self.id
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("protocol", &self.protocol)
            .field("injection", &self.injection)
            .field(
                "error_sampler",
                &self.error_sampler.as_ref().map(|s| s.name().to_string()),
            )
            .finish()
    }
}
