//! Orchestrator execution logic

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::channel::worker_queues;
use crate::config::SimulationConfig;
use crate::dispatcher::{DispatchStats, Dispatcher};
use crate::error::{Error, Result};
use crate::metrics::StatsAggregator;
use crate::traits::{ErrorSampler, LoadSampler};
use crate::worker::{WorkerBuilder, WorkerStats};

use super::aggregator::{aggregate_worker_stats, RunReport};

/// Orchestrator manages the run lifecycle
///
/// Responsible for creating the worker queues, spawning the workers and the
/// dispatcher, waiting for every worker to terminate and collecting results.
pub struct Orchestrator {
    /// Simulation configuration
    pub(crate) config: SimulationConfig,

    /// Load source handed to the dispatcher
    pub(crate) load_sampler: Box<dyn LoadSampler>,

    /// Historical error model shared by all workers
    pub(crate) error_sampler: Option<Arc<dyn ErrorSampler>>,

    /// Outcome tally shared by all workers
    pub(crate) aggregator: Arc<StatsAggregator>,
}

impl Orchestrator {
    /// Create a new orchestrator
    ///
    /// Use `OrchestratorBuilder` for a more ergonomic construction.
    pub fn new(
        config: SimulationConfig,
        load_sampler: Box<dyn LoadSampler>,
        error_sampler: Option<Arc<dyn ErrorSampler>>,
    ) -> Self {
        Self {
            config,
            load_sampler,
            error_sampler,
            aggregator: Arc::new(StatsAggregator::new()),
        }
    }

    /// Get the simulation configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run the simulation
    ///
    /// Spawns one task per worker plus one for the dispatcher, then waits for
    /// every worker to terminate before reading the aggregate.
    ///
    /// # Errors
    /// Fails if the dispatcher cannot deliver a job or a worker task fails.
    pub async fn run(self) -> Result<RunReport> {
        let started_at = chrono::Utc::now();
        let start = Instant::now();
        let num_workers = self.config.num_workers;
        let num_jobs = self.config.num_jobs;

        tracing::info!(
            num_workers,
            num_jobs,
            timeout = self.config.timeout,
            injection = ?self.config.injection,
            error_model = ?self.error_sampler.as_ref().map(|s| s.name().to_string()),
            "Starting simulation"
        );

        let (senders, receivers) = worker_queues(num_workers);

        // Spawn worker tasks
        let mut handles: Vec<JoinHandle<Result<WorkerStats>>> = Vec::with_capacity(num_workers);
        for queue in receivers {
            let worker = WorkerBuilder::new(queue.worker_id())
                .queue(queue)
                .aggregator(Arc::clone(&self.aggregator))
                .config(&self.config)
                .error_sampler(self.error_sampler.clone())
                .build()?;

            handles.push(tokio::spawn(worker.run()));
        }

        let dispatcher = Dispatcher::new(senders, self.load_sampler, num_jobs)?;
        let dispatch: JoinHandle<Result<DispatchStats>> =
            tokio::spawn(async move { dispatcher.run() });

        let dispatch_stats = match dispatch.await {
            Ok(Ok(stats)) => stats,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Dispatcher failed");
                return Err(e);
            }
            Err(e) => return Err(Error::Worker(format!("dispatcher task panicked: {e}"))),
        };

        // Join barrier: the aggregate is only read once every worker is done
        let mut workers = Vec::with_capacity(handles.len());
        for (idx, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(Ok(stats)) => {
                    tracing::debug!(
                        worker_id = idx,
                        completed = stats.completed,
                        failed = stats.failed,
                        "Worker terminated"
                    );
                    workers.push(stats);
                }
                Ok(Err(e)) => {
                    tracing::error!(worker_id = idx, error = %e, "Worker returned error");
                    return Err(e);
                }
                Err(e) => {
                    tracing::error!(worker_id = idx, error = %e, "Worker task panicked");
                    return Err(Error::Worker(format!("worker{idx} panicked: {e}")));
                }
            }
        }

        let elapsed = self.config.to_units(start.elapsed());
        let stats = self.aggregator.summary();
        let totals = aggregate_worker_stats(&workers);

        tracing::info!(
            elapsed,
            jobs_sent = dispatch_stats.jobs_sent,
            total_success = stats.total_success,
            total_failures = stats.total_failures(),
            timeouts = totals.total_timeouts,
            "Simulation completed"
        );

        Ok(RunReport {
            num_jobs,
            num_workers,
            stats,
            workers,
            elapsed,
            started_at,
            error_model: self.error_sampler.as_ref().map(|s| s.name().to_string()),
        })
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("load_sampler", &self.load_sampler.name())
            .field(
                "error_sampler",
                &self.error_sampler.as_ref().map(|s| s.name().to_string()),
            )
            .finish()
    }
}
