//! jobsim-core: job dispatch, bounded-time execution and outcome aggregation
//!
//! This crate provides the engine of the worker pool simulation:
//!
//! - The job model and per-worker FIFO queues
//! - The dispatcher (round-robin job assignment plus termination signals)
//! - Workers that process jobs in slices under a hard timeout
//! - A thread-safe aggregator for success and per-code failure counts
//! - The orchestrator that runs everything and reports the totals
//!
//! Load generation and the historical error model live behind the
//! [`LoadSampler`] and [`ErrorSampler`] traits; implementations are in the
//! `jobsim-samplers` crate.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod job;
pub mod metrics;
pub mod orchestrator;
pub mod traits;
pub mod worker;

pub use config::{
    ConfigError, InjectionMode, SimulationConfig, DEFAULT_NUM_WORKERS, DEFAULT_SLICE,
    DEFAULT_TIMEOUT,
};
pub use dispatcher::{assign_worker, DispatchStats, Dispatcher};
pub use error::{Error, Result};
pub use job::*;
pub use metrics::{RunStats, StatsAggregator};
pub use orchestrator::{
    aggregate_worker_stats, AggregatedStats, Orchestrator, OrchestratorBuilder, RunReport,
};
pub use traits::*;
pub use worker::{Worker, WorkerBuilder, WorkerStats};
