//! Orchestrator for run lifecycle management
//!
//! The Orchestrator coordinates a complete simulation run:
//! - Creating one queue per worker
//! - Spawning the worker tasks and the dispatcher
//! - Waiting for every worker to terminate
//! - Collecting the aggregate outcome counts
//!
//! # Example
//!
//! ```ignore
//! use jobsim_core::OrchestratorBuilder;
//!
//! let orchestrator = OrchestratorBuilder::new()
//!     .workers(20)
//!     .jobs(1000)
//!     .load_sampler(load_sampler)
//!     .build()?;
//!
//! let report = orchestrator.run().await?;
//! ```

mod aggregator;
mod builder;
mod executor;

pub use aggregator::{aggregate_worker_stats, AggregatedStats, RunReport};
pub use builder::OrchestratorBuilder;
pub use executor::Orchestrator;
