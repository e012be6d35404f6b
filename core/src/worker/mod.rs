//! Worker module for processing jobs
//!
//! The Worker is the execution unit of the pool, responsible for the loop:
//! **receive -> process -> record -> repeat**.
//!
//! Each Worker is a tokio task bound to one private queue that:
//!
//! 1. Waits for the next job from its queue
//! 2. Stops on the termination signal
//! 3. Processes the job in fixed slices under a hard timeout
//! 4. Consults the historical error model, if any, for the failure code
//! 5. Records the outcome in the shared aggregator
//!
//! # Example
//!
//! ```ignore
//! use jobsim_core::worker::WorkerBuilder;
//!
//! let worker = WorkerBuilder::new(0)
//!     .queue(rx)
//!     .aggregator(aggregator)
//!     .config(&config)
//!     .build()?;
//!
//! let stats = worker.run().await?;
//! println!("Completed: {}", stats.completed);
//! ```

mod builder;
mod executor;
mod protocol;
mod stats;

pub use builder::WorkerBuilder;
pub use executor::Worker;
pub use protocol::{Processing, ProcessingProtocol};
pub use stats::WorkerStats;
