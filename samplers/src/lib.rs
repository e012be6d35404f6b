//! Load samplers and historical error models
//!
//! This crate provides implementations of the core sampler traits:
//!
//! - [`UniformLoad`] and [`FixedLoads`] implement `LoadSampler`
//! - [`HistoricalErrorDistribution`] implements `ErrorSampler`, weighted by
//!   an [`ErrorFrequencyTable`] loaded from a JSON dataset

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod history;
pub mod load;

pub use history::{ErrorFrequencyTable, HistoricalErrorDistribution};
pub use load::{FixedLoads, UniformLoad};
