//! Builder pattern for Orchestrator construction

use std::sync::Arc;

use crate::config::{InjectionMode, SimulationConfig};
use crate::error::{Error, Result};
use crate::traits::{ErrorSampler, LoadSampler};

use super::executor::Orchestrator;

/// Builder for creating an Orchestrator with proper configuration
///
/// # Example
///
/// ```ignore
/// let orchestrator = OrchestratorBuilder::new()
///     .workers(20)
///     .jobs(1000)
///     .load_sampler(Box::new(UniformLoad::new(1.0, 15.0)?))
///     .error_sampler(Some(history))
///     .build()?;
/// ```
pub struct OrchestratorBuilder {
    config: SimulationConfig,
    load_sampler: Option<Box<dyn LoadSampler>>,
    error_sampler: Option<Arc<dyn ErrorSampler>>,
}

impl OrchestratorBuilder {
    /// Create a new orchestrator builder with default configuration
    pub fn new() -> Self {
        Self {
            config: SimulationConfig::default(),
            load_sampler: None,
            error_sampler: None,
        }
    }

    /// Set the full simulation configuration
    pub fn config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the number of workers
    pub fn workers(mut self, num_workers: usize) -> Self {
        self.config.num_workers = num_workers;
        self
    }

    /// Set the number of jobs
    pub fn jobs(mut self, num_jobs: usize) -> Self {
        self.config.num_jobs = num_jobs;
        self
    }

    /// Set the injection mode
    pub fn injection(mut self, injection: InjectionMode) -> Self {
        self.config.injection = injection;
        self
    }

    /// Set the load sampler
    pub fn load_sampler(mut self, sampler: Box<dyn LoadSampler>) -> Self {
        self.load_sampler = Some(sampler);
        self
    }

    /// Set the historical error model
    pub fn error_sampler(mut self, sampler: Option<Arc<dyn ErrorSampler>>) -> Self {
        self.error_sampler = sampler;
        self
    }

    /// Build the orchestrator
    ///
    /// # Errors
    ///
    /// Returns an error if no load sampler is set or if configuration
    /// validation fails.
    pub fn build(self) -> Result<Orchestrator> {
        let load_sampler = self
            .load_sampler
            .ok_or(Error::MissingConfig("load_sampler"))?;

        self.config.validate()?;

        if let Some(sampler) = &self.error_sampler {
            if !sampler.is_enabled() {
                tracing::warn!(
                    error_model = sampler.name(),
                    "Error model has no weight; outcomes are timeout-only"
                );
            }
        }

        Ok(Orchestrator::new(
            self.config,
            load_sampler,
            self.error_sampler,
        ))
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
