//! Simulation configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default worker pool size
pub const DEFAULT_NUM_WORKERS: usize = 20;

/// Processing ceiling per job, in time units
pub const DEFAULT_TIMEOUT: f64 = 10.0;

/// Processing slice, in time units
pub const DEFAULT_SLICE: f64 = 0.1;

/// How failure codes from the historical error model are applied
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum InjectionMode {
    /// Timed-out jobs record a sampled code instead of the generic timeout
    /// code. Jobs that complete stay successful.
    #[default]
    RefineTimeouts,

    /// As `RefineTimeouts`, and additionally each completed job is recorded
    /// as a sampled failure with probability `rate`.
    Override {
        /// Probability in `[0, 1]` that a completed job is overridden
        rate: f64,
    },
}

/// Simulation configuration
///
/// Defines the worker pool, the job stream and the processing protocol.
/// All durations except `time_unit` are expressed in time units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of workers (one queue each)
    pub num_workers: usize,

    /// Number of jobs the dispatcher generates
    pub num_jobs: usize,

    /// Processing ceiling after which a job is aborted
    pub timeout: f64,

    /// Length of one processing slice
    pub slice: f64,

    /// Clock duration of one time unit
    pub time_unit: Duration,

    /// Half-open range `[min, max)` for generated loads
    pub load_range: (f64, f64),

    /// How sampled error codes affect outcomes
    pub injection: InjectionMode,

    /// Seed for reproducible sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_workers: DEFAULT_NUM_WORKERS,
            num_jobs: 20,
            timeout: DEFAULT_TIMEOUT,
            slice: DEFAULT_SLICE,
            time_unit: Duration::from_secs(1),
            load_range: (1.0, 15.0),
            injection: InjectionMode::default(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with the given pool size and job count
    pub fn new(num_workers: usize, num_jobs: usize) -> Self {
        Self {
            num_workers,
            num_jobs,
            ..Default::default()
        }
    }

    /// Set the processing timeout
    pub fn with_timeout(mut self, timeout: f64) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the slice length
    pub fn with_slice(mut self, slice: f64) -> Self {
        self.slice = slice;
        self
    }

    /// Set the clock duration of one time unit
    pub fn with_time_unit(mut self, time_unit: Duration) -> Self {
        self.time_unit = time_unit;
        self
    }

    /// Set the load range
    pub fn with_load_range(mut self, min: f64, max: f64) -> Self {
        self.load_range = (min, max);
        self
    }

    /// Set the injection mode
    pub fn with_injection(mut self, injection: InjectionMode) -> Self {
        self.injection = injection;
        self
    }

    /// Set the sampling seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Convert time units to a clock duration
    pub fn to_duration(&self, units: f64) -> Duration {
        units_to_duration(self.time_unit, units)
    }

    /// Convert a clock duration to time units
    pub fn to_units(&self, duration: Duration) -> f64 {
        duration_to_units(self.time_unit, duration)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_workers == 0 {
            return Err(ConfigError::InvalidWorkers(
                "at least one worker is required".into(),
            ));
        }

        if !(self.timeout.is_finite() && self.timeout > 0.0) {
            return Err(ConfigError::InvalidTiming(format!(
                "timeout must be positive, got {}",
                self.timeout
            )));
        }

        if !(self.slice.is_finite() && self.slice > 0.0) {
            return Err(ConfigError::InvalidTiming(format!(
                "slice must be positive, got {}",
                self.slice
            )));
        }

        if self.time_unit.is_zero() {
            return Err(ConfigError::InvalidTiming(
                "time unit must be non-zero".into(),
            ));
        }

        let (min, max) = self.load_range;
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min < max) {
            return Err(ConfigError::InvalidLoadRange(format!(
                "expected 0 < min < max, got [{min}, {max})"
            )));
        }

        if let InjectionMode::Override { rate } = self.injection {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::InvalidInjection(format!(
                    "override rate must be within [0, 1], got {rate}"
                )));
            }
        }

        Ok(())
    }
}

/// Clock duration of `units` time units
///
/// Negative and NaN values map to zero; values too large for a `Duration`
/// saturate.
pub(crate) fn units_to_duration(time_unit: Duration, units: f64) -> Duration {
    if units.is_nan() || units <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(time_unit.as_secs_f64() * units).unwrap_or(Duration::MAX)
}

pub(crate) fn duration_to_units(time_unit: Duration, duration: Duration) -> f64 {
    duration.as_secs_f64() / time_unit.as_secs_f64()
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid pool size
    #[error("Invalid worker count: {0}")]
    InvalidWorkers(String),

    /// Invalid timeout, slice or time unit
    #[error("Invalid timing: {0}")]
    InvalidTiming(String),

    /// Invalid load range
    #[error("Invalid load range: {0}")]
    InvalidLoadRange(String),

    /// Invalid injection settings
    #[error("Invalid injection mode: {0}")]
    InvalidInjection(String),
}
