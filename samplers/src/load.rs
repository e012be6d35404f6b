//! Job load samplers
//!
//! - **Uniform**: loads drawn from `[min, max)`
//! - **Fixed**: a given sequence of loads, replayed in order

use jobsim_core::{ConfigError, LoadSampler, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};

/// Uniform load sampler
pub struct UniformLoad {
    distribution: Uniform<f64>,
    rng: StdRng,
    min: f64,
    max: f64,
}

impl UniformLoad {
    /// Create a sampler over `[min, max)` time units
    ///
    /// # Errors
    /// Fails unless `0 < min < max` and both bounds are finite.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min < max) {
            return Err(ConfigError::InvalidLoadRange(format!(
                "expected 0 < min < max, got [{min}, {max})"
            ))
            .into());
        }

        Ok(Self {
            distribution: Uniform::new(min, max),
            rng: StdRng::from_entropy(),
            min,
            max,
        })
    }

    /// Make the sequence reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Sampled range
    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

impl LoadSampler for UniformLoad {
    fn name(&self) -> &str {
        "uniform"
    }

    fn sample_load(&mut self, _index: usize) -> f64 {
        self.distribution.sample(&mut self.rng)
    }
}

impl std::fmt::Debug for UniformLoad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UniformLoad")
            .field("min", &self.min)
            .field("max", &self.max)
            .finish()
    }
}

/// Replays a fixed sequence of loads, cycling when it runs out
#[derive(Debug, Clone)]
pub struct FixedLoads {
    loads: Vec<f64>,
}

impl FixedLoads {
    /// Create a sampler from a non-empty list of positive loads
    pub fn new(loads: Vec<f64>) -> Result<Self> {
        if loads.is_empty() {
            return Err(ConfigError::InvalidLoadRange("no loads given".into()).into());
        }
        if let Some(bad) = loads.iter().find(|l| !(l.is_finite() && **l > 0.0)) {
            return Err(ConfigError::InvalidLoadRange(format!(
                "loads must be positive, got {bad}"
            ))
            .into());
        }
        Ok(Self { loads })
    }

    /// Number of distinct loads before the sequence repeats
    pub fn len(&self) -> usize {
        self.loads.len()
    }

    /// Always false; construction rejects empty sequences
    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }
}

impl LoadSampler for FixedLoads {
    fn name(&self) -> &str {
        "fixed"
    }

    fn sample_load(&mut self, index: usize) -> f64 {
        self.loads[index % self.loads.len()]
    }
}
