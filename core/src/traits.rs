//! Core traits for load and error samplers
//!
//! These traits are defined in core so the dispatcher and workers stay
//! independent of how loads and failure codes are produced. Implementations
//! live in the `jobsim-samplers` crate.

use crate::job::ErrorCode;

// ============================================================================
// Load Sampler Trait
// ============================================================================

/// Source of job loads for the dispatcher
///
/// The dispatcher owns its sampler exclusively, so sampling takes `&mut self`.
pub trait LoadSampler: Send {
    /// Sampler identifier for logs
    fn name(&self) -> &str;

    /// Processing time, in time units, for the job at `index`
    fn sample_load(&mut self, index: usize) -> f64;
}

// ============================================================================
// Error Sampler Trait
// ============================================================================

/// Source of injected failure codes, shared by all workers
pub trait ErrorSampler: Send + Sync {
    /// Sampler identifier for logs
    fn name(&self) -> &str;

    /// Whether the sampler has any weight to draw from
    fn is_enabled(&self) -> bool;

    /// Draw a failure code
    ///
    /// Returns `None` when the sampler is disabled; callers then keep the
    /// timeout-based outcome.
    fn sample_error_code(&self) -> Option<ErrorCode>;

    /// Draw a failure code with probability `probability`
    ///
    /// Returns `None` when the draw misses or the sampler is disabled.
    fn sample_error_code_with_probability(&self, probability: f64) -> Option<ErrorCode>;
}

impl<T: LoadSampler + ?Sized> LoadSampler for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn sample_load(&mut self, index: usize) -> f64 {
        (**self).sample_load(index)
    }
}
