//! Bounded-time processing of a single job

use std::time::Duration;

use crate::config::{duration_to_units, units_to_duration, SimulationConfig};

/// Slice-based processing with a hard timeout
///
/// A job advances in slices of `slice` (or whatever remains of its load if
/// that is smaller). Whether a job is aborted is decided on the load in time
/// units before any clock conversion, so a load at or above the timeout is
/// always aborted and a load below it always completes, whatever the
/// nanosecond rounding of the slices.
///
/// Elapsed time is tracked on [`Duration`]s to avoid accumulating float
/// error over many slices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessingProtocol {
    timeout_units: f64,
    timeout: Duration,
    slice: Duration,
    time_unit: Duration,
}

/// Result of running the protocol on one load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Processing {
    /// Time spent processing
    pub elapsed: Duration,

    /// Whether the timeout aborted processing
    pub timed_out: bool,
}

impl ProcessingProtocol {
    /// Build the protocol from the simulation configuration
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            timeout_units: config.timeout,
            timeout: config.to_duration(config.timeout),
            slice: config.to_duration(config.slice),
            time_unit: config.time_unit,
        }
    }

    /// Convert a clock duration to time units
    pub fn to_units(&self, duration: Duration) -> f64 {
        duration_to_units(self.time_unit, duration)
    }

    /// Whether a load of `units` will be aborted
    pub fn times_out(&self, units: f64) -> bool {
        units >= self.timeout_units
    }

    /// Process a load of `units`, sleeping one slice at a time
    pub async fn execute(&self, units: f64) -> Processing {
        let load = units_to_duration(self.time_unit, units);
        // Processing stops at the timeout for aborted loads, at the load otherwise
        let (end, timed_out) = if self.times_out(units) {
            (self.timeout, true)
        } else {
            (load, false)
        };

        let mut elapsed = Duration::ZERO;
        while elapsed < end {
            let step = self.slice.min(end - elapsed);
            tokio::time::sleep(step).await;
            elapsed += step;
        }

        Processing { elapsed, timed_out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn protocol() -> ProcessingProtocol {
        ProcessingProtocol::from_config(&SimulationConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_below_timeout_completes() {
        let start = tokio::time::Instant::now();
        let result = protocol().execute(9.5).await;

        assert!(!result.timed_out);
        assert_eq!(result.elapsed, Duration::from_millis(9500));
        assert!(start.elapsed() >= Duration::from_millis(9500));
        assert!(start.elapsed() < Duration::from_millis(9700));
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_at_timeout_aborts() {
        let result = protocol().execute(10.0).await;

        assert!(result.timed_out);
        assert_eq!(result.elapsed, Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_just_below_timeout_completes() {
        // Rounds to exactly 10s on the clock, but is still under the timeout
        let result = protocol().execute(9.9999999999).await;

        assert!(!result.timed_out);
        assert!(result.elapsed <= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_above_timeout_aborts_without_finishing() {
        let start = tokio::time::Instant::now();
        let result = protocol().execute(14.9).await;

        assert!(result.timed_out);
        assert_eq!(result.elapsed, Duration::from_secs(10));
        assert!(start.elapsed() < Duration::from_millis(10_400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_load_aborts() {
        let result = protocol().execute(f64::INFINITY).await;

        assert!(result.timed_out);
        assert_eq!(result.elapsed, Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fractional_last_slice() {
        let result = protocol().execute(1.05).await;

        assert!(!result.timed_out);
        assert_eq!(result.elapsed, Duration::from_millis(1050));
    }

    #[tokio::test(start_paused = true)]
    async fn test_time_unit_scales_sleep() {
        let config = SimulationConfig::default().with_time_unit(Duration::from_millis(10));
        let protocol = ProcessingProtocol::from_config(&config);

        let start = tokio::time::Instant::now();
        let result = protocol.execute(2.0).await;

        assert!(!result.timed_out);
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert!(start.elapsed() < Duration::from_millis(30));
        assert!((protocol.to_units(result.elapsed) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_times_out_boundary() {
        let protocol = protocol();
        assert!(!protocol.times_out(9.9999999999));
        assert!(protocol.times_out(10.0));
        assert!(protocol.times_out(11.0));
    }
}
