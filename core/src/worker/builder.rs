//! Builder pattern for Worker construction

use crate::channel::QueueReceiver;
use crate::config::{InjectionMode, SimulationConfig};
use crate::error::{Error, Result};
use crate::metrics::StatsAggregator;
use crate::traits::ErrorSampler;

use super::executor::Worker;
use super::protocol::ProcessingProtocol;

use std::sync::Arc;

/// Builder for creating Worker instances
///
/// # Example
/// ```ignore
/// let worker = WorkerBuilder::new(0)
///     .queue(rx)
///     .aggregator(Arc::clone(&aggregator))
///     .config(&config)
///     .error_sampler(Some(sampler))
///     .build()?;
/// ```
pub struct WorkerBuilder {
    id: usize,
    queue: Option<QueueReceiver>,
    aggregator: Option<Arc<StatsAggregator>>,
    protocol: Option<ProcessingProtocol>,
    injection: InjectionMode,
    error_sampler: Option<Arc<dyn ErrorSampler>>,
}

impl WorkerBuilder {
    /// Create a new builder with the given worker ID
    pub fn new(id: usize) -> Self {
        Self {
            id,
            queue: None,
            aggregator: None,
            protocol: None,
            injection: InjectionMode::default(),
            error_sampler: None,
        }
    }

    /// Set the job queue
    pub fn queue(mut self, queue: QueueReceiver) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Set the shared outcome aggregator
    pub fn aggregator(mut self, aggregator: Arc<StatsAggregator>) -> Self {
        self.aggregator = Some(aggregator);
        self
    }

    /// Take the processing protocol and injection mode from a config
    pub fn config(mut self, config: &SimulationConfig) -> Self {
        self.protocol = Some(ProcessingProtocol::from_config(config));
        self.injection = config.injection;
        self
    }

    /// Set the processing protocol
    pub fn protocol(mut self, protocol: ProcessingProtocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Set the injection mode
    pub fn injection(mut self, injection: InjectionMode) -> Self {
        self.injection = injection;
        self
    }

    /// Set the historical error model
    pub fn error_sampler(mut self, sampler: Option<Arc<dyn ErrorSampler>>) -> Self {
        self.error_sampler = sampler;
        self
    }

    /// Build the Worker
    ///
    /// # Errors
    /// Returns an error if any required field is missing or the queue
    /// belongs to another worker.
    pub fn build(self) -> Result<Worker> {
        let queue = self.queue.ok_or(Error::MissingConfig("queue"))?;
        let aggregator = self.aggregator.ok_or(Error::MissingConfig("aggregator"))?;
        let protocol = self.protocol.ok_or(Error::MissingConfig("protocol"))?;

        if queue.worker_id() != self.id {
            return Err(Error::QueueMismatch {
                worker_id: self.id,
                queue_id: queue.worker_id(),
            });
        }

        Ok(Worker::new(
            self.id,
            queue,
            aggregator,
            protocol,
            self.injection,
            self.error_sampler,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::worker_queue;

    #[test]
    fn test_builder_missing_queue() {
        let result = WorkerBuilder::new(0)
            .aggregator(Arc::new(StatsAggregator::new()))
            .config(&SimulationConfig::default())
            .build();

        assert!(matches!(result, Err(Error::MissingConfig("queue"))));
    }

    #[test]
    fn test_builder_missing_aggregator() {
        let (_tx, rx) = worker_queue(0);
        let result = WorkerBuilder::new(0)
            .queue(rx)
            .config(&SimulationConfig::default())
            .build();

        assert!(matches!(result, Err(Error::MissingConfig("aggregator"))));
    }

    #[test]
    fn test_builder_missing_protocol() {
        let (_tx, rx) = worker_queue(0);
        let result = WorkerBuilder::new(0)
            .queue(rx)
            .aggregator(Arc::new(StatsAggregator::new()))
            .build();

        assert!(matches!(result, Err(Error::MissingConfig("protocol"))));
    }

    #[test]
    fn test_builder_rejects_foreign_queue() {
        let (_tx, rx) = worker_queue(1);
        let result = WorkerBuilder::new(0)
            .queue(rx)
            .aggregator(Arc::new(StatsAggregator::new()))
            .config(&SimulationConfig::default())
            .build();

        assert!(matches!(
            result,
            Err(Error::QueueMismatch {
                worker_id: 0,
                queue_id: 1
            })
        ));
    }

    #[test]
    fn test_builder_complete() {
        let (_tx, rx) = worker_queue(2);
        let worker = WorkerBuilder::new(2)
            .queue(rx)
            .aggregator(Arc::new(StatsAggregator::new()))
            .config(&SimulationConfig::default())
            .build()
            .expect("Failed to build worker");

        assert_eq!(worker.id(), 2);
    }
}
