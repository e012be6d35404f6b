//! Job generation and round-robin assignment

use crate::channel::QueueSender;
use crate::error::{Error, Result};
use crate::job::Job;
use crate::traits::LoadSampler;

/// Worker that receives the job at `index`
pub fn assign_worker(index: usize, num_workers: usize) -> usize {
    index % num_workers
}

/// Generates the job stream and feeds the worker queues
///
/// Job `i` goes to worker `i mod W`. Once every job is sent, one
/// [`Job::Terminate`] is sent to each queue in worker order.
pub struct Dispatcher<S: LoadSampler> {
    senders: Vec<QueueSender>,
    sampler: S,
    num_jobs: usize,
}

/// What the dispatcher sent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Work jobs sent
    pub jobs_sent: usize,

    /// Termination signals sent
    pub terminations_sent: usize,

    /// Work jobs sent to each worker, indexed by worker id
    pub per_worker: Vec<usize>,
}

impl<S: LoadSampler> Dispatcher<S> {
    /// Create a dispatcher over the given queues
    ///
    /// # Errors
    /// Returns an error if there are no queues to dispatch to.
    pub fn new(senders: Vec<QueueSender>, sampler: S, num_jobs: usize) -> Result<Self> {
        if senders.is_empty() {
            return Err(Error::MissingConfig("worker queues"));
        }
        Ok(Self {
            senders,
            sampler,
            num_jobs,
        })
    }

    /// Number of worker queues
    pub fn num_workers(&self) -> usize {
        self.senders.len()
    }

    /// Send every job, then one termination signal per worker
    ///
    /// # Errors
    /// A closed queue aborts dispatching with [`Error::QueueClosed`].
    pub fn run(mut self) -> Result<DispatchStats> {
        let num_workers = self.senders.len();
        let mut stats = DispatchStats {
            per_worker: vec![0; num_workers],
            ..Default::default()
        };

        tracing::info!(
            num_jobs = self.num_jobs,
            num_workers,
            sampler = self.sampler.name(),
            "Dispatcher starting"
        );

        for index in 0..self.num_jobs {
            let load = self.sampler.sample_load(index);
            let worker_id = assign_worker(index, num_workers);
            self.senders[worker_id].send(Job::work(index, load))?;

            stats.jobs_sent += 1;
            stats.per_worker[worker_id] += 1;
            tracing::info!(job_index = index, load, worker_id, "Sent job");
        }

        for sender in &self.senders {
            sender.send(Job::Terminate)?;
            stats.terminations_sent += 1;
            tracing::debug!(worker_id = sender.worker_id(), "Sent termination signal");
        }

        Ok(stats)
    }
}

impl<S: LoadSampler> std::fmt::Debug for Dispatcher<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("num_workers", &self.senders.len())
            .field("num_jobs", &self.num_jobs)
            .field("sampler", &self.sampler.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{worker_queue, worker_queues};
    use crate::job::WorkItem;

    struct StepLoads(f64);

    impl LoadSampler for StepLoads {
        fn name(&self) -> &str {
            "step"
        }

        fn sample_load(&mut self, index: usize) -> f64 {
            self.0 + index as f64
        }
    }

    #[test]
    fn test_assign_worker_is_round_robin() {
        let assigned: Vec<usize> = (0..7).map(|i| assign_worker(i, 3)).collect();
        assert_eq!(assigned, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_new_without_queues_fails() {
        let result = Dispatcher::new(Vec::new(), StepLoads(1.0), 5);
        assert!(matches!(result, Err(Error::MissingConfig(_))));
    }

    #[tokio::test]
    async fn test_run_assigns_round_robin_then_terminates() {
        let (senders, mut receivers) = worker_queues(2);
        let stats = Dispatcher::new(senders, StepLoads(1.0), 5)
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(stats.jobs_sent, 5);
        assert_eq!(stats.terminations_sent, 2);
        assert_eq!(stats.per_worker, vec![3, 2]);

        let mut first = Vec::new();
        while let Some(job) = receivers[0].recv().await {
            if job.is_terminate() {
                break;
            }
            first.push(job);
        }
        assert_eq!(
            first,
            vec![
                Job::Work(WorkItem::new(0, 1.0)),
                Job::Work(WorkItem::new(2, 3.0)),
                Job::Work(WorkItem::new(4, 5.0)),
            ]
        );

        assert_eq!(receivers[1].recv().await, Some(Job::work(1, 2.0)));
        assert_eq!(receivers[1].recv().await, Some(Job::work(3, 4.0)));
        assert_eq!(receivers[1].recv().await, Some(Job::Terminate));
    }

    #[tokio::test]
    async fn test_zero_jobs_still_terminates_every_worker() {
        let (senders, mut receivers) = worker_queues(3);
        let stats = Dispatcher::new(senders, StepLoads(1.0), 0)
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(stats.jobs_sent, 0);
        assert_eq!(stats.terminations_sent, 3);
        for rx in &mut receivers {
            assert_eq!(rx.recv().await, Some(Job::Terminate));
        }
    }

    #[test]
    fn test_closed_queue_is_fatal() {
        let (open_tx, _open_rx) = worker_queue(0);
        let (closed_tx, closed_rx) = worker_queue(1);
        drop(closed_rx);

        let result = Dispatcher::new(vec![open_tx, closed_tx], StepLoads(1.0), 4)
            .unwrap()
            .run();
        assert!(matches!(result, Err(Error::QueueClosed { worker_id: 1 })));
    }
}
