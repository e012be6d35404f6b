//! Worker queues
//!
//! Each worker owns the receiving end of one unbounded FIFO channel; the
//! dispatcher holds every sending end. Sending a [`Job`] moves it out of the
//! dispatcher, so a job is only ever visible to the worker that receives it.

use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::job::Job;

/// Sending half of a worker queue
#[derive(Debug, Clone)]
pub struct QueueSender {
    worker_id: usize,
    tx: mpsc::UnboundedSender<Job>,
}

impl QueueSender {
    /// Worker this queue feeds
    pub fn worker_id(&self) -> usize {
        self.worker_id
    }

    /// Hand a job over to the worker
    ///
    /// # Errors
    /// Returns [`Error::QueueClosed`] if the worker has dropped its receiver.
    pub fn send(&self, job: Job) -> Result<()> {
        self.tx.send(job).map_err(|_| Error::QueueClosed {
            worker_id: self.worker_id,
        })
    }
}

/// Receiving half of a worker queue
#[derive(Debug)]
pub struct QueueReceiver {
    worker_id: usize,
    rx: mpsc::UnboundedReceiver<Job>,
}

impl QueueReceiver {
    /// Worker this queue belongs to
    pub fn worker_id(&self) -> usize {
        self.worker_id
    }

    /// Wait for the next job
    ///
    /// Returns `None` once every sender is gone and the queue is drained.
    pub async fn recv(&mut self) -> Option<Job> {
        self.rx.recv().await
    }
}

/// Create the queue for one worker
pub fn worker_queue(worker_id: usize) -> (QueueSender, QueueReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        QueueSender { worker_id, tx },
        QueueReceiver { worker_id, rx },
    )
}

/// Create one queue per worker, indexed by worker id
pub fn worker_queues(num_workers: usize) -> (Vec<QueueSender>, Vec<QueueReceiver>) {
    (0..num_workers).map(worker_queue).unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queue_is_fifo() {
        let (tx, mut rx) = worker_queue(3);
        tx.send(Job::work(0, 1.0)).unwrap();
        tx.send(Job::work(1, 2.0)).unwrap();
        tx.send(Job::Terminate).unwrap();

        assert_eq!(rx.recv().await, Some(Job::work(0, 1.0)));
        assert_eq!(rx.recv().await, Some(Job::work(1, 2.0)));
        assert_eq!(rx.recv().await, Some(Job::Terminate));
        assert_eq!(rx.worker_id(), 3);
    }

    #[tokio::test]
    async fn test_send_to_dropped_receiver_fails() {
        let (tx, rx) = worker_queue(4);
        drop(rx);

        let err = tx.send(Job::Terminate).unwrap_err();
        assert!(matches!(err, Error::QueueClosed { worker_id: 4 }));
    }

    #[test]
    fn test_worker_queues_are_indexed() {
        let (senders, receivers) = worker_queues(3);
        let ids: Vec<usize> = senders.iter().map(QueueSender::worker_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(receivers.len(), 3);
        assert_eq!(receivers[2].worker_id(), 2);
    }
}
