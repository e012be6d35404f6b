//! Error types for jobsim-core

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Core error type
///
/// Only startup and infrastructure failures live here. A job that times out
/// is not an error: it is recorded as a failure code in the run statistics.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid simulation configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A builder was asked to build without a required field
    #[error("missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Historical dataset missing, unreadable or malformed
    #[error("invalid error dataset {path}: {message}")]
    DataFormat {
        /// Source the dataset was read from
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// A worker queue was closed before the dispatcher finished sending
    #[error("queue for worker{worker_id} is closed")]
    QueueClosed {
        /// Worker whose queue rejected the job
        worker_id: usize,
    },

    /// A worker was built with another worker's queue
    #[error("worker{worker_id} was given the queue of worker{queue_id}")]
    QueueMismatch {
        /// Worker being built
        worker_id: usize,
        /// Owner of the queue it was given
        queue_id: usize,
    },

    /// A worker or dispatcher task failed or panicked
    #[error("worker error: {0}")]
    Worker(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a dataset format error for the given source
    pub fn data_format(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::DataFormat {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
