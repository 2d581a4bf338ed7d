//! Batch scheduling.
//!
//! Inputs are discovered once, split into consecutive batches and run with a
//! semaphore-bounded number of concurrent [`FileJob`](crate::job::FileJob)s.

mod discovery;
mod runner;
mod types;

pub use discovery::{discover_inputs, partition_batches};
pub use runner::BatchScheduler;
pub use types::{BatchReport, OutcomeCounts, RunSummary};

use std::path::PathBuf;
use thiserror::Error;

/// Startup errors. Individual job failures never surface here.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Input directory not found: {0}")]
    InputDirMissing(PathBuf),

    #[error("Input path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to list {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
