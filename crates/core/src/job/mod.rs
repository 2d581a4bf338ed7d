//! Per-file conversion jobs.
//!
//! A [`FileJob`] takes one [`InputFile`] through the checks and the
//! transcode, sharing collaborators and the run-wide digest set through a
//! [`JobContext`]. Jobs never fail outward: every path ends in a
//! [`JobResult`].

mod context;
mod output;
mod runner;
mod types;

pub use context::JobContext;
pub use output::PartialOutput;
pub use runner::{FileJob, JobError};
pub use types::{InputFile, JobOutcome, JobResult, JobStage};
