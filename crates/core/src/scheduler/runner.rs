//! Sequential batches, bounded concurrency within a batch.

use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info};

use super::discovery::partition_batches;
use super::types::{BatchReport, RunSummary};
use crate::job::{FileJob, InputFile, JobContext, JobOutcome, JobResult};
use crate::metrics;
use crate::status::StatusHandle;

/// Drives file jobs batch by batch.
///
/// Within a batch, at most `max_concurrent` jobs run at once; the next batch
/// starts only once every job of the current one has finished. A failing
/// job never affects its siblings.
pub struct BatchScheduler {
    context: Arc<JobContext>,
    status: StatusHandle,
    batch_size: Option<usize>,
    max_concurrent: usize,
}

impl BatchScheduler {
    pub fn new(context: JobContext, status: StatusHandle) -> Self {
        let max_concurrent = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            context: Arc::new(context),
            status,
            batch_size: None,
            max_concurrent,
        }
    }

    /// Files per batch; `None` runs everything as one batch.
    pub fn with_batch_size(mut self, size: Option<usize>) -> Self {
        self.batch_size = size;
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn context(&self) -> &JobContext {
        &self.context
    }

    /// Runs every file and reports the final summary.
    pub async fn run(&self, files: Vec<InputFile>) -> RunSummary {
        let mut summary = RunSummary::new();
        let batches = partition_batches(files, self.batch_size);
        let total_batches = batches.len();

        for (index, batch) in batches.into_iter().enumerate() {
            let report = self.run_batch(index, total_batches, batch).await;
            summary.add_batch(report);
        }

        summary.finished_at = Utc::now();
        self.status.finish(summary.summary_line());
        summary
    }

    /// Runs one batch to completion.
    pub async fn run_batch(
        &self,
        index: usize,
        total_batches: usize,
        batch: Vec<InputFile>,
    ) -> BatchReport {
        let started_at = Utc::now();
        info!(batch = index, files = batch.len(), max_concurrent = self.max_concurrent, "Starting batch");
        self.status.begin_batch(index, total_batches, batch.len());

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut names = Vec::with_capacity(batch.len());
        let mut handles = Vec::with_capacity(batch.len());

        for (slot, input) in batch.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let context = Arc::clone(&self.context);
            let reporter = self.status.slot(slot, input.display_name.clone());
            names.push(input.display_name.clone());

            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                FileJob::new(input).run(&context, &reporter).await
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (slot, (joined, name)) in join_all(handles).await.into_iter().zip(names).enumerate() {
            let result = match joined {
                Ok(result) => result,
                Err(e) => {
                    error!(batch = index, slot, file = %name, error = %e, "Job task aborted");
                    let now = Utc::now();
                    let result = JobResult {
                        display_name: name,
                        outcome: JobOutcome::Failed(format!("job aborted: {}", e)),
                        started_at,
                        finished_at: now,
                    };
                    metrics::JOBS_TOTAL
                        .with_label_values(&[result.outcome.label()])
                        .inc();
                    self.status
                        .slot(slot, result.display_name.clone())
                        .complete(result.status_line());
                    result
                }
            };
            results.push(result);
        }

        self.status.end_batch();
        metrics::BATCHES_COMPLETED.inc();
        info!(batch = index, "Batch complete");

        BatchReport {
            index,
            results,
            started_at,
            finished_at: Utc::now(),
        }
    }
}
