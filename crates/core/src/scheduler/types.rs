//! Types for the scheduler module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::job::{JobOutcome, JobResult};

/// Results of one batch, in slot order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub index: usize,
    pub results: Vec<JobResult>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Aggregated counts for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub total: usize,
    pub converted_kept_cover: usize,
    pub converted_added_cover: usize,
    pub converted_without_cover: usize,
    pub skipped_existing: usize,
    pub skipped_duplicate: usize,
    pub failed: usize,
}

impl OutcomeCounts {
    pub fn record(&mut self, outcome: &JobOutcome) {
        self.total += 1;
        match outcome {
            JobOutcome::SkippedExisting => self.skipped_existing += 1,
            JobOutcome::SkippedDuplicate => self.skipped_duplicate += 1,
            JobOutcome::ConvertedWithCover { embedded: true } => self.converted_kept_cover += 1,
            JobOutcome::ConvertedWithCover { embedded: false } => self.converted_added_cover += 1,
            JobOutcome::ConvertedWithoutCover => self.converted_without_cover += 1,
            JobOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn converted(&self) -> usize {
        self.converted_kept_cover + self.converted_added_cover + self.converted_without_cover
    }
}

/// Summary of a run, serialisable to JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub counts: OutcomeCounts,
    pub batches: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<JobResult>,
}

impl RunSummary {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            counts: OutcomeCounts::default(),
            batches: 0,
            started_at: now,
            finished_at: now,
            results: Vec::new(),
        }
    }

    pub fn add_batch(&mut self, report: BatchReport) {
        self.batches += 1;
        for result in report.results {
            self.counts.record(&result.outcome);
            self.results.push(result);
        }
        self.finished_at = report.finished_at;
    }

    /// Failed jobs only.
    pub fn failures(&self) -> impl Iterator<Item = &JobResult> {
        self.results.iter().filter(|r| r.outcome.is_failed())
    }

    /// One-line count summary.
    pub fn summary_line(&self) -> String {
        let c = &self.counts;
        format!(
            "{} files: {} converted ({} kept cover, {} added cover, {} no cover), {} already converted, {} duplicates, {} failed",
            c.total,
            c.converted(),
            c.converted_kept_cover,
            c.converted_added_cover,
            c.converted_without_cover,
            c.skipped_existing,
            c.skipped_duplicate,
            c.failed
        )
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}
