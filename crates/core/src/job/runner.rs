//! The per-file state machine.

use chrono::Utc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::context::JobContext;
use super::types::{InputFile, JobOutcome, JobResult, JobStage};
use crate::artwork::{has_embedded_visual_stream, ArtError, CoverArtState};
use crate::converter::{ConverterError, TranscodeSpec};
use crate::hasher::HashError;
use crate::metrics;
use crate::status::SlotReporter;
use crate::title::clean_title;

/// Failures that end a job. Never escapes [`FileJob::run`].
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Hash(#[from] HashError),

    #[error(transparent)]
    Transcode(#[from] ConverterError),
}

impl JobError {
    /// Short reason for the status line.
    pub fn reason(&self) -> String {
        match self {
            Self::Hash(e) => e.to_string(),
            Self::Transcode(e) => e.diagnostic(),
        }
    }
}

/// Converts one input file.
///
/// Checks run in a fixed order: output existence, then content digest, then
/// cover art, then transcode. Each check can end the job early, and a later
/// one never runs before an earlier one has passed.
///
/// The transcode writes a scratch file that only becomes the final output
/// once it succeeded, so the existence check never sees a partial file.
#[derive(Debug, Clone)]
pub struct FileJob {
    input: InputFile,
}

impl FileJob {
    pub fn new(input: InputFile) -> Self {
        Self { input }
    }

    pub fn input(&self) -> &InputFile {
        &self.input
    }

    /// Runs the job to a terminal state. Every failure becomes
    /// [`JobOutcome::Failed`]; the terminal line is sent to `reporter`.
    pub async fn run(&self, ctx: &JobContext, reporter: &SlotReporter) -> JobResult {
        let started_at = Utc::now();

        let outcome = match self.execute(ctx, reporter).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(file = %self.input.display_name, error = %e, "Job failed");
                JobOutcome::Failed(e.reason())
            }
        };
        metrics::JOBS_TOTAL
            .with_label_values(&[outcome.label()])
            .inc();

        let result = JobResult {
            display_name: self.input.display_name.clone(),
            outcome,
            started_at,
            finished_at: Utc::now(),
        };
        reporter.complete(result.status_line());
        result
    }

    async fn execute(
        &self,
        ctx: &JobContext,
        reporter: &SlotReporter,
    ) -> Result<JobOutcome, JobError> {
        let title = clean_title(ctx.normalizer.as_ref(), &self.input.base_name());
        let output_path = ctx.output_path_for(&title);

        if tokio::fs::try_exists(&output_path).await.unwrap_or(false) {
            debug!(file = %self.input.display_name, output = %output_path.display(), "Output exists");
            return Ok(JobOutcome::SkippedExisting);
        }

        reporter.progress(JobStage::Hashing.text());
        let digest = ctx.hasher.hash(&self.input.path).await?;
        if !ctx.seen.claim(digest).await {
            debug!(file = %self.input.display_name, digest = ?digest, "Duplicate content");
            return Ok(JobOutcome::SkippedDuplicate);
        }

        reporter.progress(JobStage::Probing.text());
        let cover = self.resolve_cover(ctx, reporter, &title).await;

        let partial = match ctx.partial_output_for(&title) {
            Ok(partial) => partial,
            Err(e) => {
                if let Err(e) = cover.release() {
                    warn!(file = %self.input.display_name, error = %e, "Failed to remove temporary cover");
                }
                return Err(ConverterError::Io(e).into());
            }
        };
        let spec = TranscodeSpec::new(
            &self.input.path,
            partial.path(),
            &title,
            &cover,
            &ctx.encoding,
        );

        reporter.progress(JobStage::Transcoding.text());
        let start = Instant::now();
        let converted = match ctx.converter.convert(&spec).await {
            Ok(converted) => partial.publish(&output_path).await.map(|_| converted),
            Err(e) => Err(e),
        };
        let result_label = if converted.is_ok() { "success" } else { "failed" };
        metrics::CONVERSION_DURATION
            .with_label_values(&[result_label])
            .observe(start.elapsed().as_secs_f64());

        let source = cover.source_label();
        let embedded = matches!(cover, CoverArtState::EmbeddedArt);
        let has_cover = cover.has_cover();
        if let Err(e) = cover.release() {
            warn!(file = %self.input.display_name, error = %e, "Failed to remove temporary cover");
        }

        let converted = converted?;
        metrics::COVER_ART_TOTAL.with_label_values(&[source]).inc();
        info!(
            file = %self.input.display_name,
            output = %output_path.display(),
            cover = source,
            duration_ms = converted.duration_ms,
            "Converted"
        );

        Ok(if has_cover {
            JobOutcome::ConvertedWithCover { embedded }
        } else {
            JobOutcome::ConvertedWithoutCover
        })
    }

    async fn resolve_cover(
        &self,
        ctx: &JobContext,
        reporter: &SlotReporter,
        title: &str,
    ) -> CoverArtState {
        if has_embedded_visual_stream(ctx.converter.as_ref(), &self.input.path, ctx.probe_timeout)
            .await
        {
            debug!(file = %self.input.display_name, "Existing cover found, skipping fetch");
            return CoverArtState::EmbeddedArt;
        }

        let resolver = match &ctx.resolver {
            Some(resolver) if resolver.is_enabled() => resolver,
            _ => return CoverArtState::NoArt,
        };

        reporter.progress(JobStage::SearchingArt.text());
        match resolver.resolve(title).await {
            Ok(art) => CoverArtState::FetchedArt(art),
            Err(ArtError::NoArtFound { query, tried }) => {
                info!(file = %self.input.display_name, query = %query, tried, "No cover art found");
                CoverArtState::NoArt
            }
            Err(e) => {
                warn!(file = %self.input.display_name, error = %e, "Cover art lookup failed");
                CoverArtState::NoArt
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::ConverterError;
    use std::path::PathBuf;

    #[test]
    fn test_transcode_reason_uses_diagnostic() {
        let err = JobError::from(ConverterError::transcode_failed(
            "ffmpeg exited with code 1",
            Some("line one\nInvalid data found\n".to_string()),
        ));
        let reason = err.reason();
        assert!(reason.contains("ffmpeg exited with code 1"));
        assert!(reason.contains("Invalid data found"));
    }

    #[test]
    fn test_hash_reason() {
        let err = JobError::from(HashError::Open {
            path: PathBuf::from("/x.mp3"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        });
        assert!(err.reason().contains("/x.mp3"));
    }
}
