//! Types for the job module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A file discovered in the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    /// File name shown in status lines.
    pub display_name: String,
}

impl InputFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self { path, display_name }
    }

    /// File name without its final extension; the input to title cleaning.
    pub fn base_name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.display_name.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Intermediate stage a job reports into its status slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    Hashing,
    Probing,
    SearchingArt,
    Transcoding,
}

impl JobStage {
    pub fn text(&self) -> &'static str {
        match self {
            Self::Hashing => "🔑 Hashing",
            Self::Probing => "🔍 Probing for cover",
            Self::SearchingArt => "🌐 Searching cover art",
            Self::Transcoding => "🎛️ Transcoding",
        }
    }
}

/// Terminal state of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum JobOutcome {
    /// The output file already existed; nothing else was done.
    SkippedExisting,
    /// Another input with identical bytes was claimed first.
    SkippedDuplicate,
    /// Converted with a cover; `embedded` when the source's own picture was kept.
    ConvertedWithCover { embedded: bool },
    ConvertedWithoutCover,
    Failed(String),
}

impl JobOutcome {
    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SkippedExisting => "skipped_existing",
            Self::SkippedDuplicate => "skipped_duplicate",
            Self::ConvertedWithCover { .. } => "converted_with_cover",
            Self::ConvertedWithoutCover => "converted_without_cover",
            Self::Failed(_) => "failed",
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(
            self,
            Self::ConvertedWithCover { .. } | Self::ConvertedWithoutCover
        )
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Status text after the file name.
    pub fn status_text(&self) -> String {
        match self {
            Self::SkippedExisting => "⚠️ Skipped (already converted)".to_string(),
            Self::SkippedDuplicate => "⚠️ Skipped (duplicate)".to_string(),
            Self::ConvertedWithCover { embedded: true } => "🎵 Converted (kept cover)".to_string(),
            Self::ConvertedWithCover { embedded: false } => {
                "🎵 Converted (added cover)".to_string()
            }
            Self::ConvertedWithoutCover => "🎵 Converted (no cover)".to_string(),
            Self::Failed(reason) => format!("❌ Failed: {}", reason),
        }
    }
}

/// Result of one finished job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    pub display_name: String,
    pub outcome: JobOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl JobResult {
    /// The line shown in the job's slot.
    pub fn status_line(&self) -> String {
        format!("{} → {}", self.display_name, self.outcome.status_text())
    }
}

impl fmt::Display for JobResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_file_names() {
        let input = InputFile::new("/music/My Song.final.mp3");
        assert_eq!(input.display_name, "My Song.final.mp3");
        assert_eq!(input.base_name(), "My Song.final");

        let bare = InputFile::new("/music/noext");
        assert_eq!(bare.base_name(), "noext");
    }

    #[test]
    fn test_status_lines() {
        let result = |outcome| JobResult {
            display_name: "a.mp3".to_string(),
            outcome,
            started_at: Utc::now(),
            finished_at: Utc::now(),
        };

        assert_eq!(
            result(JobOutcome::SkippedExisting).to_string(),
            "a.mp3 → ⚠️ Skipped (already converted)"
        );
        assert_eq!(
            result(JobOutcome::SkippedDuplicate).to_string(),
            "a.mp3 → ⚠️ Skipped (duplicate)"
        );
        assert_eq!(
            result(JobOutcome::ConvertedWithCover { embedded: true }).to_string(),
            "a.mp3 → 🎵 Converted (kept cover)"
        );
        assert_eq!(
            result(JobOutcome::ConvertedWithCover { embedded: false }).to_string(),
            "a.mp3 → 🎵 Converted (added cover)"
        );
        assert_eq!(
            result(JobOutcome::ConvertedWithoutCover).to_string(),
            "a.mp3 → 🎵 Converted (no cover)"
        );
        assert_eq!(
            result(JobOutcome::Failed("exit 1".to_string())).to_string(),
            "a.mp3 → ❌ Failed: exit 1"
        );
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let json = serde_json::to_value(JobOutcome::ConvertedWithCover { embedded: false }).unwrap();
        assert_eq!(json["outcome"], "converted_with_cover");
        assert_eq!(json["detail"]["embedded"], false);
    }
}
