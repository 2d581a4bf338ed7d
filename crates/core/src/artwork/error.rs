//! Error types for cover art resolution.

use thiserror::Error;

/// Errors raised while searching for or materialising cover art.
///
/// None of these fail a job: the caller converts without a cover instead.
#[derive(Debug, Error)]
pub enum ArtError {
    /// The search backend could not be reached or returned garbage.
    #[error("Art search failed: {0}")]
    SearchFailed(String),

    /// The search round did not finish in time.
    #[error("Art search timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// A single candidate was unusable; the resolver moves on to the next one.
    #[error("Invalid art candidate: {reason}")]
    CandidateInvalid { reason: String },

    /// A remote candidate could not be downloaded.
    #[error("Image download failed: {0}")]
    DownloadFailed(String),

    /// Every candidate was tried and none validated.
    #[error("No valid image found for \"{query}\" ({tried} candidates tried)")]
    NoArtFound { query: String, tried: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArtError {
    pub fn candidate_invalid(reason: impl Into<String>) -> Self {
        Self::CandidateInvalid {
            reason: reason.into(),
        }
    }
}
