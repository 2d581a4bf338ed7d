//! Collaborator traits for cover art lookup.

use async_trait::async_trait;

use super::error::ArtError;
use super::types::FetchedImage;

/// Turns a text query into an ordered list of raw image locations.
#[async_trait]
pub trait ArtSearcher: Send + Sync {
    /// Returns the name of this search backend.
    fn name(&self) -> &str;

    /// Candidate `src` values, best first. May include unsupported schemes.
    async fn search(&self, query: &str) -> Result<Vec<String>, ArtError>;
}

/// Downloads a remote image.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, ArtError>;
}
