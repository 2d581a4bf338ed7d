//! Web cover art resolution.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::config::ArtConfig;
use super::encode::normalize_image;
use super::error::ArtError;
use super::traits::{ArtSearcher, ImageFetcher};
use super::types::{FetchedArt, ImageLocation};
use crate::metrics;

/// Searches for a cover by title and materialises the first valid candidate.
pub struct CoverArtResolver {
    searcher: Arc<dyn ArtSearcher>,
    fetcher: Arc<dyn ImageFetcher>,
    config: ArtConfig,
    temp_dir: PathBuf,
}

impl CoverArtResolver {
    pub fn new(
        searcher: Arc<dyn ArtSearcher>,
        fetcher: Arc<dyn ImageFetcher>,
        config: ArtConfig,
        temp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            searcher,
            fetcher,
            config,
            temp_dir: temp_dir.into(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Tries candidates strictly in search order and returns the first that
    /// validates. Fails with [`ArtError::NoArtFound`] once all are exhausted.
    pub async fn resolve(&self, title: &str) -> Result<FetchedArt, ArtError> {
        let query = self.config.query_for(title);
        debug!(query = %query, searcher = self.searcher.name(), "Searching cover art");

        let search_limit = Duration::from_secs(self.config.timeout_secs);
        let candidates = timeout(search_limit, self.searcher.search(&query))
            .await
            .map_err(|_| ArtError::Timeout {
                timeout_secs: self.config.timeout_secs,
            })??;

        tokio::fs::create_dir_all(&self.temp_dir).await?;

        for (index, raw) in candidates.iter().enumerate() {
            match self.materialize(raw).await {
                Ok(art) => {
                    debug!(query = %query, candidate = index, path = %art.path().display(), "Cover art found");
                    return Ok(art);
                }
                Err(e) => {
                    metrics::ART_CANDIDATES_REJECTED.inc();
                    warn!(candidate = index, location = %truncate(raw, 80), error = %e, "Skipped image");
                }
            }
        }

        Err(ArtError::NoArtFound {
            query,
            tried: candidates.len(),
        })
    }

    async fn materialize(&self, raw: &str) -> Result<FetchedArt, ArtError> {
        let location = ImageLocation::parse(raw)
            .ok_or_else(|| ArtError::candidate_invalid("unsupported image location"))?;

        let bytes = match location {
            ImageLocation::Inline { format, data } => {
                let bytes = BASE64
                    .decode(data.as_bytes())
                    .map_err(|e| ArtError::candidate_invalid(format!("bad base64: {}", e)))?;
                let actual = image::guess_format(&bytes).ok();
                if actual != Some(format.image_format()) {
                    return Err(ArtError::candidate_invalid(format!(
                        "declared {:?} but data is {:?}",
                        format, actual
                    )));
                }
                bytes
            }
            ImageLocation::Remote { url } => {
                let image = self.fetcher.fetch(&url).await?;
                if !image.is_image() {
                    return Err(ArtError::candidate_invalid(format!(
                        "content type {:?} is not an image",
                        image.content_type
                    )));
                }
                image.bytes
            }
        };

        let temp_dir = self.temp_dir.clone();
        tokio::task::spawn_blocking(move || {
            let (data, extension) = normalize_image(bytes)?;
            FetchedArt::persist(&temp_dir, extension, &data).map_err(ArtError::from)
        })
        .await
        .map_err(|e| ArtError::candidate_invalid(format!("image task failed: {}", e)))?
    }
}

fn truncate(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &value[..idx]),
        None => value.to_string(),
    }
}
