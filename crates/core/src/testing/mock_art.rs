//! Mock cover art search and download for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::artwork::{ArtError, ArtSearcher, FetchedImage, ImageFetcher};

/// Mock implementation of the ArtSearcher trait.
///
/// Returns the same configured candidates for every query and records the
/// queries it receives.
#[derive(Debug, Clone, Default)]
pub struct MockArtSearcher {
    results: Arc<RwLock<Vec<String>>>,
    queries: Arc<RwLock<Vec<String>>>,
    /// If set, the next search fails with this error.
    next_error: Arc<RwLock<Option<ArtError>>>,
    delay: Arc<RwLock<Duration>>,
}

impl MockArtSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the candidates returned by every search.
    pub async fn set_results<S: Into<String>>(&self, results: Vec<S>) {
        *self.results.write().await = results.into_iter().map(Into::into).collect();
    }

    /// Configure the next search to fail.
    pub async fn set_error(&self, error: ArtError) {
        *self.next_error.write().await = Some(error);
    }

    /// Delay every search by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    /// Queries received so far, in order.
    pub async fn queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }
}

#[async_trait]
impl ArtSearcher for MockArtSearcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &str) -> Result<Vec<String>, ArtError> {
        self.queries.write().await.push(query.to_string());

        let delay = *self.delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        Ok(self.results.read().await.clone())
    }
}

/// Mock implementation of the ImageFetcher trait.
///
/// Serves images registered with [`set_image`](Self::set_image); any other
/// URL fails with [`ArtError::DownloadFailed`].
#[derive(Debug, Clone, Default)]
pub struct MockImageFetcher {
    images: Arc<RwLock<HashMap<String, FetchedImage>>>,
    requested: Arc<RwLock<Vec<String>>>,
}

impl MockImageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a response for `url`.
    pub async fn set_image(&self, url: impl Into<String>, content_type: &str, bytes: Vec<u8>) {
        self.images.write().await.insert(
            url.into(),
            FetchedImage {
                content_type: content_type.to_string(),
                bytes,
            },
        );
    }

    /// URLs requested so far, in order.
    pub async fn requested(&self) -> Vec<String> {
        self.requested.read().await.clone()
    }
}

#[async_trait]
impl ImageFetcher for MockImageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, ArtError> {
        self.requested.write().await.push(url.to_string());
        self.images
            .read()
            .await
            .get(url)
            .cloned()
            .ok_or_else(|| ArtError::DownloadFailed(format!("404 Not Found: {}", url)))
    }
}
