//! Bing image search backend.
//!
//! Scrapes the results page for `<img class="mimg">` thumbnails, which are
//! either inline base64 data or `https://` thumbnail URLs.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;

use super::config::ArtConfig;
use super::error::ArtError;
use super::traits::ArtSearcher;

static RESULT_IMAGE: Lazy<Selector> = Lazy::new(|| Selector::parse("img.mimg").unwrap());

/// Bing image search backend implementation.
pub struct BingImageSearcher {
    client: Client,
    config: ArtConfig,
}

impl BingImageSearcher {
    /// Create a new BingImageSearcher with the given configuration.
    pub fn new(config: ArtConfig) -> Result<Self, ArtError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .cookie_store(true)
            .build()
            .map_err(|e| ArtError::SearchFailed(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn build_search_url(&self, query: &str) -> String {
        format!(
            "{}?q={}",
            self.config.search_url.trim_end_matches('/'),
            urlencoding::encode(query)
        )
    }
}

/// Pulls candidate image sources out of a results page, in document order.
///
/// `src` wins over `data-src`; lazily loaded thumbnails carry an empty `src`.
pub(crate) fn extract_candidates(html: &str, max: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&RESULT_IMAGE)
        .filter_map(|img| {
            let element = img.value();
            ["src", "data-src"]
                .into_iter()
                .filter_map(|name| element.attr(name))
                .map(str::trim)
                .find(|value| !value.is_empty())
                .map(str::to_string)
        })
        .take(max)
        .collect()
}

#[async_trait]
impl ArtSearcher for BingImageSearcher {
    fn name(&self) -> &str {
        "bing"
    }

    async fn search(&self, query: &str) -> Result<Vec<String>, ArtError> {
        let url = self.build_search_url(query);
        debug!(query = query, "Searching Bing images");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                ArtError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                }
            } else {
                ArtError::SearchFailed(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(ArtError::SearchFailed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ArtError::SearchFailed(format!("Failed to read response: {}", e)))?;

        let candidates = extract_candidates(&html, self.config.max_candidates);
        debug!(query = query, candidates = candidates.len(), "Bing search complete");
        Ok(candidates)
    }
}
