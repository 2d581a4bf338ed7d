//! reqwest-backed image downloads.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

use super::config::ArtConfig;
use super::error::ArtError;
use super::traits::ImageFetcher;
use super::types::FetchedImage;

pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new(config: &ArtConfig) -> Result<Self, ArtError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ArtError::DownloadFailed(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, ArtError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ArtError::DownloadFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ArtError::DownloadFailed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ArtError::DownloadFailed(e.to_string()))?;

        Ok(FetchedImage {
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}
