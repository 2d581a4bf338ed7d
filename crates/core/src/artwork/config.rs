//! Configuration for cover art search.

use serde::{Deserialize, Serialize};

/// Web image search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtConfig {
    /// When false, files without embedded art are converted without a cover.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Image search results page.
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Appended to the clean title to form the search query.
    #[serde(default = "default_query_suffix")]
    pub query_suffix: String,

    /// Bound on one search round and on each image download, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum candidates taken from one results page.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_enabled() -> bool {
    true
}

fn default_search_url() -> String {
    "https://www.bing.com/images/search".to_string()
}

fn default_query_suffix() -> String {
    "song album art".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_max_candidates() -> usize {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
        .to_string()
}

impl Default for ArtConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            search_url: default_search_url(),
            query_suffix: default_query_suffix(),
            timeout_secs: default_timeout(),
            max_candidates: default_max_candidates(),
            user_agent: default_user_agent(),
        }
    }
}

impl ArtConfig {
    /// The search query for a clean title.
    pub fn query_for(&self, title: &str) -> String {
        let suffix = self.query_suffix.trim();
        if suffix.is_empty() {
            title.trim().to_string()
        } else {
            format!("{} {}", title.trim(), suffix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_for() {
        let config = ArtConfig::default();
        assert_eq!(config.query_for("Kaathalae"), "Kaathalae song album art");

        let bare = ArtConfig {
            query_suffix: " ".to_string(),
            ..Default::default()
        };
        assert_eq!(bare.query_for(" Kaathalae "), "Kaathalae");
    }
}
