//! Hasher wrapper that counts calls.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::hasher::{ContentDigest, ContentHasher, HashError, Sha256ContentHasher};

/// Delegates to [`Sha256ContentHasher`] and records every hashed path.
#[derive(Debug, Clone, Default)]
pub struct CountingHasher {
    inner: Sha256ContentHasher,
    hashed: Arc<RwLock<Vec<PathBuf>>>,
}

impl CountingHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths hashed so far, in order.
    pub async fn hashed_paths(&self) -> Vec<PathBuf> {
        self.hashed.read().await.clone()
    }

    pub async fn hash_count(&self) -> usize {
        self.hashed.read().await.len()
    }
}

#[async_trait]
impl ContentHasher for CountingHasher {
    async fn hash(&self, path: &Path) -> Result<ContentDigest, HashError> {
        self.hashed.write().await.push(path.to_path_buf());
        self.inner.hash(path).await
    }
}
