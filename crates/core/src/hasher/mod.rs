//! Content hashing for duplicate detection.
//!
//! Files are identified by a SHA-256 digest of their full byte content,
//! streamed in fixed-size chunks so large audio files never sit in memory.
//! [`SeenDigests`] is the run-wide set of digests already claimed by a job.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::sync::Mutex;

/// Default read chunk size.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Errors raised while hashing a file.
#[derive(Debug, Error)]
pub enum HashError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fixed-length fingerprint of a file's bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDigest({})", &self.to_hex()[..16])
    }
}

/// Produces a content digest for a file.
#[async_trait]
pub trait ContentHasher: Send + Sync {
    async fn hash(&self, path: &Path) -> Result<ContentDigest, HashError>;
}

/// Streaming SHA-256 hasher.
#[derive(Debug, Clone)]
pub struct Sha256ContentHasher {
    chunk_size: usize,
}

impl Default for Sha256ContentHasher {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl Sha256ContentHasher {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }
}

#[async_trait]
impl ContentHasher for Sha256ContentHasher {
    async fn hash(&self, path: &Path) -> Result<ContentDigest, HashError> {
        let mut file = tokio::fs::File::open(path)
            .await
            .map_err(|source| HashError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; self.chunk_size];
        loop {
            let n = file.read(&mut buf).await.map_err(|source| HashError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }

        Ok(ContentDigest(hasher.finalize().into()))
    }
}

/// Run-wide set of claimed digests. Entries are never removed.
#[derive(Debug, Default)]
pub struct SeenDigests {
    inner: Mutex<HashSet<ContentDigest>>,
}

impl SeenDigests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically inserts `digest`, returning `true` if it was not seen before.
    ///
    /// Of any number of concurrent callers with equal digests, exactly one
    /// gets `true`.
    pub async fn claim(&self, digest: ContentDigest) -> bool {
        self.inner.lock().await.insert(digest)
    }

    pub async fn contains(&self, digest: &ContentDigest) -> bool {
        self.inner.lock().await.contains(digest)
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[tokio::test]
    async fn test_identical_bytes_identical_digest() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.mp3", b"same audio bytes");
        let b = write(&dir, "completely different name.flac", b"same audio bytes");
        let c = write(&dir, "c.mp3", b"other audio bytes");

        let hasher = Sha256ContentHasher::default();
        let da = hasher.hash(&a).await.unwrap();
        let db = hasher.hash(&b).await.unwrap();
        let dc = hasher.hash(&c).await.unwrap();

        assert_eq!(da, db);
        assert_ne!(da, dc);
    }

    #[tokio::test]
    async fn test_known_digest() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "abc", b"abc");
        let digest = Sha256ContentHasher::default().hash(&path).await.unwrap();
        assert_eq!(
            digest.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_chunk_size_does_not_change_digest() {
        let dir = TempDir::new().unwrap();
        let bytes: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let path = write(&dir, "big.wav", &bytes);

        let small = Sha256ContentHasher::new(7).hash(&path).await.unwrap();
        let large = Sha256ContentHasher::default().hash(&path).await.unwrap();
        assert_eq!(small, large);
        assert_eq!(small.as_bytes().as_slice(), Sha256::digest(&bytes).as_slice());
    }

    #[tokio::test]
    async fn test_missing_file_is_open_error() {
        let err = Sha256ContentHasher::default()
            .hash(Path::new("/no/such/file.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, HashError::Open { .. }));
    }

    #[tokio::test]
    async fn test_claim_is_first_wins() {
        let seen = SeenDigests::new();
        let d = ContentDigest([7; 32]);
        assert!(seen.claim(d).await);
        assert!(!seen.claim(d).await);
        assert!(seen.contains(&d).await);
        assert_eq!(seen.len().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_claims_single_winner() {
        let seen = Arc::new(SeenDigests::new());
        let d = ContentDigest([1; 32]);

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let seen = Arc::clone(&seen);
                tokio::spawn(async move { seen.claim(d).await })
            })
            .collect();

        let mut winners = 0;
        for h in handles {
            if h.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
