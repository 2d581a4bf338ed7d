//! Shared collaborators for file jobs.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::output::PartialOutput;
use crate::artwork::CoverArtResolver;
use crate::converter::{Converter, ConverterConfig, EncodingProfile};
use crate::hasher::{ContentHasher, SeenDigests, Sha256ContentHasher};
use crate::title::{NoiseWordCleaner, TitleNormalizer};

/// Everything a [`FileJob`](super::FileJob) needs, shared by all jobs of a run.
#[derive(Clone)]
pub struct JobContext {
    pub output_dir: PathBuf,
    pub hasher: Arc<dyn ContentHasher>,
    /// Digests claimed so far; shared across every batch of the run.
    pub seen: Arc<SeenDigests>,
    pub normalizer: Arc<dyn TitleNormalizer>,
    pub converter: Arc<dyn Converter>,
    /// Web cover lookup, `None` to never search.
    pub resolver: Option<Arc<CoverArtResolver>>,
    pub encoding: EncodingProfile,
    /// Bound on the embedded-art probe; the converter itself never times it out.
    pub probe_timeout: Duration,
}

impl JobContext {
    /// Creates a context with SHA-256 hashing, the default title cleaner and
    /// no web art lookup.
    pub fn new(output_dir: impl Into<PathBuf>, converter: Arc<dyn Converter>) -> Self {
        Self {
            output_dir: output_dir.into(),
            hasher: Arc::new(Sha256ContentHasher::default()),
            seen: Arc::new(SeenDigests::new()),
            normalizer: Arc::new(NoiseWordCleaner::default()),
            converter,
            resolver: None,
            encoding: EncodingProfile::default(),
            probe_timeout: ConverterConfig::default().probe_timeout(),
        }
    }

    pub fn with_hasher(mut self, hasher: Arc<dyn ContentHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn with_seen(mut self, seen: Arc<SeenDigests>) -> Self {
        self.seen = seen;
        self
    }

    pub fn with_normalizer(mut self, normalizer: Arc<dyn TitleNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<CoverArtResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_encoding(mut self, encoding: EncodingProfile) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Hidden scratch file next to the final output.
    pub fn partial_output_for(&self, title: &str) -> std::io::Result<PartialOutput> {
        PartialOutput::create(&self.output_dir, title, &self.encoding.extension)
    }

    /// `<output_dir>/<title>.<extension>`.
    pub fn output_path_for(&self, title: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", title, self.encoding.extension))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl std::fmt::Debug for JobContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobContext")
            .field("output_dir", &self.output_dir)
            .field("converter", &self.converter.name())
            .field("resolver", &self.resolver.is_some())
            .field("encoding", &self.encoding)
            .field("probe_timeout", &self.probe_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockConverter;

    #[test]
    fn test_probe_timeout_defaults_to_converter_config() {
        let ctx = JobContext::new("/out", Arc::new(MockConverter::new()));
        assert_eq!(ctx.probe_timeout, ConverterConfig::default().probe_timeout());

        let mut config = ConverterConfig::default();
        config.probe_timeout_secs = 5;
        let ctx = ctx.with_probe_timeout(config.probe_timeout());
        assert_eq!(ctx.probe_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_output_path_uses_extension() {
        let ctx = JobContext::new("/out", Arc::new(MockConverter::new()));
        assert_eq!(ctx.output_path_for("Song"), PathBuf::from("/out/Song.m4a"));
    }
}
