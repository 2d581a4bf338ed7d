//! File job integration tests.
//!
//! These tests drive a single FileJob with mock collaborators:
//! - Order of checks (existing output, duplicate content, cover art)
//! - Cover art fallback chain
//! - Temporary cover cleanup on every exit path
//! - No partial output after a failed transcode

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use tunepress_core::{
    testing::{fixtures, CountingHasher, MockArtSearcher, MockConverter, MockImageFetcher},
    ArtConfig, ArtError, ConverterError, CoverArtResolver, FileJob, InputFile, JobContext,
    JobOutcome, SeenDigests, SlotReporter, StreamKind,
};

/// Test helper wiring a job context to mocks.
struct TestHarness {
    context: JobContext,
    converter: MockConverter,
    hasher: CountingHasher,
    seen: Arc<SeenDigests>,
    searcher: Arc<MockArtSearcher>,
    fetcher: Arc<MockImageFetcher>,
    input_dir: TempDir,
    output_dir: TempDir,
    art_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        let input_dir = TempDir::new().expect("Failed to create input dir");
        let output_dir = TempDir::new().expect("Failed to create output dir");
        let art_dir = TempDir::new().expect("Failed to create art dir");

        let converter = MockConverter::new();
        let hasher = CountingHasher::new();
        let seen = Arc::new(SeenDigests::new());
        let searcher = Arc::new(MockArtSearcher::new());
        let fetcher = Arc::new(MockImageFetcher::new());

        let resolver = CoverArtResolver::new(
            searcher.clone(),
            fetcher.clone(),
            ArtConfig::default(),
            art_dir.path(),
        );

        let context = JobContext::new(output_dir.path(), Arc::new(converter.clone()))
            .with_hasher(Arc::new(hasher.clone()))
            .with_seen(Arc::clone(&seen))
            .with_resolver(Arc::new(resolver));

        Self {
            context,
            converter,
            hasher,
            seen,
            searcher,
            fetcher,
            input_dir,
            output_dir,
            art_dir,
        }
    }

    fn input(&self, name: &str, bytes: &[u8]) -> InputFile {
        let path = self.input_dir.path().join(name);
        std::fs::write(&path, bytes).expect("Failed to write input");
        InputFile::new(path)
    }

    fn output(&self, name: &str) -> PathBuf {
        self.output_dir.path().join(name)
    }

    async fn run(&self, input: &InputFile) -> JobOutcome {
        FileJob::new(input.clone())
            .run(&self.context, &SlotReporter::detached(input.display_name.clone()))
            .await
            .outcome
    }

    async fn serve_cover(&self) {
        self.fetcher
            .set_image("https://img/cover", "image/jpeg", fixtures::jpeg_bytes([10, 20, 30]))
            .await;
        self.searcher.set_results(vec!["https://img/cover"]).await;
    }
}

fn dir_is_empty(path: &Path) -> bool {
    std::fs::read_dir(path).unwrap().next().is_none()
}

fn dir_entries(path: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(path)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_existing_output_skips_all_work() {
    let h = TestHarness::new();
    let input = h.input("Song (Official Video).mp3", b"audio");
    std::fs::write(h.output("Song.m4a"), b"old").unwrap();

    assert_eq!(h.run(&input).await, JobOutcome::SkippedExisting);

    assert_eq!(h.hasher.hash_count().await, 0);
    assert!(h.seen.is_empty().await);
    assert_eq!(h.converter.probe_count().await, 0);
    assert_eq!(h.converter.conversion_count().await, 0);
    assert!(h.searcher.queries().await.is_empty());
    assert_eq!(std::fs::read(h.output("Song.m4a")).unwrap(), b"old");
}

#[tokio::test]
async fn test_identical_content_is_duplicate() {
    let h = TestHarness::new();
    let first = h.input("First.mp3", b"same bytes");
    let second = h.input("Second.mp3", b"same bytes");

    assert_eq!(h.run(&first).await, JobOutcome::ConvertedWithoutCover);
    assert_eq!(h.run(&second).await, JobOutcome::SkippedDuplicate);

    assert_eq!(h.seen.len().await, 1);
    assert_eq!(h.converter.conversion_count().await, 1);
    assert!(!h.output("Second.m4a").exists());
}

#[tokio::test]
async fn test_embedded_cover_is_copied_without_search() {
    let h = TestHarness::new();
    let input = h.input("Tagged.mp3", b"tagged audio");
    h.converter
        .set_streams(&input.path, vec![StreamKind::Audio, StreamKind::Video])
        .await;
    h.serve_cover().await;

    assert_eq!(
        h.run(&input).await,
        JobOutcome::ConvertedWithCover { embedded: true }
    );
    assert!(h.searcher.queries().await.is_empty());

    let conversions = h.converter.recorded_conversions().await;
    let spec = &conversions[0].spec;
    assert_eq!(spec.inputs, vec![input.path.clone()]);
    let cover = spec.cover.as_ref().expect("cover stream");
    assert_eq!(cover.map, "0:v:0");
    assert_eq!(cover.codec, "copy");
}

#[tokio::test]
async fn test_fetched_cover_is_attached_then_removed() {
    let h = TestHarness::new();
    let input = h.input("Night Drive ft. Someone.wav", b"wav audio");
    h.serve_cover().await;

    assert_eq!(
        h.run(&input).await,
        JobOutcome::ConvertedWithCover { embedded: false }
    );
    assert_eq!(
        h.searcher.queries().await,
        vec!["Night Drive song album art".to_string()]
    );

    let conversions = h.converter.recorded_conversions().await;
    let spec = &conversions[0].spec;
    assert_eq!(spec.inputs.len(), 2);
    assert!(conversions[0].cover_input_existed);
    assert_eq!(spec.cover.as_ref().unwrap().map, "1:v:0");
    assert_eq!(spec.output_path.parent(), Some(h.output_dir.path()));
    assert_ne!(spec.output_path, h.output("Night Drive.m4a"));
    assert!(h.output("Night Drive.m4a").exists());
    assert!(!spec.output_path.exists());
    assert_eq!(
        spec.metadata,
        vec![
            ("title".to_string(), "Night Drive".to_string()),
            ("artist".to_string(), "Night Drive".to_string()),
        ]
    );

    assert!(!spec.inputs[1].exists());
    assert!(dir_is_empty(h.art_dir.path()));
}

#[tokio::test]
async fn test_fetched_cover_removed_after_transcode_failure() {
    let h = TestHarness::new();
    let input = h.input("Broken.mp3", b"corrupt");
    h.serve_cover().await;
    h.converter.fail_input(&input.path).await;

    match h.run(&input).await {
        JobOutcome::Failed(reason) => assert!(reason.contains("Invalid data")),
        other => panic!("expected failure, got {other:?}"),
    }

    let conversions = h.converter.recorded_conversions().await;
    assert!(conversions[0].cover_input_existed);
    assert!(!conversions[0].spec.inputs[1].exists());
    assert!(dir_is_empty(h.art_dir.path()));
    assert!(!h.output("Broken.m4a").exists());
}

#[tokio::test]
async fn test_no_valid_candidate_converts_without_cover() {
    let h = TestHarness::new();
    let input = h.input("Obscure.mp3", b"rare");
    h.searcher
        .set_results(vec!["http://insecure/a.jpg", "https://img/missing"])
        .await;

    assert_eq!(h.run(&input).await, JobOutcome::ConvertedWithoutCover);

    let conversions = h.converter.recorded_conversions().await;
    assert_eq!(conversions[0].spec.cover, None);
    assert_eq!(conversions[0].spec.inputs.len(), 1);
}

#[tokio::test]
async fn test_search_failure_is_not_fatal() {
    let h = TestHarness::new();
    let input = h.input("Offline.mp3", b"net down");
    h.searcher
        .set_error(ArtError::SearchFailed("connection refused".to_string()))
        .await;

    assert_eq!(h.run(&input).await, JobOutcome::ConvertedWithoutCover);
}

#[tokio::test]
async fn test_unreadable_input_fails_job() {
    let h = TestHarness::new();
    let input = InputFile::new(h.input_dir.path().join("ghost.mp3"));

    match h.run(&input).await {
        JobOutcome::Failed(reason) => assert!(reason.contains("ghost.mp3")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(h.seen.is_empty().await);
    assert_eq!(h.converter.probe_count().await, 0);
}

#[tokio::test]
async fn test_art_lookup_disabled() {
    let h = TestHarness::new();
    let input = h.input("Plain.mp3", b"plain");
    h.serve_cover().await;

    let context = JobContext::new(h.output_dir.path(), Arc::new(h.converter.clone()));
    let result = FileJob::new(input.clone())
        .run(&context, &SlotReporter::detached("Plain.mp3"))
        .await;

    assert_eq!(result.outcome, JobOutcome::ConvertedWithoutCover);
    assert!(h.searcher.queries().await.is_empty());
    assert_eq!(result.to_string(), "Plain.mp3 → 🎵 Converted (no cover)");
}

#[tokio::test]
async fn test_timed_out_transcode_leaves_no_output() {
    let h = TestHarness::new();
    let input = h.input("Song.mp3", b"long audio");
    h.converter.leave_truncated_output(b"partial").await;
    h.converter
        .set_next_error(ConverterError::Timeout { timeout_secs: 1 })
        .await;

    match h.run(&input).await {
        JobOutcome::Failed(reason) => assert!(reason.contains("timed out")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(!h.output("Song.m4a").exists());
    assert!(dir_is_empty(h.output_dir.path()));

    // A fresh run converts instead of treating the file as done
    let context = h.context.clone().with_seen(Arc::new(SeenDigests::new()));
    let result = FileJob::new(input.clone())
        .run(&context, &SlotReporter::detached("Song.mp3"))
        .await;
    assert_eq!(result.outcome, JobOutcome::ConvertedWithoutCover);
    assert_eq!(dir_entries(h.output_dir.path()), vec!["Song.m4a".to_string()]);
    assert_eq!(std::fs::read(h.output("Song.m4a")).unwrap(), b"mock m4a");
}

#[tokio::test]
async fn test_output_claimed_mid_transcode_is_kept() {
    let h = TestHarness::new();
    let input = h.input("Race.mp3", b"racing audio");
    h.converter
        .set_conversion_duration(Duration::from_millis(100))
        .await;

    let job = FileJob::new(input.clone());
    let context = h.context.clone();
    let running = tokio::spawn(async move {
        job.run(&context, &SlotReporter::detached("Race.mp3"))
            .await
            .outcome
    });
    // Wait for the scratch file, then finish "another job" first
    for _ in 0..200 {
        if !dir_is_empty(h.output_dir.path()) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    std::fs::write(h.output("Race.m4a"), b"other job").unwrap();

    match running.await.unwrap() {
        JobOutcome::Failed(reason) => assert!(reason.contains("already exists")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(std::fs::read(h.output("Race.m4a")).unwrap(), b"other job");
    assert_eq!(dir_entries(h.output_dir.path()), vec!["Race.m4a".to_string()]);
}
