//! End-to-end conversion with the real ffmpeg and ffprobe binaries.
//!
//! Ignored by default; run with `cargo test -- --ignored` on a machine that
//! has both tools on PATH.

use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use tempfile::TempDir;

use tunepress_core::{
    testing::{fixtures, MockArtSearcher, MockImageFetcher},
    ArtConfig, CoverArtResolver, FfmpegConverter, FileJob, InputFile, JobContext, JobOutcome,
    SlotReporter,
};

fn ffmpeg(args: &[&str]) {
    let status = Command::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error", "-y"])
        .args(args)
        .status()
        .expect("ffmpeg on PATH");
    assert!(status.success());
}

fn probe(path: &Path, entries: &str) -> String {
    let output = Command::new("ffprobe")
        .args(["-v", "error", "-show_entries", entries, "-of", "default=noprint_wrappers=1"])
        .arg(path)
        .output()
        .expect("ffprobe on PATH");
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn context(
    output: &Path,
    art: &Path,
    searcher: Arc<MockArtSearcher>,
    fetcher: Arc<MockImageFetcher>,
) -> JobContext {
    let resolver = CoverArtResolver::new(searcher, fetcher, ArtConfig::default(), art);
    JobContext::new(output, Arc::new(FfmpegConverter::with_defaults()))
        .with_resolver(Arc::new(resolver))
}

#[tokio::test]
#[ignore]
async fn test_silent_wav_gets_fetched_cover() {
    let dir = TempDir::new().unwrap();
    let input_dir = dir.path().join("in");
    let output_dir = dir.path().join("out");
    let art_dir = dir.path().join("art");
    std::fs::create_dir_all(&input_dir).unwrap();
    std::fs::create_dir_all(&output_dir).unwrap();

    let wav = input_dir.join("Quiet Place (Official Audio).wav");
    ffmpeg(&["-f", "lavfi", "-i", "anullsrc=r=44100:cl=stereo", "-t", "2", wav.to_str().unwrap()]);

    let searcher = Arc::new(MockArtSearcher::new());
    let fetcher = Arc::new(MockImageFetcher::new());
    fetcher
        .set_image("https://img/cover.jpg", "image/jpeg", fixtures::jpeg_bytes([200, 100, 50]))
        .await;
    searcher.set_results(vec!["https://img/cover.jpg"]).await;

    let ctx = context(&output_dir, &art_dir, searcher.clone(), fetcher);
    let result = FileJob::new(InputFile::new(&wav))
        .run(&ctx, &SlotReporter::detached("wav"))
        .await;

    assert_eq!(result.outcome, JobOutcome::ConvertedWithCover { embedded: false });

    let out = output_dir.join("Quiet Place.m4a");
    let streams = probe(&out, "stream=codec_type,codec_name:stream_disposition=attached_pic");
    assert!(streams.contains("codec_name=aac"));
    assert!(streams.contains("codec_type=video"));
    assert!(streams.contains("DISPOSITION:attached_pic=1"));

    let tags = probe(&out, "format_tags=title,artist");
    assert!(tags.contains("TAG:title=Quiet Place"));
    assert!(tags.contains("TAG:artist=Quiet Place"));
    assert_eq!(std::fs::read_dir(&art_dir).unwrap().count(), 0);
}

#[tokio::test]
#[ignore]
async fn test_embedded_cover_is_stream_copied() {
    let dir = TempDir::new().unwrap();
    let output_dir = dir.path().join("out");
    std::fs::create_dir_all(&output_dir).unwrap();

    let cover = dir.path().join("cover.jpg");
    std::fs::write(&cover, fixtures::jpeg_bytes([0, 128, 255])).unwrap();
    let tagged = dir.path().join("Tagged.m4a");
    ffmpeg(&[
        "-f", "lavfi", "-i", "anullsrc=r=44100:cl=mono", "-i", cover.to_str().unwrap(),
        "-t", "2", "-map", "0:a", "-map", "1:v", "-c:a", "aac", "-c:v", "mjpeg",
        "-disposition:v", "attached_pic", "-f", "ipod", tagged.to_str().unwrap(),
    ]);

    let searcher = Arc::new(MockArtSearcher::new());
    let ctx = context(
        &output_dir,
        &dir.path().join("art"),
        searcher.clone(),
        Arc::new(MockImageFetcher::new()),
    );
    let result = FileJob::new(InputFile::new(&tagged))
        .run(&ctx, &SlotReporter::detached("tagged"))
        .await;

    assert_eq!(result.outcome, JobOutcome::ConvertedWithCover { embedded: true });
    assert!(searcher.queries().await.is_empty());

    let extract = |path: &Path, name: &str| {
        let target = dir.path().join(name);
        ffmpeg(&[
            "-i", path.to_str().unwrap(), "-map", "0:v:0", "-c", "copy", "-f", "mjpeg",
            target.to_str().unwrap(),
        ]);
        std::fs::read(target).unwrap()
    };
    assert_eq!(
        extract(&tagged, "before.jpg"),
        extract(&output_dir.join("Tagged.m4a"), "after.jpg")
    );
}
