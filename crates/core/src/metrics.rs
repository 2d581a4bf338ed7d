//! Prometheus metrics for a conversion run.
//!
//! This module provides metrics for:
//! - Job outcomes (converted, skipped, failed)
//! - Cover art sources and rejected candidates
//! - Transcode durations
//! - Batch progress

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Registry holding every collector below.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    for metric in all_metrics() {
        // Only fails on duplicate registration, which all_metrics() never produces
        let _ = registry.register(metric);
    }
    registry
});

// =============================================================================
// Jobs
// =============================================================================

/// Finished jobs by outcome.
pub static JOBS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("tunepress_jobs_total", "Total finished file jobs"),
        &["outcome"], // "skipped_existing", "skipped_duplicate", "converted_with_cover", "converted_without_cover", "failed"
    )
    .unwrap()
});

/// Converted outputs by cover source.
pub static COVER_ART_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("tunepress_cover_art_total", "Cover art source per transcode"),
        &["source"], // "embedded", "fetched", "none"
    )
    .unwrap()
});

/// Search candidates rejected during art resolution.
pub static ART_CANDIDATES_REJECTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "tunepress_art_candidates_rejected_total",
        "Total art candidates skipped as invalid",
    )
    .unwrap()
});

/// Transcode duration in seconds.
pub static CONVERSION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "tunepress_conversion_duration_seconds",
            "Duration of ffmpeg transcodes",
        )
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

// =============================================================================
// Batches
// =============================================================================

/// Batches completed.
pub static BATCHES_COMPLETED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("tunepress_batches_completed_total", "Total batches completed").unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(JOBS_TOTAL.clone()),
        Box::new(COVER_ART_TOTAL.clone()),
        Box::new(ART_CANDIDATES_REJECTED.clone()),
        Box::new(CONVERSION_DURATION.clone()),
        Box::new(BATCHES_COMPLETED.clone()),
    ]
}

/// Encodes the registry in the Prometheus text format.
pub fn render() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if encoder.encode(&REGISTRY.gather(), &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
