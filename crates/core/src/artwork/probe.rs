//! Embedded cover detection.

use std::path::Path;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use crate::converter::{Converter, StreamKind};

/// Whether `path` already carries a video-typed (picture) stream.
///
/// Fails open: a probe error or timeout reports `false`, so a missing or
/// broken probe tool never blocks conversion.
pub async fn has_embedded_visual_stream(
    converter: &dyn Converter,
    path: &Path,
    limit: Duration,
) -> bool {
    match timeout(limit, converter.probe_streams(path)).await {
        Ok(Ok(streams)) => streams.contains(&StreamKind::Video),
        Ok(Err(e)) => {
            debug!(path = %path.display(), error = %e, "Probe unavailable, assuming no embedded art");
            false
        }
        Err(_) => {
            debug!(path = %path.display(), "Probe timed out, assuming no embedded art");
            false
        }
    }
}
