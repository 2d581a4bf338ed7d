//! Input discovery and batch partitioning.

use std::path::Path;
use tracing::warn;

use super::SchedulerError;
use crate::job::InputFile;

/// Lists the files directly inside `dir`, sorted by file name.
///
/// Subdirectories are skipped; symlinks are followed and entries whose
/// target cannot be read are skipped with a warning.
pub async fn discover_inputs(dir: &Path) -> Result<Vec<InputFile>, SchedulerError> {
    let meta = tokio::fs::metadata(dir)
        .await
        .map_err(|_| SchedulerError::InputDirMissing(dir.to_path_buf()))?;
    if !meta.is_dir() {
        return Err(SchedulerError::NotADirectory(dir.to_path_buf()));
    }

    let read_err = |source: std::io::Error| SchedulerError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_err)?;

    let mut inputs = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
        let path = entry.path();
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => inputs.push(InputFile::new(path)),
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable entry"),
        }
    }

    inputs.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    Ok(inputs)
}

/// Splits `files` into consecutive batches of at most `size`, keeping order.
///
/// `None` (or zero) puts every file in a single batch.
pub fn partition_batches(files: Vec<InputFile>, size: Option<usize>) -> Vec<Vec<InputFile>> {
    if files.is_empty() {
        return Vec::new();
    }
    match size {
        Some(size) if size > 0 => files.chunks(size).map(|c| c.to_vec()).collect(),
        _ => vec![files],
    }
}
