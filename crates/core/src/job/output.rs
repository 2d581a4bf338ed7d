//! Scratch output for an in-flight transcode.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

use crate::converter::ConverterError;

/// A uniquely named sibling of the final output that the transcoder writes
/// into. The file is removed when this value drops, so a failed, timed out
/// or cancelled transcode never leaves anything at the final path.
#[derive(Debug)]
pub struct PartialOutput {
    path: TempPath,
}

impl PartialOutput {
    /// Creates `.<title>.XXXXXX.<extension>.part` inside `dir`.
    pub fn create(dir: &Path, title: &str, extension: &str) -> io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix(&format!(".{}.", title))
            .suffix(&format!(".{}.part", extension))
            .tempfile_in(dir)?;
        Ok(Self {
            path: file.into_temp_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Moves the finished file to `target`.
    ///
    /// Never replaces an existing `target`: that file belongs to another job
    /// that finished first.
    pub async fn publish(self, target: &Path) -> Result<PathBuf, ConverterError> {
        match tokio::fs::hard_link(&*self.path, target).await {
            // Dropping `self` removes the scratch name.
            Ok(()) => Ok(target.to_path_buf()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                Err(ConverterError::OutputExists {
                    path: target.to_path_buf(),
                })
            }
            Err(_) => {
                // Filesystems without hard links.
                if tokio::fs::try_exists(target).await.unwrap_or(false) {
                    return Err(ConverterError::OutputExists {
                        path: target.to_path_buf(),
                    });
                }
                self.path
                    .persist(target)
                    .map_err(|e| ConverterError::Io(e.error))?;
                Ok(target.to_path_buf())
            }
        }
    }
}
