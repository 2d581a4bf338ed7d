//! Trait definitions for the converter module.

use async_trait::async_trait;
use std::path::Path;

use super::error::ConverterError;
use super::types::{ConversionResult, StreamKind, TranscodeSpec};

/// Probes and transcodes media files.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Returns the name of this converter implementation.
    fn name(&self) -> &str;

    /// Lists the stream types present in a media file.
    async fn probe_streams(&self, path: &Path) -> Result<Vec<StreamKind>, ConverterError>;

    /// Runs the transcode described by `spec`.
    async fn convert(&self, spec: &TranscodeSpec) -> Result<ConversionResult, ConverterError>;

    /// Validates that the converter is properly configured and ready.
    async fn validate(&self) -> Result<(), ConverterError>;
}
