//! Mock converter for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::converter::{ConversionResult, Converter, ConverterError, StreamKind, TranscodeSpec};

/// A recorded transcode for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedConversion {
    /// The spec that was submitted.
    pub spec: TranscodeSpec,
    /// Whether the cover input (if any) existed when the transcode started.
    pub cover_input_existed: bool,
    /// Whether the conversion succeeded.
    pub success: bool,
}

/// Mock implementation of the Converter trait.
///
/// Provides controllable behavior for testing:
/// - Per-path probe results (audio only by default)
/// - Probe failures and delays
/// - Transcode failures, either once or for specific inputs
/// - Failures that leave truncated output behind, like a killed ffmpeg
/// - Records every submitted spec
///
/// Successful transcodes write a small placeholder file at the output path,
/// so follow-up "already converted" checks behave as with real ffmpeg.
#[derive(Debug, Clone)]
pub struct MockConverter {
    conversions: Arc<RwLock<Vec<RecordedConversion>>>,
    streams: Arc<RwLock<HashMap<PathBuf, Vec<StreamKind>>>>,
    probe_error: Arc<RwLock<Option<ConverterError>>>,
    probe_delay: Arc<RwLock<Duration>>,
    probe_count: Arc<RwLock<usize>>,
    /// If set, the next transcode fails with this error.
    next_error: Arc<RwLock<Option<ConverterError>>>,
    /// Inputs whose transcode always fails.
    failing_inputs: Arc<RwLock<Vec<PathBuf>>>,
    conversion_duration: Arc<RwLock<Duration>>,
    /// Failed transcodes write this to the output path first.
    truncated_output: Arc<RwLock<Option<Vec<u8>>>>,
}

impl Default for MockConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConverter {
    /// Create a new mock converter.
    pub fn new() -> Self {
        Self {
            conversions: Arc::new(RwLock::new(Vec::new())),
            streams: Arc::new(RwLock::new(HashMap::new())),
            probe_error: Arc::new(RwLock::new(None)),
            probe_delay: Arc::new(RwLock::new(Duration::ZERO)),
            probe_count: Arc::new(RwLock::new(0)),
            next_error: Arc::new(RwLock::new(None)),
            failing_inputs: Arc::new(RwLock::new(Vec::new())),
            conversion_duration: Arc::new(RwLock::new(Duration::ZERO)),
            truncated_output: Arc::new(RwLock::new(None)),
        }
    }

    /// Get all recorded conversions.
    pub async fn recorded_conversions(&self) -> Vec<RecordedConversion> {
        self.conversions.read().await.clone()
    }

    /// Get the number of transcodes attempted.
    pub async fn conversion_count(&self) -> usize {
        self.conversions.read().await.len()
    }

    /// Get the number of probes performed.
    pub async fn probe_count(&self) -> usize {
        *self.probe_count.read().await
    }

    /// Set the streams reported for a specific path.
    pub async fn set_streams(&self, path: impl AsRef<Path>, streams: Vec<StreamKind>) {
        self.streams
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), streams);
    }

    /// Configure the next probe to fail with the given error.
    pub async fn set_probe_error(&self, error: ConverterError) {
        *self.probe_error.write().await = Some(error);
    }

    /// Delay every probe by `delay`.
    pub async fn set_probe_delay(&self, delay: Duration) {
        *self.probe_delay.write().await = delay;
    }

    /// Configure the next transcode to fail with the given error.
    pub async fn set_next_error(&self, error: ConverterError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make every transcode of `input` fail.
    pub async fn fail_input(&self, input: impl AsRef<Path>) {
        self.failing_inputs
            .write()
            .await
            .push(input.as_ref().to_path_buf());
    }

    /// Set the simulated transcode duration.
    pub async fn set_conversion_duration(&self, duration: Duration) {
        *self.conversion_duration.write().await = duration;
    }

    /// Make failed transcodes leave `bytes` at the output path.
    pub async fn leave_truncated_output(&self, bytes: &[u8]) {
        *self.truncated_output.write().await = Some(bytes.to_vec());
    }

    async fn write_truncated(&self, spec: &TranscodeSpec) -> Result<(), ConverterError> {
        if let Some(bytes) = self.truncated_output.read().await.as_ref() {
            tokio::fs::write(&spec.output_path, bytes).await?;
        }
        Ok(())
    }

    async fn record(&self, spec: &TranscodeSpec, success: bool) {
        let cover_input_existed = spec.inputs.get(1).map(|p| p.exists()).unwrap_or(false);
        self.conversions.write().await.push(RecordedConversion {
            spec: spec.clone(),
            cover_input_existed,
            success,
        });
    }
}

#[async_trait]
impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe_streams(&self, path: &Path) -> Result<Vec<StreamKind>, ConverterError> {
        *self.probe_count.write().await += 1;

        let delay = *self.probe_delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.probe_error.write().await.take() {
            return Err(err);
        }

        Ok(self
            .streams
            .read()
            .await
            .get(path)
            .cloned()
            .unwrap_or_else(|| vec![StreamKind::Audio]))
    }

    async fn convert(&self, spec: &TranscodeSpec) -> Result<ConversionResult, ConverterError> {
        let duration = *self.conversion_duration.read().await;
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }

        let failing = self
            .failing_inputs
            .read()
            .await
            .iter()
            .any(|p| p == spec.input_path());
        let injected = self.next_error.write().await.take();

        if let Some(err) = injected {
            self.record(spec, false).await;
            self.write_truncated(spec).await?;
            return Err(err);
        }
        if failing {
            self.record(spec, false).await;
            self.write_truncated(spec).await?;
            return Err(ConverterError::transcode_failed(
                "ffmpeg exited with code 1",
                Some("Invalid data found when processing input".to_string()),
            ));
        }

        self.record(spec, true).await;
        let body = b"mock m4a";
        tokio::fs::write(&spec.output_path, body).await?;

        Ok(ConversionResult {
            output_path: spec.output_path.clone(),
            output_size_bytes: body.len() as u64,
            duration_ms: duration.as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        Ok(())
    }
}
