//! FFmpeg-based converter implementation.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

use super::config::ConverterConfig;
use super::error::ConverterError;
use super::traits::Converter;
use super::types::{ConversionResult, StreamKind, TranscodeSpec};

/// FFmpeg-based converter implementation.
pub struct FfmpegConverter {
    config: ConverterConfig,
}

impl FfmpegConverter {
    /// Creates a new FFmpeg converter with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Creates a converter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ConverterConfig::default())
    }

    /// Builds the full ffmpeg argument list for a spec.
    ///
    /// `-y` because the output is a scratch file already created for this
    /// job; publishing to the final name is the caller's step.
    fn build_args(&self, spec: &TranscodeSpec) -> Vec<String> {
        let mut args = vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
            "-y".to_string(),
        ];

        args.extend(spec.stream_args());

        // Extra args
        args.extend(self.config.extra_ffmpeg_args.iter().cloned());

        // Output
        args.push(spec.output_path.to_string_lossy().to_string());

        args
    }

    /// Parses `ffprobe -show_entries stream=codec_type` output, one type per line.
    fn parse_stream_types(output: &str) -> Vec<StreamKind> {
        output
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(StreamKind::from_codec_type)
            .collect()
    }

    fn spawn_error(&self, e: std::io::Error, binary: &Path, is_probe: bool) -> ConverterError {
        if e.kind() == std::io::ErrorKind::NotFound {
            if is_probe {
                ConverterError::FfprobeNotFound {
                    path: binary.to_path_buf(),
                }
            } else {
                ConverterError::FfmpegNotFound {
                    path: binary.to_path_buf(),
                }
            }
        } else {
            ConverterError::Io(e)
        }
    }
}

#[async_trait]
impl Converter for FfmpegConverter {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    /// Runs without a deadline of its own; callers bound it (see
    /// [`has_embedded_visual_stream`](crate::artwork::has_embedded_visual_stream)).
    /// Dropping the future kills ffprobe.
    async fn probe_streams(&self, path: &Path) -> Result<Vec<StreamKind>, ConverterError> {
        if !path.exists() {
            return Err(ConverterError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let output = Command::new(&self.config.ffprobe_path)
            .args([
                "-v",
                "error",
                "-show_entries",
                "stream=codec_type",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| self.spawn_error(e, &self.config.ffprobe_path, true))?;

        if !output.status.success() {
            return Err(ConverterError::probe_failed(format!(
                "ffprobe failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(Self::parse_stream_types(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }

    async fn convert(&self, spec: &TranscodeSpec) -> Result<ConversionResult, ConverterError> {
        let start = Instant::now();

        let input = spec.input_path();
        if !input.exists() {
            return Err(ConverterError::InputNotFound {
                path: input.clone(),
            });
        }

        let args = self.build_args(spec);
        debug!(command = %format!("ffmpeg {}", args.join(" ")), "Running ffmpeg");

        let mut child = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e, &self.config.ffmpeg_path, false))?;

        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ConverterError::transcode_failed("stderr was not captured", None))?;

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let result = timeout(timeout_duration, async {
            let mut error_output = String::new();
            stderr.read_to_string(&mut error_output).await?;
            let status = child.wait().await?;
            Ok::<(std::process::ExitStatus, String), std::io::Error>((status, error_output))
        })
        .await;

        match result {
            Ok(Ok((status, error_output))) => {
                if !status.success() {
                    return Err(ConverterError::transcode_failed(
                        format!("FFmpeg exited with code: {:?}", status.code()),
                        if error_output.trim().is_empty() {
                            None
                        } else {
                            Some(error_output)
                        },
                    ));
                }
            }
            Ok(Err(e)) => return Err(ConverterError::Io(e)),
            Err(_) => {
                // Kill the process on timeout
                let _ = child.kill().await;
                return Err(ConverterError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                });
            }
        }

        // Verify output exists and get size
        let output_meta = tokio::fs::metadata(&spec.output_path)
            .await
            .map_err(|_| ConverterError::transcode_failed("Output file not created", None))?;
        if output_meta.len() == 0 {
            return Err(ConverterError::transcode_failed("Output file is empty", None));
        }

        Ok(ConversionResult {
            output_path: spec.output_path.clone(),
            output_size_bytes: output_meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        for (binary, is_probe) in [
            (&self.config.ffmpeg_path, false),
            (&self.config.ffprobe_path, true),
        ] {
            Command::new(binary)
                .arg("-version")
                .stdin(Stdio::null())
                .output()
                .await
                .map_err(|e| self.spawn_error(e, binary, is_probe))?;
        }

        Ok(())
    }
}
