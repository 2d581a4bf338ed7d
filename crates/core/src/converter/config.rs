//! Configuration for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the FFmpeg-based converter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Path to ffmpeg binary.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// Path to ffprobe binary.
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: PathBuf,

    /// Timeout for a single conversion in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Timeout for a single ffprobe call in seconds.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[serde(default = "default_log_level")]
    pub ffmpeg_log_level: String,

    /// Additional ffmpeg arguments, inserted right before the output path.
    #[serde(default)]
    pub extra_ffmpeg_args: Vec<String>,

    /// Target encoding for every output file.
    #[serde(default)]
    pub encoding: EncodingProfile,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_ffprobe_path() -> PathBuf {
    PathBuf::from("ffprobe")
}

fn default_timeout() -> u64 {
    3600 // 1 hour
}

fn default_probe_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "error".to_string()
}

impl ConverterConfig {
    /// Deadline for the embedded-art probe of one file.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            timeout_secs: default_timeout(),
            probe_timeout_secs: default_probe_timeout(),
            ffmpeg_log_level: default_log_level(),
            extra_ffmpeg_args: Vec::new(),
            encoding: EncodingProfile::default(),
        }
    }
}

impl ConverterConfig {
    /// Creates a new config with custom ffmpeg/ffprobe paths.
    pub fn with_paths(ffmpeg_path: PathBuf, ffprobe_path: PathBuf) -> Self {
        Self {
            ffmpeg_path,
            ffprobe_path,
            ..Default::default()
        }
    }

    /// Sets the timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Sets the encoding profile.
    pub fn with_encoding(mut self, encoding: EncodingProfile) -> Self {
        self.encoding = encoding;
        self
    }
}

/// Codec, bitrate, container and loudness targets shared by every job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodingProfile {
    /// FFmpeg audio encoder name.
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Constant audio bitrate in kbps.
    #[serde(default = "default_bitrate")]
    pub bitrate_kbps: u32,

    /// FFmpeg muxer name passed to `-f`.
    #[serde(default = "default_container")]
    pub container: String,

    /// Output file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Encoder for fetched cover images.
    #[serde(default = "default_cover_codec")]
    pub cover_codec: String,

    #[serde(default)]
    pub loudness: LoudnessTarget,
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_bitrate() -> u32 {
    128
}

fn default_container() -> String {
    "ipod".to_string()
}

fn default_extension() -> String {
    "m4a".to_string()
}

fn default_cover_codec() -> String {
    "mjpeg".to_string()
}

impl Default for EncodingProfile {
    fn default() -> Self {
        Self {
            audio_codec: default_audio_codec(),
            bitrate_kbps: default_bitrate(),
            container: default_container(),
            extension: default_extension(),
            cover_codec: default_cover_codec(),
            loudness: LoudnessTarget::default(),
        }
    }
}

/// EBU R128 loudness normalisation targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoudnessTarget {
    /// Integrated loudness in LUFS.
    #[serde(default = "default_integrated")]
    pub integrated_lufs: f64,
    /// True peak ceiling in dBTP.
    #[serde(default = "default_true_peak")]
    pub true_peak_db: f64,
    /// Loudness range target in LU.
    #[serde(default = "default_lra")]
    pub loudness_range: f64,
}

fn default_integrated() -> f64 {
    -14.0
}

fn default_true_peak() -> f64 {
    -1.5
}

fn default_lra() -> f64 {
    11.0
}

impl Default for LoudnessTarget {
    fn default() -> Self {
        Self {
            integrated_lufs: default_integrated(),
            true_peak_db: default_true_peak(),
            loudness_range: default_lra(),
        }
    }
}

impl LoudnessTarget {
    /// The `loudnorm` filter expression for `-af`.
    pub fn to_filter(&self) -> String {
        format!(
            "loudnorm=I={}:TP={}:LRA={}",
            self.integrated_lufs, self.true_peak_db, self.loudness_range
        )
    }
}
