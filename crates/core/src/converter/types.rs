//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::config::{EncodingProfile, LoudnessTarget};
use crate::artwork::CoverArtState;

/// Stream type reported by the probe, from ffprobe's `codec_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Audio,
    Video,
    Subtitle,
    Data,
    Attachment,
    Other(String),
}

impl StreamKind {
    /// Maps an ffprobe `codec_type` value.
    pub fn from_codec_type(codec_type: &str) -> Self {
        match codec_type.trim() {
            "audio" => Self::Audio,
            "video" => Self::Video,
            "subtitle" => Self::Subtitle,
            "data" => Self::Data,
            "attachment" => Self::Attachment,
            other => Self::Other(other.to_string()),
        }
    }
}

/// How the cover picture stream is produced in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverStream {
    /// Stream specifier of the picture, e.g. `1:v:0`.
    pub map: String,
    /// Video encoder, or `copy` for an untouched embedded picture.
    pub codec: String,
}

/// Everything ffmpeg is told for one job.
///
/// Built by [`TranscodeSpec::new`], which dispatches on the cover art state
/// and never mixes stream selections from different branches.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeSpec {
    /// Inputs in `-i` order. Index 0 is always the audio source.
    pub inputs: Vec<PathBuf>,
    /// Audio stream specifier.
    pub audio_map: String,
    /// Cover picture stream, absent when the output carries no art.
    pub cover: Option<CoverStream>,
    pub loudness: LoudnessTarget,
    pub audio_codec: String,
    pub bitrate_kbps: u32,
    /// `-metadata key=value` pairs, in order.
    pub metadata: Vec<(String, String)>,
    /// Muxer passed to `-f`.
    pub container: String,
    pub output_path: PathBuf,
}

impl TranscodeSpec {
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        title: &str,
        cover: &CoverArtState,
        profile: &EncodingProfile,
    ) -> Self {
        let mut inputs = vec![input_path.into()];

        let cover = match cover {
            CoverArtState::FetchedArt(art) => {
                inputs.push(art.path().to_path_buf());
                Some(CoverStream {
                    map: "1:v:0".to_string(),
                    codec: profile.cover_codec.clone(),
                })
            }
            CoverArtState::EmbeddedArt => Some(CoverStream {
                map: "0:v:0".to_string(),
                codec: "copy".to_string(),
            }),
            CoverArtState::NoArt => None,
        };

        Self {
            inputs,
            audio_map: "0:a:0".to_string(),
            cover,
            loudness: profile.loudness,
            audio_codec: profile.audio_codec.clone(),
            bitrate_kbps: profile.bitrate_kbps,
            metadata: vec![
                ("title".to_string(), title.to_string()),
                ("artist".to_string(), title.to_string()),
            ],
            container: profile.container.clone(),
            output_path: output_path.into(),
        }
    }

    /// Source audio file.
    pub fn input_path(&self) -> &PathBuf {
        &self.inputs[0]
    }

    /// Codec and stream-selection arguments, without global flags or output path.
    pub fn stream_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        for input in &self.inputs {
            args.push("-i".to_string());
            args.push(input.to_string_lossy().to_string());
        }

        args.extend(["-map".to_string(), self.audio_map.clone()]);

        if let Some(cover) = &self.cover {
            args.extend([
                "-map".to_string(),
                cover.map.clone(),
                "-c:v".to_string(),
                cover.codec.clone(),
                "-disposition:v".to_string(),
                "attached_pic".to_string(),
            ]);
        }

        args.extend([
            "-af".to_string(),
            self.loudness.to_filter(),
            "-c:a".to_string(),
            self.audio_codec.clone(),
            "-b:a".to_string(),
            format!("{}k", self.bitrate_kbps),
        ]);

        for (key, value) in &self.metadata {
            args.push("-metadata".to_string());
            args.push(format!("{}={}", key, value));
        }

        args.extend(["-f".to_string(), self.container.clone()]);
        args
    }
}

/// Result of a finished transcode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    pub output_path: PathBuf,
    pub output_size_bytes: u64,
    pub duration_ms: u64,
}
