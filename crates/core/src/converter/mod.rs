//! Converter module for probing and transcoding audio files.
//!
//! This module provides the `Converter` trait and an FFmpeg-backed
//! implementation. Every output gets the same treatment:
//!
//! - Loudness normalisation (`loudnorm`, default -14 LUFS / -1.5 dBTP / LRA 11)
//! - Fixed-bitrate lossy audio (AAC 128k by default)
//! - `title` and `artist` metadata set to the cleaned title
//! - An attached cover picture when one is available
//!
//! # Example
//!
//! ```ignore
//! use tunepress_core::converter::{FfmpegConverter, Converter, TranscodeSpec, EncodingProfile};
//! use tunepress_core::artwork::CoverArtState;
//!
//! let converter = FfmpegConverter::with_defaults();
//! converter.validate().await?;
//!
//! let streams = converter.probe_streams(Path::new("/music/song.mp3")).await?;
//!
//! let spec = TranscodeSpec::new(
//!     "/music/song.mp3",
//!     "/converted/Song.m4a",
//!     "Song",
//!     &CoverArtState::NoArt,
//!     &EncodingProfile::default(),
//! );
//! let result = converter.convert(&spec).await?;
//! println!("Converted in {} ms", result.duration_ms);
//! ```

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use config::{ConverterConfig, EncodingProfile, LoudnessTarget};
pub use error::ConverterError;
pub use ffmpeg::FfmpegConverter;
pub use traits::Converter;
pub use types::{ConversionResult, CoverStream, StreamKind, TranscodeSpec};
