//! Cover art state and candidate types.

use image::ImageFormat;
use std::io::{self, Write};
use std::path::Path;
use tempfile::TempPath;

/// A cover image written to a temporary file for the duration of one job.
///
/// The file is removed when this value is dropped or released.
#[derive(Debug)]
pub struct FetchedArt {
    path: TempPath,
}

impl FetchedArt {
    /// Writes `bytes` to a fresh temporary file in `dir`.
    pub fn persist(dir: &Path, extension: &str, bytes: &[u8]) -> io::Result<Self> {
        let suffix = format!(".{}", extension);
        let mut file = tempfile::Builder::new()
            .prefix("cover-")
            .suffix(&suffix)
            .tempfile_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self {
            path: file.into_temp_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the temporary file now, reporting any error.
    pub fn release(self) -> io::Result<()> {
        self.path.close()
    }
}

/// Where the output's cover picture comes from. Exactly one holds per job.
#[derive(Debug)]
pub enum CoverArtState {
    NoArt,
    EmbeddedArt,
    FetchedArt(FetchedArt),
}

impl CoverArtState {
    pub fn has_cover(&self) -> bool {
        !matches!(self, Self::NoArt)
    }

    /// Label used for metrics and logs.
    pub fn source_label(&self) -> &'static str {
        match self {
            Self::NoArt => "none",
            Self::EmbeddedArt => "embedded",
            Self::FetchedArt(_) => "fetched",
        }
    }

    /// Releases any temporary resource held by this state.
    pub fn release(self) -> io::Result<()> {
        match self {
            Self::FetchedArt(art) => art.release(),
            Self::NoArt | Self::EmbeddedArt => Ok(()),
        }
    }
}

/// Inline image encodings accepted from search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineFormat {
    Jpeg,
    Png,
}

impl InlineFormat {
    pub fn image_format(&self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
        }
    }
}

/// A classified candidate location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLocation {
    /// `data:image/{jpeg,png};base64,...`
    Inline { format: InlineFormat, data: String },
    /// An `https://` URL.
    Remote { url: String },
}

impl ImageLocation {
    /// Classifies a raw `src` value. Anything but inline JPEG/PNG or HTTPS is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();

        if let Some(rest) = raw.strip_prefix("data:image/") {
            let (format, rest) = if let Some(rest) = rest.strip_prefix("jpeg;base64,") {
                (InlineFormat::Jpeg, rest)
            } else if let Some(rest) = rest.strip_prefix("png;base64,") {
                (InlineFormat::Png, rest)
            } else {
                return None;
            };
            return Some(Self::Inline {
                format,
                data: rest.to_string(),
            });
        }

        if raw.starts_with("https://") {
            return Some(Self::Remote {
                url: raw.to_string(),
            });
        }

        None
    }
}

/// A downloaded remote image, before validation.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    /// Raw `Content-Type` header value, empty when absent.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FetchedImage {
    /// Whether the server claimed an `image/*` type.
    pub fn is_image(&self) -> bool {
        self.content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }
}
