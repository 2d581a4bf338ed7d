//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external tool and
//! network traits, so jobs and batches can be exercised without ffmpeg or
//! network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use tunepress_core::testing::{MockArtSearcher, MockConverter, MockImageFetcher};
//!
//! let converter = MockConverter::new();
//! let searcher = MockArtSearcher::new();
//! let fetcher = MockImageFetcher::new();
//!
//! // Configure mock responses
//! converter.set_streams("/music/a.mp3", vec![StreamKind::Audio, StreamKind::Video]).await;
//! searcher.set_results(vec!["https://img/cover"]).await;
//! fetcher.set_image("https://img/cover", "image/jpeg", fixtures::jpeg_bytes([0, 0, 0])).await;
//! ```

mod mock_art;
mod mock_converter;
mod mock_hasher;

pub use mock_art::{MockArtSearcher, MockImageFetcher};
pub use mock_converter::MockConverter;
pub use mock_hasher::CountingHasher;

/// Test fixtures and helper functions.
pub mod fixtures {
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn encode(color: [u8; 3], format: ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_pixel(8, 8, Rgb(color));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), format)
            .expect("in-memory image encoding");
        out
    }

    /// A small solid-color JPEG.
    pub fn jpeg_bytes(color: [u8; 3]) -> Vec<u8> {
        encode(color, ImageFormat::Jpeg)
    }

    /// A small solid-color PNG.
    pub fn png_bytes(color: [u8; 3]) -> Vec<u8> {
        encode(color, ImageFormat::Png)
    }

    /// A small solid-color lossless WebP.
    pub fn webp_bytes(color: [u8; 3]) -> Vec<u8> {
        encode(color, ImageFormat::WebP)
    }
}
