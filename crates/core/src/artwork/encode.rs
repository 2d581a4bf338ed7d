//! Image validation and re-encoding.

use image::ImageFormat;
use std::io::Cursor;

use super::error::ArtError;

/// Checks that `bytes` hold a recognised image and returns data ready to
/// embed plus its extension. JPEG and PNG pass through untouched; any other
/// format (WebP, GIF, ...) is decoded and re-encoded as baseline JPEG.
pub(crate) fn normalize_image(bytes: Vec<u8>) -> Result<(Vec<u8>, &'static str), ArtError> {
    let format = image::guess_format(&bytes)
        .map_err(|_| ArtError::candidate_invalid("unrecognised image data"))?;

    match format {
        ImageFormat::Jpeg => Ok((bytes, "jpg")),
        ImageFormat::Png => Ok((bytes, "png")),
        other => {
            let img = image::load_from_memory_with_format(&bytes, other).map_err(|e| {
                ArtError::candidate_invalid(format!("failed to decode {:?}: {}", other, e))
            })?;
            // JPEG has no alpha channel
            let rgb = image::DynamicImage::ImageRgb8(img.to_rgb8());
            let mut out = Vec::new();
            rgb.write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)
                .map_err(|e| ArtError::candidate_invalid(format!("failed to re-encode: {}", e)))?;
            Ok((out, "jpg"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_jpeg_passes_through() {
        let jpeg = fixtures::jpeg_bytes([200, 10, 10]);
        let (out, ext) = normalize_image(jpeg.clone()).unwrap();
        assert_eq!(ext, "jpg");
        assert_eq!(out, jpeg);
    }

    #[test]
    fn test_png_passes_through() {
        let png = fixtures::png_bytes([0, 0, 255]);
        let (out, ext) = normalize_image(png.clone()).unwrap();
        assert_eq!(ext, "png");
        assert_eq!(out, png);
    }

    #[test]
    fn test_webp_is_reencoded_to_jpeg() {
        let webp = fixtures::webp_bytes([0, 255, 0]);
        let (out, ext) = normalize_image(webp).unwrap();
        assert_eq!(ext, "jpg");
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_garbage_is_rejected() {
        let err = normalize_image(b"<html>nope</html>".to_vec()).unwrap_err();
        assert!(matches!(err, ArtError::CandidateInvalid { .. }));
    }
}
