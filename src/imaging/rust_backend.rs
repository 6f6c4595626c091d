//! Pure Rust image processing backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP, GIF, BMP) | `image::ImageReader` with format sniffing, EOI check for JPEG |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Alpha flattening | composited over opaque white |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//!
//! Input bytes are untrusted. Format detection looks at the magic bytes only
//! (there is no filename to go by), and the reader's default allocation
//! limits stay in place so a hostile header cannot request gigabytes.

use super::backend::{BackendError, DecodedImage, ImageBackend};
use super::params::ThumbnailParams;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, ImageReader, RgbImage};
use std::io::Cursor;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Composite any alpha channel over opaque white and drop it.
fn flatten_onto_white(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }
    let rgba = img.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let a = a as u32;
        let blend = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}

/// A complete JPEG stream ends with the EOI marker, ignoring trailing zero
/// padding. The decoder fills missing scan data with grey instead of failing.
fn jpeg_is_complete(bytes: &[u8]) -> bool {
    let end = bytes.iter().rposition(|&b| b != 0x00).map_or(0, |i| i + 1);
    bytes[..end].ends_with(&[0xFF, 0xD9])
}

/// Encode an RGB buffer as baseline JPEG.
fn encode_jpeg(img: &RgbImage, quality: u32) -> Result<Vec<u8>, BackendError> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality as u8)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| BackendError::Encode(format!("JPEG encode failed: {e}")))?;
    Ok(out)
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, BackendError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        match reader.format() {
            None => return Err(BackendError::Decode("unrecognized image format".into())),
            Some(ImageFormat::Jpeg) if !jpeg_is_complete(bytes) => {
                return Err(BackendError::Decode("truncated JPEG data".into()));
            }
            Some(_) => {}
        }
        let image = reader
            .decode()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(DecodedImage::new(image))
    }

    fn thumbnail(
        &self,
        image: &DecodedImage,
        params: &ThumbnailParams,
    ) -> Result<Vec<u8>, BackendError> {
        let resized = image
            .image()
            .resize_exact(params.width, params.height, FilterType::Lanczos3);
        let flattened = flatten_onto_white(&resized);
        encode_jpeg(&flattened, params.quality.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Quality;
    use crate::test_helpers::{jpeg_bytes, png_rgba_bytes};

    fn params(width: u32, height: u32) -> ThumbnailParams {
        ThumbnailParams {
            width,
            height,
            quality: Quality::default(),
        }
    }

    #[test]
    fn decode_synthetic_jpeg() {
        let backend = RustBackend::new();
        let decoded = backend.decode(&jpeg_bytes(200, 150)).unwrap();
        assert_eq!(decoded.size().width, 200);
        assert_eq!(decoded.size().height, 150);
    }

    #[test]
    fn decode_synthetic_png() {
        let backend = RustBackend::new();
        let decoded = backend.decode(&png_rgba_bytes(64, 32, 0)).unwrap();
        assert_eq!(decoded.size().width, 64);
        assert_eq!(decoded.size().height, 32);
    }

    #[test]
    fn decode_garbage_errors() {
        let backend = RustBackend::new();
        let result = backend.decode(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn decode_truncated_jpeg_errors() {
        let backend = RustBackend::new();
        // SOI and part of the JFIF header, no frame
        let bytes = jpeg_bytes(120, 80);
        let result = backend.decode(&bytes[..20]);
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn decode_jpeg_cut_mid_scan_errors() {
        let backend = RustBackend::new();
        let bytes = jpeg_bytes(200, 150);

        for cut in [bytes.len() / 2, bytes.len() * 2 / 3, bytes.len() * 3 / 4] {
            let result = backend.decode(&bytes[..cut]);
            assert!(
                matches!(&result, Err(BackendError::Decode(msg)) if msg.contains("truncated")),
                "cut at {cut} of {} bytes decoded",
                bytes.len()
            );
        }
    }

    #[test]
    fn decode_jpeg_with_zero_padding_is_accepted() {
        let backend = RustBackend::new();
        let mut bytes = jpeg_bytes(64, 48);
        bytes.extend_from_slice(&[0, 0, 0, 0]);

        let decoded = backend.decode(&bytes).unwrap();
        assert_eq!(decoded.size().width, 64);
    }

    #[test]
    fn jpeg_completeness_checks_eoi_marker() {
        assert!(jpeg_is_complete(&[0xFF, 0xD8, 0x00, 0xFF, 0xD9]));
        assert!(jpeg_is_complete(&[0xFF, 0xD8, 0xFF, 0xD9, 0x00, 0x00]));
        assert!(!jpeg_is_complete(&[0xFF, 0xD8, 0x12, 0x34]));
        assert!(!jpeg_is_complete(&[0x00, 0x00]));
    }

    #[test]
    fn thumbnail_is_jpeg_with_requested_size() {
        let backend = RustBackend::new();
        let decoded = backend.decode(&jpeg_bytes(600, 400)).unwrap();

        let thumb = backend.thumbnail(&decoded, &params(150, 100)).unwrap();
        assert!(thumb.starts_with(&[0xFF, 0xD8]));

        let reread = image::load_from_memory(&thumb).unwrap();
        assert_eq!((reread.width(), reread.height()), (150, 100));
    }

    #[test]
    fn thumbnail_flattens_transparency_onto_white() {
        let backend = RustBackend::new();
        // Fully transparent black should come out white, not black
        let decoded = backend.decode(&png_rgba_bytes(40, 40, 0)).unwrap();

        let thumb = backend.thumbnail(&decoded, &params(20, 20)).unwrap();
        let reread = image::load_from_memory(&thumb).unwrap();
        assert!(!reread.color().has_alpha());

        let pixel = reread.to_rgb8().get_pixel(10, 10).0;
        assert!(pixel.iter().all(|&c| c > 240), "expected white, got {pixel:?}");
    }

    #[test]
    fn flatten_keeps_opaque_pixels() {
        let img = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            2,
            2,
            image::Rgba([10, 20, 30, 255]),
        ));
        let flat = flatten_onto_white(&img);
        assert_eq!(flat.get_pixel(0, 0).0, [10, 20, 30]);
    }

    #[test]
    fn thumbnail_same_input_same_dimensions() {
        let backend = RustBackend::new();
        let decoded = backend.decode(&jpeg_bytes(300, 200)).unwrap();

        let a = backend.thumbnail(&decoded, &params(150, 100)).unwrap();
        let b = backend.thumbnail(&decoded, &params(150, 100)).unwrap();
        let a = image::load_from_memory(&a).unwrap();
        let b = image::load_from_memory(&b).unwrap();
        assert_eq!((a.width(), a.height()), (b.width(), b.height()));
    }
}
