//! Shared test utilities for the image-ingest test suite.
//!
//! Synthesizes real image payloads in memory (no fixture files) and builds
//! ingestion requests with a minimum of noise.
//!
//! # Usage
//!
//! ```text
//! use crate::test_helpers::*;
//!
//! let files = vec![jpeg_bytes(100, 50)];
//! let request = request("test-album", &["test-image.jpg"]);
//! service.create_image_set(&request, &files).unwrap();
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};

use crate::types::{CreateImageSetRequest, Dimensions, ImageRequest};

// =========================================================================
// Payloads
// =========================================================================

/// A `width`×`height` JPEG with a diagonal gradient, so it is not trivially
/// compressible.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, 90)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    out
}

/// A `width`×`height` PNG of black pixels with the given alpha.
pub fn png_rgba_bytes(width: u32, height: u32, alpha: u8) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, alpha]));
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
        .unwrap();
    out
}

// =========================================================================
// Requests
// =========================================================================

/// A request naming each image, with no caller-supplied dimensions.
pub fn request(set_name: &str, image_names: &[&str]) -> CreateImageSetRequest {
    CreateImageSetRequest {
        image_set_name: set_name.to_string(),
        images: image_names
            .iter()
            .map(|name| ImageRequest {
                img_name: name.to_string(),
                dimensions: None,
            })
            .collect(),
    }
}

/// A single-image request carrying caller-supplied dimensions.
pub fn request_with_dims(
    set_name: &str,
    image_name: &str,
    dimensions: Dimensions,
) -> CreateImageSetRequest {
    CreateImageSetRequest {
        image_set_name: set_name.to_string(),
        images: vec![ImageRequest {
            img_name: image_name.to_string(),
            dimensions: Some(dimensions),
        }],
    }
}
