//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations every backend must
//! support: decode untrusted bytes, and render a thumbnail from a decoded
//! image. Decoding happens once per payload; the result feeds both dimension
//! resolution and thumbnail generation.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust and built on
//! the `image` crate.

use super::params::ThumbnailParams;
use image::DynamicImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("unsupported format or corrupted data: {0}")]
    Decode(String),
    #[error("encoding failed: {0}")]
    Encode(String),
}

/// Pixel dimensions of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

/// A successfully decoded raster image.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    image: DynamicImage,
}

impl DecodedImage {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn size(&self) -> PixelSize {
        PixelSize {
            width: self.image.width(),
            height: self.image.height(),
        }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

/// Trait for image processing backends.
///
/// Implementations must be `Sync` so a single backend can serve the rayon
/// workers that process one batch in parallel.
pub trait ImageBackend: Sync {
    /// Decode raw bytes into a raster image.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, BackendError>;

    /// Scale, flatten and encode a thumbnail.
    fn thumbnail(
        &self,
        image: &DecodedImage,
        params: &ThumbnailParams,
    ) -> Result<Vec<u8>, BackendError>;
}
