//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, DecodedImage, ImageBackend};
use super::calculations::calculate_thumbnail_dimensions;
use super::params::{Quality, ThumbnailParams};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Thumbnail width used when nothing else is configured.
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 150;

/// Configuration for thumbnail generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailConfig {
    pub max_width: u32,
    pub quality: Quality,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_THUMBNAIL_WIDTH,
            quality: Quality::default(),
        }
    }
}

/// Plan a thumbnail operation for a decoded image without executing it.
///
/// Useful for testing parameter generation.
pub fn plan_thumbnail(image: &DecodedImage, config: &ThumbnailConfig) -> ThumbnailParams {
    let size = image.size();
    let (width, height) =
        calculate_thumbnail_dimensions((size.width, size.height), config.max_width);

    ThumbnailParams {
        width,
        height,
        quality: config.quality,
    }
}

/// Render a thumbnail from an already decoded image.
pub fn render_thumbnail(
    backend: &impl ImageBackend,
    image: &DecodedImage,
    config: &ThumbnailConfig,
) -> Result<Vec<u8>> {
    let params = plan_thumbnail(image, config);
    backend.thumbnail(image, &params)
}

/// Decode raw bytes and produce a compressed thumbnail no wider than
/// `config.max_width` (and never wider than the source).
pub fn create_thumbnail(
    backend: &impl ImageBackend,
    bytes: &[u8],
    config: &ThumbnailConfig,
) -> Result<Vec<u8>> {
    let image = backend.decode(bytes)?;
    render_thumbnail(backend, &image, config)
}
