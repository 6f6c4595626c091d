//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (magic-byte sniffing) |
//! | **Thumbnail** | `resize_exact` (Lanczos3) + alpha flatten + JPEG |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, DecodedImage, ImageBackend, PixelSize};
pub use calculations::{aspect_ratio, calculate_thumbnail_dimensions};
pub use operations::{
    DEFAULT_THUMBNAIL_WIDTH, ThumbnailConfig, create_thumbnail, plan_thumbnail, render_thumbnail,
};
pub use params::{Quality, ThumbnailParams};
pub use rust_backend::RustBackend;
