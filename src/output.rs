//! CLI output formatting for image sets.
//!
//! # Information-First Display
//!
//! Every set leads with its identity and name; each image follows with its
//! 1-based position and name, and details (dimensions, thumbnail size, ids)
//! are indented context lines beneath it.
//!
//! # Output Format
//!
//! ## Full view
//!
//! ```text
//! Image set 42: test-album (2 images)
//!     Created: 2024-06-01T08:00:00+00:00
//!     001 test-image.jpg
//!         Id: 70
//!         Dimensions: 100x50 (2.00)
//!         Thumbnail: 1834 bytes
//!     002 scan.png
//!         Id: 71
//!         Dimensions: unknown
//!         Thumbnail: 902 bytes
//! ```
//!
//! ## Metadata view
//!
//! Identical, minus the `Thumbnail:` lines.
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::types::{Dimensions, ImageId, SetId};
use crate::view::{ImageSetMetadataView, ImageSetView};
use chrono::{DateTime, Utc};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Set header: identity, name and image count.
///
/// ```text
/// Image set 42: test-album (2 images)
/// Image set 7: solo (1 image)
/// ```
fn set_header(id: SetId, name: &str, count: usize) -> String {
    let noun = if count == 1 { "image" } else { "images" };
    format!("Image set {}: {} ({} {})", id, name, count, noun)
}

/// Render dimensions with `?` for any absent side.
fn dimensions_text(dimensions: Option<&Dimensions>) -> String {
    let Some(dims) = dimensions else {
        return "unknown".to_string();
    };
    let side = |v: Option<u32>| v.map_or_else(|| "?".to_string(), |v| v.to_string());
    let mut text = format!("{}x{}", side(dims.width), side(dims.height));
    if let Some(ratio) = dims.aspect_ratio {
        text.push_str(&format!(" ({:.2})", ratio));
    }
    text
}

struct ImageEntry<'a> {
    id: ImageId,
    name: &'a str,
    dimensions: Option<&'a Dimensions>,
    thumbnail_len: Option<usize>,
}

fn set_lines<'a>(
    id: SetId,
    name: &str,
    created_at: DateTime<Utc>,
    images: impl ExactSizeIterator<Item = ImageEntry<'a>>,
) -> Vec<String> {
    let mut lines = vec![set_header(id, name, images.len())];
    lines.push(format!("{}Created: {}", indent(1), created_at.to_rfc3339()));

    for (pos, image) in images.enumerate() {
        lines.push(format!("{}{} {}", indent(1), format_index(pos + 1), image.name));
        lines.push(format!("{}Id: {}", indent(2), image.id));
        lines.push(format!(
            "{}Dimensions: {}",
            indent(2),
            dimensions_text(image.dimensions)
        ));
        if let Some(len) = image.thumbnail_len {
            lines.push(format!("{}Thumbnail: {} bytes", indent(2), len));
        }
    }
    lines
}

// ============================================================================
// Views
// ============================================================================

/// Format a full view, thumbnails summarized by size.
pub fn format_image_set(view: &ImageSetView) -> Vec<String> {
    set_lines(
        view.image_set_id,
        &view.image_set_name,
        view.created_at,
        view.images.iter().map(|image| ImageEntry {
            id: image.img_id,
            name: &image.img_name,
            dimensions: image.dimensions.as_ref(),
            thumbnail_len: Some(image.thumbnail.as_ref().map_or(0, Vec::len)),
        }),
    )
}

/// Print a full view to stdout.
pub fn print_image_set(view: &ImageSetView) {
    for line in format_image_set(view) {
        println!("{}", line);
    }
}

/// Format a metadata view.
pub fn format_metadata(view: &ImageSetMetadataView) -> Vec<String> {
    set_lines(
        view.image_set_id,
        &view.image_set_name,
        view.created_at,
        view.images.iter().map(|image| ImageEntry {
            id: image.img_id,
            name: &image.img_name,
            dimensions: image.dimensions.as_ref(),
            thumbnail_len: None,
        }),
    )
}

/// Print a metadata view to stdout.
pub fn print_metadata(view: &ImageSetMetadataView) {
    for line in format_metadata(view) {
        println!("{}", line);
    }
}
