//! Dimension resolution: caller-supplied values win, the decoded image fills
//! the gaps.
//!
//! Each field is resolved on its own:
//!
//! | Field | Caller supplied | Otherwise |
//! |---|---|---|
//! | width | kept | decoded pixel width |
//! | height | kept | decoded pixel height |
//! | aspect ratio | kept | `width / height` of the resolved values |
//!
//! Caller values are not cross-checked against each other or against the
//! decoded image: a caller may claim 100×50 at ratio 3.0 and it is stored as
//! given.

use crate::imaging::{PixelSize, aspect_ratio};
use crate::types::Dimensions;

/// Resolve the dimensions to store for one image.
pub fn resolve_dimensions(supplied: &Dimensions, decoded: PixelSize) -> Dimensions {
    let width = supplied.width.or(Some(decoded.width));
    let height = supplied.height.or(Some(decoded.height));
    let aspect = match (supplied.aspect_ratio, width, height) {
        (Some(ratio), _, _) => Some(ratio),
        (None, Some(w), Some(h)) if h > 0 => Some(aspect_ratio(w, h)),
        _ => None,
    };

    Dimensions {
        width,
        height,
        aspect_ratio: aspect,
    }
}
