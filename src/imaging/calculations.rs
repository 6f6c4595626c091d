//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate thumbnail dimensions for a fixed maximum width.
///
/// The width is capped at `max_width` but never upscaled past the original;
/// the height follows the original aspect ratio, rounded to the nearest pixel
/// and never below one.
///
/// # Arguments
/// * `original` - Source image dimensions (width, height)
/// * `max_width` - Largest allowed thumbnail width in pixels
///
/// # Returns
/// * `(width, height)` - Final thumbnail dimensions
///
/// # Examples
/// ```
/// # use image_ingest::imaging::calculate_thumbnail_dimensions;
/// // 600x400 landscape capped at 150 wide → 150x100
/// assert_eq!(calculate_thumbnail_dimensions((600, 400), 150), (150, 100));
///
/// // 100x50 is already narrower than the cap → unchanged
/// assert_eq!(calculate_thumbnail_dimensions((100, 50), 150), (100, 50));
/// ```
pub fn calculate_thumbnail_dimensions(original: (u32, u32), max_width: u32) -> (u32, u32) {
    let (orig_w, orig_h) = original;
    let w = max_width.min(orig_w).max(1);
    let h = (w as f64 / orig_w as f64 * orig_h as f64).round() as u32;
    (w, h.max(1))
}

/// Aspect ratio (width / height) of a pixel size.
pub fn aspect_ratio(width: u32, height: u32) -> f64 {
    width as f64 / height as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_landscape_is_capped() {
        assert_eq!(calculate_thumbnail_dimensions((600, 400), 150), (150, 100));
    }

    #[test]
    fn thumbnail_portrait_is_capped() {
        // 300x900 → 150 wide, 450 high
        assert_eq!(calculate_thumbnail_dimensions((300, 900), 150), (150, 450));
    }

    #[test]
    fn thumbnail_never_upscales() {
        assert_eq!(calculate_thumbnail_dimensions((100, 50), 150), (100, 50));
        assert_eq!(calculate_thumbnail_dimensions((150, 75), 150), (150, 75));
    }

    #[test]
    fn thumbnail_height_rounds_to_nearest() {
        // 1000x667 → 150 * 0.667 = 100.05 → 100
        assert_eq!(calculate_thumbnail_dimensions((1000, 667), 150), (150, 100));
        // 1000x670 → 100.5 → 101
        assert_eq!(calculate_thumbnail_dimensions((1000, 670), 150), (150, 101));
    }

    #[test]
    fn thumbnail_extreme_panorama_keeps_one_row() {
        assert_eq!(calculate_thumbnail_dimensions((4000, 2), 150), (150, 1));
    }

    #[test]
    fn thumbnail_is_deterministic() {
        let a = calculate_thumbnail_dimensions((1234, 987), 150);
        let b = calculate_thumbnail_dimensions((1234, 987), 150);
        assert_eq!(a, b);
    }

    #[test]
    fn aspect_ratio_is_width_over_height() {
        assert_eq!(aspect_ratio(100, 50), 2.0);
        assert!((aspect_ratio(4, 3) - 1.333_333).abs() < 1e-5);
    }
}
