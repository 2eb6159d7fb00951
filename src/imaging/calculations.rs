//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Whether an image must be scaled down to fit `max_edge`.
///
/// True iff the longest edge is strictly larger than `max_edge`. An image
/// whose longest edge already equals `max_edge` is left alone, which makes
/// repeated runs over the same files a no-op.
pub fn should_resize(width: u32, height: u32, max_edge: u32) -> bool {
    width.max(height) > max_edge
}

/// Calculate output dimensions that fit `max_edge` on the longest side.
///
/// Returns `(width, height)` unchanged when no resize is needed. Otherwise the
/// longest edge becomes exactly `max_edge` and the other edge is scaled by the
/// same factor, rounded half away from zero and floored at 1 pixel.
///
/// # Examples
/// ```
/// # use qq_resize::imaging::compute_target_size;
/// // 800x600 landscape → 542 on the long edge, 600 * 542 / 800 = 406.5 → 407
/// assert_eq!(compute_target_size(800, 600, 542), (542, 407));
///
/// // Already small enough
/// assert_eq!(compute_target_size(400, 300, 542), (400, 300));
/// ```
pub fn compute_target_size(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if !should_resize(width, height, max_edge) {
        return (width, height);
    }

    let longer_edge = width.max(height);
    let scale = max_edge as f64 / longer_edge as f64;
    let scaled = |edge: u32| ((edge as f64 * scale).round() as u32).max(1);

    if width >= height {
        // Landscape or square
        (max_edge, scaled(height))
    } else {
        // Portrait
        (scaled(width), max_edge)
    }
}
