//! Pure calculation functions for image dimensions and orientation.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the size of an image shrunk to fit inside a bounding box.
///
/// Aspect ratio is preserved and images are never enlarged: a source that
/// already fits is returned unchanged. Neither output edge drops below 1px,
/// and a zero bound is treated as 1px.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `bounds` - Maximum allowed (width, height)
///
/// # Examples
/// ```
/// # use dir_gallery::imaging::fit_within;
/// // 4000x3000 into 1920x1200 → height is the limiting edge
/// assert_eq!(fit_within((4000, 3000), (1920, 1200)), (1600, 1200));
///
/// // Already small enough → untouched
/// assert_eq!(fit_within((300, 200), (400, 250)), (300, 200));
/// ```
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = (bounds.0.max(1), bounds.1.max(1));

    if src_w == 0 || src_h == 0 || (src_w <= max_w && src_h <= max_h) {
        return source;
    }

    let scale = f64::min(max_w as f64 / src_w as f64, max_h as f64 / src_h as f64);
    let w = ((src_w as f64 * scale).round() as u32).clamp(1, max_w);
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, max_h);
    (w, h)
}

/// Clockwise rotation needed to display an image upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    /// Map an EXIF `Orientation` value to the rotation that undoes it.
    ///
    /// Only the pure rotations are honoured (3, 6, 8). Mirrored orientations
    /// (2, 4, 5, 7) and unknown values are left alone.
    pub fn from_exif(orientation: u32) -> Self {
        match orientation {
            3 => Rotation::Cw180,
            6 => Rotation::Cw90,
            8 => Rotation::Cw270,
            _ => Rotation::None,
        }
    }
}
