//! Pixel-to-unit-square coordinate transform.
//!
//! ```text
//! norm_x = pixel_x / width
//! norm_y = pixel_y / height
//! ```
//!
//! Pixel coordinates lie in `0..width` and `0..height`, so every
//! normalized coordinate lies in `[0, 1]`. The Y axis keeps image
//! orientation (+Y down); renderers consume the stroke in that space.

use crate::types::{Dimensions, Point, Polyline};

/// Rescale a pixel-space path into the unit square.
///
/// `dimensions` must be non-zero in both axes; a decoded image always is.
#[must_use]
pub fn normalize_path(path: Polyline, dimensions: Dimensions) -> Polyline {
    let w = f64::from(dimensions.width);
    let h = f64::from(dimensions.height);
    path.into_points()
        .into_iter()
        .map(|p| Point::new(p.x / w, p.y / h))
        .collect()
}
