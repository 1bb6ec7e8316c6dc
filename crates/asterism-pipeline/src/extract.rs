//! Foreground pixel extraction: threshold a luminance field and collect
//! the coordinates of bright pixels.
//!
//! Constellation figures are drawn as light lines on a dark card, so the
//! figure is whatever meets the brightness threshold. Because the path
//! builder downstream is quadratic in the number of points, the pixel
//! set is capped; [`SamplingStrategy`] selects how.

use image::GrayImage;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Selects how an over-large foreground set is reduced to the cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingStrategy {
    /// Uniform random sample without replacement.
    ///
    /// With a seed the draw is reproducible; without one it uses fresh
    /// entropy per image.
    Random {
        /// Seed for the sampling generator.
        seed: Option<u64>,
    },

    /// Deterministic evenly spaced selection in raster order.
    Stride,

    /// Keep every foreground pixel regardless of the cap.
    Disabled,
}

impl Default for SamplingStrategy {
    fn default() -> Self {
        Self::Random { seed: None }
    }
}

/// Collect the coordinates of every pixel with luminance `>= threshold`.
///
/// Points are produced in raster order (row by row, left to right) with
/// integer coordinates `(x, y)`.
#[must_use]
pub fn foreground_pixels(gray: &GrayImage, threshold: u8) -> Vec<Point> {
    gray.enumerate_pixels()
        .filter(|(_, _, px)| px.0[0] >= threshold)
        .map(|(x, y, _)| Point::new(f64::from(x), f64::from(y)))
        .collect()
}

/// Reduce `points` to at most `cap` entries using `strategy`.
///
/// Returns the input unchanged when it already fits. The kept points are
/// distinct input elements and stay in their original relative order.
#[must_use]
pub fn sample(points: Vec<Point>, cap: usize, strategy: SamplingStrategy) -> Vec<Point> {
    if points.len() <= cap {
        return points;
    }

    let indices = match strategy {
        SamplingStrategy::Disabled => return points,
        SamplingStrategy::Stride => stride_indices(points.len(), cap),
        SamplingStrategy::Random { seed } => {
            let mut rng = seed.map_or_else(
                || StdRng::from_rng(&mut rand::rng()),
                StdRng::seed_from_u64,
            );
            let mut indices = rand::seq::index::sample(&mut rng, points.len(), cap).into_vec();
            indices.sort_unstable();
            indices
        }
    };

    indices.into_iter().map(|i| points[i]).collect()
}

/// `floor(i * len / cap)` for `i` in `0..cap`; strictly increasing when
/// `len > cap`.
fn stride_indices(len: usize, cap: usize) -> Vec<usize> {
    (0..cap).map(|i| i * len / cap).collect()
}

/// Threshold `gray` and cap the result.
///
/// Returns `(foreground_count, kept_points)`.
#[must_use]
pub fn extract_points(
    gray: &GrayImage,
    threshold: u8,
    cap: usize,
    strategy: SamplingStrategy,
) -> (usize, Vec<Point>) {
    let foreground = foreground_pixels(gray, threshold);
    let count = foreground.len();
    (count, sample(foreground, cap, strategy))
}
