//! Shared types for the asterism stroke pipeline.

use serde::{Deserialize, Serialize};

use crate::downsample::DownsampleStrategy;
use crate::extract::SamplingStrategy;

/// A 2D point.
///
/// Depending on the pipeline stage this is either a pixel coordinate
/// (non-negative integers stored as `f64`) or a normalized coordinate in
/// the unit square. Serializes as a two-element `[x, y]` array, which is
/// the on-disk shape of a stroke point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    /// Horizontal position (pixels from left edge, or fraction of width).
    pub x: f64,
    /// Vertical position (pixels from top edge, or fraction of height).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes. Both squares are
    /// rounded the same way, so mirrored offsets give equal distances.
    #[must_use]
    #[allow(clippy::suboptimal_flops)]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Round both coordinates to `precision` decimal places.
    #[must_use]
    pub fn rounded(self, precision: u32) -> Self {
        Self::new(round_to(self.x, precision), round_to(self.y, precision))
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// Round `value` to `precision` decimal places.
///
/// Rounds the exact binary value of `value`, so `0.0005` (stored slightly
/// above the tie) becomes `0.001`. Exact ties go to even.
#[must_use]
pub fn round_to(value: f64, precision: u32) -> f64 {
    let digits = precision as usize;
    format!("{value:.digits$}").parse().unwrap_or(value)
}

/// An ordered sequence of points: one stroke.
///
/// Order encodes the drawing direction a renderer follows. Serializes as
/// a list of `[x, y]` pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline(Vec<Point>);

impl Polyline {
    /// Create a new polyline from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the polyline has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the polyline.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first point, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.0.first()
    }

    /// Returns the last point, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.0.last()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Consumes the polyline and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }

    /// Round every coordinate to `precision` decimal places.
    #[must_use]
    pub fn rounded(self, precision: u32) -> Self {
        Self(self.0.into_iter().map(|p| p.rounded(precision)).collect())
    }
}

impl FromIterator<Point> for Polyline {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Highest decimal precision accepted for persisted coordinates.
///
/// Beyond this `f64` carries no further decimal digits.
pub const MAX_PRECISION: u32 = 15;

/// Configuration for extracting a stroke from a raster image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Luminance threshold on a 0-255 scale. Pixels at or above it are
    /// foreground.
    pub threshold: u8,

    /// Maximum number of foreground pixels handed to the path builder.
    /// Bounds the quadratic cost of path construction.
    pub max_pixels: usize,

    /// How the pixel cap is enforced.
    pub sampling: SamplingStrategy,

    /// Maximum number of points in the extracted stroke.
    pub max_points: usize,

    /// Which index formula reduces the path to `max_points`.
    pub downsample: DownsampleStrategy,

    /// Decimal places kept in persisted coordinates.
    pub precision: u32,
}

impl ExtractConfig {
    pub const DEFAULT_THRESHOLD: u8 = 200;
    pub const DEFAULT_MAX_PIXELS: usize = 2500;
    pub const DEFAULT_MAX_POINTS: usize = 200;
    pub const DEFAULT_PRECISION: u32 = 3;

    /// Check the configuration for values the pipeline cannot honor.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] when `max_points` or
    /// `max_pixels` is zero, or `precision` exceeds [`MAX_PRECISION`].
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.max_points == 0 {
            return Err(PipelineError::InvalidConfig(
                "max_points must be at least 1".to_owned(),
            ));
        }
        if self.max_pixels == 0 {
            return Err(PipelineError::InvalidConfig(
                "max_pixels must be at least 1".to_owned(),
            ));
        }
        validate_precision(self.precision)
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
            max_pixels: Self::DEFAULT_MAX_PIXELS,
            sampling: SamplingStrategy::default(),
            max_points: Self::DEFAULT_MAX_POINTS,
            downsample: DownsampleStrategy::default(),
            precision: Self::DEFAULT_PRECISION,
        }
    }
}

/// Configuration for re-simplifying stored stroke data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifyConfig {
    /// Exact number of points kept when the input is longer.
    pub target_points: usize,

    /// Decimal places kept in persisted coordinates.
    pub precision: u32,
}

impl SimplifyConfig {
    pub const DEFAULT_TARGET_POINTS: usize = 20;
    pub const DEFAULT_PRECISION: u32 = 3;

    /// Check the configuration for values the simplifier cannot honor.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] when `target_points` is
    /// zero or `precision` exceeds [`MAX_PRECISION`].
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.target_points == 0 {
            return Err(PipelineError::InvalidConfig(
                "target_points must be at least 1".to_owned(),
            ));
        }
        validate_precision(self.precision)
    }
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self {
            target_points: Self::DEFAULT_TARGET_POINTS,
            precision: Self::DEFAULT_PRECISION,
        }
    }
}

fn validate_precision(precision: u32) -> Result<(), PipelineError> {
    if precision > MAX_PRECISION {
        return Err(PipelineError::InvalidConfig(format!(
            "precision must be at most {MAX_PRECISION}, got {precision}"
        )));
    }
    Ok(())
}

/// Per-stage counts collected while extracting one stroke.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractStats {
    /// Pixels at or above the threshold.
    pub foreground: usize,
    /// Pixels kept after enforcing the sampling cap.
    pub sampled: usize,
    /// Length of the greedy path (equals `sampled`).
    pub path_len: usize,
    /// Points in the final stroke.
    pub stroke_len: usize,
}

/// Result of extracting a stroke from one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractResult {
    /// The normalized, downsampled, rounded stroke. Empty when no pixel
    /// passed the threshold.
    pub stroke: Polyline,

    /// Dimensions of the source image in pixels.
    pub dimensions: Dimensions,

    /// Counts from each stage.
    pub stats: ExtractStats,
}

/// Errors that can occur during pipeline processing.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Pipeline configuration is invalid.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),
}
