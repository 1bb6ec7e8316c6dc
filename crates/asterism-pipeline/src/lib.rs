//! asterism-pipeline: Pure stroke extraction and simplification (sans-IO).
//!
//! Turns a raster figure into a single normalized stroke through:
//! luminance -> threshold -> capped sampling -> greedy path ->
//! unit-square normalization -> downsampling -> rounding.
//!
//! Independently, stored stroke data can be flattened and re-simplified
//! to a fixed point budget (see [`simplify`]).
//!
//! This crate has **no filesystem dependencies** -- it operates on
//! in-memory byte slices and JSON values. All filesystem interaction
//! lives in `asterism-io`.

pub mod downsample;
pub mod extract;
pub mod grayscale;
pub mod normalize;
pub mod path;
pub mod payload;
pub mod simplify;
pub mod types;

pub use downsample::{DownsampleStrategy, Downsampler};
pub use extract::SamplingStrategy;
pub use payload::StrokePayload;
pub use simplify::{SimplifyOutcome, simplify_entry, simplify_points};
pub use types::{
    Dimensions, ExtractConfig, ExtractResult, ExtractStats, PipelineError, Point, Polyline,
    SimplifyConfig,
};

/// Extract a single stroke from raw image bytes.
///
/// Takes raw image bytes (PNG, JPEG, BMP, WebP) and a configuration and
/// produces an [`ExtractResult`] with the stroke in unit-square
/// coordinates, the source dimensions, and per-stage counts.
///
/// # Pipeline steps
///
/// 1. Decode image and convert to luminance
/// 2. Threshold into foreground pixels
/// 3. Cap the pixel count (configurable sampling)
/// 4. Greedy nearest-neighbor path from the centroid
/// 5. Normalize to `[0, 1] x [0, 1]`
/// 6. Downsample to `max_points`
/// 7. Round to `precision` decimals
///
/// An image with no foreground yields an empty stroke, not an error.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if `config` fails validation.
/// Returns [`PipelineError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image cannot be decoded.
pub fn extract_strokes(
    image_bytes: &[u8],
    config: &ExtractConfig,
) -> Result<ExtractResult, PipelineError> {
    config.validate()?;

    // 1. Decode and convert to luminance.
    let gray = grayscale::decode_luminance(image_bytes)?;
    let dimensions = Dimensions {
        width: gray.width(),
        height: gray.height(),
    };

    // 2-3. Threshold and cap.
    let (foreground, pixels) =
        extract::extract_points(&gray, config.threshold, config.max_pixels, config.sampling);
    let mut stats = ExtractStats {
        foreground,
        sampled: pixels.len(),
        ..ExtractStats::default()
    };
    if pixels.is_empty() {
        return Ok(ExtractResult {
            stroke: Polyline::default(),
            dimensions,
            stats,
        });
    }

    // 4. Greedy path.
    let path = path::greedy_path(&pixels);
    stats.path_len = path.len();

    // 5. Normalize.
    let normalized = normalize::normalize_path(path, dimensions);

    // 6-7. Downsample and round.
    let stroke = config
        .downsample
        .downsample(normalized.points(), config.max_points)
        .rounded(config.precision);
    stats.stroke_len = stroke.len();

    Ok(ExtractResult {
        stroke,
        dimensions,
        stats,
    })
}
