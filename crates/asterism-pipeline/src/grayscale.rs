//! Image decoding and luminance conversion.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP) and produces a
//! single-channel luminance field for thresholding.
//!
//! This is the first step in the pipeline: raw bytes in, `GrayImage` out.

use image::{GrayImage, Luma};

use crate::types::PipelineError;

/// Decode raw image bytes and convert to 8-bit luminance.
///
/// Uses the ITU-R 601-2 luma transform `L = 0.299 R + 0.587 G + 0.114 B`
/// in 16-bit fixed point, rounding to nearest. Alpha is ignored, so a
/// transparent white pixel counts as white.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode_luminance(bytes: &[u8]) -> Result<GrayImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let rgb = image::load_from_memory(bytes)?.to_rgb8();
    let gray = GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        Luma([luma(r, g, b)])
    });
    Ok(gray)
}

/// 601-2 luma in fixed point: weights sum to `1 << 16`.
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let l = 19_595 * u32::from(r) + 38_470 * u32::from(g) + 7_471 * u32::from(b) + 0x8000;
    #[allow(clippy::cast_possible_truncation)]
    let value = (l >> 16) as u8;
    value
}
