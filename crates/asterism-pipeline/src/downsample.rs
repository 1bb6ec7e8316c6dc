//! Path downsampling: reduce a stroke to a point budget by evenly spaced
//! index selection.
//!
//! Two index formulas are available through [`DownsampleStrategy`]:
//!
//! - [`Stride`](DownsampleStrategy::Stride): `floor(i * L / N)`. Starts
//!   at the first point but generally stops short of the last one.
//! - [`Endpoints`](DownsampleStrategy::Endpoints):
//!   `round(i * (L - 1) / (N - 1))`. Always keeps both the first and the
//!   last point and returns exactly `min(L, N)` points.
//!
//! Both keep the input's relative order and never return more than `N`
//! points. Inputs already within budget are returned unchanged.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Point, Polyline};

/// Selects which index formula reduces a path to its point budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownsampleStrategy {
    /// `floor(i * L / N)` for `i` in `0..N`, clamped to the last index and
    /// deduplicated. Used at extraction time unless overridden.
    #[default]
    Stride,

    /// `round(i * (L - 1) / (N - 1))` for `i` in `0..N`, ties to even.
    Endpoints,
}

impl fmt::Display for DownsampleStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stride => f.write_str("stride"),
            Self::Endpoints => f.write_str("endpoints"),
        }
    }
}

/// Trait for downsampling strategies.
///
/// Input: an ordered path and a maximum point count.
/// Output: an order-preserving subsequence of at most `max_points` points.
pub trait Downsampler {
    /// Reduce `path` to at most `max_points` points.
    fn downsample(&self, path: &[Point], max_points: usize) -> Polyline;
}

impl Downsampler for DownsampleStrategy {
    fn downsample(&self, path: &[Point], max_points: usize) -> Polyline {
        match *self {
            Self::Stride => downsample_stride(path, max_points),
            Self::Endpoints => downsample_endpoints(path, max_points),
        }
    }
}

/// Keep points at `floor(i * L / N)`.
///
/// Out-of-range indices are clamped to the last point and repeated
/// indices are dropped, so the result may be shorter than `max_points`.
#[must_use]
pub fn downsample_stride(path: &[Point], max_points: usize) -> Polyline {
    let n = path.len();
    if n <= max_points {
        return Polyline::new(path.to_vec());
    }

    let indices = (0..max_points).map(|i| (i * n / max_points).min(n - 1));
    pick_unique(path, indices)
}

/// Keep points at `round(i * (L - 1) / (N - 1))`.
///
/// Index 0 maps to the first point and index `N - 1` to the last, and
/// the indices are strictly increasing when `L > N`, so the result has
/// exactly `N` points. A budget of one keeps only the first point.
#[must_use]
pub fn downsample_endpoints(path: &[Point], max_points: usize) -> Polyline {
    let n = path.len();
    if n <= max_points {
        return Polyline::new(path.to_vec());
    }
    if max_points <= 1 {
        return path.iter().take(max_points).copied().collect();
    }

    let span = max_points - 1;
    let indices = (0..max_points).map(|i| div_round_ties_even(i * (n - 1), span));
    pick_unique(path, indices)
}

/// Collect `path[i]` for each index, skipping indices already taken.
fn pick_unique(path: &[Point], indices: impl Iterator<Item = usize>) -> Polyline {
    let mut taken = vec![false; path.len()];
    indices
        .filter_map(|i| {
            let seen = taken.get_mut(i)?;
            if *seen {
                return None;
            }
            *seen = true;
            Some(path[i])
        })
        .collect()
}

/// `num / den` rounded to nearest, ties to even. `den` must be non-zero.
fn div_round_ties_even(num: usize, den: usize) -> usize {
    let q = num / den;
    let r = num % den;
    match (2 * r).cmp(&den) {
        Ordering::Less => q,
        Ordering::Greater => q + 1,
        Ordering::Equal => q + (q % 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: points `(0,0), (1,0), ... (len-1, 0)`.
    fn line(len: u32) -> Vec<Point> {
        (0..len).map(|i| Point::new(f64::from(i), 0.0)).collect()
    }

    fn xs(polyline: &Polyline) -> Vec<f64> {
        polyline.points().iter().map(|p| p.x).collect()
    }

    #[test]
    fn rounding_helper_ties_to_even() {
        assert_eq!(div_round_ties_even(3, 2), 2); // 1.5
        assert_eq!(div_round_ties_even(5, 2), 2); // 2.5
        assert_eq!(div_round_ties_even(7, 2), 4); // 3.5
        assert_eq!(div_round_ties_even(4, 3), 1); // 1.33
        assert_eq!(div_round_ties_even(5, 3), 2); // 1.67
    }

    // --- Stride ---

    #[test]
    fn stride_within_budget_unchanged() {
        let path = line(4);
        let result = downsample_stride(&path, 200);
        assert_eq!(result.points(), path.as_slice());
    }

    #[test]
    fn stride_picks_floor_indices() {
        // n = 10, M = 4: floor(i * 10 / 4) = 0, 2, 5, 7
        let result = downsample_stride(&line(10), 4);
        assert_eq!(xs(&result), vec![0.0, 2.0, 5.0, 7.0]);
    }

    #[test]
    fn stride_never_exceeds_budget() {
        for n in 1..60 {
            for m in 1..25 {
                let result = downsample_stride(&line(n), m);
                assert!(result.len() <= m, "n={n} m={m} gave {}", result.len());
                assert!(result.len() <= n as usize);
            }
        }
    }

    #[test]
    fn stride_collisions_are_deduplicated() {
        // The formula itself cannot collide once n > M, so feed the
        // dedup step a colliding index stream directly.
        let path = line(5);
        let result = pick_unique(&path, [0, 0, 1, 4, 4, 9].into_iter());
        assert_eq!(xs(&result), vec![0.0, 1.0, 4.0]);
    }

    #[test]
    fn stride_preserves_order() {
        let result = downsample_stride(&line(1000), 37);
        let values = xs(&result);
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    // --- Endpoints ---

    #[test]
    fn endpoints_within_budget_unchanged() {
        let path = line(20);
        let result = downsample_endpoints(&path, 20);
        assert_eq!(result.points(), path.as_slice());
    }

    #[test]
    fn endpoints_five_to_three() {
        // round(i * 4 / 2) for i = 0, 1, 2 -> 0, 2, 4
        let result = downsample_endpoints(&line(5), 3);
        assert_eq!(xs(&result), vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn endpoints_ties_round_to_even() {
        // L = 6, N = 3: i * 5 / 2 = 0, 2.5, 5 -> 0, 2, 5
        let result = downsample_endpoints(&line(6), 3);
        assert_eq!(xs(&result), vec![0.0, 2.0, 5.0]);
    }

    #[test]
    fn endpoints_exact_count_and_endpoints_kept() {
        for len in 2..80_u32 {
            for n in 2..30_usize {
                let path = line(len);
                let result = downsample_endpoints(&path, n);
                assert_eq!(result.len(), n.min(len as usize), "len={len} n={n}");
                assert_eq!(result.first(), path.first());
                assert_eq!(result.last(), path.last());
                let values = xs(&result);
                assert!(values.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn endpoints_budget_of_one_keeps_first() {
        let result = downsample_endpoints(&line(5), 1);
        assert_eq!(xs(&result), vec![0.0]);
    }

    #[test]
    fn empty_path_stays_empty() {
        assert!(downsample_endpoints(&[], 3).is_empty());
        assert!(downsample_stride(&[], 3).is_empty());
    }

    #[test]
    fn trait_dispatches_by_strategy() {
        let path = line(10);
        let stride = DownsampleStrategy::Stride.downsample(&path, 4);
        let endpoints = DownsampleStrategy::Endpoints.downsample(&path, 4);
        assert_eq!(xs(&stride), vec![0.0, 2.0, 5.0, 7.0]);
        // round(i * 9 / 3) = 0, 3, 6, 9
        assert_eq!(xs(&endpoints), vec![0.0, 3.0, 6.0, 9.0]);
    }

    #[test]
    fn default_strategy_is_stride() {
        assert_eq!(DownsampleStrategy::default(), DownsampleStrategy::Stride);
    }
}
