//! Path construction: order an unordered point set into a single stroke.
//!
//! Uses a greedy nearest-neighbor heuristic seeded from the point nearest
//! the centroid. Every input point is visited exactly once, so the output
//! has the same length as the input. The result is deterministic for a
//! given input order but is not a minimal tour.
//!
//! Cost is O(n²); the pixel extractor bounds `n`.

use crate::types::{Point, Polyline};

/// Build a single path visiting every point exactly once.
///
/// 1. Start at the point with the smallest squared distance to the
///    centroid of all points.
/// 2. Repeatedly append the unvisited point closest to the current end.
///
/// Ties in both steps go to the point that comes first in `points`.
/// Returns an empty polyline for empty input.
#[must_use = "returns the ordered path"]
pub fn greedy_path(points: &[Point]) -> Polyline {
    let Some(start) = nearest(points, centroid(points), |_| true) else {
        return Polyline::default();
    };

    let n = points.len();
    let mut visited = vec![false; n];
    let mut path = Vec::with_capacity(n);

    visited[start] = true;
    path.push(points[start]);
    let mut current = points[start];

    for _ in 1..n {
        // At least one unvisited point remains on every iteration.
        let Some(next) = nearest(points, current, |i| !visited[i]) else {
            break;
        };
        visited[next] = true;
        path.push(points[next]);
        current = points[next];
    }

    Polyline::new(path)
}

/// Mean of all points; the origin for an empty slice.
fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::new(0.0, 0.0);
    }
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

/// Index of the candidate closest to `target`, first index on ties.
fn nearest(points: &[Point], target: Point, candidate: impl Fn(usize) -> bool) -> Option<usize> {
    let mut best: Option<usize> = None;
    let mut best_dist = f64::INFINITY;

    for (i, p) in points.iter().enumerate() {
        if !candidate(i) {
            continue;
        }
        let dist = p.distance_squared(target);
        if best.is_none() || dist < best_dist {
            best = Some(i);
            best_dist = dist;
        }
    }

    best
}
