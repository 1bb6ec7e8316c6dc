//! Post-hoc stroke simplification.
//!
//! Re-simplifies stroke data that is already stored in a manifest entry:
//! the payload is flattened into one point list, reduced to a fixed
//! point budget with the endpoint-preserving index formula, rounded, and
//! written back as a single stroke. Any multi-stroke structure in the
//! input is collapsed.
//!
//! Running it again on its own output is a no-op, since the output never
//! exceeds the budget and is already rounded.

use serde_json::{Map, Value};

use crate::downsample::downsample_endpoints;
use crate::payload::{STROKES_KEY, StrokePayload, strokes_value};
use crate::types::{Polyline, SimplifyConfig};

/// What [`simplify_entry`] did to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimplifyOutcome {
    /// The entry had points; `strokes` now holds one simplified stroke.
    Simplified {
        /// Points after flattening.
        before: usize,
        /// Points in the stored stroke.
        after: usize,
    },
    /// The entry had no points; `strokes` is now `[]`.
    Emptied,
    /// The payload was unrecognizable; `strokes` is now `[]`.
    Malformed,
}

/// Reduce `points` to at most `config.target_points` and round them.
///
/// Keeps the first and last point whenever the budget is at least two.
#[must_use]
pub fn simplify_points(points: &Polyline, config: &SimplifyConfig) -> Polyline {
    downsample_endpoints(points.points(), config.target_points).rounded(config.precision)
}

/// Flatten, simplify, and rewrite the `strokes` field of one entry.
///
/// Every other field of the entry is left untouched.
pub fn simplify_entry(entry: &mut Map<String, Value>, config: &SimplifyConfig) -> SimplifyOutcome {
    let payload = StrokePayload::from_entry(entry);
    let malformed = payload.is_malformed();
    let points = payload.flatten();

    if points.is_empty() {
        entry.insert(STROKES_KEY.to_owned(), Value::Array(Vec::new()));
        return if malformed {
            SimplifyOutcome::Malformed
        } else {
            SimplifyOutcome::Emptied
        };
    }

    let simplified = simplify_points(&points, config);
    entry.insert(STROKES_KEY.to_owned(), strokes_value(&simplified));
    SimplifyOutcome::Simplified {
        before: points.len(),
        after: simplified.len(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::Point;

    fn entry(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    fn config(target_points: usize) -> SimplifyConfig {
        SimplifyConfig {
            target_points,
            ..SimplifyConfig::default()
        }
    }

    #[test]
    fn five_points_to_three() {
        let mut e = entry(json!({"strokes": [[[0, 0], [1, 0], [2, 0], [3, 0], [4, 0]]]}));
        let outcome = simplify_entry(&mut e, &config(3));
        assert_eq!(outcome, SimplifyOutcome::Simplified { before: 5, after: 3 });
        assert_eq!(e["strokes"], json!([[[0.0, 0.0], [2.0, 0.0], [4.0, 0.0]]]));
    }

    #[test]
    fn no_fields_writes_empty_strokes() {
        let mut e = entry(json!({"slug": "crux"}));
        let outcome = simplify_entry(&mut e, &SimplifyConfig::default());
        assert_eq!(outcome, SimplifyOutcome::Emptied);
        assert_eq!(e["strokes"], json!([]));
        assert_eq!(e["slug"], json!("crux"));
    }

    #[test]
    fn malformed_payload_writes_empty_strokes() {
        let mut e = entry(json!({"strokes": [[1, 2, 3]]}));
        let outcome = simplify_entry(&mut e, &SimplifyConfig::default());
        assert_eq!(outcome, SimplifyOutcome::Malformed);
        assert_eq!(e["strokes"], json!([]));
    }

    #[test]
    fn legacy_points_become_single_stroke() {
        let mut e = entry(json!({"points": [[0.1234, 0.5678], [0.9, 0.1]]}));
        simplify_entry(&mut e, &SimplifyConfig::default());
        assert_eq!(e["strokes"], json!([[[0.123, 0.568], [0.9, 0.1]]]));
        // The legacy field is left in place.
        assert!(e.contains_key("points"));
    }

    #[test]
    fn multi_stroke_collapsed_to_one() {
        let mut e = entry(json!({"strokes": [[[0, 0], [1, 1]], [[2, 2], [3, 3]]]}));
        simplify_entry(&mut e, &config(20));
        assert_eq!(
            e["strokes"],
            json!([[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]]])
        );
    }

    #[test]
    fn short_input_returned_as_is() {
        let points: Polyline = (0..7)
            .map(|i| Point::new(f64::from(i) / 10.0, 0.5))
            .collect();
        let result = simplify_points(&points, &config(20));
        assert_eq!(result, points);
    }

    #[test]
    fn long_input_keeps_first_and_last() {
        let points: Polyline = (0..500)
            .map(|i| Point::new(f64::from(i) / 500.0, 1.0 - f64::from(i) / 500.0))
            .collect();
        let result = simplify_points(&points, &SimplifyConfig::default());
        assert_eq!(result.len(), 20);
        assert_eq!(result.first(), Some(&Point::new(0.0, 1.0)));
        assert_eq!(result.last(), Some(&Point::new(0.998, 0.002)));
    }

    #[test]
    fn rerun_is_a_no_op() {
        let mut e = entry(json!({
            "strokes": [(0..100).map(|i| [f64::from(i) / 99.0, 0.5]).collect::<Vec<_>>()]
        }));
        simplify_entry(&mut e, &SimplifyConfig::default());
        let first = e["strokes"].clone();
        simplify_entry(&mut e, &SimplifyConfig::default());
        assert_eq!(e["strokes"], first);
    }
}
