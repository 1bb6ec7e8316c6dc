//! Stored stroke payloads and their flattening into one point list.
//!
//! A manifest entry carries its figure in one of three shapes:
//!
//! ```text
//! "strokes": [[[x, y], ...], [[x, y], ...]]   multi-stroke
//! "strokes": [[x, y], [x, y], ...]            flat point list
//! "points":  [[x, y], [x, y], ...]            legacy point list
//! ```
//!
//! The shape is resolved once into a [`StrokePayload`] so consumers only
//! ever see a canonical point list via [`StrokePayload::flatten`].

use serde_json::{Map, Value};

use crate::types::{Point, Polyline};

/// Entry field holding the current stroke data.
pub const STROKES_KEY: &str = "strokes";

/// Entry field holding pre-stroke point data.
pub const LEGACY_POINTS_KEY: &str = "points";

/// The stroke data of one entry, with its storage shape resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum StrokePayload {
    /// `strokes` as a list of strokes, each a list of points.
    MultiStroke(Vec<Polyline>),
    /// `strokes` as a flat list of points.
    FlatPoints(Polyline),
    /// Legacy `points` list.
    Legacy(Polyline),
    /// Neither field holds any points.
    Empty,
    /// A field held data that is not a recognizable point list.
    Malformed,
}

impl StrokePayload {
    /// Resolve the payload of a manifest entry.
    ///
    /// A non-empty `strokes` list takes precedence; otherwise a non-empty
    /// legacy `points` list is used. A field that is present and
    /// non-empty but not made of `[x, y]` number pairs resolves to
    /// [`Malformed`](Self::Malformed).
    #[must_use]
    pub fn from_entry(entry: &Map<String, Value>) -> Self {
        if let Some(strokes) = non_empty_array(entry.get(STROKES_KEY)) {
            return parse_point_list(strokes).map_or_else(
                || parse_stroke_list(strokes).map_or(Self::Malformed, Self::MultiStroke),
                Self::FlatPoints,
            );
        }
        if let Some(points) = non_empty_array(entry.get(LEGACY_POINTS_KEY)) {
            return parse_point_list(points).map_or(Self::Malformed, Self::Legacy);
        }
        Self::Empty
    }

    /// Concatenate the payload into a single ordered point list.
    ///
    /// Strokes are joined in stored order. Empty and malformed payloads
    /// flatten to an empty list.
    #[must_use]
    pub fn flatten(self) -> Polyline {
        match self {
            Self::MultiStroke(strokes) => strokes.into_iter().flat_map(Polyline::into_points).collect(),
            Self::FlatPoints(points) | Self::Legacy(points) => points,
            Self::Empty | Self::Malformed => Polyline::default(),
        }
    }

    /// Returns `true` for [`Malformed`](Self::Malformed).
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed)
    }
}

/// The canonical persisted form: one stroke wrapped in a list, or an
/// empty list when there are no points.
#[must_use]
pub fn strokes_value(stroke: &Polyline) -> Value {
    if stroke.is_empty() {
        return Value::Array(Vec::new());
    }
    Value::Array(vec![Value::Array(
        stroke.points().iter().map(|p| point_value(*p)).collect(),
    )])
}

fn point_value(p: Point) -> Value {
    Value::Array(vec![number(p.x), number(p.y)])
}

/// JSON has no NaN or infinity; such coordinates are written as 0.
fn number(v: f64) -> Value {
    serde_json::Number::from_f64(v).map_or_else(|| Value::from(0), Value::Number)
}

fn non_empty_array(value: Option<&Value>) -> Option<&[Value]> {
    match value {
        Some(Value::Array(items)) if !items.is_empty() => Some(items),
        _ => None,
    }
}

/// Parse `[x, y]` number pairs. `None` if any item is not one.
fn parse_point_list(items: &[Value]) -> Option<Polyline> {
    items.iter().map(parse_point).collect()
}

/// Parse a list of point lists. `None` if any item is not one.
fn parse_stroke_list(items: &[Value]) -> Option<Vec<Polyline>> {
    items
        .iter()
        .map(|item| parse_point_list(item.as_array()?))
        .collect()
}

fn parse_point(value: &Value) -> Option<Point> {
    match value.as_array()?.as_slice() {
        [x, y] => Some(Point::new(x.as_f64()?, y.as_f64()?)),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn entry(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    fn poly(coords: &[(f64, f64)]) -> Polyline {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn multi_stroke_concatenates_in_order() {
        let e = entry(json!({"strokes": [[[0, 0], [1, 0]], [[2, 0]], [[3, 0], [4, 0]]]}));
        let payload = StrokePayload::from_entry(&e);
        assert!(matches!(payload, StrokePayload::MultiStroke(ref s) if s.len() == 3));
        assert_eq!(
            payload.flatten(),
            poly(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)]),
        );
    }

    #[test]
    fn flat_strokes_used_directly() {
        let e = entry(json!({"strokes": [[0.5, 0.25], [0.75, 1]]}));
        let payload = StrokePayload::from_entry(&e);
        assert_eq!(
            payload,
            StrokePayload::FlatPoints(poly(&[(0.5, 0.25), (0.75, 1.0)]))
        );
    }

    #[test]
    fn legacy_points_used_when_no_strokes() {
        let e = entry(json!({"points": [[1, 2], [3, 4]]}));
        assert_eq!(
            StrokePayload::from_entry(&e),
            StrokePayload::Legacy(poly(&[(1.0, 2.0), (3.0, 4.0)])),
        );
    }

    #[test]
    fn legacy_points_used_when_strokes_empty() {
        let e = entry(json!({"strokes": [], "points": [[1, 2]]}));
        assert_eq!(
            StrokePayload::from_entry(&e),
            StrokePayload::Legacy(poly(&[(1.0, 2.0)])),
        );
    }

    #[test]
    fn strokes_take_precedence_over_points() {
        let e = entry(json!({"strokes": [[[9, 9]]], "points": [[1, 2]]}));
        assert_eq!(
            StrokePayload::from_entry(&e).flatten(),
            poly(&[(9.0, 9.0)])
        );
    }

    #[test]
    fn missing_fields_flatten_to_empty() {
        let e = entry(json!({"slug": "lyra", "name": "Lyra"}));
        let payload = StrokePayload::from_entry(&e);
        assert_eq!(payload, StrokePayload::Empty);
        assert!(payload.flatten().is_empty());
    }

    #[test]
    fn malformed_shapes_flatten_to_empty() {
        for bad in [
            json!({"strokes": "nope"}),
            json!({"strokes": [[1, 2, 3]]}),
            json!({"strokes": [[["a", 0]]]}),
            json!({"strokes": [[[0, 0]], 5]}),
            json!({"points": [{"x": 1, "y": 2}]}),
        ] {
            let payload = StrokePayload::from_entry(&entry(bad.clone()));
            assert!(payload.flatten().is_empty(), "{bad} should flatten to empty");
        }
    }

    #[test]
    fn non_list_strokes_is_treated_as_absent() {
        // A scalar `strokes` is not a list at all, so it does not shadow
        // legacy points.
        let e = entry(json!({"strokes": "nope", "points": [[1, 1]]}));
        assert_eq!(
            StrokePayload::from_entry(&e).flatten(),
            poly(&[(1.0, 1.0)])
        );
    }

    #[test]
    fn mixed_shape_is_malformed() {
        let e = entry(json!({"strokes": [[[0, 0]], 5]}));
        assert!(StrokePayload::from_entry(&e).is_malformed());
    }

    #[test]
    fn empty_inner_strokes_contribute_nothing() {
        let e = entry(json!({"strokes": [[], [[1, 1]]]}));
        assert_eq!(
            StrokePayload::from_entry(&e).flatten(),
            poly(&[(1.0, 1.0)])
        );
    }

    #[test]
    fn flatten_is_idempotent_on_flat_data() {
        let e = entry(json!({"strokes": [[[0, 0], [1, 1]], [[2, 2]]]}));
        let once = StrokePayload::from_entry(&e).flatten();
        let twice = StrokePayload::FlatPoints(once.clone()).flatten();
        assert_eq!(once, twice);

        // Through the persisted form too.
        let rewritten = entry(json!({ "strokes": strokes_value(&once) }));
        assert_eq!(StrokePayload::from_entry(&rewritten).flatten(), once);
    }

    #[test]
    fn strokes_value_wraps_single_stroke() {
        let value = strokes_value(&poly(&[(0.0, 0.0), (0.5, 1.0)]));
        assert_eq!(value, json!([[[0.0, 0.0], [0.5, 1.0]]]));
    }

    #[test]
    fn strokes_value_empty_is_empty_list() {
        assert_eq!(strokes_value(&Polyline::default()), json!([]));
    }
}
