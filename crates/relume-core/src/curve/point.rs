//! Control points for the tone curve.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A 2-D control point in the unit square.
///
/// Points are ordered by `x` ascending, ties broken by `y`. A point is a
/// plain value; it is owned by the [`ToneCurve`](crate::curve::ToneCurve)
/// that holds it and mutated only through the curve's index-based API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    /// Horizontal position, conceptually in `[0, 1]`.
    pub x: f64,
    /// Vertical position, conceptually in `[0, 1]`.
    pub y: f64,
}

impl ControlPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether two points lie within `radius` of each other (Euclidean).
    ///
    /// Used by editing frontends for hit-testing against a picked position.
    pub fn is_close(a: ControlPoint, b: ControlPoint, radius: f64) -> bool {
        let dx = a.x - b.x;
        let dy = a.y - b.y;
        (dx * dx + dy * dy).sqrt() < radius
    }
}

impl From<(f64, f64)> for ControlPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl Eq for ControlPoint {}

impl Ord for ControlPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }
}

impl PartialOrd for ControlPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ControlPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.x, self.y)
    }
}
