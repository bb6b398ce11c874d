//! The editable tone-response curve.
//!
//! A [`ToneCurve`] owns a sorted set of control points in the unit square
//! and evaluates a natural cubic spline through them. The fitted spline is
//! cached and rebuilt lazily on the first evaluation after a mutation.
//!
//! Change notification is an event queue: every successful mutation pushes
//! exactly one [`CurveEvent`], and the owning component drains the queue
//! with [`ToneCurve::take_events`] after editing. Rejected mutations leave
//! both the curve and the queue untouched.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tracing::debug;

use crate::curve::point::ControlPoint;
use crate::curve::spline::NaturalCubicSpline;

/// Minimum number of control points a curve must keep.
pub const MIN_POINTS: usize = 3;

/// Rejected curve mutations. The curve is unchanged when these are returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurveError {
    #[error("a tone curve needs at least {MIN_POINTS} control points")]
    TooFewPoints,
    #[error("control point x={0} collides with an existing point")]
    DuplicateX(f64),
    #[error("control point index {index} out of bounds (have {len} points)")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Emitted once per successful mutation; drained by the curve's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveEvent {
    PointAdded,
    PointRemoved,
    PointMoved,
    PointsReplaced,
}

/// An editable, spline-interpolated tone-response curve.
///
/// Invariants: at least [`MIN_POINTS`] points, sorted by `x` ascending,
/// all `x` values unique. Outside the domain spanned by the first and last
/// point, [`value`](Self::value) clamps to the boundary point's `y`.
///
/// Single-threaded by design: the spline cache uses a lock only so that
/// evaluation can take `&self`; concurrent mutation and evaluation from
/// multiple threads is unsupported.
#[derive(Debug)]
pub struct ToneCurve {
    points: Vec<ControlPoint>,
    spline: Mutex<Option<NaturalCubicSpline>>,
    events: VecDeque<CurveEvent>,
}

impl ToneCurve {
    /// The default near-identity curve: `(0,0)`, `(0.5,0.5)`, `(1,1)`.
    pub fn new() -> Self {
        Self {
            points: vec![
                ControlPoint::new(0.0, 0.0),
                ControlPoint::new(0.5, 0.5),
                ControlPoint::new(1.0, 1.0),
            ],
            spline: Mutex::new(None),
            events: VecDeque::new(),
        }
    }

    /// Build a curve from an explicit point set.
    ///
    /// Points are sorted; fewer than [`MIN_POINTS`] entries or duplicate
    /// `x` values are rejected.
    pub fn with_points(points: Vec<ControlPoint>) -> Result<Self, CurveError> {
        let points = validate_point_set(points)?;
        Ok(Self {
            points,
            spline: Mutex::new(None),
            events: VecDeque::new(),
        })
    }

    /// The control points, sorted by `x`.
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    pub fn first_point(&self) -> ControlPoint {
        self.points[0]
    }

    pub fn last_point(&self) -> ControlPoint {
        self.points[self.points.len() - 1]
    }

    /// The curve domain `[x_min, x_max]` spanned by the outermost points.
    pub fn domain(&self) -> (f64, f64) {
        (self.first_point().x, self.last_point().x)
    }

    /// Insert a new control point.
    ///
    /// Fails with [`CurveError::DuplicateX`] if a point with the same `x`
    /// already exists.
    pub fn add_point(&mut self, point: ControlPoint) -> Result<(), CurveError> {
        if self.points.iter().any(|p| p.x == point.x) {
            return Err(CurveError::DuplicateX(point.x));
        }
        self.points.push(point);
        self.points.sort();
        self.invalidate();
        self.events.push_back(CurveEvent::PointAdded);
        debug!(x = point.x, y = point.y, "control point added");
        Ok(())
    }

    /// Remove the control point at `index`.
    ///
    /// Fails with [`CurveError::TooFewPoints`] when only [`MIN_POINTS`]
    /// points remain; the curve must always keep at least that many.
    pub fn remove_point(&mut self, index: usize) -> Result<ControlPoint, CurveError> {
        if index >= self.points.len() {
            return Err(CurveError::IndexOutOfBounds {
                index,
                len: self.points.len(),
            });
        }
        if self.points.len() <= MIN_POINTS {
            return Err(CurveError::TooFewPoints);
        }
        let removed = self.points.remove(index);
        self.invalidate();
        self.events.push_back(CurveEvent::PointRemoved);
        debug!(x = removed.x, y = removed.y, "control point removed");
        Ok(removed)
    }

    /// Move the control point at `index` to `(x, y)`.
    ///
    /// The point list is re-sorted, so the point's index may change when it
    /// crosses a neighbor. Setting a point to its current position is a
    /// no-op and emits no event.
    pub fn set_point(&mut self, index: usize, x: f64, y: f64) -> Result<(), CurveError> {
        let len = self.points.len();
        let current = *self
            .points
            .get(index)
            .ok_or(CurveError::IndexOutOfBounds { index, len })?;
        if current.x == x && current.y == y {
            return Ok(());
        }
        if self
            .points
            .iter()
            .enumerate()
            .any(|(i, p)| i != index && p.x == x)
        {
            return Err(CurveError::DuplicateX(x));
        }
        self.points[index] = ControlPoint::new(x, y);
        self.points.sort();
        self.invalidate();
        self.events.push_back(CurveEvent::PointMoved);
        Ok(())
    }

    /// Atomically replace the whole point set.
    ///
    /// Validation happens before any state changes; on error the existing
    /// points remain in place.
    pub fn replace_points(&mut self, points: Vec<ControlPoint>) -> Result<(), CurveError> {
        let points = validate_point_set(points)?;
        self.points = points;
        self.invalidate();
        self.events.push_back(CurveEvent::PointsReplaced);
        debug!(count = self.points.len(), "control points replaced");
        Ok(())
    }

    /// Evaluate the curve at `x`.
    ///
    /// `x` is clamped to the curve domain first; the curve never
    /// extrapolates. Rebuilds the cached spline if a mutation invalidated
    /// it since the last evaluation.
    pub fn value(&self, x: f64) -> f64 {
        let mut cache = self.spline.lock();
        let spline = cache.get_or_insert_with(|| NaturalCubicSpline::fit(&self.points));
        spline.evaluate(x)
    }

    /// Drain all pending change events, oldest first.
    pub fn take_events(&mut self) -> Vec<CurveEvent> {
        self.events.drain(..).collect()
    }

    fn invalidate(&mut self) {
        *self.spline.get_mut() = None;
    }
}

impl Default for ToneCurve {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ToneCurve {
    fn clone(&self) -> Self {
        Self {
            points: self.points.clone(),
            spline: Mutex::new(None),
            events: VecDeque::new(),
        }
    }
}

/// Sort and validate a candidate point set: at least [`MIN_POINTS`] entries
/// and unique `x` values.
fn validate_point_set(mut points: Vec<ControlPoint>) -> Result<Vec<ControlPoint>, CurveError> {
    if points.len() < MIN_POINTS {
        return Err(CurveError::TooFewPoints);
    }
    points.sort();
    if let Some(w) = points.windows(2).find(|w| w[0].x == w[1].x) {
        return Err(CurveError::DuplicateX(w[0].x));
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn pts(coords: &[(f64, f64)]) -> Vec<ControlPoint> {
        coords.iter().map(|&c| ControlPoint::from(c)).collect()
    }

    #[test]
    fn test_default_curve_hits_its_control_points() {
        let curve = ToneCurve::new();
        assert!((curve.value(0.0) - 0.0).abs() < EPSILON);
        assert!((curve.value(0.5) - 0.5).abs() < EPSILON);
        assert!((curve.value(1.0) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_value_clamps_outside_domain() {
        let mut curve = ToneCurve::new();
        curve
            .replace_points(pts(&[(0.1, 0.2), (0.5, 0.5), (0.9, 0.8)]))
            .unwrap();
        assert!((curve.value(-5.0) - 0.2).abs() < EPSILON);
        assert!((curve.value(0.0) - 0.2).abs() < EPSILON);
        assert!((curve.value(1.0) - 0.8).abs() < EPSILON);
        assert!((curve.value(5.0) - 0.8).abs() < EPSILON);
    }

    #[test]
    fn test_add_point_keeps_points_sorted_and_emits_one_event() {
        let mut curve = ToneCurve::new();
        curve.take_events();
        curve.add_point(ControlPoint::new(0.25, 0.3)).unwrap();
        let xs: Vec<f64> = curve.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 0.25, 0.5, 1.0]);
        assert_eq!(curve.take_events(), vec![CurveEvent::PointAdded]);
    }

    #[test]
    fn test_add_point_rejects_duplicate_x_without_event() {
        let mut curve = ToneCurve::new();
        curve.take_events();
        let before = curve.points().to_vec();
        let err = curve.add_point(ControlPoint::new(0.5, 0.9)).unwrap_err();
        assert_eq!(err, CurveError::DuplicateX(0.5));
        assert_eq!(curve.points(), &before[..]);
        assert!(curve.take_events().is_empty());
    }

    #[test]
    fn test_remove_point_fails_on_minimum_curve() {
        let mut curve = ToneCurve::new();
        curve.take_events();
        let before = curve.points().to_vec();
        assert_eq!(curve.remove_point(1).unwrap_err(), CurveError::TooFewPoints);
        assert_eq!(curve.points(), &before[..]);
        assert!(curve.take_events().is_empty());
    }

    #[test]
    fn test_remove_point_succeeds_above_minimum() {
        let mut curve = ToneCurve::new();
        curve.add_point(ControlPoint::new(0.25, 0.3)).unwrap();
        curve.take_events();
        let removed = curve.remove_point(1).unwrap();
        assert_eq!(removed, ControlPoint::new(0.25, 0.3));
        assert_eq!(curve.points().len(), 3);
        assert_eq!(curve.take_events(), vec![CurveEvent::PointRemoved]);
    }

    #[test]
    fn test_remove_point_out_of_bounds() {
        let mut curve = ToneCurve::new();
        curve.add_point(ControlPoint::new(0.25, 0.3)).unwrap();
        assert_eq!(
            curve.remove_point(9).unwrap_err(),
            CurveError::IndexOutOfBounds { index: 9, len: 4 }
        );
    }

    #[test]
    fn test_replace_points_rejects_fewer_than_three() {
        let mut curve = ToneCurve::new();
        curve.take_events();
        let before = curve.points().to_vec();
        let err = curve.replace_points(pts(&[(0.0, 0.0), (1.0, 1.0)])).unwrap_err();
        assert_eq!(err, CurveError::TooFewPoints);
        assert_eq!(curve.points(), &before[..]);
        assert!(curve.take_events().is_empty());
    }

    #[test]
    fn test_replace_points_sorts_input_and_emits_one_event() {
        let mut curve = ToneCurve::new();
        curve.take_events();
        curve
            .replace_points(pts(&[(1.0, 1.0), (0.0, 0.1), (0.4, 0.6)]))
            .unwrap();
        assert_eq!(curve.first_point(), ControlPoint::new(0.0, 0.1));
        assert_eq!(curve.last_point(), ControlPoint::new(1.0, 1.0));
        assert_eq!(curve.take_events(), vec![CurveEvent::PointsReplaced]);
    }

    #[test]
    fn test_set_point_moves_and_resorts() {
        let mut curve = ToneCurve::new();
        curve.take_events();
        // Drag the middle point past the right endpoint.
        curve.set_point(1, 1.5, 0.9).unwrap();
        let xs: Vec<f64> = curve.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 1.5]);
        assert_eq!(curve.take_events(), vec![CurveEvent::PointMoved]);
        assert_eq!(curve.domain(), (0.0, 1.5));
    }

    #[test]
    fn test_set_point_to_same_position_is_a_silent_noop() {
        let mut curve = ToneCurve::new();
        curve.take_events();
        curve.set_point(1, 0.5, 0.5).unwrap();
        assert!(curve.take_events().is_empty());
    }

    #[test]
    fn test_set_point_rejects_duplicate_x() {
        let mut curve = ToneCurve::new();
        curve.take_events();
        let err = curve.set_point(1, 1.0, 0.5).unwrap_err();
        assert_eq!(err, CurveError::DuplicateX(1.0));
        assert!(curve.take_events().is_empty());
    }

    #[test]
    fn test_value_reflects_mutation() {
        let mut curve = ToneCurve::new();
        let before = curve.value(0.25);
        curve.set_point(1, 0.5, 0.9).unwrap();
        let after = curve.value(0.25);
        assert!(after > before, "curve lift not visible: {before} -> {after}");
        // Knot values are exact regardless of cache state.
        assert!((curve.value(0.5) - 0.9).abs() < EPSILON);
    }

    #[test]
    fn test_with_points_validates_and_sorts() {
        let curve = ToneCurve::with_points(pts(&[(0.9, 1.0), (0.0, 0.0), (0.5, 0.4)])).unwrap();
        assert_eq!(curve.domain(), (0.0, 0.9));
        assert!(ToneCurve::with_points(pts(&[(0.0, 0.0), (1.0, 1.0)])).is_err());
        assert!(
            ToneCurve::with_points(pts(&[(0.0, 0.0), (0.5, 0.2), (0.5, 0.7), (1.0, 1.0)])).is_err()
        );
    }

    #[test]
    fn test_identity_like_curve_stays_monotone_between_knots() {
        // A straight-line point set evaluates to the identity everywhere.
        let curve =
            ToneCurve::with_points(pts(&[(0.0, 0.0), (0.25, 0.25), (0.5, 0.5), (0.75, 0.75), (1.0, 1.0)]))
                .unwrap();
        let mut x = 0.0;
        while x <= 1.0 {
            assert!((curve.value(x) - x).abs() < 1e-9);
            x += 0.05;
        }
    }
}
