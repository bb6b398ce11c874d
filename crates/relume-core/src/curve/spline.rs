//! Natural cubic spline interpolation through sorted knots.
//!
//! A natural cubic spline is a piecewise cubic through all knots with
//! continuous first and second derivatives at interior knots and second
//! derivative zero at both endpoints. Coefficients come from the standard
//! O(n) tridiagonal solve.
//!
//! # Complexity
//! - Fit: O(n) over the knots
//! - Evaluate: O(log n) binary search + O(1) cubic

use crate::curve::point::ControlPoint;

/// Fitted natural cubic spline over `n` knots (`n − 1` cubic segments).
///
/// Evaluation outside the knot domain clamps to the boundary knot's value,
/// never extrapolates.
#[derive(Debug, Clone)]
pub struct NaturalCubicSpline {
    /// Knot x-positions, strictly increasing.
    knots: Vec<f64>,
    /// Per-segment polynomial coefficients: value at the left knot.
    a: Vec<f64>,
    /// Per-segment linear coefficient.
    b: Vec<f64>,
    /// Per-segment quadratic coefficient (half the second derivative).
    c: Vec<f64>,
    /// Per-segment cubic coefficient.
    d: Vec<f64>,
}

impl NaturalCubicSpline {
    /// Fit a spline through `points`.
    ///
    /// Points must be sorted by `x` with strictly increasing x-values and
    /// at least 3 entries; [`ToneCurve`](crate::curve::ToneCurve) enforces
    /// both before fitting.
    pub fn fit(points: &[ControlPoint]) -> Self {
        debug_assert!(points.len() >= 3);
        debug_assert!(points.windows(2).all(|w| w[0].x < w[1].x));

        let n = points.len() - 1;
        let x: Vec<f64> = points.iter().map(|p| p.x).collect();
        let a: Vec<f64> = points.iter().map(|p| p.y).collect();

        let h: Vec<f64> = (0..n).map(|i| x[i + 1] - x[i]).collect();

        // Forward sweep of the tridiagonal system; natural boundary means
        // the second derivative terms at both ends are zero.
        let mut mu = vec![0.0; n];
        let mut z = vec![0.0; n + 1];
        for i in 1..n {
            let l = 2.0 * (x[i + 1] - x[i - 1]) - h[i - 1] * mu[i - 1];
            mu[i] = h[i] / l;
            z[i] = (3.0 * (a[i + 1] - a[i]) / h[i] - 3.0 * (a[i] - a[i - 1]) / h[i - 1]
                - h[i - 1] * z[i - 1])
                / l;
        }

        // Back substitution.
        let mut c = vec![0.0; n + 1];
        let mut b = vec![0.0; n];
        let mut d = vec![0.0; n];
        for j in (0..n).rev() {
            c[j] = z[j] - mu[j] * c[j + 1];
            b[j] = (a[j + 1] - a[j]) / h[j] - h[j] * (c[j + 1] + 2.0 * c[j]) / 3.0;
            d[j] = (c[j + 1] - c[j]) / (3.0 * h[j]);
        }
        c.truncate(n);

        Self {
            knots: x,
            a: a[..n].to_vec(),
            b,
            c,
            d,
        }
    }

    /// The knot domain `[x_min, x_max]`.
    pub fn domain(&self) -> (f64, f64) {
        (self.knots[0], self.knots[self.knots.len() - 1])
    }

    /// Evaluate the spline at `x`, clamped to the knot domain.
    pub fn evaluate(&self, x: f64) -> f64 {
        let (x_min, x_max) = self.domain();
        let x = x.clamp(x_min, x_max);

        // Index of the segment whose left knot is the last one <= x.
        let seg = self
            .knots
            .partition_point(|&k| k <= x)
            .saturating_sub(1)
            .min(self.a.len() - 1);

        let dx = x - self.knots[seg];
        self.a[seg] + dx * (self.b[seg] + dx * (self.c[seg] + dx * self.d[seg]))
    }
}
