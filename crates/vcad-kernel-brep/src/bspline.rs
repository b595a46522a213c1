//! Non-rational B-spline curves.
//!
//! Evaluation uses De Boor's algorithm, refinement uses Boehm's knot
//! insertion. On top of these sit the two operations the drafting engine
//! needs for spline edges: Bezier extraction (degree preserved) and
//! piecewise-cubic approximation of high-degree curves.

use vcad_kernel_math::{Point3, Transform, Vec3};

use crate::error::{BrepError, Result};

/// Knots closer than this are treated as the same value.
const KNOT_EPS: f64 = 1e-12;

// =============================================================================
// Knot vector utilities
// =============================================================================

fn knots_non_decreasing(knots: &[f64]) -> bool {
    knots.windows(2).all(|w| w[1] >= w[0])
}

/// Find the knot span index for parameter `t`.
///
/// Returns `i` such that `knots[i] <= t < knots[i+1]`, clamped to the valid
/// range `[degree, n]` where `n` is the last control point index.
fn find_span(knots: &[f64], n: usize, degree: usize, t: f64) -> usize {
    if t >= knots[n + 1] {
        return n;
    }
    if t <= knots[degree] {
        // Skip repeated knots so the span is non-empty.
        let mut span = degree;
        while span < n && knots[span + 1] <= t {
            span += 1;
        }
        return span;
    }
    let mut low = degree;
    let mut high = n + 1;
    let mut mid = (low + high) / 2;
    while t < knots[mid] || t >= knots[mid + 1] {
        if t < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }
    mid
}

/// Non-zero basis function values `N[span-degree..=span]` at `t`.
fn basis_functions(knots: &[f64], span: usize, degree: usize, t: f64) -> Vec<f64> {
    let mut n = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];
    n[0] = 1.0;

    for j in 1..=degree {
        left[j] = t - knots[span + 1 - j];
        right[j] = knots[span + j] - t;
        let mut saved = 0.0;
        for r in 0..j {
            let denom = right[r + 1] + left[j - r];
            let temp = if denom.abs() < 1e-30 { 0.0 } else { n[r] / denom };
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        n[j] = saved;
    }
    n
}

// =============================================================================
// B-spline curve
// =============================================================================

/// A non-rational B-spline curve in 3D.
#[derive(Debug, Clone, PartialEq)]
pub struct BSplineCurve {
    /// Control points in 3D.
    pub control_points: Vec<Point3>,
    /// Knot vector. Length = control_points.len() + degree + 1.
    pub knots: Vec<f64>,
    /// Polynomial degree (order = degree + 1).
    pub degree: usize,
}

impl BSplineCurve {
    /// Create a B-spline curve, validating the knot vector.
    pub fn new(control_points: Vec<Point3>, knots: Vec<f64>, degree: usize) -> Result<Self> {
        if degree == 0 {
            return Err(BrepError::InvalidDimensions(
                "B-spline degree must be at least 1".into(),
            ));
        }
        if control_points.len() < degree + 1 {
            return Err(BrepError::InvalidDimensions(format!(
                "degree {} B-spline needs at least {} control points, got {}",
                degree,
                degree + 1,
                control_points.len()
            )));
        }
        let expected = control_points.len() + degree + 1;
        if knots.len() != expected || !knots_non_decreasing(&knots) {
            return Err(BrepError::InvalidKnots {
                len: knots.len(),
                expected,
                points: control_points.len(),
                degree,
            });
        }
        Ok(Self {
            control_points,
            knots,
            degree,
        })
    }

    /// Create a clamped uniform B-spline over `[0, 1]`.
    pub fn clamped_uniform(control_points: Vec<Point3>, degree: usize) -> Result<Self> {
        let n = control_points.len();
        if n < degree + 1 {
            return Self::new(control_points, Vec::new(), degree);
        }
        let m = n + degree + 1;
        let mut knots = vec![0.0; m];
        let n_internal = m - 2 * (degree + 1);
        for i in 0..=degree {
            knots[m - 1 - i] = 1.0;
        }
        for i in 1..=n_internal {
            knots[degree + i] = i as f64 / (n_internal + 1) as f64;
        }
        Self::new(control_points, knots, degree)
    }

    /// Parameter domain `(t_min, t_max)`.
    pub fn parameter_domain(&self) -> (f64, f64) {
        (
            self.knots[self.degree],
            self.knots[self.control_points.len()],
        )
    }

    /// Evaluate the curve at parameter `t` using De Boor's algorithm.
    pub fn eval(&self, t: f64) -> Point3 {
        de_boor(&self.control_points, &self.knots, self.degree, t)
    }

    /// First derivative at `t`, evaluated on the hodograph.
    pub fn derivative(&self, t: f64) -> Vec3 {
        let p = self.degree;
        let n = self.control_points.len();
        let deltas: Vec<Point3> = (0..n - 1)
            .map(|i| {
                let span = self.knots[i + p + 1] - self.knots[i + 1];
                if span.abs() < KNOT_EPS {
                    Point3::origin()
                } else {
                    let d = (self.control_points[i + 1] - self.control_points[i])
                        * (p as f64 / span);
                    Point3::from(d)
                }
            })
            .collect();
        let knots = &self.knots[1..self.knots.len() - 1];
        de_boor(&deltas, knots, p - 1, t).coords
    }

    /// Apply an affine transform to the control points.
    pub fn transform(&self, t: &Transform) -> Self {
        Self {
            control_points: self.control_points.iter().map(|p| t.apply_point(p)).collect(),
            knots: self.knots.clone(),
            degree: self.degree,
        }
    }

    /// Multiplicity of knot value `u`.
    pub fn multiplicity(&self, u: f64) -> usize {
        self.knots.iter().filter(|k| (*k - u).abs() < KNOT_EPS).count()
    }

    /// Insert a knot value using Boehm's algorithm.
    ///
    /// Returns a new curve with one additional control point and the same
    /// shape.
    pub fn insert_knot(&self, t: f64) -> Self {
        let n = self.control_points.len() - 1;
        let p = self.degree;
        let span = find_span(&self.knots, n, p, t);

        let mut knots = Vec::with_capacity(self.knots.len() + 1);
        knots.extend_from_slice(&self.knots[..=span]);
        knots.push(t);
        knots.extend_from_slice(&self.knots[span + 1..]);

        let mut pts = Vec::with_capacity(self.control_points.len() + 1);
        pts.extend_from_slice(&self.control_points[..=span - p]);
        for i in (span - p + 1)..=span {
            let denom = self.knots[i + p] - self.knots[i];
            let alpha = if denom.abs() < 1e-30 {
                0.0
            } else {
                (t - self.knots[i]) / denom
            };
            let a = self.control_points[i - 1].coords;
            let b = self.control_points[i].coords;
            pts.push(Point3::from(a * (1.0 - alpha) + b * alpha));
        }
        pts.extend_from_slice(&self.control_points[span..]);

        Self {
            control_points: pts,
            knots,
            degree: p,
        }
    }

    /// Split the sub-range `[a, b]` into Bezier segments of the same degree.
    ///
    /// Every knot in `[a, b]` (including both ends) is raised to multiplicity
    /// `degree`; each resulting knot span is then one Bezier piece with
    /// `degree + 1` poles.
    pub fn bezier_segments(&self, a: f64, b: f64) -> Vec<Vec<Point3>> {
        let (lo, hi) = self.parameter_domain();
        let (a, b) = (a.max(lo), b.min(hi));
        if b - a <= KNOT_EPS {
            return Vec::new();
        }
        let p = self.degree;

        let mut breaks: Vec<f64> = vec![a];
        for &k in &self.knots {
            if k > a + KNOT_EPS
                && k < b - KNOT_EPS
                && breaks.last().map_or(true, |l| k - l > KNOT_EPS)
            {
                breaks.push(k);
            }
        }
        breaks.push(b);

        let mut refined = self.clone();
        for &u in &breaks {
            let have = refined.multiplicity(u);
            for _ in have..p {
                refined = refined.insert_knot(u);
            }
        }

        let n = refined.control_points.len() - 1;
        breaks
            .windows(2)
            .map(|w| {
                let mid = 0.5 * (w[0] + w[1]);
                let k = find_span(&refined.knots, n, p, mid);
                refined.control_points[k - p..=k].to_vec()
            })
            .collect()
    }

    /// Approximate `[a, b]` with cubic Bezier segments within `tolerance`.
    ///
    /// Each piece is the Hermite cubic matching the curve's end points and
    /// end tangents over a uniform parameter split. Segment counts from 1 to
    /// `max_segments` are tried in order; the first whose sampled deviation
    /// stays within `tolerance` wins.
    pub fn approximate_cubic(
        &self,
        a: f64,
        b: f64,
        tolerance: f64,
        max_segments: usize,
    ) -> Result<Vec<[Point3; 4]>> {
        let mut best = f64::INFINITY;
        let mut best_n = 0;
        for n in 1..=max_segments.max(1) {
            let h = (b - a) / n as f64;
            let mut segments = Vec::with_capacity(n);
            let mut deviation: f64 = 0.0;
            for i in 0..n {
                let t0 = a + h * i as f64;
                let t1 = if i + 1 == n { b } else { t0 + h };
                let p0 = self.eval(t0);
                let p3 = self.eval(t1);
                let p1 = p0 + self.derivative(t0) * (h / 3.0);
                let p2 = p3 - self.derivative(t1) * (h / 3.0);
                let seg = [p0, p1, p2, p3];
                for s in 1..10 {
                    let f = s as f64 / 10.0;
                    let d = (cubic_bezier(&seg, f) - self.eval(t0 + (t1 - t0) * f)).norm();
                    deviation = deviation.max(d);
                }
                segments.push(seg);
            }
            if deviation <= tolerance {
                return Ok(segments);
            }
            if deviation < best {
                best = deviation;
                best_n = n;
            }
        }
        Err(BrepError::ApproximationFailed {
            deviation: best,
            tolerance,
            segments: best_n,
        })
    }
}

fn de_boor(points: &[Point3], knots: &[f64], degree: usize, t: f64) -> Point3 {
    let n = points.len() - 1;
    let t = t.clamp(knots[degree], knots[n + 1]);
    let span = find_span(knots, n, degree, t);
    let basis = basis_functions(knots, span, degree, t);
    let mut acc = Vec3::zeros();
    for (i, b) in basis.iter().enumerate() {
        acc += points[span - degree + i].coords * *b;
    }
    Point3::from(acc)
}

/// Evaluate a cubic Bezier segment at `t ∈ [0, 1]`.
pub fn cubic_bezier(poles: &[Point3; 4], t: f64) -> Point3 {
    let s = 1.0 - t;
    let c = poles[0].coords * (s * s * s)
        + poles[1].coords * (3.0 * s * s * t)
        + poles[2].coords * (3.0 * s * t * t)
        + poles[3].coords * (t * t * t);
    Point3::from(c)
}

/// Evaluate a Bezier segment of any degree by De Casteljau.
pub fn bezier_eval(poles: &[Point3], t: f64) -> Point3 {
    let mut work: Vec<Vec3> = poles.iter().map(|p| p.coords).collect();
    for level in 1..work.len() {
        for i in 0..work.len() - level {
            work[i] = work[i] * (1.0 - t) + work[i + 1] * t;
        }
    }
    work.first().map(|v| Point3::from(*v)).unwrap_or_else(Point3::origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn wavy(degree: usize) -> BSplineCurve {
        let pts = (0..6)
            .map(|i| Point3::new(2.0 * i as f64, (i % 2) as f64, 0.0))
            .collect();
        BSplineCurve::clamped_uniform(pts, degree).unwrap()
    }

    #[test]
    fn test_bspline_line() {
        let pts = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)];
        let curve = BSplineCurve::new(pts, vec![0.0, 0.0, 1.0, 1.0], 1).unwrap();
        assert_relative_eq!(curve.eval(0.5).x, 5.0, epsilon = 1e-10);
        assert_relative_eq!(curve.derivative(0.3).x, 10.0, epsilon = 1e-10);
    }

    #[test]
    fn test_invalid_knots_rejected() {
        let pts = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        let err = BSplineCurve::new(pts.clone(), vec![0.0, 1.0, 1.0], 1).unwrap_err();
        assert!(matches!(err, BrepError::InvalidKnots { expected: 4, .. }));
        assert!(BSplineCurve::new(pts, vec![0.0, 0.0, 1.0, 1.0], 0).is_err());
    }

    #[test]
    fn test_clamped_endpoints() {
        let c = wavy(3);
        assert_relative_eq!(c.eval(0.0), Point3::new(0.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(c.eval(1.0), Point3::new(10.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let c = wavy(5);
        for &t in &[0.1, 0.37, 0.8] {
            let h = 1e-6;
            let fd = (c.eval(t + h) - c.eval(t - h)) / (2.0 * h);
            assert_relative_eq!(c.derivative(t), fd, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_insert_knot_preserves_shape() {
        let c = wavy(3);
        let refined = c.insert_knot(0.42);
        assert_eq!(refined.control_points.len(), c.control_points.len() + 1);
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            assert_relative_eq!(refined.eval(t), c.eval(t), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_bezier_segments_reproduce_curve() {
        let c = wavy(3);
        // Interior knots of a 6-point cubic: 1/3, 2/3.
        let segs = c.bezier_segments(0.1, 0.9);
        assert_eq!(segs.len(), 3);
        assert!(segs.iter().all(|s| s.len() == 4));
        assert_relative_eq!(segs[0][0], c.eval(0.1), epsilon = 1e-10);
        assert_relative_eq!(segs[2][3], c.eval(0.9), epsilon = 1e-10);
        // Midpoint of the middle segment sits at t = 0.5.
        assert_relative_eq!(bezier_eval(&segs[1], 0.5), c.eval(0.5), epsilon = 1e-10);
    }

    #[test]
    fn test_bezier_segments_quadratic() {
        let c = wavy(2);
        let segs = c.bezier_segments(0.0, 1.0);
        assert!(segs.iter().all(|s| s.len() == 3));
        assert_relative_eq!(segs.last().unwrap()[2], c.eval(1.0), epsilon = 1e-10);
    }

    #[test]
    fn test_approximate_quintic() {
        let c = wavy(5);
        let segs = c.approximate_cubic(0.0, 1.0, 1e-3, 10).unwrap();
        assert!(segs.len() <= 10);
        assert_relative_eq!(segs[0][0], c.eval(0.0), epsilon = 1e-12);
        assert_relative_eq!(segs.last().unwrap()[3], c.eval(1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_approximation_failure_reports_deviation() {
        let c = wavy(5);
        let err = c.approximate_cubic(0.0, 1.0, 1e-12, 1).unwrap_err();
        match err {
            BrepError::ApproximationFailed { segments, deviation, .. } => {
                assert_eq!(segments, 1);
                assert!(deviation > 1e-12);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
