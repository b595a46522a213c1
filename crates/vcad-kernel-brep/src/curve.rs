//! Edge curve geometry: lines, circles, ellipses, B-splines, and polylines.

use std::f64::consts::PI;
use vcad_kernel_math::{Dir3, Point3, Transform, Vec3};

use crate::bspline::BSplineCurve;

/// The kind of an edge curve (for match-based dispatch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveKind {
    /// Straight line segment.
    Line,
    /// Circle or circular arc.
    Circle,
    /// Ellipse or elliptical arc.
    Ellipse,
    /// Non-rational B-spline.
    BSpline,
    /// Discretized curve with no analytic form.
    Polyline,
}

// =============================================================================
// Line3d
// =============================================================================

/// A 3D line defined by origin and direction.
///
/// Parameterization: `P(t) = origin + t * direction`
#[derive(Debug, Clone, PartialEq)]
pub struct Line3d {
    /// Starting point.
    pub origin: Point3,
    /// Direction (not necessarily unit length; its magnitude sets the speed).
    pub direction: Vec3,
}

impl Line3d {
    /// Create a line from two endpoints, parameterized so `t=0` gives `start`
    /// and `t=1` gives `end`.
    pub fn from_points(start: Point3, end: Point3) -> Self {
        Self {
            origin: start,
            direction: end - start,
        }
    }
}

// =============================================================================
// Circle3d
// =============================================================================

/// A circle in 3D space.
///
/// Parameterization: `P(t) = center + radius * (cos(t) * x_dir + sin(t) * y_dir)`
///
/// The plane normal is `x_dir × y_dir`; it is derived rather than stored so
/// that mirrored circles keep a consistent parameterization.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle3d {
    /// Center of the circle.
    pub center: Point3,
    /// Radius.
    pub radius: f64,
    /// Reference direction for t=0.
    pub x_dir: Dir3,
    /// Direction for t=π/2.
    pub y_dir: Dir3,
}

impl Circle3d {
    /// Create a circle in the XY plane centered at the given point.
    pub fn new(center: Point3, radius: f64) -> Self {
        Self {
            center,
            radius,
            x_dir: Dir3::new_normalize(Vec3::x()),
            y_dir: Dir3::new_normalize(Vec3::y()),
        }
    }

    /// Create a circle with a custom normal direction.
    pub fn with_normal(center: Point3, radius: f64, normal: Vec3) -> Self {
        let n = Dir3::new_normalize(normal);
        let arbitrary = if n.as_ref().x.abs() < 0.9 {
            Vec3::x()
        } else {
            Vec3::y()
        };
        let y = Dir3::new_normalize(n.as_ref().cross(&arbitrary));
        let x = Dir3::new_normalize(y.as_ref().cross(n.as_ref()));
        Self {
            center,
            radius,
            x_dir: x,
            y_dir: y,
        }
    }

    /// Unit normal of the circle plane.
    pub fn normal(&self) -> Vec3 {
        self.x_dir.as_ref().cross(self.y_dir.as_ref())
    }
}

// =============================================================================
// Ellipse3d
// =============================================================================

/// An ellipse in 3D space.
///
/// Parameterization:
/// `P(t) = center + major_radius * cos(t) * x_dir + minor_radius * sin(t) * y_dir`
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse3d {
    /// Center of the ellipse.
    pub center: Point3,
    /// Semi-axis along `x_dir`.
    pub major_radius: f64,
    /// Semi-axis along `y_dir`.
    pub minor_radius: f64,
    /// Major axis direction.
    pub x_dir: Dir3,
    /// Minor axis direction.
    pub y_dir: Dir3,
}

// =============================================================================
// EdgeCurve
// =============================================================================

/// The 3D geometry carried by a topological edge.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeCurve {
    /// Straight line.
    Line(Line3d),
    /// Circle.
    Circle(Circle3d),
    /// Ellipse.
    Ellipse(Ellipse3d),
    /// B-spline of any degree.
    BSpline(BSplineCurve),
    /// Discretized curve; parameter `i` is the i-th point, fractional
    /// parameters interpolate linearly.
    Polyline(Vec<Point3>),
}

impl EdgeCurve {
    /// The kind of this curve.
    pub fn kind(&self) -> CurveKind {
        match self {
            EdgeCurve::Line(_) => CurveKind::Line,
            EdgeCurve::Circle(_) => CurveKind::Circle,
            EdgeCurve::Ellipse(_) => CurveKind::Ellipse,
            EdgeCurve::BSpline(_) => CurveKind::BSpline,
            EdgeCurve::Polyline(_) => CurveKind::Polyline,
        }
    }

    /// Natural parameter domain of the curve.
    pub fn domain(&self) -> (f64, f64) {
        match self {
            EdgeCurve::Line(_) => (0.0, 1.0),
            EdgeCurve::Circle(_) | EdgeCurve::Ellipse(_) => (0.0, 2.0 * PI),
            EdgeCurve::BSpline(c) => c.parameter_domain(),
            EdgeCurve::Polyline(pts) => (0.0, pts.len().saturating_sub(1) as f64),
        }
    }

    /// Evaluate the curve at parameter `t`.
    pub fn evaluate(&self, t: f64) -> Point3 {
        match self {
            EdgeCurve::Line(l) => l.origin + t * l.direction,
            EdgeCurve::Circle(c) => {
                let (sin_t, cos_t) = t.sin_cos();
                c.center + c.radius * (cos_t * c.x_dir.as_ref() + sin_t * c.y_dir.as_ref())
            }
            EdgeCurve::Ellipse(e) => {
                let (sin_t, cos_t) = t.sin_cos();
                e.center
                    + e.major_radius * cos_t * e.x_dir.as_ref()
                    + e.minor_radius * sin_t * e.y_dir.as_ref()
            }
            EdgeCurve::BSpline(c) => c.eval(t),
            EdgeCurve::Polyline(pts) => polyline_eval(pts, t),
        }
    }

    /// First derivative at parameter `t`.
    pub fn derivative(&self, t: f64) -> Vec3 {
        match self {
            EdgeCurve::Line(l) => l.direction,
            EdgeCurve::Circle(c) => {
                let (sin_t, cos_t) = t.sin_cos();
                c.radius * (-sin_t * c.x_dir.as_ref() + cos_t * c.y_dir.as_ref())
            }
            EdgeCurve::Ellipse(e) => {
                let (sin_t, cos_t) = t.sin_cos();
                -e.major_radius * sin_t * e.x_dir.as_ref()
                    + e.minor_radius * cos_t * e.y_dir.as_ref()
            }
            EdgeCurve::BSpline(c) => c.derivative(t),
            EdgeCurve::Polyline(pts) => {
                if pts.len() < 2 {
                    return Vec3::zeros();
                }
                let i = (t.floor().max(0.0) as usize).min(pts.len() - 2);
                pts[i + 1] - pts[i]
            }
        }
    }

    /// Sample `segments + 1` points uniformly over `[t0, t1]`.
    ///
    /// Lines only need their two endpoints; polylines return their own
    /// vertices inside the range.
    pub fn sample(&self, t0: f64, t1: f64, segments: usize) -> Vec<Point3> {
        match self {
            EdgeCurve::Line(_) => vec![self.evaluate(t0), self.evaluate(t1)],
            EdgeCurve::Polyline(pts) => polyline_slice(pts, t0, t1),
            _ => {
                let n = segments.max(1);
                (0..=n)
                    .map(|i| self.evaluate(t0 + (t1 - t0) * i as f64 / n as f64))
                    .collect()
            }
        }
    }

    /// Apply a similarity transform (rotation, uniform scale, mirror, translation).
    pub fn transform(&self, t: &Transform) -> EdgeCurve {
        match self {
            EdgeCurve::Line(l) => EdgeCurve::Line(Line3d {
                origin: t.apply_point(&l.origin),
                direction: t.apply_vec(&l.direction),
            }),
            EdgeCurve::Circle(c) => {
                let s = t.scale_factor();
                EdgeCurve::Circle(Circle3d {
                    center: t.apply_point(&c.center),
                    radius: c.radius * s,
                    x_dir: Dir3::new_normalize(t.apply_vec(c.x_dir.as_ref())),
                    y_dir: Dir3::new_normalize(t.apply_vec(c.y_dir.as_ref())),
                })
            }
            EdgeCurve::Ellipse(e) => {
                let s = t.scale_factor();
                EdgeCurve::Ellipse(Ellipse3d {
                    center: t.apply_point(&e.center),
                    major_radius: e.major_radius * s,
                    minor_radius: e.minor_radius * s,
                    x_dir: Dir3::new_normalize(t.apply_vec(e.x_dir.as_ref())),
                    y_dir: Dir3::new_normalize(t.apply_vec(e.y_dir.as_ref())),
                })
            }
            EdgeCurve::BSpline(c) => EdgeCurve::BSpline(c.transform(t)),
            EdgeCurve::Polyline(pts) => {
                EdgeCurve::Polyline(pts.iter().map(|p| t.apply_point(p)).collect())
            }
        }
    }
}

fn polyline_eval(pts: &[Point3], t: f64) -> Point3 {
    match pts.len() {
        0 => Point3::origin(),
        1 => pts[0],
        n => {
            let t = t.clamp(0.0, (n - 1) as f64);
            let i = (t.floor() as usize).min(n - 2);
            let f = t - i as f64;
            pts[i] + f * (pts[i + 1] - pts[i])
        }
    }
}

/// Points of a polyline between parameters `t0` and `t1`, endpoints included.
fn polyline_slice(pts: &[Point3], t0: f64, t1: f64) -> Vec<Point3> {
    let mut out = vec![polyline_eval(pts, t0)];
    let (lo, hi) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
    let mut inner: Vec<Point3> = pts
        .iter()
        .enumerate()
        .filter(|(i, _)| (*i as f64) > lo && (*i as f64) < hi)
        .map(|(_, p)| *p)
        .collect();
    if t0 > t1 {
        inner.reverse();
    }
    out.extend(inner);
    out.push(polyline_eval(pts, t1));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_line_evaluate() {
        let line = EdgeCurve::Line(Line3d::from_points(
            Point3::origin(),
            Point3::new(10.0, 0.0, 0.0),
        ));
        assert_relative_eq!(line.evaluate(0.5).x, 5.0);
        assert_eq!(line.sample(0.0, 1.0, 16).len(), 2);
    }

    #[test]
    fn test_circle_with_normal_is_right_handed() {
        let c = Circle3d::with_normal(Point3::origin(), 2.0, Vec3::new(0.0, 0.0, 3.0));
        assert_relative_eq!(c.normal(), Vec3::z(), epsilon = 1e-12);
        let curve = EdgeCurve::Circle(c);
        let p = curve.evaluate(0.0);
        assert_relative_eq!((p - Point3::origin()).norm(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_circle_transform_scales_radius() {
        let curve = EdgeCurve::Circle(Circle3d::new(Point3::new(1.0, 0.0, 0.0), 1.0));
        let t = Transform::uniform_scale(3.0);
        match curve.transform(&t) {
            EdgeCurve::Circle(c) => {
                assert_relative_eq!(c.radius, 3.0, epsilon = 1e-12);
                assert_relative_eq!(c.center.x, 3.0, epsilon = 1e-12);
            }
            other => panic!("expected circle, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_mirrored_circle_keeps_points() {
        let curve = EdgeCurve::Circle(Circle3d::new(Point3::origin(), 1.0));
        let m = Transform::mirror(&Dir3::new_normalize(Vec3::y()));
        let mirrored = curve.transform(&m);
        for i in 0..8 {
            let t = i as f64 * PI / 4.0;
            let expected = m.apply_point(&curve.evaluate(t));
            assert_relative_eq!(mirrored.evaluate(t), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_polyline_slice() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
        ];
        let curve = EdgeCurve::Polyline(pts);
        assert_eq!(curve.domain(), (0.0, 3.0));
        let slice = curve.sample(0.5, 2.5, 8);
        assert_eq!(slice.len(), 4);
        assert_relative_eq!(slice[0].x, 0.5);
        assert_relative_eq!(slice[3].x, 2.5);
    }
}
