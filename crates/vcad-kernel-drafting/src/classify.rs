//! Typed 2D geometry from projected 3D curves.
//!
//! Conics are classified by projecting a pair of conjugate semi-diameters:
//! the image of `P(t) = c + cos(t)·A + sin(t)·B` is an ellipse whose semi-axes
//! are the singular values of the 2×2 matrix `[A B]`. Equal singular values
//! give a circle, a vanishing minor one an edge-on conic drawn as a
//! polyline.
//!
//! Splines keep their degree where the drawing side can represent it
//! (Bezier segments of degree 1 to 3); higher degrees are approximated by
//! cubics.

use std::f64::consts::PI;

use log::warn;
use vcad_kernel_brep::{BSplineCurve, EdgeCurve};
use vcad_kernel_hlr::Projector;
use vcad_kernel_math::{Point3, Vec3};

use crate::error::DraftingError;
use crate::types::{ArcData, BaseGeom, BezierSegment, Circle2d, Ellipse2d, Point2D};

/// Squared start/end distance, relative to the squared major radius, under
/// which a conic counts as closed.
const CLOSED_DISTANCE_SQ: f64 = 0.001;
/// Minimum parameter span (radians) of a full conic.
const CLOSED_MIN_SPAN: f64 = 1.0;
/// 3D tolerance of the cubic spline approximation.
const CUBIC_TOLERANCE: f64 = 0.001;
/// Segment limit of the cubic spline approximation.
const CUBIC_MAX_SEGMENTS: usize = 10;
/// Samples used when a curve falls back to a polyline.
const FALLBACK_SAMPLES: usize = 64;

/// A projected conic: centre, semi-axes `sigma1 >= sigma2`, and major axis angle.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Conic2 {
    center: Point2D,
    sigma1: f64,
    sigma2: f64,
    theta: f64,
}

/// Project the conic `center + cos(t)·a + sin(t)·b`.
fn project_conic(projector: &Projector, center: &Point3, a: &Vec3, b: &Vec3) -> Conic2 {
    let c = projector.project(center);
    let pa = projector.project(&(center + a)) - c;
    let pb = projector.project(&(center + b)) - c;
    // M·Mᵀ for M = [pa pb]
    let m11 = pa.x * pa.x + pb.x * pb.x;
    let m12 = pa.x * pa.y + pb.x * pb.y;
    let m22 = pa.y * pa.y + pb.y * pb.y;
    let mean = 0.5 * (m11 + m22);
    let radius = (0.25 * (m11 - m22).powi(2) + m12 * m12).sqrt();
    Conic2 {
        center: c.into(),
        sigma1: (mean + radius).max(0.0).sqrt(),
        sigma2: (mean - radius).max(0.0).sqrt(),
        theta: 0.5 * (2.0 * m12).atan2(m11 - m22),
    }
}

/// Angle in degrees normalized to `[0, 360)`.
fn normalize_degrees(rad: f64) -> f64 {
    let d = rad.to_degrees().rem_euclid(360.0);
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}

fn cross(o: &Point2D, a: &Point2D, b: &Point2D) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Project a curve's parameter sub-range into drawing geometry.
///
/// `curve` is in kernel space. `polygon`, when given, is a discretization of
/// exactly `range` and is reused for polyline output instead of resampling.
pub fn classify(
    curve: &EdgeCurve,
    range: (f64, f64),
    polygon: Option<&[Point3]>,
    projector: &Projector,
) -> BaseGeom {
    match curve {
        EdgeCurve::Line(_) => BaseGeom::Generic {
            points: vec![
                projector.project(&curve.evaluate(range.0)).into(),
                projector.project(&curve.evaluate(range.1)).into(),
            ],
        },
        EdgeCurve::Circle(c) => {
            let a = c.radius * c.x_dir.into_inner();
            let b = c.radius * c.y_dir.into_inner();
            let conic = project_conic(projector, &c.center, &a, &b);
            classify_conic(curve, range, polygon, projector, conic)
        }
        EdgeCurve::Ellipse(e) => {
            let a = e.major_radius * e.x_dir.into_inner();
            let b = e.minor_radius * e.y_dir.into_inner();
            let conic = project_conic(projector, &e.center, &a, &b);
            classify_conic(curve, range, polygon, projector, conic)
        }
        EdgeCurve::BSpline(spline) => classify_spline(curve, spline, range, polygon, projector),
        EdgeCurve::Polyline(_) => polyline(curve, range, polygon, projector),
    }
}

fn polyline(
    curve: &EdgeCurve,
    range: (f64, f64),
    polygon: Option<&[Point3]>,
    projector: &Projector,
) -> BaseGeom {
    let pts = match polygon {
        Some(p) if p.len() >= 2 => p.to_vec(),
        _ => curve.sample(range.0, range.1, FALLBACK_SAMPLES),
    };
    BaseGeom::Generic {
        points: pts.iter().map(|p| projector.project(p).into()).collect(),
    }
}

fn classify_conic(
    curve: &EdgeCurve,
    range: (f64, f64),
    polygon: Option<&[Point3]>,
    projector: &Projector,
    conic: Conic2,
) -> BaseGeom {
    let scale = conic.sigma1.max(f64::MIN_POSITIVE);
    if conic.sigma2 <= 1e-9 * scale {
        // Seen edge-on.
        return polyline(curve, range, polygon, projector);
    }
    let is_circle = (conic.sigma1 - conic.sigma2) <= 1e-9 * scale;

    let (t0, t1) = range;
    let start: Point2D = projector.project(&curve.evaluate(t0)).into();
    let end: Point2D = projector.project(&curve.evaluate(t1)).into();
    let span = (t1 - t0).abs();
    let closed = start.distance_squared(&end) < CLOSED_DISTANCE_SQ * scale * scale
        && span > CLOSED_MIN_SPAN;

    let circle = Circle2d {
        center: conic.center,
        radius: 0.5 * (conic.sigma1 + conic.sigma2),
    };
    let ellipse = Ellipse2d {
        center: conic.center,
        major_radius: conic.sigma1,
        minor_radius: conic.sigma2,
        rotation: conic.theta,
    };
    if closed {
        return if is_circle {
            BaseGeom::Circle(circle)
        } else {
            BaseGeom::Ellipse(ellipse)
        };
    }

    let midpoint: Point2D = projector.project(&curve.evaluate(0.5 * (t0 + t1))).into();
    let angle_of = |p: &Point2D| -> f64 {
        let (dx, dy) = (p.x - conic.center.x, p.y - conic.center.y);
        if is_circle {
            normalize_degrees(dy.atan2(dx))
        } else {
            let (s, c) = conic.theta.sin_cos();
            let (lx, ly) = (dx * c + dy * s, -dx * s + dy * c);
            normalize_degrees((ly / conic.sigma2).atan2(lx / conic.sigma1))
        }
    };
    let arc = ArcData {
        start_angle: angle_of(&start),
        end_angle: angle_of(&end),
        start_point: start,
        end_point: end,
        midpoint,
        clockwise: cross(&midpoint, &start, &end) > 0.0,
        large_arc: span > PI,
    };
    if is_circle {
        BaseGeom::ArcOfCircle { circle, arc }
    } else {
        BaseGeom::ArcOfEllipse { ellipse, arc }
    }
}

fn classify_spline(
    curve: &EdgeCurve,
    spline: &BSplineCurve,
    range: (f64, f64),
    polygon: Option<&[Point3]>,
    projector: &Projector,
) -> BaseGeom {
    let project_all = |poles: &[Point3]| BezierSegment {
        poles: poles.iter().map(|p| projector.project(p).into()).collect(),
    };
    if spline.degree <= 3 {
        let segments: Vec<BezierSegment> = spline
            .bezier_segments(range.0, range.1)
            .iter()
            .map(|poles| project_all(poles))
            .collect();
        if segments.is_empty() {
            return polyline(curve, range, polygon, projector);
        }
        return BaseGeom::BSpline { segments };
    }
    match spline.approximate_cubic(range.0, range.1, CUBIC_TOLERANCE, CUBIC_MAX_SEGMENTS) {
        Ok(cubics) => BaseGeom::BSpline {
            segments: cubics.iter().map(|poles| project_all(poles)).collect(),
        },
        Err(e) => {
            let err = DraftingError::CurveApproximationFailure(e);
            warn!("degree {} spline drawn as polyline: {err}", spline.degree);
            polyline(curve, range, polygon, projector)
        }
    }
}
