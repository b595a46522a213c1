//! Core types for projected drawing geometry.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Reference value for geometry that could not be tied to a topological entity.
pub const UNKNOWN_REFERENCE: i32 = -1;

/// A 2D point for serializable drafting output.
///
/// We use a custom type instead of nalgebra::Point2 to enable serde serialization
/// without requiring nalgebra's serde feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point2D {
    /// Create a new 2D point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin point (0, 0).
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Distance to another point.
    pub fn distance(&self, other: &Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Squared distance to another point.
    pub fn distance_squared(&self, other: &Self) -> f64 {
        (self.x - other.x).powi(2) + (self.y - other.y).powi(2)
    }

    /// Point at `radius` from `self` in the direction `angle` (radians).
    pub fn polar(&self, radius: f64, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(self.x + radius * c, self.y + radius * s)
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl From<vcad_kernel_math::Point2> for Point2D {
    fn from(p: vcad_kernel_math::Point2) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<Point2D> for vcad_kernel_math::Point2 {
    fn from(p: Point2D) -> Self {
        vcad_kernel_math::Point2::new(p.x, p.y)
    }
}

/// 2D axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2D {
    /// Minimum X coordinate.
    pub min_x: f64,
    /// Minimum Y coordinate.
    pub min_y: f64,
    /// Maximum X coordinate.
    pub max_x: f64,
    /// Maximum Y coordinate.
    pub max_y: f64,
}

impl BoundingBox2D {
    /// Create an empty bounding box.
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Expand the bounding box to include a point.
    pub fn include_point(&mut self, p: Point2D) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center of the bounding box.
    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Check if the bounding box is valid (non-empty).
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }
}

impl Default for BoundingBox2D {
    fn default() -> Self {
        Self::empty()
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// How an edge should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtractType {
    /// Visible sharp edge.
    Plain,
    /// Hidden edge (dashed).
    WithHidden,
    /// Visible tangent-continuous edge (thin).
    WithSmooth,
}

/// Discriminant of [`BaseGeom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeomKind {
    /// Polyline.
    Generic,
    /// Full circle.
    Circle,
    /// Circular arc.
    ArcOfCircle,
    /// Full ellipse.
    Ellipse,
    /// Elliptical arc.
    ArcOfEllipse,
    /// Piecewise Bezier curve.
    BSpline,
}

/// A circle in the drawing plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle2d {
    /// Center.
    pub center: Point2D,
    /// Radius.
    pub radius: f64,
}

/// An ellipse in the drawing plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipse2d {
    /// Center.
    pub center: Point2D,
    /// Semi-major axis.
    pub major_radius: f64,
    /// Semi-minor axis.
    pub minor_radius: f64,
    /// Angle of the major axis to the drawing X axis, in radians.
    pub rotation: f64,
}

impl Ellipse2d {
    /// Point at parametric angle `phi` (radians).
    pub fn point_at(&self, phi: f64) -> Point2D {
        let (sr, cr) = self.rotation.sin_cos();
        let (sp, cp) = phi.sin_cos();
        let (lx, ly) = (self.major_radius * cp, self.minor_radius * sp);
        Point2D::new(
            self.center.x + lx * cr - ly * sr,
            self.center.y + lx * sr + ly * cr,
        )
    }
}

/// Trim data of an arc.
///
/// Angles are in degrees in `[0, 360)`. For circular arcs they are polar
/// angles about the center; for elliptical arcs they are parametric angles
/// in the ellipse's own frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcData {
    /// Angle at the start point.
    pub start_angle: f64,
    /// Angle at the end point.
    pub end_angle: f64,
    /// First point of the arc.
    pub start_point: Point2D,
    /// Last point of the arc.
    pub end_point: Point2D,
    /// Point halfway along the arc.
    pub midpoint: Point2D,
    /// `(start - mid) × (end - mid) > 0`.
    pub clockwise: bool,
    /// Swept angle exceeds 180°.
    pub large_arc: bool,
}

impl ArcData {
    /// Signed swept angle in degrees; negative when clockwise.
    pub fn sweep(&self) -> f64 {
        let sweep = if self.clockwise {
            -(self.start_angle - self.end_angle).rem_euclid(360.0)
        } else {
            (self.end_angle - self.start_angle).rem_euclid(360.0)
        };
        if self.large_arc && sweep.abs() < 180.0 {
            // Nearly closed arcs wrap to a full turn.
            sweep + 360.0f64.copysign(sweep)
        } else {
            sweep
        }
    }

    fn reversed(&self) -> Self {
        Self {
            start_angle: self.end_angle,
            end_angle: self.start_angle,
            start_point: self.end_point,
            end_point: self.start_point,
            midpoint: self.midpoint,
            clockwise: !self.clockwise,
            large_arc: self.large_arc,
        }
    }
}

/// One Bezier piece of a projected spline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BezierSegment {
    /// Control points; 2 to 4 of them.
    pub poles: Vec<Point2D>,
}

impl BezierSegment {
    /// Evaluate by De Casteljau.
    pub fn evaluate(&self, t: f64) -> Point2D {
        let mut work = self.poles.clone();
        for level in 1..work.len() {
            for i in 0..work.len() - level {
                work[i] = Point2D::new(
                    work[i].x * (1.0 - t) + work[i + 1].x * t,
                    work[i].y * (1.0 - t) + work[i + 1].y * t,
                );
            }
        }
        work.first().copied().unwrap_or_default()
    }
}

/// Typed 2D drawing geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BaseGeom {
    /// Polyline through the points.
    Generic {
        /// Vertices in order.
        points: Vec<Point2D>,
    },
    /// Full circle.
    Circle(Circle2d),
    /// Circular arc.
    ArcOfCircle {
        /// Supporting circle.
        circle: Circle2d,
        /// Trim.
        arc: ArcData,
    },
    /// Full ellipse.
    Ellipse(Ellipse2d),
    /// Elliptical arc.
    ArcOfEllipse {
        /// Supporting ellipse.
        ellipse: Ellipse2d,
        /// Trim.
        arc: ArcData,
    },
    /// Chain of Bezier segments.
    BSpline {
        /// Segments in order; each ends where the next begins.
        segments: Vec<BezierSegment>,
    },
}

/// Points used to discretize a full turn.
const FULL_TURN_SAMPLES: usize = 64;
/// Points per Bezier segment.
const BEZIER_SAMPLES: usize = 16;

impl BaseGeom {
    /// The variant of this geometry.
    pub fn kind(&self) -> GeomKind {
        match self {
            BaseGeom::Generic { .. } => GeomKind::Generic,
            BaseGeom::Circle(_) => GeomKind::Circle,
            BaseGeom::ArcOfCircle { .. } => GeomKind::ArcOfCircle,
            BaseGeom::Ellipse(_) => GeomKind::Ellipse,
            BaseGeom::ArcOfEllipse { .. } => GeomKind::ArcOfEllipse,
            BaseGeom::BSpline { .. } => GeomKind::BSpline,
        }
    }

    /// First point.
    pub fn start_point(&self) -> Point2D {
        match self {
            BaseGeom::Generic { points } => points.first().copied().unwrap_or_default(),
            BaseGeom::Circle(c) => c.center.polar(c.radius, 0.0),
            BaseGeom::Ellipse(e) => e.point_at(0.0),
            BaseGeom::ArcOfCircle { arc, .. } | BaseGeom::ArcOfEllipse { arc, .. } => {
                arc.start_point
            }
            BaseGeom::BSpline { segments } => segments
                .first()
                .and_then(|s| s.poles.first())
                .copied()
                .unwrap_or_default(),
        }
    }

    /// Last point.
    pub fn end_point(&self) -> Point2D {
        match self {
            BaseGeom::Generic { points } => points.last().copied().unwrap_or_default(),
            BaseGeom::Circle(_) | BaseGeom::Ellipse(_) => self.start_point(),
            BaseGeom::ArcOfCircle { arc, .. } | BaseGeom::ArcOfEllipse { arc, .. } => {
                arc.end_point
            }
            BaseGeom::BSpline { segments } => segments
                .last()
                .and_then(|s| s.poles.last())
                .copied()
                .unwrap_or_default(),
        }
    }

    /// Full conics are closed; anything else is closed when its ends meet
    /// within `tolerance`.
    pub fn is_closed(&self, tolerance: f64) -> bool {
        match self {
            BaseGeom::Circle(_) | BaseGeom::Ellipse(_) => true,
            _ => self.start_point().distance(&self.end_point()) < tolerance,
        }
    }

    /// The same geometry traversed in the opposite direction.
    pub fn reversed(&self) -> BaseGeom {
        match self {
            BaseGeom::Generic { points } => BaseGeom::Generic {
                points: points.iter().rev().copied().collect(),
            },
            BaseGeom::Circle(_) | BaseGeom::Ellipse(_) => self.clone(),
            BaseGeom::ArcOfCircle { circle, arc } => BaseGeom::ArcOfCircle {
                circle: *circle,
                arc: arc.reversed(),
            },
            BaseGeom::ArcOfEllipse { ellipse, arc } => BaseGeom::ArcOfEllipse {
                ellipse: *ellipse,
                arc: arc.reversed(),
            },
            BaseGeom::BSpline { segments } => BaseGeom::BSpline {
                segments: segments
                    .iter()
                    .rev()
                    .map(|s| BezierSegment {
                        poles: s.poles.iter().rev().copied().collect(),
                    })
                    .collect(),
            },
        }
    }

    /// Discretize into a polyline from start to end.
    pub fn points(&self) -> Vec<Point2D> {
        match self {
            BaseGeom::Generic { points } => points.clone(),
            BaseGeom::Circle(c) => (0..=FULL_TURN_SAMPLES)
                .map(|i| c.center.polar(c.radius, 2.0 * PI * i as f64 / FULL_TURN_SAMPLES as f64))
                .collect(),
            BaseGeom::Ellipse(e) => (0..=FULL_TURN_SAMPLES)
                .map(|i| e.point_at(2.0 * PI * i as f64 / FULL_TURN_SAMPLES as f64))
                .collect(),
            BaseGeom::ArcOfCircle { circle, arc } => {
                arc_points(arc, |a| circle.center.polar(circle.radius, a))
            }
            BaseGeom::ArcOfEllipse { ellipse, arc } => arc_points(arc, |a| ellipse.point_at(a)),
            BaseGeom::BSpline { segments } => {
                let mut out: Vec<Point2D> = Vec::new();
                for seg in segments {
                    let skip = usize::from(!out.is_empty());
                    out.extend(
                        (skip..=BEZIER_SAMPLES)
                            .map(|i| seg.evaluate(i as f64 / BEZIER_SAMPLES as f64)),
                    );
                }
                out
            }
        }
    }

    /// Grow `bbox` by this geometry's extent.
    ///
    /// Conics are exact: arcs contribute their end points and the axis
    /// extremes inside their sweep. Splines use their control polygon.
    pub fn extents(&self, bbox: &mut BoundingBox2D) {
        match self {
            BaseGeom::Generic { points } => points.iter().for_each(|p| bbox.include_point(*p)),
            BaseGeom::Circle(c) => {
                let extremes = extreme_angles(c.radius, c.radius, 0.0);
                include_conic(bbox, None, extremes, |a| c.center.polar(c.radius, a))
            }
            BaseGeom::ArcOfCircle { circle: c, arc } => {
                let extremes = extreme_angles(c.radius, c.radius, 0.0);
                include_conic(bbox, Some(arc), extremes, |a| c.center.polar(c.radius, a))
            }
            BaseGeom::Ellipse(e) => {
                let extremes = extreme_angles(e.major_radius, e.minor_radius, e.rotation);
                include_conic(bbox, None, extremes, |a| e.point_at(a))
            }
            BaseGeom::ArcOfEllipse { ellipse: e, arc } => {
                let extremes = extreme_angles(e.major_radius, e.minor_radius, e.rotation);
                include_conic(bbox, Some(arc), extremes, |a| e.point_at(a))
            }
            BaseGeom::BSpline { segments } => segments
                .iter()
                .flat_map(|s| s.poles.iter())
                .for_each(|p| bbox.include_point(*p)),
        }
    }
}

/// Parameters (radians) at which the conic `(a cos φ, b sin φ)`, rotated by
/// `rotation`, reaches its x and y extremes.
fn extreme_angles(a: f64, b: f64, rotation: f64) -> [f64; 4] {
    let (s, c) = rotation.sin_cos();
    let phi_x = (-b * s).atan2(a * c);
    let phi_y = (b * c).atan2(a * s);
    [phi_x, phi_x + PI, phi_y, phi_y + PI]
}

/// Grow `bbox` by a whole conic, or by the part of it `arc` sweeps.
fn include_conic(
    bbox: &mut BoundingBox2D,
    arc: Option<&ArcData>,
    extremes: [f64; 4],
    at: impl Fn(f64) -> Point2D,
) {
    let Some(arc) = arc else {
        extremes.iter().for_each(|&phi| bbox.include_point(at(phi)));
        return;
    };
    bbox.include_point(arc.start_point);
    bbox.include_point(arc.end_point);
    let sweep = arc.sweep();
    for phi in extremes {
        let offset = if sweep >= 0.0 {
            (phi.to_degrees() - arc.start_angle).rem_euclid(360.0)
        } else {
            (arc.start_angle - phi.to_degrees()).rem_euclid(360.0)
        };
        if offset <= sweep.abs() {
            bbox.include_point(at(phi));
        }
    }
}

/// Sample an arc given a point function of the angle in radians.
fn arc_points(arc: &ArcData, at: impl Fn(f64) -> Point2D) -> Vec<Point2D> {
    let sweep = arc.sweep();
    let n = ((sweep.abs() / 360.0 * FULL_TURN_SAMPLES as f64).ceil() as usize).max(2);
    let start = arc.start_angle.to_radians();
    let mut pts: Vec<Point2D> = (0..=n)
        .map(|i| at(start + (sweep * i as f64 / n as f64).to_radians()))
        .collect();
    pts[0] = arc.start_point;
    pts[n] = arc.end_point;
    pts
}

/// One projected edge and how to draw it.
///
/// The draw style is fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge2d {
    geom: BaseGeom,
    extract_type: ExtractType,
}

impl Edge2d {
    /// Wrap geometry with a draw style.
    pub fn new(geom: BaseGeom, extract_type: ExtractType) -> Self {
        Self { geom, extract_type }
    }

    /// The geometry.
    pub fn geom(&self) -> &BaseGeom {
        &self.geom
    }

    /// The draw style.
    pub fn extract_type(&self) -> ExtractType {
        self.extract_type
    }

    /// True for hidden-line geometry.
    pub fn is_hidden(&self) -> bool {
        self.extract_type == ExtractType::WithHidden
    }
}

/// A projected vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Drawing position.
    pub point: Point2D,
}

/// An ordered chain of geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    /// Geometry in traversal order.
    pub geoms: Vec<BaseGeom>,
}

impl Wire {
    /// True when the chain ends where it starts.
    pub fn is_closed(&self, tolerance: f64) -> bool {
        match (self.geoms.first(), self.geoms.last()) {
            (Some(g), _) if self.geoms.len() == 1 => g.is_closed(tolerance),
            (Some(first), Some(last)) => {
                first.start_point().distance(&last.end_point()) < tolerance
            }
            _ => false,
        }
    }

    /// Continuous point sequence along the wire.
    pub fn points(&self) -> Vec<Point2D> {
        let mut out: Vec<Point2D> = Vec::new();
        for g in &self.geoms {
            let pts = g.points();
            let skip = usize::from(!out.is_empty());
            out.extend(pts.into_iter().skip(skip));
        }
        out
    }

    /// Unsigned area enclosed by the wire's point sequence.
    pub fn area(&self) -> f64 {
        let pts = self.points();
        let twice: f64 = pts
            .iter()
            .zip(pts.iter().cycle().skip(1))
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum();
        0.5 * twice.abs()
    }
}

/// A projected face: outer wire first, then holes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Face {
    /// Boundary wires.
    pub wires: Vec<Wire>,
}
