//! Builders for standard shapes: box, cylinder, and single-spline wire.

use std::f64::consts::PI;
use vcad_kernel_math::{Dir3, Point3, Tolerance, Vec3};

use crate::bspline::BSplineCurve;
use crate::curve::{Circle3d, EdgeCurve, Line3d};
use crate::error::{BrepError, Result};
use crate::shape::{Continuity, Shape};
use crate::surface::{CylinderSurface, FaceSurface, Plane};

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(BrepError::InvalidDimensions(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

/// Build a box with corner at origin and dimensions `(sx, sy, sz)`.
///
/// 8 vertices, 12 line edges, 6 planar faces with outward normals.
/// Vertex layout (1-based):
/// ```text
///     v5----v6
///    /|    /|
///   v8----v7|    z
///   | v1--|-v2   | y
///   |/    |/     |/
///   v4----v3     +---x
/// ```
/// Edges 1-4 run around the bottom, 5-8 around the top, 9-12 are the
/// verticals. Faces are ordered bottom, top, front, back, left, right.
pub fn make_box(sx: f64, sy: f64, sz: f64) -> Result<Shape> {
    check_positive("sx", sx)?;
    check_positive("sy", sy)?;
    check_positive("sz", sz)?;

    let corners = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(sx, 0.0, 0.0),
        Point3::new(sx, sy, 0.0),
        Point3::new(0.0, sy, 0.0),
        Point3::new(0.0, 0.0, sz),
        Point3::new(sx, 0.0, sz),
        Point3::new(sx, sy, sz),
        Point3::new(0.0, sy, sz),
    ];
    let mut shape = Shape::new();
    for c in corners {
        shape.add_vertex(c);
    }

    let edge_defs = [
        (1, 2),
        (2, 3),
        (3, 4),
        (4, 1),
        (5, 6),
        (6, 7),
        (7, 8),
        (8, 5),
        (1, 5),
        (2, 6),
        (3, 7),
        (4, 8),
    ];
    for (a, b) in edge_defs {
        let line = Line3d::from_points(corners[a - 1], corners[b - 1]);
        shape.add_edge(EdgeCurve::Line(line), (0.0, 1.0), (a, b), Continuity::Sharp)?;
    }

    let face_defs: [(Point3, Vec3, [usize; 4]); 6] = [
        (corners[0], -Vec3::z(), [1, 2, 3, 4]),
        (corners[4], Vec3::z(), [5, 6, 7, 8]),
        (corners[0], -Vec3::y(), [1, 10, 5, 9]),
        (corners[2], Vec3::y(), [3, 12, 7, 11]),
        (corners[0], -Vec3::x(), [4, 12, 8, 9]),
        (corners[1], Vec3::x(), [2, 11, 6, 10]),
    ];
    for (origin, normal, edges) in face_defs {
        shape.add_face(FaceSurface::Plane(Plane::new(origin, normal)), edges.to_vec())?;
    }
    Ok(shape)
}

/// Build a cylinder of radius `r` and height `h` standing on the XY plane.
///
/// Topology:
/// - vertices: 1 = `(r, 0, 0)`, 2 = `(r, 0, h)`
/// - edges: 1 = bottom circle, 2 = top circle, 3 = seam line from 1 to 2
/// - faces: 1 = lateral surface `[1, 2, 3]`, 2 = bottom cap `[1]`, 3 = top cap `[2]`
pub fn make_cylinder(r: f64, h: f64) -> Result<Shape> {
    check_positive("radius", r)?;
    check_positive("height", h)?;

    let mut shape = Shape::new();
    let a = shape.add_vertex(Point3::new(r, 0.0, 0.0));
    let b = shape.add_vertex(Point3::new(r, 0.0, h));

    let full = (0.0, 2.0 * PI);
    let bottom = shape.add_edge(
        EdgeCurve::Circle(Circle3d::new(Point3::origin(), r)),
        full,
        (a, a),
        Continuity::Sharp,
    )?;
    let top = shape.add_edge(
        EdgeCurve::Circle(Circle3d::new(Point3::new(0.0, 0.0, h), r)),
        full,
        (b, b),
        Continuity::Sharp,
    )?;
    let seam = shape.add_edge(
        EdgeCurve::Line(Line3d::from_points(Point3::new(r, 0.0, 0.0), Point3::new(r, 0.0, h))),
        (0.0, 1.0),
        (a, b),
        Continuity::Seam,
    )?;

    shape.add_face(
        FaceSurface::Cylinder(CylinderSurface {
            center: Point3::origin(),
            axis: Dir3::new_normalize(Vec3::z()),
            ref_dir: Dir3::new_normalize(Vec3::x()),
            radius: r,
            height: h,
        }),
        vec![bottom, top, seam],
    )?;
    shape.add_face(
        FaceSurface::Plane(Plane::new(Point3::origin(), -Vec3::z())),
        vec![bottom],
    )?;
    shape.add_face(
        FaceSurface::Plane(Plane::new(Point3::new(0.0, 0.0, h), Vec3::z())),
        vec![top],
    )?;
    Ok(shape)
}

/// Build a wire shape holding one B-spline edge and no faces.
pub fn make_spline_wire(curve: BSplineCurve) -> Result<Shape> {
    let (t0, t1) = curve.parameter_domain();
    let start = curve.eval(t0);
    let end = curve.eval(t1);

    let mut shape = Shape::new();
    let a = shape.add_vertex(start);
    let b = if Tolerance::DEFAULT.points_equal(&start, &end) {
        a
    } else {
        shape.add_vertex(end)
    };
    shape.add_edge(EdgeCurve::BSpline(curve), (t0, t1), (a, b), Continuity::Sharp)?;
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_topology() {
        let b = make_box(10.0, 20.0, 30.0).unwrap();
        assert_eq!(b.num_vertices(), 8);
        assert_eq!(b.num_edges(), 12);
        assert_eq!(b.num_faces(), 6);
        // Every edge bounds exactly two faces.
        for (i, _) in b.edges() {
            assert_eq!(b.edge_faces(i).len(), 2, "edge {i}");
        }
    }

    #[test]
    fn test_box_face_edges_lie_on_plane() {
        let b = make_box(1.0, 2.0, 3.0).unwrap();
        for (_, face) in b.faces() {
            let FaceSurface::Plane(plane) = &face.surface else {
                panic!("box faces are planar");
            };
            for &e in &face.edges {
                let edge = b.edge(e).unwrap();
                for p in [edge.start_point(), edge.end_point()] {
                    let d = (p - plane.origin).dot(plane.normal.as_ref());
                    assert!(d.abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            make_box(0.0, 1.0, 1.0),
            Err(BrepError::InvalidDimensions(_))
        ));
        assert!(make_cylinder(1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_cylinder_topology() {
        let c = make_cylinder(1.0, 2.0).unwrap();
        assert_eq!(c.num_vertices(), 2);
        assert_eq!(c.num_edges(), 3);
        assert_eq!(c.num_faces(), 3);
        assert!(c.edge(1).unwrap().is_closed());
        assert_eq!(c.edge(3).unwrap().continuity, Continuity::Seam);
        assert_eq!(c.edge_faces(1), vec![1, 2]);
        let top_end = c.edge(2).unwrap().end_point();
        assert!((top_end - Point3::new(1.0, 0.0, 2.0)).norm() < 1e-12);
    }

    #[test]
    fn test_spline_wire() {
        let pts = (0..6)
            .map(|i| Point3::new(2.0 * i as f64, (i % 2) as f64, 0.0))
            .collect();
        let curve = BSplineCurve::clamped_uniform(pts, 5).unwrap();
        let w = make_spline_wire(curve).unwrap();
        assert_eq!(w.num_edges(), 1);
        assert_eq!(w.num_faces(), 0);
        assert_eq!(w.num_vertices(), 2);
    }
}
