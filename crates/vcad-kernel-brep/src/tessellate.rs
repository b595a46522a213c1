//! Face tessellation for occlusion queries.
//!
//! Planar faces are fanned from the centroid of their boundary samples,
//! which covers convex faces exactly. Cylinders become a single band of
//! `segments` quads split into triangles.

use std::f64::consts::PI;
use vcad_kernel_math::{Point3, Vec3};

use crate::shape::{Face, Shape};
use crate::surface::FaceSurface;

/// A triangle tagged with the 1-based face it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    /// Corner positions.
    pub v: [Point3; 3],
    /// 1-based source face index.
    pub face: usize,
}

/// Tessellate every face of the shape.
pub fn tessellate_shape(shape: &Shape, segments: usize) -> Vec<Triangle> {
    let segments = segments.max(3);
    let mut tris = Vec::new();
    for (index, face) in shape.faces() {
        match &face.surface {
            FaceSurface::Plane(_) => tessellate_planar(shape, index, face, segments, &mut tris),
            FaceSurface::Cylinder(c) => {
                for i in 0..segments {
                    let u0 = 2.0 * PI * i as f64 / segments as f64;
                    let u1 = 2.0 * PI * (i + 1) as f64 / segments as f64;
                    let a = c.evaluate(u0, 0.0);
                    let b = c.evaluate(u1, 0.0);
                    let d = c.evaluate(u1, c.height);
                    let e = c.evaluate(u0, c.height);
                    tris.push(Triangle { v: [a, b, d], face: index });
                    tris.push(Triangle { v: [a, d, e], face: index });
                }
            }
        }
    }
    tris
}

fn tessellate_planar(
    shape: &Shape,
    index: usize,
    face: &Face,
    segments: usize,
    out: &mut Vec<Triangle>,
) {
    let polylines: Vec<Vec<Point3>> = face
        .edges
        .iter()
        .filter_map(|&e| shape.edge(e).ok())
        .map(|e| e.sample(segments))
        .collect();
    let count: usize = polylines.iter().map(Vec::len).sum();
    if count < 3 {
        return;
    }
    let sum = polylines
        .iter()
        .flatten()
        .fold(Vec3::zeros(), |acc, p| acc + p.coords);
    let centroid = Point3::from(sum / count as f64);
    for line in &polylines {
        for pair in line.windows(2) {
            out.push(Triangle {
                v: [centroid, pair[0], pair[1]],
                face: index,
            });
        }
    }
}
