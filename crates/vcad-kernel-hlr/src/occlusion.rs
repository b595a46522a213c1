//! Depth test of points against a triangulated shape.

use vcad_kernel_brep::Triangle;
use vcad_kernel_math::Point3;

use crate::projector::Projector;

/// Barycentric slack so points on a shared triangle edge count as inside.
const BARY_EPS: f64 = 1e-9;
/// Depth slack, relative to the largest view-space coordinate.
const DEPTH_EPS: f64 = 1e-7;

#[derive(Debug, Clone)]
struct ViewTriangle {
    a: [f64; 3],
    b: [f64; 3],
    c: [f64; 3],
    min: [f64; 2],
    max: [f64; 2],
    /// Twice the signed 2D area.
    area2: f64,
}

/// Triangles in view space, ready for point occlusion queries.
#[derive(Debug, Clone)]
pub struct OcclusionMap {
    triangles: Vec<ViewTriangle>,
    depth_eps: f64,
}

impl OcclusionMap {
    /// Project triangles into the view frame.
    ///
    /// Triangles seen edge-on have no 2D area and are dropped; they cannot
    /// hide anything.
    pub fn new(triangles: &[Triangle], projector: &Projector) -> Self {
        let mut extent: f64 = 0.0;
        let mut out = Vec::with_capacity(triangles.len());
        for t in triangles {
            let [a, b, c] = t.v.map(|p| {
                let v = projector.to_view(&p);
                [v.x, v.y, v.z]
            });
            for p in [&a, &b, &c] {
                extent = extent.max(p[0].abs()).max(p[1].abs()).max(p[2].abs());
            }
            let area2 = (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]);
            let scale = (b[0] - a[0]).hypot(b[1] - a[1]) * (c[0] - a[0]).hypot(c[1] - a[1]);
            if area2.abs() <= 1e-12 * scale.max(1e-300) {
                continue;
            }
            out.push(ViewTriangle {
                min: [a[0].min(b[0]).min(c[0]), a[1].min(b[1]).min(c[1])],
                max: [a[0].max(b[0]).max(c[0]), a[1].max(b[1]).max(c[1])],
                a,
                b,
                c,
                area2,
            });
        }
        Self {
            triangles: out,
            depth_eps: DEPTH_EPS * extent,
        }
    }

    /// Number of occluding triangles.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// True if nothing can occlude.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Whether a view-space point lies behind some triangle.
    pub fn is_occluded(&self, p: &Point3) -> bool {
        let slack = self.depth_eps;
        self.triangles.iter().any(|t| {
            if p.x < t.min[0] - slack
                || p.x > t.max[0] + slack
                || p.y < t.min[1] - slack
                || p.y > t.max[1] + slack
            {
                return false;
            }
            let w0 = ((t.b[0] - p.x) * (t.c[1] - p.y) - (t.c[0] - p.x) * (t.b[1] - p.y)) / t.area2;
            let w1 = ((t.c[0] - p.x) * (t.a[1] - p.y) - (t.a[0] - p.x) * (t.c[1] - p.y)) / t.area2;
            let w2 = 1.0 - w0 - w1;
            if w0 < -BARY_EPS || w1 < -BARY_EPS || w2 < -BARY_EPS {
                return false;
            }
            let z = w0 * t.a[2] + w1 * t.b[2] + w2 * t.c[2];
            z > p.z + slack
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vcad_kernel_math::Vec3;

    fn top_projector() -> Projector {
        Projector::from_axes(Point3::origin(), Vec3::x(), Vec3::y(), Vec3::z()).unwrap()
    }

    fn unit_square_at(z: f64) -> Vec<Triangle> {
        let p = |x, y| Point3::new(x, y, z);
        vec![
            Triangle {
                v: [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)],
                face: 1,
            },
            Triangle {
                v: [p(0.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)],
                face: 1,
            },
        ]
    }

    #[test]
    fn test_point_below_is_occluded() {
        let map = OcclusionMap::new(&unit_square_at(1.0), &top_projector());
        assert_eq!(map.len(), 2);
        assert!(map.is_occluded(&Point3::new(0.5, 0.5, 0.0)));
        // On the diagonal shared by both triangles.
        assert!(map.is_occluded(&Point3::new(0.3, 0.3, 0.0)));
        // On the boundary, below.
        assert!(map.is_occluded(&Point3::new(1.0, 0.5, 0.0)));
    }

    #[test]
    fn test_point_on_or_above_is_visible() {
        let map = OcclusionMap::new(&unit_square_at(1.0), &top_projector());
        assert!(!map.is_occluded(&Point3::new(0.5, 0.5, 1.0)));
        assert!(!map.is_occluded(&Point3::new(0.5, 0.5, 2.0)));
        assert!(!map.is_occluded(&Point3::new(1.5, 0.5, 0.0)));
    }

    #[test]
    fn test_edge_on_triangles_dropped() {
        let tri = Triangle {
            v: [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 1.0),
            ],
            face: 1,
        };
        let map = OcclusionMap::new(&[tri], &top_projector());
        assert!(map.is_empty());
    }
}
