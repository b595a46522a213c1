//! Face surfaces: planes and finite cylinders.

use vcad_kernel_math::{Dir3, Point3, Transform, Vec3};

/// The kind of a face surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// Infinite plane trimmed by the face boundary.
    Plane,
    /// Cylindrical surface.
    Cylinder,
}

/// An oriented plane. The normal points out of the solid.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// A point on the plane.
    pub origin: Point3,
    /// Outward unit normal.
    pub normal: Dir3,
}

impl Plane {
    /// Create a plane from a point and a (not necessarily unit) normal.
    pub fn new(origin: Point3, normal: Vec3) -> Self {
        Self {
            origin,
            normal: Dir3::new_normalize(normal),
        }
    }
}

/// A finite cylinder patch.
///
/// Parameterization:
/// `P(u, v) = center + radius * (cos(u) * ref_dir + sin(u) * (axis × ref_dir)) + v * axis`
/// for `u ∈ [0, 2π)`, `v ∈ [0, height]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CylinderSurface {
    /// Centre of the base circle.
    pub center: Point3,
    /// Axis direction (base to top).
    pub axis: Dir3,
    /// Reference direction for `u = 0`, perpendicular to the axis.
    pub ref_dir: Dir3,
    /// Radius.
    pub radius: f64,
    /// Extent along the axis.
    pub height: f64,
}

impl CylinderSurface {
    /// Direction for `u = π/2`.
    pub fn y_dir(&self) -> Vec3 {
        self.axis.as_ref().cross(self.ref_dir.as_ref())
    }

    /// Evaluate the surface at `(u, v)`.
    pub fn evaluate(&self, u: f64, v: f64) -> Point3 {
        let (sin_u, cos_u) = u.sin_cos();
        self.center
            + self.radius * (cos_u * self.ref_dir.as_ref() + sin_u * self.y_dir())
            + v * self.axis.as_ref()
    }
}

/// The surface geometry carried by a face.
#[derive(Debug, Clone, PartialEq)]
pub enum FaceSurface {
    /// Planar face.
    Plane(Plane),
    /// Cylindrical face.
    Cylinder(CylinderSurface),
}

impl FaceSurface {
    /// The kind of this surface.
    pub fn kind(&self) -> SurfaceKind {
        match self {
            FaceSurface::Plane(_) => SurfaceKind::Plane,
            FaceSurface::Cylinder(_) => SurfaceKind::Cylinder,
        }
    }

    /// Apply a similarity transform.
    pub fn transform(&self, t: &Transform) -> FaceSurface {
        match self {
            FaceSurface::Plane(p) => FaceSurface::Plane(Plane {
                origin: t.apply_point(&p.origin),
                normal: Dir3::new_normalize(t.apply_normal(p.normal.as_ref())),
            }),
            FaceSurface::Cylinder(c) => {
                let s = t.scale_factor();
                let axis = t.apply_vec(c.axis.as_ref());
                let ref_dir = t.apply_vec(c.ref_dir.as_ref());
                FaceSurface::Cylinder(CylinderSurface {
                    center: t.apply_point(&c.center),
                    axis: Dir3::new_normalize(axis),
                    ref_dir: Dir3::new_normalize(ref_dir),
                    radius: c.radius * s,
                    height: c.height * s,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_plane_normal_survives_mirror() {
        let plane = FaceSurface::Plane(Plane::new(Point3::new(0.0, 1.0, 0.0), Vec3::y()));
        let m = Transform::mirror(&Dir3::new_normalize(Vec3::y()));
        match plane.transform(&m) {
            FaceSurface::Plane(p) => {
                assert_relative_eq!(p.origin.y, -1.0, epsilon = 1e-12);
                assert_relative_eq!(p.normal.as_ref().y, -1.0, epsilon = 1e-12);
            }
            FaceSurface::Cylinder(_) => panic!("expected plane"),
        }
    }

    #[test]
    fn test_cylinder_scale() {
        let cyl = FaceSurface::Cylinder(CylinderSurface {
            center: Point3::origin(),
            axis: Dir3::new_normalize(Vec3::z()),
            ref_dir: Dir3::new_normalize(Vec3::x()),
            radius: 1.0,
            height: 2.0,
        });
        match cyl.transform(&Transform::uniform_scale(2.0)) {
            FaceSurface::Cylinder(c) => {
                assert_relative_eq!(c.radius, 2.0, epsilon = 1e-12);
                assert_relative_eq!(c.height, 4.0, epsilon = 1e-12);
                assert_relative_eq!(
                    c.evaluate(0.0, 4.0),
                    Point3::new(2.0, 0.0, 4.0),
                    epsilon = 1e-12
                );
            }
            FaceSurface::Plane(_) => panic!("expected cylinder"),
        }
    }
}
