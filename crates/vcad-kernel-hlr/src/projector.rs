//! Orthographic projector.

use vcad_kernel_math::{Dir3, Point2, Point3, Transform, Vec3};

use crate::error::HlrError;

/// An orthographic projector onto the `(x, y)` plane of a view frame.
///
/// The frame's `z` axis points from the object toward the viewer, so a
/// larger view-space `z` is closer to the eye.
#[derive(Debug, Clone, PartialEq)]
pub struct Projector {
    x: Dir3,
    y: Dir3,
    z: Dir3,
    to_view: Transform,
}

impl Projector {
    /// Build a projector from an orthonormal right-handed frame.
    pub fn from_axes(origin: Point3, x: Vec3, y: Vec3, z: Vec3) -> Result<Self, HlrError> {
        const EPS: f64 = 1e-9;
        for (name, v) in [("x", &x), ("y", &y), ("z", &z)] {
            if !v.iter().all(|c| c.is_finite()) || (v.norm() - 1.0).abs() > EPS {
                return Err(HlrError::InvalidProjector(format!(
                    "{name} axis is not a unit vector"
                )));
            }
        }
        if x.dot(&y).abs() > EPS || y.dot(&z).abs() > EPS || z.dot(&x).abs() > EPS {
            return Err(HlrError::InvalidProjector("axes are not orthogonal".into()));
        }
        if (x.cross(&y) - z).norm() > 1e-6 {
            return Err(HlrError::InvalidProjector("frame is left-handed".into()));
        }
        let (x, y, z) = (
            Dir3::new_unchecked(x),
            Dir3::new_unchecked(y),
            Dir3::new_unchecked(z),
        );
        let to_view = Transform::to_frame(&origin, &x, &y, &z);
        Ok(Self { x, y, z, to_view })
    }

    /// View-frame coordinates `(x, y, depth)` of a point.
    pub fn to_view(&self, p: &Point3) -> Point3 {
        self.to_view.apply_point(p)
    }

    /// Project a point onto the drawing plane.
    pub fn project(&self, p: &Point3) -> Point2 {
        let v = self.to_view(p);
        Point2::new(v.x, v.y)
    }

    /// Depth of a point along the view direction (larger is nearer).
    pub fn depth(&self, p: &Point3) -> f64 {
        self.to_view(p).z
    }

    /// Unit vector pointing from the object toward the viewer.
    pub fn view_direction(&self) -> Vec3 {
        self.z.into_inner()
    }

    /// Drawing X axis in world coordinates.
    pub fn x_axis(&self) -> Vec3 {
        self.x.into_inner()
    }

    /// Drawing Y axis in world coordinates.
    pub fn y_axis(&self) -> Vec3 {
        self.y.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_top_view_projection() {
        let p = Projector::from_axes(Point3::origin(), Vec3::x(), Vec3::y(), Vec3::z()).unwrap();
        let q = p.project(&Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(q, Point2::new(1.0, 2.0));
        assert_relative_eq!(p.depth(&Point3::new(1.0, 2.0, 3.0)), 3.0);
        assert_eq!(p.x_axis().cross(&p.y_axis()), p.view_direction());
    }

    #[test]
    fn test_rejects_bad_frames() {
        let o = Point3::origin();
        assert!(Projector::from_axes(o, Vec3::x(), Vec3::x(), Vec3::z()).is_err());
        assert!(Projector::from_axes(o, Vec3::y(), Vec3::x(), Vec3::z()).is_err());
        assert!(Projector::from_axes(o, 2.0 * Vec3::x(), Vec3::y(), Vec3::z()).is_err());
    }
}
