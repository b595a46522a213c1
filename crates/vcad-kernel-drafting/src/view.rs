//! View frame, centroid, and the scale/mirror transform.
//!
//! A view is defined by the direction toward the viewer and a drawing X
//! axis. Before projection the shape is moved so its projected centroid sits
//! at the origin, scaled to drawing units, and mirrored across the plane
//! whose normal is the view's up axis so that drawing Y grows downward.

use vcad_kernel_brep::Shape;
use vcad_kernel_hlr::Projector;
use vcad_kernel_math::{Dir3, Point3, Transform, Vec3};

use crate::error::{DraftingError, Result};

/// Samples per edge when locating the centroid.
const CENTROID_SAMPLES: usize = 16;

/// An orthonormal view frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewAxis {
    /// Frame origin.
    pub origin: Point3,
    /// Drawing X axis.
    pub x: Dir3,
    /// Drawing up axis, `z × x`.
    pub y: Dir3,
    /// Direction toward the viewer.
    pub z: Dir3,
}

impl ViewAxis {
    /// Build a frame from a view direction and a drawing X axis.
    ///
    /// The X axis only needs to be non-parallel to the direction; its
    /// component along the direction is removed.
    pub fn new(origin: Point3, direction: Vec3, x_axis: Vec3) -> Result<Self> {
        let finite = |v: &Vec3| v.iter().all(|c| c.is_finite());
        if !finite(&direction) || !finite(&x_axis) {
            return Err(DraftingError::DegenerateDirection(
                "direction and x axis must be finite".into(),
            ));
        }
        let z = Dir3::try_new(direction, 1e-12).ok_or_else(|| {
            DraftingError::DegenerateDirection("view direction is zero".into())
        })?;
        if x_axis.norm() < 1e-12 {
            return Err(DraftingError::DegenerateDirection("x axis is zero".into()));
        }
        let along = x_axis.dot(z.as_ref());
        let x = Dir3::try_new(x_axis - along * z.into_inner(), 1e-9 * x_axis.norm())
            .ok_or_else(|| {
                DraftingError::DegenerateDirection(
                    "x axis is parallel to the view direction".into(),
                )
            })?;
        let y = Dir3::new_normalize(z.as_ref().cross(x.as_ref()));
        Ok(Self { origin, x, y, z })
    }

    /// Same axes with a different origin.
    pub fn with_origin(&self, origin: Point3) -> Self {
        Self {
            origin,
            ..self.clone()
        }
    }

    /// World to view-frame transform.
    pub fn to_view(&self) -> Transform {
        Transform::to_frame(&self.origin, &self.x, &self.y, &self.z)
    }

    /// The orthographic projector for this frame.
    pub fn projector(&self) -> Result<Projector> {
        Ok(Projector::from_axes(
            self.origin,
            self.x.into_inner(),
            self.y.into_inner(),
            self.z.into_inner(),
        )?)
    }
}

/// Object-space point that projects to the centre of the shape's 2D extent.
///
/// Sample points are rotated into the view frame, their axis-aligned box is
/// taken there, and its centre is mapped back. An empty shape yields the
/// origin.
pub fn find_centroid(shape: &Shape, axis: &ViewAxis) -> Point3 {
    let frame = axis.with_origin(Point3::origin());
    let to_view = frame.to_view();
    let pts = shape.sample_points(CENTROID_SAMPLES);
    if pts.is_empty() {
        return Point3::origin();
    }
    let mut min = Vec3::repeat(f64::INFINITY);
    let mut max = Vec3::repeat(f64::NEG_INFINITY);
    for p in &pts {
        let v = to_view.apply_point(p).coords;
        min = min.inf(&v);
        max = max.sup(&v);
    }
    let c = (min + max) * 0.5;
    Point3::origin() + c.x * frame.x.as_ref() + c.y * frame.y.as_ref() + c.z * frame.z.as_ref()
}

/// Move `centroid` to the origin, scale, then mirror across the plane
/// through the origin normal to the view's up axis.
pub fn mirror_scale_transform(centroid: &Point3, scale: f64, axis: &ViewAxis) -> Transform {
    Transform::mirror(&axis.y)
        .then(&Transform::uniform_scale(scale))
        .then(&Transform::translation(&-centroid.coords))
}

/// Everything needed to take a shape from object space to drawing space.
#[derive(Debug, Clone)]
pub struct ViewTransformer {
    /// View frame centred at the origin.
    pub axis: ViewAxis,
    /// Object-space centroid.
    pub centroid: Point3,
    /// Object space to kernel space (translate, scale, mirror).
    pub transform: Transform,
    /// Kernel space to drawing plane.
    pub projector: Projector,
}

impl ViewTransformer {
    /// Compute the transforms for viewing `shape` along `direction`.
    pub fn new(shape: &Shape, direction: Vec3, x_axis: Vec3, scale: f64) -> Result<Self> {
        let axis = ViewAxis::new(Point3::origin(), direction, x_axis)?;
        let centroid = find_centroid(shape, &axis);
        let transform = mirror_scale_transform(&centroid, scale, &axis);
        let projector = axis.projector()?;
        Ok(Self {
            axis,
            centroid,
            transform,
            projector,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vcad_kernel_brep::make_box;

    #[test]
    fn test_axis_orthonormal() {
        let axis = ViewAxis::new(
            Point3::origin(),
            Vec3::new(0.0, -1.0, 1.0),
            Vec3::new(1.0, 0.0, 0.5),
        )
        .unwrap();
        assert_relative_eq!(axis.x.dot(axis.z.as_ref()), 0.0, epsilon = 1e-12);
        assert_relative_eq!(axis.x.cross(axis.y.as_ref()), axis.z.into_inner(), epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_directions() {
        let o = Point3::origin();
        for (d, x) in [
            (Vec3::zeros(), Vec3::x()),
            (Vec3::z(), Vec3::zeros()),
            (Vec3::z(), -3.0 * Vec3::z()),
            (Vec3::new(f64::NAN, 0.0, 1.0), Vec3::x()),
        ] {
            assert!(matches!(
                ViewAxis::new(o, d, x),
                Err(DraftingError::DegenerateDirection(_))
            ));
        }
    }

    #[test]
    fn test_centroid_of_box() {
        let b = make_box(2.0, 4.0, 6.0).unwrap();
        let axis = ViewAxis::new(Point3::origin(), Vec3::new(1.0, 1.0, 1.0), Vec3::x()).unwrap();
        let c = find_centroid(&b, &axis);
        // The box is symmetric about its centre, so any view finds it.
        assert_relative_eq!(c, Point3::new(1.0, 2.0, 3.0), epsilon = 1e-9);
    }

    #[test]
    fn test_transform_centres_scales_and_flips() {
        let b = make_box(2.0, 2.0, 2.0).unwrap();
        let vt = ViewTransformer::new(&b, Vec3::z(), Vec3::x(), 10.0).unwrap();
        let corner = vt.transform.apply_point(&Point3::new(2.0, 2.0, 2.0));
        let p = vt.projector.project(&corner);
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, -10.0, epsilon = 1e-9);
        assert!(vt.transform.is_mirroring());
        assert_relative_eq!(vt.transform.scale_factor(), 10.0, epsilon = 1e-12);
    }
}
