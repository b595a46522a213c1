#![warn(missing_docs)]

//! Math types for the vcad drafting kernel.
//!
//! Thin wrappers around nalgebra providing the domain types used by the
//! projection pipeline: points, vectors, directions, affine transforms
//! (including mirrors and frame changes), and tolerance constants.

use nalgebra::{Matrix4, Unit, Vector3, Vector4};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point in 2D space.
pub type Point2 = nalgebra::Point2<f64>;

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `v`.
    pub fn translation(v: &Vec3) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = v.x;
        m[(1, 3)] = v.y;
        m[(2, 3)] = v.z;
        Self { matrix: m }
    }

    /// Uniform scale about the origin.
    pub fn uniform_scale(s: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 0)] = s;
        m[(1, 1)] = s;
        m[(2, 2)] = s;
        Self { matrix: m }
    }

    /// Reflection across the plane through the origin with the given normal.
    ///
    /// Householder form: `I - 2 n nᵀ`.
    pub fn mirror(normal: &Dir3) -> Self {
        let n = normal.as_ref();
        let mut m = Matrix4::identity();
        for r in 0..3 {
            for c in 0..3 {
                m[(r, c)] -= 2.0 * n[r] * n[c];
            }
        }
        Self { matrix: m }
    }

    /// Change of basis from world coordinates into the frame
    /// `(origin; x, y, z)`.
    ///
    /// The axes must be orthonormal. A world point `p` maps to
    /// `((p - origin)·x, (p - origin)·y, (p - origin)·z)`.
    pub fn to_frame(origin: &Point3, x: &Dir3, y: &Dir3, z: &Dir3) -> Self {
        let mut m = Matrix4::identity();
        for (row, axis) in [x, y, z].iter().enumerate() {
            let a = axis.as_ref();
            m[(row, 0)] = a.x;
            m[(row, 1)] = a.y;
            m[(row, 2)] = a.z;
            m[(row, 3)] = -a.dot(&origin.coords);
        }
        Self { matrix: m }
    }

    /// Compose: `self` then `other` (self * other).
    ///
    /// `a.then(&b).apply_point(p) == a.apply_point(&b.apply_point(p))`.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a direction vector (ignores translation, applies rotation/scale).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        let r = self.matrix * Vector4::new(v.x, v.y, v.z, 0.0);
        Vec3::new(r.x, r.y, r.z)
    }

    /// Transform a normal vector (uses inverse transpose of upper-left 3x3).
    pub fn apply_normal(&self, n: &Vec3) -> Vec3 {
        let m3 = self.matrix.fixed_view::<3, 3>(0, 0);
        if let Some(inv) = m3.try_inverse() {
            inv.transpose() * n
        } else {
            // Singular linear part: leave the normal as is.
            *n
        }
    }

    /// Linear scale factor of the transform, assuming it is a similarity.
    ///
    /// Mirrors and rotations keep column lengths, so this is the length of
    /// the transformed X basis vector.
    pub fn scale_factor(&self) -> f64 {
        self.apply_vec(&Vec3::x()).norm()
    }

    /// Whether the transform flips handedness (negative determinant).
    pub fn is_mirroring(&self) -> bool {
        self.matrix.fixed_view::<3, 3>(0, 0).determinant() < 0.0
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in mm.
    pub linear: f64,
    /// Angular tolerance in radians.
    pub angular: f64,
}

impl Tolerance {
    /// Default CAD tolerances (1e-6 mm linear, 1e-9 rad angular).
    pub const DEFAULT: Self = Self {
        linear: 1e-6,
        angular: 1e-9,
    };

    /// Tolerance with a custom linear value and the default angular value.
    pub fn linear(linear: f64) -> Self {
        Self {
            linear,
            ..Self::DEFAULT
        }
    }

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_transform() {
        let t = Transform::identity();
        let p = Point3::new(1.0, 2.0, 3.0);
        let result = t.apply_point(&p);
        assert!((result - p).norm() < 1e-12);
    }

    #[test]
    fn test_translation() {
        let t = Transform::translation(&Vec3::new(10.0, 20.0, 30.0));
        let result = t.apply_point(&Point3::new(1.0, 2.0, 3.0));
        assert!((result - Point3::new(11.0, 22.0, 33.0)).norm() < 1e-12);
    }

    #[test]
    fn test_compose_applies_right_first() {
        let translate = Transform::translation(&Vec3::new(1.0, 0.0, 0.0));
        let scale = Transform::uniform_scale(2.0);
        // scale(translate(origin)) = (2, 0, 0)
        let composed = scale.then(&translate);
        let result = composed.apply_point(&Point3::origin());
        assert!((result.x - 2.0).abs() < 1e-12);
        assert!((composed.scale_factor() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_mirror_flips_normal_component() {
        let m = Transform::mirror(&Dir3::new_normalize(Vec3::y()));
        let p = m.apply_point(&Point3::new(1.0, 2.0, 3.0));
        assert!((p - Point3::new(1.0, -2.0, 3.0)).norm() < 1e-12);
        assert!(m.is_mirroring());
        assert!(!Transform::uniform_scale(3.0).is_mirroring());
    }

    #[test]
    fn test_to_frame() {
        // Frame rotated 90° about Z and shifted to (1, 0, 0).
        let x = Dir3::new_normalize(Vec3::y());
        let y = Dir3::new_normalize(-Vec3::x());
        let z = Dir3::new_normalize(Vec3::z());
        let t = Transform::to_frame(&Point3::new(1.0, 0.0, 0.0), &x, &y, &z);
        let p = t.apply_point(&Point3::new(1.0, 2.0, 5.0));
        assert!((p - Point3::new(2.0, 0.0, 5.0)).norm() < 1e-12);
    }

    #[test]
    fn test_apply_normal_under_mirror() {
        let m = Transform::mirror(&Dir3::new_normalize(Vec3::y()));
        let n = m.apply_normal(&Vec3::new(0.0, 1.0, 0.0));
        assert!((n - Vec3::new(0.0, -1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_tolerance_points_equal() {
        let tol = Tolerance::DEFAULT;
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(1.0 + 1e-7, 2.0, 3.0);
        assert!(tol.points_equal(&a, &b));
        let c = Point3::new(1.001, 2.0, 3.0);
        assert!(!tol.points_equal(&a, &c));
    }
}
