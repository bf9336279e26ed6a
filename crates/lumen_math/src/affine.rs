// Affine transforms for instancing geometry.
//
// The forward matrix and its inverse are composed side by side, so no
// general matrix inversion is needed for the builder operations.

use crate::{Mat4, MathError, Point3, Vec3};

/// An invertible affine transform (object space to world space).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    matrix: Mat4,
    inverse: Mat4,
}

impl Affine {
    /// The identity transform.
    pub fn new() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
            inverse: Mat4::IDENTITY,
        }
    }

    /// Wrap an arbitrary matrix, failing if it cannot be inverted.
    pub fn from_matrix(matrix: Mat4) -> Result<Self, MathError> {
        let det = matrix.determinant();
        if !det.is_finite() || det.abs() < 1e-12 {
            return Err(MathError::SingularTransform(format!(
                "determinant {det} is not invertible"
            )));
        }
        Ok(Self {
            matrix,
            inverse: matrix.inverse(),
        })
    }

    /// Follow this transform with a translation.
    pub fn translate(self, offset: Vec3) -> Self {
        self.then(Mat4::from_translation(offset), Mat4::from_translation(-offset))
    }

    /// Follow this transform with a rotation of `degrees` about `axis`.
    ///
    /// A zero-length axis leaves the transform unchanged.
    pub fn rotate(self, axis: Vec3, degrees: f64) -> Self {
        let axis = axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            return self;
        }
        let radians = degrees.to_radians();
        self.then(
            Mat4::from_axis_angle(axis, radians),
            Mat4::from_axis_angle(axis, -radians),
        )
    }

    pub fn rotate_x(self, degrees: f64) -> Self {
        self.rotate(Vec3::X, degrees)
    }

    pub fn rotate_y(self, degrees: f64) -> Self {
        self.rotate(Vec3::Y, degrees)
    }

    pub fn rotate_z(self, degrees: f64) -> Self {
        self.rotate(Vec3::Z, degrees)
    }

    /// Follow this transform with a per-axis scale. Zero factors are rejected.
    pub fn scale(self, factors: Vec3) -> Result<Self, MathError> {
        if factors.x == 0.0 || factors.y == 0.0 || factors.z == 0.0 {
            return Err(MathError::SingularTransform(format!(
                "scale {factors} has a zero factor"
            )));
        }
        Ok(self.then(Mat4::from_scale(factors), Mat4::from_scale(factors.recip())))
    }

    fn then(self, step: Mat4, step_inverse: Mat4) -> Self {
        Self {
            matrix: step * self.matrix,
            inverse: self.inverse * step_inverse,
        }
    }

    /// Object space point to world space (with translation).
    #[inline]
    pub fn apply_point(&self, p: Point3) -> Point3 {
        self.matrix.transform_point3(p)
    }

    /// Object space direction to world space (no translation).
    #[inline]
    pub fn apply_vector(&self, v: Vec3) -> Vec3 {
        self.matrix.transform_vector3(v)
    }

    /// World space point to object space.
    #[inline]
    pub fn invert_point(&self, p: Point3) -> Point3 {
        self.inverse.transform_point3(p)
    }

    /// World space direction to object space.
    #[inline]
    pub fn invert_vector(&self, v: Vec3) -> Vec3 {
        self.inverse.transform_vector3(v)
    }

    /// Object space normal to a unit world space normal.
    ///
    /// Normals go through the transpose of the inverse, never the
    /// translation, so they stay perpendicular under non-uniform scale.
    #[inline]
    pub fn apply_normal(&self, n: Vec3) -> Vec3 {
        self.inverse.transpose().transform_vector3(n).normalize()
    }

    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    pub fn inverse(&self) -> &Mat4 {
        &self.inverse
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_identity() {
        let affine = Affine::new();
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(affine.apply_point(p), p);
        assert_eq!(affine.invert_point(p), p);
    }

    #[test]
    fn test_translation_affects_points_not_vectors() {
        let affine = Affine::new().translate(Vec3::new(10.0, 20.0, 30.0));
        let v = Vec3::new(1.0, 2.0, 3.0);

        assert_close(affine.apply_point(v), Vec3::new(11.0, 22.0, 33.0));
        assert_close(affine.apply_vector(v), v);
        assert_close(affine.invert_point(Vec3::new(11.0, 22.0, 33.0)), v);
    }

    #[test]
    fn test_operations_apply_in_call_order() {
        // Rotate first, then translate
        let affine = Affine::new().rotate_y(90.0).translate(Vec3::new(5.0, 0.0, 0.0));
        assert_close(affine.apply_point(Vec3::X), Vec3::new(5.0, 0.0, -1.0));
    }

    #[test]
    fn test_inverse_round_trip() {
        let affine = Affine::new()
            .rotate(Vec3::new(1.0, 1.0, 0.0), 33.0)
            .scale(Vec3::new(2.0, 0.5, 3.0))
            .unwrap()
            .translate(Vec3::new(-4.0, 1.0, 7.0));

        let p = Vec3::new(0.3, -2.0, 5.0);
        assert_close(affine.invert_point(affine.apply_point(p)), p);
        assert_close(affine.invert_vector(affine.apply_vector(p)), p);

        let product = *affine.matrix() * *affine.inverse();
        assert!(product.abs_diff_eq(Mat4::IDENTITY, 1e-9));
    }

    #[test]
    fn test_normal_stays_perpendicular_under_scale() {
        let affine = Affine::new().scale(Vec3::new(4.0, 1.0, 1.0)).unwrap();

        // Plane x + y = 0 in object space, tangent (1, -1, 0), normal (1, 1, 0)
        let tangent = affine.apply_vector(Vec3::new(1.0, -1.0, 0.0));
        let normal = affine.apply_normal(Vec3::new(1.0, 1.0, 0.0).normalize());

        assert!(tangent.dot(normal).abs() < 1e-9);
        assert!((normal.length() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_normal_follows_rotation() {
        let affine = Affine::new().rotate_z(90.0);
        assert_close(affine.apply_normal(Vec3::X), Vec3::Y);
    }

    #[test]
    fn test_singular_transforms_rejected() {
        assert!(Affine::new().scale(Vec3::new(1.0, 0.0, 1.0)).is_err());
        assert!(Affine::from_matrix(Mat4::ZERO).is_err());
        assert!(Affine::from_matrix(Mat4::from_scale(Vec3::splat(2.0))).is_ok());
    }
}
