//! Lumen math types.
//!
//! Double precision throughout: points, vectors and linear colors all share
//! `glam::DVec3`.

pub use glam::{DMat4, DVec3, DVec4};

mod aabb;
mod affine;
mod interval;
mod ray;
mod vec;

pub use aabb::{Aabb, Axis};
pub use affine::Affine;
pub use interval::Interval;
pub use ray::Ray;
pub use vec::Vec3Ext;

/// A position, displacement or linear RGB color.
pub type Vec3 = DVec3;
/// A position in world or object space.
pub type Point3 = DVec3;
/// A linear RGB color, nominally in `[0, 1]` per channel.
pub type Color = DVec3;
/// A 4x4 affine matrix.
pub type Mat4 = DMat4;

/// Tolerance for near-zero vector components and parallel-plane tests.
pub const EPSILON: f64 = 1e-8;

/// Precondition violations raised by the math types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MathError {
    #[error("invalid axis index {0}, expected 0, 1 or 2")]
    InvalidAxis(usize),

    #[error("transform is not invertible: {0}")]
    SingularTransform(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }
}
