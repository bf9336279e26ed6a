use crate::{Vec3, EPSILON};

/// Geometry operations on `Vec3` that glam does not provide.
pub trait Vec3Ext {
    /// Mirror this vector about the unit normal `n`: `v - 2(v·n)n`.
    fn reflect(self, n: Vec3) -> Vec3;

    /// Refract this unit vector through a surface with unit normal `n`.
    ///
    /// `eta_ratio` is the ratio of refractive indices (incident over
    /// transmitted). The caller must rule out total internal reflection
    /// first; past the critical angle the result is not meaningful.
    fn refract(self, n: Vec3, eta_ratio: f64) -> Vec3;

    /// True when every component is smaller than `EPSILON` in magnitude.
    fn near_zero(self) -> bool;
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn reflect(self, n: Vec3) -> Vec3 {
        self - 2.0 * self.dot(n) * n
    }

    #[inline]
    fn refract(self, n: Vec3, eta_ratio: f64) -> Vec3 {
        let cos_theta = (-self).dot(n).min(1.0);
        let r_out_perp = eta_ratio * (self + cos_theta * n);
        let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
        r_out_perp + r_out_parallel
    }

    #[inline]
    fn near_zero(self) -> bool {
        self.x.abs() < EPSILON && self.y.abs() < EPSILON && self.z.abs() < EPSILON
    }
}
