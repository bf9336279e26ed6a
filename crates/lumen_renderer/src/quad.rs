//! Planar parallelogram primitive.

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::Material;
use lumen_math::{Aabb, Interval, Point3, Ray, Vec3, EPSILON};
use std::sync::Arc;

/// A parallelogram spanned by corner `q` and edges `u` and `v`.
pub struct Quad {
    q: Point3,
    u: Vec3,
    v: Vec3,
    /// n / (n·n) for the unnormalized plane normal n, used for planar coordinates
    w: Vec3,
    normal: Vec3,
    d: f64,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Point3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize_or_zero();
        let w = n / n.dot(n);
        let d = normal.dot(q);

        // Bounding box of both diagonals
        let diagonal1 = Aabb::from_points(q, q + u + v);
        let diagonal2 = Aabb::from_points(q + u, q + v);

        Self {
            q,
            u,
            v,
            w,
            normal,
            d,
            material,
            bbox: Aabb::surrounding(&diagonal1, &diagonal2),
        }
    }

    /// The six faces of the axis-aligned box with opposite corners `a` and `b`.
    pub fn make_box(a: Point3, b: Point3, material: Arc<dyn Material>) -> HittableList {
        let min = a.min(b);
        let max = a.max(b);

        let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
        let dy = Vec3::new(0.0, max.y - min.y, 0.0);
        let dz = Vec3::new(0.0, 0.0, max.z - min.z);

        let faces = [
            (Point3::new(min.x, min.y, max.z), dx, dy),  // front
            (Point3::new(max.x, min.y, max.z), -dz, dy), // right
            (Point3::new(max.x, min.y, min.z), -dx, dy), // back
            (Point3::new(min.x, min.y, min.z), dz, dy),  // left
            (Point3::new(min.x, max.y, max.z), dx, -dz), // top
            (Point3::new(min.x, min.y, min.z), dx, dz),  // bottom
        ];

        faces
            .into_iter()
            .map(|(q, u, v)| Arc::new(Quad::new(q, u, v, material.clone())) as Arc<dyn Hittable>)
            .collect()
    }
}

impl Hittable for Quad {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let denom = self.normal.dot(ray.direction());

        // Parallel to the plane
        if denom.abs() < EPSILON {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.admits(t) {
            return None;
        }

        // Planar coordinates of the hit point relative to q
        let planar_hit = ray.at(t) - self.q;
        let alpha = self.w.dot(planar_hit.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hit));

        if !Interval::UNIT.contains(alpha) || !Interval::UNIT.contains(beta) {
            return None;
        }

        Some(HitRecord::new(
            ray,
            t,
            self.normal,
            self.material.as_ref(),
            (alpha, beta),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian};

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    fn unit_square() -> Quad {
        Quad::new(Vec3::new(-1.0, -1.0, -3.0), 2.0 * Vec3::X, 2.0 * Vec3::Y, grey())
    }

    #[test]
    fn test_quad_hit_and_uv() {
        let quad = unit_square();
        let ray = Ray::new_simple(Vec3::new(0.5, -0.5, 0.0), Vec3::new(0.0, 0.0, -1.0));

        let rec = quad.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        assert!((rec.t - 3.0).abs() < 1e-9);
        assert!((rec.u - 0.75).abs() < 1e-9);
        assert!((rec.v - 0.25).abs() < 1e-9);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-9);
    }

    #[test]
    fn test_quad_miss_outside_edges() {
        let quad = unit_square();
        let ray = Ray::new_simple(Vec3::new(1.5, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(quad.hit(&ray, Interval::new(0.001, f64::INFINITY)).is_none());
    }

    #[test]
    fn test_quad_parallel_ray_misses() {
        let quad = unit_square();
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, -3.0), Vec3::X);
        assert!(quad.hit(&ray, Interval::UNIVERSE).is_none());
    }

    #[test]
    fn test_quad_out_of_range() {
        let quad = unit_square();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!(quad.hit(&ray, Interval::new(0.001, 2.0)).is_none());
    }

    #[test]
    fn test_quad_hit_at_range_max() {
        let quad = unit_square();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let rec = quad.hit(&ray, Interval::new(0.001, 3.0)).unwrap();
        assert_eq!(rec.t, 3.0);
    }

    #[test]
    fn test_quad_back_face() {
        let quad = unit_square();
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, -6.0), Vec3::Z);
        let rec = quad.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        assert!(!rec.front_face);
        assert!((rec.normal + Vec3::Z).length() < 1e-9);
    }

    #[test]
    fn test_quad_bounding_box_is_padded() {
        let bbox = unit_square().bounding_box();
        assert!(bbox.z.size() > 0.0);
        assert!(bbox.z.contains(-3.0));
        assert_eq!(bbox.x, Interval::new(-1.0, 1.0));
    }

    #[test]
    fn test_make_box() {
        let faces = Quad::make_box(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, grey());
        assert_eq!(faces.len(), 6);

        // Faces are padded, so the union reaches just past the corners
        let bbox = faces.bounding_box();
        for (axis, size) in [(bbox.x, 1.0), (bbox.y, 2.0), (bbox.z, 3.0)] {
            assert!(axis.min <= 0.0 && axis.min > -1e-3, "{axis:?}");
            assert!(axis.max >= size && axis.max < size + 1e-3, "{axis:?}");
        }

        // Rays from every side hit the box at its surface
        let center = Vec3::new(0.5, 1.0, 1.5);
        let interval = Interval::new(0.001, f64::INFINITY);
        for dir in [Vec3::X, -Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::Z] {
            let origin = center - 10.0 * dir;
            let rec = faces.hit(&Ray::new_simple(origin, dir), interval).unwrap();
            assert!(rec.front_face, "face facing {:?} should be outward", -dir);
            assert!((rec.normal + dir).length() < 1e-9);
        }
    }
}
