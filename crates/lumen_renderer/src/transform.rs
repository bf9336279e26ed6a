//! Affine instance wrapper around a child surface.
//!
//! Rays are moved into the child's object space with the inverse transform,
//! and the hit is moved back out: points through the forward matrix,
//! normals through the inverse transpose.

use crate::hittable::{HitRecord, Hittable};
use lumen_math::{Aabb, Affine, Interval, Ray};
use std::sync::Arc;

/// A child surface placed in the world by an affine transform.
pub struct Transform {
    object: Arc<dyn Hittable>,
    affine: Affine,
    bbox: Aabb,
}

impl Transform {
    pub fn new(object: Arc<dyn Hittable>, affine: Affine) -> Self {
        let bbox = object.bounding_box().transformed(&affine);
        Self {
            object,
            affine,
            bbox,
        }
    }

    pub fn affine(&self) -> &Affine {
        &self.affine
    }
}

impl Hittable for Transform {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // World space to object space. The direction is not renormalized,
        // so t means the same thing in both spaces.
        let local_ray = Ray::new(
            self.affine.invert_point(ray.origin()),
            self.affine.invert_vector(ray.direction()),
            ray.time(),
        );

        let mut rec = self.object.hit(&local_ray, ray_t)?;

        rec.p = self.affine.apply_point(rec.p);
        rec.normal = self.affine.apply_normal(rec.normal);

        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
