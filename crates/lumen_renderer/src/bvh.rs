//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree of bounding boxes built by median split along the longest
//! axis of each node's box. Leaves are the scene objects themselves.

use crate::{HitRecord, Hittable, RenderError};
use lumen_math::{Aabb, Interval, Ray};
use std::sync::Arc;

/// One side of a [`BvhNode`]: a nested node or a scene object.
#[derive(Clone)]
pub enum BvhChild {
    Node(Arc<BvhNode>),
    Object(Arc<dyn Hittable>),
}

impl Hittable for BvhChild {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        match self {
            BvhChild::Node(node) => node.hit(ray, ray_t),
            BvhChild::Object(object) => object.hit(ray, ray_t),
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhChild::Node(node) => node.bounding_box(),
            BvhChild::Object(object) => object.bounding_box(),
        }
    }
}

/// BVH node with two children.
///
/// A span of one object stores it as both children; a span of two stores
/// them as left and right in their original order.
pub struct BvhNode {
    left: BvhChild,
    right: BvhChild,
    bbox: Aabb,
}

impl BvhNode {
    /// Create a BVH over the given objects.
    pub fn new(objects: Vec<Arc<dyn Hittable>>) -> Result<Self, RenderError> {
        if objects.is_empty() {
            return Err(RenderError::EmptyScene);
        }
        let count = objects.len();
        let node = Self::build(objects);
        log::info!("Built BVH over {} objects, bounds {:?}", count, node.bbox);
        Ok(node)
    }

    /// Recursive construction over a non-empty span.
    fn build(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        let bbox = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));

        match objects.len() {
            1 => {
                let only = objects.remove(0);
                Self {
                    left: BvhChild::Object(only.clone()),
                    right: BvhChild::Object(only),
                    bbox,
                }
            }
            2 => {
                let right = BvhChild::Object(objects.remove(1));
                let left = BvhChild::Object(objects.remove(0));
                Self { left, right, bbox }
            }
            n => {
                let axis = bbox.longest_axis();

                // Stable sort keeps equal keys in input order
                objects.sort_by(|a, b| {
                    let a_min = a.bounding_box().axis_interval(axis).min;
                    let b_min = b.bounding_box().axis_interval(axis).min;
                    a_min.total_cmp(&b_min)
                });

                let right_objects = objects.split_off(n / 2);
                let left = BvhChild::Node(Arc::new(Self::build(objects)));
                let right = BvhChild::Node(Arc::new(Self::build(right_objects)));

                Self { left, right, bbox }
            }
        }
    }

    pub fn left(&self) -> &BvhChild {
        &self.left
    }

    pub fn right(&self) -> &BvhChild {
        &self.right
    }
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        self.bbox.hit(ray, ray_t)?;

        let hit_left = self.left.hit(ray, ray_t);

        // Right searches up to and including the left hit, so it wins ties
        let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
        let hit_right = self.right.hit(ray, Interval::new(ray_t.min, right_max));

        hit_right.or(hit_left)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::{gen_range, random_vec};
    use crate::{Color, HittableList, Lambertian, Material, Quad, Sphere, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    fn is_object(child: &BvhChild, object: &Arc<dyn Hittable>) -> bool {
        match child {
            BvhChild::Object(o) => Arc::as_ptr(o) as *const () == Arc::as_ptr(object) as *const (),
            BvhChild::Node(_) => false,
        }
    }

    fn random_spheres(rng: &mut StdRng, count: usize, extent: f64) -> Vec<Arc<dyn Hittable>> {
        (0..count)
            .map(|_| {
                let center = random_vec(rng, -extent, extent);
                let radius = gen_range(rng, 0.2, 3.0);
                Arc::new(Sphere::new(center, radius, grey())) as Arc<dyn Hittable>
            })
            .collect()
    }

    /// Check every node's box against its children and count the leaves reached.
    fn check_node(node: &BvhNode) -> usize {
        let union = Aabb::surrounding(&node.left().bounding_box(), &node.right().bounding_box());
        assert_eq!(node.bounding_box(), union);

        [node.left(), node.right()]
            .into_iter()
            .map(|child| match child {
                BvhChild::Node(inner) => check_node(inner),
                BvhChild::Object(_) => 1,
            })
            .sum()
    }

    #[test]
    fn test_empty_bvh_is_error() {
        assert!(matches!(BvhNode::new(Vec::new()), Err(RenderError::EmptyScene)));
    }

    #[test]
    fn test_single_object_aliases_children() {
        let sphere: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::ZERO, 1.0, grey()));
        let bvh = BvhNode::new(vec![sphere.clone()]).unwrap();

        assert!(is_object(bvh.left(), &sphere));
        assert!(is_object(bvh.right(), &sphere));
        assert_eq!(bvh.bounding_box(), sphere.bounding_box());

        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = bvh.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        assert!((rec.t - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_objects_keep_order() {
        let a: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::new(5.0, 0.0, 0.0), 1.0, grey()));
        let b: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::new(-5.0, 0.0, 0.0), 1.0, grey()));
        let bvh = BvhNode::new(vec![a.clone(), b.clone()]).unwrap();

        assert!(is_object(bvh.left(), &a));
        assert!(is_object(bvh.right(), &b));
    }

    #[test]
    fn test_every_node_bounds_its_children() {
        let mut rng = StdRng::seed_from_u64(11);

        for count in [3, 5, 8, 37, 100] {
            let objects = random_spheres(&mut rng, count, 20.0);
            let list: HittableList = objects.iter().cloned().collect();
            let bvh = BvhNode::new(objects).unwrap();

            assert_eq!(bvh.bounding_box(), list.bounding_box());
            // Each object sits in exactly one leaf slot
            assert_eq!(check_node(&bvh), count);
        }
    }

    #[test]
    fn test_tie_right_wins() {
        let first: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(1.0, 0.0, 0.0)));
        let second: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.0, 0.0, 1.0)));
        let corner = Vec3::new(-1.0, -1.0, -2.0);

        let bvh = BvhNode::new(vec![
            Arc::new(Quad::new(corner, 2.0 * Vec3::X, 2.0 * Vec3::Y, first)),
            Arc::new(Quad::new(corner, 2.0 * Vec3::X, 2.0 * Vec3::Y, second.clone())),
        ])
        .unwrap();

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = bvh.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();

        assert!((rec.t - 2.0).abs() < 1e-12);
        let expected = Arc::as_ptr(&second) as *const ();
        assert_eq!(rec.material as *const dyn Material as *const (), expected);
    }

    #[test]
    fn test_bvh_matches_linear_scan() {
        let mut rng = StdRng::seed_from_u64(0xB4);
        let interval = Interval::new(0.001, f64::INFINITY);

        for scene in 0..120 {
            let count = 2 + (scene * 37) % 499;
            let objects = random_spheres(&mut rng, count, 50.0);
            let list: HittableList = objects.iter().cloned().collect();
            let bvh = BvhNode::new(objects).unwrap();

            for _ in 0..20 {
                let origin = random_vec(&mut rng, -80.0, 80.0);
                let target = random_vec(&mut rng, -40.0, 40.0);
                let ray = Ray::new_simple(origin, target - origin);

                let expected = list.hit(&ray, interval);
                let actual = bvh.hit(&ray, interval);
                match (expected, actual) {
                    (None, None) => {}
                    (Some(e), Some(a)) => {
                        assert!((e.t - a.t).abs() < 1e-9, "scene {scene}: {} vs {}", e.t, a.t);
                        assert!((e.p - a.p).length() < 1e-6);
                    }
                    (e, a) => panic!(
                        "scene {scene}: list hit {} but bvh hit {}",
                        e.is_some(),
                        a.is_some()
                    ),
                }
            }
        }
    }

    #[test]
    fn test_into_bvh_from_list() {
        let list = HittableList::new()
            .with(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, grey())))
            .with(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -8.0), 1.0, grey())))
            .with(Arc::new(Sphere::new(Vec3::new(3.0, 0.0, -5.0), 1.0, grey())));

        let bvh = list.into_bvh().unwrap();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = bvh.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-9);
    }
}
