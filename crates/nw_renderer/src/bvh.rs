//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over shared hittables. Every branch caches the box around
//! both children, and a ray that misses the box skips the whole subtree.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::sampling::gen_axis;
use crate::{HitRecord, Hittable, Ray};
use nw_math::{Aabb, Interval};
use rand::RngCore;

/// BVH node.
pub enum BvhNode {
    /// Two children, which may be leaves or further nodes. A single object
    /// is stored as both children.
    Branch {
        left: Arc<dyn Hittable>,
        right: Arc<dyn Hittable>,
        bbox: Aabb,
    },
    /// Built from an empty list. Never hit.
    Empty,
}

/// Counters gathered while building, for the debug log.
#[derive(Debug, Default)]
struct BuildStats {
    nodes: usize,
    max_depth: usize,
}

impl BvhNode {
    /// Build a BVH over `objects`, choosing a random split axis per node.
    pub fn new(objects: Vec<Arc<dyn Hittable>>, rng: &mut dyn RngCore) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }

        let count = objects.len();
        let mut stats = BuildStats::default();
        let root = Self::build(objects, rng, 1, &mut stats);
        log::debug!(
            "Built BVH over {} objects: {} nodes, depth {}",
            count,
            stats.nodes,
            stats.max_depth
        );
        root
    }

    /// Median split on a random axis, ordered by each box's minimum.
    fn build(
        mut objects: Vec<Arc<dyn Hittable>>,
        rng: &mut dyn RngCore,
        depth: usize,
        stats: &mut BuildStats,
    ) -> Self {
        stats.nodes += 1;
        stats.max_depth = stats.max_depth.max(depth);

        let axis = gen_axis(rng);
        let compare = |a: &Arc<dyn Hittable>, b: &Arc<dyn Hittable>| box_compare(a, b, axis);

        let (left, right): (Arc<dyn Hittable>, Arc<dyn Hittable>) = match objects.len() {
            1 => (objects[0].clone(), objects[0].clone()),
            2 => {
                if compare(&objects[0], &objects[1]) == Ordering::Greater {
                    objects.swap(0, 1);
                }
                (objects[0].clone(), objects[1].clone())
            }
            n => {
                objects.sort_by(compare);
                let right_objects = objects.split_off(n / 2);
                (
                    Arc::new(Self::build(objects, rng, depth + 1, stats)),
                    Arc::new(Self::build(right_objects, rng, depth + 1, stats)),
                )
            }
        };

        let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());
        BvhNode::Branch { left, right, bbox }
    }
}

fn box_compare(a: &Arc<dyn Hittable>, b: &Arc<dyn Hittable>, axis: usize) -> Ordering {
    let a_min = a.bounding_box().axis_interval(axis).min;
    let b_min = b.bounding_box().axis_interval(axis).min;
    a_min.partial_cmp(&b_min).unwrap_or(Ordering::Equal)
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        match self {
            BvhNode::Empty => None,
            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t, rng);

                // Only check right up to the closest hit so far.
                let right_max = hit_left.map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rng);

                hit_right.or(hit_left)
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Lambertian, Material};
    use crate::sampling::{gen_range_f64, random_unit_vector, random_vec_range};
    use crate::{HittableList, MovingSphere, Sphere};
    use nw_math::{Color, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn forward() -> Interval {
        Interval::new(0.001, f64::INFINITY)
    }

    /// Spheres on a jittered grid so none overlap.
    fn disjoint_spheres(n: usize, rng: &mut dyn RngCore) -> Vec<Arc<dyn Hittable>> {
        (0..n)
            .map(|i| {
                let cell = Vec3::new((i % 10) as f64, ((i / 10) % 10) as f64, (i / 100) as f64);
                let center = cell * 3.0 + random_vec_range(rng, -0.5, 0.5);
                let radius = gen_range_f64(rng, 0.2, 0.9);
                let material: Arc<dyn Material> =
                    Arc::new(Lambertian::from_color(Color::splat(i as f64 / n as f64)));
                Arc::new(Sphere::new(center, radius, material)) as Arc<dyn Hittable>
            })
            .collect()
    }

    #[test]
    fn test_bvh_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        let bvh = BvhNode::new(vec![], &mut rng);
        assert!(matches!(bvh, BvhNode::Empty));

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);
        assert!(bvh.hit(&ray, forward(), &mut rng).is_none());
    }

    #[test]
    fn test_bvh_single_object_aliases_both_children() {
        let mut rng = StdRng::seed_from_u64(0);
        let objects = disjoint_spheres(1, &mut rng);
        let bvh = BvhNode::new(objects, &mut rng);

        match &bvh {
            BvhNode::Branch { left, right, .. } => assert!(Arc::ptr_eq(left, right)),
            BvhNode::Empty => panic!("expected a branch"),
        }
    }

    #[test]
    fn test_bvh_pair_is_ordered_on_axis() {
        let mut rng = StdRng::seed_from_u64(9);
        let material: Arc<dyn Material> = Arc::new(Lambertian::from_color(Color::ONE));
        // Far apart on every axis, listed high first.
        let high: Arc<dyn Hittable> =
            Arc::new(Sphere::new(Vec3::splat(10.0), 1.0, material.clone()));
        let low: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::ZERO, 1.0, material));

        let bvh = BvhNode::new(vec![high.clone(), low.clone()], &mut rng);
        match &bvh {
            BvhNode::Branch { left, right, bbox } => {
                assert!(Arc::ptr_eq(left, &low));
                assert!(Arc::ptr_eq(right, &high));
                assert_eq!(bbox.min(), Vec3::splat(-1.0));
                assert_eq!(bbox.max(), Vec3::splat(11.0));
            }
            BvhNode::Empty => panic!("expected a branch"),
        }
    }

    #[test]
    fn test_bvh_box_covers_all_objects() {
        let mut rng = StdRng::seed_from_u64(1);
        let objects = disjoint_spheres(57, &mut rng);
        let union = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));

        let bvh = BvhNode::new(objects, &mut rng);
        assert_eq!(bvh.bounding_box(), union);
    }

    #[test]
    fn test_bvh_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(2024);
        let objects = disjoint_spheres(250, &mut rng);

        let mut list = HittableList::new();
        for object in &objects {
            list.add(object.clone());
        }
        let bvh = BvhNode::new(objects, &mut rng);

        let mut hits = 0;
        for _ in 0..2000 {
            let origin = Vec3::new(
                gen_range_f64(&mut rng, -5.0, 32.0),
                gen_range_f64(&mut rng, -5.0, 32.0),
                gen_range_f64(&mut rng, -5.0, 12.0),
            );
            let ray = Ray::new_simple(origin, random_unit_vector(&mut rng));

            let expected = list.hit(&ray, forward(), &mut rng);
            let actual = bvh.hit(&ray, forward(), &mut rng);

            match (expected, actual) {
                (None, None) => {}
                (Some(e), Some(a)) => {
                    hits += 1;
                    assert_eq!(e.t, a.t);
                    assert_eq!(e.p, a.p);
                    assert_eq!(e.normal, a.normal);
                    assert_eq!(e.front_face, a.front_face);
                    assert!(std::ptr::addr_eq(e.material, a.material));
                }
                (e, a) => panic!(
                    "list hit: {}, bvh hit: {} for {:?}",
                    e.is_some(),
                    a.is_some(),
                    ray
                ),
            }
        }
        assert!(hits > 100, "only {} rays hit anything", hits);
    }

    #[test]
    fn test_bvh_matches_list_for_times_outside_keyframes() {
        let mut rng = StdRng::seed_from_u64(5);
        let material: Arc<dyn Material> = Arc::new(Lambertian::from_color(Color::splat(0.5)));
        let moving: Arc<dyn Hittable> = Arc::new(MovingSphere::new(
            (Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 2.0, -5.0)),
            (0.0, 1.0),
            0.5,
            material.clone(),
        ));
        let other: Arc<dyn Hittable> =
            Arc::new(Sphere::new(Vec3::new(6.0, 0.0, -5.0), 0.5, material));

        let mut list = HittableList::new();
        list.add(moving.clone());
        list.add(other.clone());
        let bvh = BvhNode::new(vec![moving, other], &mut rng);

        let dir = Vec3::new(0.0, 0.0, -1.0);
        for time in [-1.0, -0.25, 0.5, 1.5, 3.0] {
            for y in [-1.0, 0.0, 1.0, 2.0, 3.0] {
                let ray = Ray::new(Vec3::new(0.0, y, 0.0), dir, time);
                let expected = list.hit(&ray, forward(), &mut rng).map(|rec| rec.t);
                let actual = bvh.hit(&ray, forward(), &mut rng).map(|rec| rec.t);
                assert_eq!(expected, actual, "time {} height {}", time, y);
            }
        }
    }
}
