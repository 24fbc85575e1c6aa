//! Boxes made of six rectangles.

use std::sync::Arc;

use crate::{AaRect, HitRecord, Hittable, HittableList, Material, Ray};
use nw_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// Axis-aligned box between two corners, sharing one material on all sides.
pub struct Cuboid {
    sides: HittableList,
    bbox: Aabb,
}

impl Cuboid {
    pub fn new(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> Self {
        let min = a.min(b);
        let max = a.max(b);

        let mut sides = HittableList::new();
        let x = (min.x, max.x);
        let y = (min.y, max.y);
        let z = (min.z, max.z);

        sides.add(Arc::new(AaRect::xy(x, y, max.z, material.clone())));
        sides.add(Arc::new(AaRect::xy(x, y, min.z, material.clone())));
        sides.add(Arc::new(AaRect::xz(x, z, max.y, material.clone())));
        sides.add(Arc::new(AaRect::xz(x, z, min.y, material.clone())));
        sides.add(Arc::new(AaRect::yz(y, z, max.x, material.clone())));
        sides.add(Arc::new(AaRect::yz(y, z, min.x, material)));

        Self {
            sides,
            bbox: Aabb::from_points(min, max),
        }
    }
}

impl Hittable for Cuboid {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        self.sides.hit(ray, ray_t, rng)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
