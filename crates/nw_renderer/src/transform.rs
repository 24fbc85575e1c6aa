//! Instance transforms: move or rotate a shared child object.
//!
//! The child stays in its own local frame. Rays are brought into that frame,
//! intersected, and the hit is carried back to world space.

use std::sync::Arc;

use crate::{HitRecord, Hittable, Ray};
use nw_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// Offsets a child object by a fixed vector.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let moved = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());
        let mut rec = self.object.hit(&moved, ray_t, rng)?;

        rec.p += self.offset;
        // Translation leaves directions alone; re-derive facing anyway so
        // the record is consistent with the world ray.
        let outward = if rec.front_face { rec.normal } else { -rec.normal };
        rec.set_face_normal(ray, outward);
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Rotates a child object about the world Y axis.
pub struct RotateY {
    object: Arc<dyn Hittable>,
    sin_theta: f64,
    cos_theta: f64,
    bbox: Aabb,
}

impl RotateY {
    /// `angle` is in degrees, counter-clockwise looking down -Y.
    pub fn new(object: Arc<dyn Hittable>, angle: f64) -> Self {
        let radians = angle.to_radians();
        let sin_theta = radians.sin();
        let cos_theta = radians.cos();

        // Rotation does not preserve axis alignment: bound all 8 corners.
        let local = object.bounding_box();
        let mut min = Vec3::splat(f64::INFINITY);
        let mut max = Vec3::splat(f64::NEG_INFINITY);
        for corner in local.corners() {
            let rotated = rotate(corner, sin_theta, cos_theta);
            min = min.min(rotated);
            max = max.max(rotated);
        }

        Self {
            object,
            sin_theta,
            cos_theta,
            bbox: Aabb::from_points(min, max),
        }
    }

    /// World to object space.
    fn to_local(&self, v: Vec3) -> Vec3 {
        rotate(v, -self.sin_theta, self.cos_theta)
    }

    /// Object to world space.
    fn to_world(&self, v: Vec3) -> Vec3 {
        rotate(v, self.sin_theta, self.cos_theta)
    }
}

#[inline]
fn rotate(v: Vec3, sin_theta: f64, cos_theta: f64) -> Vec3 {
    Vec3::new(
        cos_theta * v.x + sin_theta * v.z,
        v.y,
        -sin_theta * v.x + cos_theta * v.z,
    )
}

impl Hittable for RotateY {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let local_ray = Ray::new(
            self.to_local(ray.origin()),
            self.to_local(ray.direction()),
            ray.time(),
        );
        let mut rec = self.object.hit(&local_ray, ray_t, rng)?;

        rec.p = self.to_world(rec.p);
        let outward = if rec.front_face { rec.normal } else { -rec.normal };
        rec.set_face_normal(ray, self.to_world(outward));
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
