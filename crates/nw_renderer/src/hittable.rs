//! Hittable trait and HitRecord for ray-object intersection.

use std::sync::Arc;

use crate::{Material, Ray};
use nw_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// Record of a ray-object intersection.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal, always facing against the incoming ray
    pub normal: Vec3,
    pub material: &'a dyn Material,
    /// Surface coordinates
    pub u: f64,
    pub v: f64,
    /// Ray parameter of the intersection
    pub t: f64,
    /// Whether the ray hit the outside of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record, orienting `outward_normal` against the ray.
    pub fn new(
        ray: &Ray,
        t: f64,
        outward_normal: Vec3,
        (u, v): (f64, f64),
        material: &'a dyn Material,
    ) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            u,
            v,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the normal from the geometric outward normal (unit length).
    ///
    /// If the ray travels along the outward normal we are inside the
    /// surface: the stored normal is flipped and `front_face` cleared.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Anything a ray can intersect.
///
/// Scene objects are immutable once built and shared as `Arc<dyn Hittable>`
/// between lists, BVH nodes and wrappers.
pub trait Hittable: Send + Sync {
    /// Closest intersection with `t` inside `ray_t` (inclusive), if any.
    ///
    /// The generator is only consumed by stochastic objects such as
    /// participating media.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore)
        -> Option<HitRecord<'a>>;

    /// Bounding box of the object over the whole shutter interval.
    fn bounding_box(&self) -> Aabb;
}

/// A list of hittable objects, tested one after the other.
#[derive(Clone, Default)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
    bbox: Option<Aabb>,
}

impl HittableList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        let object_box = object.bounding_box();
        self.bbox = Some(match self.bbox {
            Some(bbox) => Aabb::surrounding(&bbox, &object_box),
            None => object_box,
        });
        self.objects.push(object);
    }

    pub fn into_objects(self) -> Vec<Arc<dyn Hittable>> {
        self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for HittableList {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let mut closest: Option<HitRecord<'a>> = None;

        for object in &self.objects {
            let max = closest.map_or(ray_t.max, |rec| rec.t);
            if let Some(rec) = object.hit(ray, Interval::new(ray_t.min, max), rng) {
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox.unwrap_or(Aabb::EMPTY)
    }
}
