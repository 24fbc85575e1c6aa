//! Participating media of constant density (fog, smoke).

use std::sync::Arc;

use crate::material::Isotropic;
use crate::sampling::gen_f64;
use crate::texture::Texture;
use crate::{HitRecord, Hittable, Ray};
use nw_math::{Aabb, Color, Interval, Vec3};
use rand::RngCore;

/// A volume filling the inside of a boundary object.
///
/// A ray crossing the volume scatters at an exponentially distributed
/// distance, or passes through untouched.
///
/// The boundary must be convex: entry and exit are found with two
/// successive hit queries, which only sees the first segment of a concave
/// shape.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    neg_inv_density: f64,
    phase_function: Isotropic,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Hittable>, density: f64, albedo: Arc<dyn Texture>) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Isotropic::new(albedo),
        }
    }

    pub fn from_color(boundary: Arc<dyn Hittable>, density: f64, albedo: Color) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Isotropic::from_color(albedo),
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let entry = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let exit = self
            .boundary
            .hit(ray, Interval::new(entry.t + 0.0001, f64::INFINITY), rng)?;

        let mut t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return None;
        }
        // Camera inside the medium.
        t_enter = t_enter.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside = (t_exit - t_enter) * ray_length;
        // 1 - xi keeps the log argument in (0, 1].
        let hit_distance = self.neg_inv_density * (1.0 - gen_f64(rng)).ln();
        if hit_distance > distance_inside {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;
        Some(HitRecord {
            p: ray.at(t),
            // Arbitrary: the phase function ignores it.
            normal: Vec3::X,
            material: &self.phase_function,
            u: 0.0,
            v: 0.0,
            t,
            front_face: true,
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}
