//! Camera for ray generation.

use crate::sampling::{gen_f64, gen_range_f64, random_in_unit_disk};
use crate::Ray;
use nw_math::Vec3;
use rand::RngCore;

/// Thin-lens camera with a shutter interval.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f64,       // Vertical field of view in degrees
    aperture: f64,   // Lens diameter, 0 for a pinhole
    focus_dist: f64, // Distance from camera to plane of perfect focus

    // Shutter
    time0: f64,
    time1: f64,

    // Cached computed values (set by initialize())
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f64,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            image_width: 400,
            image_height: 225,
            samples_per_pixel: 100,
            max_depth: 50,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aperture: 0.0,
            focus_dist: 1.0,
            time0: 0.0,
            time1: 1.0,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            lens_radius: 0.0,
        }
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width.max(1);
        self.image_height = height.max(1);
        self
    }

    /// Set the width and derive the height from an aspect ratio.
    pub fn with_aspect_ratio(self, width: u32, aspect_ratio: f64) -> Self {
        let height = (width as f64 / aspect_ratio) as u32;
        self.with_resolution(width, height)
    }

    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples.max(1);
        self.max_depth = max_depth;
        self
    }

    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    pub fn with_lens(mut self, vfov: f64, aperture: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.aperture = aperture.max(0.0);
        self.focus_dist = focus_dist;
        self
    }

    /// Rays are fired at uniformly random times in `[time0, time1)`.
    pub fn with_shutter(mut self, time0: f64, time1: f64) -> Self {
        self.time0 = time0;
        self.time1 = time1;
        self
    }

    /// Must be called after configuration and before `get_ray`.
    pub fn initialize(&mut self) {
        self.center = self.look_from;

        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width =
            viewport_height * (self.image_width as f64 / self.image_height as f64);

        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        // Image rows go down the screen.
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        self.pixel_delta_u = viewport_u / self.image_width as f64;
        self.pixel_delta_v = viewport_v / self.image_height as f64;

        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        self.lens_radius = self.aperture / 2.0;
    }

    /// A jittered ray through pixel (i, j), row 0 at the top.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset_u = gen_f64(rng) - 0.5;
        let offset_v = gen_f64(rng) - 0.5;
        self.ray_through(i as f64 + offset_u, j as f64 + offset_v, rng)
    }

    /// Ray through the exact center of pixel (i, j).
    pub fn center_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        self.ray_through(i as f64, j as f64, rng)
    }

    fn ray_through(&self, x: f64, y: f64, rng: &mut dyn RngCore) -> Ray {
        let pixel_sample = self.pixel00_loc + x * self.pixel_delta_u + y * self.pixel_delta_v;

        let ray_origin = if self.lens_radius <= 0.0 {
            self.center
        } else {
            let p = self.lens_radius * random_in_unit_disk(rng);
            self.center + p.x * self.u + p.y * self.v
        };

        let ray_time = if self.time1 > self.time0 {
            gen_range_f64(rng, self.time0, self.time1)
        } else {
            self.time0
        };

        Ray::new(ray_origin, pixel_sample - ray_origin, ray_time)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
