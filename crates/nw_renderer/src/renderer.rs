//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with a hard depth cutoff
//! - Emission from lights, solid or sky backgrounds
//! - Anti-aliasing via multi-sampling
//! - Parallel bucket rendering with rayon

use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::{Camera, Hittable, Ray};
use image::{Rgb, RgbImage};
use nw_math::{Color, Interval};
use rand::RngCore;
use rayon::prelude::*;

/// What a ray sees when it escapes the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    Solid(Color),
    /// Vertical white to light blue gradient.
    Sky,
}

impl Background {
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::Sky => sky_gradient(ray),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::ZERO)
    }
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    pub background: Background,
    /// Apply gamma 2 when converting to 8-bit
    pub gamma: bool,
    /// Base seed for the per-bucket generators
    pub seed: u64,
}

impl RenderConfig {
    /// Quality settings taken from a camera, everything else default.
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            samples_per_pixel: camera.samples_per_pixel,
            max_depth: camera.max_depth,
            ..Self::default()
        }
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            background: Background::default(),
            gamma: true,
            seed: 0,
        }
    }
}

/// Compute the color seen by a ray.
///
/// Bounces until the ray escapes, is absorbed, or `depth` runs out. Running
/// out of depth returns black.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(0.001, f64::INFINITY), rng) else {
        return background.color(ray);
    };

    let emitted = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let incoming = ray_color(&result.scattered, world, depth - 1, background, rng);
            emitted + result.attenuation * incoming
        }
        None => emitted,
    }
}

fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::ONE;
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Average of `samples_per_pixel` jittered rays through pixel (x, y).
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let samples = config.samples_per_pixel.max(1);
    let mut pixel_color = Color::ZERO;

    for _ in 0..samples {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, config.max_depth, &config.background, rng);
    }

    pixel_color / samples as f64
}

/// Gamma 2 correction.
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGB.
///
/// Channels are clamped to [0, 0.999] before scaling by 256, so 1.0 maps to
/// 255. NaN channels come out as 0.
pub fn color_to_rgb(color: Color, gamma: bool) -> [u8; 3] {
    let intensity = Interval::new(0.0, 0.999);
    let convert = |c: f64| {
        let c = if gamma { linear_to_gamma(c) } else { c };
        (256.0 * intensity.clamp(c)) as u8
    };
    [convert(color.x), convert(color.y), convert(color.z)]
}

/// Linear color image, row 0 at the top.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

impl ImageBuffer {
    /// A black image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; pixel_count(width, height)],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Copy a finished bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            self.set(bucket.x + local_x, bucket.y + local_y, *color);
        }
    }

    /// Write an ASCII PPM (P3), one pixel per line.
    pub fn write_ppm<W: Write>(&self, out: &mut W, gamma: bool) -> io::Result<()> {
        write!(out, "P3\n{} {}\n255\n", self.width, self.height)?;
        for color in &self.pixels {
            let [r, g, b] = color_to_rgb(*color, gamma);
            writeln!(out, "{} {} {}", r, g, b)?;
        }
        Ok(())
    }

    /// Encode with `image`. The format follows the file extension.
    pub fn save_png(&self, path: &Path, gamma: bool) -> image::ImageResult<()> {
        let image = RgbImage::from_fn(self.width, self.height, |x, y| {
            Rgb(color_to_rgb(self.get(x, y), gamma))
        });
        image.save(path)
    }
}

/// Render the whole image in parallel.
///
/// Buckets are rendered center-out on the rayon pool. The result depends
/// only on the scene and `config.seed`.
pub fn render(camera: &Camera, world: &dyn Hittable, config: &RenderConfig) -> ImageBuffer {
    let start = Instant::now();
    let buckets = generate_buckets(camera.image_width, camera.image_height, DEFAULT_BUCKET_SIZE);
    let total = buckets.len();
    let report_every = (total / 10).max(1);
    let finished = AtomicUsize::new(0);

    log::info!(
        "Rendering {}x{} at {} spp, depth {} ({} buckets, {} threads)",
        camera.image_width,
        camera.image_height,
        config.samples_per_pixel,
        config.max_depth,
        total,
        rayon::current_num_threads()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let result = render_bucket(bucket, camera, world, config);
            let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
            if done % report_every == 0 || done == total {
                log::info!(
                    "{}/{} buckets ({:.0}%)",
                    done,
                    total,
                    100.0 * done as f64 / total as f64
                );
            }
            result
        })
        .collect();

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}
