//! Bucket-based tile rendering.
//!
//! The image is cut into tiles (buckets) that render independently. Each
//! bucket owns a random generator seeded from its position, so the output
//! does not depend on which thread picks it up.

use crate::renderer::{render_pixel, RenderConfig};
use crate::{Camera, Hittable};
use nw_math::Color;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// A rectangular region of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// Top-left corner
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Seed for this bucket's generator. Depends only on the base seed and
    /// the bucket's corner, not on render order.
    pub fn seed(&self, base: u64) -> u64 {
        let position = ((self.y as u64) << 32) | self.x as u64;
        base.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ position
    }
}

/// Cut an image into buckets, sorted center-out.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance of their centers from the image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f64 / 2.0;
    let center_y = height as f64 / 2.0;
    let distance = |b: &Bucket| {
        let dx = b.x as f64 + b.width as f64 / 2.0 - center_x;
        let dy = b.y as f64 + b.height as f64 / 2.0 - center_y;
        dx * dx + dy * dy
    };

    buckets.sort_by(|a, b| {
        distance(a)
            .partial_cmp(&distance(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Pixel colors of one bucket, row-major.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    pub pixels: Vec<Color>,
}

/// Render every pixel in `bucket` with its own seeded generator.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
) -> BucketResult {
    let mut rng = StdRng::seed_from_u64(bucket.seed(config.seed));
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let x = bucket.x + local_x;
            let y = bucket.y + local_y;
            pixels.push(render_pixel(camera, world, x, y, config, &mut rng));
        }
    }

    BucketResult {
        bucket: *bucket,
        pixels,
    }
}
