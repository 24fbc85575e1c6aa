//! Perlin gradient noise.

use crate::sampling::random_unit_vector;
use nw_math::Vec3;
use rand::{Rng, RngCore};

const POINT_COUNT: usize = 256;

/// Octaves summed by `turbulence_default`.
pub const DEFAULT_TURBULENCE_DEPTH: u32 = 7;

/// Gradient noise field.
///
/// Built once from a generator and immutable afterwards, so it can be
/// evaluated from any number of threads.
pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let gradients = (0..POINT_COUNT).map(|_| random_unit_vector(rng)).collect();

        Self {
            gradients,
            perm_x: generate_permutation(rng),
            perm_y: generate_permutation(rng),
            perm_z: generate_permutation(rng),
        }
    }

    /// Noise value at `p`, roughly in [-1, 1].
    pub fn noise(&self, p: Vec3) -> f64 {
        let u = p.x - p.x.floor();
        let v = p.y - p.y.floor();
        let w = p.z - p.z.floor();

        let i = p.x.floor() as i64;
        let j = p.y.floor() as i64;
        let k = p.z.floor() as i64;

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    let idx = self.perm_x[lattice(i, di)]
                        ^ self.perm_y[lattice(j, dj)]
                        ^ self.perm_z[lattice(k, dk)];
                    *cell = self.gradients[idx];
                }
            }
        }

        perlin_interp(&c, u, v, w)
    }

    /// |Σ wᵢ·noise(2ⁱ·p)| over `depth` octaves, with the weight halving each
    /// octave.
    pub fn turbulence(&self, p: Vec3, depth: u32) -> f64 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }

    pub fn turbulence_default(&self, p: Vec3) -> f64 {
        self.turbulence(p, DEFAULT_TURBULENCE_DEPTH)
    }
}

#[inline]
fn lattice(base: i64, offset: usize) -> usize {
    ((base + offset as i64) & 255) as usize
}

fn generate_permutation(rng: &mut dyn RngCore) -> Vec<usize> {
    let mut p: Vec<usize> = (0..POINT_COUNT).collect();
    // Fisher-Yates
    for i in (1..POINT_COUNT).rev() {
        let target = rng.gen_range(0..=i);
        p.swap(i, target);
    }
    p
}

/// Hermite-smoothed trilinear blend of the gradient dot products.
fn perlin_interp(c: &[[[Vec3; 2]; 2]; 2], u: f64, v: f64, w: f64) -> f64 {
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);

    let mut accum = 0.0;
    for (i, plane) in c.iter().enumerate() {
        for (j, row) in plane.iter().enumerate() {
            for (k, gradient) in row.iter().enumerate() {
                let (fi, fj, fk) = (i as f64, j as f64, k as f64);
                let weight = Vec3::new(u - fi, v - fj, w - fk);
                accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * gradient.dot(weight);
            }
        }
    }
    accum
}
