//! Random sampling helpers.
//!
//! Every function takes the generator explicitly. Render workers own one
//! generator each, so nothing here touches shared state.

use nw_math::Vec3;
use rand::{Rng, RngCore};

/// Uniform in [0, 1).
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Uniform in [min, max).
#[inline]
pub fn gen_range_f64(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    min + (max - min) * gen_f64(rng)
}

/// Uniformly chosen axis index: 0, 1 or 2.
#[inline]
pub fn gen_axis(rng: &mut dyn RngCore) -> usize {
    rng.gen_range(0..3)
}

pub fn random_vec(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f64(rng), gen_f64(rng), gen_f64(rng))
}

pub fn random_vec_range(rng: &mut dyn RngCore, min: f64, max: f64) -> Vec3 {
    Vec3::new(
        gen_range_f64(rng, min, max),
        gen_range_f64(rng, min, max),
        gen_range_f64(rng, min, max),
    )
}

/// Rejection-sampled point strictly inside the unit sphere.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_vec_range(rng, -1.0, 1.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniformly distributed direction on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_vec_range(rng, -1.0, 1.0);
        let len_sq = p.length_squared();
        // Tiny vectors would blow up when normalized.
        if len_sq > 1e-160 && len_sq <= 1.0 {
            return p / len_sq.sqrt();
        }
    }
}

/// Point in the unit disk on the z = 0 plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_range_f64(rng, -1.0, 1.0),
            gen_range_f64(rng, -1.0, 1.0),
            0.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
