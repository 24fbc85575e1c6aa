//! CPU path tracer.
//!
//! A Monte Carlo path tracer with motion blur, depth of field, procedural and
//! image textures, area lights, instance transforms, and constant-density
//! participating media, accelerated by a bounding volume hierarchy.
//!
//! Every random draw takes an explicit `&mut dyn RngCore`. Rendering hands
//! each image bucket its own seeded generator, so output is reproducible.

pub mod sampling;
pub mod perlin;
pub mod texture;
pub mod material;
mod hittable;
mod sphere;
mod aarect;
mod cuboid;
mod transform;
mod constant_medium;
mod bvh;
mod camera;
pub mod renderer;
pub mod bucket;
pub mod scenes;

pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterResult};
pub use texture::{CheckerTexture, ImageTexture, NoiseStyle, NoiseTexture, SolidColor, Texture};
pub use sphere::{sphere_uv, MovingSphere, Sphere};
pub use aarect::{AaRect, Plane};
pub use cuboid::Cuboid;
pub use transform::{RotateY, Translate};
pub use constant_medium::ConstantMedium;
pub use bvh::BvhNode;
pub use camera::Camera;
pub use renderer::{
    color_to_rgb, ray_color, render, render_pixel, Background, ImageBuffer, RenderConfig,
};
pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use scenes::{build_scene, Scene, SceneKind, SceneOptions};

/// Re-export the math types from nw_math
pub use nw_math::{Aabb, Color, Interval, Ray, Vec3};
