//! Built-in demo scenes.
//!
//! Each scene builds its world into a BVH and picks its own camera, sample
//! count, and background. Scene randomness comes from `SceneOptions::seed`,
//! so a given seed always produces the same layout.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::material::{Dielectric, DiffuseLight, Lambertian, Material, Metal};
use crate::renderer::{Background, RenderConfig};
use crate::sampling::{gen_f64, gen_range_f64, random_vec, random_vec_range};
use crate::texture::{CheckerTexture, ImageTexture, NoiseTexture, Texture};
use crate::{
    AaRect, BvhNode, Camera, ConstantMedium, Cuboid, Hittable, HittableList, MovingSphere,
    RotateY, Sphere, Translate,
};
use nw_core::ImageCache;
use nw_math::{Color, Vec3};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

const EARTH_TEXTURE: &str = "earthmap.jpg";

/// The available demo scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneKind {
    RandomSpheres,
    TwoSpheres,
    TwoPerlinSpheres,
    Earth,
    SimpleLight,
    CornellBox,
    CornellSmoke,
    #[default]
    FinalScene,
}

impl SceneKind {
    pub const ALL: [SceneKind; 8] = [
        SceneKind::RandomSpheres,
        SceneKind::TwoSpheres,
        SceneKind::TwoPerlinSpheres,
        SceneKind::Earth,
        SceneKind::SimpleLight,
        SceneKind::CornellBox,
        SceneKind::CornellSmoke,
        SceneKind::FinalScene,
    ];

    /// Name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            SceneKind::RandomSpheres => "random-spheres",
            SceneKind::TwoSpheres => "two-spheres",
            SceneKind::TwoPerlinSpheres => "two-perlin-spheres",
            SceneKind::Earth => "earth",
            SceneKind::SimpleLight => "simple-light",
            SceneKind::CornellBox => "cornell-box",
            SceneKind::CornellSmoke => "cornell-smoke",
            SceneKind::FinalScene => "final",
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SceneKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = SceneKind::ALL.iter().map(|k| k.name()).collect();
                format!("unknown scene '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

/// Inputs shared by every scene builder.
#[derive(Debug, Clone)]
pub struct SceneOptions {
    /// Directory image textures are loaded from
    pub texture_dir: PathBuf,
    /// Seed for scene layout and procedural textures
    pub seed: u64,
    /// Overrides the scene's image width, keeping its aspect ratio
    pub width: Option<u32>,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            texture_dir: PathBuf::from("assets"),
            seed: 0,
            width: None,
        }
    }
}

/// A world ready to render.
pub struct Scene {
    pub world: BvhNode,
    pub camera: Camera,
    pub config: RenderConfig,
}

/// Camera placement and quality for one scene.
struct View {
    look_from: Vec3,
    look_at: Vec3,
    vfov: f64,
    aperture: f64,
    focus_dist: f64,
    aspect_ratio: f64,
    width: u32,
    samples: u32,
    max_depth: u32,
    background: Background,
}

impl View {
    /// The 16:9 view shared by the sphere scenes.
    fn wide(look_from: Vec3, look_at: Vec3) -> Self {
        Self {
            look_from,
            look_at,
            vfov: 20.0,
            aperture: 0.0,
            focus_dist: 10.0,
            aspect_ratio: 16.0 / 9.0,
            width: 400,
            samples: 100,
            max_depth: 50,
            background: Background::Sky,
        }
    }

    /// The square view into a 555-unit Cornell room.
    fn cornell() -> Self {
        Self {
            look_from: Vec3::new(278.0, 278.0, -800.0),
            look_at: Vec3::new(278.0, 278.0, 0.0),
            vfov: 40.0,
            aperture: 0.0,
            focus_dist: 10.0,
            aspect_ratio: 1.0,
            width: 600,
            samples: 200,
            max_depth: 50,
            background: Background::Solid(Color::ZERO),
        }
    }
}

/// Build `kind` with `options`.
pub fn build_scene(kind: SceneKind, options: &SceneOptions) -> Scene {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut textures = ImageCache::with_base_dir(options.texture_dir.clone());

    let (objects, view) = match kind {
        SceneKind::RandomSpheres => random_spheres(&mut rng),
        SceneKind::TwoSpheres => two_spheres(),
        SceneKind::TwoPerlinSpheres => two_perlin_spheres(&mut rng),
        SceneKind::Earth => earth(&mut textures),
        SceneKind::SimpleLight => simple_light(&mut rng),
        SceneKind::CornellBox => cornell_box(),
        SceneKind::CornellSmoke => cornell_smoke(),
        SceneKind::FinalScene => final_scene(&mut rng, &mut textures),
    };

    log::info!("Built scene '{}' with {} top-level objects", kind, objects.len());
    let world = BvhNode::new(objects.into_objects(), &mut rng);

    let width = options.width.unwrap_or(view.width);
    let mut camera = Camera::new()
        .with_aspect_ratio(width, view.aspect_ratio)
        .with_quality(view.samples, view.max_depth)
        .with_position(view.look_from, view.look_at, Vec3::Y)
        .with_lens(view.vfov, view.aperture, view.focus_dist)
        .with_shutter(0.0, 1.0);
    camera.initialize();

    let config = RenderConfig {
        seed: options.seed,
        ..RenderConfig::from_camera(&camera).with_background(view.background)
    };

    Scene {
        world,
        camera,
        config,
    }
}

fn lambertian(color: Color) -> Arc<dyn Material> {
    Arc::new(Lambertian::from_color(color))
}

fn light(intensity: f64) -> Arc<dyn Material> {
    Arc::new(DiffuseLight::from_color(Color::splat(intensity)))
}

fn sphere(center: Vec3, radius: f64, material: Arc<dyn Material>) -> Arc<dyn Hittable> {
    Arc::new(Sphere::new(center, radius, material))
}

fn random_spheres(rng: &mut dyn RngCore) -> (HittableList, View) {
    let mut world = HittableList::new();

    let checker: Arc<dyn Texture> = Arc::new(CheckerTexture::from_colors(
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    let ground: Arc<dyn Material> = Arc::new(Lambertian::new(checker));
    world.add(sphere(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f64(rng);
            let center = Vec3::new(
                a as f64 + 0.9 * gen_f64(rng),
                0.2,
                b as f64 + 0.9 * gen_f64(rng),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                let albedo = random_vec(rng) * random_vec(rng);
                let center1 = center + Vec3::new(0.0, gen_range_f64(rng, 0.0, 0.5), 0.0);
                world.add(Arc::new(MovingSphere::new(
                    (center, center1),
                    (0.0, 1.0),
                    0.2,
                    lambertian(albedo),
                )));
            } else if choose_mat < 0.95 {
                let albedo = random_vec_range(rng, 0.5, 1.0);
                let fuzz = gen_range_f64(rng, 0.0, 0.5);
                world.add(sphere(center, 0.2, Arc::new(Metal::new(albedo, fuzz))));
            } else {
                world.add(sphere(center, 0.2, Arc::new(Dielectric::new(1.5))));
            }
        }
    }

    world.add(sphere(Vec3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Dielectric::new(1.5))));
    world.add(sphere(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        lambertian(Color::new(0.4, 0.2, 0.1)),
    ));
    world.add(sphere(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    ));

    let view = View {
        aperture: 0.1,
        ..View::wide(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO)
    };
    (world, view)
}

fn two_spheres() -> (HittableList, View) {
    let checker: Arc<dyn Texture> = Arc::new(CheckerTexture::from_colors(
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    let material: Arc<dyn Material> = Arc::new(Lambertian::new(checker));

    let mut world = HittableList::new();
    world.add(sphere(Vec3::new(0.0, -10.0, 0.0), 10.0, material.clone()));
    world.add(sphere(Vec3::new(0.0, 10.0, 0.0), 10.0, material));

    (world, View::wide(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO))
}

fn perlin_spheres(rng: &mut dyn RngCore) -> HittableList {
    let noise: Arc<dyn Texture> = Arc::new(NoiseTexture::new(4.0, rng));
    let material: Arc<dyn Material> = Arc::new(Lambertian::new(noise));

    let mut world = HittableList::new();
    world.add(sphere(Vec3::new(0.0, -1000.0, 0.0), 1000.0, material.clone()));
    world.add(sphere(Vec3::new(0.0, 2.0, 0.0), 2.0, material));
    world
}

fn two_perlin_spheres(rng: &mut dyn RngCore) -> (HittableList, View) {
    let world = perlin_spheres(rng);
    (world, View::wide(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO))
}

fn earth(textures: &mut ImageCache) -> (HittableList, View) {
    let surface: Arc<dyn Texture> = Arc::new(ImageTexture::from_load(textures.load(EARTH_TEXTURE)));
    let mut world = HittableList::new();
    world.add(sphere(Vec3::ZERO, 2.0, Arc::new(Lambertian::new(surface))));

    (world, View::wide(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO))
}

fn simple_light(rng: &mut dyn RngCore) -> (HittableList, View) {
    let mut world = perlin_spheres(rng);
    world.add(Arc::new(AaRect::xy((3.0, 5.0), (1.0, 3.0), -2.0, light(4.0))));

    let view = View {
        samples: 400,
        background: Background::Solid(Color::ZERO),
        ..View::wide(Vec3::new(26.0, 3.0, 6.0), Vec3::new(0.0, 2.0, 0.0))
    };
    (world, view)
}

/// The five walls of the room, without a light.
fn cornell_walls() -> HittableList {
    let red = lambertian(Color::new(0.65, 0.05, 0.05));
    let white = lambertian(Color::splat(0.73));
    let green = lambertian(Color::new(0.12, 0.45, 0.15));
    let full = (0.0, 555.0);

    let mut walls = HittableList::new();
    walls.add(Arc::new(AaRect::yz(full, full, 555.0, green)));
    walls.add(Arc::new(AaRect::yz(full, full, 0.0, red)));
    walls.add(Arc::new(AaRect::xz(full, full, 0.0, white.clone())));
    walls.add(Arc::new(AaRect::xz(full, full, 555.0, white.clone())));
    walls.add(Arc::new(AaRect::xy(full, full, 555.0, white)));
    walls
}

/// Tall and short boxes, rotated and placed in the room.
fn cornell_blocks(material: Arc<dyn Material>) -> [Arc<dyn Hittable>; 2] {
    let tall: Arc<dyn Hittable> = Arc::new(Cuboid::new(
        Vec3::ZERO,
        Vec3::new(165.0, 330.0, 165.0),
        material.clone(),
    ));
    let tall: Arc<dyn Hittable> = Arc::new(RotateY::new(tall, 15.0));
    let tall: Arc<dyn Hittable> = Arc::new(Translate::new(tall, Vec3::new(265.0, 0.0, 295.0)));

    let short: Arc<dyn Hittable> = Arc::new(Cuboid::new(Vec3::ZERO, Vec3::splat(165.0), material));
    let short: Arc<dyn Hittable> = Arc::new(RotateY::new(short, -18.0));
    let short: Arc<dyn Hittable> = Arc::new(Translate::new(short, Vec3::new(130.0, 0.0, 65.0)));

    [tall, short]
}

fn cornell_box() -> (HittableList, View) {
    let mut world = cornell_walls();
    world.add(Arc::new(AaRect::xz((213.0, 343.0), (227.0, 332.0), 554.0, light(15.0))));
    for block in cornell_blocks(lambertian(Color::splat(0.73))) {
        world.add(block);
    }

    (world, View::cornell())
}

fn cornell_smoke() -> (HittableList, View) {
    let mut world = cornell_walls();
    world.add(Arc::new(AaRect::xz((113.0, 443.0), (127.0, 432.0), 554.0, light(7.0))));

    let [tall, short] = cornell_blocks(lambertian(Color::splat(0.73)));
    world.add(Arc::new(ConstantMedium::from_color(tall, 0.01, Color::ZERO)));
    world.add(Arc::new(ConstantMedium::from_color(short, 0.01, Color::ONE)));

    (world, View::cornell())
}

fn final_scene(rng: &mut dyn RngCore, textures: &mut ImageCache) -> (HittableList, View) {
    let mut world = HittableList::new();

    // Floor of boxes with random heights.
    let ground = lambertian(Color::new(0.48, 0.83, 0.53));
    let mut floor = HittableList::new();
    let boxes_per_side = 20;
    let w = 100.0;
    for i in 0..boxes_per_side {
        for j in 0..boxes_per_side {
            let x0 = -1000.0 + i as f64 * w;
            let z0 = -1000.0 + j as f64 * w;
            let y1 = gen_range_f64(rng, 1.0, 101.0);
            floor.add(Arc::new(Cuboid::new(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x0 + w, y1, z0 + w),
                ground.clone(),
            )));
        }
    }
    world.add(Arc::new(BvhNode::new(floor.into_objects(), rng)));

    world.add(Arc::new(AaRect::xz((123.0, 423.0), (147.0, 412.0), 554.0, light(7.0))));

    let center0 = Vec3::new(400.0, 400.0, 200.0);
    let center1 = center0 + Vec3::new(30.0, 0.0, 0.0);
    world.add(Arc::new(MovingSphere::new(
        (center0, center1),
        (0.0, 1.0),
        50.0,
        lambertian(Color::new(0.7, 0.3, 0.1)),
    )));

    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    world.add(sphere(Vec3::new(260.0, 150.0, 45.0), 50.0, glass.clone()));
    world.add(sphere(
        Vec3::new(0.0, 150.0, 145.0),
        50.0,
        Arc::new(Metal::new(Color::new(0.8, 0.8, 0.9), 1.0)),
    ));

    // Glass shell filled with blue fog.
    let shell = sphere(Vec3::new(360.0, 150.0, 145.0), 70.0, glass.clone());
    world.add(shell.clone());
    world.add(Arc::new(ConstantMedium::from_color(
        shell,
        0.2,
        Color::new(0.2, 0.4, 0.9),
    )));

    // Thin mist over everything.
    let mist = sphere(Vec3::ZERO, 5000.0, glass);
    world.add(Arc::new(ConstantMedium::from_color(mist, 0.0001, Color::ONE)));

    let surface: Arc<dyn Texture> = Arc::new(ImageTexture::from_load(textures.load(EARTH_TEXTURE)));
    world.add(sphere(
        Vec3::new(400.0, 200.0, 400.0),
        100.0,
        Arc::new(Lambertian::new(surface)),
    ));

    let noise: Arc<dyn Texture> = Arc::new(NoiseTexture::new(0.1, rng));
    world.add(sphere(
        Vec3::new(220.0, 280.0, 300.0),
        80.0,
        Arc::new(Lambertian::new(noise)),
    ));

    // Cluster of small spheres, rotated and moved as one object.
    let white = lambertian(Color::splat(0.73));
    let mut cluster = HittableList::new();
    for _ in 0..1000 {
        cluster.add(sphere(random_vec_range(rng, 0.0, 165.0), 10.0, white.clone()));
    }
    let cluster: Arc<dyn Hittable> = Arc::new(BvhNode::new(cluster.into_objects(), rng));
    let cluster = Arc::new(RotateY::new(cluster, 15.0));
    world.add(Arc::new(Translate::new(cluster, Vec3::new(-100.0, 270.0, 395.0))));

    let view = View {
        look_from: Vec3::new(478.0, 278.0, -600.0),
        samples: 1000,
        max_depth: 40,
        ..View::cornell()
    };
    (world, view)
}
