//! Sphere primitives, static and moving.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::{HitRecord, Hittable, Material, Ray};
use nw_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f64,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f64, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);

        Self {
            center,
            radius,
            material,
            bbox: Aabb::from_points(center - rvec, center + rvec),
        }
    }

}

impl Hittable for Sphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        hit_sphere(self.center, self.radius, self.material.as_ref(), ray, ray_t)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// A sphere whose center moves linearly between two keyframes.
///
/// Rays are tested against the center at `ray.time()`. Outside the keyframe
/// interval the sphere rests at the nearer keyframe, so the keyframe box
/// bounds it at every time.
pub struct MovingSphere {
    center0: Vec3,
    center1: Vec3,
    time0: f64,
    time1: f64,
    radius: f64,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl MovingSphere {
    pub fn new(
        (center0, center1): (Vec3, Vec3),
        (time0, time1): (f64, f64),
        radius: f64,
        material: Arc<dyn Material>,
    ) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let box0 = Aabb::from_points(center0 - rvec, center0 + rvec);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);

        Self {
            center0,
            center1,
            time0,
            time1,
            radius,
            material,
            bbox: Aabb::surrounding(&box0, &box1),
        }
    }

    /// Center position at `time`.
    pub fn center(&self, time: f64) -> Vec3 {
        let span = self.time1 - self.time0;
        if span == 0.0 {
            return self.center0;
        }
        let s = ((time - self.time0) / span).clamp(0.0, 1.0);
        self.center0 + s * (self.center1 - self.center0)
    }
}

impl Hittable for MovingSphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let center = self.center(ray.time());
        hit_sphere(center, self.radius, self.material.as_ref(), ray, ray_t)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Shared ray/sphere test using the reduced discriminant `h² - a·c`.
fn hit_sphere<'a>(
    center: Vec3,
    radius: f64,
    material: &'a dyn Material,
    ray: &Ray,
    ray_t: Interval,
) -> Option<HitRecord<'a>> {
    let oc = center - ray.origin();
    let a = ray.direction().length_squared();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrtd = discriminant.sqrt();

    // Nearest root in range, near one first.
    let mut root = (h - sqrtd) / a;
    if !ray_t.contains(root) {
        root = (h + sqrtd) / a;
        if !ray_t.contains(root) {
            return None;
        }
    }

    // A point sphere has no surface direction; face the incoming ray.
    let outward_normal = if radius > 0.0 {
        (ray.at(root) - center) / radius
    } else {
        -ray.direction().normalize_or_zero()
    };
    Some(HitRecord::new(
        ray,
        root,
        outward_normal,
        sphere_uv(outward_normal),
        material,
    ))
}

/// UV for a point on the unit sphere.
///
/// u: angle around Y from -X, v: angle from -Y up to +Y, both in [0, 1].
pub fn sphere_uv(p: Vec3) -> (f64, f64) {
    let theta = (-p.y).clamp(-1.0, 1.0).acos();
    let phi = (-p.z).atan2(p.x) + PI;
    (phi / (2.0 * PI), theta / PI)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use nw_math::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::from_color(Color::splat(0.5)))
    }

    fn everywhere() -> Interval {
        Interval::new(0.0, f64::INFINITY)
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(0);

        let rec = sphere.hit(&ray, everywhere(), &mut rng).unwrap();
        assert!((rec.t - 0.5).abs() < 1e-12);
        assert!((rec.normal - Vec3::Z).length() < 1e-12);
        assert!(rec.front_face);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(0);
        assert!(sphere.hit(&ray, everywhere(), &mut rng).is_none());
    }

    #[test]
    fn test_ray_through_two_surface_points_hits_nearer() {
        let center = Vec3::new(1.0, -2.0, 3.0);
        let radius = 2.0;
        let sphere = Sphere::new(center, radius, gray());
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let a = center + radius * crate::sampling::random_unit_vector(&mut rng);
            let b = center + radius * crate::sampling::random_unit_vector(&mut rng);
            if (a - b).length() < 1e-3 {
                continue;
            }
            // Start outside the sphere, on the far side of `a` from `b`.
            let direction = b - a;
            let origin = a - 3.0 * direction;
            let ray = Ray::new_simple(origin, direction);

            let rec = sphere.hit(&ray, everywhere(), &mut rng).unwrap();
            assert!((rec.p - a).length() < 1e-9, "hit {:?}, expected {:?}", rec.p, a);
            assert!((rec.t - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_falls_back_to_far_root_from_inside() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, gray());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);
        let mut rng = StdRng::seed_from_u64(0);

        let rec = sphere.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rng).unwrap();
        assert!((rec.t - 1.0).abs() < 1e-12);
        assert!(!rec.front_face);
        assert!((rec.normal + Vec3::X).length() < 1e-12);

        // Both roots outside the interval.
        assert!(sphere.hit(&ray, Interval::new(1.5, 10.0), &mut rng).is_none());
    }

    #[test]
    fn test_sphere_uv() {
        let cases = [
            (Vec3::new(1.0, 0.0, 0.0), (0.5, 0.5)),
            (Vec3::new(0.0, 1.0, 0.0), (0.5, 1.0)),
            (Vec3::new(-1.0, 0.0, 0.0), (0.0, 0.5)),
            (Vec3::new(0.0, 0.0, 1.0), (0.25, 0.5)),
            (Vec3::new(0.0, 0.0, -1.0), (0.75, 0.5)),
        ];
        for (p, (u, v)) in cases {
            let (gu, gv) = sphere_uv(p);
            assert!((gu - u).abs() < 1e-12 && (gv - v).abs() < 1e-12, "{:?}", p);
        }
    }

    #[test]
    fn test_moving_sphere_follows_ray_time() {
        let sphere = MovingSphere::new(
            (Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 2.0, -5.0)),
            (0.0, 1.0),
            0.5,
            gray(),
        );
        let mut rng = StdRng::seed_from_u64(0);
        let dir = Vec3::new(0.0, 0.0, -1.0);

        let early = Ray::new(Vec3::ZERO, dir, 0.0);
        let late = Ray::new(Vec3::ZERO, dir, 1.0);
        assert!(sphere.hit(&early, everywhere(), &mut rng).is_some());
        assert!(sphere.hit(&late, everywhere(), &mut rng).is_none());

        let raised = Ray::new(Vec3::new(0.0, 2.0, 0.0), dir, 1.0);
        let rec = sphere.hit(&raised, everywhere(), &mut rng).unwrap();
        assert!((rec.t - 4.5).abs() < 1e-12);

        assert_eq!(sphere.center(0.5), Vec3::new(0.0, 1.0, -5.0));
        let bbox = sphere.bounding_box();
        assert_eq!(bbox.y, Interval::new(-0.5, 2.5));
    }

    #[test]
    fn test_moving_sphere_rests_outside_keyframes() {
        let sphere = MovingSphere::new(
            (Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 2.0, -5.0)),
            (0.0, 1.0),
            0.5,
            gray(),
        );
        assert_eq!(sphere.center(-3.0), Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(sphere.center(1.5), Vec3::new(0.0, 2.0, -5.0));

        // Past the last keyframe the sphere stays inside its box.
        let mut rng = StdRng::seed_from_u64(0);
        let dir = Vec3::new(0.0, 0.0, -1.0);
        let above = Ray::new(Vec3::new(0.0, 3.0, 0.0), dir, 1.5);
        assert!(sphere.hit(&above, everywhere(), &mut rng).is_none());
        let level = Ray::new(Vec3::new(0.0, 2.0, 0.0), dir, 1.5);
        assert!(sphere.hit(&level, everywhere(), &mut rng).is_some());
    }

    #[test]
    fn test_point_sphere_hit_has_finite_normal_and_uv() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.0, gray());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(0);

        let rec = sphere.hit(&ray, everywhere(), &mut rng).unwrap();
        assert_eq!(rec.t, 2.0);
        assert_eq!(rec.normal, Vec3::Z);
        assert!(rec.front_face);
        assert!(rec.u.is_finite() && rec.v.is_finite());
    }
}
