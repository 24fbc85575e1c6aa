//! Axis-aligned rectangles.

use std::sync::Arc;

use crate::{HitRecord, Hittable, Material, Ray};
use nw_math::{Aabb, Interval, Vec3, VecExt};
use rand::RngCore;

/// Half-thickness given to a rectangle's box along its constant axis.
const THICKNESS_PAD: f64 = 0.0001;

/// The plane a rectangle lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Constant z, spans x and y.
    Xy,
    /// Constant y, spans x and z.
    Xz,
    /// Constant x, spans y and z.
    Yz,
}

impl Plane {
    /// (first in-plane axis, second in-plane axis, constant axis)
    fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::Xy => (0, 1, 2),
            Plane::Xz => (0, 2, 1),
            Plane::Yz => (1, 2, 0),
        }
    }
}

/// A rectangle with edges parallel to the coordinate axes.
///
/// Spans `a0..a1` on the first in-plane axis and `b0..b1` on the second, at
/// coordinate `k` on the remaining one. The outward normal points along the
/// positive constant axis.
pub struct AaRect {
    plane: Plane,
    a: Interval,
    b: Interval,
    k: f64,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl AaRect {
    pub fn new(
        plane: Plane,
        (a0, a1): (f64, f64),
        (b0, b1): (f64, f64),
        k: f64,
        material: Arc<dyn Material>,
    ) -> Self {
        let a = Interval::new(a0.min(a1), a0.max(a1));
        let b = Interval::new(b0.min(b1), b0.max(b1));
        let thickness = Interval::new(k - THICKNESS_PAD, k + THICKNESS_PAD);

        let (ia, ib, _) = plane.axes();
        let mut intervals = [thickness; 3];
        intervals[ia] = a;
        intervals[ib] = b;
        let bbox = Aabb::new(intervals[0], intervals[1], intervals[2]);

        Self {
            plane,
            a,
            b,
            k,
            material,
            bbox,
        }
    }

    /// Rectangle at `z = k`.
    pub fn xy(x: (f64, f64), y: (f64, f64), k: f64, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::Xy, x, y, k, material)
    }

    /// Rectangle at `y = k`.
    pub fn xz(x: (f64, f64), z: (f64, f64), k: f64, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::Xz, x, z, k, material)
    }

    /// Rectangle at `x = k`.
    pub fn yz(y: (f64, f64), z: (f64, f64), k: f64, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::Yz, y, z, k, material)
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }
}

impl Hittable for AaRect {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let (ia, ib, ik) = self.plane.axes();
        let origin = ray.origin();
        let direction = ray.direction();

        // Rays parallel to the plane give an infinite or NaN t.
        let t = (self.k - origin.axis(ik)) / direction.axis(ik);
        if !t.is_finite() || !ray_t.contains(t) {
            return None;
        }

        let p = ray.at(t);
        let (pa, pb) = (p.axis(ia), p.axis(ib));
        if !self.a.contains(pa) || !self.b.contains(pb) {
            return None;
        }

        let u = unit_offset(pa, self.a);
        let v = unit_offset(pb, self.b);

        let mut outward_normal = Vec3::ZERO;
        outward_normal[ik] = 1.0;

        let mut rec = HitRecord::new(ray, t, outward_normal, (u, v), self.material.as_ref());
        // Keep the constant coordinate exact.
        rec.p[ik] = self.k;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Position of `x` across `extent` in [0, 1]; 0 when the extent is flat.
fn unit_offset(x: f64, extent: Interval) -> f64 {
    let size = extent.size();
    if size > 0.0 {
        (x - extent.min) / size
    } else {
        0.0
    }
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

    #[test]
    fn test_xy_rect_hit_and_uv() {
        let rect = AaRect::xy((0.0, 4.0), (0.0, 2.0), -3.0, gray());
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new_simple(Vec3::new(1.0, 1.5, 0.0), Vec3::new(0.0, 0.0, -1.0));

        let rec = rect.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rng).unwrap();
        assert_eq!(rec.t, 3.0);
        assert_eq!(rec.p, Vec3::new(1.0, 1.5, -3.0));
        assert_eq!((rec.u, rec.v), (0.25, 0.75));
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_rect_rejects_outside_extent_and_interval() {
        let rect = AaRect::xz((-1.0, 1.0), (-1.0, 1.0), 2.0, gray());
        let mut rng = StdRng::seed_from_u64(0);
        let up = Vec3::new(0.0, 1.0, 0.0);

        let off_edge = Ray::new_simple(Vec3::new(1.5, 0.0, 0.0), up);
        assert!(rect.hit(&off_edge, Interval::UNIVERSE, &mut rng).is_none());

        let too_far = Ray::new_simple(Vec3::ZERO, up);
        assert!(rect.hit(&too_far, Interval::new(0.0, 1.0), &mut rng).is_none());

        let parallel = Ray::new_simple(Vec3::ZERO, Vec3::X);
        assert!(rect.hit(&parallel, Interval::UNIVERSE, &mut rng).is_none());

        // From below the ray travels along +y: back face.
        let rec = rect.hit(&too_far, Interval::UNIVERSE, &mut rng).unwrap();
        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::Y);
    }

    #[test]
    fn test_flat_rect_maps_zero_extent_to_zero() {
        let rect = AaRect::xz((0.0, 1.0), (0.0, 0.0), 0.0, gray());
        let mut rng = StdRng::seed_from_u64(0);
        let down = Ray::new_simple(Vec3::new(0.5, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));

        let rec = rect.hit(&down, Interval::new(0.001, f64::INFINITY), &mut rng).unwrap();
        assert_eq!(rec.t, 1.0);
        assert_eq!((rec.u, rec.v), (0.5, 0.0));
    }

    #[test]
    fn test_yz_rect_box_is_padded() {
        let rect = AaRect::yz((0.0, 555.0), (0.0, 555.0), 555.0, gray());
        let bbox = rect.bounding_box();
        assert!(bbox.x.size() > 0.0);
        assert!(bbox.x.contains(555.0));
        assert_eq!(bbox.y, Interval::new(0.0, 555.0));
        assert_eq!(bbox.z, Interval::new(0.0, 555.0));
        assert_eq!(rect.plane(), Plane::Yz);
    }
}
