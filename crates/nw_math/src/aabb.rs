use crate::{Interval, Ray, Vec3, VecExt};

/// Axis-aligned bounding box, one interval per axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

/// Axes thinner than this are padded so the box keeps a non-zero volume.
const MIN_EXTENT: f64 = 0.0001;

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Box spanned by two opposite corners, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self::new(
            Interval::new(a.x.min(b.x), a.x.max(b.x)),
            Interval::new(a.y.min(b.y), a.y.max(b.y)),
            Interval::new(a.z.min(b.z), a.z.max(b.z)),
        )
    }

    /// Componentwise min/max merge of two boxes.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Interval for an axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Slab test against the ray within `ray_t`.
    ///
    /// A zero direction component divides to +/- infinity, which leaves the
    /// running interval untouched when the origin is inside that slab and
    /// empties it otherwise.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        let origin = r.origin();
        let direction = r.direction();

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let d = direction.axis(axis);
            let o = origin.axis(axis);

            let mut t0 = (slab.min - o) / d;
            let mut t1 = (slab.max - o) / d;
            if d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }

        true
    }

    /// Move the box by `offset`.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(
            self.x.add_scalar(offset.x),
            self.y.add_scalar(offset.y),
            self.z.add_scalar(offset.z),
        )
    }

    /// The 8 corners, in xyz bit order.
    pub fn corners(&self) -> [Vec3; 8] {
        let mut out = [Vec3::ZERO; 8];
        for (i, corner) in out.iter_mut().enumerate() {
            *corner = Vec3::new(
                if i & 1 == 0 { self.x.min } else { self.x.max },
                if i & 2 == 0 { self.y.min } else { self.y.max },
                if i & 4 == 0 { self.z.min } else { self.z.max },
            );
        }
        out
    }

    fn pad_to_minimums(&mut self) {
        if self.x.size() < MIN_EXTENT {
            self.x = self.x.expand(MIN_EXTENT);
        }
        if self.y.size() < MIN_EXTENT {
            self.y = self.y.expand(MIN_EXTENT);
        }
        if self.z.size() < MIN_EXTENT {
            self.z = self.z.expand(MIN_EXTENT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_aabb_from_points_any_order() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(aabb.min(), Vec3::ZERO);
        assert_eq!(aabb.max(), Vec3::splat(10.0));
    }

    #[test]
    fn test_aabb_pads_flat_axis() {
        let flat = Aabb::from_points(Vec3::new(0.0, 0.0, 5.0), Vec3::new(1.0, 1.0, 5.0));
        assert!(flat.z.size() > 0.0);
        assert!(flat.z.contains(5.0));
    }

    #[test]
    fn test_aabb_merge_commutative_and_associative() {
        let a = Aabb::from_points(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 3.0));
        let b = Aabb::from_points(Vec3::new(-4.0, 1.0, 2.0), Vec3::new(0.5, 7.0, 2.5));
        let c = Aabb::from_points(Vec3::new(3.0, -3.0, -9.0), Vec3::new(4.0, -2.0, 1.0));

        assert_eq!(Aabb::surrounding(&a, &b), Aabb::surrounding(&b, &a));
        assert_eq!(
            Aabb::surrounding(&Aabb::surrounding(&a, &b), &c),
            Aabb::surrounding(&a, &Aabb::surrounding(&b, &c)),
        );

        let all = Aabb::surrounding(&Aabb::surrounding(&a, &b), &c);
        assert_eq!(all.min(), Vec3::new(-4.0, -3.0, -9.0));
        assert_eq!(all.max(), Vec3::new(4.0, 7.0, 3.0));
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = unit_box();

        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Interval ends before the box
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 3.0)));
    }

    #[test]
    fn test_aabb_hit_axis_parallel_ray() {
        let aabb = unit_box();

        // Zero x and y direction components, origin inside those slabs.
        let inside = Ray::new(Vec3::new(0.5, 0.5, -5.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(aabb.hit(&inside, Interval::new(0.0, f64::INFINITY)));

        // Same direction but origin outside the x slab.
        let outside = Ray::new(Vec3::new(3.0, 0.5, -5.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(!aabb.hit(&outside, Interval::new(0.0, f64::INFINITY)));
    }

    #[test]
    fn test_empty_box_never_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0), 0.0);
        assert!(!Aabb::EMPTY.hit(&ray, Interval::UNIVERSE));
    }

    #[test]
    fn test_aabb_translate_and_corners() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let moved = aabb.translate(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(moved.x, Interval::new(5.0, 6.0));

        let corners = aabb.corners();
        assert_eq!(corners[0], Vec3::ZERO);
        assert_eq!(corners[7], Vec3::ONE);
        assert_eq!(corners[5], Vec3::new(1.0, 0.0, 1.0));
    }
}
