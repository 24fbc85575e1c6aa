//! Math primitives for the path tracer.
//!
//! Everything is double precision. `Vec3` is glam's `DVec3` and is used for
//! points, directions and colors alike.

pub use glam::DVec3;

/// Three `f64` components: a point, a direction or a color.
pub type Vec3 = DVec3;

/// RGB color, linear, usually in the 0-1 range.
pub type Color = DVec3;

mod aabb;
mod interval;
mod ray;
mod vec;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use vec::VecExt;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
        assert_eq!(2.0 * a, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    }
}
