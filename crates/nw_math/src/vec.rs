use crate::Vec3;

/// Helpers glam does not provide directly.
pub trait VecExt {
    /// True if every component is within 1e-8 of zero.
    fn near_zero(&self) -> bool;

    /// Access a component by axis index (0=X, 1=Y, 2=Z).
    fn axis(&self, n: usize) -> f64;
}

impl VecExt for Vec3 {
    fn near_zero(&self) -> bool {
        const S: f64 = 1e-8;
        self.x.abs() < S && self.y.abs() < S && self.z.abs() < S
    }

    #[inline]
    fn axis(&self, n: usize) -> f64 {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_zero() {
        assert!(Vec3::ZERO.near_zero());
        assert!(Vec3::new(1e-9, -1e-9, 0.0).near_zero());
        assert!(!Vec3::new(1e-9, 1e-3, 0.0).near_zero());
    }

    #[test]
    fn test_axis() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.axis(0), 1.0);
        assert_eq!(v.axis(1), 2.0);
        assert_eq!(v.axis(2), 3.0);
    }
}
