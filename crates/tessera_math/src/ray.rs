use crate::Vec3;

/// A ray with origin, direction, and time.
///
/// `direction` is not required to be normalized. `time` lies in `[0, 1)` for
/// camera rays and selects the position of moving primitives (motion blur).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub time: f32,
}

impl Ray {
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3, time: f32) -> Self {
        Self {
            origin,
            direction,
            time,
        }
    }

    /// Point along the ray at parameter `t`: `origin + direction * t`.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Same ray with its origin shifted by `-offset`.
    ///
    /// Used to move a world-space ray into the local frame of an offset object.
    #[inline]
    pub fn offset_by(&self, offset: Vec3) -> Ray {
        Ray::new(self.origin - offset, self.direction, self.time)
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            time: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at_is_exact() {
        let origin = Vec3::new(1.5, -2.0, 3.25);
        let direction = Vec3::new(0.5, 4.0, -1.0);
        let ray = Ray::new(origin, direction, 0.0);

        for t in [0.0, 1.0, -1.0, 2.5, 1e-3, 123.0] {
            assert_eq!(ray.at(t), origin + direction * t);
        }
    }

    #[test]
    fn test_ray_at_axis() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);
        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_offset_keeps_direction_and_time() {
        let ray = Ray::new(Vec3::new(1.0, 1.0, 1.0), Vec3::Y, 0.25);
        let moved = ray.offset_by(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(moved.origin, Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(moved.direction, ray.direction);
        assert_eq!(moved.time, 0.25);
    }
}
