use crate::{Interval, Ray, Vec3};

/// Minimum thickness of any box axis.
///
/// Axis-aligned primitives such as quads would otherwise produce zero-volume
/// boxes that the slab test can never hit.
const MIN_AXIS_SIZE: f32 = 0.0001;

/// Axis-Aligned Bounding Box for the BVH.
///
/// An AABB is three intervals, one per axis. Boxes built through [`Aabb::new`]
/// or [`Aabb::from_points`] are always padded to [`MIN_AXIS_SIZE`] per axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Box that contains nothing. Identity element of [`Aabb::surrounding`].
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    /// Box that contains everything.
    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };

    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB from two opposite corners, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let lo = a.min(b);
        let hi = a.max(b);
        Self::new(
            Interval::new(lo.x, hi.x),
            Interval::new(lo.y, hi.y),
            Interval::new(lo.z, hi.z),
        )
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Interval for axis `n` (0 = X, 1 = Y, anything else = Z).
    #[inline]
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Slab test: does `ray` pass through the box anywhere inside `ray_t`?
    ///
    /// A zero direction component yields an infinite reciprocal, which pushes
    /// that axis' slab bounds to +/-inf and leaves the other axes to decide.
    pub fn hit(&self, ray: &Ray, mut ray_t: Interval) -> bool {
        let inv_dir = ray.direction.recip();

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = inv_dir[axis];
            let origin = ray.origin[axis];

            let mut t0 = (slab.min - origin) * adinv;
            let mut t1 = (slab.max - origin) * adinv;
            if adinv < 0.0 {
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

    /// True if `other` lies entirely within this box.
    pub fn encloses(&self, other: &Aabb) -> bool {
        self.x.encloses(&other.x) && self.y.encloses(&other.y) && self.z.encloses(&other.z)
    }

    /// Move the box by `offset`.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(
            self.x.add_scalar(offset.x),
            self.y.add_scalar(offset.y),
            self.z.add_scalar(offset.z),
        )
    }

    /// Index (0 = X, 1 = Y, 2 = Z) of the widest axis.
    pub fn longest_axis(&self) -> usize {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size > y_size && x_size > z_size {
            0
        } else if y_size > z_size {
            1
        } else {
            2
        }
    }

    pub fn centroid(&self) -> Vec3 {
        Vec3::new(
            (self.x.min + self.x.max) * 0.5,
            (self.y.min + self.y.max) * 0.5,
            (self.z.min + self.z.max) * 0.5,
        )
    }

    fn pad_to_minimums(&mut self) {
        for interval in [&mut self.x, &mut self.y, &mut self.z] {
            if interval.size() < MIN_AXIS_SIZE {
                *interval = interval.expand(MIN_AXIS_SIZE);
            }
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_orders_corners() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(aabb.x, Interval::new(0.0, 10.0));
        assert_eq!(aabb.y, Interval::new(0.0, 10.0));
        assert_eq!(aabb.z, Interval::new(0.0, 10.0));
    }

    #[test]
    fn test_flat_box_is_padded() {
        let aabb = Aabb::from_points(Vec3::new(0.0, 0.0, 2.0), Vec3::new(1.0, 1.0, 2.0));
        assert!(aabb.z.size() > 0.5 * MIN_AXIS_SIZE);
        assert!(aabb.z.contains(2.0));
        assert_eq!(aabb.x.size(), 1.0);
    }

    #[test]
    fn test_surrounding_encloses_both() {
        let box1 = Aabb::from_points(Vec3::ZERO, Vec3::splat(5.0));
        let box2 = Aabb::from_points(Vec3::splat(3.0), Vec3::splat(10.0));
        let both = Aabb::surrounding(&box1, &box2);

        assert_eq!(both.x, Interval::new(0.0, 10.0));
        assert!(both.encloses(&box1));
        assert!(both.encloses(&box2));
        assert!(!box1.encloses(&box2));
        assert_eq!(Aabb::surrounding(&Aabb::EMPTY, &box1), box1);
    }

    #[test]
    fn test_slab_hit() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let t = Interval::new(0.0, 100.0);

        let toward = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        assert!(aabb.hit(&toward, t));

        let away = Ray::new(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z, 0.0);
        assert!(!aabb.hit(&away, t));

        let beside = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Z, 0.0);
        assert!(!aabb.hit(&beside, t));
    }

    #[test]
    fn test_slab_hit_respects_interval() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        // Box spans t in [4, 6]
        assert!(!aabb.hit(&ray, Interval::new(0.0, 3.0)));
        assert!(!aabb.hit(&ray, Interval::new(7.0, 100.0)));
        assert!(aabb.hit(&ray, Interval::new(5.0, 5.5)));
    }

    #[test]
    fn test_slab_hit_negative_direction_swaps_bounds() {
        let aabb = Aabb::from_points(Vec3::new(-3.0, -1.0, -1.0), Vec3::new(-2.0, 1.0, 1.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(-1.0, 0.1, 0.0), 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.0, f32::INFINITY)));
    }

    #[test]
    fn test_translate() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let moved = aabb.translate(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(moved.x, Interval::new(5.0, 6.0));
        assert_eq!(moved.y, Interval::new(0.0, 1.0));
    }

    #[test]
    fn test_longest_axis_and_centroid() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 10.0, 2.0));
        assert_eq!(aabb.longest_axis(), 1);
        assert_eq!(aabb.centroid(), Vec3::new(0.5, 5.0, 1.0));
    }
}
