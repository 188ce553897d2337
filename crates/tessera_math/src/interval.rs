//! Closed scalar ranges.
//!
//! Used both for the valid parameter range of a ray query and for the
//! per-axis extents of an [`Aabb`](crate::Aabb).

/// A `[min, max]` range of `f32`.
///
/// An interval with `min > max` is empty and contains nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// The empty interval (`min = +inf`, `max = -inf`).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// The interval containing every value.
    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };

    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Smallest interval containing both `a` and `b`.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// `max - min`. Negative for empty intervals.
    #[inline]
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Inclusive membership test.
    #[inline]
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Exclusive membership test. Ray queries use this so that a hit exactly
    /// at the current closest `t` never replaces it.
    #[inline]
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// True if `other` lies entirely inside this interval.
    pub fn encloses(&self, other: &Interval) -> bool {
        other.is_empty() || (self.min <= other.min && other.max <= self.max)
    }

    #[inline]
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// Grows the interval by `delta / 2` on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    /// Shifts both ends by `displacement`.
    pub fn add_scalar(&self, displacement: f32) -> Interval {
        Interval::new(self.min + displacement, self.max + displacement)
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}
