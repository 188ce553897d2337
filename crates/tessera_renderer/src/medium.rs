//! Homogeneous participating media (smoke, fog).

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable, Object};
use crate::{Material, Texture};
use tessera_math::{Aabb, Interval, Ray, Vec3};

/// Gap left after the entry hit before searching for the exit hit.
const EXIT_EPSILON: f32 = 0.0001;

/// A volume of constant density bounded by another object.
///
/// The boundary must be closed and convex for the entry/exit search to make
/// sense.
#[derive(Debug, Clone)]
pub struct ConstantMedium {
    boundary: Box<Object>,
    neg_inv_density: f32,
    phase_function: Arc<Material>,
}

impl ConstantMedium {
    pub fn new(boundary: impl Into<Object>, density: f32, texture: Texture) -> Self {
        Self {
            boundary: Box::new(boundary.into()),
            neg_inv_density: -1.0 / density,
            phase_function: Arc::new(Material::isotropic(texture)),
        }
    }

    /// Scattering distance for a uniform draw `u` in `(0, 1)`.
    #[inline]
    fn sample_distance(&self, u: f32) -> f32 {
        self.neg_inv_density * u.ln()
    }

    /// Intersection with an explicit uniform draw.
    fn hit_with(&self, ray: &Ray, ray_t: Interval, draw: f32) -> Option<HitRecord<'_>> {
        let entry = self.boundary.hit(ray, Interval::UNIVERSE)?;
        let exit = self
            .boundary
            .hit(ray, Interval::new(entry.t + EXIT_EPSILON, f32::INFINITY))?;

        let mut t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return None;
        }
        t_enter = t_enter.max(0.0);

        let ray_length = ray.direction.length();
        let distance_inside = (t_exit - t_enter) * ray_length;
        let hit_distance = self.sample_distance(draw);
        if hit_distance > distance_inside {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;
        Some(HitRecord {
            p: ray.at(t),
            // Arbitrary, the phase function ignores it
            normal: Vec3::X,
            material: &self.phase_function,
            u: 0.0,
            v: 0.0,
            t,
            front_face: true,
        })
    }
}

impl Hittable for ConstantMedium {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        self.hit_with(ray, ray_t, rand::random::<f32>())
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}
