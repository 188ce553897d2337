//! Sphere primitive, optionally moving for motion blur.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use crate::Material;
use tessera_math::{Aabb, Interval, Ray, Vec3};

/// A sphere whose center may travel linearly over the shutter interval.
#[derive(Debug, Clone)]
pub struct Sphere {
    /// Center at time 0 plus the displacement reached at time 1.
    center: Ray,
    radius: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a stationary sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);

        Self {
            center: Ray::new(center, Vec3::ZERO, 0.0),
            radius,
            material,
            bbox: Aabb::from_points(center - rvec, center + rvec),
        }
    }

    /// Create a sphere that moves from `center0` at time 0 to `center1` at time 1.
    pub fn moving(center0: Vec3, center1: Vec3, radius: f32, material: Arc<Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let box0 = Aabb::from_points(center0 - rvec, center0 + rvec);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);

        Self {
            center: Ray::new(center0, center1 - center0, 0.0),
            radius,
            material,
            bbox: Aabb::surrounding(&box0, &box1),
        }
    }

    /// Center at the given ray time.
    #[inline]
    pub fn center_at(&self, time: f32) -> Vec3 {
        self.center.at(time)
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// UV coordinates for a point on the unit sphere centered at the origin.
    ///
    /// `u` is the angle around Y measured from -X, `v` the angle from -Y up to +Y.
    fn sphere_uv(p: Vec3) -> (f32, f32) {
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let center = self.center_at(ray.time);
        let oc = center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - center) / self.radius;
        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            Self::sphere_uv(outward_normal),
            &self.material,
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
