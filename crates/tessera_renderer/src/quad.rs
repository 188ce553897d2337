//! Planar parallelogram primitive and the six-sided box built from it.

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::Material;
use tessera_math::{Aabb, Interval, Ray, Vec3};

/// A parallelogram spanned by corner `q` and edges `u` and `v`.
#[derive(Debug, Clone)]
pub struct Quad {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    /// `n / (n . n)`, used to recover planar coordinates of a hit
    w: Vec3,
    normal: Vec3,
    /// Plane offset: `normal . p = d` for every point on the plane
    d: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize_or_zero();
        let nn = n.dot(n);
        let w = if nn > 0.0 { n / nn } else { Vec3::ZERO };

        let corners = [q, q + u, q + v, q + u + v];
        let lo = corners.iter().fold(Vec3::INFINITY, |acc, c| acc.min(*c));
        let hi = corners.iter().fold(Vec3::NEG_INFINITY, |acc, c| acc.max(*c));

        Self {
            q,
            u,
            v,
            w,
            normal,
            d: normal.dot(q),
            material,
            bbox: Aabb::from_points(lo, hi),
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Hittable for Quad {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let denom = self.normal.dot(ray.direction);

        // Parallel to the plane
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin)) / denom;
        if !ray_t.surrounds(t) {
            return None;
        }

        // Planar coordinates of the hit relative to the corner
        let planar = ray.at(t) - self.q;
        let alpha = self.w.dot(planar.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar));

        let unit = 0.0..=1.0;
        if !unit.contains(&alpha) || !unit.contains(&beta) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal, (alpha, beta), &self.material))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Six quads enclosing the axis-aligned box with opposite corners `a` and `b`.
pub fn make_box(a: Vec3, b: Vec3, material: Arc<Material>) -> HittableList {
    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let mut sides = HittableList::new();
    // front
    sides.add(Quad::new(Vec3::new(min.x, min.y, max.z), dx, dy, material.clone()));
    // right
    sides.add(Quad::new(Vec3::new(max.x, min.y, max.z), -dz, dy, material.clone()));
    // back
    sides.add(Quad::new(Vec3::new(max.x, min.y, min.z), -dx, dy, material.clone()));
    // left
    sides.add(Quad::new(Vec3::new(min.x, min.y, min.z), dz, dy, material.clone()));
    // top
    sides.add(Quad::new(Vec3::new(min.x, max.y, max.z), dx, -dz, material.clone()));
    // bottom
    sides.add(Quad::new(Vec3::new(min.x, min.y, min.z), dx, dz, material));
    sides
}
