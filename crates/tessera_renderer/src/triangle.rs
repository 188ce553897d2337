//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use crate::Material;
use tessera_math::{Aabb, Interval, Ray, Vec2, Vec3};

/// Determinants below this magnitude mean the ray is parallel to the plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// A triangle primitive with optional smooth shading and texture coordinates.
#[derive(Debug, Clone)]
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    /// Per-vertex shading normals, interpolated when present
    vertex_normals: Option<[Vec3; 3]>,
    /// Per-vertex texture coordinates
    uvs: Option<[Vec2; 3]>,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Triangle {
    /// Create a flat-shaded triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<Material>) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        let bbox = Aabb::from_points(v0.min(v1).min(v2), v0.max(v1).max(v2));

        Self {
            v0,
            v1,
            v2,
            normal,
            vertex_normals: None,
            uvs: None,
            material,
            bbox,
        }
    }

    /// Create a smooth-shaded triangle from vertices and per-vertex normals.
    pub fn with_normals(
        v0: Vec3,
        v1: Vec3,
        v2: Vec3,
        normals: [Vec3; 3],
        material: Arc<Material>,
    ) -> Self {
        let mut tri = Self::new(v0, v1, v2, material);
        tri.vertex_normals = Some(normals.map(Vec3::normalize_or_zero));
        tri
    }

    /// Attach per-vertex texture coordinates.
    pub fn with_uvs(mut self, uvs: [Vec2; 3]) -> Self {
        self.uvs = Some(uvs);
        self
    }

    /// Geometric normal of the face.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Hittable for Triangle {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(edge2);
        let a = edge1.dot(h);

        if a.abs() < PARALLEL_EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if !ray_t.surrounds(t) {
            return None;
        }

        let w = 1.0 - u - v;

        let outward_normal = match self.vertex_normals {
            Some([n0, n1, n2]) => (w * n0 + u * n1 + v * n2).normalize_or_zero(),
            None => self.normal,
        };

        let uv = match self.uvs {
            Some([uv0, uv1, uv2]) => {
                let uv = w * uv0 + u * uv1 + v * uv2;
                (uv.x, uv.y)
            }
            None => (u, v),
        };

        Some(HitRecord::new(ray, t, outward_normal, uv, &self.material))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray() -> Arc<Material> {
        Arc::new(Material::lambertian(Vec3::splat(0.5)))
    }

    fn xy_triangle() -> Triangle {
        // Triangle in XY plane at z=-1
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            gray(),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let tri = xy_triangle();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z, 0.0);

        let rec = tri
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .expect("ray should hit");
        assert!((rec.t - 1.0).abs() < 1e-5);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_triangle_miss() {
        let tri = xy_triangle();

        let away = Ray::new(Vec3::ZERO, Vec3::Z, 0.0);
        assert!(tri.hit(&away, Interval::new(0.001, f32::INFINITY)).is_none());

        let outside = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_Z, 0.0);
        assert!(tri.hit(&outside, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_parallel_ray_is_a_miss() {
        let tri = xy_triangle();
        let ray = Ray::new(Vec3::new(-5.0, 0.0, -1.0), Vec3::X, 0.0);
        assert!(tri.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_barycentric_uv_without_vertex_uvs() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y, gray());
        let ray = Ray::new(Vec3::new(0.25, 0.5, 1.0), Vec3::NEG_Z, 0.0);
        let rec = tri.hit(&ray, Interval::new(0.001, f32::INFINITY)).expect("hit");
        assert!((rec.u - 0.25).abs() < 1e-5);
        assert!((rec.v - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_vertex_uvs_are_interpolated() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y, gray()).with_uvs([
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 0.5),
        ]);
        let ray = Ray::new(Vec3::new(0.5, 0.5, 1.0), Vec3::NEG_Z, 0.0);
        let rec = tri.hit(&ray, Interval::new(0.001, f32::INFINITY)).expect("hit");
        assert!((rec.u - 0.5).abs() < 1e-5);
        assert!((rec.v - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_smooth_normals_are_interpolated() {
        let tilted = Vec3::new(1.0, 0.0, 1.0).normalize();
        let tri = Triangle::with_normals(
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
            [Vec3::Z, tilted, Vec3::Z],
            gray(),
        );

        // At vertex v0 the shading normal equals n0
        let at_v0 = Ray::new(Vec3::new(0.001, 0.001, 1.0), Vec3::NEG_Z, 0.0);
        let rec = tri.hit(&at_v0, Interval::new(0.001, f32::INFINITY)).expect("hit");
        assert!((rec.normal - Vec3::Z).length() < 1e-2);

        // Halfway along edge v0-v1 the normal leans toward +X
        let mid = Ray::new(Vec3::new(0.5, 0.0001, 1.0), Vec3::NEG_Z, 0.0);
        let rec = tri.hit(&mid, Interval::new(0.001, f32::INFINITY)).expect("hit");
        assert!(rec.normal.x > 0.1);
        assert!((rec.normal.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_bbox_encloses_vertices() {
        let tri = xy_triangle();
        let bbox = tri.bounding_box();
        assert_eq!(bbox.x, Interval::new(-1.0, 1.0));
        assert_eq!(bbox.y, Interval::new(-1.0, 1.0));
        assert!(bbox.z.contains(-1.0));
        assert!(bbox.z.size() > 0.0);
    }
}
