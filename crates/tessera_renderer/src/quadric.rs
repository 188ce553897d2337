//! General second-degree surfaces.
//!
//! A quadric is the zero set of
//! `Ax² + By² + Cz² + Dxy + Exz + Fyz + Gx + Hy + Iz + J`
//! evaluated in a frame centered on the primitive's `center`.

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use crate::Material;
use tessera_math::{Aabb, Interval, Ray, Vec3};

/// Half-extent of the box reported for every quadric. Cylinders and cones are
/// unbounded, so no tight box exists.
const QUADRIC_BOUND: f32 = 100.0;

const EPSILON: f32 = 1e-8;

/// The ten coefficients of the implicit surface, in the local frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuadricCoefficients {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
    pub g: f32,
    pub h: f32,
    pub i: f32,
    pub j: f32,
}

impl QuadricCoefficients {
    /// Value of the implicit function at local point `p`.
    pub fn evaluate(&self, p: Vec3) -> f32 {
        self.a * p.x * p.x
            + self.b * p.y * p.y
            + self.c * p.z * p.z
            + self.d * p.x * p.y
            + self.e * p.x * p.z
            + self.f * p.y * p.z
            + self.g * p.x
            + self.h * p.y
            + self.i * p.z
            + self.j
    }

    /// Gradient of the implicit function at local point `p`.
    pub fn gradient(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            2.0 * self.a * p.x + self.d * p.y + self.e * p.z + self.g,
            2.0 * self.b * p.y + self.d * p.x + self.f * p.z + self.h,
            2.0 * self.c * p.z + self.e * p.x + self.f * p.y + self.i,
        )
    }
}

#[derive(Debug, Clone)]
pub struct Quadric {
    coefficients: QuadricCoefficients,
    center: Vec3,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Quadric {
    pub fn new(coefficients: QuadricCoefficients, center: Vec3, material: Arc<Material>) -> Self {
        let bound = Vec3::splat(QUADRIC_BOUND);
        Self {
            coefficients,
            center,
            material,
            bbox: Aabb::from_points(center - bound, center + bound),
        }
    }

    /// `x² + y² + z² = r²`
    pub fn sphere(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        let coefficients = QuadricCoefficients {
            a: 1.0,
            b: 1.0,
            c: 1.0,
            j: -radius * radius,
            ..Default::default()
        };
        Self::new(coefficients, center, material)
    }

    /// Infinite cylinder along the y axis: `x² + z² = r²`
    pub fn cylinder(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        let coefficients = QuadricCoefficients {
            a: 1.0,
            c: 1.0,
            j: -radius * radius,
            ..Default::default()
        };
        Self::new(coefficients, center, material)
    }

    /// Double cone along the y axis with its apex at `center` and the given
    /// half-angle in radians: `x² + z² = tan²(angle) y²`
    pub fn cone(center: Vec3, angle: f32, material: Arc<Material>) -> Self {
        let k = angle.tan().powi(2);
        let coefficients = QuadricCoefficients {
            a: 1.0,
            b: -k,
            c: 1.0,
            ..Default::default()
        };
        Self::new(coefficients, center, material)
    }

    pub fn coefficients(&self) -> &QuadricCoefficients {
        &self.coefficients
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Roots of `a t² + b t + c = 0` inside `ray_t`, nearest first.
    fn nearest_root(&self, origin: Vec3, dir: Vec3, ray_t: Interval) -> Option<f32> {
        let q = &self.coefficients;

        let a = q.a * dir.x * dir.x
            + q.b * dir.y * dir.y
            + q.c * dir.z * dir.z
            + q.d * dir.x * dir.y
            + q.e * dir.x * dir.z
            + q.f * dir.y * dir.z;

        let b = 2.0 * q.a * origin.x * dir.x
            + 2.0 * q.b * origin.y * dir.y
            + 2.0 * q.c * origin.z * dir.z
            + q.d * (origin.x * dir.y + origin.y * dir.x)
            + q.e * (origin.x * dir.z + origin.z * dir.x)
            + q.f * (origin.y * dir.z + origin.z * dir.y)
            + q.g * dir.x
            + q.h * dir.y
            + q.i * dir.z;

        let c = q.evaluate(origin);

        if a.abs() < EPSILON {
            // Quadratic term vanishes, e.g. a ray parallel to a cylinder axis
            if b.abs() < EPSILON {
                return None;
            }
            let root = -c / b;
            return ray_t.surrounds(root).then_some(root);
        }

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let (mut r0, mut r1) = ((-b - sqrtd) / (2.0 * a), (-b + sqrtd) / (2.0 * a));
        if r0 > r1 {
            std::mem::swap(&mut r0, &mut r1);
        }

        if ray_t.surrounds(r0) {
            Some(r0)
        } else if ray_t.surrounds(r1) {
            Some(r1)
        } else {
            None
        }
    }
}

impl Hittable for Quadric {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let origin = ray.origin - self.center;
        let root = self.nearest_root(origin, ray.direction, ray_t)?;

        let local = origin + ray.direction * root;
        let outward_normal = self.coefficients.gradient(local).normalize_or_zero();

        Some(HitRecord::new(ray, root, outward_normal, (0.0, 0.0), &self.material))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sphere;
    use std::f32::consts::FRAC_PI_4;

    fn gray() -> Arc<Material> {
        Arc::new(Material::lambertian(Vec3::splat(0.5)))
    }

    #[test]
    fn test_quadric_sphere_matches_sphere() {
        let center = Vec3::new(1.0, 0.5, -4.0);
        let quadric = Quadric::sphere(center, 1.25, gray());
        let sphere = Sphere::new(center, 1.25, gray());
        let t = Interval::new(0.001, f32::INFINITY);

        for target in [
            center,
            center + Vec3::new(0.5, 0.5, 0.0),
            center + Vec3::new(-1.0, 0.2, 0.3),
        ] {
            let ray = Ray::new(Vec3::ZERO, target, 0.0);
            let a = quadric.hit(&ray, t).expect("quadric hit");
            let b = sphere.hit(&ray, t).expect("sphere hit");
            assert!((a.t - b.t).abs() < 1e-4);
            assert!((a.normal - b.normal).length() < 1e-3);
            assert_eq!(a.front_face, b.front_face);
        }
    }

    #[test]
    fn test_cylinder_side_hit() {
        let cylinder = Quadric::cylinder(Vec3::new(0.0, 3.0, 0.0), 1.0, gray());
        let ray = Ray::new(Vec3::new(0.0, 50.0, 5.0), Vec3::NEG_Z, 0.0);

        // Infinite along y: still hit far above the center
        let rec = cylinder.hit(&ray, Interval::new(0.001, f32::INFINITY)).expect("hit");
        assert!((rec.t - 4.0).abs() < 1e-4);
        assert!((rec.normal - Vec3::Z).length() < 1e-4);
        assert!(rec.front_face);
    }

    #[test]
    fn test_ray_along_cylinder_axis_misses() {
        let cylinder = Quadric::cylinder(Vec3::ZERO, 1.0, gray());
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y, 0.0);
        assert!(cylinder.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_cone_hit() {
        let cone = Quadric::cone(Vec3::ZERO, FRAC_PI_4, gray());
        let ray = Ray::new(Vec3::new(0.0, 1.0, 5.0), Vec3::NEG_Z, 0.0);

        let rec = cone.hit(&ray, Interval::new(0.001, f32::INFINITY)).expect("hit");
        assert!((rec.t - 4.0).abs() < 1e-4);
        let expected = Vec3::new(0.0, -1.0, 1.0).normalize();
        assert!((rec.normal - expected).length() < 1e-4);
    }

    #[test]
    fn test_cone_linear_case() {
        // Direction parallel to a generator line makes the quadratic term zero
        let cone = Quadric::cone(Vec3::ZERO, FRAC_PI_4, gray());
        let ray = Ray::new(Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0), 0.0);

        let rec = cone.hit(&ray, Interval::new(0.001, f32::INFINITY)).expect("hit");
        assert!((rec.t - 0.5).abs() < 1e-5);
        assert!(cone.coefficients().evaluate(rec.p - cone.center()).abs() < 1e-5);
    }

    #[test]
    fn test_bbox_around_center() {
        let quadric = Quadric::sphere(Vec3::new(5.0, 0.0, 0.0), 1.0, gray());
        let bbox = quadric.bounding_box();
        assert_eq!(bbox.x, Interval::new(-95.0, 105.0));
        assert!(bbox.encloses(&Aabb::from_points(Vec3::splat(4.0), Vec3::splat(6.0))));
    }
}
