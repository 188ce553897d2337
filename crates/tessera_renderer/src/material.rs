//! Surface and volume scattering.

use rand::RngCore;

use crate::hittable::HitRecord;
use crate::random::{gen_f32, random_unit_vector};
use crate::Texture;
use tessera_math::{Color, Ray, Vec3};

/// Outcome of a successful scatter.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// How light interacts with a surface or participating medium.
#[derive(Debug, Clone)]
pub enum Material {
    /// Diffuse reflector
    Lambertian { albedo: Texture },
    /// Specular reflector, `fuzz` in `[0, 1]` (0 = perfect mirror)
    Metal { albedo: Color, fuzz: f32 },
    /// Refractive (glass, water). `ior` is the index of refraction.
    Dielectric { ior: f32 },
    /// Phase function of a participating medium
    Isotropic { albedo: Texture },
    /// Emitter, never scatters
    DiffuseLight { emit: Texture },
}

impl Material {
    pub fn lambertian(albedo: Color) -> Self {
        Material::Lambertian {
            albedo: Texture::Solid(albedo),
        }
    }

    pub fn lambertian_texture(albedo: Texture) -> Self {
        Material::Lambertian { albedo }
    }

    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        Material::Metal {
            albedo: albedo.clamp(Color::ZERO, Color::ONE),
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    /// - `ior`: 1.0 = air, 1.5 = glass, 2.4 = diamond
    pub fn dielectric(ior: f32) -> Self {
        Material::Dielectric { ior }
    }

    pub fn isotropic(albedo: Texture) -> Self {
        Material::Isotropic { albedo }
    }

    pub fn diffuse_light(emit: Color) -> Self {
        Material::DiffuseLight {
            emit: Texture::Solid(emit),
        }
    }

    pub fn diffuse_light_texture(emit: Texture) -> Self {
        Material::DiffuseLight { emit }
    }

    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match self {
            Material::Lambertian { albedo } => {
                let mut direction = rec.normal + random_unit_vector(rng);

                // Catch degenerate scatter direction
                if direction.length_squared() < 1e-8 {
                    direction = rec.normal;
                }

                Some(ScatterResult {
                    attenuation: unit_clamp(albedo.value(rec.u, rec.v, rec.p)),
                    scattered: Ray::new(rec.p, direction, ray_in.time),
                })
            }

            Material::Metal { albedo, fuzz } => {
                let reflected = reflect(ray_in.direction.normalize(), rec.normal);
                let direction = reflected + *fuzz * random_unit_vector(rng);

                // Fuzz pushed the ray below the surface: absorb it
                if direction.dot(rec.normal) <= 0.0 {
                    return None;
                }

                Some(ScatterResult {
                    attenuation: *albedo,
                    scattered: Ray::new(rec.p, direction, ray_in.time),
                })
            }

            Material::Dielectric { ior } => {
                let ratio = if rec.front_face { 1.0 / ior } else { *ior };

                let unit_direction = ray_in.direction.normalize();
                let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

                let cannot_refract = ratio * sin_theta > 1.0;
                let direction = if cannot_refract || reflectance(cos_theta, ratio) > gen_f32(rng) {
                    reflect(unit_direction, rec.normal)
                } else {
                    refract(unit_direction, rec.normal, ratio)
                };

                Some(ScatterResult {
                    attenuation: Color::ONE,
                    scattered: Ray::new(rec.p, direction, ray_in.time),
                })
            }

            Material::Isotropic { albedo } => Some(ScatterResult {
                attenuation: albedo.value(rec.u, rec.v, rec.p),
                scattered: Ray::new(rec.p, random_unit_vector(rng), ray_in.time),
            }),

            Material::DiffuseLight { .. } => None,
        }
    }

    /// Light emitted at the given surface coordinates. Black for everything
    /// but [`Material::DiffuseLight`].
    pub fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Material::DiffuseLight { emit } => emit.value(u, v, p),
            _ => Color::ZERO,
        }
    }
}

#[inline]
fn unit_clamp(c: Color) -> Color {
    c.clamp(Color::ZERO, Color::ONE)
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract unit vector `uv` through a surface with normal `n`.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance
fn reflectance(cosine: f32, ratio: f32) -> f32 {
    let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Hittable, HittableList, Sphere};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::sync::Arc;
    use tessera_math::Interval;

    /// Always draws the largest value, so a dielectric never picks reflection
    /// unless refraction is impossible.
    struct MaxRng;

    impl RngCore for MaxRng {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }
        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0xFF);
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            dest.fill(0xFF);
            Ok(())
        }
    }

    fn record(material: &Material, normal: Vec3, front_face: bool) -> HitRecord<'_> {
        HitRecord {
            p: Vec3::ZERO,
            normal,
            material,
            u: 0.5,
            v: 0.5,
            t: 1.0,
            front_face,
        }
    }

    /// Sine of the angle between two directions.
    fn sin_between(a: Vec3, b: Vec3) -> f32 {
        a.normalize().cross(b.normalize()).length()
    }

    #[test]
    fn test_attenuation_energy_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 1.0), Vec3::new(0.0, -1.0, -1.0), 0.0);

        for _ in 0..200 {
            let color = Color::new(
                rng.gen_range(-1.0..3.0),
                rng.gen_range(-1.0..3.0),
                rng.gen_range(-1.0..3.0),
            );
            let materials = [
                Material::lambertian(color),
                Material::lambertian_texture(Texture::checker_colors(0.5, color, color * 2.0)),
                Material::metal(color, rng.gen_range(0.0..2.0)),
            ];
            for mat in &materials {
                let rec = record(mat, Vec3::Y, true);
                if let Some(s) = mat.scatter(&ray, &rec, &mut rng) {
                    let a = s.attenuation;
                    assert!(a.cmpge(Color::ZERO).all() && a.cmple(Color::ONE).all(), "{a:?}");
                }
            }

            let glass = Material::dielectric(rng.gen_range(1.0..2.5));
            let front = rng.gen_bool(0.5);
            let rec = record(&glass, Vec3::Y, front);
            let s = glass.scatter(&ray, &rec, &mut rng).expect("glass always scatters");
            assert_eq!(s.attenuation, Color::ONE);
        }
    }

    #[test]
    fn test_lambertian_scatters_above_surface() {
        let mut rng = StdRng::seed_from_u64(11);
        let mat = Material::lambertian(Color::splat(0.5));
        let ray = Ray::new(Vec3::Y, Vec3::NEG_Y, 0.25);

        for _ in 0..500 {
            let rec = record(&mat, Vec3::Y, true);
            let s = mat.scatter(&ray, &rec, &mut rng).expect("lambertian always scatters");
            assert!(s.scattered.direction.dot(Vec3::Y) >= 0.0);
            assert_eq!(s.scattered.time, 0.25);
            assert_eq!(s.attenuation, Color::splat(0.5));
        }
    }

    #[test]
    fn test_perfect_mirror() {
        let mut rng = StdRng::seed_from_u64(0);
        let mat = Material::metal(Color::splat(0.8), 0.0);
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), 0.0);

        let rec = record(&mat, Vec3::Y, true);
        let s = mat.scatter(&ray, &rec, &mut rng).expect("mirror reflects");
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((s.scattered.direction - expected).length() < 1e-6);
    }

    #[test]
    fn test_fuzzy_metal_never_scatters_below_surface() {
        let mut rng = StdRng::seed_from_u64(5);
        let mat = Material::metal(Color::splat(0.8), 1.0);
        // Grazing incidence
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, -0.05, 0.0), 0.0);

        let mut absorbed = 0;
        for _ in 0..500 {
            let rec = record(&mat, Vec3::Y, true);
            match mat.scatter(&ray, &rec, &mut rng) {
                Some(s) => assert!(s.scattered.direction.dot(Vec3::Y) > 0.0),
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 0);
    }

    #[test]
    fn test_fuzz_is_clamped() {
        match Material::metal(Color::ONE, 7.0) {
            Material::Metal { fuzz, .. } => assert_eq!(fuzz, 1.0),
            other => panic!("unexpected material {other:?}"),
        }
    }

    #[test]
    fn test_total_internal_reflection() {
        let mut rng = MaxRng;
        let glass = Material::dielectric(1.5);
        // Inside the glass, 60 degrees from the normal: sin 0.866 * 1.5 > 1
        let incoming = Vec3::new(60f32.to_radians().sin(), 60f32.to_radians().cos(), 0.0);
        let ray = Ray::new(Vec3::ZERO, incoming, 0.0);
        let rec = record(&glass, Vec3::NEG_Y, false);

        let s = glass.scatter(&ray, &rec, &mut rng).expect("scatter");
        assert!(s.scattered.direction.y < 0.0, "must reflect back into the glass");
    }

    #[test]
    fn test_glass_shell_refracts_twice() {
        let glass = Arc::new(Material::dielectric(1.5));
        let core = Arc::new(Material::lambertian(Color::splat(0.5)));

        let mut scene = HittableList::new();
        scene.add(Sphere::new(Vec3::ZERO, 1.0, glass.clone()));
        scene.add(Sphere::new(Vec3::ZERO, 0.1, core));

        let mut rng = MaxRng;
        let t = Interval::new(0.001, f32::INFINITY);
        let incident = Ray::new(Vec3::new(0.0, 0.3, 5.0), Vec3::NEG_Z, 0.0);

        // Entry
        let entry = scene.hit(&incident, t).expect("enter shell");
        assert!(entry.front_face);
        assert!(std::ptr::eq(entry.material, glass.as_ref()));
        assert!((sin_between(incident.direction, entry.normal) - 0.3).abs() < 1e-4);

        let inside = entry
            .material
            .scatter(&incident, &entry, &mut rng)
            .expect("refract in")
            .scattered;
        // Snell: 1.0 * 0.3 = 1.5 * sin(theta_t)
        assert!((sin_between(inside.direction, entry.normal) - 0.2).abs() < 1e-4);

        // Exit, missing the inner core
        let exit = scene.hit(&inside, t).expect("leave shell");
        assert!(!exit.front_face);
        assert!(std::ptr::eq(exit.material, glass.as_ref()));
        assert!((sin_between(inside.direction, exit.normal) - 0.2).abs() < 1e-4);

        let outside = exit
            .material
            .scatter(&inside, &exit, &mut rng)
            .expect("refract out")
            .scattered;
        assert!((sin_between(outside.direction, exit.normal) - 0.3).abs() < 1e-4);

        // Net bend toward the axis
        assert!(outside.direction.y < 0.0);
        assert!(outside.direction.z < 0.0);
    }

    #[test]
    fn test_isotropic_and_light() {
        let mut rng = StdRng::seed_from_u64(8);
        let fog = Material::isotropic(Texture::Solid(Color::splat(0.3)));
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);
        let rec = record(&fog, Vec3::X, true);
        let s = fog.scatter(&ray, &rec, &mut rng).expect("isotropic scatters");
        assert!((s.scattered.direction.length() - 1.0).abs() < 1e-4);
        assert_eq!(s.attenuation, Color::splat(0.3));
        assert_eq!(fog.emitted(0.0, 0.0, Vec3::ZERO), Color::ZERO);

        let light = Material::diffuse_light(Color::splat(4.0));
        let rec = record(&light, Vec3::Y, true);
        assert!(light.scatter(&ray, &rec, &mut rng).is_none());
        assert_eq!(light.emitted(0.0, 0.0, Vec3::ZERO), Color::splat(4.0));
    }
}
