//! Camera for ray generation.

use rand::RngCore;

use crate::random::{gen_f32, random_in_unit_disk, sample_square};
use tessera_math::{Ray, Vec3};

/// Pinhole or thin-lens camera.
///
/// Configure with the `with_*` builders, then call [`Camera::initialize`]
/// before generating rays.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,          // Vertical field of view in degrees
    defocus_angle: f32, // Variation angle of rays through each pixel
    focus_dist: f32,    // Distance from camera to plane of perfect focus

    // Cached computed values (set by initialize())
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            image_width: 400,
            image_height: 225,
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            vup: Vec3::Y,
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width.max(1);
        self.image_height = height.max(1);
        self
    }

    /// Set width and derive the height from an aspect ratio (width / height).
    pub fn with_aspect_ratio(mut self, width: u32, aspect_ratio: f32) -> Self {
        self.image_width = width.max(1);
        self.image_height = ((width as f32 / aspect_ratio) as u32).max(1);
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings. `vfov` and `defocus_angle` are in degrees.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Derive the basis, viewport and defocus disk from the settings.
    pub fn initialize(&mut self) {
        self.center = self.look_from;

        // Calculate viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width = viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        // Vectors across the horizontal and down the vertical viewport edges
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;
    }

    /// Generate a jittered ray through pixel (i, j), at a random shutter time.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(ray_origin, pixel_sample - ray_origin, gen_f32(rng))
    }

    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_camera_initialize() {
        let mut camera = Camera::new()
            .with_resolution(800, 600)
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);

        camera.initialize();

        assert_eq!(camera.center(), Vec3::ZERO);
        assert!((camera.w - Vec3::Z).length() < 1e-3);
        assert!((camera.u - Vec3::X).length() < 1e-3);
        assert!((camera.v - Vec3::Y).length() < 1e-3);
    }

    #[test]
    fn test_aspect_ratio_height() {
        let camera = Camera::new().with_aspect_ratio(400, 16.0 / 9.0);
        assert_eq!((camera.image_width, camera.image_height), (400, 225));

        // Never collapses to zero rows
        let wide = Camera::new().with_aspect_ratio(10, 100.0);
        assert_eq!(wide.image_height, 1);
    }

    #[test]
    fn test_corner_rays() {
        let mut camera = Camera::new()
            .with_resolution(100, 100)
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(42);

        // Center ray points roughly towards -Z
        let ray = camera.get_ray(50, 50, &mut rng);
        assert!(ray.direction.z < 0.0);
        assert!(ray.direction.x.abs() < 0.05 && ray.direction.y.abs() < 0.05);
        assert!((0.0..1.0).contains(&ray.time));

        // Pixel (0, 0) is the upper-left corner
        let ray = camera.get_ray(0, 0, &mut rng);
        assert!(ray.direction.x < -0.9 && ray.direction.y > 0.9);
    }

    #[test]
    fn test_defocus_origins_lie_on_disk() {
        let mut camera = Camera::new()
            .with_resolution(64, 64)
            .with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
            .with_lens(40.0, 10.0, 5.0);
        camera.initialize();

        let radius = 5.0 * (5.0f32).to_radians().tan();
        let mut rng = StdRng::seed_from_u64(9);
        let mut moved = false;
        for _ in 0..100 {
            let ray = camera.get_ray(32, 32, &mut rng);
            let offset = ray.origin - camera.center();
            assert!(offset.length() <= radius + 1e-5);
            assert!(offset.z.abs() < 1e-5);
            moved |= offset.length() > 1e-4;
        }
        assert!(moved);
    }
}
