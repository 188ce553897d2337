//! Core path tracing integrator.
//!
//! Implements Monte Carlo path tracing with:
//! - Bounded path length, evaluated as a loop with a running throughput
//! - Emission summed at every vertex
//! - Anti-aliasing via multi-sampling
//! - ACES tone mapping and gamma correction

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use log::info;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::tile::{generate_tiles, render_tile, TileOrder, DEFAULT_TILE_SIZE};
use crate::{Camera, Framebuffer, Hittable, Scene};
use tessera_math::{Color, Interval, Ray};

/// Lower bound of every ray query, keeps bounces off the surface they left.
const RAY_T_MIN: f32 = 0.001;

/// Curve applied to linear radiance before gamma correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneMap {
    /// Narkowicz's fit of the ACES filmic curve
    #[default]
    Aces,
    /// Hard clip to `[0, 1]`
    Clamp,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Tile edge length in pixels
    pub tile_size: u32,
    pub tile_order: TileOrder,
    /// Worker threads, `None` for available cores plus two
    pub threads: Option<usize>,
    /// Base seed mixed into every tile's sample stream
    pub seed: u64,
    pub tone_map: ToneMap,
    /// Progress refresh rate for the display sink
    pub refresh_rate_hz: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            tile_size: DEFAULT_TILE_SIZE,
            tile_order: TileOrder::Scanline,
            threads: None,
            seed: 0,
            tone_map: ToneMap::Aces,
            refresh_rate_hz: 60,
        }
    }
}

impl RenderConfig {
    /// Reject settings that would render nothing or never make progress.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples_per_pixel must be at least 1".into(),
            ));
        }
        if self.tile_size == 0 {
            return Err(RenderError::InvalidConfig("tile_size must be at least 1".into()));
        }
        if self.threads == Some(0) {
            return Err(RenderError::InvalidConfig("threads must be at least 1".into()));
        }
        if self.refresh_rate_hz == 0 {
            return Err(RenderError::InvalidConfig(
                "refresh_rate_hz must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Number of render workers to start.
    pub fn worker_count(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
                + 2
        })
    }

    /// Time between two progress refreshes.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.refresh_rate_hz.max(1) as f64)
    }
}

/// Compute the color seen by a ray.
///
/// Follows the path for at most `max_depth` vertices. Every hit adds its
/// emission weighted by the product of the attenuations so far; a miss adds
/// the background the same way.
pub fn ray_color(ray: &Ray, scene: &Scene, max_depth: u32, rng: &mut dyn RngCore) -> Color {
    let mut radiance = Color::ZERO;
    let mut throughput = Color::ONE;
    let mut ray = *ray;

    for _ in 0..max_depth {
        let Some(rec) = scene.hit(&ray, Interval::new(RAY_T_MIN, f32::INFINITY)) else {
            return radiance + throughput * scene.background().value(ray.direction);
        };

        radiance += throughput * rec.material.emitted(rec.u, rec.v, rec.p);

        match rec.material.scatter(&ray, &rec, rng) {
            Some(result) => {
                throughput *= result.attenuation;
                ray = result.scattered;
            }
            // Absorbed
            None => return radiance,
        }
    }

    radiance
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, scene, config.max_depth, rng);
    }

    pixel_color / config.samples_per_pixel.max(1) as f32
}

/// ACES filmic curve (Narkowicz 2015), output clamped to `[0, 1]`.
#[inline]
pub fn aces(x: f32) -> f32 {
    let num = x * (2.51 * x + 0.03);
    let den = x * (2.43 * x + 0.59) + 0.14;
    (num / den).clamp(0.0, 1.0)
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

pub fn tone_map(color: Color, curve: ToneMap) -> Color {
    match curve {
        ToneMap::Aces => Color::new(aces(color.x), aces(color.y), aces(color.z)),
        ToneMap::Clamp => color.clamp(Color::ZERO, Color::ONE),
    }
}

/// Tone map, gamma correct and quantize to 8 bits per channel.
pub fn color_to_rgb(color: Color, curve: ToneMap) -> [u8; 3] {
    let mapped = tone_map(color, curve);
    let quantize = |c: f32| (256.0 * linear_to_gamma(c).clamp(0.0, 0.999)) as u8;
    [quantize(mapped.x), quantize(mapped.y), quantize(mapped.z)]
}

/// Render the whole image on the calling thread.
///
/// Walks the same tiles with the same per-tile seeds as the threaded
/// scheduler, so both produce identical framebuffers.
pub fn render_serial(
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
) -> Result<Framebuffer, RenderError> {
    config.validate()?;

    let (width, height) = (camera.image_width, camera.image_height);
    let tiles = generate_tiles(width, height, config.tile_size, config.tile_order);
    let start = Instant::now();

    let mut framebuffer = Framebuffer::new(width, height);
    for tile in &tiles {
        if let Some(pixels) = render_tile(tile, camera, scene, config, &|| false) {
            framebuffer.blit(tile, &pixels);
        }
    }

    info!(
        "Rendered {}x{} ({} tiles) on one thread in {:.2?}",
        width,
        height,
        tiles.len(),
        start.elapsed()
    );
    Ok(framebuffer)
}
