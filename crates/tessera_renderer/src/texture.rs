//! Textures: colors looked up by surface coordinates and hit point.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use image::RgbImage;
use log::warn;

use crate::error::{TextureError, TextureResult};
use tessera_math::{Color, Vec3};

/// Color substituted for textures that failed to load.
pub const DEBUG_COLOR: Color = Color::new(1.0, 0.0, 0.0);

#[derive(Debug, Clone)]
pub enum Texture {
    Solid(Color),
    /// 3D checkerboard keyed by the parity of the scaled, floored coordinates.
    Checker {
        inv_scale: f32,
        even: Box<Texture>,
        odd: Box<Texture>,
    },
    Image(Arc<ImageTexture>),
}

impl Texture {
    /// Checkerboard with cells of edge length `scale`.
    pub fn checker(scale: f32, even: Texture, odd: Texture) -> Self {
        Texture::Checker {
            inv_scale: 1.0 / scale,
            even: Box::new(even),
            odd: Box::new(odd),
        }
    }

    pub fn checker_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::checker(scale, Texture::Solid(even), Texture::Solid(odd))
    }

    /// Image texture loaded from `path`, or a solid [`DEBUG_COLOR`] if loading fails.
    pub fn image_or_debug(path: impl AsRef<Path>) -> Self {
        match ImageTexture::open(path) {
            Ok(image) => Texture::Image(Arc::new(image)),
            Err(err) => {
                warn!("{err}; substituting debug color");
                Texture::Solid(DEBUG_COLOR)
            }
        }
    }

    pub fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Texture::Solid(color) => *color,
            Texture::Checker {
                inv_scale,
                even,
                odd,
            } => {
                let cell = (*inv_scale * p).floor();
                let sum = cell.x as i64 + cell.y as i64 + cell.z as i64;
                if sum.rem_euclid(2) == 0 {
                    even.value(u, v, p)
                } else {
                    odd.value(u, v, p)
                }
            }
            Texture::Image(image) => image.value(u, v),
        }
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::Solid(color)
    }
}

/// Decoded image in linear color, sampled by nearest pixel.
#[derive(Clone)]
pub struct ImageTexture {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl ImageTexture {
    /// Decode an image file. Bytes are treated as sRGB.
    pub fn open(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| match source {
            image::ImageError::IoError(source) => TextureError::Io {
                path: path.to_path_buf(),
                source,
            },
            source => TextureError::Image {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let texture = Self::from_rgb8(&decoded.to_rgb8());
        if texture.pixels.is_empty() {
            return Err(TextureError::EmptyImage(path.to_path_buf()));
        }
        Ok(texture)
    }

    /// Convert an 8-bit sRGB image.
    pub fn from_rgb8(image: &RgbImage) -> Self {
        let pixels = image
            .pixels()
            .map(|px| {
                Color::new(
                    srgb_to_linear(px[0]),
                    srgb_to_linear(px[1]),
                    srgb_to_linear(px[2]),
                )
            })
            .collect();

        Self {
            width: image.width(),
            height: image.height(),
            pixels,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Color at `(u, v)`, wrapping outside `[0, 1)`. `v = 0` is the bottom row.
    pub fn value(&self, u: f32, v: f32) -> Color {
        if self.pixels.is_empty() {
            return DEBUG_COLOR;
        }

        let u = u.rem_euclid(1.0);
        let v = 1.0 - v.rem_euclid(1.0);

        let i = ((u * self.width as f32) as u32).min(self.width - 1);
        let j = ((v * self.height as f32) as u32).min(self.height - 1);

        self.pixels[(j * self.width + i) as usize]
    }
}

impl fmt::Debug for ImageTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageTexture")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

fn srgb_to_linear(byte: u8) -> f32 {
    let c = byte as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_solid() {
        let tex = Texture::from(Color::new(0.1, 0.2, 0.3));
        assert_eq!(tex.value(0.7, 0.2, Vec3::splat(9.0)), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_checker_parity() {
        let tex = Texture::checker_colors(1.0, Color::ONE, Color::ZERO);

        assert_eq!(tex.value(0.0, 0.0, Vec3::new(0.5, 0.5, 0.5)), Color::ONE);
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(1.5, 0.5, 0.5)), Color::ZERO);
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(1.5, 1.5, 0.5)), Color::ONE);
        // Negative cells keep alternating across the origin
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(-0.5, 0.5, 0.5)), Color::ZERO);
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(-0.5, -0.5, 0.5)), Color::ONE);
    }

    #[test]
    fn test_checker_scale() {
        let tex = Texture::checker_colors(2.0, Color::ONE, Color::ZERO);
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(1.5, 0.5, 0.5)), Color::ONE);
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(2.5, 0.5, 0.5)), Color::ZERO);
    }

    #[test]
    fn test_image_lookup_flips_v_and_wraps() {
        // 2x2: top row red, green; bottom row blue, white
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 255, 0]));
        img.put_pixel(0, 1, Rgb([0, 0, 255]));
        img.put_pixel(1, 1, Rgb([255, 255, 255]));
        let tex = ImageTexture::from_rgb8(&img);

        assert_eq!(tex.value(0.25, 0.75), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.value(0.75, 0.75), Color::new(0.0, 1.0, 0.0));
        assert_eq!(tex.value(0.25, 0.25), Color::new(0.0, 0.0, 1.0));
        assert_eq!(tex.value(1.25, -0.75), Color::new(0.0, 0.0, 1.0));
        assert_eq!(tex.value(1.0, 1.0), tex.value(0.0, 0.0));
    }

    #[test]
    fn test_srgb_is_linearized() {
        assert_eq!(srgb_to_linear(0), 0.0);
        assert!((srgb_to_linear(255) - 1.0).abs() < 1e-6);
        // Mid gray is darker in linear space
        assert!((srgb_to_linear(128) - 0.2158).abs() < 1e-3);
    }

    #[test]
    fn test_missing_file_falls_back_to_debug_color() {
        let _ = env_logger::builder().is_test(true).try_init();

        let err = ImageTexture::open("/nonexistent/tessera/earth.png").unwrap_err();
        assert!(matches!(err, TextureError::Io { .. }));

        let tex = Texture::image_or_debug("/nonexistent/tessera/earth.png");
        assert_eq!(tex.value(0.3, 0.3, Vec3::ZERO), DEBUG_COLOR);
    }

    #[test]
    fn test_open_round_trips_through_png() {
        let path = std::env::temp_dir().join(format!("tessera-texture-{}.png", std::process::id()));
        let mut img = RgbImage::new(4, 1);
        img.put_pixel(3, 0, Rgb([255, 255, 255]));
        img.save(&path).expect("write temp png");

        let tex = ImageTexture::open(&path).expect("decode temp png");
        assert_eq!(tex.dimensions(), (4, 1));
        assert_eq!(tex.value(0.9, 0.5), Color::ONE);
        assert_eq!(tex.value(0.1, 0.5), Color::ZERO);

        let _ = std::fs::remove_file(path);
    }
}
