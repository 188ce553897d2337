//! What a ray sees when it leaves the scene.

use std::path::Path;
use std::sync::Arc;

use crate::error::TextureResult;
use crate::texture::{ImageTexture, Texture};
use tessera_math::{Color, Vec3};

const SKY_ZENITH: Color = Color::new(0.5, 0.7, 1.0);

/// Radiance returned for rays that miss every object.
#[derive(Debug, Clone, Default)]
pub enum Background {
    /// Vertical gradient from white at the horizon to sky blue overhead.
    #[default]
    Sky,
    Solid(Color),
    Environment(Arc<CubeMap>),
}

impl Background {
    pub fn value(&self, direction: Vec3) -> Color {
        match self {
            Background::Sky => {
                let unit = direction.normalize_or_zero();
                let a = 0.5 * (unit.y + 1.0);
                (1.0 - a) * Color::ONE + a * SKY_ZENITH
            }
            Background::Solid(color) => *color,
            Background::Environment(cube) => cube.sample(direction),
        }
    }
}

/// Face order of a [`CubeMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeFace {
    Right = 0,
    Left = 1,
    Top = 2,
    Bottom = 3,
    Front = 4,
    Back = 5,
}

/// Six textures on the faces of an axis-aligned cube around the scene.
#[derive(Debug, Clone)]
pub struct CubeMap {
    faces: [Texture; 6],
}

impl CubeMap {
    /// Faces in [`CubeFace`] order: right, left, top, bottom, front, back.
    pub fn from_faces(faces: [Texture; 6]) -> Self {
        Self { faces }
    }

    /// Load the six face images, in [`CubeFace`] order.
    pub fn open<P: AsRef<Path>>(paths: [P; 6]) -> TextureResult<Self> {
        let load = |path: &P| ImageTexture::open(path).map(|img| Texture::Image(Arc::new(img)));
        let [right, left, top, bottom, front, back] = &paths;
        Ok(Self::from_faces([
            load(right)?,
            load(left)?,
            load(top)?,
            load(bottom)?,
            load(front)?,
            load(back)?,
        ]))
    }

    pub fn sample(&self, direction: Vec3) -> Color {
        let (face, u, v) = face_uv(direction);
        self.faces[face as usize].value(u, v, Vec3::ZERO)
    }
}

/// Face hit by `dir` and the `[0, 1]` coordinates on it.
pub fn face_uv(dir: Vec3) -> (CubeFace, f32, f32) {
    let abs = dir.abs();

    let (face, u, v) = if abs.x >= abs.y && abs.x >= abs.z {
        if dir.x > 0.0 {
            (CubeFace::Right, -dir.z / abs.x, dir.y / abs.x)
        } else {
            (CubeFace::Left, dir.z / abs.x, dir.y / abs.x)
        }
    } else if abs.y >= abs.z {
        if dir.y > 0.0 {
            (CubeFace::Top, dir.x / abs.y, dir.z / abs.y)
        } else {
            (CubeFace::Bottom, dir.x / abs.y, -dir.z / abs.y)
        }
    } else if dir.z > 0.0 {
        (CubeFace::Front, dir.x / abs.z, dir.y / abs.z)
    } else {
        (CubeFace::Back, -dir.x / abs.z, dir.y / abs.z)
    };

    let to_unit = |s: f32| ((s + 1.0) * 0.5).clamp(0.0, 1.0);
    (face, to_unit(u), to_unit(v))
}
