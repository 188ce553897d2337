//! Tiles: the unit of work handed to render workers.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::renderer::{color_to_rgb, render_pixel, RenderConfig};
use crate::{Camera, Scene};

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 32;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// X coordinate of the tile's top-left corner
    pub x: u32,
    /// Y coordinate of the tile's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position of this tile in dispatch order
    pub index: usize,
}

impl Tile {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// Seed for this tile's sample stream.
    ///
    /// Depends only on the tile's position, never on which worker renders it
    /// or when.
    pub fn seed(&self, base: u64) -> u64 {
        base ^ (((self.y as u64) << 32) | self.x as u64)
    }
}

/// Order in which tiles are dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileOrder {
    /// Row by row from the top-left corner
    #[default]
    Scanline,
    /// Center outward, so the middle of the frame appears first
    Spiral,
}

/// Partition a `width` x `height` image into tiles of at most `tile_size`
/// pixels on a side. Edge tiles are clipped to the image.
pub fn generate_tiles(width: u32, height: u32, tile_size: u32, order: TileOrder) -> Vec<Tile> {
    let tile_size = tile_size.max(1);
    let mut tiles = Vec::new();

    for y in (0..height).step_by(tile_size as usize) {
        for x in (0..width).step_by(tile_size as usize) {
            let tw = tile_size.min(width - x);
            let th = tile_size.min(height - y);
            tiles.push(Tile::new(x, y, tw, th, tiles.len()));
        }
    }

    if order == TileOrder::Spiral {
        sort_spiral(&mut tiles, width, height);
        for (i, tile) in tiles.iter_mut().enumerate() {
            tile.index = i;
        }
    }

    tiles
}

/// Sort tiles by distance of their centers from the image center.
fn sort_spiral(tiles: &mut [Tile], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let dist = |t: &Tile| {
        let cx = t.x as f32 + t.width as f32 / 2.0;
        let cy = t.y as f32 + t.height as f32 / 2.0;
        (cx - center_x).powi(2) + (cy - center_y).powi(2)
    };

    tiles.sort_by(|a, b| {
        dist(a)
            .partial_cmp(&dist(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Render every pixel of `tile` in scan order into a private buffer.
///
/// `should_stop` is polled before each pixel; if it fires the partial buffer
/// is dropped and `None` is returned.
pub fn render_tile(
    tile: &Tile,
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    should_stop: &dyn Fn() -> bool,
) -> Option<Vec<[u8; 3]>> {
    let mut rng = SmallRng::seed_from_u64(tile.seed(config.seed));
    let mut pixels = Vec::with_capacity(tile.pixel_count());

    for local_y in 0..tile.height {
        for local_x in 0..tile.width {
            if should_stop() {
                return None;
            }
            let color = render_pixel(
                camera,
                scene,
                tile.x + local_x,
                tile.y + local_y,
                config,
                &mut rng,
            );
            pixels.push(color_to_rgb(color, config.tone_map));
        }
    }

    Some(pixels)
}
