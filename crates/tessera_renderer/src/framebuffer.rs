//! Final 8-bit RGB image assembled from tiles.

use crate::Tile;

/// Row-major RGB pixels, three bytes each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Framebuffer {
    /// Create a new black framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 3],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Copy a tile's row-major pixels into place. Anything outside the image
    /// is clipped.
    pub fn blit(&mut self, tile: &Tile, pixels: &[[u8; 3]]) {
        debug_assert_eq!(pixels.len(), tile.pixel_count());

        let visible_width = tile.width.min(self.width.saturating_sub(tile.x)) as usize;
        if visible_width == 0 {
            return;
        }

        for (row, src) in pixels.chunks(tile.width as usize).enumerate() {
            let y = tile.y + row as u32;
            if y >= self.height {
                break;
            }
            let start = (y as usize * self.width as usize + tile.x as usize) * 3;
            let dst = &mut self.pixels[start..start + visible_width * 3];
            for (out, px) in dst.chunks_exact_mut(3).zip(src) {
                out.copy_from_slice(px);
            }
        }
    }

    /// Pixel at (x, y), `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    /// Raw RGB bytes, suitable for an image encoder.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{generate_tiles, TileOrder};

    #[test]
    fn test_blit_places_tile() {
        let mut fb = Framebuffer::new(4, 3);
        let tile = Tile::new(2, 1, 2, 2, 0);
        fb.blit(&tile, &[[1, 1, 1], [2, 2, 2], [3, 3, 3], [4, 4, 4]]);

        assert_eq!(fb.pixel(2, 1), Some([1, 1, 1]));
        assert_eq!(fb.pixel(3, 1), Some([2, 2, 2]));
        assert_eq!(fb.pixel(2, 2), Some([3, 3, 3]));
        assert_eq!(fb.pixel(3, 2), Some([4, 4, 4]));
        assert_eq!(fb.pixel(0, 0), Some([0, 0, 0]));
        assert_eq!(fb.pixel(4, 0), None);
        assert_eq!(fb.as_bytes().len(), 4 * 3 * 3);
    }

    #[test]
    fn test_tiles_assemble_full_image() {
        let (w, h) = (13, 7);
        let mut fb = Framebuffer::new(w, h);

        for tile in generate_tiles(w, h, 4, TileOrder::Spiral) {
            let pixels: Vec<[u8; 3]> = (0..tile.height)
                .flat_map(|dy| (0..tile.width).map(move |dx| (tile.x + dx, tile.y + dy)))
                .map(|(x, y)| [x as u8, y as u8, 7])
                .collect();
            fb.blit(&tile, &pixels);
        }

        for y in 0..h {
            for x in 0..w {
                assert_eq!(fb.pixel(x, y), Some([x as u8, y as u8, 7]));
            }
        }
    }
}
