//! Where a render reports progress and where it learns it should stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::Tile;

/// Snapshot handed to [`DisplaySink::refresh`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub completed_tiles: usize,
    pub total_tiles: usize,
    pub elapsed: Duration,
}

impl Progress {
    /// Completed fraction in `[0, 1]`. An empty render counts as complete.
    pub fn fraction(&self) -> f32 {
        if self.total_tiles == 0 {
            1.0
        } else {
            self.completed_tiles as f32 / self.total_tiles as f32
        }
    }
}

/// Receiver for a render in flight: preview pixels, progress ticks, and the
/// cancellation signal.
///
/// Called concurrently from the collector and observer threads.
pub trait DisplaySink: Send + Sync {
    /// A finished pixel, already tone mapped and quantized.
    fn update_pixel(&self, x: u32, y: u32, rgb: [u8; 3]);

    /// A whole tile has been merged into the framebuffer.
    fn tile_completed(&self, tile: &Tile, pixels: &[[u8; 3]]) {
        for (i, rgb) in pixels.iter().enumerate() {
            let dx = i as u32 % tile.width;
            let dy = i as u32 / tile.width;
            self.update_pixel(tile.x + dx, tile.y + dy, *rgb);
        }
    }

    /// Periodic progress tick.
    fn refresh(&self, _progress: Progress) {}

    /// Polled by workers before each pixel and by the tile generator before
    /// each tile.
    fn should_stop(&self) -> bool {
        false
    }
}

/// Discards everything and never stops.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DisplaySink for NullSink {
    fn update_pixel(&self, _x: u32, _y: u32, _rgb: [u8; 3]) {}

    fn tile_completed(&self, _tile: &Tile, _pixels: &[[u8; 3]]) {}
}

/// Sink that stops the render once [`CancellableSink::cancel`] is called,
/// e.g. when a preview window is closed.
#[derive(Debug, Default)]
pub struct CancellableSink {
    cancelled: AtomicBool,
}

impl CancellableSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl DisplaySink for CancellableSink {
    fn update_pixel(&self, _x: u32, _y: u32, _rgb: [u8; 3]) {}

    fn tile_completed(&self, _tile: &Tile, _pixels: &[[u8; 3]]) {}

    fn should_stop(&self) -> bool {
        self.is_cancelled()
    }
}
