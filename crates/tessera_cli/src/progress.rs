//! Terminal progress display.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tessera_renderer::{DisplaySink, Progress, Tile};

const TEMPLATE: &str =
    "{prefix:.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {pos}/{len} tiles ({eta}) {msg}";

/// Display sink that shows completed tiles on a progress bar and stops the
/// render once its interrupt flag is raised.
pub struct ProgressSink {
    bar: ProgressBar,
    interrupted: Arc<AtomicBool>,
}

impl ProgressSink {
    pub fn new(total_tiles: usize, hidden: bool) -> Self {
        let bar = ProgressBar::new(total_tiles as u64);
        if hidden {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        bar.set_style(
            ProgressStyle::with_template(TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.set_prefix("Rendering");
        Self {
            bar,
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that stops the render when set, e.g. from a Ctrl-C handler.
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupted)
    }

    pub fn finish(&self) {
        self.bar.finish();
    }

    pub fn abandon(&self) {
        self.bar.abandon_with_message("cancelled");
    }
}

impl DisplaySink for ProgressSink {
    fn update_pixel(&self, _x: u32, _y: u32, _rgb: [u8; 3]) {}

    fn tile_completed(&self, _tile: &Tile, _pixels: &[[u8; 3]]) {}

    fn refresh(&self, progress: Progress) {
        self.bar.set_length(progress.total_tiles as u64);
        self.bar.set_position(progress.completed_tiles as u64);
    }

    fn should_stop(&self) -> bool {
        self.interrupted.load(Ordering::Relaxed)
    }
}
