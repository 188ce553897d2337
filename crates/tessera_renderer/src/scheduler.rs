//! Tiled multi-threaded render scheduler.
//!
//! One render runs a tile generator, a fixed pool of workers, a single
//! collector that owns the framebuffer, and a progress observer:
//!
//! ```text
//! generator --tiles--> workers --results--> collector --> Framebuffer
//!                                               |
//!                                        completed count --> observer --> sink.refresh
//! ```
//!
//! Only the collector writes the framebuffer, so tiles need no locking.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use crossbeam::channel;
use log::{debug, info, trace, warn};

use crate::display::{DisplaySink, Progress};
use crate::error::RenderError;
use crate::renderer::RenderConfig;
use crate::tile::{generate_tiles, render_tile, Tile};
use crate::{Camera, Framebuffer, Scene};

/// Everything one render needs, built once before dispatch.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub camera: Camera,
    pub scene: Scene,
    pub config: RenderConfig,
}

impl RenderContext {
    /// Validate the configuration and initialize the camera.
    pub fn new(mut camera: Camera, scene: Scene, config: RenderConfig) -> Result<Self, RenderError> {
        config.validate()?;
        camera.initialize();
        Ok(Self {
            camera,
            scene,
            config,
        })
    }
}

/// Lifecycle of a single render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Init,
    Dispatch,
    Draining,
    Done,
    Cancelled,
}

/// How a render ended.
#[derive(Debug)]
pub enum RenderOutcome {
    /// Every tile was rendered and merged.
    Done(Framebuffer),
    /// Stopped by the display sink. The partial frame is discarded.
    Cancelled {
        completed_tiles: usize,
        total_tiles: usize,
    },
}

impl RenderOutcome {
    pub fn state(&self) -> RenderState {
        match self {
            RenderOutcome::Done(_) => RenderState::Done,
            RenderOutcome::Cancelled { .. } => RenderState::Cancelled,
        }
    }

    /// The finished image, if the render was not cancelled.
    pub fn into_framebuffer(self) -> Option<Framebuffer> {
        match self {
            RenderOutcome::Done(framebuffer) => Some(framebuffer),
            RenderOutcome::Cancelled { .. } => None,
        }
    }
}

/// A finished tile on its way from a worker to the collector.
struct TileResult {
    tile: Tile,
    pixels: Vec<[u8; 3]>,
}

fn transition(state: &mut RenderState, next: RenderState) {
    debug!("Render state {:?} -> {:?}", state, next);
    *state = next;
}

pub struct TileScheduler {
    context: RenderContext,
}

impl TileScheduler {
    pub fn new(context: RenderContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Render the frame, streaming tiles to `sink` as they complete.
    ///
    /// Blocks until every thread has exited.
    pub fn run(&self, sink: &dyn DisplaySink) -> Result<RenderOutcome, RenderError> {
        let ctx = &self.context;
        let mut state = RenderState::Init;
        ctx.config.validate()?;

        let (width, height) = (ctx.camera.image_width, ctx.camera.image_height);
        let tiles = generate_tiles(width, height, ctx.config.tile_size, ctx.config.tile_order);
        let total_tiles = tiles.len();
        let workers = ctx.config.worker_count();

        info!(
            "Rendering {}x{} at {} spp: {} tiles, {} workers",
            width, height, ctx.config.samples_per_pixel, total_tiles, workers
        );

        let start = Instant::now();
        let completed = &AtomicUsize::new(0);
        let finished = &AtomicBool::new(false);

        let (tile_tx, tile_rx) = channel::bounded::<Tile>(workers * 2);
        let (result_tx, result_rx) = channel::unbounded::<TileResult>();

        transition(&mut state, RenderState::Dispatch);

        let scoped = crossbeam::scope(|s| {
            s.spawn(move |_| {
                for tile in tiles {
                    if sink.should_stop() {
                        debug!("Stop requested, no more tiles queued");
                        break;
                    }
                    if tile_tx.send(tile).is_err() {
                        break;
                    }
                }
            });

            let handles: Vec<_> = (0..workers)
                .map(|id| {
                    let tile_rx = tile_rx.clone();
                    let result_tx = result_tx.clone();
                    s.spawn(move |_| {
                        let should_stop = || sink.should_stop();
                        for tile in tile_rx.iter() {
                            let Some(pixels) =
                                render_tile(&tile, &ctx.camera, &ctx.scene, &ctx.config, &should_stop)
                            else {
                                trace!("Worker {id} abandoned tile {}", tile.index);
                                break;
                            };
                            if result_tx.send(TileResult { tile, pixels }).is_err() {
                                break;
                            }
                        }
                    })
                })
                .collect();
            // Queues close once the generator and every worker are done
            drop(tile_rx);
            drop(result_tx);

            s.spawn(move |_| {
                let interval = ctx.config.refresh_interval();
                while !finished.load(Ordering::Acquire) {
                    sink.refresh(Progress {
                        completed_tiles: completed.load(Ordering::Acquire),
                        total_tiles,
                        elapsed: start.elapsed(),
                    });
                    std::thread::sleep(interval);
                }
            });

            let collector = s.spawn(move |_| {
                let mut framebuffer = Framebuffer::new(width, height);
                for TileResult { tile, pixels } in result_rx.iter() {
                    framebuffer.blit(&tile, &pixels);
                    sink.tile_completed(&tile, &pixels);
                    let done = completed.fetch_add(1, Ordering::AcqRel) + 1;
                    trace!("Tile {} merged ({done}/{total_tiles})", tile.index);
                }
                framebuffer
            });

            let mut worker_panicked = false;
            for handle in handles {
                worker_panicked |= handle.join().is_err();
            }
            transition(&mut state, RenderState::Draining);

            let framebuffer = collector.join();
            finished.store(true, Ordering::Release);
            (framebuffer, worker_panicked)
        });

        let (framebuffer, worker_panicked) = scoped.map_err(|_| RenderError::WorkerPanicked)?;
        let framebuffer = framebuffer.map_err(|_| RenderError::WorkerPanicked)?;
        if worker_panicked {
            return Err(RenderError::WorkerPanicked);
        }

        let completed_tiles = completed.load(Ordering::Acquire);
        sink.refresh(Progress {
            completed_tiles,
            total_tiles,
            elapsed: start.elapsed(),
        });

        if sink.should_stop() || completed_tiles < total_tiles {
            transition(&mut state, RenderState::Cancelled);
            warn!(
                "Render cancelled after {}/{} tiles ({:.2?})",
                completed_tiles,
                total_tiles,
                start.elapsed()
            );
            return Ok(RenderOutcome::Cancelled {
                completed_tiles,
                total_tiles,
            });
        }

        transition(&mut state, RenderState::Done);
        info!("Render finished in {:.2?}", start.elapsed());
        Ok(RenderOutcome::Done(framebuffer))
    }
}
