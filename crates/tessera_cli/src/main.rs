//! Tessera - tiled CPU path tracer
//!
//! Renders one of the built-in scenes and writes the result as PNG or PPM.

mod cli;
mod output;
mod progress;
mod scenes;

use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tessera_renderer::{generate_tiles, RenderContext, RenderOutcome, Scene, TileScheduler};

use cli::Args;
use progress::ProgressSink;
use scenes::{build_scene, SceneOptions};

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    info!("Tessera v{}", env!("CARGO_PKG_VERSION"));

    let config = args.render_config()?;

    // Scene load failures abort before any rendering starts
    let start = std::time::Instant::now();
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let options = SceneOptions {
        width: args.width,
        aspect: args.aspect,
        texture: args.texture.clone(),
        skybox: args.skybox.clone(),
    };
    let setup = build_scene(args.scene, &options, &mut rng)?;
    let scene = Scene::new(setup.objects, setup.background);
    info!(
        "Scene {:?}: {} objects built in {:.2?}",
        args.scene,
        scene.object_count(),
        start.elapsed()
    );

    let context = RenderContext::new(setup.camera, scene, config)?;
    let total_tiles = generate_tiles(
        context.camera.image_width,
        context.camera.image_height,
        context.config.tile_size,
        context.config.tile_order,
    )
    .len();

    let sink = ProgressSink::new(total_tiles, args.quiet);
    let interrupted = sink.interrupt_flag();
    ctrlc::set_handler(move || interrupted.store(true, Ordering::Relaxed))
        .context("installing Ctrl-C handler")?;
    let outcome = TileScheduler::new(context).run(&sink);

    match outcome? {
        RenderOutcome::Done(framebuffer) => {
            sink.finish();
            output::save_image(&framebuffer, &args.output)?;
        }
        RenderOutcome::Cancelled {
            completed_tiles,
            total_tiles,
        } => {
            sink.abandon();
            warn!(
                "Render cancelled after {}/{} tiles, nothing written",
                completed_tiles, total_tiles
            );
        }
    }

    Ok(())
}
