//! Final image encoding.

use std::path::Path;

use anyhow::{Context, Result};
use image::RgbImage;
use log::info;
use tessera_renderer::Framebuffer;

/// Encode `framebuffer` to `path`. The format follows the file extension
/// (`.png` or binary `.ppm`).
pub fn save_image(framebuffer: &Framebuffer, path: &Path) -> Result<()> {
    let image = RgbImage::from_raw(
        framebuffer.width(),
        framebuffer.height(),
        framebuffer.as_bytes().to_vec(),
    )
    .context("framebuffer size does not match its dimensions")?;

    image
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;

    info!(
        "Image written to {} ({}x{})",
        path.display(),
        framebuffer.width(),
        framebuffer.height()
    );
    Ok(())
}
