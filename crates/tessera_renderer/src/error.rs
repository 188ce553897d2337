//! Error types for the parts of the renderer that can actually fail.
//!
//! Intersection and scattering are total functions and never produce errors;
//! only texture loading and render setup do.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading an image-backed texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("failed to read texture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode texture {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture {0} has no pixels")]
    EmptyImage(PathBuf),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Errors that abort a render before or during dispatch.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("a render worker panicked")]
    WorkerPanicked,
}
