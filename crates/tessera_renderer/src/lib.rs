//! Tessera - tiled CPU path tracing
//!
//! A Monte Carlo path tracer that splits the frame into tiles, renders them
//! on a pool of worker threads and streams finished tiles to a display sink.
//!
//! Building blocks:
//! - Geometry: spheres, triangles, quads, quadrics, volumes and translated
//!   instances, gathered under a BVH
//! - Materials and textures: diffuse, metal, glass, lights and volumes with
//!   solid, checker and image textures
//! - [`TileScheduler`]: the multi-threaded render loop

mod bvh;
mod camera;
mod display;
mod environment;
mod error;
mod framebuffer;
mod hittable;
mod material;
mod medium;
mod quad;
mod quadric;
mod random;
mod renderer;
mod scene;
mod scheduler;
mod sphere;
mod texture;
mod tile;
mod translate;
mod triangle;

pub use bvh::BvhNode;
pub use camera::Camera;
pub use display::{CancellableSink, DisplaySink, NullSink, Progress};
pub use environment::{face_uv, Background, CubeFace, CubeMap};
pub use error::{RenderError, TextureError, TextureResult};
pub use framebuffer::Framebuffer;
pub use hittable::{HitRecord, Hittable, HittableList, Object};
pub use material::{Material, ScatterResult};
pub use medium::ConstantMedium;
pub use quad::{make_box, Quad};
pub use quadric::{Quadric, QuadricCoefficients};
pub use renderer::{
    aces, color_to_rgb, linear_to_gamma, ray_color, render_pixel, render_serial, tone_map,
    RenderConfig, ToneMap,
};
pub use scene::Scene;
pub use scheduler::{RenderContext, RenderOutcome, RenderState, TileScheduler};
pub use sphere::Sphere;
pub use texture::{ImageTexture, Texture, DEBUG_COLOR};
pub use tile::{generate_tiles, render_tile, Tile, TileOrder, DEFAULT_TILE_SIZE};
pub use translate::Translate;
pub use triangle::Triangle;

/// Re-export the math types used throughout the public API
pub use tessera_math::{Aabb, Color, Interval, Ray, Vec2, Vec3};
