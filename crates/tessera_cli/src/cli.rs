//! Command line arguments.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use tessera_renderer::{RenderConfig, TileOrder};

use crate::scenes::SceneType;

/// Log levels selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Render one of the built-in scenes with the tiled path tracer
#[derive(Parser, Debug)]
#[command(name = "tessera", version, about)]
pub struct Args {
    /// The built-in scene to render
    #[arg(short, long, value_enum, default_value_t = SceneType::Spheres)]
    pub scene: SceneType,

    /// Where to write the finished image (.png or .ppm)
    #[arg(
        short,
        long,
        value_parser = valid_image_file,
        default_value = "output.png",
        value_name = "FILE"
    )]
    pub output: PathBuf,

    /// Image width in pixels
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..), default_value_t = 800)]
    pub width: u32,

    /// Width / height ratio, overriding the scene's own
    #[arg(long, value_name = "RATIO")]
    pub aspect: Option<f32>,

    /// JSON render configuration; command line flags take precedence
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Samples per pixel
    #[arg(short = 'n', long, value_name = "NUM")]
    pub samples: Option<u32>,

    /// Maximum ray bounce depth
    #[arg(short, long, value_name = "NUM")]
    pub depth: Option<u32>,

    /// Worker threads (default: available cores + 2)
    #[arg(short, long, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Base seed for sampling and scene generation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Tile edge length in pixels
    #[arg(long, value_name = "PIXELS")]
    pub tile_size: Option<u32>,

    /// Render tiles from the center outward
    #[arg(long)]
    pub spiral: bool,

    /// Image used by the textured globe
    #[arg(long, default_value = "assets/earthmap.jpg", value_name = "FILE")]
    pub texture: PathBuf,

    /// Directory holding a cube map (right, left, top, bottom, front, back .png)
    #[arg(long, value_name = "DIR")]
    pub skybox: Option<PathBuf>,

    /// Logging verbosity, RUST_LOG filters still apply
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Build the render configuration: the JSON file if given, otherwise
    /// defaults, with command line overrides applied on top.
    pub fn render_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => RenderConfig::default(),
        };

        if let Some(samples) = self.samples {
            config.samples_per_pixel = samples;
        }
        if let Some(depth) = self.depth {
            config.max_depth = depth;
        }
        if let Some(threads) = self.threads {
            config.threads = Some(threads);
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(tile_size) = self.tile_size {
            config.tile_size = tile_size;
        }
        if self.spiral {
            config.tile_order = TileOrder::Spiral;
        }

        config.validate()?;
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<RenderConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

/// Accept only file names the output encoder can write.
fn valid_image_file(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    match image::ImageFormat::from_path(&path) {
        Ok(image::ImageFormat::Png | image::ImageFormat::Pnm) => Ok(path),
        Ok(format) => Err(format!("unsupported output format {format:?}, use .png or .ppm")),
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("tessera").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn check_cli() {
        Args::command().debug_assert()
    }

    #[test]
    fn test_rejects_unknown_output_format() {
        let res = Args::try_parse_from(["tessera", "--output", "render.txt"]);
        assert_eq!(res.unwrap_err().kind(), clap::error::ErrorKind::ValueValidation);

        let res = Args::try_parse_from(["tessera", "--output", "render.jpg"]);
        assert_eq!(res.unwrap_err().kind(), clap::error::ErrorKind::ValueValidation);

        assert_eq!(parse(&["-o", "out.ppm"]).output, PathBuf::from("out.ppm"));
    }

    #[test]
    fn test_rejects_zero_width() {
        assert!(Args::try_parse_from(["tessera", "--width", "0"]).is_err());
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.scene, SceneType::Spheres);
        assert_eq!(args.log_level, LogLevel::Info);
        assert_eq!(args.render_config().unwrap(), RenderConfig::default());
    }

    #[test]
    fn test_overrides() {
        let args = parse(&[
            "--scene", "cornell", "-n", "8", "-d", "5", "-t", "3", "--seed", "9", "--tile-size",
            "16", "--spiral",
        ]);
        let config = args.render_config().unwrap();
        assert_eq!(args.scene, SceneType::Cornell);
        assert_eq!(config.samples_per_pixel, 8);
        assert_eq!(config.max_depth, 5);
        assert_eq!(config.threads, Some(3));
        assert_eq!(config.seed, 9);
        assert_eq!(config.tile_size, 16);
        assert_eq!(config.tile_order, TileOrder::Spiral);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        assert!(parse(&["--samples", "0"]).render_config().is_err());
        assert!(parse(&["--threads", "0"]).render_config().is_err());
    }

    #[test]
    fn test_config_file_with_overrides() {
        let path = std::env::temp_dir().join(format!("tessera_cli_{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "samples_per_pixel": 12, "tone_map": "clamp", "seed": 4 }"#)
            .unwrap();

        let path_arg = path.to_string_lossy().into_owned();
        let config = parse(&["--config", &path_arg, "--seed", "7"]).render_config().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.samples_per_pixel, 12);
        assert_eq!(config.tone_map, tessera_renderer::ToneMap::Clamp);
        assert_eq!(config.seed, 7);
        assert_eq!(config.max_depth, RenderConfig::default().max_depth);
    }

    #[test]
    fn test_missing_config_file() {
        let err = parse(&["--config", "/nonexistent/tessera.json"]).render_config().unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }
}
