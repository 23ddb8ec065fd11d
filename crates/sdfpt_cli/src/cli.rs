//! Command line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use sdfpt_renderer::{RenderConfig, SceneKind};

/// Log levels selectable from the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "sdfpt")]
#[command(about = "Sphere-traced SDF path tracer")]
pub struct Args {
    /// JSON render configuration; flags below override its fields
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long, default_value = "render.png")]
    pub output: PathBuf,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Antialiasing samples per axis (samples per pixel is the square)
    #[arg(short, long)]
    pub samples: Option<u32>,

    /// Diffuse bounces after the primary hit
    #[arg(short, long)]
    pub bounces: Option<u32>,

    /// Global seed; omit for a time-derived seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Scene to render (tiledSpheres, mandelbulb, groundPlane, sphereOnPlane)
    #[arg(long)]
    pub scene: Option<SceneKind>,

    /// Logging level, overridden by RUST_LOG
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut RenderConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(samples) = self.samples {
            config.samples_per_axis = samples;
        }
        if let Some(bounces) = self.bounces {
            config.bounces = bounces;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(scene) = self.scene {
            config.scene = scene;
        }
    }
}
