//! sdfpt - render an SDF scene to a PNG.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use sdfpt_renderer::{generate_buckets, render, BucketResult, ImageBuffer, RenderConfig};

mod cli;

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => RenderConfig::default(),
    };
    args.apply(&mut config);

    let total = generate_buckets(config.width, config.height, config.bucket_size).len();
    let done = AtomicUsize::new(0);
    let progress = |_: &BucketResult| {
        let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
        // Report roughly every 10%
        if total > 0 && (finished * 10 / total) != ((finished - 1) * 10 / total) {
            info!("{}% ({}/{} buckets)", finished * 100 / total, finished, total);
        }
    };

    let start = Instant::now();
    let output = render(&config, Some(&progress)).context("Render failed")?;

    save_png(&output.image, &args.output)?;
    info!(
        "Saved {} (seed {}) in {:.2?}",
        args.output.display(),
        output.seed,
        start.elapsed()
    );

    Ok(())
}

fn init_logger(level: log::LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_config(path: &Path) -> Result<RenderConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config {}", path.display()))
}

fn save_png(image: &ImageBuffer, path: &Path) -> Result<()> {
    let rgba = image::RgbaImage::from_raw(image.width, image.height, image.to_rgba8())
        .context("Image buffer size does not match its dimensions")?;
    rgba.save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}
