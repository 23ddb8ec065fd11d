//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are rendered independently
//! and in parallel using rayon. Buckets only decide who computes a pixel;
//! each pixel's random stream comes from its image index, so the bucket
//! size never changes the result.

use crate::renderer::{shade_pixel, ImageBuffer, KernelSettings, SENTINEL_COLOR};
use crate::{Camera, Color, RenderError, RenderResult, Scene};
use log::{debug, warn};
use rayon::prelude::*;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// Generate buckets covering the image, sorted in spiral order from center.
///
/// Buckets on the right and bottom edges are clipped to the image, so no
/// bucket contains out-of-range pixels.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();
    let mut index = 0;

    // Generate grid of buckets
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    buckets.sort_by(|a, b| {
        let a_center_x = a.x as f32 + a.width as f32 / 2.0;
        let a_center_y = a.y as f32 + a.height as f32 / 2.0;
        let b_center_x = b.x as f32 + b.width as f32 / 2.0;
        let b_center_y = b.y as f32 + b.height as f32 / 2.0;

        let a_dist = (a_center_x - center_x).powi(2) + (a_center_y - center_y).powi(2);
        let b_dist = (b_center_x - center_x).powi(2) + (b_center_y - center_y).powi(2);

        a_dist.partial_cmp(&b_dist).unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
    /// Pixels replaced by the sentinel color
    pub sentinel_pixels: u32,
}

/// Counters for a finished render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub buckets: usize,
    pub pixels: u64,
    pub sentinel_pixels: u64,
}

/// Render a single bucket.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    scene: &dyn Scene,
    settings: &KernelSettings,
    seed: u64,
) -> BucketResult {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);
    let mut sentinel_pixels = 0;

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;
            if global_x >= settings.width || global_y >= settings.height {
                continue;
            }
            let color = match shade_pixel(camera, scene, global_x, global_y, settings, seed) {
                Some(color) => color,
                None => {
                    warn!("Non-finite radiance at pixel ({}, {})", global_x, global_y);
                    sentinel_pixels += 1;
                    SENTINEL_COLOR
                }
            };
            pixels.push(color);
        }
    }

    BucketResult {
        bucket: *bucket,
        pixels,
        sentinel_pixels,
    }
}

/// Render every bucket of the image in parallel and assemble the result.
///
/// The output buffer is allocated before any bucket is dispatched.
pub fn render_buckets(
    camera: &Camera,
    scene: &dyn Scene,
    settings: &KernelSettings,
    seed: u64,
    bucket_size: u32,
    progress: Option<&(dyn Fn(&BucketResult) + Sync)>,
) -> RenderResult<(ImageBuffer, RenderStats)> {
    if bucket_size == 0 {
        return Err(RenderError::InvalidConfig(
            "bucketSize must be at least 1".to_string(),
        ));
    }

    let mut image = ImageBuffer::try_new(settings.width, settings.height)?;
    let buckets = generate_buckets(settings.width, settings.height, bucket_size);
    debug!("Dispatching {} buckets of {}px", buckets.len(), bucket_size);

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let result = render_bucket(bucket, camera, scene, settings, seed);
            debug!(
                "Bucket {} done ({}x{} at {},{})",
                bucket.index, bucket.width, bucket.height, bucket.x, bucket.y
            );
            if let Some(callback) = progress {
                callback(&result);
            }
            result
        })
        .collect();

    let mut stats = RenderStats {
        buckets: results.len(),
        ..RenderStats::default()
    };
    for result in &results {
        image.write_bucket(result);
        stats.pixels += result.pixels.len() as u64;
        stats.sentinel_pixels += result.sentinel_pixels as u64;
    }

    Ok((image, stats))
}
