//! Per-pixel sampling, the output buffer and the top-level render call.
//!
//! Each pixel takes a stratified grid of jittered samples, traces one path
//! per sample and averages them. Pixels own their random stream, seeded from
//! the global seed and the pixel's row-major index only.

use std::time::Instant;

use crate::bucket::{render_buckets, BucketResult, RenderStats};
use crate::integrator::trace_path;
use crate::sampling::{gen_f32, pixel_rng};
use crate::{Camera, Color, MarchSettings, RenderConfig, RenderError, RenderResult, Scene};
use log::info;
use rand::RngCore;

/// Color written for pixels whose estimate is not finite.
pub const SENTINEL_COLOR: Color = Color::new(1.0, 0.0, 1.0);

/// Per-sample constants shared by every pixel task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelSettings {
    pub width: u32,
    pub height: u32,
    pub samples_per_axis: u32,
    pub bounces: u32,
    pub march: MarchSettings,
}

impl KernelSettings {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            samples_per_axis: config.samples_per_axis,
            bounces: config.bounces,
            march: config.march,
        }
    }
}

/// Estimate the color of pixel (x, y) with stratified jittered sampling.
///
/// Sub-sample `n` lands in cell `(n % s, n / s)` of an `s x s` grid. Screen
/// positions map to device coordinates in [-1, 1], with y flipped and scaled
/// by height/width so pixels stay square.
pub fn render_pixel(
    camera: &Camera,
    scene: &dyn Scene,
    x: u32,
    y: u32,
    settings: &KernelSettings,
    rng: &mut dyn RngCore,
) -> Color {
    let samples = u64::from(settings.samples_per_axis.max(1));
    let total = samples * samples;
    let cell = 1.0 / samples as f32;
    let width = settings.width as f32;
    let height = settings.height as f32;
    let aspect = height / width;

    let mut pixel_color = Color::ZERO;

    for n in 0..total {
        let cx = (n % samples) as f32;
        let cy = (n / samples) as f32;
        let sx = x as f32 + (cx + gen_f32(rng)) * cell;
        let sy = y as f32 + (cy + gen_f32(rng)) * cell;

        let ndc_x = sx / width * 2.0 - 1.0;
        let ndc_y = -(sy / height * 2.0 - 1.0) * aspect;

        let ray = camera.ray(ndc_x, ndc_y);
        pixel_color += trace_path(scene, &ray, settings.bounces, &settings.march, rng);
    }

    // Average the samples
    pixel_color / total as f32
}

/// Render pixel (x, y) with its own random stream.
///
/// Returns `None` when the estimate is not finite.
pub(crate) fn shade_pixel(
    camera: &Camera,
    scene: &dyn Scene,
    x: u32,
    y: u32,
    settings: &KernelSettings,
    seed: u64,
) -> Option<Color> {
    let index = y as u64 * settings.width as u64 + x as u64;
    let mut rng = pixel_rng(seed, index);
    let color = render_pixel(camera, scene, x, y, settings, &mut rng);
    color.is_finite().then_some(color)
}

/// Clamp a color channel to [0, 1].
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a linear color to 8-bit RGBA with opaque alpha.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * clamp_01(color.x)) as u8;
    let g = (255.0 * clamp_01(color.y)) as u8;
    let b = (255.0 * clamp_01(color.z)) as u8;
    [r, g, b, 255]
}

/// Row-major RGB float image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Allocate a black image, failing instead of aborting when the buffer
    /// cannot be obtained.
    pub fn try_new(width: u32, height: u32) -> RenderResult<Self> {
        let count = width as u64 * height as u64;
        let alloc_err = || RenderError::Allocation { pixels: count };

        let len = usize::try_from(count).map_err(|_| alloc_err())?;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| alloc_err())?;
        pixels.resize(len, Color::ZERO);

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.offset(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let offset = self.offset(x, y);
        self.pixels[offset] = color;
    }

    /// Copy a finished bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (row, chunk) in result.pixels.chunks(bucket.width as usize).enumerate() {
            let start = self.offset(bucket.x, bucket.y + row as u32);
            self.pixels[start..start + chunk.len()].copy_from_slice(chunk);
        }
    }

    /// Flat view with three floats per pixel.
    pub fn as_rgb_f32(&self) -> &[f32] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }
}

/// A finished render.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub image: ImageBuffer,
    /// The seed actually used, so the render can be repeated
    pub seed: u64,
    pub stats: RenderStats,
}

/// Render a full image from `config`.
///
/// Validation and buffer allocation happen before any pixel work. Pixels
/// with non-finite estimates are replaced by [`SENTINEL_COLOR`] instead of
/// failing the render. `progress` is called once per finished bucket, from
/// worker threads.
pub fn render(
    config: &RenderConfig,
    progress: Option<&(dyn Fn(&BucketResult) + Sync)>,
) -> RenderResult<RenderOutput> {
    config.validate()?;

    let seed = config.resolve_seed();
    let scene = config.scene.build();
    let camera = config.camera();
    let settings = KernelSettings::from_config(config);

    info!(
        "Rendering {} {}x{} @ {}x{} samples, {} bounces, seed {}",
        config.scene,
        config.width,
        config.height,
        config.samples_per_axis,
        config.samples_per_axis,
        config.bounces,
        seed
    );

    let start = Instant::now();
    let (image, stats) = render_buckets(
        &camera,
        scene.as_ref(),
        &settings,
        seed,
        config.bucket_size,
        progress,
    )?;

    info!(
        "Rendered {} buckets in {:.2?} ({} sentinel pixels)",
        stats.buckets,
        start.elapsed(),
        stats.sentinel_pixels
    );

    Ok(RenderOutput { image, seed, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GroundPlane, SceneKind, SphereOnPlane, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_settings(width: u32, height: u32, samples: u32, bounces: u32) -> KernelSettings {
        KernelSettings {
            width,
            height,
            samples_per_axis: samples,
            bounces,
            march: MarchSettings::default(),
        }
    }

    #[test]
    fn test_color_to_rgba_clamps() {
        assert_eq!(color_to_rgba(Color::new(0.0, 1.0, 2.0)), [0, 255, 255, 255]);
        assert_eq!(color_to_rgba(Color::new(-1.0, 0.5, 1.0)), [0, 127, 255, 255]);
    }

    #[test]
    fn test_image_buffer_layout() {
        let mut image = ImageBuffer::try_new(3, 2).unwrap();
        image.set(2, 1, Color::new(0.1, 0.2, 0.3));

        assert_eq!(image.get(2, 1), Color::new(0.1, 0.2, 0.3));
        let flat = image.as_rgb_f32();
        assert_eq!(flat.len(), 3 * 2 * 3);
        assert_eq!(&flat[15..18], &[0.1_f32, 0.2, 0.3][..]);
        assert_eq!(image.to_rgba8().len(), 3 * 2 * 4);
    }

    #[test]
    fn test_render_pixel_on_ground() {
        let camera = Camera::look_at(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, -2.0, 0.0),
            60.0,
            50.0,
        );
        let settings = small_settings(9, 9, 1, 0);
        let mut rng = StdRng::seed_from_u64(42);

        let color = render_pixel(&camera, &GroundPlane, 4, 4, &settings, &mut rng);
        assert_eq!(color, Color::splat(0.85));
    }

    #[test]
    fn test_shade_pixel_repeatable() {
        let camera = Camera::look_at(Vec3::new(0.0, 1.0, -6.0), Vec3::ZERO, 60.0, 50.0);
        let settings = small_settings(16, 12, 2, 2);
        let scene = SphereOnPlane::default();

        let a = shade_pixel(&camera, &scene, 8, 6, &settings, 123);
        let b = shade_pixel(&camera, &scene, 8, 6, &settings, 123);
        assert!(a.is_some());
        assert_eq!(a, b);
    }

    #[test]
    fn test_render_rejects_invalid_config() {
        let config = RenderConfig {
            height: 0,
            ..RenderConfig::default()
        };
        assert!(matches!(render(&config, None), Err(RenderError::InvalidConfig(_))));
    }

    #[test]
    fn test_render_rejects_oversized_sample_grid() {
        let config = RenderConfig {
            width: 1,
            height: 1,
            samples_per_axis: 65_536,
            scene: SceneKind::GroundPlane,
            seed: Some(1),
            ..RenderConfig::default()
        };
        assert!(matches!(render(&config, None), Err(RenderError::InvalidConfig(_))));
    }

    #[test]
    fn test_render_ground_plane_looking_down() {
        let config = RenderConfig {
            width: 12,
            height: 8,
            samples_per_axis: 1,
            bounces: 0,
            seed: Some(5),
            camera_pos: [0.0, 1.0, 0.0],
            camera_target: [0.0, -2.0, 0.0],
            camera_fov: 60.0,
            scene: SceneKind::GroundPlane,
            ..RenderConfig::default()
        };
        let output = render(&config, None).unwrap();

        assert_eq!(output.seed, 5);
        assert_eq!(output.stats.sentinel_pixels, 0);
        for color in &output.image.pixels {
            assert_eq!(*color, Color::splat(0.85));
        }
    }

    #[test]
    fn test_render_ground_plane_looking_up_is_black() {
        let config = RenderConfig {
            width: 12,
            height: 8,
            samples_per_axis: 1,
            bounces: 0,
            seed: Some(5),
            camera_pos: [0.0, 1.0, 0.0],
            camera_target: [0.0, 5.0, 0.0],
            camera_fov: 60.0,
            scene: SceneKind::GroundPlane,
            ..RenderConfig::default()
        };
        let output = render(&config, None).unwrap();

        assert!(output.image.pixels.iter().all(|c| *c == Color::ZERO));
    }

    #[test]
    fn test_render_sphere_and_plane_stays_in_unit_range() {
        let config = RenderConfig {
            width: 24,
            height: 16,
            samples_per_axis: 2,
            bounces: 2,
            seed: Some(9),
            scene: SceneKind::SphereOnPlane,
            ..RenderConfig::default()
        };
        let output = render(&config, None).unwrap();

        for c in output.image.as_rgb_f32() {
            assert!((0.0..=1.0).contains(c), "channel out of range: {}", c);
        }
        // Something was lit
        assert!(output.image.pixels.iter().any(|c| c.max_element() > 0.0));
    }

    #[test]
    fn test_render_is_deterministic() {
        let _ = env_logger::builder().is_test(true).try_init();
        let config = RenderConfig {
            width: 20,
            height: 14,
            samples_per_axis: 2,
            bounces: 2,
            seed: Some(2024),
            scene: SceneKind::TiledSpheres,
            ..RenderConfig::default()
        };
        let a = render(&config, None).unwrap();
        let b = render(&config, None).unwrap();
        assert_eq!(a.image, b.image);
    }

    #[test]
    fn test_tiling_does_not_change_output() {
        let base = RenderConfig {
            width: 19,
            height: 11,
            samples_per_axis: 2,
            bounces: 1,
            seed: Some(77),
            scene: SceneKind::SphereOnPlane,
            ..RenderConfig::default()
        };
        let tiled = RenderConfig {
            bucket_size: 4,
            ..base.clone()
        };
        let single = RenderConfig {
            bucket_size: 64,
            ..base.clone()
        };

        assert_eq!(
            render(&tiled, None).unwrap().image,
            render(&single, None).unwrap().image
        );
    }

    #[test]
    fn test_seed_changes_output() {
        let config = RenderConfig {
            width: 16,
            height: 12,
            samples_per_axis: 1,
            bounces: 2,
            seed: Some(1),
            scene: SceneKind::SphereOnPlane,
            ..RenderConfig::default()
        };
        let other = RenderConfig {
            seed: Some(2),
            ..config.clone()
        };
        assert_ne!(
            render(&config, None).unwrap().image,
            render(&other, None).unwrap().image
        );
    }
}
