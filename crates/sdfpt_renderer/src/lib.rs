//! sdfpt renderer - sphere-traced SDF path tracing.
//!
//! A Monte Carlo path tracer for scenes described by signed distance
//! fields. Each pixel is an independent task with its own random stream,
//! so a render is reproducible from its seed regardless of how the image
//! is tiled or how many threads run it.
//!
//! # Example
//!
//! ```ignore
//! use sdfpt_renderer::{render, RenderConfig, SceneKind};
//!
//! let config = RenderConfig {
//!     scene: SceneKind::Mandelbulb,
//!     seed: Some(7),
//!     ..RenderConfig::default()
//! };
//! let output = render(&config, None)?;
//! let floats: &[f32] = output.image.as_rgb_f32();
//! ```

mod bucket;
mod camera;
mod config;
mod error;
mod integrator;
mod march;
mod normal;
mod renderer;
mod sampling;
mod scene;
pub mod sdf;

pub use bucket::{
    generate_buckets, render_bucket, render_buckets, Bucket, BucketResult, RenderStats,
    DEFAULT_BUCKET_SIZE,
};
pub use camera::Camera;
pub use config::{RenderConfig, MAX_SAMPLES_PER_AXIS};
pub use error::{RenderError, RenderResult};
pub use integrator::{trace_path, PathState};
pub use march::{march, HitRecord, MarchSettings};
pub use normal::estimate_normal;
pub use renderer::{
    color_to_rgba, render, render_pixel, ImageBuffer, KernelSettings, RenderOutput,
    SENTINEL_COLOR,
};
pub use sampling::{gen_f32, pixel_rng, random_in_unit_disk, sample_cosine_hemisphere};
pub use scene::{
    GroundPlane, MandelbulbScene, Scene, SceneKind, SphereOnPlane, TiledSpheres,
};

/// Re-export Vec3 and Ray from sdfpt_math
pub use sdfpt_math::{Ray, Vec3};

/// Color type alias (RGB values nominally 0-1, not clamped until output)
pub type Color = Vec3;
