//! Render configuration record.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::bucket::DEFAULT_BUCKET_SIZE;
use crate::{Camera, MarchSettings, RenderError, RenderResult, SceneKind, Vec3};
use serde::{Deserialize, Serialize};

/// Largest accepted antialiasing grid edge.
pub const MAX_SAMPLES_PER_AXIS: u32 = 1024;

/// Everything needed to reproduce a render.
///
/// Deserializes from camelCase JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Antialiasing grid size; each pixel takes `samples_per_axis^2` samples
    pub samples_per_axis: u32,
    /// Diffuse bounces after the primary hit
    pub bounces: u32,
    /// Global seed; `None` picks a time-derived seed
    pub seed: Option<u64>,
    pub camera_pos: [f32; 3],
    pub camera_target: [f32; 3],
    /// Full horizontal field of view in degrees
    pub camera_fov: f32,
    pub max_ray_distance: f32,
    pub scene: SceneKind,
    /// Tile edge length for parallel dispatch
    pub bucket_size: u32,
    pub march: MarchSettings,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            samples_per_axis: 2,
            bounces: 2,
            seed: None,
            camera_pos: [0.0, 1.0, -6.0],
            camera_target: [0.0, -1.0, 0.0],
            camera_fov: 60.0,
            max_ray_distance: 50.0,
            scene: SceneKind::default(),
            bucket_size: DEFAULT_BUCKET_SIZE,
            march: MarchSettings::default(),
        }
    }
}

impl RenderConfig {
    /// Reject configurations that cannot produce an image.
    pub fn validate(&self) -> RenderResult<()> {
        let invalid = |msg: String| Err(RenderError::InvalidConfig(msg));

        if self.width == 0 || self.height == 0 {
            return invalid(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            ));
        }
        if self.samples_per_axis == 0 || self.samples_per_axis > MAX_SAMPLES_PER_AXIS {
            return invalid(format!(
                "samplesPerAxis must be in 1..={}, got {}",
                MAX_SAMPLES_PER_AXIS, self.samples_per_axis
            ));
        }
        if self.bucket_size == 0 {
            return invalid("bucketSize must be at least 1".to_string());
        }
        if !self.max_ray_distance.is_finite() || self.max_ray_distance <= 0.0 {
            return invalid(format!(
                "maxRayDistance must be finite and > 0, got {}",
                self.max_ray_distance
            ));
        }
        if !(self.camera_fov > 0.0 && self.camera_fov < 180.0) {
            return invalid(format!(
                "cameraFov must be in (0, 180) degrees, got {}",
                self.camera_fov
            ));
        }
        let pos = Vec3::from_array(self.camera_pos);
        let target = Vec3::from_array(self.camera_target);
        if !pos.is_finite() || !target.is_finite() {
            return invalid("camera position and target must be finite".to_string());
        }
        if (target - pos).length_squared() == 0.0 {
            return invalid("cameraTarget must differ from cameraPos".to_string());
        }
        self.march.validate().map_err(RenderError::InvalidConfig)
    }

    /// The configured seed, or one derived from the current time.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(time_seed)
    }

    pub fn camera(&self) -> Camera {
        Camera::look_at(
            Vec3::from_array(self.camera_pos),
            Vec3::from_array(self.camera_target),
            self.camera_fov,
            self.max_ray_distance,
        )
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
