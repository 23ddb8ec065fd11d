//! Sphere tracing.

use crate::normal::estimate_normal;
use crate::{Color, Scene};
use sdfpt_math::{Ray, Vec3};
use serde::{Deserialize, Serialize};

/// Tuning values for marching and shading.
///
/// These trade surface pitting against banding and depend on scene scale,
/// so they are configuration rather than constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarchSettings {
    /// Distance below which the marcher reports a hit
    pub min_dist: f32,
    /// Finite difference step for normal estimation
    pub normal_eps: f32,
    /// Offset along the normal for bounce ray origins
    pub push_dist: f32,
}

impl Default for MarchSettings {
    fn default() -> Self {
        Self {
            min_dist: 1e-3,
            normal_eps: 1e-3,
            push_dist: 1e-2,
        }
    }
}

impl MarchSettings {
    /// Check that every tuning value is finite and positive.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("minDist", self.min_dist),
            ("normalEps", self.normal_eps),
            ("pushDist", self.push_dist),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be finite and > 0, got {}", name, value));
            }
        }
        Ok(())
    }
}

/// Result of marching one ray.
///
/// On a miss only `hit` is meaningful.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    pub hit: bool,
    /// Point where the field dropped below the hit threshold
    pub p: Vec3,
    /// Unit normal facing the incoming ray
    pub normal: Vec3,
    /// Surface albedo
    pub color: Color,
}

impl Default for HitRecord {
    fn default() -> Self {
        Self {
            hit: false,
            p: Vec3::ZERO,
            normal: Vec3::ZERO,
            color: Color::ZERO,
        }
    }
}

/// March `ray` through `scene` until the distance drops below
/// `settings.min_dist` or the ray has travelled its full length.
///
/// Each step advances by the field value, so a conservative field can never
/// be stepped through. Fields that overestimate distance can tunnel through
/// thin features.
pub fn march(scene: &dyn Scene, ray: &Ray, settings: &MarchSettings) -> HitRecord {
    let max_distance = ray.max_distance();
    let dir = ray.unit_direction();
    if !max_distance.is_finite() || dir == Vec3::ZERO {
        return HitRecord::default();
    }

    let mut travelled = 0.0_f32;
    let mut p = ray.origin();

    while travelled < max_distance {
        let t = scene.distance(p);
        if t < settings.min_dist {
            return HitRecord {
                hit: true,
                p,
                normal: estimate_normal(scene, p, t, dir, settings.normal_eps),
                color: scene.color_at(p),
            };
        }
        travelled += t;
        p += t * dir;
    }

    HitRecord::default()
}
