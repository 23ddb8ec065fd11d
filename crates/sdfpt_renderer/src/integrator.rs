//! Multi-bounce diffuse light transport under a constant white sky.

use crate::march::{march, HitRecord, MarchSettings};
use crate::sampling::sample_cosine_hemisphere;
use crate::{Color, Scene};
use rand::RngCore;
use sdfpt_math::Ray;

/// Where a path stands between two steps of [`trace_path`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathState {
    /// The current ray still has to be marched.
    Tracing,
    /// The current ray hit a surface.
    Hit(HitRecord),
    /// A bounce ray left the scene and sees the sky.
    Escaped,
    /// No more light will be gathered.
    Terminated,
}

/// Estimate the radiance arriving along `ray`.
///
/// The sky has unit radiance but is only reached by bounce rays: a primary
/// miss is black. Paths still hitting surfaces when the bounce budget runs
/// out contribute nothing. With a budget of zero bounces a primary hit is
/// shaded as fully sky-lit, giving its flat albedo.
///
/// Every bounce ray keeps the primary ray's length as its travel limit.
pub fn trace_path(
    scene: &dyn Scene,
    ray: &Ray,
    max_bounces: u32,
    settings: &MarchSettings,
    rng: &mut dyn RngCore,
) -> Color {
    let max_distance = ray.max_distance();
    let mut current = *ray;
    let mut radiance = Color::ZERO;
    let mut mask = Color::ONE;
    let mut bounce = 0;
    let mut state = PathState::Tracing;

    loop {
        state = match state {
            PathState::Tracing => {
                let rec = march(scene, &current, settings);
                if rec.hit {
                    PathState::Hit(rec)
                } else if bounce == 0 {
                    PathState::Terminated
                } else {
                    PathState::Escaped
                }
            }
            PathState::Hit(rec) => {
                mask *= rec.color;
                if bounce < max_bounces {
                    let dir = sample_cosine_hemisphere(rec.normal, rng);
                    let origin = rec.p + rec.normal * settings.push_dist;
                    current = Ray::with_limit(origin, dir, max_distance);
                    bounce += 1;
                    PathState::Tracing
                } else if max_bounces == 0 {
                    PathState::Escaped
                } else {
                    PathState::Terminated
                }
            }
            PathState::Escaped => {
                radiance += mask;
                PathState::Terminated
            }
            PathState::Terminated => break,
        };
    }

    radiance
}
