//! Surface normals from the distance field.

use crate::Scene;
use sdfpt_math::Vec3;

/// Estimate the unit normal at `p` by central differences.
///
/// `t` is the field value already sampled at `p`; it is subtracted from each
/// partial derivative before normalizing. `ray_dir` is the incoming ray
/// direction and the result is flipped to face against it.
pub fn estimate_normal(scene: &dyn Scene, p: Vec3, t: f32, ray_dir: Vec3, eps: f32) -> Vec3 {
    let partial = |axis: Vec3| {
        let offset = axis * eps;
        (scene.distance(p + offset) - scene.distance(p - offset)) / (2.0 * eps)
    };

    let gradient = Vec3::new(partial(Vec3::X), partial(Vec3::Y), partial(Vec3::Z));
    let n = (gradient - Vec3::splat(t)).normalize_or_zero();

    if (-ray_dir).dot(n) < 0.0 {
        -n
    } else {
        n
    }
}
