//! Random streams and direction sampling.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use sdfpt_math::Vec3;

/// Uniform f32 in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// SplitMix64 finalizer.
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Random stream for the pixel at row-major `index`.
///
/// Depends only on `(seed, index)`, never on which thread or tile renders
/// the pixel.
pub fn pixel_rng(seed: u64, index: u64) -> StdRng {
    let key = mix64(seed ^ mix64(index.wrapping_add(0x9e37_79b9_7f4a_7c15)));
    StdRng::seed_from_u64(key)
}

/// Sample a point uniformly in the unit disk by rejection (z = 0).
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let x = gen_f32(rng) * 2.0 - 1.0;
        let y = gen_f32(rng) * 2.0 - 1.0;
        if x * x + y * y <= 1.0 {
            return Vec3::new(x, y, 0.0);
        }
    }
}

/// Cosine-weighted direction in the hemisphere around unit `normal`.
///
/// A uniform disk sample is lifted onto the hemisphere and expressed in a
/// tangent frame built from the axis where `normal` is smallest. Ties go to
/// x, then y. A non-finite result (degenerate normal) falls back to
/// `normal` itself.
pub fn sample_cosine_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let disk = random_in_unit_disk(rng);
    let z = (1.0 - disk.x * disk.x - disk.y * disk.y).max(0.0).sqrt();

    let tangent = least_aligned_axis(normal).cross(normal).normalize();
    let bitangent = normal.cross(tangent);

    let dir = (tangent * disk.x + bitangent * disk.y + normal * z).normalize();
    if dir.is_finite() {
        dir
    } else {
        normal
    }
}

/// Coordinate axis along which `n` has the smallest magnitude.
fn least_aligned_axis(n: Vec3) -> Vec3 {
    let a = n.abs();
    if a.x <= a.y && a.x <= a.z {
        Vec3::X
    } else if a.y <= a.z {
        Vec3::Y
    } else {
        Vec3::Z
    }
}
