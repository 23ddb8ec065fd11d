//! Signed distance primitives and combinators.
//!
//! Every primitive returns a signed distance: negative inside, zero on the
//! surface, positive outside. The magnitude never exceeds the true distance
//! to the nearest surface point, which is what sphere tracing relies on.
//! The fractal estimate is the one exception and is only approximately
//! conservative.

use sdfpt_math::Vec3;

/// Union of two shapes (nearest surface).
#[inline]
pub fn sdf_union(a: f32, b: f32) -> f32 {
    a.min(b)
}

/// Subtract shape `a` from shape `b`.
#[inline]
pub fn sdf_difference(a: f32, b: f32) -> f32 {
    (-a).max(b)
}

/// Intersection of two shapes.
#[inline]
pub fn sdf_intersection(a: f32, b: f32) -> f32 {
    a.max(b)
}

/// Signed distance to a sphere of `radius` centered at the origin.
#[inline]
pub fn sdf_sphere(point: Vec3, radius: f32) -> f32 {
    point.length() - radius
}

/// Signed distance to a plane through the origin with unit `normal`.
///
/// Offset `point` by the plane's anchor to move the plane.
#[inline]
pub fn sdf_plane(point: Vec3, normal: Vec3) -> f32 {
    point.dot(normal)
}

/// Escape-time parameters for the Mandelbulb estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MandelbulbParams {
    /// Maximum number of orbit iterations
    pub iterations: u32,
    /// Escape radius
    pub bail: f32,
    /// Power of the polar transform
    pub power: f32,
}

impl Default for MandelbulbParams {
    fn default() -> Self {
        Self {
            iterations: 8,
            bail: 4.0,
            power: 8.0,
        }
    }
}

/// Distance estimate to the Mandelbulb fractal.
///
/// Iterates `z -> z^power + point` in spherical coordinates while tracking
/// the running derivative, and returns `0.5 * ln(r) * r / dr`. If the orbit
/// does not escape within the iteration budget the last radius computed is
/// used, which is only an approximation near the boundary.
pub fn sdf_mandelbulb(point: Vec3, params: &MandelbulbParams) -> f32 {
    let power = params.power;
    let mut z = point;
    let mut dr = 1.0_f32;
    let mut r = 0.0_f32;

    for _ in 0..params.iterations {
        r = z.length();
        if r > params.bail {
            break;
        }
        // The orbit is pinned at the origin; the polar form is undefined there.
        if r == 0.0 {
            return 0.0;
        }

        // to polar
        let theta = (z.z / r).asin();
        let phi = z.y.atan2(z.x);
        dr = r.powf(power - 1.0) * power * dr + 1.0;

        // scale and rotate
        let zr = r.powf(power);
        let theta = theta * power;
        let phi = phi * power;

        // back to cartesian
        z = zr * Vec3::new(theta.cos() * phi.cos(), phi.sin() * theta.cos(), theta.sin());
        z += point;
    }

    0.5 * r.ln() * r / dr
}
