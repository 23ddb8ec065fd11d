//! Pinhole camera for primary ray generation.

use sdfpt_math::{Ray, Vec3};

/// Camera basis and ray limit, fixed for the whole render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Unit viewing direction
    pub direction: Vec3,
    /// Tangent of half the horizontal field of view
    pub half_fov: f32,
    /// Unit screen-up vector, orthogonal to `direction`
    pub up: Vec3,
    /// Unit screen-right vector, orthogonal to `direction` and `up`
    pub side: Vec3,
    /// Travel limit for every ray of the render
    pub max_distance: f32,
}

impl Camera {
    /// Build a camera at `position` looking at `target`.
    ///
    /// `fov_degrees` is the full horizontal field of view. When looking
    /// straight up or down, world Z replaces world Y as the up reference.
    pub fn look_at(position: Vec3, target: Vec3, fov_degrees: f32, max_distance: f32) -> Self {
        let direction = (target - position).normalize();
        let mut side = direction.cross(Vec3::Y);
        if side.length_squared() < 1e-12 {
            side = direction.cross(Vec3::Z);
        }
        let side = side.normalize();
        let up = side.cross(direction);

        Self {
            position,
            direction,
            half_fov: (fov_degrees.to_radians() / 2.0).tan(),
            up,
            side,
            max_distance,
        }
    }

    /// Primary ray through normalized device coordinates in [-1, 1].
    ///
    /// +x is screen right, +y is screen up. The ray's length is the
    /// camera's travel limit.
    pub fn ray(&self, ndc_x: f32, ndc_y: f32) -> Ray {
        let offset = (self.side * ndc_x + self.up * ndc_y) * self.half_fov;
        let dir = (self.direction + offset).normalize();
        Ray::with_limit(self.position, dir, self.max_distance)
    }
}
