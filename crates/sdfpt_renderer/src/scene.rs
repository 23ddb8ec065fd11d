//! Scenes as signed distance fields with paired color lookup.

use std::fmt;
use std::str::FromStr;

use crate::sdf::{sdf_mandelbulb, sdf_plane, sdf_sphere, sdf_union, MandelbulbParams};
use crate::{Color, RenderError};
use sdfpt_math::Vec3;
use serde::{Deserialize, Serialize};

/// A scene that can be sphere traced.
pub trait Scene: Send + Sync {
    /// Signed distance from `p` to the nearest surface.
    fn distance(&self, p: Vec3) -> f32;

    /// Albedo of the surface at `p`, which is assumed to lie on a surface.
    fn color_at(&self, p: Vec3) -> Color;
}

const GROUND_ANCHOR: Vec3 = Vec3::new(0.0, -2.0, 0.0);
const GREY: Color = Vec3::splat(0.85);

/// Ground plane at y = -2 facing +Y.
#[inline]
fn ground(p: Vec3) -> f32 {
    sdf_plane(p - GROUND_ANCHOR, Vec3::Y)
}

/// Only the ground plane.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroundPlane;

impl Scene for GroundPlane {
    fn distance(&self, p: Vec3) -> f32 {
        ground(p)
    }

    fn color_at(&self, _p: Vec3) -> Color {
        GREY
    }
}

/// An infinite lattice of spheres resting on the ground plane.
#[derive(Debug, Clone, Copy)]
pub struct TiledSpheres {
    /// Lattice period along x and z
    pub period: f32,
    /// Sphere radius
    pub radius: f32,
    /// Height of the sphere centers
    pub center_y: f32,
    pub sphere_color: Color,
    pub ground_color: Color,
}

impl Default for TiledSpheres {
    fn default() -> Self {
        Self {
            period: 2.0,
            radius: 0.5,
            center_y: -1.5,
            sphere_color: GREY,
            ground_color: Color::new(1.0, 0.3, 0.1),
        }
    }
}

impl TiledSpheres {
    /// Distance to the nearest sphere of the lattice.
    ///
    /// The truncating remainder keeps the sign of the input, so each of the
    /// four sign combinations of x and z is wrapped separately and unioned.
    fn spheres(&self, p: Vec3) -> f32 {
        let half = self.period / 2.0;
        let wx = p.x % self.period;
        let wz = p.z % self.period;
        let y = p.y - self.center_y;

        let mut d = f32::INFINITY;
        for sx in [1.0_f32, -1.0] {
            for sz in [1.0_f32, -1.0] {
                let local = Vec3::new(sx * wx - half, y, sz * wz - half);
                d = sdf_union(d, sdf_sphere(local, self.radius));
            }
        }
        d
    }
}

impl Scene for TiledSpheres {
    fn distance(&self, p: Vec3) -> f32 {
        sdf_union(self.spheres(p), ground(p))
    }

    fn color_at(&self, p: Vec3) -> Color {
        if ground(p) < self.spheres(p) {
            self.ground_color
        } else {
            self.sphere_color
        }
    }
}

/// A Mandelbulb standing on the ground plane.
#[derive(Debug, Clone, Copy)]
pub struct MandelbulbScene {
    pub params: MandelbulbParams,
    /// Uniform scale applied to the unit bulb
    pub scale: f32,
    pub bulb_color: Color,
    pub ground_color: Color,
}

impl Default for MandelbulbScene {
    fn default() -> Self {
        Self {
            params: MandelbulbParams::default(),
            scale: 2.3,
            bulb_color: Color::new(0.85, 1.0, 0.0),
            ground_color: GREY,
        }
    }
}

impl MandelbulbScene {
    fn bulb(&self, p: Vec3) -> f32 {
        sdf_mandelbulb(p / self.scale, &self.params) * self.scale
    }
}

impl Scene for MandelbulbScene {
    fn distance(&self, p: Vec3) -> f32 {
        sdf_union(self.bulb(p), ground(p))
    }

    fn color_at(&self, p: Vec3) -> Color {
        if ground(p) < self.bulb(p) {
            self.ground_color
        } else {
            self.bulb_color
        }
    }
}

/// A single sphere hovering over the ground plane.
#[derive(Debug, Clone, Copy)]
pub struct SphereOnPlane {
    pub center: Vec3,
    pub radius: f32,
    pub sphere_color: Color,
    pub ground_color: Color,
}

impl Default for SphereOnPlane {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 1.0,
            sphere_color: Color::new(0.9, 0.4, 0.3),
            ground_color: GREY,
        }
    }
}

impl SphereOnPlane {
    fn sphere(&self, p: Vec3) -> f32 {
        sdf_sphere(p - self.center, self.radius)
    }
}

impl Scene for SphereOnPlane {
    fn distance(&self, p: Vec3) -> f32 {
        sdf_union(self.sphere(p), ground(p))
    }

    fn color_at(&self, p: Vec3) -> Color {
        if ground(p) < self.sphere(p) {
            self.ground_color
        } else {
            self.sphere_color
        }
    }
}

/// Scene selector used by the render configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SceneKind {
    #[default]
    TiledSpheres,
    Mandelbulb,
    GroundPlane,
    SphereOnPlane,
}

impl SceneKind {
    pub const ALL: [SceneKind; 4] = [
        SceneKind::TiledSpheres,
        SceneKind::Mandelbulb,
        SceneKind::GroundPlane,
        SceneKind::SphereOnPlane,
    ];

    /// Instantiate the scene with its default parameters.
    pub fn build(self) -> Box<dyn Scene> {
        match self {
            SceneKind::TiledSpheres => Box::new(TiledSpheres::default()),
            SceneKind::Mandelbulb => Box::new(MandelbulbScene::default()),
            SceneKind::GroundPlane => Box::new(GroundPlane),
            SceneKind::SphereOnPlane => Box::new(SphereOnPlane::default()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SceneKind::TiledSpheres => "tiledSpheres",
            SceneKind::Mandelbulb => "mandelbulb",
            SceneKind::GroundPlane => "groundPlane",
            SceneKind::SphereOnPlane => "sphereOnPlane",
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SceneKind {
    type Err = RenderError;

    /// Accepts the camelCase name or its kebab/snake spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        SceneKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().to_ascii_lowercase() == key)
            .ok_or_else(|| RenderError::InvalidConfig(format!("unknown scene '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiled_spheres_centers() {
        let scene = TiledSpheres::default();
        // Spheres sit on odd lattice coordinates, including negative ones
        for (x, z) in [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-3.0, -5.0), (7.0, 3.0)] {
            let d = scene.distance(Vec3::new(x, -1.5, z));
            assert!((d + 0.5).abs() < 1e-5, "({}, {}) -> {}", x, z, d);
        }
    }

    #[test]
    fn test_tiled_spheres_colors() {
        let scene = TiledSpheres::default();
        // Between spheres on the ground
        assert_eq!(scene.color_at(Vec3::new(0.0, -2.0, 0.0)), scene.ground_color);
        // Top of a sphere
        assert_eq!(scene.color_at(Vec3::new(1.0, -1.0, 1.0)), scene.sphere_color);
    }

    #[test]
    fn test_mandelbulb_scene_colors() {
        let scene = MandelbulbScene::default();
        assert_eq!(scene.color_at(Vec3::new(0.0, -2.0, 8.0)), scene.ground_color);
        // Deep inside the bulb the ground is farther than the fractal
        assert_eq!(scene.color_at(Vec3::new(0.1, 0.1, 0.1)), scene.bulb_color);
    }

    #[test]
    fn test_ground_plane() {
        let scene = GroundPlane;
        assert_eq!(scene.distance(Vec3::new(3.0, -2.0, 9.0)), 0.0);
        assert_eq!(scene.distance(Vec3::new(0.0, 1.0, 0.0)), 3.0);
        assert_eq!(scene.color_at(Vec3::ZERO), GREY);
    }

    #[test]
    fn test_sphere_on_plane() {
        let scene = SphereOnPlane::default();
        assert!((scene.distance(Vec3::new(0.0, 3.0, 0.0)) - 2.0).abs() < 1e-6);
        assert_eq!(scene.color_at(Vec3::new(0.0, 1.0, 0.0)), scene.sphere_color);
        assert_eq!(scene.color_at(Vec3::new(5.0, -2.0, 0.0)), scene.ground_color);
    }

    #[test]
    fn test_scene_kind_parse() {
        assert_eq!("mandelbulb".parse::<SceneKind>().unwrap(), SceneKind::Mandelbulb);
        assert_eq!("tiledSpheres".parse::<SceneKind>().unwrap(), SceneKind::TiledSpheres);
        assert_eq!("sphere-on-plane".parse::<SceneKind>().unwrap(), SceneKind::SphereOnPlane);
        assert_eq!("ground_plane".parse::<SceneKind>().unwrap(), SceneKind::GroundPlane);
        assert!("teapot".parse::<SceneKind>().is_err());
    }

    #[test]
    fn test_scene_kind_build_is_usable() {
        for kind in SceneKind::ALL {
            let scene = kind.build();
            assert!(scene.distance(Vec3::new(0.0, 10.0, 0.0)) > 0.0, "{}", kind);
        }
    }
}
