use crate::Vec3;

/// A ray in 3D space for sphere tracing.
///
/// The direction is not normalized: its length is the maximum distance the
/// ray may travel before it is considered a miss.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray from a unit direction and a travel limit.
    pub fn with_limit(origin: Vec3, unit_direction: Vec3, max_distance: f32) -> Self {
        Self::new(origin, unit_direction * max_distance)
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the (length-encoded) direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Maximum travel distance, i.e. the direction's length.
    #[inline]
    pub fn max_distance(&self) -> f32 {
        self.direction.length()
    }

    /// Normalized direction. Zero for a zero-length ray.
    #[inline]
    pub fn unit_direction(&self) -> Vec3 {
        self.direction.normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let direction = Vec3::new(0.0, 4.0, 0.0);
        let ray = Ray::new(origin, direction);

        assert_eq!(ray.origin(), origin);
        assert_eq!(ray.direction(), direction);
        assert_eq!(ray.max_distance(), 4.0);
        assert_eq!(ray.unit_direction(), Vec3::Y);
    }

    #[test]
    fn test_with_limit() {
        let ray = Ray::with_limit(Vec3::ZERO, Vec3::Z, 20.0);
        assert_eq!(ray.direction(), Vec3::new(0.0, 0.0, 20.0));
        assert!((ray.max_distance() - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_length_ray() {
        let ray = Ray::new(Vec3::ONE, Vec3::ZERO);
        assert_eq!(ray.max_distance(), 0.0);
        assert_eq!(ray.unit_direction(), Vec3::ZERO);
    }
}
