// Re-export glam for convenience
pub use glam::*;

// sdfpt math types
mod ray;
pub use ray::Ray;
