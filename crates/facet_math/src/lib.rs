// Re-export glam for convenience
pub use glam::*;

// Facet math types
mod camera;
mod ray;

pub use camera::{Camera, FAR_PLANE, NEAR_PLANE};
pub use ray::Ray;

/// A world axis used by the fixed-step navigation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Unit vector along this axis.
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

/// Reflect `incident` about the (unit) normal `normal`.
///
/// Returns `incident - 2 * dot(normal, incident) * normal`.
#[inline]
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}
