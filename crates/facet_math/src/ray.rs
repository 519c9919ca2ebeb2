use crate::Vec3;

/// A ray in 3D space with an origin and a unit direction.
///
/// Rays are created per pixel, per shadow test and per mirror bounce
/// and are never stored.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray. The direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Create a ray that starts at `from` and heads towards `to`.
    pub fn towards(from: Vec3, to: Vec3) -> Self {
        Self::new(from, to - from)
    }
}
