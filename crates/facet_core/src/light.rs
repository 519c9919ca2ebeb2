use facet_math::{Axis, Vec3};
use serde::{Deserialize, Serialize};

/// Distance the light moves per navigation step.
pub const LIGHT_STEP: f32 = 0.1;

/// Shading mode used by the ray tracer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightMode {
    /// Raw face colour, no lighting.
    Flat,
    /// Ambient, diffuse and specular terms with proximity falloff.
    #[default]
    Phong,
}

impl std::fmt::Display for LightMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LightMode::Flat => write!(f, "flat"),
            LightMode::Phong => write!(f, "phong"),
        }
    }
}

/// A single point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub mode: LightMode,
    pub ambient_intensity: f32,
    /// Base colour, 0..=255 per channel.
    pub color: Vec3,
    pub soft_shadows: bool,
}

impl Light {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Move the light by one step along a world axis.
    pub fn translate(&mut self, axis: Axis, sign: f32) {
        self.position += axis.unit() * LIGHT_STEP * sign;
    }
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.3, 0.6, 1.3),
            mode: LightMode::Phong,
            ambient_intensity: 0.15,
            color: Vec3::splat(255.0),
            soft_shadows: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_translate() {
        let mut light = Light::new(Vec3::ZERO);
        light.translate(Axis::Y, 1.0);
        light.translate(Axis::Y, 1.0);
        light.translate(Axis::X, -1.0);

        assert!((light.position - Vec3::new(-0.1, 0.2, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_light_mode_serde_names() {
        let mode: LightMode = serde_json::from_str("\"flat\"").unwrap();
        assert_eq!(mode, LightMode::Flat);
        assert_eq!(serde_json::to_string(&LightMode::Phong).unwrap(), "\"phong\"");
        assert_eq!(LightMode::Flat.to_string(), "flat");
    }
}
