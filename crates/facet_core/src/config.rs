//! JSON configuration for the viewer.
//!
//! Every field has a default, so an empty object `{}` is a valid config.

use std::path::{Path, PathBuf};

use facet_math::{Camera, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::light::{Light, LightMode};
use crate::loader::LoadOptions;
use crate::scene::{RenderMode, DEFAULT_MODEL_SCALE};

/// Errors that can occur while reading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    /// OBJ model path. The material library is resolved from its `mtllib` line.
    pub model: PathBuf,
    pub camera_position: [f32; 3],
    pub light_position: [f32; 3],
    pub ambient_intensity: f32,
    pub light_color: [f32; 3],
    pub light_mode: LightMode,
    pub soft_shadows: bool,
    pub render_mode: RenderMode,
    pub mirror: bool,
    pub mirror_depth: u32,
    pub model_scale: f32,
    pub mirror_materials: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let light = Light::default();
        Self {
            width: 480,
            height: 480,
            model: PathBuf::from("assets/cornell-box.obj"),
            camera_position: [0.0, 0.0, 4.0],
            light_position: light.position.to_array(),
            ambient_intensity: light.ambient_intensity,
            light_color: light.color.to_array(),
            light_mode: light.mode,
            soft_shadows: light.soft_shadows,
            render_mode: RenderMode::RayTraced,
            mirror: false,
            mirror_depth: 1,
            model_scale: DEFAULT_MODEL_SCALE,
            mirror_materials: Vec::new(),
        }
    }
}

impl Config {
    /// Read a config from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn camera(&self) -> Camera {
        Camera::new(self.width, self.height, Vec3::from_array(self.camera_position))
    }

    pub fn light(&self) -> Light {
        Light {
            position: Vec3::from_array(self.light_position),
            mode: self.light_mode,
            ambient_intensity: self.ambient_intensity,
            color: Vec3::from_array(self.light_color),
            soft_shadows: self.soft_shadows,
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            mirror_materials: self.mirror_materials.clone(),
        }
    }
}
