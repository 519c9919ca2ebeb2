//! Scene aggregate: camera, light, triangles and render settings.
//!
//! The triangle list is converted to world space and its normals are
//! computed once in [`Scene::new`]; afterwards only the camera, the light
//! and the render settings change.

use facet_math::{Axis, Camera, Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::light::{Light, LightMode};
use crate::triangle::{compute_normals, Triangle};

/// Default uniform scale applied to loaded models.
pub const DEFAULT_MODEL_SCALE: f32 = 0.35;

/// Which renderer draws the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    Wireframe,
    Rasterized,
    #[default]
    RayTraced,
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderMode::Wireframe => write!(f, "wireframe"),
            RenderMode::Rasterized => write!(f, "rasterized"),
            RenderMode::RayTraced => write!(f, "ray_traced"),
        }
    }
}

impl std::str::FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wireframe" => Ok(RenderMode::Wireframe),
            "rasterized" => Ok(RenderMode::Rasterized),
            "ray_traced" | "raytraced" => Ok(RenderMode::RayTraced),
            other => Err(format!("unknown render mode '{other}'")),
        }
    }
}

/// Uniform scale about the origin.
pub fn model_transform(scale: f32) -> Mat4 {
    Mat4::from_scale(Vec3::splat(scale))
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub camera: Camera,
    pub light: Light,
    triangles: Vec<Triangle>,
    render_mode: RenderMode,
    mirror: bool,
    mirror_depth: u32,
}

impl Scene {
    /// Build a scene from model-space triangles.
    ///
    /// Every triangle is transformed by `model` and normals are computed
    /// over the transformed list.
    pub fn new(camera: Camera, light: Light, mut triangles: Vec<Triangle>, model: Mat4) -> Self {
        for triangle in &mut triangles {
            triangle.transform(&model);
        }
        compute_normals(&mut triangles);

        log::info!(
            "Scene: {} triangles, {}x{} viewport",
            triangles.len(),
            camera.width(),
            camera.height()
        );

        Self {
            camera,
            light,
            triangles,
            render_mode: RenderMode::default(),
            mirror: false,
            mirror_depth: 1,
        }
    }

    pub fn with_render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }

    pub fn with_mirror(mut self, enabled: bool) -> Self {
        self.mirror = enabled;
        self
    }

    /// Number of reflection bounces traced from a mirror surface.
    pub fn with_mirror_depth(mut self, depth: u32) -> Self {
        self.mirror_depth = depth;
        self
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Mutable camera alongside the triangle list, for the depth-buffered
    /// rasterizer.
    pub fn camera_and_triangles(&mut self) -> (&mut Camera, &[Triangle]) {
        (&mut self.camera, &self.triangles)
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn mirror(&self) -> bool {
        self.mirror
    }

    pub fn mirror_depth(&self) -> u32 {
        self.mirror_depth
    }

    pub fn width(&self) -> usize {
        self.camera.width()
    }

    pub fn height(&self) -> usize {
        self.camera.height()
    }

    pub fn move_light(&mut self, axis: Axis, sign: f32) {
        self.light.translate(axis, sign);
        log::debug!("Light moved to {}", self.light.position);
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
        log::info!("Render mode: {mode}");
    }

    /// Change the light mode. Light modes only affect the ray tracer, so
    /// this also switches to ray-traced rendering.
    pub fn set_light_mode(&mut self, mode: LightMode) {
        self.light.mode = mode;
        self.render_mode = RenderMode::RayTraced;
        log::info!("Light mode: {mode}");
    }

    pub fn toggle_mirror(&mut self) {
        self.mirror = !self.mirror;
        log::info!("Mirror: {}", if self.mirror { "on" } else { "off" });
    }

    pub fn toggle_soft_shadows(&mut self) {
        self.light.soft_shadows = !self.light.soft_shadows;
        log::info!(
            "Soft shadows: {}",
            if self.light.soft_shadows { "on" } else { "off" }
        );
    }

    /// Resize the viewport. The camera projection and depth buffer follow.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.camera.resize(width, height);
    }
}
