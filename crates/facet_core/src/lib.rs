//! Facet Core - scene model, model loading and configuration.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Triangle`, `Light`, `Color`
//! - **Loading**: OBJ/MTL parsing into world-ready triangle lists
//! - **Configuration**: JSON config with defaults for every field
//!
//! # Example
//!
//! ```ignore
//! use facet_core::{load_obj, model_transform, Config, Scene};
//!
//! let config = Config::from_file("facet.json")?;
//! let triangles = load_obj(&config.model, &config.load_options())?;
//! let scene = Scene::new(
//!     config.camera(),
//!     config.light(),
//!     triangles,
//!     model_transform(config.model_scale),
//! );
//! ```

pub mod color;
pub mod config;
pub mod light;
pub mod loader;
pub mod scene;
pub mod triangle;

// Re-export commonly used types
pub use color::Color;
pub use config::{Config, ConfigError};
pub use light::{Light, LightMode, LIGHT_STEP};
pub use loader::{load_obj, load_obj_from_string, LoadError, LoadOptions, LoadResult};
pub use scene::{model_transform, RenderMode, Scene, DEFAULT_MODEL_SCALE};
pub use triangle::{compute_normals, face_normal, Material, Triangle};
