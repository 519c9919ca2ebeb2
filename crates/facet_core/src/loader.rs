//! OBJ/MTL loading.
//!
//! Models are read with `tobj`, triangulated, and flattened into a list of
//! [`Triangle`]s in model space. Each triangle takes the diffuse colour of
//! its material; materials with illumination model 3 (or listed by name in
//! [`LoadOptions::mirror_materials`]) are tagged [`Material::Mirror`].

use std::io::Cursor;
use std::path::Path;

use facet_math::Vec3;
use thiserror::Error;

use crate::color::Color;
use crate::triangle::{Material, Triangle};

/// MTL illumination model meaning "colour on, ray-traced reflection on".
const ILLUM_REFLECTION: u8 = 3;

/// Errors that can occur while loading a model.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("OBJ error: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("Material library error: {0}")]
    Materials(tobj::LoadError),

    #[error("Model '{model}' references unknown material {index}")]
    UnknownMaterial { model: String, index: usize },

    #[error("Model '{model}' references vertex {index} but has only {count}")]
    InvalidIndex {
        model: String,
        index: usize,
        count: usize,
    },

    #[error("No triangles found in model")]
    NoGeometry,
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Options that control how materials are interpreted.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Material names that are always treated as mirrors.
    pub mirror_materials: Vec<String>,
}

/// Load an OBJ file and its material library.
pub fn load_obj<P: AsRef<Path>>(path: P, options: &LoadOptions) -> LoadResult<Vec<Triangle>> {
    let path = path.as_ref();
    log::info!("Loading OBJ: {}", path.display());

    let (models, materials) = tobj::load_obj(path, &obj_options())?;
    build_triangles(models, materials, options)
}

/// Load an OBJ model from a string. `mtl` is used for any `mtllib` line.
pub fn load_obj_from_string(obj: &str, mtl: &str, options: &LoadOptions) -> LoadResult<Vec<Triangle>> {
    let mut reader = Cursor::new(obj.as_bytes());
    let (models, materials) = tobj::load_obj_buf(&mut reader, &obj_options(), |_| {
        tobj::load_mtl_buf(&mut Cursor::new(mtl.as_bytes()))
    })?;
    build_triangles(models, materials, options)
}

fn obj_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Colour and surface tag for one MTL material.
fn resolve_material(material: &tobj::Material, options: &LoadOptions) -> (Color, Material) {
    let color = match material.diffuse {
        Some(kd) => Color::from_unit_rgb(kd),
        None => {
            log::warn!("Material '{}' has no diffuse colour, using grey", material.name);
            Color::GREY
        }
    };

    let mirror = material.illumination_model == Some(ILLUM_REFLECTION)
        || options.mirror_materials.iter().any(|name| *name == material.name);

    let tag = if mirror {
        Material::Mirror
    } else {
        Material::Diffuse
    };
    (color, tag)
}

fn build_triangles(
    models: Vec<tobj::Model>,
    materials: Result<Vec<tobj::Material>, tobj::LoadError>,
    options: &LoadOptions,
) -> LoadResult<Vec<Triangle>> {
    let materials = match materials {
        Ok(materials) => materials,
        Err(err) if models.iter().any(|m| m.mesh.material_id.is_some()) => {
            return Err(LoadError::Materials(err));
        }
        Err(err) => {
            log::warn!("Ignoring material library: {}", err);
            Vec::new()
        }
    };

    let resolved: Vec<(Color, Material)> = materials
        .iter()
        .map(|material| resolve_material(material, options))
        .collect();

    let mut triangles = Vec::new();

    for model in &models {
        let mesh = &model.mesh;

        let (color, material) = match mesh.material_id {
            Some(index) => *resolved.get(index).ok_or_else(|| LoadError::UnknownMaterial {
                model: model.name.clone(),
                index,
            })?,
            None => {
                log::warn!("Model '{}' has no material, using grey", model.name);
                (Color::GREY, Material::Diffuse)
            }
        };

        let count = mesh.positions.len() / 3;
        let vertex = |index: u32| -> LoadResult<Vec3> {
            let i = index as usize;
            if i >= count {
                return Err(LoadError::InvalidIndex {
                    model: model.name.clone(),
                    index: i,
                    count,
                });
            }
            Ok(Vec3::new(
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            ))
        };

        for face in mesh.indices.chunks_exact(3) {
            let vertices = [vertex(face[0])?, vertex(face[1])?, vertex(face[2])?];
            triangles.push(Triangle::new(vertices, color).with_material(material));
        }

        log::debug!(
            "Model '{}': {} triangles",
            model.name,
            mesh.indices.len() / 3
        );
    }

    if triangles.is_empty() {
        return Err(LoadError::NoGeometry);
    }

    log::info!(
        "Loaded {} triangles from {} models ({} materials)",
        triangles.len(),
        models.len(),
        materials.len()
    );

    Ok(triangles)
}
