//! Triangle primitive and normal computation.

use std::collections::HashMap;

use facet_math::{Mat4, Vec3};

use crate::Color;

/// Surface response tag carried by every triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Material {
    #[default]
    Diffuse,
    /// Reflects the view ray when mirror mode is enabled.
    Mirror,
}

/// A world-space triangle with a flat colour and precomputed normals.
///
/// Normals are unnormalized: the face normal is `(v1 - v0) x (v2 - v0)` and
/// each vertex normal is a sum of face normals (see [`compute_normals`]).
/// Shading code normalizes them when it needs unit vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
    pub color: Color,
    pub material: Material,
    pub normal: Vec3,
    pub vertex_normals: [Vec3; 3],
}

impl Triangle {
    /// Create a diffuse triangle. Vertex normals start equal to the face normal.
    pub fn new(vertices: [Vec3; 3], color: Color) -> Self {
        let normal = face_normal(&vertices);
        Self {
            vertices,
            color,
            material: Material::Diffuse,
            normal,
            vertex_normals: [normal; 3],
        }
    }

    /// Builder-style material override.
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn is_mirror(&self) -> bool {
        self.material == Material::Mirror
    }

    /// Transform the vertices by `matrix` and recompute the face normal.
    ///
    /// Vertex normals are reset to the face normal; call
    /// [`compute_normals`] on the whole list afterwards to smooth them.
    pub fn transform(&mut self, matrix: &Mat4) {
        for vertex in &mut self.vertices {
            *vertex = matrix.transform_point3(*vertex);
        }
        self.normal = face_normal(&self.vertices);
        self.vertex_normals = [self.normal; 3];
    }
}

/// Unnormalized face normal `(v1 - v0) x (v2 - v0)`.
#[inline]
pub fn face_normal(vertices: &[Vec3; 3]) -> Vec3 {
    (vertices[1] - vertices[0]).cross(vertices[2] - vertices[0])
}

/// Exact-position hash key. Adding `0.0` folds `-0.0` into `+0.0`.
fn position_key(position: Vec3) -> [u32; 3] {
    [
        (position.x + 0.0).to_bits(),
        (position.y + 0.0).to_bits(),
        (position.z + 0.0).to_bits(),
    ]
}

/// Recompute face normals, then set every vertex normal to the sum of the
/// face normals of all triangles that have a vertex at exactly the same
/// position. The sums are left unnormalized.
///
/// Positions are matched bitwise, so near-duplicate vertices do not share
/// normals.
pub fn compute_normals(triangles: &mut [Triangle]) {
    let mut sums: HashMap<[u32; 3], Vec3> = HashMap::with_capacity(triangles.len() * 3);

    for triangle in triangles.iter_mut() {
        triangle.normal = face_normal(&triangle.vertices);

        let keys = triangle.vertices.map(position_key);
        for (i, key) in keys.iter().enumerate() {
            // A triangle contributes once per distinct position
            if keys[..i].contains(key) {
                continue;
            }
            *sums.entry(*key).or_insert(Vec3::ZERO) += triangle.normal;
        }
    }

    for triangle in triangles.iter_mut() {
        for (vertex_normal, vertex) in triangle.vertex_normals.iter_mut().zip(triangle.vertices) {
            *vertex_normal = sums
                .get(&position_key(vertex))
                .copied()
                .unwrap_or(triangle.normal);
        }
    }

    log::debug!(
        "Computed normals for {} triangles ({} shared positions)",
        triangles.len(),
        sums.len()
    );
}
