//! Whitted-style ray tracer.
//!
//! One primary ray per pixel, brute-force nearest-triangle search, a shadow
//! ray back from the light, and a bounded number of mirror bounces.
//!
//! Pixel colours are computed row by row in parallel with rayon and then
//! written to the canvas sequentially, so the output matches a serial pass.

use facet_core::{Color, Scene, Triangle};
use facet_math::{reflect, Camera, Mat3, Mat4, Ray, Vec3};
use rayon::prelude::*;

use crate::canvas::{draw_pixel, is_inside_canvas, Canvas};
use crate::lighting::apply_lighting;

/// Colour multiplier applied to every mirror bounce.
pub const MIRROR_ATTENUATION: f32 = 0.85;

/// Determinants below this mean the ray is parallel to the triangle plane.
const PARALLEL_EPSILON: f32 = 1e-10;

/// A ray/triangle hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// World-space hit point.
    pub point: Vec3,
    /// Distance `t` along the (unit) ray direction.
    pub distance: f32,
    /// Index of the hit triangle in the scene's list.
    pub triangle_index: usize,
    /// Edge coordinates of the hit: `point = v0 + u * e0 + v * e1`.
    pub u: f32,
    pub v: f32,
}

/// Result of a shadow query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightVisibility {
    Visible,
    /// Another surface lies between the light and the point.
    Occluded { occluder: Vec3 },
}

/// Generates primary rays for one camera pose.
///
/// Holds the inverse view-projection so it is computed once per frame.
#[derive(Debug, Clone, Copy)]
pub struct PrimaryRays {
    inverse_view_projection: Mat4,
    width: f32,
    height: f32,
}

impl PrimaryRays {
    pub fn new(camera: &Camera) -> Self {
        Self {
            inverse_view_projection: camera.view_projection().inverse(),
            width: camera.width() as f32,
            height: camera.height() as f32,
        }
    }

    /// Ray through canvas point `(x, y)`.
    ///
    /// The point is unprojected at NDC z = -1 and z = +1; the ray starts at
    /// the near point and heads towards the far point.
    pub fn ray(&self, x: f32, y: f32) -> Ray {
        let ndc_x = x * 2.0 / self.width - 1.0;
        let ndc_y = y * 2.0 / self.height - 1.0;

        let near = self
            .inverse_view_projection
            .project_point3(Vec3::new(ndc_x, ndc_y, -1.0));
        let far = self
            .inverse_view_projection
            .project_point3(Vec3::new(ndc_x, ndc_y, 1.0));

        Ray::towards(near, far)
    }
}

/// Ray from the camera through canvas point `(x, y)`.
pub fn primary_ray(camera: &Camera, x: f32, y: f32) -> Ray {
    PrimaryRays::new(camera).ray(x, y)
}

/// Intersect a ray with one triangle.
///
/// Solves `o - v0 = -t d + u e0 + v e1` by inverting `[-d, e0, e1]`.
fn intersect(triangle: &Triangle, ray: &Ray) -> Option<(f32, f32, f32)> {
    let [v0, v1, v2] = triangle.vertices;
    let e0 = v1 - v0;
    let e1 = v2 - v0;

    let matrix = Mat3::from_cols(-ray.direction, e0, e1);
    if matrix.determinant().abs() < PARALLEL_EPSILON {
        return None;
    }

    let solution = matrix.inverse() * (ray.origin - v0);
    let (t, u, v) = (solution.x, solution.y, solution.z);

    let valid = (0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v) && u + v <= 1.0 && t > 0.0;
    valid.then_some((t, u, v))
}

/// Nearest triangle hit by `ray`, skipping `excluded` if given.
pub fn find_closest_triangle(
    triangles: &[Triangle],
    ray: &Ray,
    excluded: Option<usize>,
) -> Option<Intersection> {
    let mut closest: Option<Intersection> = None;
    let mut closest_distance = f32::MAX;

    for (index, triangle) in triangles.iter().enumerate() {
        if excluded == Some(index) {
            continue;
        }
        let Some((t, u, v)) = intersect(triangle, ray) else {
            continue;
        };
        if t >= closest_distance {
            continue;
        }

        let [v0, v1, v2] = triangle.vertices;
        closest_distance = t;
        closest = Some(Intersection {
            point: v0 + u * (v1 - v0) + v * (v2 - v0),
            distance: t,
            triangle_index: index,
            u,
            v,
        });
    }

    closest
}

/// Trace from the light towards `hit`. The point is lit when the first
/// surface the light ray meets is the hit triangle itself, or nothing.
pub fn can_see_light(triangles: &[Triangle], light: Vec3, hit: &Intersection) -> LightVisibility {
    let ray = Ray::towards(light, hit.point);
    match find_closest_triangle(triangles, &ray, None) {
        Some(first) if first.triangle_index != hit.triangle_index => LightVisibility::Occluded {
            occluder: first.point,
        },
        _ => LightVisibility::Visible,
    }
}

/// Smooth normal at `point`: barycentric blend of the vertex normals,
/// normalized. Falls back to the unit face normal when the blend is
/// undefined.
pub fn point_normal(triangle: &Triangle, point: Vec3) -> Vec3 {
    let face = triangle.normal.normalize_or_zero();

    let [a, b, c] = triangle.vertices;
    let e0 = b - a;
    let e1 = c - a;
    let p = point - a;

    let d00 = e0.dot(e0);
    let d01 = e0.dot(e1);
    let d11 = e1.dot(e1);
    let d20 = p.dot(e0);
    let d21 = p.dot(e1);

    let denom = d00 * d11 - d01 * d01;
    if denom.abs() < PARALLEL_EPSILON {
        return face;
    }

    let w1 = (d11 * d20 - d01 * d21) / denom;
    let w2 = (d00 * d21 - d01 * d20) / denom;
    let w0 = 1.0 - w1 - w2;

    let [n0, n1, n2] = triangle.vertex_normals;
    (w0 * n0 + w1 * n1 + w2 * n2).try_normalize().unwrap_or(face)
}

/// Colour seen along `ray` at `hit`, following at most `depth` mirror
/// bounces.
pub fn shade(scene: &Scene, ray: &Ray, hit: &Intersection, depth: u32) -> Color {
    let triangle = &scene.triangles()[hit.triangle_index];

    if scene.mirror() && triangle.is_mirror() && depth > 0 {
        return shade_mirror(scene, ray, hit, triangle, depth);
    }

    let normal = point_normal(triangle, hit.point);
    apply_lighting(scene, hit, normal)
}

fn shade_mirror(scene: &Scene, ray: &Ray, hit: &Intersection, triangle: &Triangle, depth: u32) -> Color {
    let normal = triangle.normal.normalize_or_zero();
    let bounce = Ray::new(hit.point, reflect(ray.direction, normal));

    match find_closest_triangle(scene.triangles(), &bounce, Some(hit.triangle_index)) {
        Some(next) => shade(scene, &bounce, &next, depth - 1).scaled(MIRROR_ATTENUATION),
        // Escaped the scene
        None => Color::BLACK,
    }
}

/// Colour for one pixel, or `None` if its primary ray hits nothing.
fn trace_pixel(scene: &Scene, rays: &PrimaryRays, x: usize, y: usize) -> Option<Color> {
    let ray = rays.ray(x as f32, y as f32);
    let hit = find_closest_triangle(scene.triangles(), &ray, None)?;
    Some(shade(scene, &ray, &hit, scene.mirror_depth()))
}

/// Ray trace the whole viewport. Pixels whose ray escapes are left as they are.
pub fn draw(scene: &Scene, canvas: &mut dyn Canvas) {
    let width = scene.width();
    let height = scene.height();
    let rays = PrimaryRays::new(&scene.camera);

    let rows: Vec<Vec<Option<Color>>> = (0..height)
        .into_par_iter()
        .map(|y| (0..width).map(|x| trace_pixel(scene, &rays, x, y)).collect())
        .collect();

    let mut hits = 0usize;
    for (y, row) in rows.iter().enumerate() {
        for (x, color) in row.iter().enumerate() {
            let Some(color) = color else {
                continue;
            };
            let (px, py) = (x as f32, y as f32);
            if is_inside_canvas(canvas, px, py) {
                draw_pixel(canvas, px, py, *color);
                hits += 1;
            }
        }
    }

    log::debug!("Ray traced {}x{} ({} pixels hit)", width, height, hits);
}
