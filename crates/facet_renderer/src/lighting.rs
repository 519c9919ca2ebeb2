//! Flat and Phong shading for ray-traced hits.

use facet_core::{Color, LightMode, Scene};
use facet_math::{reflect, Vec3};

use crate::raytracer::{can_see_light, Intersection, LightVisibility};

/// Corner-to-corner distance of the unit room (`sqrt(12)`).
const ROOM_DIAGONAL: f32 = 3.464_101_6;
/// Light reach as a fraction of the room diagonal.
const PROXIMITY_RADIUS: f32 = 0.7 * ROOM_DIAGONAL;
const PROXIMITY_FALLOFF: f32 = 2.0;

const SPECULAR_INTENSITY: f32 = 0.5;
const SPECULAR_EXPONENT: i32 = 16;
/// Floor on the specular base so the power never sees a negative number.
const SPECULAR_FLOOR: f32 = 0.05;

/// Occluder distance over which soft shadows fade out.
const SOFT_SHADOW_SPREAD: f32 = 2.8;

/// Brightness falloff with distance from the light.
///
/// `(1 - n^2)^2 / (1 + 2 n^2)` with `n = distance / radius`, zero at and
/// beyond the radius.
pub fn proximity_intensity(distance: f32) -> f32 {
    let n = distance / PROXIMITY_RADIUS;
    if n >= 1.0 {
        return 0.0;
    }
    let n2 = n * n;
    (1.0 - n2).powi(2) / (1.0 + PROXIMITY_FALLOFF * n2)
}

/// Ambient multiplier for an occluded point; further occluders let more
/// ambient light through.
pub fn soft_shadow_factor(occluder_distance: f32) -> f32 {
    (occluder_distance / SOFT_SHADOW_SPREAD + 0.5).clamp(0.0, 1.0)
}

/// Shade a hit with the scene's light mode.
pub fn apply_lighting(scene: &Scene, hit: &Intersection, normal: Vec3) -> Color {
    let triangle = &scene.triangles()[hit.triangle_index];
    match scene.light.mode {
        LightMode::Flat => triangle.color,
        LightMode::Phong => phong(scene, hit, normal),
    }
}

fn phong(scene: &Scene, hit: &Intersection, normal: Vec3) -> Color {
    let light = &scene.light;
    let diffuse = scene.triangles()[hit.triangle_index].color.to_vec3();

    let proximity = proximity_intensity(light.position.distance(hit.point));
    let light_dir = (light.position - hit.point).normalize_or_zero();

    let mut incidence = normal.dot(light_dir).max(0.0);
    let mut specular = if incidence > 0.0 {
        let reflected = reflect(-light_dir, normal);
        let view_dir = (scene.camera.position() - hit.point).normalize_or_zero();
        reflected.dot(view_dir).max(SPECULAR_FLOOR).powi(SPECULAR_EXPONENT) * SPECULAR_INTENSITY
    } else {
        0.0
    };

    let mut shadow = 1.0;
    if let LightVisibility::Occluded { occluder } = can_see_light(scene.triangles(), light.position, hit) {
        if light.soft_shadows {
            shadow = soft_shadow_factor(occluder.distance(hit.point));
        }
        incidence = 0.0;
        specular = 0.0;
    }

    let color = diffuse * proximity * incidence
        + light.color * proximity * specular
        + diffuse * light.ambient_intensity * shadow;

    Color::from_vec3_saturating(color)
}
