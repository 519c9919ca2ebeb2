//! Facet Renderer - software rendering of triangle scenes.
//!
//! Three interchangeable strategies share one camera and triangle list:
//!
//! - **Wireframe**: projected triangle edges, no depth test
//! - **Rasterized**: flat-coloured triangles with a depth buffer
//! - **Ray traced**: Phong shading, hard or soft shadows, mirror bounces
//!
//! # Example
//!
//! ```ignore
//! use facet_renderer::{draw, FrameBuffer};
//!
//! let mut frame = FrameBuffer::new(scene.width(), scene.height());
//! draw(&mut scene, &mut frame);
//! frame.save("frame.png")?;
//! ```

pub mod canvas;
pub mod lighting;
pub mod raster;
pub mod raytracer;

use std::time::Instant;

use facet_core::{RenderMode, Scene};

// Re-export commonly used types
pub use canvas::{draw_pixel, is_inside_canvas, Canvas, FrameBuffer};
pub use lighting::{apply_lighting, proximity_intensity, soft_shadow_factor};
pub use raster::{draw_filled, draw_stroked, world_to_canvas, CanvasPoint};
pub use raytracer::{
    can_see_light, find_closest_triangle, point_normal, primary_ray, shade, Intersection,
    LightVisibility, MIRROR_ATTENUATION,
};

/// Render one frame of `scene` into `canvas` using the scene's render mode.
///
/// The canvas is cleared first. Rasterized frames also reset and fill the
/// camera's depth buffer.
pub fn draw(scene: &mut Scene, canvas: &mut dyn Canvas) {
    let start = Instant::now();
    canvas.clear();

    let mode = scene.render_mode();
    match mode {
        RenderMode::Wireframe => draw_stroked(&scene.camera, scene.triangles(), canvas),
        RenderMode::Rasterized => {
            let (camera, triangles) = scene.camera_and_triangles();
            draw_filled(camera, triangles, canvas);
        }
        RenderMode::RayTraced => raytracer::draw(scene, canvas),
    }

    log::debug!("Drew {} frame in {:.2?}", mode, start.elapsed());
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_core::{Color, Light, Triangle};
    use facet_math::{Camera, Mat4, Vec3};

    fn scene(mode: RenderMode) -> Scene {
        let triangle = Triangle::new(
            [
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            Color::new(0, 200, 0),
        );
        Scene::new(
            Camera::new(24, 24, Vec3::new(0.0, 0.0, 4.0)),
            Light::new(Vec3::new(0.0, 0.0, 1.0)),
            vec![triangle],
            Mat4::IDENTITY,
        )
        .with_render_mode(mode)
    }

    #[test]
    fn test_draw_dispatches_on_mode() {
        let mut canvas = FrameBuffer::new(24, 24);

        let mut wireframe = scene(RenderMode::Wireframe);
        draw(&mut wireframe, &mut canvas);
        assert_eq!(canvas.get_pixel(12, 12), Color::BLACK.to_argb());
        assert!(canvas.pixels().contains(&Color::WHITE.to_argb()));

        let mut rasterized = scene(RenderMode::Rasterized);
        draw(&mut rasterized, &mut canvas);
        assert_eq!(canvas.get_pixel(12, 12), Color::new(0, 200, 0).to_argb());
        assert!(!canvas.pixels().contains(&Color::WHITE.to_argb()));
        assert!(rasterized.camera.depth_at(12, 12) > 0.0);

        let mut ray_traced = scene(RenderMode::RayTraced);
        draw(&mut ray_traced, &mut canvas);
        let center = Color::from_argb(canvas.get_pixel(12, 12));
        // Green face plus a white specular highlight
        assert!(center.g > center.r);
        assert_eq!(center.r, center.b);
    }

    #[test]
    fn test_draw_clears_previous_frame() {
        let mut canvas = FrameBuffer::new(24, 24);
        canvas.set_pixel(0, 0, 0xFFFF_FFFF);

        let mut scene = scene(RenderMode::RayTraced);
        draw(&mut scene, &mut canvas);

        assert_eq!(canvas.get_pixel(0, 0), Color::BLACK.to_argb());
    }
}
