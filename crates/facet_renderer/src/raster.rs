//! Wireframe and depth-buffered rasterization.
//!
//! Triangles are projected to canvas space with [`world_to_canvas`]. The
//! filled rasterizer walks each triangle's bounding box, rejects pixels with
//! a negative barycentric weight, and keeps a pixel when its interpolated
//! inverse depth is at least the value already in the camera's depth buffer.

use facet_core::{Color, Triangle};
use facet_math::{Camera, Vec3, FAR_PLANE, NEAR_PLANE};

use crate::canvas::{draw_pixel, is_inside_canvas, Canvas};

/// Colour used for wireframe edges.
pub const WIREFRAME_COLOR: Color = Color::WHITE;

/// Denominators below this are treated as a degenerate (zero-area) triangle.
const DEGENERATE_EPSILON: f32 = 1e-10;

/// A projected vertex: canvas position plus depth remapped into `[near, far]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

impl CanvasPoint {
    pub fn new(x: f32, y: f32, depth: f32) -> Self {
        Self { x, y, depth }
    }
}

/// Project a world-space point to canvas space.
///
/// `clip = VP * (p, 1)`, perspective divide, then NDC x/y map to
/// `[0, width] x [0, height]` and NDC z maps to `[near, far]`.
pub fn world_to_canvas(camera: &Camera, vertex: Vec3) -> CanvasPoint {
    let clip = camera.view_projection() * vertex.extend(1.0);
    let ndc = clip.truncate() / clip.w;

    let half_width = camera.width() as f32 / 2.0;
    let half_height = camera.height() as f32 / 2.0;

    CanvasPoint {
        x: half_width * (ndc.x + 1.0),
        y: half_height * (ndc.y + 1.0),
        depth: ndc.z * (FAR_PLANE - NEAR_PLANE) / 2.0 + (FAR_PLANE + NEAR_PLANE) / 2.0,
    }
}

/// Project all three vertices of a triangle.
pub fn project_triangle(camera: &Camera, triangle: &Triangle) -> [CanvasPoint; 3] {
    triangle.vertices.map(|vertex| world_to_canvas(camera, vertex))
}

/// 2D barycentric weights of `(x, y)` with respect to a projected triangle.
///
/// Returns `None` for a degenerate triangle. Weights may be negative; a
/// point is inside when all three are non-negative.
pub fn barycentric(triangle: &[CanvasPoint; 3], x: f32, y: f32) -> Option<[f32; 3]> {
    let [v0, v1, v2] = triangle;
    let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);
    if denom.abs() < DEGENERATE_EPSILON {
        return None;
    }

    let w0 = ((v1.y - v2.y) * (x - v2.x) + (v2.x - v1.x) * (y - v2.y)) / denom;
    let w1 = ((v2.y - v0.y) * (x - v2.x) + (v0.x - v2.x) * (y - v2.y)) / denom;
    let w2 = 1.0 - w0 - w1;
    Some([w0, w1, w2])
}

/// Interpolated inverse depth `w0/d0 + w1/d1 + w2/d2` at `(x, y)`.
///
/// `None` when the point is outside the triangle, the triangle is
/// degenerate, or the result is not a positive finite value (a vertex
/// behind the camera).
pub fn inverse_depth(triangle: &[CanvasPoint; 3], x: f32, y: f32) -> Option<f32> {
    let weights = barycentric(triangle, x, y)?;
    if weights.iter().any(|&w| w < 0.0) {
        return None;
    }

    let inverse: f32 = weights
        .iter()
        .zip(triangle)
        .map(|(w, point)| w / point.depth)
        .sum();

    (inverse.is_finite() && inverse > 0.0).then_some(inverse)
}

/// Inclusive integer pixel bounds `(min_x, max_x, min_y, max_y)` of a
/// projected triangle, clamped to the canvas.
///
/// Returns `None` when the box misses the canvas entirely.
pub fn bounding_box(
    triangle: &[CanvasPoint; 3],
    width: usize,
    height: usize,
) -> Option<(usize, usize, usize, usize)> {
    if width == 0 || height == 0 {
        return None;
    }

    let min_x = triangle.iter().map(|p| p.x).fold(f32::INFINITY, f32::min).floor();
    let max_x = triangle.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max).ceil();
    let min_y = triangle.iter().map(|p| p.y).fold(f32::INFINITY, f32::min).floor();
    let max_y = triangle.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max).ceil();

    if max_x < 0.0 || max_y < 0.0 || min_x >= width as f32 || min_y >= height as f32 {
        return None;
    }

    // Float-to-int casts saturate, so huge projected coordinates stay bounded
    let clamp = |v: f32, limit: usize| (v.max(0.0) as usize).min(limit - 1);
    Some((
        clamp(min_x, width),
        clamp(max_x, width),
        clamp(min_y, height),
        clamp(max_y, height),
    ))
}

/// Fill one projected triangle with a flat colour, depth-testing against
/// the camera's buffer.
pub fn draw_filled_triangle(
    camera: &mut Camera,
    canvas: &mut dyn Canvas,
    triangle: &[CanvasPoint; 3],
    color: Color,
) {
    let width = camera.width().min(canvas.width());
    let height = camera.height().min(canvas.height());
    let Some((min_x, max_x, min_y, max_y)) = bounding_box(triangle, width, height) else {
        return;
    };

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let (px, py) = (x as f32, y as f32);
            let Some(inverse) = inverse_depth(triangle, px, py) else {
                continue;
            };
            if !is_inside_canvas(canvas, px, py) {
                continue;
            }
            if inverse < camera.depth_at(x, y) {
                continue;
            }
            draw_pixel(canvas, px, py, color);
            camera.set_depth(x, y, inverse);
        }
    }
}

/// Rasterize every triangle in submission order with depth testing.
///
/// The depth buffer is reset first.
pub fn draw_filled(camera: &mut Camera, triangles: &[Triangle], canvas: &mut dyn Canvas) {
    camera.reset_depth_buffer();
    for triangle in triangles {
        let projected = project_triangle(camera, triangle);
        draw_filled_triangle(camera, canvas, &projected, triangle.color);
    }
}

/// Range of step indices `t` for which `origin + step * t` lies in `[0, limit)`.
///
/// The bounds are approximate; callers still test each step.
fn visible_steps(origin: f64, step: f64, limit: f64) -> Option<(f64, f64)> {
    if step == 0.0 {
        return (origin >= 0.0 && origin < limit).then_some((f64::NEG_INFINITY, f64::INFINITY));
    }
    let (a, b) = ((0.0 - origin) / step, (limit - origin) / step);
    Some((a.min(b), a.max(b)))
}

/// Walk from `from` towards `to` in `max(|dx|, |dy|)` uniform steps,
/// writing every step that lands on the canvas. The end point itself is
/// not written.
///
/// Only the steps overlapping the canvas are visited, so endpoints projected
/// far off screen cost no more than an on-screen line.
pub fn draw_line(canvas: &mut dyn Canvas, from: CanvasPoint, to: CanvasPoint, color: Color) {
    let (x0, y0) = (from.x as f64, from.y as f64);
    let dx = to.x as f64 - x0;
    let dy = to.y as f64 - y0;
    let steps = dx.abs().max(dy.abs());
    if !steps.is_finite() || steps <= 0.0 {
        return;
    }

    let step_x = dx / steps;
    let step_y = dy / steps;

    let Some((x_lo, x_hi)) = visible_steps(x0, step_x, canvas.width() as f64) else {
        return;
    };
    let Some((y_lo, y_hi)) = visible_steps(y0, step_y, canvas.height() as f64) else {
        return;
    };
    let (lo, hi) = (x_lo.max(y_lo), x_hi.min(y_hi));
    if lo > hi + 1.0 {
        return;
    }

    // Indices with `i < steps`, one step of slack on each side; float-to-int casts saturate
    let count = steps.ceil() as u64;
    let first = (lo - 1.0).max(0.0).floor() as u64;
    let last = (hi.min(steps).ceil() as u64).saturating_add(1).min(count);

    for i in first..last {
        let x = (x0 + step_x * i as f64) as f32;
        let y = (y0 + step_y * i as f64) as f32;
        if is_inside_canvas(canvas, x, y) {
            draw_pixel(canvas, x, y, color);
        }
    }
}

/// Draw the three edges of every triangle, without depth testing.
pub fn draw_stroked(camera: &Camera, triangles: &[Triangle], canvas: &mut dyn Canvas) {
    for triangle in triangles {
        let [v0, v1, v2] = project_triangle(camera, triangle);
        draw_line(canvas, v0, v1, WIREFRAME_COLOR);
        draw_line(canvas, v1, v2, WIREFRAME_COLOR);
        draw_line(canvas, v2, v0, WIREFRAME_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::FrameBuffer;

    fn point_depth(triangle: &[CanvasPoint; 3], x: f32, y: f32) -> Option<f32> {
        inverse_depth(triangle, x, y).map(|inverse| 1.0 / inverse)
    }

    fn flat_triangle(z: f32, color: Color) -> Triangle {
        Triangle::new(
            [
                Vec3::new(-1.0, -1.0, z),
                Vec3::new(1.0, -1.0, z),
                Vec3::new(0.0, 1.0, z),
            ],
            color,
        )
    }

    fn screen_triangle() -> [CanvasPoint; 3] {
        [
            CanvasPoint::new(0.0, 0.0, 2.0),
            CanvasPoint::new(10.0, 0.0, 4.0),
            CanvasPoint::new(0.0, 10.0, 8.0),
        ]
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = Camera::new(64, 48, Vec3::new(0.0, 0.0, 4.0));
        let point = world_to_canvas(&camera, Vec3::ZERO);

        assert!((point.x - 32.0).abs() < 1e-3);
        assert!((point.y - 24.0).abs() < 1e-3);
        // Perspective depth remapped into [near, far]: (f + n) - f*n/d at d = 4
        let expected = (FAR_PLANE + NEAR_PLANE) - FAR_PLANE * NEAR_PLANE / 4.0;
        assert!((point.depth - expected).abs() < 1e-2);
    }

    #[test]
    fn test_canvas_rows_grow_downward() {
        let camera = Camera::new(64, 64, Vec3::new(0.0, 0.0, 4.0));
        let above = world_to_canvas(&camera, Vec3::new(0.0, 0.5, 0.0));
        let right = world_to_canvas(&camera, Vec3::new(0.5, 0.0, 0.0));

        assert!(above.y < 32.0);
        assert!(right.x > 32.0);
    }

    #[test]
    fn test_barycentric_partition_of_unity() {
        let triangle = screen_triangle();
        for &(x, y) in &[(1.0, 1.0), (3.0, 2.0), (2.0, 6.5), (4.9, 4.9)] {
            let weights = barycentric(&triangle, x, y).unwrap();
            let sum: f32 = weights.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5);
            assert!(weights.iter().all(|&w| w >= 0.0));
        }
    }

    #[test]
    fn test_barycentric_outside_has_negative_weight() {
        let triangle = screen_triangle();
        for &(x, y) in &[(-1.0, 1.0), (8.0, 8.0), (3.0, -0.5)] {
            let weights = barycentric(&triangle, x, y).unwrap();
            assert!(weights.iter().any(|&w| w < 0.0));
            assert_eq!(inverse_depth(&triangle, x, y), None);
        }
    }

    #[test]
    fn test_barycentric_degenerate_triangle() {
        let collinear = [
            CanvasPoint::new(0.0, 0.0, 1.0),
            CanvasPoint::new(5.0, 5.0, 1.0),
            CanvasPoint::new(10.0, 10.0, 1.0),
        ];
        assert_eq!(barycentric(&collinear, 5.0, 5.0), None);
        assert_eq!(point_depth(&collinear, 5.0, 5.0), None);
    }

    #[test]
    fn test_point_depth_at_vertices() {
        let triangle = screen_triangle();
        assert!((point_depth(&triangle, 0.0, 0.0).unwrap() - 2.0).abs() < 1e-4);
        assert!((point_depth(&triangle, 10.0, 0.0).unwrap() - 4.0).abs() < 1e-4);
        assert!((point_depth(&triangle, 0.0, 10.0).unwrap() - 8.0).abs() < 1e-4);

        // Midpoint of the first edge: 1 / (0.5/2 + 0.5/4)
        let mid = point_depth(&triangle, 5.0, 0.0).unwrap();
        assert!((mid - 1.0 / 0.375).abs() < 1e-4);
    }

    #[test]
    fn test_bounding_box_inclusive_and_clamped() {
        let triangle = [
            CanvasPoint::new(1.5, 2.2, 1.0),
            CanvasPoint::new(4.1, 2.0, 1.0),
            CanvasPoint::new(2.0, 5.9, 1.0),
        ];
        assert_eq!(bounding_box(&triangle, 100, 100), Some((1, 5, 2, 6)));
        assert_eq!(bounding_box(&triangle, 4, 4), Some((1, 3, 2, 3)));

        let offscreen = [
            CanvasPoint::new(-10.0, -10.0, 1.0),
            CanvasPoint::new(-5.0, -10.0, 1.0),
            CanvasPoint::new(-5.0, -5.0, 1.0),
        ];
        assert_eq!(bounding_box(&offscreen, 100, 100), None);
    }

    #[test]
    fn test_draw_filled_covers_center() {
        let mut camera = Camera::new(32, 32, Vec3::new(0.0, 0.0, 4.0));
        let mut canvas = FrameBuffer::new(32, 32);
        let red = Color::new(255, 0, 0);

        draw_filled(&mut camera, &[flat_triangle(0.0, red)], &mut canvas);

        assert_eq!(canvas.get_pixel(16, 16), red.to_argb());
        assert_eq!(canvas.get_pixel(0, 0), Color::BLACK.to_argb());
        assert!(camera.depth_at(16, 16) > 0.0);
        assert_eq!(camera.depth_at(0, 0), 0.0);
    }

    #[test]
    fn test_depth_test_is_order_independent() {
        let near = flat_triangle(0.5, Color::new(255, 0, 0));
        let far = flat_triangle(-0.5, Color::new(0, 255, 0));

        let render = |triangles: &[Triangle]| {
            let mut camera = Camera::new(32, 32, Vec3::new(0.0, 0.0, 4.0));
            let mut canvas = FrameBuffer::new(32, 32);
            draw_filled(&mut camera, triangles, &mut canvas);
            canvas
        };

        let near_first = render(&[near.clone(), far.clone()]);
        let far_first = render(&[far, near]);

        assert_eq!(near_first.get_pixel(16, 16), Color::new(255, 0, 0).to_argb());
        assert_eq!(near_first, far_first);
    }

    #[test]
    fn test_equal_depth_later_triangle_wins() {
        let mut camera = Camera::new(32, 32, Vec3::new(0.0, 0.0, 4.0));
        let mut canvas = FrameBuffer::new(32, 32);
        let first = flat_triangle(0.0, Color::new(255, 0, 0));
        let second = flat_triangle(0.0, Color::new(0, 0, 255));

        draw_filled(&mut camera, &[first, second], &mut canvas);

        assert_eq!(canvas.get_pixel(16, 16), Color::new(0, 0, 255).to_argb());
    }

    #[test]
    fn test_draw_line_excludes_end_point() {
        let mut canvas = FrameBuffer::new(8, 4);
        draw_line(
            &mut canvas,
            CanvasPoint::new(1.0, 1.0, 0.0),
            CanvasPoint::new(5.0, 1.0, 0.0),
            Color::WHITE,
        );

        for x in 1..5 {
            assert_eq!(canvas.get_pixel(x, 1), Color::WHITE.to_argb());
        }
        assert_eq!(canvas.get_pixel(5, 1), Color::BLACK.to_argb());
        assert_eq!(canvas.get_pixel(0, 1), Color::BLACK.to_argb());
    }

    #[test]
    fn test_draw_line_skips_offscreen_steps() {
        let mut canvas = FrameBuffer::new(4, 4);
        draw_line(
            &mut canvas,
            CanvasPoint::new(-2.0, 2.0, 0.0),
            CanvasPoint::new(10.0, 2.0, 0.0),
            Color::WHITE,
        );

        for x in 0..4 {
            assert_eq!(canvas.get_pixel(x, 2), Color::WHITE.to_argb());
        }
        assert_eq!(canvas.get_pixel(0, 1), Color::BLACK.to_argb());
    }

    #[test]
    fn test_draw_stroked_outlines_only() {
        let camera = Camera::new(32, 32, Vec3::new(0.0, 0.0, 4.0));
        let mut canvas = FrameBuffer::new(32, 32);

        draw_stroked(&camera, &[flat_triangle(0.0, Color::new(255, 0, 0))], &mut canvas);

        let white = Color::WHITE.to_argb();
        assert!(canvas.pixels().iter().any(|&p| p == white));
        // Interior stays untouched and no face colour is used
        assert_eq!(canvas.get_pixel(16, 18), Color::BLACK.to_argb());
        assert!(canvas.pixels().iter().all(|&p| p == white || p == Color::BLACK.to_argb()));
    }

    #[test]
    fn test_draw_line_far_endpoints_are_clipped() {
        let mut canvas = FrameBuffer::new(4, 4);
        // Far beyond the range where an f32 counter can still advance
        draw_line(
            &mut canvas,
            CanvasPoint::new(-1.0e9, 2.0, 0.0),
            CanvasPoint::new(1.0e9, 2.0, 0.0),
            Color::WHITE,
        );

        for x in 0..4 {
            assert_eq!(canvas.get_pixel(x, 2), Color::WHITE.to_argb());
            assert_eq!(canvas.get_pixel(x, 1), Color::BLACK.to_argb());
        }
    }

    #[test]
    fn test_draw_line_missing_canvas_draws_nothing() {
        let mut canvas = FrameBuffer::new(4, 4);
        draw_line(
            &mut canvas,
            CanvasPoint::new(-5.0e8, -3.0, 0.0),
            CanvasPoint::new(5.0e8, -3.0, 0.0),
            Color::WHITE,
        );
        draw_line(
            &mut canvas,
            CanvasPoint::new(10.0, -5.0e8, 0.0),
            CanvasPoint::new(10.0, 5.0e8, 0.0),
            Color::WHITE,
        );

        assert!(canvas.pixels().iter().all(|&p| p == Color::BLACK.to_argb()));
    }

    #[test]
    fn test_draw_line_clipped_diagonal_matches_full_walk() {
        let mut canvas = FrameBuffer::new(8, 8);
        draw_line(
            &mut canvas,
            CanvasPoint::new(-3.0, -3.0, 0.0),
            CanvasPoint::new(12.0, 12.0, 0.0),
            Color::WHITE,
        );

        for i in 0..8 {
            assert_eq!(canvas.get_pixel(i, i), Color::WHITE.to_argb());
        }
        assert_eq!(canvas.get_pixel(1, 0), Color::BLACK.to_argb());
    }

    #[test]
    fn test_draw_stroked_vertex_near_camera_plane_finishes() {
        let camera = Camera::new(64, 64, Vec3::new(0.0, 0.0, 4.0));
        let mut canvas = FrameBuffer::new(64, 64);
        let triangle = Triangle::new(
            [
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(1.0, 0.0, 3.999_999_5),
            ],
            Color::WHITE,
        );

        let projected = world_to_canvas(&camera, triangle.vertices[2]);
        assert!(projected.x.abs() > 1.0e7);

        draw_stroked(&camera, &[triangle], &mut canvas);

        // The on-screen edge between the first two vertices is still drawn
        assert!(canvas.pixels().contains(&Color::WHITE.to_argb()));
    }
}
