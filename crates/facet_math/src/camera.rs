use crate::{Axis, Mat4, Vec3, Vec4};

/// Distance to the near clipping plane.
pub const NEAR_PLANE: f32 = 0.1;
/// Distance to the far clipping plane.
pub const FAR_PLANE: f32 = 100.0;

const FOV_Y_DEGREES: f32 = 45.0;
const TRANSLATE_STEP: f32 = 0.03;
const ROTATE_STEP_DEGREES: f32 = 3.0;

/// Camera with a rigid pose, a fixed perspective projection and a depth buffer.
///
/// The pose is a column-major matrix whose columns are the camera's right, up,
/// forward and position vectors in world space. The camera looks down its
/// negative forward axis. Everything else (view, view-projection, position)
/// is derived from the pose after each mutation.
#[derive(Debug, Clone)]
pub struct Camera {
    width: usize,
    height: usize,
    pose: Mat4,
    projection: Mat4,
    view_projection: Mat4,
    position: Vec3,
    /// Inverse depth per pixel, row-major. Larger values are closer.
    depth_buffer: Vec<f32>,
}

impl Camera {
    /// Create a camera for a `width` x `height` viewport, placed at `position`
    /// and facing the world origin.
    pub fn new(width: usize, height: usize, position: Vec3) -> Self {
        let mut camera = Self {
            width,
            height,
            pose: Mat4::from_translation(position),
            projection: projection_matrix(width, height),
            view_projection: Mat4::IDENTITY,
            position,
            depth_buffer: vec![0.0; width * height],
        };
        camera.update_view_projection();
        camera.look_at(Vec3::ZERO);
        camera
    }

    /// Move the camera one fixed step along a world axis.
    pub fn translate(&mut self, axis: Axis, sign: f32) {
        let offset = axis.unit() * (TRANSLATE_STEP * sign);
        self.pose = Mat4::from_translation(offset) * self.pose;
        self.update_view_projection();
    }

    /// Orbit the camera one fixed angular step about a world axis through the origin.
    ///
    /// A positive sign turns clockwise when looking down the positive axis.
    /// Rotation about `Axis::Z` is not supported and leaves the camera untouched.
    pub fn rotate(&mut self, axis: Axis, sign: f32) {
        let angle = (ROTATE_STEP_DEGREES * sign).to_radians();
        let rotation = match axis {
            Axis::X => Mat4::from_rotation_x(-angle),
            Axis::Y => Mat4::from_rotation_y(-angle),
            Axis::Z => return,
        };
        self.pose = rotation * self.pose;
        self.update_view_projection();
    }

    /// Rebuild the orientation so the camera faces `target`, keeping its position.
    ///
    /// If `target` is the camera position the pose is left as it is. If the
    /// viewing direction is parallel to world up, world Z stands in as the
    /// reference up vector.
    pub fn look_at(&mut self, target: Vec3) {
        let offset = self.position - target;
        if offset.length_squared() <= f32::EPSILON * f32::EPSILON {
            log::warn!("look_at target {} coincides with the camera position, ignoring", target);
            return;
        }

        let forward = offset.normalize();
        let mut right = Vec3::Y.cross(forward);
        if right.length_squared() <= 1e-12 {
            log::debug!("look_at direction is parallel to world up, using world Z as reference");
            right = Vec3::Z.cross(forward);
        }
        let right = right.normalize();
        let up = forward.cross(right);

        self.pose = Mat4::from_cols(
            right.extend(0.0),
            up.extend(0.0),
            forward.extend(0.0),
            self.position.extend(1.0),
        );
        self.update_view_projection();
    }

    /// Zero the depth buffer, sized to the current viewport.
    pub fn reset_depth_buffer(&mut self) {
        self.depth_buffer.clear();
        self.depth_buffer.resize(self.width * self.height, 0.0);
    }

    /// Change the viewport size. Rebuilds the projection and the depth buffer.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.projection = projection_matrix(width, height);
        self.update_view_projection();
        self.reset_depth_buffer();
    }

    /// Stored depth value at pixel (x, y).
    #[inline]
    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.depth_buffer[y * self.width + x]
    }

    /// Overwrite the stored depth value at pixel (x, y).
    #[inline]
    pub fn set_depth(&mut self, x: usize, y: usize, value: f32) {
        self.depth_buffer[y * self.width + x] = value;
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// World-space camera position (translation column of the pose).
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn pose(&self) -> Mat4 {
        self.pose
    }

    /// Combined projection * view matrix (world -> clip space).
    pub fn view_projection(&self) -> Mat4 {
        self.view_projection
    }

    fn update_view_projection(&mut self) {
        let view = self.pose.inverse();
        self.position = self.pose.w_axis.truncate();
        self.view_projection = self.projection * view;
    }
}

/// OpenGL-style perspective projection with canvas rows growing downward.
fn projection_matrix(width: usize, height: usize) -> Mat4 {
    let aspect = if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    };
    let flip_y = Mat4::from_cols(Vec4::X, Vec4::NEG_Y, Vec4::Z, Vec4::W);
    flip_y * Mat4::perspective_rh_gl(FOV_Y_DEGREES.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
}
