//! Keyboard bindings for the interactive viewer.
//!
//! Keys resolve through a fixed table to an [`Action`]; the scene only ever
//! sees the resulting mutation calls.

use facet_core::{LightMode, RenderMode, Scene};
use facet_math::Axis;
use minifb::Key;

/// Something a key press asks the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    SetRenderMode(RenderMode),
    SetLightMode(LightMode),
    TranslateCamera(Axis, f32),
    RotateCamera(Axis, f32),
    MoveLight(Axis, f32),
    LookAtOrigin,
    ToggleOrbit,
    ToggleMirror,
    ToggleSoftShadows,
    SaveFrame,
    Quit,
}

pub const KEY_BINDINGS: &[(Key, Action)] = &[
    (Key::Key1, Action::SetRenderMode(RenderMode::Wireframe)),
    (Key::Key2, Action::SetRenderMode(RenderMode::Rasterized)),
    (Key::Key3, Action::SetRenderMode(RenderMode::RayTraced)),
    (Key::Key4, Action::SetLightMode(LightMode::Flat)),
    (Key::Key5, Action::SetLightMode(LightMode::Phong)),
    (Key::W, Action::TranslateCamera(Axis::Y, 1.0)),
    (Key::S, Action::TranslateCamera(Axis::Y, -1.0)),
    (Key::A, Action::TranslateCamera(Axis::X, -1.0)),
    (Key::D, Action::TranslateCamera(Axis::X, 1.0)),
    (Key::Minus, Action::TranslateCamera(Axis::Z, 1.0)),
    (Key::Equal, Action::TranslateCamera(Axis::Z, -1.0)),
    (Key::Up, Action::RotateCamera(Axis::X, 1.0)),
    (Key::Down, Action::RotateCamera(Axis::X, -1.0)),
    (Key::Left, Action::RotateCamera(Axis::Y, 1.0)),
    (Key::Right, Action::RotateCamera(Axis::Y, -1.0)),
    (Key::H, Action::MoveLight(Axis::Y, 1.0)),
    (Key::N, Action::MoveLight(Axis::Y, -1.0)),
    (Key::B, Action::MoveLight(Axis::X, -1.0)),
    (Key::M, Action::MoveLight(Axis::X, 1.0)),
    (Key::J, Action::MoveLight(Axis::Z, 1.0)),
    (Key::K, Action::MoveLight(Axis::Z, -1.0)),
    (Key::L, Action::LookAtOrigin),
    (Key::O, Action::ToggleOrbit),
    (Key::R, Action::ToggleMirror),
    (Key::X, Action::ToggleSoftShadows),
    (Key::F, Action::SaveFrame),
    (Key::Escape, Action::Quit),
    (Key::Q, Action::Quit),
];

pub fn action_for_key(key: Key) -> Option<Action> {
    KEY_BINDINGS
        .iter()
        .find(|(bound, _)| *bound == key)
        .map(|(_, action)| *action)
}

/// What the viewer loop has to do after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outcome {
    pub redraw: bool,
    pub save: bool,
    pub quit: bool,
}

/// Viewer-side state that is not part of the scene.
#[derive(Debug, Clone, Default)]
pub struct ViewerState {
    /// Rotate the camera one step about y every frame.
    pub orbit: bool,
}

impl ViewerState {
    /// Apply one action to the scene.
    pub fn apply(&mut self, action: Action, scene: &mut Scene) -> Outcome {
        let mut outcome = Outcome {
            redraw: true,
            ..Outcome::default()
        };

        match action {
            Action::SetRenderMode(mode) => scene.set_render_mode(mode),
            Action::SetLightMode(mode) => scene.set_light_mode(mode),
            Action::TranslateCamera(axis, sign) => scene.camera.translate(axis, sign),
            Action::RotateCamera(axis, sign) => scene.camera.rotate(axis, sign),
            Action::MoveLight(axis, sign) => scene.move_light(axis, sign),
            Action::LookAtOrigin => {
                log::info!("Looking at the world origin");
                scene.camera.look_at(facet_math::Vec3::ZERO);
            }
            Action::ToggleOrbit => {
                self.orbit = !self.orbit;
                log::info!("Orbit: {}", if self.orbit { "on" } else { "off" });
                outcome.redraw = false;
            }
            Action::ToggleMirror => scene.toggle_mirror(),
            Action::ToggleSoftShadows => scene.toggle_soft_shadows(),
            Action::SaveFrame => {
                outcome.redraw = false;
                outcome.save = true;
            }
            Action::Quit => {
                outcome.redraw = false;
                outcome.quit = true;
            }
        }

        outcome
    }
}

/// One help line per binding, for the startup banner.
pub fn help_lines() -> Vec<String> {
    KEY_BINDINGS
        .iter()
        .map(|(key, action)| format!("{:?}: {:?}", key, action))
        .collect()
}
