//! Scripted camera moves rendered headless to numbered PNG frames.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use facet_core::{RenderMode, Scene};
use facet_math::{Axis, Vec3};
use facet_renderer::{draw, FrameBuffer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    /// Ten wireframe frames orbiting about y.
    Wireframe,
    /// Rasterized fly-through: in, up, left, look, tilt, back out, orbit.
    Navigation,
}

impl FromStr for SequenceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wireframe" => Ok(SequenceKind::Wireframe),
            "navigation" => Ok(SequenceKind::Navigation),
            other => Err(format!("unknown sequence '{other}'")),
        }
    }
}

/// One camera move; a frame is saved after each.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Translate(Axis, f32),
    Rotate(Axis, f32),
    LookAtOrigin,
}

impl SequenceKind {
    pub fn render_mode(self) -> RenderMode {
        match self {
            SequenceKind::Wireframe => RenderMode::Wireframe,
            SequenceKind::Navigation => RenderMode::Rasterized,
        }
    }

    pub fn steps(self) -> Vec<Step> {
        let repeat = |count: usize, step: Step| std::iter::repeat(step).take(count);
        match self {
            SequenceKind::Wireframe => repeat(10, Step::Rotate(Axis::Y, 1.0)).collect(),
            SequenceKind::Navigation => repeat(40, Step::Translate(Axis::Z, 1.0))
                .chain(repeat(70, Step::Translate(Axis::Y, 1.0)))
                .chain(repeat(70, Step::Translate(Axis::X, -1.0)))
                .chain(repeat(1, Step::LookAtOrigin))
                .chain(repeat(10, Step::Rotate(Axis::X, -1.0)))
                .chain(repeat(30, Step::Translate(Axis::Z, -1.0)))
                .chain(repeat(100, Step::Rotate(Axis::Y, 1.0)))
                .collect(),
        }
    }
}

/// File name for frame `index`: five digits, zero padded.
pub fn frame_name(index: u32) -> String {
    format!("{index:05}.png")
}

fn apply(step: Step, scene: &mut Scene) {
    match step {
        Step::Translate(axis, sign) => scene.camera.translate(axis, sign),
        Step::Rotate(axis, sign) => scene.camera.rotate(axis, sign),
        Step::LookAtOrigin => scene.camera.look_at(Vec3::ZERO),
    }
}

/// Render `kind` into `output`, numbering frames from `start`.
///
/// Returns the paths written.
pub fn run(kind: SequenceKind, scene: &mut Scene, output: &Path, start: u32) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory {}", output.display()))?;

    scene.set_render_mode(kind.render_mode());
    let steps = kind.steps();
    log::info!("Rendering {:?} sequence: {} frames into {}", kind, steps.len(), output.display());

    let mut frame = FrameBuffer::new(scene.width(), scene.height());
    let mut written = Vec::with_capacity(steps.len());

    for (offset, step) in steps.into_iter().enumerate() {
        apply(step, scene);
        draw(scene, &mut frame);

        let path = output.join(frame_name(start + offset as u32));
        frame
            .save(&path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_core::{Color, Light, Triangle};
    use facet_math::{Camera, Mat4};

    #[test]
    fn test_step_counts() {
        assert_eq!(SequenceKind::Wireframe.steps().len(), 10);
        assert_eq!(SequenceKind::Navigation.steps().len(), 321);
    }

    #[test]
    fn test_navigation_order() {
        let steps = SequenceKind::Navigation.steps();
        assert_eq!(steps[0], Step::Translate(Axis::Z, 1.0));
        assert_eq!(steps[40], Step::Translate(Axis::Y, 1.0));
        assert_eq!(steps[110], Step::Translate(Axis::X, -1.0));
        assert_eq!(steps[180], Step::LookAtOrigin);
        assert_eq!(steps[181], Step::Rotate(Axis::X, -1.0));
        assert_eq!(steps[191], Step::Translate(Axis::Z, -1.0));
        assert_eq!(steps[221], Step::Rotate(Axis::Y, 1.0));
    }

    #[test]
    fn test_frame_name() {
        assert_eq!(frame_name(0), "00000.png");
        assert_eq!(frame_name(331), "00331.png");
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("wireframe".parse::<SequenceKind>(), Ok(SequenceKind::Wireframe));
        assert_eq!("navigation".parse::<SequenceKind>(), Ok(SequenceKind::Navigation));
        assert!("orbit".parse::<SequenceKind>().is_err());
    }

    #[test]
    fn test_wireframe_sequence_writes_frames() {
        let triangle = Triangle::new(
            [Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), Vec3::Y],
            Color::WHITE,
        );
        let mut scene = Scene::new(
            Camera::new(16, 16, Vec3::new(0.0, 0.0, 4.0)),
            Light::default(),
            vec![triangle],
            Mat4::IDENTITY,
        );
        let output = std::env::temp_dir().join(format!("facet_sequence_{}", std::process::id()));

        let written = run(SequenceKind::Wireframe, &mut scene, &output, 7).unwrap();

        assert_eq!(written.len(), 10);
        assert_eq!(written[0], output.join("00007.png"));
        assert!(written.iter().all(|path| path.exists()));
        assert_eq!(scene.render_mode(), RenderMode::Wireframe);
        std::fs::remove_dir_all(&output).unwrap();
    }
}
