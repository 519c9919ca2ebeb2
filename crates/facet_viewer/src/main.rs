mod input;
mod sequence;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgMatches, Command};
use facet_core::{load_obj, model_transform, Config, Scene};
use facet_math::Axis;
use facet_renderer::{draw, FrameBuffer};
use minifb::{KeyRepeat, Window, WindowOptions};

use crate::input::{action_for_key, ViewerState};
use crate::sequence::SequenceKind;

fn create_clap_command() -> Command {
    Command::new("facet")
        .about("Software 3D renderer: wireframe, depth-buffered rasterizer and ray tracer")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("JSON config file; missing fields use defaults")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("model")
                .short('f')
                .long("model")
                .value_name("FILE")
                .help("OBJ model to load (overrides the config)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .value_name("MODE")
                .help("Initial render mode")
                .value_parser(["wireframe", "rasterized", "ray_traced"]),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .value_name("N")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .value_name("N")
                .value_parser(value_parser!(usize)),
        )
        .subcommand(
            Command::new("sequence")
                .about("Render a scripted camera sequence to numbered PNG frames")
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .value_name("KIND")
                        .value_parser(["wireframe", "navigation"])
                        .default_value("navigation"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("DIR")
                        .value_parser(value_parser!(PathBuf))
                        .default_value("frames"),
                )
                .arg(
                    Arg::new("start")
                        .long("start")
                        .value_name("N")
                        .help("Number of the first frame")
                        .value_parser(value_parser!(u32))
                        .default_value("0"),
                ),
        )
}

/// Config file (or defaults) with command line overrides applied.
fn load_config(matches: &ArgMatches) -> Result<Config> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(model) = matches.get_one::<PathBuf>("model") {
        config.model = model.clone();
    }
    if let Some(mode) = matches.get_one::<String>("mode") {
        config.render_mode = mode.parse().map_err(anyhow::Error::msg)?;
    }
    if let Some(&width) = matches.get_one::<usize>("width") {
        config.width = width;
    }
    if let Some(&height) = matches.get_one::<usize>("height") {
        config.height = height;
    }

    Ok(config)
}

fn build_scene(config: &Config) -> Result<Scene> {
    let triangles = load_obj(&config.model, &config.load_options())
        .with_context(|| format!("Failed to load model {}", config.model.display()))?;

    Ok(Scene::new(
        config.camera(),
        config.light(),
        triangles,
        model_transform(config.model_scale),
    )
    .with_render_mode(config.render_mode)
    .with_mirror(config.mirror)
    .with_mirror_depth(config.mirror_depth))
}

/// Follow a window size change. Returns whether the frame must be redrawn.
fn sync_size(scene: &mut Scene, frame: &mut FrameBuffer, (width, height): (usize, usize)) -> bool {
    if width == 0 || height == 0 || (width, height) == (scene.width(), scene.height()) {
        return false;
    }
    log::debug!("Resizing viewport to {}x{}", width, height);
    scene.resize(width, height);
    frame.resize(width, height);
    true
}

fn run_window(scene: &mut Scene) -> Result<()> {
    let (width, height) = (scene.width(), scene.height());
    let options = WindowOptions {
        resize: true,
        ..WindowOptions::default()
    };
    let mut window = Window::new("Facet", width, height, options).context("Unable to open window")?;
    window.set_target_fps(60);

    log::info!("Controls:");
    for line in input::help_lines() {
        log::info!("  {}", line);
    }

    let mut frame = FrameBuffer::new(width, height);
    let mut state = ViewerState::default();
    let mut saved = 0;
    draw(scene, &mut frame);

    while window.is_open() {
        let mut redraw = sync_size(scene, &mut frame, window.get_size());

        for key in window.get_keys_pressed(KeyRepeat::Yes) {
            let Some(action) = action_for_key(key) else {
                continue;
            };
            let outcome = state.apply(action, scene);
            if outcome.quit {
                log::info!("Quit requested");
                return Ok(());
            }
            if outcome.save {
                let path = PathBuf::from(sequence::frame_name(saved));
                match frame.save(&path) {
                    Ok(()) => saved += 1,
                    Err(err) => log::error!("Failed to save {}: {}", path.display(), err),
                }
            }
            redraw |= outcome.redraw;
        }

        if state.orbit {
            scene.camera.rotate(Axis::Y, 1.0);
            redraw = true;
        }

        if redraw {
            draw(scene, &mut frame);
        }

        window
            .update_with_buffer(frame.pixels(), scene.width(), scene.height())
            .context("Failed to present frame")?;
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let matches = create_clap_command().get_matches();
    let config = load_config(&matches)?;

    log::info!("Starting Facet ({}x{})", config.width, config.height);
    let mut scene = build_scene(&config)?;

    match matches.subcommand() {
        Some(("sequence", sub)) => {
            let kind: SequenceKind = sub
                .get_one::<String>("kind")
                .map(|kind| kind.parse())
                .transpose()
                .map_err(anyhow::Error::msg)?
                .unwrap_or(SequenceKind::Navigation);
            let output = sub
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("frames"));
            let start = sub.get_one::<u32>("start").copied().unwrap_or(0);

            let written = sequence::run(kind, &mut scene, &output, start)?;
            log::info!("Wrote {} frames to {}", written.len(), output.display());
        }
        _ => run_window(&mut scene)?,
    }

    Ok(())
}
