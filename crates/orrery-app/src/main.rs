//! The `orrery` binary: an animated solar system in a desktop window.

use clap::Parser;
use glam::Vec3;
use orrery_app::{AppState, PlatformDirs, run};
use orrery_config::{CliArgs, Config};
use orrery_scene::{Camera, CameraRig, Orrery, SceneBuilder, SystemTable, Viewport};
use tracing::{error, info, warn};

fn main() {
    let args = CliArgs::parse();

    let platform_dirs = match PlatformDirs::resolve_and_create() {
        Ok(dirs) => Some(dirs),
        Err(e) => {
            eprintln!("Warning: {e}; config and log files are disabled");
            None
        }
    };
    let config_dir = args
        .config
        .clone()
        .or_else(|| platform_dirs.as_ref().map(|d| d.config_dir.clone()))
        .or_else(orrery_config::default_config_dir);

    // Logging is not up yet; remember what happened and report it afterwards.
    let config_existed = config_dir
        .as_ref()
        .is_some_and(|dir| dir.join(orrery_config::CONFIG_FILE).is_file());
    let mut config_loaded = false;
    let mut config = match &config_dir {
        Some(dir) => match Config::load_or_create(dir) {
            Ok(config) => {
                config_loaded = true;
                config
            }
            Err(e) => {
                eprintln!("Warning: failed to load config from {}: {e}", dir.display());
                Config::default()
            }
        },
        None => Config::default(),
    };
    config.apply_cli_overrides(&args);
    if let Err(e) = config.validate() {
        eprintln!("Invalid settings: {e}");
        std::process::exit(2);
    }

    let log_dir = platform_dirs.as_ref().map(|d| d.log_dir.as_path());
    if let Some(log_file) = orrery_log::init_logging(log_dir, cfg!(debug_assertions), Some(&config))
    {
        info!("Writing JSON log to {}", log_file.display());
    }
    if let Some(dir) = config_dir.as_ref().filter(|_| config_loaded) {
        let path = dir.join(orrery_config::CONFIG_FILE);
        if config_existed {
            info!("Loaded config from {}", path.display());
        } else {
            info!("Created default config at {}", path.display());
        }
    }

    let table = match &config.scene.system_file {
        Some(path) => SystemTable::load(path).unwrap_or_else(|e| {
            warn!("{e}; using the built-in solar system");
            SystemTable::default()
        }),
        None => SystemTable::default(),
    };

    let scene = SceneBuilder::new(&table)
        .star_count(config.scene.star_count)
        .star_seed(config.scene.starfield_seed)
        .build();
    info!("Starfield seed: {}", scene.starfield.seed());

    let viewport = Viewport::new(config.window.width, config.window.height);
    let cam = &config.camera;
    let mut camera = Camera::perspective(cam.fov_degrees, viewport.aspect_ratio(), cam.near, cam.far);
    camera.position = Vec3::from_array(cam.initial_position);
    let rig = CameraRig::new(cam.orbit_radius, cam.orbit_height, cam.orbit_step);

    let orrery = Orrery::new(scene, camera, rig, viewport);
    let mut app = AppState::new(config, orrery).with_config_dir(config_dir);
    if let Err(e) = run(&mut app) {
        error!("Event loop failed: {e}");
        std::process::exit(1);
    }
    info!("Exited after {} ticks", app.orrery.ticks());
}
