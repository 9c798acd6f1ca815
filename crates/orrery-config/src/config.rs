//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the config inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Top-level orrery configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Rendering settings.
    pub render: RenderConfig,
    /// Scene construction settings.
    pub scene: SceneConfig,
    /// Camera projection and auto-orbit settings.
    pub camera: CameraConfig,
    /// Mouse orbit controls.
    pub controls: ControlsConfig,
    /// Texture asset location.
    pub assets: AssetConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in fullscreen mode.
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// MSAA sample count (1 or 4).
    pub msaa_samples: u32,
    /// Clear colour used behind the background texture, linear RGB.
    pub clear_color: [f64; 3],
    /// Animation ticks per second driven by the fixed-timestep loop.
    pub tick_rate: u32,
}

/// Scene construction configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Number of starfield points.
    pub star_count: u32,
    /// Seed for the starfield RNG. `None` seeds from the OS.
    pub starfield_seed: Option<u64>,
    /// Optional RON file replacing the built-in body table.
    pub system_file: Option<PathBuf>,
}

/// Camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
    /// Horizontal orbit radius around the origin.
    pub orbit_radius: f32,
    /// Constant height of the orbiting camera.
    pub orbit_height: f32,
    /// Orbit angle advanced each tick, in radians.
    pub orbit_step: f32,
    /// Camera position before the first tick.
    pub initial_position: [f32; 3],
}

/// Mouse orbit controls configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlsConfig {
    /// Enable mouse orbit controls.
    pub enabled: bool,
    /// Radians of orbit angle per pixel of horizontal drag.
    pub rotate_sensitivity: f32,
    /// Height units per pixel of vertical drag.
    pub pan_sensitivity: f32,
    /// Fraction of the radius zoomed per scroll line.
    pub zoom_sensitivity: f32,
    /// Closest allowed orbit radius.
    pub min_radius: f32,
    /// Farthest allowed orbit radius.
    pub max_radius: f32,
    /// Lowest and highest allowed camera height.
    pub height_range: [f32; 2],
}

/// Texture asset configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory containing the texture images.
    pub texture_dir: PathBuf,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log a line with frame statistics every N rendered frames (0 disables).
    pub frame_stats_interval: u32,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "Orrery".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            msaa_samples: 4,
            clear_color: [0.0, 0.0, 0.0],
            tick_rate: 60,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            star_count: 8000,
            starfield_seed: None,
            system_file: None,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 2000.0,
            orbit_radius: 140.0,
            orbit_height: 140.0,
            orbit_step: 0.001,
            initial_position: [-90.0, 140.0, 140.0],
        }
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rotate_sensitivity: 0.005,
            pan_sensitivity: 0.5,
            zoom_sensitivity: 0.1,
            min_radius: 30.0,
            max_radius: 1200.0,
            height_range: [-600.0, 600.0],
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            texture_dir: PathBuf::from("assets/textures"),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            frame_stats_interval: 0,
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized).map_err(ConfigError::WriteError)
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = std::fs::read_to_string(config_dir.join(CONFIG_FILE))
            .map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::debug!("Config at {} differs from the running config", config_dir.display());
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Reject values the renderer or camera cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.render.msaa_samples, 1 | 4) {
            return Err(ConfigError::InvalidValue {
                field: "render.msaa_samples",
                reason: format!("{} (expected 1 or 4)", self.render.msaa_samples),
            });
        }
        if self.render.tick_rate == 0 {
            return Err(ConfigError::InvalidValue {
                field: "render.tick_rate",
                reason: "must be at least 1".to_string(),
            });
        }
        let cam = &self.camera;
        if !(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return Err(ConfigError::InvalidValue {
                field: "camera.fov_degrees",
                reason: format!("{} (expected 0 < fov < 180)", cam.fov_degrees),
            });
        }
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(ConfigError::InvalidValue {
                field: "camera.near",
                reason: format!("near {} must be positive and below far {}", cam.near, cam.far),
            });
        }
        let ctl = &self.controls;
        if ctl.min_radius <= 0.0 || ctl.min_radius > ctl.max_radius {
            return Err(ConfigError::InvalidValue {
                field: "controls.min_radius",
                reason: format!("[{}, {}] is not a valid range", ctl.min_radius, ctl.max_radius),
            });
        }
        if ctl.height_range[0] > ctl.height_range[1] {
            return Err(ConfigError::InvalidValue {
                field: "controls.height_range",
                reason: format!("{:?} is not a valid range", ctl.height_range),
            });
        }
        Ok(())
    }
}
