//! Configuration system for the orrery.
//!
//! Provides runtime-configurable settings that persist to disk as RON files.
//! Supports CLI overrides via clap, hot-reload detection, and forward/backward
//! compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AssetConfig, CONFIG_FILE, CameraConfig, Config, ControlsConfig, DebugConfig, RenderConfig, SceneConfig,
    WindowConfig,
};
pub use error::ConfigError;

/// Resolve the default config directory (`<platform config dir>/orrery`).
///
/// Returns `None` on platforms where `dirs` cannot determine a config root.
pub fn default_config_dir() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("orrery"))
}
