//! Command-line argument parsing for the orrery.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orrery command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orrery", about = "Animated solar system")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// MSAA sample count (1 or 4).
    #[arg(long)]
    pub msaa: Option<u32>,

    /// Fixed seed for the starfield.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory containing the texture images.
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// RON file describing the bodies to render.
    #[arg(long)]
    pub system: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(samples) = args.msaa {
            self.render.msaa_samples = samples;
        }
        if let Some(seed) = args.seed {
            self.scene.starfield_seed = Some(seed);
        }
        if let Some(ref dir) = args.assets {
            self.assets.texture_dir = dir.clone();
        }
        if let Some(ref path) = args.system {
            self.scene.system_file = Some(path.clone());
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            seed: Some(7),
            assets: Some(PathBuf::from("/tmp/tex")),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.scene.starfield_seed, Some(7));
        assert_eq!(config.assets.texture_dir, PathBuf::from("/tmp/tex"));
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 720);
        assert_eq!(config.render.msaa_samples, 4);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "orrery",
            "--width",
            "800",
            "--msaa",
            "1",
            "--system",
            "custom.ron",
        ]);
        assert_eq!(args.width, Some(800));
        assert_eq!(args.msaa, Some(1));
        assert_eq!(args.system, Some(PathBuf::from("custom.ron")));
        assert!(args.log_level.is_none());
    }
}
