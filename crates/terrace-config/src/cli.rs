//! Command-line argument parsing for the terrain viewer.

use std::path::PathBuf;

use clap::Parser;
use terrace_terrain::{NoiseKind, ParameterChange};

use crate::Config;

/// Terrace command-line arguments.
///
/// CLI values override settings loaded from `config.ron`. Terrain values go
/// through the same range clamping as interactive edits.
#[derive(Parser, Debug, Default)]
#[command(name = "terrace", about = "Quantized procedural terrain viewer")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Noise family (open_simplex or worley).
    #[arg(long)]
    pub noise: Option<NoiseKind>,

    /// Maximum terrain height.
    #[arg(long)]
    pub max_height: Option<f64>,

    /// Grid segments along both axes.
    #[arg(long)]
    pub segments: Option<u32>,

    /// Number of quantization levels (1 disables quantization).
    #[arg(long)]
    pub steps: Option<u32>,

    /// Draw the terrain as a wireframe.
    #[arg(long)]
    pub wireframe: Option<bool>,

    /// Fixed oracle seed for reproducible terrain.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Generate the terrain without opening a window.
    #[arg(long)]
    pub headless: bool,

    /// Write a grayscale PNG of the height field (headless mode).
    #[arg(long)]
    pub export_png: Option<PathBuf>,

    /// Write a normalized PNG preview of the Worley distance field (headless mode).
    #[arg(long)]
    pub export_worley: Option<PathBuf>,
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

        let changes = [
            args.noise.map(ParameterChange::NoiseKind),
            args.max_height.map(ParameterChange::MaxHeight),
            args.segments.map(ParameterChange::Segments),
            args.steps.map(ParameterChange::DitherLevels),
            args.wireframe.map(ParameterChange::Wireframe),
        ];
        for change in changes.into_iter().flatten() {
            change.clamped().apply(&mut self.terrain);
        }

        if let Some(seed) = args.seed {
            self.debug.seed = Some(seed);
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
            noise: Some(NoiseKind::Worley),
            steps: Some(4),
            seed: Some(9),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.terrain.noise_kind, NoiseKind::Worley);
        assert_eq!(config.terrain.dither_levels, 4);
        assert_eq!(config.debug.seed, Some(9));
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 720);
        assert_eq!(config.terrain.grid_segments_x, 100);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_terrain_values_are_clamped() {
        let mut config = Config::default();
        let args = CliArgs {
            segments: Some(1000),
            max_height: Some(0.0),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.terrain.grid_segments_x, 300);
        assert_eq!(config.terrain.grid_segments_y, 300);
        assert_eq!(config.terrain.max_height, 1.0);
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = CliArgs::try_parse_from([
            "terrace",
            "--noise",
            "worley",
            "--steps",
            "5",
            "--headless",
            "--export-png",
            "out.png",
        ])
        .unwrap();
        assert_eq!(args.noise, Some(NoiseKind::Worley));
        assert_eq!(args.steps, Some(5));
        assert!(args.headless);
        assert_eq!(args.export_png, Some(PathBuf::from("out.png")));
    }

    #[test]
    fn test_unknown_noise_rejected_at_parse() {
        let result = CliArgs::try_parse_from(["terrace", "--noise", "perlin"]);
        assert!(result.is_err());
    }
}
