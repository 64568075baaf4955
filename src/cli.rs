//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::{
    parse_assignment, parse_hex_color, ColorKey, RenderConfig, SnapshotConfig, WaterParams,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Starwater")]
#[command(about = "Animated water surface under a starry sky", long_about = None)]
pub struct Args {
    /// Equirectangular sky image used for background and reflections
    #[arg(long, value_name = "PATH", default_value = "stars.jpg")]
    pub env_map: PathBuf,

    /// Grid segments per side of the water plane
    #[arg(long, value_name = "COUNT", default_value_t = 256)]
    pub segments: usize,

    /// Override a control, e.g. --set bigElevation=0.3 (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub assignments: Vec<String>,

    /// Trough color as hex, e.g. #040d1a
    #[arg(long, value_name = "HEX")]
    pub depth_color: Option<String>,

    /// Crest color as hex, e.g. #7396bf
    #[arg(long, value_name = "HEX")]
    pub surface_color: Option<String>,

    /// Render a top-down PNG on the CPU instead of opening a window
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// Elapsed time of the snapshot (seconds)
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0)]
    pub snapshot_time: f32,

    /// Snapshot width and height (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 512)]
    pub snapshot_size: u32,
}

impl Args {
    /// Build the rendering configuration
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            grid_segments: self.segments.max(1),
            environment_path: self.env_map.clone(),
            ..RenderConfig::default()
        }
    }

    /// Build the initial parameter set, applying every override through the setters
    pub fn water_params(&self) -> Result<WaterParams, String> {
        let mut params = WaterParams::default();

        for assignment in &self.assignments {
            let (key, value) = parse_assignment(assignment)?;
            let stored = params.set(key, value);
            if stored != value {
                log::warn!("{} clamped from {} to {}", key.name(), value, stored);
            }
        }

        for (key, text) in [
            (ColorKey::Depth, &self.depth_color),
            (ColorKey::Surface, &self.surface_color),
        ] {
            if let Some(text) = text {
                params.set_color(key, parse_hex_color(text)?);
            }
        }

        Ok(params)
    }

    /// Create snapshot configuration if snapshot mode is enabled
    pub fn snapshot_config(&self) -> Option<SnapshotConfig> {
        self.snapshot.clone().map(|output| SnapshotConfig {
            time_s: self.snapshot_time,
            size: self.snapshot_size.max(1),
            ..SnapshotConfig::new(output)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamKey;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["starwater"]);
        assert_eq!(args.water_params().unwrap(), WaterParams::default());
        assert!(args.snapshot_config().is_none());
        assert_eq!(args.render_config().grid_segments, 256);
    }

    #[test]
    fn test_overrides_go_through_setters() {
        let args = Args::parse_from([
            "starwater",
            "--set",
            "bigElevation=0.3",
            "--set",
            "smallIterations=99",
            "--depth-color",
            "#000000",
        ]);
        let params = args.water_params().unwrap();

        assert!((params.get(ParamKey::BigElevation) - 0.3).abs() < 1e-6);
        assert_eq!(params.waves.small_iterations, 6);
        assert_eq!(params.colors.depth_color, glam::Vec3::ZERO);
    }

    #[test]
    fn test_bad_override_is_an_error() {
        let args = Args::parse_from(["starwater", "--set", "tide=1"]);
        assert!(args.water_params().is_err());

        let args = Args::parse_from(["starwater", "--surface-color", "blue"]);
        assert!(args.water_params().is_err());
    }

    #[test]
    fn test_snapshot_config() {
        let args = Args::parse_from([
            "starwater",
            "--snapshot",
            "out.png",
            "--snapshot-time",
            "2.5",
            "--snapshot-size",
            "64",
        ]);
        let config = args.snapshot_config().unwrap();

        assert_eq!(config.output, PathBuf::from("out.png"));
        assert_eq!(config.time_s, 2.5);
        assert_eq!(config.size, 64);
    }
}
