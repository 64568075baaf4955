//! Rendering, surface, and snapshot configuration.

use std::path::PathBuf;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Initial window width (logical pixels)
    pub window_width: u32,

    /// Initial window height (logical pixels)
    pub window_height: u32,

    /// Upper bound on the device pixel ratio used for the framebuffer
    pub max_pixel_ratio: f64,

    /// Side length of the water plane (world units)
    pub plane_size: f32,

    /// Grid segments per side (vertices per side = segments + 1)
    pub grid_segments: usize,

    /// Perlin seed for the small-wave noise
    pub noise_seed: u32,

    /// Equirectangular sky image used for background and reflections
    pub environment_path: PathBuf,

    /// Clear color shown until the sky has loaded
    pub clear_color: [f64; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            max_pixel_ratio: 2.0,
            plane_size: 10.0,
            grid_segments: 256,
            noise_seed: 0,
            environment_path: PathBuf::from("stars.jpg"),
            clear_color: [0.0, 0.0, 0.0],
        }
    }
}

/// Offline snapshot configuration
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// Output PNG path
    pub output: PathBuf,

    /// Elapsed time to render (seconds)
    pub time_s: f32,

    /// Image width = height (pixels)
    pub size: u32,
}

impl SnapshotConfig {
    pub fn new(output: PathBuf) -> Self {
        Self {
            output,
            time_s: 0.0,
            size: 512,
        }
    }
}
