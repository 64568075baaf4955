//! High-level water system: owns the grid and the wave field.

use glam::Vec3;

use super::mesh::WaterGrid;
use super::waves::WaveField;
use crate::params::{RenderConfig, WaveParameters};

/// Per-frame inputs produced by the host loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Seconds since the app started
    pub elapsed_time: f32,

    /// Eye position of the orbit camera
    pub camera_position: Vec3,
}

/// Water surface simulation driven once per frame
pub struct WaterSystem {
    pub grid: WaterGrid,
    field: WaveField,
}

impl WaterSystem {
    /// Create the water plane described by the render configuration
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            grid: WaterGrid::new(config.plane_size, config.grid_segments),
            field: WaveField::new(config.noise_seed),
        }
    }

    /// Displace the grid for this frame
    ///
    /// # Arguments
    /// * `frame` - Elapsed time and camera position for this frame
    /// * `waves` - Current wave parameters (read-only)
    pub fn update(&mut self, frame: &FrameState, waves: &WaveParameters) {
        self.grid.displace(&self.field, waves, frame.elapsed_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> RenderConfig {
        RenderConfig {
            grid_segments: 8,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn test_update_depends_only_on_frame_and_params() {
        let config = small_config();
        let waves = WaveParameters::default();
        let frame = FrameState {
            elapsed_time: 2.5,
            camera_position: Vec3::new(1.0, 0.5, 1.0),
        };

        let mut a = WaterSystem::new(&config);
        let mut b = WaterSystem::new(&config);

        // A different history must not change the current frame
        a.update(
            &FrameState {
                elapsed_time: 99.0,
                ..frame
            },
            &waves,
        );
        a.update(&frame, &waves);
        b.update(&frame, &waves);

        let heights = |s: &WaterSystem| {
            s.grid
                .vertices
                .iter()
                .map(|v| v.elevation)
                .collect::<Vec<_>>()
        };
        assert_eq!(heights(&a), heights(&b));
    }

    #[test]
    fn test_update_leaves_params_untouched() {
        let mut system = WaterSystem::new(&small_config());
        let waves = WaveParameters::default();
        let frame = FrameState {
            elapsed_time: 1.0,
            camera_position: Vec3::ONE,
        };

        system.update(&frame, &waves);
        assert_eq!(waves, WaveParameters::default());
    }
}
