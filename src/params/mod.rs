//! Parameter definitions with documented units, ranges, and defaults.

mod camera;
mod render;
mod water;

// Re-export all types
pub use camera::CameraSettings;
pub use render::{RenderConfig, SnapshotConfig};
pub use water::{
    format_hex_color, parse_assignment, parse_hex_color, ColorKey, ColorParameters, ControlSpec,
    ParamKey, WaterParams, WaveParameters, CONTROLS,
};
