//! Water surface: wave displacement on the grid and the fragment color model.

mod mesh;
pub mod shading;
mod system;
mod waves;

// Re-export public types
pub use mesh::{Vertex, WaterGrid};
pub use system::{FrameState, WaterSystem};
pub use waves::{slope_normal, WaveField};
