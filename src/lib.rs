//! Starwater library - Animated water surface with sky reflections

pub mod camera;
pub mod cli;
pub mod controls;
pub mod environment;
pub mod params;
pub mod rendering;
pub mod snapshot;
pub mod viewport;
pub mod water;
