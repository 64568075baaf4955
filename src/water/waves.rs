//! Procedural wave elevation: a sine swell with Perlin chop carved out of it.

use glam::Vec3;
use noise::{NoiseFn, Perlin};

use crate::params::WaveParameters;

/// Elevation field sampled by the displacement stage
///
/// Holds only the noise permutation table, so the same field and parameters
/// always produce the same surface.
pub struct WaveField {
    perlin: Perlin,
}

impl WaveField {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }

    /// Large swell: product of two travelling sines
    pub fn big_wave(x: f32, z: f32, time_s: f32, params: &WaveParameters) -> f32 {
        let phase = time_s * params.big_speed;
        (x * params.big_frequency.x + phase).sin()
            * (z * params.big_frequency.y + phase).sin()
            * params.big_elevation
    }

    /// Small chop: sum of |noise| octaves, each finer and weaker than the last
    ///
    /// Returned as a positive depth; callers subtract it so every octave digs
    /// a sharp trough instead of smoothing the swell.
    pub fn small_waves(&self, x: f32, z: f32, time_s: f32, params: &WaveParameters) -> f32 {
        let t = (time_s * params.small_speed) as f64;
        let mut depth = 0.0;

        for i in 1..=params.small_iterations {
            let octave = i as f32;
            let frequency = params.small_frequency * octave;
            let sample = self
                .perlin
                .get([(x * frequency) as f64, (z * frequency) as f64, t]) as f32;
            depth += sample.abs() * params.small_elevation / octave;
        }

        depth
    }

    /// Surface elevation at planar position (x, z)
    pub fn elevation(&self, x: f32, z: f32, time_s: f32, params: &WaveParameters) -> f32 {
        let elevation = Self::big_wave(x, z, time_s, params);

        if params.small_iterations == 0 {
            return elevation;
        }

        elevation - self.small_waves(x, z, time_s, params)
    }

    /// Surface normal at (x, z) from central differences of the elevation
    pub fn normal(
        &self,
        x: f32,
        z: f32,
        time_s: f32,
        params: &WaveParameters,
        epsilon: f32,
    ) -> Vec3 {
        let dx = self.elevation(x + epsilon, z, time_s, params)
            - self.elevation(x - epsilon, z, time_s, params);
        let dz = self.elevation(x, z + epsilon, time_s, params)
            - self.elevation(x, z - epsilon, time_s, params);

        slope_normal(dx, dz, 2.0 * epsilon)
    }
}

/// Normal of a height field from elevation differences across `span`
pub fn slope_normal(dx: f32, dz: f32, span: f32) -> Vec3 {
    Vec3::new(-dx, span, -dz).normalize_or(Vec3::Y)
}
