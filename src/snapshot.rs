//! Offline top-down render of the shaded water surface to PNG.
//!
//! Runs both stages on the CPU: each pixel maps to one point of the plane,
//! which is displaced and shaded exactly as a fragment there would be.

use glam::Vec3;
use image::{Rgb, RgbImage};

use crate::environment::EnvironmentMap;
use crate::params::{SnapshotConfig, WaterParams};
use crate::water::shading::{shade, Fragment};
use crate::water::WaveField;

/// Shade a `size` x `size` image covering a `plane_size` square
///
/// Pixel rows run along +Z, columns along +X.
pub fn render_surface(
    field: &WaveField,
    params: &WaterParams,
    environment: Option<&EnvironmentMap>,
    camera_position: Vec3,
    plane_size: f32,
    size: u32,
    time_s: f32,
) -> RgbImage {
    let size = size.max(1);
    let half = plane_size / 2.0;
    let texel = plane_size / size as f32;

    RgbImage::from_fn(size, size, |px, py| {
        let x = (px as f32 + 0.5) * texel - half;
        let z = (py as f32 + 0.5) * texel - half;

        let elevation = field.elevation(x, z, time_s, &params.waves);
        let fragment = Fragment {
            elevation,
            world_position: Vec3::new(x, elevation, z),
            normal: field.normal(x, z, time_s, &params.waves, texel),
        };

        let [r, g, b, _] = shade(&fragment, camera_position, &params.colors, environment);
        let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb([to_byte(r), to_byte(g), to_byte(b)])
    })
}

/// Render and save a snapshot as configured
pub fn write_snapshot(
    config: &SnapshotConfig,
    field: &WaveField,
    params: &WaterParams,
    environment: Option<&EnvironmentMap>,
    camera_position: Vec3,
    plane_size: f32,
) -> Result<(), String> {
    let image = render_surface(
        field,
        params,
        environment,
        camera_position,
        plane_size,
        config.size,
        config.time_s,
    );

    image
        .save(&config.output)
        .map_err(|e| format!("Failed to save snapshot '{}': {}", config.output.display(), e))?;

    log::info!(
        "Snapshot written to {} ({}x{}, t={}s)",
        config.output.display(),
        config.size,
        config.size,
        config.time_s
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamKey;

    #[test]
    fn test_flat_colors_without_multiplier() {
        let field = WaveField::new(0);
        let mut params = WaterParams::default();
        params.set(ParamKey::ColorMultiplier, 0.0);

        let image = render_surface(&field, &params, None, Vec3::new(1.0, 1.0, 1.0), 10.0, 8, 2.0);

        let first = *image.get_pixel(0, 0);
        assert!(image.pixels().all(|p| *p == first));
    }

    #[test]
    fn test_snapshot_is_deterministic() {
        let field = WaveField::new(0);
        let params = WaterParams::default();
        let eye = Vec3::new(1.13, 0.327, 0.666);

        let a = render_surface(&field, &params, None, eye, 10.0, 16, 4.0);
        let b = render_surface(&field, &params, None, eye, 10.0, 16, 4.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_saturated_gradient_renders_surface_color() {
        let field = WaveField::new(0);
        let mut params = WaterParams::default();
        params.set(ParamKey::ColorOffset, 1.0);
        params.set(ParamKey::ColorMultiplier, 10.0);
        params.set(ParamKey::BigElevation, 0.0);
        params.set(ParamKey::SmallElevation, 0.0);

        let image = render_surface(&field, &params, None, Vec3::ONE, 10.0, 4, 0.0);

        let c = params.colors.surface_color * 255.0;
        let expected = Rgb([c.x.round() as u8, c.y.round() as u8, c.z.round() as u8]);
        assert!(image.pixels().all(|p| *p == expected));
    }
}
