//! Fragment color: depth/surface gradient plus a mirrored sky sample.
//!
//! `water.wgsl` implements the same steps on the GPU; keep the two in sync.

use glam::Vec3;

use crate::environment::EnvironmentMap;
use crate::params::ColorParameters;

/// Interpolated inputs of one water fragment
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub elevation: f32,
    pub world_position: Vec3,
    pub normal: Vec3,
}

/// Elevation mapped into the [0, 1] gradient position
pub fn mix_factor(elevation: f32, colors: &ColorParameters) -> f32 {
    ((elevation + colors.color_offset) * colors.color_multiplier).clamp(0.0, 1.0)
}

/// Gradient color between the depth and surface colors
pub fn base_color(elevation: f32, colors: &ColorParameters) -> Vec3 {
    let t = mix_factor(elevation, colors);
    // Endpoints are returned untouched so a saturated factor is exact
    if t <= 0.0 {
        colors.depth_color
    } else if t >= 1.0 {
        colors.surface_color
    } else {
        colors.depth_color.lerp(colors.surface_color, t)
    }
}

/// Direction the view ray leaves the surface in
///
/// `normal` must be unit length.
pub fn reflect_direction(camera_position: Vec3, world_position: Vec3, normal: Vec3) -> Vec3 {
    let to_eye = (camera_position - world_position).normalize_or(normal);
    let incident = -to_eye;
    incident - 2.0 * incident.dot(normal) * normal
}

/// Combine the gradient with an optional environment sample
pub fn blend(base: Vec3, environment: Option<Vec3>, reflectivity: f32) -> Vec3 {
    match environment {
        Some(sky) => base.lerp(sky, reflectivity),
        None => base,
    }
}

/// Final opaque RGBA color of a fragment
pub fn shade(
    fragment: &Fragment,
    camera_position: Vec3,
    colors: &ColorParameters,
    environment: Option<&EnvironmentMap>,
) -> [f32; 4] {
    let base = base_color(fragment.elevation, colors);

    let sky = environment.map(|map| {
        let reflected =
            reflect_direction(camera_position, fragment.world_position, fragment.normal);
        map.sample(reflected)
    });

    blend(base, sky, colors.reflectivity).extend(1.0).to_array()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(elevation: f32) -> Fragment {
        Fragment {
            elevation,
            world_position: Vec3::new(0.5, elevation, -0.25),
            normal: Vec3::Y,
        }
    }

    fn camera() -> Vec3 {
        Vec3::new(1.13, 0.327, 0.666)
    }

    #[test]
    fn test_mix_factor_clamps() {
        let colors = ColorParameters {
            color_offset: 0.0,
            ..ColorParameters::default()
        };
        assert_eq!(mix_factor(1e6, &colors), 1.0);
        assert_eq!(mix_factor(-1e6, &colors), 0.0);
    }

    #[test]
    fn test_extreme_elevations_hit_gradient_ends_exactly() {
        let colors = ColorParameters {
            color_offset: 0.0,
            ..ColorParameters::default()
        };

        let high = shade(&fragment(1e6), camera(), &colors, None);
        let low = shade(&fragment(-1e6), camera(), &colors, None);

        assert_eq!(high, colors.surface_color.extend(1.0).to_array());
        assert_eq!(low, colors.depth_color.extend(1.0).to_array());
    }

    #[test]
    fn test_zero_multiplier_gives_constant_color() {
        let colors = ColorParameters {
            color_offset: 0.4,
            color_multiplier: 0.0,
            ..ColorParameters::default()
        };

        let reference = shade(&fragment(0.0), camera(), &colors, None);
        for elevation in [-0.3, -0.01, 0.07, 0.2, 1e3] {
            assert_eq!(shade(&fragment(elevation), camera(), &colors, None), reference);
        }
    }

    #[test]
    fn test_missing_environment_returns_base_color() {
        let colors = ColorParameters::default();
        for elevation in [-0.2, 0.0, 0.1] {
            let color = shade(&fragment(elevation), camera(), &colors, None);
            let base = base_color(elevation, &colors);
            assert_eq!(color, base.extend(1.0).to_array());
            assert!(color.iter().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn test_environment_blends_by_reflectivity() {
        let white = EnvironmentMap::from_rgba(1, 1, vec![255, 255, 255, 255]).unwrap();
        let colors = ColorParameters {
            reflectivity: 0.25,
            ..ColorParameters::default()
        };

        let base = base_color(0.0, &colors);
        let color = shade(&fragment(0.0), camera(), &colors, Some(&white));
        let expected = base.lerp(Vec3::ONE, 0.25);

        for (got, want) in color.iter().zip(expected.to_array()) {
            assert!((got - want).abs() < 1e-5);
        }
        assert_eq!(color[3], 1.0);
    }

    #[test]
    fn test_zero_reflectivity_ignores_environment() {
        let white = EnvironmentMap::from_rgba(1, 1, vec![255, 255, 255, 255]).unwrap();
        let colors = ColorParameters {
            reflectivity: 0.0,
            ..ColorParameters::default()
        };

        let with_sky = shade(&fragment(0.05), camera(), &colors, Some(&white));
        let without = shade(&fragment(0.05), camera(), &colors, None);
        assert_eq!(with_sky, without);
    }

    #[test]
    fn test_reflection_mirrors_about_normal() {
        let reflected = reflect_direction(Vec3::new(1.0, 1.0, 0.0), Vec3::ZERO, Vec3::Y);
        let expected = Vec3::new(-1.0, 1.0, 0.0).normalize();
        assert!(reflected.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_reflection_straight_down_looks_straight_up() {
        let reflected = reflect_direction(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, Vec3::Y);
        assert!(reflected.abs_diff_eq(Vec3::Y, 1e-6));
    }
}
