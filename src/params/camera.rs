//! Orbit camera configuration.

/// Perspective + orbit settings for the viewer camera
#[derive(Debug, Clone)]
pub struct CameraSettings {
    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    pub far_plane: f32,

    /// Initial eye position
    pub initial_position: [f32; 3],

    /// Point the camera orbits around
    pub target: [f32; 3],

    /// Fraction of orbit velocity removed each frame (0 = no damping, 1 = no inertia)
    pub damping_factor: f32,

    /// Radians of rotation per pixel of mouse drag
    pub rotate_speed: f32,

    /// Allowed orbit radius
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 70.0,
            near_plane: 0.2,
            far_plane: 100.0,
            initial_position: [1.13, 0.327, 0.666],
            target: [0.0, 0.0, 0.0],
            damping_factor: 0.05,
            rotate_speed: 0.005,
            min_distance: 0.2,
            max_distance: 50.0,
        }
    }
}
