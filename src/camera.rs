//! Damped orbit camera around the water plane.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};

use crate::params::CameraSettings;

/// Keeps the eye from passing through the poles
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Orbit camera: spherical coordinates around a target with inertial input
pub struct OrbitCamera {
    settings: CameraSettings,
    target: Vec3,
    distance: f32,
    /// Horizontal angle (radians), 0 looks down -Z from +Z
    yaw: f32,
    /// Elevation above the target's horizon (radians)
    pitch: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    /// Pending multiplicative zoom, consumed over several frames
    zoom_velocity: f32,
}

impl OrbitCamera {
    /// Create a camera at the configured initial eye position
    pub fn new(settings: CameraSettings) -> Self {
        let target = Vec3::from_array(settings.target);
        let offset = Vec3::from_array(settings.initial_position) - target;
        let distance = offset
            .length()
            .clamp(settings.min_distance, settings.max_distance);
        let pitch = (offset.y / offset.length().max(f32::EPSILON))
            .clamp(-1.0, 1.0)
            .asin()
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        let yaw = offset.x.atan2(offset.z);

        Self {
            settings,
            target,
            distance,
            yaw,
            pitch,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            zoom_velocity: 0.0,
        }
    }

    /// Current eye position in world space
    pub fn eye(&self) -> Vec3 {
        let horizontal = self.distance * self.pitch.cos();
        self.target
            + Vec3::new(
                horizontal * self.yaw.sin(),
                self.distance * self.pitch.sin(),
                horizontal * self.yaw.cos(),
            )
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Feed a mouse drag (pixels); the motion plays out through `update`
    pub fn rotate(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw_velocity -= delta_x * self.settings.rotate_speed;
        self.pitch_velocity += delta_y * self.settings.rotate_speed;
    }

    /// Feed a scroll step; positive values move the eye away
    pub fn zoom(&mut self, delta: f32) {
        self.zoom_velocity += delta * 0.1;
    }

    /// Advance one frame of damped motion
    pub fn update(&mut self) {
        let damping = self.settings.damping_factor.clamp(0.0, 1.0);

        // Apply the damped share of the velocity, keep the rest for later frames
        self.yaw += self.yaw_velocity * damping;
        self.pitch = (self.pitch + self.pitch_velocity * damping).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.distance = (self.distance * (1.0 + self.zoom_velocity * damping))
            .clamp(self.settings.min_distance, self.settings.max_distance);

        self.yaw_velocity *= 1.0 - damping;
        self.pitch_velocity *= 1.0 - damping;
        self.zoom_velocity *= 1.0 - damping;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    /// Create view-projection matrix for the given viewport aspect ratio
    ///
    /// # Returns
    /// Tuple of (view_proj_matrix, camera_position)
    pub fn view_proj(&self, aspect: f32) -> (Mat4, Vec3) {
        let proj = Mat4::perspective_rh(
            self.settings.fov_degrees.to_radians(),
            aspect,
            self.settings.near_plane,
            self.settings.far_plane,
        );
        (proj * self.view_matrix(), self.eye())
    }
}
