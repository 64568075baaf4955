//! Keyboard control panel writing into the live parameter set.
//!
//! Up/Down walk the rows: every scalar control, then the two colors.
//! Left/Right nudge a scalar or shift a color's lightness; `[`/`]` rotate
//! a color's hue.

use glam::{Quat, Vec3};
use winit::keyboard::KeyCode;

use crate::params::{format_hex_color, ColorKey, ParamKey, WaterParams, CONTROLS};

/// Color rows, shown after the scalar controls
pub const COLOR_CONTROLS: [ColorKey; 2] = [ColorKey::Depth, ColorKey::Surface];

/// Added to every channel per lightness step (5/255)
const LIGHTNESS_STEP: f32 = 5.0 / 255.0;

/// Hue rotation per step (degrees)
const HUE_STEP_DEGREES: f32 = 10.0;

/// One selectable row of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Scalar(ParamKey),
    Color(ColorKey),
}

impl Control {
    pub fn name(self) -> &'static str {
        match self {
            Control::Scalar(key) => key.name(),
            Control::Color(key) => key.name(),
        }
    }

    /// Current value as shown in logs
    pub fn format_value(self, params: &WaterParams) -> String {
        match self {
            Control::Scalar(key) => format!("{:.3}", params.get(key)),
            Control::Color(key) => format_hex_color(params.color(key)),
        }
    }
}

/// What a key press did to the parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    /// Nothing changed
    None,
    /// The selected row changed
    Selected(Control),
    /// A scalar was written; carries the stored value
    Changed(ParamKey, f32),
    /// A color was written; carries the stored color
    ColorChanged(ColorKey, Vec3),
    /// Everything went back to defaults
    Reset,
}

/// Selection state over the control rows
#[derive(Debug, Clone, Default)]
pub struct ControlPanel {
    selected: usize,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Control {
        match CONTROLS.get(self.selected) {
            Some(spec) => Control::Scalar(spec.key),
            None => Control::Color(COLOR_CONTROLS[self.selected - CONTROLS.len()]),
        }
    }

    /// Move the selection by `offset` rows, wrapping around
    pub fn select_offset(&mut self, offset: isize) -> Control {
        let count = (CONTROLS.len() + COLOR_CONTROLS.len()) as isize;
        self.selected = (self.selected as isize + offset).rem_euclid(count) as usize;
        self.selected()
    }

    /// Nudge the selected row `direction` steps (sign gives direction)
    ///
    /// Scalars move by their nudge amount; colors move in lightness.
    pub fn nudge(&self, params: &mut WaterParams, direction: f32) -> ControlAction {
        match self.selected() {
            Control::Scalar(key) => {
                let amount = key.spec().nudge_amount();
                ControlAction::Changed(key, params.set(key, params.get(key) + direction * amount))
            }
            Control::Color(key) => {
                let shifted = params.color(key) + Vec3::splat(direction * LIGHTNESS_STEP);
                params.set_color(key, shifted);
                ControlAction::ColorChanged(key, params.color(key))
            }
        }
    }

    /// Rotate the selected color's hue `direction` steps around the gray axis
    pub fn rotate_hue(&self, params: &mut WaterParams, direction: f32) -> ControlAction {
        let Control::Color(key) = self.selected() else {
            return ControlAction::None;
        };

        let angle = (direction * HUE_STEP_DEGREES).to_radians();
        let rotation = Quat::from_axis_angle(Vec3::ONE.normalize(), angle);
        params.set_color(key, rotation * params.color(key));
        ControlAction::ColorChanged(key, params.color(key))
    }

    /// Handle one key press
    pub fn handle_key(&mut self, key: KeyCode, params: &mut WaterParams) -> ControlAction {
        match key {
            KeyCode::ArrowUp => ControlAction::Selected(self.select_offset(-1)),
            KeyCode::ArrowDown => ControlAction::Selected(self.select_offset(1)),
            KeyCode::ArrowLeft => self.nudge(params, -1.0),
            KeyCode::ArrowRight => self.nudge(params, 1.0),
            KeyCode::BracketLeft => self.rotate_hue(params, -1.0),
            KeyCode::BracketRight => self.rotate_hue(params, 1.0),
            KeyCode::KeyR => {
                *params = WaterParams::default();
                ControlAction::Reset
            }
            _ => ControlAction::None,
        }
    }
}

/// Log every control value (one line each)
pub fn log_params(params: &WaterParams) {
    let scalars = CONTROLS.iter().map(|spec| Control::Scalar(spec.key));
    let colors = COLOR_CONTROLS.iter().map(|&key| Control::Color(key));
    for control in scalars.chain(colors) {
        log::info!("  {:<16} {}", control.name(), control.format_value(params));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ColorParameters, WaveParameters};

    fn select(panel: &mut ControlPanel, params: &mut WaterParams, control: Control) {
        while panel.selected() != control {
            panel.handle_key(KeyCode::ArrowDown, params);
        }
    }

    #[test]
    fn test_selection_wraps() {
        let mut panel = ControlPanel::new();
        assert_eq!(panel.selected(), Control::Scalar(ParamKey::BigElevation));

        assert_eq!(panel.select_offset(-1), Control::Color(ColorKey::Surface));
        assert_eq!(panel.select_offset(-1), Control::Color(ColorKey::Depth));
        assert_eq!(panel.select_offset(-1), Control::Scalar(ParamKey::Reflectivity));
        assert_eq!(panel.select_offset(3), Control::Scalar(ParamKey::BigElevation));
    }

    #[test]
    fn test_arrow_keys_nudge_selected_control() {
        let mut panel = ControlPanel::new();
        let mut params = WaterParams::default();
        let before = params.waves.big_elevation;

        let action = panel.handle_key(KeyCode::ArrowRight, &mut params);

        assert!(matches!(action, ControlAction::Changed(ParamKey::BigElevation, _)));
        assert!((params.waves.big_elevation - (before + 0.01)).abs() < 1e-5);
    }

    #[test]
    fn test_integer_control_moves_whole_steps() {
        let mut panel = ControlPanel::new();
        let mut params = WaterParams::default();
        select(&mut panel, &mut params, Control::Scalar(ParamKey::SmallIterations));

        panel.handle_key(KeyCode::ArrowLeft, &mut params);
        assert_eq!(params.waves.small_iterations, 3);

        for _ in 0..10 {
            panel.handle_key(KeyCode::ArrowLeft, &mut params);
        }
        assert_eq!(params.waves.small_iterations, 0);
    }

    #[test]
    fn test_nudge_is_clamped() {
        let panel = ControlPanel::new();
        let mut params = WaterParams::default();
        for _ in 0..500 {
            panel.nudge(&mut params, 1.0);
        }
        assert_eq!(params.waves.big_elevation, 1.0);
    }

    #[test]
    fn test_depth_color_is_live_editable() {
        let mut panel = ControlPanel::new();
        let mut params = WaterParams::default();
        let defaults = ColorParameters::default();
        select(&mut panel, &mut params, Control::Color(ColorKey::Depth));

        let action = panel.handle_key(KeyCode::ArrowRight, &mut params);

        let expected = defaults.depth_color + Vec3::splat(5.0 / 255.0);
        assert!(params.colors.depth_color.abs_diff_eq(expected, 1e-6));
        assert_eq!(
            action,
            ControlAction::ColorChanged(ColorKey::Depth, params.colors.depth_color)
        );
        assert_eq!(params.colors.surface_color, defaults.surface_color);
        assert_eq!(params.waves, WaveParameters::default());
    }

    #[test]
    fn test_color_lightness_is_clamped() {
        let mut panel = ControlPanel::new();
        let mut params = WaterParams::default();
        select(&mut panel, &mut params, Control::Color(ColorKey::Depth));

        for _ in 0..100 {
            panel.handle_key(KeyCode::ArrowLeft, &mut params);
        }
        assert_eq!(params.colors.depth_color, Vec3::ZERO);
    }

    #[test]
    fn test_hue_rotation_cycles_channels() {
        let mut panel = ControlPanel::new();
        let mut params = WaterParams::default();
        select(&mut panel, &mut params, Control::Color(ColorKey::Surface));
        params.set_color(ColorKey::Surface, Vec3::new(0.6, 0.4, 0.4));

        // Twelve 10 degree steps: a third of a turn around the gray axis
        for _ in 0..12 {
            panel.handle_key(KeyCode::BracketRight, &mut params);
        }
        assert!(params
            .colors
            .surface_color
            .abs_diff_eq(Vec3::new(0.4, 0.6, 0.4), 1e-4));

        for _ in 0..12 {
            panel.handle_key(KeyCode::BracketLeft, &mut params);
        }
        assert!(params
            .colors
            .surface_color
            .abs_diff_eq(Vec3::new(0.6, 0.4, 0.4), 1e-4));
    }

    #[test]
    fn test_hue_keys_ignore_scalar_rows() {
        let mut panel = ControlPanel::new();
        let mut params = WaterParams::default();
        assert_eq!(
            panel.handle_key(KeyCode::BracketRight, &mut params),
            ControlAction::None
        );
        assert_eq!(params, WaterParams::default());
    }

    #[test]
    fn test_format_value() {
        let params = WaterParams::default();
        assert_eq!(Control::Scalar(ParamKey::BigSpeed).format_value(&params), "0.750");
        assert_eq!(Control::Color(ColorKey::Depth).format_value(&params), "#040d1a");
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut panel = ControlPanel::new();
        let mut params = WaterParams::default();
        params.set(ParamKey::SmallSpeed, 3.0);
        params.set_color(ColorKey::Depth, Vec3::ONE);

        assert_eq!(panel.handle_key(KeyCode::KeyR, &mut params), ControlAction::Reset);
        assert_eq!(params, WaterParams::default());
    }

    #[test]
    fn test_other_keys_do_nothing() {
        let mut panel = ControlPanel::new();
        let mut params = WaterParams::default();
        assert_eq!(panel.handle_key(KeyCode::KeyQ, &mut params), ControlAction::None);
        assert_eq!(params, WaterParams::default());
    }
}
