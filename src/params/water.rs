//! Wave and color parameters with their control bounds.

use glam::{Vec2, Vec3};

/// Wave shape parameters read by the displacement stage every frame
#[derive(Debug, Clone, PartialEq)]
pub struct WaveParameters {
    /// Height of the large swell (world units)
    pub big_elevation: f32,

    /// Spatial frequency of the swell along X and Z (radians per unit)
    pub big_frequency: Vec2,

    /// Swell phase speed (radians per second)
    pub big_speed: f32,

    /// Height of the small chop subtracted from the swell
    pub small_elevation: f32,

    /// Base spatial frequency of the first noise octave
    pub small_frequency: f32,

    /// Speed the noise field travels through its time axis
    pub small_speed: f32,

    /// Number of noise octaves (0 disables the chop entirely)
    pub small_iterations: u32,
}

impl Default for WaveParameters {
    fn default() -> Self {
        Self {
            big_elevation: 0.144,
            big_frequency: Vec2::new(1.825, 1.7255),
            big_speed: 0.75,
            small_elevation: 0.15,
            small_frequency: 1.996,
            small_speed: 0.2,
            small_iterations: 4,
        }
    }
}

/// Color parameters read by the shading stage every frame
///
/// Colors are display-space RGB in [0, 1], exactly as authored.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorParameters {
    /// Color of the troughs
    pub depth_color: Vec3,

    /// Color of the crests
    pub surface_color: Vec3,

    /// Added to the elevation before it becomes a mixing factor
    pub color_offset: f32,

    /// Scales the offset elevation into the mixing factor
    pub color_multiplier: f32,

    /// Fixed ratio of the environment sample in the final color
    pub reflectivity: f32,
}

impl Default for ColorParameters {
    fn default() -> Self {
        Self {
            depth_color: Vec3::new(4.0, 13.0, 26.0) / 255.0,       // #040d1a
            surface_color: Vec3::new(115.0, 150.0, 191.0) / 255.0, // #7396bf
            color_offset: 0.05,
            color_multiplier: 2.0,
            reflectivity: 0.2,
        }
    }
}

/// Scalar control identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKey {
    BigElevation,
    BigFrequencyX,
    BigFrequencyY,
    BigSpeed,
    ColorOffset,
    ColorMultiplier,
    SmallElevation,
    SmallFrequency,
    SmallSpeed,
    SmallIterations,
    Reflectivity,
}

/// Color control identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorKey {
    Depth,
    Surface,
}

/// Declared bounds of a scalar control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSpec {
    pub key: ParamKey,
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ControlSpec {
    /// Snap to the step grid, then clamp into [min, max]
    pub fn clamp(&self, value: f32) -> f32 {
        let snapped = self.min + ((value - self.min) / self.step).round() * self.step;
        snapped.clamp(self.min, self.max)
    }

    /// Amount a single keyboard nudge moves the value
    pub fn nudge_amount(&self) -> f32 {
        self.step.max((self.max - self.min) / 100.0)
    }
}

/// Every scalar control, in panel order
pub const CONTROLS: [ControlSpec; 11] = [
    ControlSpec {
        key: ParamKey::BigElevation,
        name: "bigElevation",
        min: 0.0,
        max: 1.0,
        step: 0.001,
    },
    ControlSpec {
        key: ParamKey::BigFrequencyX,
        name: "bigFrequencyX",
        min: 0.0,
        max: 10.0,
        step: 0.001,
    },
    ControlSpec {
        key: ParamKey::BigFrequencyY,
        name: "bigFrequencyY",
        min: 0.0,
        max: 10.0,
        step: 0.001,
    },
    ControlSpec {
        key: ParamKey::BigSpeed,
        name: "bigSpeed",
        min: 0.0,
        max: 4.0,
        step: 0.001,
    },
    ControlSpec {
        key: ParamKey::ColorOffset,
        name: "colorOffset",
        min: 0.0,
        max: 1.0,
        step: 0.001,
    },
    ControlSpec {
        key: ParamKey::ColorMultiplier,
        name: "colorMultiplier",
        min: 0.0,
        max: 10.0,
        step: 0.001,
    },
    ControlSpec {
        key: ParamKey::SmallElevation,
        name: "smallElevation",
        min: 0.0,
        max: 1.0,
        step: 0.001,
    },
    ControlSpec {
        key: ParamKey::SmallFrequency,
        name: "smallFrequency",
        min: 0.0,
        max: 30.0,
        step: 0.001,
    },
    ControlSpec {
        key: ParamKey::SmallSpeed,
        name: "smallSpeed",
        min: 0.0,
        max: 4.0,
        step: 0.001,
    },
    ControlSpec {
        key: ParamKey::SmallIterations,
        name: "smallIterations",
        min: 0.0,
        max: 6.0,
        step: 1.0,
    },
    ControlSpec {
        key: ParamKey::Reflectivity,
        name: "reflectivity",
        min: 0.0,
        max: 1.0,
        step: 0.001,
    },
];

impl ParamKey {
    pub fn spec(self) -> &'static ControlSpec {
        // CONTROLS is laid out in declaration order of ParamKey
        &CONTROLS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Look up a control by its display name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        CONTROLS
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(name))
            .map(|spec| spec.key)
    }
}

impl ColorKey {
    pub fn name(self) -> &'static str {
        match self {
            ColorKey::Depth => "depthColor",
            ColorKey::Surface => "surfaceColor",
        }
    }
}

/// The complete live parameter set shared by both stages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaterParams {
    pub waves: WaveParameters,
    pub colors: ColorParameters,
}

impl WaterParams {
    /// Current value of a scalar control
    pub fn get(&self, key: ParamKey) -> f32 {
        let (w, c) = (&self.waves, &self.colors);
        match key {
            ParamKey::BigElevation => w.big_elevation,
            ParamKey::BigFrequencyX => w.big_frequency.x,
            ParamKey::BigFrequencyY => w.big_frequency.y,
            ParamKey::BigSpeed => w.big_speed,
            ParamKey::ColorOffset => c.color_offset,
            ParamKey::ColorMultiplier => c.color_multiplier,
            ParamKey::SmallElevation => w.small_elevation,
            ParamKey::SmallFrequency => w.small_frequency,
            ParamKey::SmallSpeed => w.small_speed,
            ParamKey::SmallIterations => w.small_iterations as f32,
            ParamKey::Reflectivity => c.reflectivity,
        }
    }

    /// Write a scalar control, clamped to its declared bounds
    ///
    /// Returns the value actually stored.
    pub fn set(&mut self, key: ParamKey, value: f32) -> f32 {
        let value = key.spec().clamp(value);
        let (w, c) = (&mut self.waves, &mut self.colors);
        match key {
            ParamKey::BigElevation => w.big_elevation = value,
            ParamKey::BigFrequencyX => w.big_frequency.x = value,
            ParamKey::BigFrequencyY => w.big_frequency.y = value,
            ParamKey::BigSpeed => w.big_speed = value,
            ParamKey::ColorOffset => c.color_offset = value,
            ParamKey::ColorMultiplier => c.color_multiplier = value,
            ParamKey::SmallElevation => w.small_elevation = value,
            ParamKey::SmallFrequency => w.small_frequency = value,
            ParamKey::SmallSpeed => w.small_speed = value,
            ParamKey::SmallIterations => w.small_iterations = value as u32,
            ParamKey::Reflectivity => c.reflectivity = value,
        }
        value
    }

    pub fn color(&self, key: ColorKey) -> Vec3 {
        match key {
            ColorKey::Depth => self.colors.depth_color,
            ColorKey::Surface => self.colors.surface_color,
        }
    }

    /// Replace a color (components are clamped to [0, 1])
    pub fn set_color(&mut self, key: ColorKey, color: Vec3) {
        let color = color.clamp(Vec3::ZERO, Vec3::ONE);
        match key {
            ColorKey::Depth => self.colors.depth_color = color,
            ColorKey::Surface => self.colors.surface_color = color,
        }
    }
}

/// Parse a `#rrggbb` (or `rrggbb`) hex string into display-space RGB
pub fn parse_hex_color(text: &str) -> Result<Vec3, String> {
    let hex = text.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(format!("Expected a color like #7396bf, got '{}'", text));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map(|v| v as f32 / 255.0)
            .map_err(|e| format!("Invalid color '{}': {}", text, e))
    };

    Ok(Vec3::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Format display-space RGB as `#rrggbb`
pub fn format_hex_color(color: Vec3) -> String {
    let c = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    format!("#{:02x}{:02x}{:02x}", c.x as u8, c.y as u8, c.z as u8)
}

/// Parse a `name=value` control assignment
pub fn parse_assignment(text: &str) -> Result<(ParamKey, f32), String> {
    let (name, value) = text
        .split_once('=')
        .ok_or_else(|| format!("Expected name=value, got '{}'", text))?;

    let key = ParamKey::from_name(name.trim())
        .ok_or_else(|| format!("Unknown control '{}'", name.trim()))?;

    let value = value
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("Invalid value for {}: {}", key.name(), e))?;

    Ok((key, value))
}
