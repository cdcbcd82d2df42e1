//! Tunable constants for the fireworks and the star decoration.
//!
//! Every section is `#[serde(default)]`, so a JSON file only needs to name the
//! values it overrides:
//!
//! ```json
//! { "particles": { "gravity": 0.1 }, "reduced_motion": true }
//! ```

use std::ops::Range;
use std::path::Path;

use eframe::egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound on the particles a single burst may spawn.
pub const MAX_BURST_PARTICLES: usize = 4096;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    /// Base launch speed in units per frame.
    pub speed: Range<f32>,
    /// Probability that a particle becomes a fast streak.
    pub streak_chance: f32,
    pub streak_multiplier: f32,
    /// Lifetime in frames, end exclusive.
    pub lifetime: Range<u32>,
    pub radius: Range<f32>,
    pub drag: f32,
    pub gravity: f32,
    /// Particles spawned per unit of burst intensity.
    pub per_intensity: f32,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            speed: 1.2..4.4,
            streak_chance: 0.12,
            streak_multiplier: 1.7,
            lifetime: 45..95,
            radius: 1.2..2.6,
            drag: 0.985,
            gravity: 0.06,
            per_intensity: 70.0,
        }
    }
}

/// Distance burst origins keep from each surface edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeZone {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    /// Larger than the others to leave room for the trigger and reveal text.
    pub bottom: f32,
}

impl Default for SafeZone {
    fn default() -> Self {
        Self {
            left: 20.0,
            top: 20.0,
            right: 20.0,
            bottom: 160.0,
        }
    }
}

/// How far past the surface a particle may travel before it is culled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CullMargin {
    pub side: f32,
    pub bottom: f32,
}

impl Default for CullMargin {
    fn default() -> Self {
        Self {
            side: 50.0,
            bottom: 80.0,
        }
    }
}

/// One burst of the opening show, positioned relative to the surface size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurstPreset {
    pub dx: f32,
    pub dy: f32,
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowSettings {
    pub presets: Vec<BurstPreset>,
    pub interval_ms: u64,
    /// Intensity of the extra burst fired by a scene click.
    pub click_intensity: f32,
    /// Quiet time after the last burst before the show counts as settled.
    pub settle_ms: u64,
}

impl Default for ShowSettings {
    fn default() -> Self {
        let preset = |dx, dy, intensity| BurstPreset { dx, dy, intensity };
        Self {
            presets: vec![
                preset(0.25, 0.34, 1.2),
                preset(0.62, 0.28, 1.1),
                preset(0.48, 0.40, 1.35),
                preset(0.35, 0.22, 0.95),
                preset(0.72, 0.38, 1.0),
            ],
            interval_ms: 180,
            click_intensity: 0.85,
            settle_ms: 900,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarSettings {
    pub count: usize,
    pub x_percent: Range<f32>,
    pub y_percent: Range<f32>,
    pub radius: Range<f32>,
    pub opacity: Range<f32>,
    pub twinkle_secs: Range<f32>,
    pub delay_secs: Range<f32>,
}

impl Default for StarSettings {
    fn default() -> Self {
        Self {
            count: 110,
            x_percent: 0.0..100.0,
            y_percent: 0.0..70.0,
            radius: 0.6..1.8,
            opacity: 0.35..0.95,
            twinkle_secs: 2.2..6.5,
            delay_secs: 0.0..4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireworksConfig {
    pub particles: ParticleSettings,
    /// `#rrggbb` colors particles pick from.
    pub palette: Vec<String>,
    pub safe_zone: SafeZone,
    pub cull_margin: CullMargin,
    pub show: ShowSettings,
    pub stars: StarSettings,
    /// Host answer to "prefers reduced motion". Disables all particles.
    pub reduced_motion: bool,
}

impl Default for FireworksConfig {
    fn default() -> Self {
        Self {
            particles: ParticleSettings::default(),
            palette: ["#ffd166", "#ff8fab", "#7bdff2", "#caffbf", "#bdb2ff", "#ffadad"]
                .into_iter()
                .map(String::from)
                .collect(),
            safe_zone: SafeZone::default(),
            cull_margin: CullMargin::default(),
            show: ShowSettings::default(),
            stars: StarSettings::default(),
            reduced_motion: false,
        }
    }
}

impl FireworksConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: FireworksConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Rejects values that would make sampling panic or the show stall.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.palette_colors()?;

        let p = &self.particles;
        check_range("particles.speed", &p.speed)?;
        check_range("particles.radius", &p.radius)?;
        if p.lifetime.is_empty() {
            return Err(ConfigError::EmptyRange("particles.lifetime"));
        }
        if !(0.0..=1.0).contains(&p.streak_chance) {
            return Err(ConfigError::InvalidChance(p.streak_chance));
        }
        check_finite("particles.drag", p.drag)?;
        check_finite("particles.gravity", p.gravity)?;
        check_finite("particles.streak_multiplier", p.streak_multiplier)?;
        if !(0.0..=MAX_BURST_PARTICLES as f32).contains(&p.per_intensity) {
            return Err(ConfigError::OutOfBounds("particles.per_intensity"));
        }

        let show = &self.show;
        if show.interval_ms == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        self.check_intensity("show.click_intensity", show.click_intensity)?;
        for preset in &show.presets {
            self.check_intensity("show.presets.intensity", preset.intensity)?;
            check_finite("show.presets.dx", preset.dx)?;
            check_finite("show.presets.dy", preset.dy)?;
        }

        let s = &self.stars;
        check_range("stars.x_percent", &s.x_percent)?;
        check_range("stars.y_percent", &s.y_percent)?;
        check_range("stars.radius", &s.radius)?;
        check_range("stars.opacity", &s.opacity)?;
        check_range("stars.twinkle_secs", &s.twinkle_secs)?;
        check_range("stars.delay_secs", &s.delay_secs)?;
        Ok(())
    }

    pub fn palette_colors(&self) -> Result<Vec<Color32>, ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        self.palette.iter().map(|hex| parse_hex_color(hex)).collect()
    }

    /// An intensity must be non-negative and stay under the burst cap.
    fn check_intensity(&self, name: &'static str, intensity: f32) -> Result<(), ConfigError> {
        let count = self.particles.per_intensity * intensity;
        if !(intensity >= 0.0 && count <= MAX_BURST_PARTICLES as f32) {
            return Err(ConfigError::OutOfBounds(name));
        }
        Ok(())
    }
}

fn check_finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::OutOfBounds(name));
    }
    Ok(())
}

fn check_range(name: &'static str, range: &Range<f32>) -> Result<(), ConfigError> {
    // `!(a < b)` also catches NaN bounds.
    if !(range.start < range.end) {
        return Err(ConfigError::EmptyRange(name));
    }
    Ok(())
}

/// Parses `#rrggbb` (the leading `#` is optional).
pub fn parse_hex_color(hex: &str) -> Result<Color32, ConfigError> {
    let invalid = || ConfigError::InvalidColor(hex.to_string());
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
    Ok(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}
