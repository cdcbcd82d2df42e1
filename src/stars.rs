//! Background star decoration.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::config::StarSettings;

/// Dimmest point of the twinkle, as a fraction of the base opacity.
const TWINKLE_FLOOR: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    /// Horizontal position, percent of the scene width.
    pub x_percent: f32,
    /// Vertical position, percent of the scene height.
    pub y_percent: f32,
    pub radius: f32,
    pub opacity: f32,
    pub twinkle_secs: f32,
    pub delay_secs: f32,
}

impl Star {
    /// Opacity at `seconds` since the field was created.
    pub fn brightness_at(&self, seconds: f32) -> f32 {
        let t = seconds - self.delay_secs;
        if t < 0.0 || self.twinkle_secs <= 0.0 {
            return self.opacity;
        }
        let phase = (t / self.twinkle_secs).fract();
        let wave = 0.5 + 0.5 * (phase * TAU).cos();
        self.opacity * (TWINKLE_FLOOR + (1.0 - TWINKLE_FLOOR) * wave)
    }
}

pub struct StarField {
    pub stars: Vec<Star>,
}

impl StarField {
    /// Scatters `settings.count` stars. Same seed, same sky.
    pub fn generate(settings: &StarSettings, seed: u64) -> Self {
        let stars = (0..settings.count)
            .into_par_iter()
            .map(|i| {
                let star_seed = seed ^ (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
                let mut rng = StdRng::seed_from_u64(star_seed);
                Star {
                    x_percent: rng.gen_range(settings.x_percent.clone()),
                    y_percent: rng.gen_range(settings.y_percent.clone()),
                    radius: rng.gen_range(settings.radius.clone()),
                    opacity: rng.gen_range(settings.opacity.clone()),
                    twinkle_secs: rng.gen_range(settings.twinkle_secs.clone()),
                    delay_secs: rng.gen_range(settings.delay_secs.clone()),
                }
            })
            .collect();
        Self { stars }
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}
