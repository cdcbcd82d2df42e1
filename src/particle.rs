use std::f32::consts::TAU;

use cgmath::{Vector2, vec2};
use eframe::egui::Color32;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::{CullMargin, ParticleSettings};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vector2<f32>,
    pub velocity: Vector2<f32>,
    /// Remaining lifetime in frames, never above `max_life`.
    pub life: u32,
    pub max_life: u32,
    pub color: Color32,
    pub radius: f32,
    pub drag: f32,
    pub gravity: f32,
}

impl Particle {
    /// Advances one frame: drag, then gravity, then integration.
    pub fn step(&mut self) {
        self.velocity.x *= self.drag;
        self.velocity.y = self.velocity.y * self.drag + self.gravity;
        self.position += self.velocity;
        self.life = self.life.saturating_sub(1);
    }

    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        (self.life as f32 / self.max_life as f32).clamp(0.0, 1.0)
    }

    pub fn is_expired(&self) -> bool {
        self.life == 0
    }

    /// Whether the particle has left a `width` x `height` surface by more than `margin`.
    /// There is no top margin: rising particles fall back under gravity.
    pub fn is_outside(&self, width: f32, height: f32, margin: &CullMargin) -> bool {
        self.position.x < -margin.side
            || self.position.x > width + margin.side
            || self.position.y > height + margin.bottom
    }
}

/// Spawns `count` particles radiating from `(x, y)` in random directions.
pub fn create_burst<R: Rng + ?Sized>(
    rng: &mut R,
    settings: &ParticleSettings,
    palette: &[Color32],
    x: f32,
    y: f32,
    count: usize,
) -> Vec<Particle> {
    (0..count)
        .map(|_| {
            let angle = rng.gen_range(0.0..TAU);
            let streak = rng.gen_bool(settings.streak_chance as f64);
            let speed = rng.gen_range(settings.speed.clone())
                * if streak { settings.streak_multiplier } else { 1.0 };
            let life = rng.gen_range(settings.lifetime.clone());
            let radius = rng.gen_range(settings.radius.clone());
            let color = palette.choose(rng).copied().unwrap_or(Color32::WHITE);

            Particle {
                position: vec2(x, y),
                velocity: vec2(angle.cos(), angle.sin()) * speed,
                life,
                max_life: life,
                color,
                radius,
                drag: settings.drag,
                gravity: settings.gravity,
            }
        })
        .collect()
}
