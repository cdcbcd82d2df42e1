//! The fireworks context: live particles, show state and the per-frame driver.
//!
//! All time is passed in by the caller as a [`Duration`] since an arbitrary
//! epoch, so the whole effect can run against a virtual clock.

use std::time::Duration;

use eframe::egui::Color32;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace};

use crate::canvas::Canvas;
use crate::config::{FireworksConfig, MAX_BURST_PARTICLES};
use crate::error::ConfigError;
use crate::particle::{Particle, create_burst};
use crate::show::ShowSequence;
use crate::viewport::Viewport;

pub struct Fireworks<R = StdRng> {
    config: FireworksConfig,
    palette: Vec<Color32>,
    rng: R,
    viewport: Viewport,
    particles: Vec<Particle>,
    show: Option<ShowSequence>,
    armed: bool,
    revealed: bool,
    celebrating: bool,
    last_burst: Option<Duration>,
    spawned: u64,
}

impl Fireworks<StdRng> {
    /// Creates a context seeded from OS entropy.
    pub fn new(config: FireworksConfig, viewport: Viewport) -> Result<Self, ConfigError> {
        Self::with_rng(config, viewport, StdRng::from_entropy())
    }

    pub fn seeded(
        config: FireworksConfig,
        viewport: Viewport,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::with_rng(config, viewport, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Fireworks<R> {
    pub fn with_rng(
        config: FireworksConfig,
        viewport: Viewport,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let palette = config.palette_colors()?;
        Ok(Self {
            config,
            palette,
            rng,
            viewport,
            particles: Vec::new(),
            show: None,
            armed: false,
            revealed: false,
            celebrating: false,
            last_burst: None,
            spawned: 0,
        })
    }

    pub fn resize(&mut self, width: f32, height: f32, raw_pixel_ratio: f32) -> bool {
        self.viewport.resize(width, height, raw_pixel_ratio)
    }

    /// Spawns a burst at `(x, y)`, kept inside the safe zone of the surface.
    /// Returns how many particles were added.
    pub fn burst_at(&mut self, x: f32, y: f32, intensity: f32, now: Duration) -> usize {
        let zone = self.config.safe_zone;
        // min before max: on a surface smaller than the safe zone the
        // top-left margin wins instead of panicking like `clamp` would.
        let bx = x.min(self.viewport.width - zone.right).max(zone.left);
        let by = y.min(self.viewport.height - zone.bottom).max(zone.top);

        let wanted = (self.config.particles.per_intensity * intensity).floor();
        // NaN, infinite and negative intensities spawn nothing.
        let count = if wanted.is_finite() {
            (wanted as usize).min(MAX_BURST_PARTICLES)
        } else {
            0
        };
        let burst = create_burst(
            &mut self.rng,
            &self.config.particles,
            &self.palette,
            bx,
            by,
            count,
        );
        self.particles.extend(burst);
        self.spawned += count as u64;
        self.last_burst = Some(now);
        self.celebrating = true;

        debug!("Burst of {} particles at ({:.1}, {:.1})", count, bx, by);
        count
    }

    /// Arms scene clicks, reveals the message and starts the opening show.
    pub fn run_show(&mut self, now: Duration) {
        self.armed = true;
        self.revealed = true;

        if self.config.reduced_motion {
            info!("Reduced motion preferred, revealing without fireworks");
            self.show = None;
            self.celebrating = false;
            return;
        }

        if self.show.as_ref().is_some_and(|show| !show.is_finished()) {
            info!("Restarting show, dropping the bursts still pending");
        }
        let settings = &self.config.show;
        self.show = Some(ShowSequence::new(
            &settings.presets,
            self.viewport.width,
            self.viewport.height,
            Duration::from_millis(settings.interval_ms),
            now,
        ));
        info!("Show started with {} bursts", settings.presets.len());
        self.advance_show(now);
    }

    /// Fires every show burst due at `now`. Returns how many fired.
    pub fn advance_show(&mut self, now: Duration) -> usize {
        let mut fired = 0;
        while let Some(burst) = self.show.as_mut().and_then(|show| show.pop_due(now)) {
            self.burst_at(burst.x, burst.y, burst.intensity, now);
            fired += 1;
        }
        if self.show.as_ref().is_some_and(ShowSequence::is_finished) {
            self.show = None;
        }
        fired
    }

    pub fn cancel_show(&mut self) {
        if let Some(mut show) = self.show.take() {
            info!("Show cancelled with {} bursts pending", show.remaining());
            show.cancel();
        }
    }

    /// Handles a click in surface-local coordinates. Only armed scenes with
    /// motion allowed respond, with one extra burst.
    pub fn click(&mut self, x: f32, y: f32, now: Duration) -> bool {
        if !self.armed || self.config.reduced_motion {
            return false;
        }
        self.burst_at(x, y, self.config.show.click_intensity, now);
        true
    }

    /// Advances, culls and paints every particle. Call once per display frame.
    pub fn tick(&mut self, canvas: &mut impl Canvas, now: Duration) {
        self.advance_show(now);

        if !self.viewport.is_degenerate() {
            let (width, height) = (self.viewport.width, self.viewport.height);
            let margin = self.config.cull_margin;

            canvas.clear();
            // Reverse order: `swap_remove` only moves already processed particles.
            for i in (0..self.particles.len()).rev() {
                let particle = &mut self.particles[i];
                particle.step();

                let alpha = particle.alpha();
                if particle.is_expired() || particle.is_outside(width, height, &margin) {
                    self.particles.swap_remove(i);
                    continue;
                }
                canvas.set_global_alpha(alpha);
                canvas.fill_circle(particle.position, particle.radius, particle.color);
            }
            canvas.set_global_alpha(1.0);
        }

        let settle = Duration::from_millis(self.config.show.settle_ms);
        let quiet = self
            .last_burst
            .is_none_or(|at| now.saturating_sub(at) > settle);
        if self.celebrating && self.particles.is_empty() && quiet {
            trace!("Fireworks settled");
            self.celebrating = false;
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn config(&self) -> &FireworksConfig {
        &self.config
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Whether the reveal message should be on.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// True while particles are live or a burst happened within the settle time.
    pub fn is_celebrating(&self) -> bool {
        self.celebrating
    }

    pub fn is_show_running(&self) -> bool {
        self.show.is_some()
    }

    pub fn last_burst(&self) -> Option<Duration> {
        self.last_burst
    }

    /// Total particles spawned since creation.
    pub fn spawned(&self) -> u64 {
        self.spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;

    const FRAME: Duration = Duration::from_millis(16);

    fn fireworks() -> Fireworks {
        Fireworks::seeded(
            FireworksConfig::default(),
            Viewport::new(800.0, 600.0, 1.0),
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_burst_count_follows_intensity() {
        let mut fw = fireworks();
        assert_eq!(fw.burst_at(400.0, 200.0, 1.0, Duration::ZERO), 70);
        assert_eq!(fw.particles().len(), 70);
        assert_eq!(fw.burst_at(400.0, 200.0, 0.5, Duration::ZERO), 35);
        assert_eq!(fw.particles().len(), 105);
        assert_eq!(fw.burst_at(400.0, 200.0, -1.0, Duration::ZERO), 0);
        assert_eq!(fw.burst_at(400.0, 200.0, f32::NAN, Duration::ZERO), 0);
        assert_eq!(fw.spawned(), 105);
    }

    #[test]
    fn test_oversized_bursts_are_capped() {
        let mut fw = fireworks();
        assert_eq!(fw.burst_at(400.0, 200.0, f32::INFINITY, Duration::ZERO), 0);
        assert_eq!(fw.burst_at(400.0, 200.0, f32::NEG_INFINITY, Duration::ZERO), 0);
        assert_eq!(
            fw.burst_at(400.0, 200.0, 1e6, Duration::ZERO),
            MAX_BURST_PARTICLES
        );
        assert_eq!(fw.particles().len(), MAX_BURST_PARTICLES);
    }

    #[test]
    fn test_burst_origin_is_clamped_to_safe_zone() {
        let mut fw = fireworks();
        fw.burst_at(-500.0, -500.0, 0.1, Duration::ZERO);
        fw.burst_at(5000.0, 5000.0, 0.1, Duration::ZERO);

        let (first, second) = fw.particles().split_at(7);
        for p in first {
            assert_eq!((p.position.x, p.position.y), (20.0, 20.0));
        }
        for p in second {
            assert_eq!((p.position.x, p.position.y), (780.0, 440.0));
        }
    }

    #[test]
    fn test_tiny_surface_does_not_panic() {
        let mut fw = Fireworks::seeded(
            FireworksConfig::default(),
            Viewport::new(30.0, 100.0, 1.0),
            1,
        )
        .unwrap();
        fw.burst_at(15.0, 50.0, 0.1, Duration::ZERO);
        let p = fw.particles()[0];
        assert_eq!((p.position.x, p.position.y), (20.0, 20.0));
    }

    #[test]
    fn test_burst_marks_celebrating() {
        let mut fw = fireworks();
        assert!(!fw.is_celebrating());
        fw.burst_at(100.0, 100.0, 1.0, Duration::from_millis(500));
        assert!(fw.is_celebrating());
        assert_eq!(fw.last_burst(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_tick_draws_survivors_and_resets_alpha() {
        let mut fw = fireworks();
        let mut canvas = RecordingCanvas::default();
        fw.burst_at(400.0, 200.0, 1.0, Duration::ZERO);

        fw.tick(&mut canvas, FRAME);
        assert_eq!(canvas.clears, 1);
        assert_eq!(canvas.calls.len(), 70);
        assert_eq!(canvas.global_alpha, 1.0);
        for call in &canvas.calls {
            assert!(call.alpha > 0.0 && call.alpha < 1.0);
        }
    }

    #[test]
    fn test_particles_expire_and_settle() {
        let mut fw = fireworks();
        let mut canvas = RecordingCanvas::default();
        fw.burst_at(400.0, 200.0, 1.0, Duration::ZERO);

        let mut now = Duration::ZERO;
        for _ in 0..95 {
            now += FRAME;
            fw.tick(&mut canvas, now);
            for p in fw.particles() {
                assert!(p.life <= p.max_life);
                assert!((0.0..=1.0).contains(&p.alpha()));
            }
        }
        assert!(fw.particles().is_empty());
        assert!(canvas.calls.is_empty());
        // 95 frames of 16ms is past the settle time.
        assert!(now > Duration::from_millis(900));
        assert!(!fw.is_celebrating());
    }

    #[test]
    fn test_celebrating_waits_for_settle_time() {
        let mut fw = fireworks();
        let mut canvas = RecordingCanvas::default();
        fw.burst_at(400.0, 200.0, 0.0, Duration::ZERO);
        assert!(fw.is_celebrating());

        fw.tick(&mut canvas, Duration::from_millis(900));
        assert!(fw.is_celebrating());
        fw.tick(&mut canvas, Duration::from_millis(901));
        assert!(!fw.is_celebrating());
    }

    #[test]
    fn test_particles_leaving_the_surface_are_culled() {
        let mut fw = fireworks();
        let mut canvas = RecordingCanvas::default();
        fw.burst_at(400.0, 200.0, 1.0, Duration::ZERO);

        // Shrinking the surface puts every particle past the side margin.
        fw.resize(100.0, 400.0, 1.0);
        fw.tick(&mut canvas, FRAME);
        assert!(fw.particles().is_empty());
        assert!(canvas.calls.is_empty());

        fw.resize(800.0, 600.0, 1.0);
        fw.tick(&mut canvas, FRAME * 2);
        assert!(fw.particles().is_empty());
    }

    #[test]
    fn test_degenerate_surface_skips_frame() {
        let mut fw = fireworks();
        let mut canvas = RecordingCanvas::default();
        fw.burst_at(400.0, 200.0, 1.0, Duration::ZERO);
        let before = fw.particles().to_vec();

        fw.resize(0.0, 600.0, 1.0);
        fw.tick(&mut canvas, FRAME);
        assert_eq!(canvas.clears, 0);
        assert_eq!(fw.particles(), before.as_slice());
    }

    #[test]
    fn test_click_requires_arming() {
        let mut fw = fireworks();
        assert!(!fw.click(300.0, 200.0, Duration::ZERO));
        assert!(fw.particles().is_empty());

        fw.run_show(Duration::ZERO);
        let after_show_start = fw.particles().len();
        assert!(fw.click(300.0, 200.0, Duration::from_millis(10)));
        assert_eq!(fw.particles().len(), after_show_start + 59);
    }

    #[test]
    fn test_reduced_motion_reveals_without_particles() {
        let config = FireworksConfig {
            reduced_motion: true,
            ..FireworksConfig::default()
        };
        let mut fw = Fireworks::seeded(config, Viewport::new(800.0, 600.0, 1.0), 1).unwrap();
        let mut canvas = RecordingCanvas::default();

        fw.run_show(Duration::ZERO);
        assert!(fw.is_armed());
        assert!(fw.is_revealed());
        assert!(!fw.is_celebrating());
        assert!(!fw.is_show_running());
        assert!(!fw.click(300.0, 200.0, Duration::from_millis(5)));

        fw.tick(&mut canvas, Duration::from_secs(2));
        assert_eq!(fw.spawned(), 0);
        assert!(fw.particles().is_empty());
    }

    #[test]
    fn test_show_fires_first_burst_immediately_and_rest_on_ticks() {
        let mut fw = fireworks();
        let mut canvas = RecordingCanvas::default();

        fw.run_show(Duration::ZERO);
        assert_eq!(fw.spawned(), 84);
        assert!(fw.is_show_running());

        fw.tick(&mut canvas, Duration::from_millis(179));
        assert_eq!(fw.spawned(), 84);
        fw.tick(&mut canvas, Duration::from_millis(180));
        assert_eq!(fw.spawned(), 84 + 77);
    }

    #[test]
    fn test_cancelled_show_fires_nothing_more() {
        let mut fw = fireworks();
        let mut canvas = RecordingCanvas::default();

        fw.run_show(Duration::ZERO);
        fw.cancel_show();
        assert!(!fw.is_show_running());
        fw.tick(&mut canvas, Duration::from_secs(1));
        assert_eq!(fw.spawned(), 84);
    }

    #[test]
    fn test_rerunning_show_restarts_the_sequence() {
        let mut fw = fireworks();
        fw.run_show(Duration::ZERO);
        fw.advance_show(Duration::from_millis(180));
        assert_eq!(fw.spawned(), 84 + 77);

        fw.run_show(Duration::from_millis(200));
        assert_eq!(fw.spawned(), 84 + 77 + 84);
        // The old schedule's 360ms burst is gone, the new one is due at 380ms.
        assert_eq!(fw.advance_show(Duration::from_millis(370)), 0);
        assert_eq!(fw.advance_show(Duration::from_millis(380)), 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = FireworksConfig::default();
        config.palette = vec!["#nothex".to_string()];
        let result = Fireworks::seeded(config, Viewport::new(800.0, 600.0, 1.0), 1);
        assert!(matches!(result, Err(ConfigError::InvalidColor(_))));
    }
}
