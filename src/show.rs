//! The opening show: a fixed run of bursts spaced out in time.
//!
//! A [`ShowSequence`] resolves the relative presets against the surface size
//! once, at start, and then hands bursts out as the clock passes their
//! scheduled time. Nothing here sleeps or owns a timer; the animation driver
//! polls it with the current time every frame.

use std::collections::VecDeque;
use std::time::Duration;

use crate::config::BurstPreset;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledBurst {
    /// Time at which the burst is due.
    pub at: Duration,
    pub x: f32,
    pub y: f32,
    pub intensity: f32,
}

#[derive(Clone, Debug)]
pub struct ShowSequence {
    pending: VecDeque<ScheduledBurst>,
}

impl ShowSequence {
    /// Schedules preset `k` at `start + k * interval`.
    pub fn new(
        presets: &[BurstPreset],
        width: f32,
        height: f32,
        interval: Duration,
        start: Duration,
    ) -> Self {
        let pending = presets
            .iter()
            .enumerate()
            .map(|(k, preset)| ScheduledBurst {
                at: start + interval * k as u32,
                x: width * preset.dx,
                y: height * preset.dy,
                intensity: preset.intensity,
            })
            .collect();
        Self { pending }
    }

    /// Takes the next burst if it is due at `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<ScheduledBurst> {
        if self.pending.front()?.at <= now {
            self.pending.pop_front()
        } else {
            None
        }
    }

    /// Drops every burst that has not fired yet.
    pub fn cancel(&mut self) {
        self.pending.clear();
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShowSettings;

    fn sequence(start_ms: u64) -> ShowSequence {
        let settings = ShowSettings::default();
        ShowSequence::new(
            &settings.presets,
            800.0,
            600.0,
            Duration::from_millis(settings.interval_ms),
            Duration::from_millis(start_ms),
        )
    }

    #[test]
    fn test_bursts_are_spaced_by_interval() {
        let mut show = sequence(1000);
        assert_eq!(show.remaining(), 5);
        assert!(show.pop_due(Duration::from_millis(999)).is_none());

        let first = show.pop_due(Duration::from_millis(1000)).unwrap();
        assert_eq!(first.x, 200.0);
        assert!((first.y - 204.0).abs() < 1e-3);
        assert_eq!(first.intensity, 1.2);

        assert!(show.pop_due(Duration::from_millis(1179)).is_none());
        let second = show.pop_due(Duration::from_millis(1180)).unwrap();
        assert_eq!(second.at, Duration::from_millis(1180));
        assert_eq!(second.intensity, 1.1);
    }

    #[test]
    fn test_late_poll_releases_every_overdue_burst_in_order() {
        let mut show = sequence(0);
        let mut fired = Vec::new();
        while let Some(burst) = show.pop_due(Duration::from_millis(720)) {
            fired.push(burst.at.as_millis());
        }
        assert_eq!(fired, vec![0, 180, 360, 540, 720]);
        assert!(show.is_finished());
    }

    #[test]
    fn test_cancel_drops_pending_bursts() {
        let mut show = sequence(0);
        assert!(show.pop_due(Duration::ZERO).is_some());
        show.cancel();
        assert!(show.is_finished());
        assert!(show.pop_due(Duration::from_secs(10)).is_none());
    }
}
