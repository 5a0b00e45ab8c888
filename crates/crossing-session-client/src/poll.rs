// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Outbound polling cadence.

use std::time::Duration;
use tokio::time::Instant;

/// Default polling rate in ticks per second.
pub const DEFAULT_POLL_HZ: f64 = 60.0;
const MIN_POLL_HZ: f64 = 1.0;
const MAX_POLL_HZ: f64 = 240.0;

/// Tick period for `hz`, clamped to 1..=240 Hz. Non-finite rates fall back to
/// [`DEFAULT_POLL_HZ`].
pub fn poll_period(hz: f64) -> Duration {
    let hz = if hz.is_finite() {
        hz.clamp(MIN_POLL_HZ, MAX_POLL_HZ)
    } else {
        DEFAULT_POLL_HZ
    };
    Duration::from_secs_f64(1.0 / hz)
}

/// Measures wall-clock milliseconds between consecutive poll ticks.
#[derive(Debug, Clone, Copy)]
pub struct PollClock {
    last: Instant,
}

impl PollClock {
    /// Clock whose first tick measures from `now`.
    pub fn start(now: Instant) -> Self {
        Self { last: now }
    }

    /// Forget the previous tick; the next one measures from `now`.
    pub fn rebaseline(&mut self, now: Instant) {
        self.last = now;
    }

    /// Milliseconds since the previous tick (or baseline), as a real number.
    pub fn tick(&mut self, now: Instant) -> f64 {
        let dt = now.saturating_duration_since(self.last);
        self.last = now;
        dt.as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_matches_rate_and_clamps() {
        assert_eq!(poll_period(50.0), Duration::from_millis(20));
        assert_eq!(poll_period(0.0), Duration::from_secs(1));
        assert_eq!(poll_period(f64::NAN), poll_period(DEFAULT_POLL_HZ));
        assert!(poll_period(10_000.0) >= Duration::from_micros(4166));
    }

    #[test]
    fn ticks_report_fractional_elapsed_millis() {
        let t0 = Instant::now();
        let mut clock = PollClock::start(t0);
        let dt = clock.tick(t0 + Duration::from_micros(16_500));
        assert!((dt - 16.5).abs() < 1e-9);
        let dt = clock.tick(t0 + Duration::from_micros(33_000));
        assert!((dt - 16.5).abs() < 1e-9);
    }

    #[test]
    fn rebaseline_hides_the_gap() {
        let t0 = Instant::now();
        let mut clock = PollClock::start(t0);
        clock.rebaseline(t0 + Duration::from_secs(30));
        let dt = clock.tick(t0 + Duration::from_secs(30) + Duration::from_millis(5));
        assert!((dt - 5.0).abs() < 1e-9);
    }
}
