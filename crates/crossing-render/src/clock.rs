// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wall-clock source for time-varying visuals (VIP beacon pulse).

use std::time::{SystemTime, UNIX_EPOCH};

/// Millisecond clock injected into the renderer.
pub trait Clock {
    /// Current time in milliseconds. Only differences and phase matter.
    fn now_ms(&self) -> f64;
}

/// Real wall clock (milliseconds since the Unix epoch).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64() * 1000.0)
    }
}

/// Frozen clock for deterministic frames.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now_ms(&self) -> f64 {
        self.0
    }
}
