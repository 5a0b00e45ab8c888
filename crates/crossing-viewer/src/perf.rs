// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rolling frame-interval tracker for the FPS read-out.

use std::collections::VecDeque;

const WINDOW: usize = 60;

#[derive(Clone, Debug)]
pub struct PerfStats {
    frame_ms: VecDeque<f32>,
}

impl Default for PerfStats {
    fn default() -> Self {
        Self {
            frame_ms: VecDeque::with_capacity(WINDOW),
        }
    }
}

impl PerfStats {
    /// Record the interval since the previous frame.
    pub fn push(&mut self, frame_ms: f32) {
        if !frame_ms.is_finite() || frame_ms <= 0.0 {
            return;
        }
        if self.frame_ms.len() == WINDOW {
            self.frame_ms.pop_front();
        }
        self.frame_ms.push_back(frame_ms);
    }

    /// Frames per second averaged over the recent window; 0 before any sample.
    #[allow(clippy::cast_precision_loss)]
    pub fn fps(&self) -> f32 {
        if self.frame_ms.is_empty() {
            return 0.0;
        }
        let mean = self.frame_ms.iter().sum::<f32>() / self.frame_ms.len() as f32;
        1000.0 / mean
    }
}
