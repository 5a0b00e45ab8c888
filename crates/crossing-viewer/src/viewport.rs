// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Window + GPU + egui bundle, and the square drawing-surface sizing that
//! tracks the layout space the control panel leaves over.

use std::time::{Duration, Instant};

use crate::{gpu::Gpu, render_port::WinitRedrawPort};
use crossing_render::{fit_square, SurfaceSize};
use egui_wgpu::Renderer;
use egui_winit::winit::window::Window;
use egui_winit::State as EguiWinitState;
use tracing::debug;

pub struct Viewport {
    pub window: &'static Window,
    pub gpu: Gpu,
    pub egui_state: EguiWinitState,
    pub egui_renderer: Renderer,
    pub redraw_port: WinitRedrawPort,
}

/// Delay between a scale-factor change and the re-measure that follows it.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Derives the square surface edge from the space available to it.
///
/// Layout is observed every frame; after a scale-factor change the previous
/// size is held until [`SETTLE_DELAY`] has passed so one half-updated layout
/// does not flash through.
#[derive(Debug, Clone)]
pub struct SurfaceManager {
    padding: f32,
    size: SurfaceSize,
    settle_at: Option<Instant>,
}

impl SurfaceManager {
    pub fn new(padding: f32) -> Self {
        Self {
            padding,
            size: SurfaceSize::square(0.0),
            settle_at: None,
        }
    }

    pub fn current_size(&self) -> SurfaceSize {
        self.size
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Hold the current size until the layout has settled.
    pub fn schedule_settle(&mut self, now: Instant) {
        self.settle_at = Some(now + SETTLE_DELAY);
    }

    /// Re-measure against the available box unless a settle is pending.
    pub fn observe(&mut self, available_w: f32, available_h: f32, now: Instant) {
        if let Some(at) = self.settle_at {
            if now < at {
                return;
            }
            self.settle_at = None;
        }
        let next = fit_square(available_w, available_h, self.padding);
        if next != self.size {
            if next.is_empty() {
                debug!(available_w, available_h, "drawing surface collapsed to zero");
            }
            self.size = next;
        }
    }
}
