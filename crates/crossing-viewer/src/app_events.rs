// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Window-event handling for the App.

use std::time::Instant;

use crate::{app::App, input};
use egui_winit::winit::{event::WindowEvent, window::WindowId};

impl App {
    pub fn handle_window_event(&mut self, window_id: WindowId, event: WindowEvent) {
        let Some(idx) = self
            .viewports
            .iter()
            .position(|v| v.window.id() == window_id)
        else {
            return;
        };
        let win = self.viewports[idx].window;

        let outcome = input::handle_window_event(&event, !self.egui_ctx.wants_keyboard_input());
        if let Some(size) = outcome.resized {
            self.viewports[idx].gpu.resize(size);
        }
        if outcome.rescaled {
            self.viewports[idx].gpu.resize(win.inner_size());
            self.viewer.surface.schedule_settle(Instant::now());
        }
        if let Some(ev) = outcome.ui_event {
            self.apply_ui_event(ev);
        }

        if let Some(vp) = self.viewports.get_mut(idx) {
            let _ = vp.egui_state.on_window_event(win, &event);
        }
    }
}
