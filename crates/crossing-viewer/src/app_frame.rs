// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-frame tick: pull session updates, build the UI, present.

use std::time::Instant;

use crossing_app_core::redraw_port::RedrawPort;
use crossing_session_client::tool::SessionPort;

use crate::{app::App, render, session_logic, ui};

impl App {
    pub fn frame(&mut self) {
        let (win, raw_input) = {
            let Some(vp) = self.viewports.first_mut() else {
                return;
            };
            (vp.window, vp.egui_state.take_egui_input(vp.window))
        };

        let now = Instant::now();
        let snapshot = self.session.poll_snapshot();
        let connectivity = self.session.poll_connectivity();
        let outcome = session_logic::process_session(
            &mut self.ui,
            &mut self.viewer,
            &mut self.toasts,
            snapshot,
            connectivity,
            now,
        );
        if outcome.snapshot_applied || outcome.connectivity_changed {
            self.egui_ctx.request_repaint();
        }

        let frame_ms = now.duration_since(self.viewer.last_frame).as_secs_f32() * 1000.0;
        self.viewer.last_frame = now;
        self.toasts.prune(now);
        let visible_toasts = self.toasts.visible(now);
        let prev_vsync = self.ui.hud.vsync;

        let egui_ctx = self.egui_ctx.clone();
        let full_output = egui_ctx.run(raw_input, |ctx| ui::draw(ctx, self, &visible_toasts, now));

        let Some(vp) = self.viewports.first_mut() else {
            return;
        };
        vp.egui_state
            .handle_platform_output(win, full_output.platform_output);
        if self.ui.hud.vsync != prev_vsync {
            vp.gpu.set_vsync(self.ui.hud.vsync);
        }

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_desc = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [vp.gpu.config.width, vp.gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };
        if render::render_frame(vp, &paint_jobs, full_output.textures_delta, &screen_desc) {
            self.viewer.perf.push(frame_ms);
        }

        vp.redraw_port.request_redraw();
    }
}
