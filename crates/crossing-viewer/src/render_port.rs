// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! winit-backed redraw requests.

use crossing_app_core::redraw_port::RedrawPort;
use egui_winit::winit::window::Window;

pub struct WinitRedrawPort {
    window: &'static Window,
}

impl WinitRedrawPort {
    pub fn new(window: &'static Window) -> Self {
        Self { window }
    }
}

impl RedrawPort for WinitRedrawPort {
    fn request_redraw(&self) {
        self.window.request_redraw();
    }
}
