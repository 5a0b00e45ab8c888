// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Input handling: map winit events into UI events and surface changes.

use egui_winit::winit::{
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::ui_state::UiEvent;

#[derive(Debug, Default)]
pub struct InputOutcome {
    pub ui_event: Option<UiEvent>,
    /// New inner size after a resize.
    pub resized: Option<PhysicalSize<u32>>,
    /// DPI changed; the surface should re-measure once layout settles.
    pub rescaled: bool,
}

/// Keyboard shortcuts, shared with the on-screen buttons.
pub fn shortcut(code: KeyCode) -> Option<UiEvent> {
    match code {
        KeyCode::Space => Some(UiEvent::StartPauseClicked),
        KeyCode::KeyR => Some(UiEvent::ResetClicked),
        KeyCode::Escape => Some(UiEvent::ExitRequested),
        _ => None,
    }
}

/// `keyboard_free` is false while an egui widget owns keyboard input.
pub fn handle_window_event(event: &WindowEvent, keyboard_free: bool) -> InputOutcome {
    let mut out = InputOutcome::default();
    match event {
        WindowEvent::CloseRequested => out.ui_event = Some(UiEvent::ExitRequested),
        WindowEvent::Resized(size) => out.resized = Some(*size),
        WindowEvent::ScaleFactorChanged { .. } => out.rescaled = true,
        WindowEvent::KeyboardInput { event, .. } => {
            if let PhysicalKey::Code(code) = event.physical_key {
                if keyboard_free && event.state == ElementState::Pressed && !event.repeat {
                    out.ui_event = shortcut(code);
                }
            }
        }
        _ => {}
    }
    out
}
