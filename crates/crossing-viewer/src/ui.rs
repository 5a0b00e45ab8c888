// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Stateless egui render helpers: control panel, drawing surface, HUD, overlay.

use std::time::Instant;

use crossing_app_core::toast::{ToastKind, ToastView};
use crossing_proto::{ControllerKind, Direction};
use crossing_render::SystemClock;
use crossing_session_client::Connectivity;
use egui::{Align2, Color32, Context, FontId, RichText};

use crate::{
    app::App,
    egui_canvas::EguiCanvas,
    ui_state::{SliderKind, UiEvent},
};

pub fn draw(ctx: &Context, app: &mut App, toasts: &[ToastView], now: Instant) {
    draw_control_panel(ctx, app);
    draw_surface(ctx, app, now);
    draw_hud(ctx, app, toasts);
    if !app.ui.ready() {
        draw_connectivity_overlay(ctx, app.ui.connectivity, &app.viewer.session.url);
    }
}

fn direction_label(dir: Direction) -> &'static str {
    match dir {
        Direction::North => "North",
        Direction::South => "South",
        Direction::East => "East",
        Direction::West => "West",
    }
}

fn draw_control_panel(ctx: &Context, app: &mut App) {
    egui::SidePanel::left("controls")
        .resizable(false)
        .default_width(250.0)
        .show(ctx, |ui| {
            ui.add_space(8.0);
            ui.heading("Crossing");
            ui.label(RichText::new(app.ui.readouts.controller_badge.as_str()).strong());
            ui.separator();

            egui::Grid::new("queues").num_columns(2).show(ui, |ui| {
                for (dir, waiting) in Direction::ALL.into_iter().zip(app.ui.readouts.queues) {
                    ui.label(direction_label(dir));
                    ui.label(waiting.to_string());
                    ui.end_row();
                }
                ui.label("Phase time");
                ui.label(app.ui.readouts.phase.as_str());
                ui.end_row();
                ui.label("Total cars");
                ui.label(app.ui.readouts.total_cars.to_string());
                ui.end_row();
                ui.label("VIP cars");
                ui.label(app.ui.readouts.vip_cars.to_string());
                ui.end_row();
            });
            ui.separator();

            ui.horizontal(|ui| {
                if ui.button(app.ui.start_pause_label()).clicked() {
                    app.apply_ui_event(UiEvent::StartPauseClicked);
                }
                if ui.button("Reset").clicked() {
                    app.apply_ui_event(UiEvent::ResetClicked);
                }
            });
            ui.add_space(6.0);
            slider_row(ui, app, SliderKind::SpawnRate);
            slider_row(ui, app, SliderKind::Speed);
            ui.separator();

            ui.label("Controller");
            for kind in ControllerKind::ALL {
                if ui
                    .selectable_label(app.ui.is_active(kind), kind.display_name())
                    .clicked()
                {
                    app.apply_ui_event(UiEvent::ControllerClicked(kind));
                }
            }
            ui.separator();

            ui.label("Spawn VIP");
            ui.horizontal_wrapped(|ui| {
                for dir in Direction::ALL {
                    if ui.button(direction_label(dir)).clicked() {
                        app.apply_ui_event(UiEvent::SpawnVipClicked(dir));
                    }
                }
            });
            ui.separator();

            let mut show_fps = app.ui.hud.show_fps;
            if ui.checkbox(&mut show_fps, "Show FPS").changed() {
                app.apply_ui_event(UiEvent::ToggleFps);
            }
            let mut vsync = app.ui.hud.vsync;
            if ui.checkbox(&mut vsync, "VSync").changed() {
                app.apply_ui_event(UiEvent::ToggleVsync);
            }
            if ui.button("Save preferences").clicked() {
                app.apply_ui_event(UiEvent::SavePrefs);
            }
            ui.add_space(6.0);
            ui.small("Space start/pause · R reset · Esc quit");
        });
}

fn slider_row(ui: &mut egui::Ui, app: &mut App, kind: SliderKind) {
    let (lo, hi) = kind.range();
    let mut value = app.ui.slider(kind).value;
    let was_dragging = app.ui.slider(kind).dragging;
    ui.label(kind.caption());
    ui.horizontal(|ui| {
        let resp = ui.add(
            egui::Slider::new(&mut value, lo..=hi)
                .step_by(kind.step())
                .show_value(false),
        );
        let dragging = resp.dragged();
        if dragging && !was_dragging {
            app.apply_ui_event(UiEvent::SliderDrag {
                slider: kind,
                active: true,
            });
        }
        if resp.changed() {
            app.apply_ui_event(UiEvent::SliderMoved {
                slider: kind,
                value,
            });
        }
        if !dragging && was_dragging {
            app.apply_ui_event(UiEvent::SliderDrag {
                slider: kind,
                active: false,
            });
        }
        ui.label(app.ui.slider(kind).label.as_str());
    });
}

fn draw_surface(ctx: &Context, app: &mut App, now: Instant) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let avail = ui.available_rect_before_wrap();
        app.viewer
            .surface
            .observe(avail.width(), avail.height(), now);
        let size = app.viewer.surface.current_size();
        if size.is_empty() {
            return;
        }
        let rect = egui::Rect::from_center_size(avail.center(), egui::vec2(size.edge(), size.edge()));
        let painter = ui.painter_at(rect);
        match &app.viewer.snapshot {
            Some(snapshot) => {
                let mut canvas = EguiCanvas::new(&painter, rect.min);
                crossing_render::render(snapshot, size, &SystemClock, &mut canvas);
            }
            None => {
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    "Waiting for the first snapshot",
                    FontId::proportional(16.0),
                    Color32::GRAY,
                );
            }
        }
    });
}

fn toast_color(kind: ToastKind) -> Color32 {
    match kind {
        ToastKind::Info => Color32::from_rgb(120, 190, 255),
        ToastKind::Warn => Color32::from_rgb(255, 200, 80),
        ToastKind::Error => Color32::from_rgb(255, 100, 100),
    }
}

fn draw_hud(ctx: &Context, app: &App, toasts: &[ToastView]) {
    if app.ui.hud.show_fps {
        egui::Area::new(egui::Id::new("fps"))
            .anchor(Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
            .show(ctx, |ui| {
                ui.label(format!("FPS: {:.0}", app.viewer.perf.fps()));
            });
    }

    egui::Area::new(egui::Id::new("toasts"))
        .anchor(Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
        .show(ctx, |ui| {
            for t in toasts {
                egui::Frame::popup(ui.style())
                    .multiply_with_opacity(t.remaining.mul_add(0.6, 0.4))
                    .show(ui, |ui| {
                        ui.colored_label(toast_color(t.kind), t.title.as_str());
                        if let Some(body) = &t.body {
                            ui.small(body.as_str());
                        }
                    });
            }
        });
}

fn draw_connectivity_overlay(ctx: &Context, connectivity: Connectivity, url: &str) {
    let headline = match connectivity {
        Connectivity::Connecting => "Connecting to engine",
        Connectivity::Connected | Connectivity::Disconnected => "Engine disconnected",
    };
    egui::Area::new(egui::Id::new("connectivity"))
        .anchor(Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading(headline);
                    ui.label(url);
                    ui.small("Retrying automatically.");
                });
            });
        });
}
