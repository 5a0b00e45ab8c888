// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Control surface state: pure transitions for user actions plus `reflect`,
//! which folds an authoritative snapshot back into read-outs and controls.
//!
//! Sliders under an active drag belong to the user; reflect leaves them alone.
//! Otherwise a slider is only rewritten when the engine's value differs, so a
//! value the user just sent comes back as a no-op instead of a jump.

use crossing_app_core::prefs::HudPrefs;
use crossing_proto::{
    ControllerKind, Direction, Intent, StateSnapshot, DEFAULT_SPAWN_RATE, DEFAULT_SPEED,
    SPAWN_RATE_RANGE, SPEED_RANGE,
};
use crossing_session_client::Connectivity;

/// Which parameter slider an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderKind {
    SpawnRate,
    Speed,
}

impl SliderKind {
    pub fn range(self) -> (f64, f64) {
        match self {
            Self::SpawnRate => SPAWN_RATE_RANGE,
            Self::Speed => SPEED_RANGE,
        }
    }

    pub fn step(self) -> f64 {
        match self {
            Self::SpawnRate => 0.1,
            Self::Speed => 0.05,
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            Self::SpawnRate => "Spawn interval",
            Self::Speed => "Speed",
        }
    }

    pub fn label_for(self, value: f64) -> String {
        match self {
            Self::SpawnRate => format!("{value:.1}s"),
            Self::Speed => format!("{value:.2}x"),
        }
    }

    fn intent(self, value: f64) -> Intent {
        match self {
            Self::SpawnRate => Intent::SetSpawnRate(value),
            Self::Speed => Intent::SetSpeed(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    pub kind: SliderKind,
    pub value: f64,
    pub label: String,
    pub dragging: bool,
}

impl Slider {
    fn new(kind: SliderKind, value: f64) -> Self {
        Self {
            kind,
            value,
            label: kind.label_for(value),
            dragging: false,
        }
    }

    fn set(&mut self, value: f64) {
        self.value = value;
        self.label = self.kind.label_for(value);
    }

    fn reflect(&mut self, authoritative: Option<f64>) {
        if self.dragging {
            return;
        }
        match authoritative {
            Some(v) if v.is_finite() && (v - self.value).abs() > f64::EPSILON => self.set(v),
            _ => {}
        }
    }
}

/// Human-readable mirror of the latest snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Readouts {
    /// Waiting counts in `Direction::ALL` order.
    pub queues: [u32; 4],
    pub phase: String,
    pub total_cars: u64,
    pub vip_cars: u64,
    pub controller_badge: String,
}

impl Default for Readouts {
    fn default() -> Self {
        Self {
            queues: [0; 4],
            phase: "0.0s".into(),
            total_cars: 0,
            vip_cars: 0,
            controller_badge: ControllerKind::FixedTime.display_name().into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlSurface {
    pub spawn_rate: Slider,
    pub speed: Slider,
    pub running: bool,
    /// Wire name of the controller marked active in the selector.
    pub active_controller: String,
    pub readouts: Readouts,
    pub connectivity: Connectivity,
    pub hud: HudPrefs,
}

impl ControlSurface {
    pub fn new(hud: HudPrefs) -> Self {
        Self {
            spawn_rate: Slider::new(SliderKind::SpawnRate, DEFAULT_SPAWN_RATE),
            speed: Slider::new(SliderKind::Speed, DEFAULT_SPEED),
            running: false,
            active_controller: ControllerKind::FixedTime.wire_name().into(),
            readouts: Readouts::default(),
            connectivity: Connectivity::default(),
            hud,
        }
    }

    pub fn slider(&self, kind: SliderKind) -> &Slider {
        match kind {
            SliderKind::SpawnRate => &self.spawn_rate,
            SliderKind::Speed => &self.speed,
        }
    }

    fn slider_mut(&mut self, kind: SliderKind) -> &mut Slider {
        match kind {
            SliderKind::SpawnRate => &mut self.spawn_rate,
            SliderKind::Speed => &mut self.speed,
        }
    }

    /// Engine reachable; the disconnected overlay is hidden.
    pub fn ready(&self) -> bool {
        self.connectivity.is_ready()
    }

    pub fn start_pause_label(&self) -> &'static str {
        if self.running {
            "Pause"
        } else {
            "Start"
        }
    }

    pub fn is_active(&self, kind: ControllerKind) -> bool {
        self.active_controller == kind.wire_name()
    }

    /// Fold an authoritative snapshot into read-outs and control positions.
    pub fn reflect(&mut self, snap: &StateSnapshot) {
        for (slot, dir) in self.readouts.queues.iter_mut().zip(Direction::ALL) {
            *slot = snap.queues.get(dir);
        }
        self.readouts.phase = format!("{:.1}s", snap.phase_time / 1000.0);
        self.readouts.total_cars = snap.total_cars;
        self.readouts.vip_cars = snap.vip_cars;
        self.readouts.controller_badge = snap.controller_label().to_string();
        self.active_controller.clone_from(&snap.controller);
        self.running = snap.running;
        self.spawn_rate.reflect(snap.spawn_rate);
        self.speed.reflect(snap.speed_multiplier);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    StartPauseClicked,
    ResetClicked,
    /// User moved a slider to `value`.
    SliderMoved { slider: SliderKind, value: f64 },
    /// Pointer grabbed (`true`) or released (`false`) a slider.
    SliderDrag { slider: SliderKind, active: bool },
    ControllerClicked(ControllerKind),
    SpawnVipClicked(Direction),
    ToggleFps,
    ToggleVsync,
    SavePrefs,
    ExitRequested,
    /// Local notice raised by an effect.
    Notice { title: String, body: Option<String> },
    ShutdownRequested,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEffect {
    Send(Intent),
    SavePrefs,
    QuitApp,
}

pub fn reduce(ui: &ControlSurface, ev: UiEvent) -> (ControlSurface, Vec<UiEffect>) {
    let mut next = ui.clone();
    let mut fx = Vec::new();
    match ev {
        UiEvent::StartPauseClicked => {
            fx.push(UiEffect::Send(if next.running {
                Intent::Pause
            } else {
                Intent::Start
            }));
        }
        UiEvent::ResetClicked => fx.push(UiEffect::Send(Intent::Reset)),
        UiEvent::SliderMoved { slider, value } => {
            let (lo, hi) = slider.range();
            if value.is_finite() {
                let value = value.clamp(lo, hi);
                next.slider_mut(slider).set(value);
                fx.push(UiEffect::Send(slider.intent(value)));
            }
        }
        UiEvent::SliderDrag { slider, active } => next.slider_mut(slider).dragging = active,
        UiEvent::ControllerClicked(kind) => {
            if !next.is_active(kind) {
                // Optimistic; the next snapshot confirms or corrects.
                next.active_controller = kind.wire_name().into();
                fx.push(UiEffect::Send(Intent::ChangeController(kind)));
            }
        }
        UiEvent::SpawnVipClicked(dir) => fx.push(UiEffect::Send(Intent::SpawnVip(dir))),
        UiEvent::ToggleFps => next.hud.show_fps = !next.hud.show_fps,
        UiEvent::ToggleVsync => next.hud.vsync = !next.hud.vsync,
        UiEvent::SavePrefs => fx.push(UiEffect::SavePrefs),
        UiEvent::ExitRequested => fx.push(UiEffect::QuitApp),
        UiEvent::Notice { .. } | UiEvent::ShutdownRequested => {}
    }
    (next, fx)
}
