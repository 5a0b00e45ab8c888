// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Top-level application wiring and event loop handler.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossing_app_core::{
    config::ConfigService,
    config_port::ConfigPort,
    prefs::ClientPrefs,
    toast::{ToastKind, ToastQueue},
};
use crossing_config_fs::FsConfigStore;
use crossing_session_client::{connect_channels, tool::ChannelSession, SessionConfig};
use egui_winit::winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowAttributes, WindowId},
};
use egui_winit::State as EguiWinitState;
use tracing::{error, info, warn};

use crate::{
    cli::Args,
    gpu::Gpu,
    render_port::WinitRedrawPort,
    ui_effects::{RealEffectsRunner, UiEffectsRunner},
    ui_state::{self, ControlSurface, UiEvent},
    viewer_state::ViewerState,
    viewport::Viewport,
};

const TOAST_CAPACITY: usize = 8;
const NOTICE_TTL: Duration = Duration::from_secs(6);

pub struct App {
    pub viewports: Vec<Viewport>,
    pub egui_ctx: egui::Context,
    pub config: Option<Box<dyn ConfigPort>>,
    pub ui_runner: RealEffectsRunner,
    pub toasts: ToastQueue,
    pub session: ChannelSession,
    pub ui: ControlSurface,
    pub viewer: ViewerState,
    session_config: SessionConfig,
    init_failed: bool,
    shutdown_requested: bool,
}

impl App {
    pub fn new(args: &Args) -> Self {
        let now = Instant::now();
        let mut toasts = ToastQueue::new(TOAST_CAPACITY);
        let config = match FsConfigStore::new() {
            Ok(store) => Some(Box::new(ConfigService::new(store)) as Box<dyn ConfigPort>),
            Err(err) => {
                warn!(error = %err, "config store unavailable");
                toasts.push(
                    ToastKind::Warn,
                    "Config store unavailable",
                    Some("preferences won't persist this session".into()),
                    NOTICE_TTL,
                    now,
                );
                None
            }
        };
        let stored = match config.as_deref().map(ConfigPort::load_prefs) {
            Some(Ok(Some(prefs))) => prefs,
            Some(Ok(None)) | None => ClientPrefs::default(),
            Some(Err(err)) => {
                warn!(error = %err, "saved preferences unreadable; using defaults");
                toasts.push(
                    ToastKind::Warn,
                    "Preferences unreadable",
                    Some(err.to_string()),
                    NOTICE_TTL,
                    now,
                );
                ClientPrefs::default()
            }
        };
        let prefs = args.apply(&stored);
        if args.save_prefs {
            if let Some(cfg) = &config {
                match cfg.save_prefs(&prefs) {
                    Ok(()) => info!("preferences saved"),
                    Err(err) => {
                        warn!(error = %err, "saving preferences failed");
                        toasts.push(
                            ToastKind::Error,
                            "Preferences not saved",
                            Some(err.to_string()),
                            NOTICE_TTL,
                            now,
                        );
                    }
                }
            }
        }

        Self {
            viewports: Vec::new(),
            egui_ctx: egui::Context::default(),
            config,
            ui_runner: RealEffectsRunner,
            toasts,
            session: ChannelSession::new(),
            ui: ControlSurface::new(prefs.hud.clone()),
            viewer: ViewerState::new(&prefs),
            session_config: SessionConfig {
                url: prefs.session.url.clone(),
                poll_hz: prefs.session.poll_hz,
                reconnect_delay: Duration::from_millis(prefs.session.reconnect_ms),
            },
            init_failed: false,
            shutdown_requested: false,
        }
    }

    pub fn apply_ui_event(&mut self, ev: UiEvent) {
        match &ev {
            UiEvent::Notice { title, body } => {
                self.toasts.push(
                    ToastKind::Warn,
                    title.clone(),
                    body.clone(),
                    NOTICE_TTL,
                    Instant::now(),
                );
            }
            UiEvent::ShutdownRequested => self.shutdown_requested = true,
            _ => {}
        }
        let (next, effects) = ui_state::reduce(&self.ui, ev);
        self.ui = next;
        let prefs = self.viewer.export_prefs(&self.ui.hud);
        let followups =
            self.ui_runner
                .run(effects, &mut self.session, self.config.as_deref(), &prefs);
        for ev in followups {
            self.apply_ui_event(ev);
        }
    }

    fn create_viewport(&self, event_loop: &ActiveEventLoop) -> Result<Viewport> {
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title("Crossing")
                    .with_inner_size(LogicalSize::new(1120.0, 760.0))
                    .with_visible(true),
            )
            .context("create window")?;
        let window: &'static Window = Box::leak(Box::new(window));
        let gpu = pollster::block_on(Gpu::new(window, self.ui.hud.vsync))?;
        let egui_state = EguiWinitState::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            event_loop,
            None,
            None,
            usize::try_from(gpu.max_tex).ok(),
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.config.format,
            egui_wgpu::RendererOptions::default(),
        );
        Ok(Viewport {
            window,
            gpu,
            egui_state,
            egui_renderer,
            redraw_port: WinitRedrawPort::new(window),
        })
    }

    fn start_session(&mut self) {
        match connect_channels(self.session_config.clone()) {
            Ok(handle) => {
                info!(
                    url = %self.session_config.url,
                    poll_hz = self.session_config.poll_hz,
                    "session started"
                );
                self.session.set_handle(handle);
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), "session transport failed to start");
                self.toasts.push(
                    ToastKind::Error,
                    "Engine link unavailable",
                    Some(format!("{err:#}")),
                    NOTICE_TTL,
                    Instant::now(),
                );
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.viewports.is_empty() || self.init_failed {
            return;
        }
        match self.create_viewport(event_loop) {
            Ok(vp) => {
                self.viewports.push(vp);
                self.start_session();
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), "drawing surface unavailable; exiting");
                self.init_failed = true;
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        self.handle_window_event(window_id, event);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewports.is_empty() {
            return;
        }
        if self.shutdown_requested {
            // Drops the handle; the transport thread winds down on its own.
            self.session.clear();
            event_loop.exit();
            return;
        }
        self.frame();
    }
}
