// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! crossing-viewer: intersection visualizer and control surface. Main wires App into winit.

use anyhow::Result;
use clap::Parser;
use egui_winit::winit::event_loop::EventLoop;
use tracing_subscriber::EnvFilter;

mod app;
mod app_events;
mod app_frame;
mod cli;
mod egui_canvas;
mod gpu;
mod input;
mod perf;
mod render;
mod render_port;
mod session_logic;
mod ui;
mod ui_effects;
mod ui_state;
mod viewer_state;
mod viewport;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let event_loop = EventLoop::new()?;
    let mut app = app::App::new(&args);
    event_loop.run_app(&mut app)?;
    Ok(())
}
