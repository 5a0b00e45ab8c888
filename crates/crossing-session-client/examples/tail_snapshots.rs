// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headless snapshot tail for checking an engine is alive.
//!
//! Connects to the engine, logs connectivity changes and a one-line summary of
//! each snapshot, and exits after the requested number of snapshots. Useful
//! without the GUI viewer.

use anyhow::{Context, Result};
use crossing_session_client::{connect_channels, Connectivity, SessionConfig};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let url = args
        .next()
        .unwrap_or_else(|| crossing_proto::DEFAULT_ENGINE_URL.to_string());
    let count: usize = args
        .next()
        .as_deref()
        .unwrap_or("10")
        .parse()
        .context("parse snapshot count")?;

    let handle = connect_channels(SessionConfig {
        url,
        ..SessionConfig::default()
    })?;
    let mut conn = handle.subscribe_connectivity();
    let mut snaps = handle.subscribe_snapshots();

    let mut seen = 0;
    while seen < count {
        if conn.has_changed().unwrap_or(false) {
            let state = *conn.borrow_and_update();
            info!(?state, "connectivity");
            if state == Connectivity::Disconnected {
                std::thread::sleep(Duration::from_millis(250));
            }
        }
        if snaps.has_changed().unwrap_or(false) {
            if let Some(snap) = snaps.borrow_and_update().clone() {
                seen += 1;
                info!(
                    controller = snap.controller_label(),
                    running = snap.running,
                    cars = snap.cars.len(),
                    phase_ms = snap.phase_time,
                    "snapshot"
                );
            }
        }
        std::thread::sleep(Duration::from_millis(16));
    }
    Ok(())
}
