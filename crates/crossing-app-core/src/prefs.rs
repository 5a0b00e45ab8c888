// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Saved client preferences (engine session, surface layout, HUD flags).
//!
//! Every field has a default, so partial or older files still load.

use crossing_proto::DEFAULT_ENGINE_URL;
use serde::{Deserialize, Serialize};

/// Config key the viewer stores its preferences under.
pub const PREFS_KEY: &str = "client-prefs";

/// Saved preferences for the Crossing viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClientPrefs {
    /// Engine connection.
    pub session: SessionPrefs,
    /// Drawing-surface layout.
    pub surface: SurfacePrefs,
    /// HUD toggles.
    pub hud: HudPrefs,
}

impl ClientPrefs {
    /// Copy with out-of-range values pulled back to something usable.
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();
        let d = SessionPrefs::default();
        if out.session.url.trim().is_empty() {
            out.session.url = d.url;
        }
        if !out.session.poll_hz.is_finite() || out.session.poll_hz <= 0.0 {
            out.session.poll_hz = d.poll_hz;
        }
        out.session.reconnect_ms = out.session.reconnect_ms.max(50);
        if !out.surface.padding.is_finite() || out.surface.padding < 0.0 {
            out.surface.padding = SurfacePrefs::default().padding;
        }
        out
    }
}

/// Engine connection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionPrefs {
    /// Engine address (`http://host:port` or a full Socket.IO URL).
    pub url: String,
    /// Outbound `update` tick rate.
    pub poll_hz: f64,
    /// Wait between reconnect attempts, in milliseconds.
    pub reconnect_ms: u64,
}

impl Default for SessionPrefs {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENGINE_URL.to_string(),
            poll_hz: 60.0,
            reconnect_ms: 1000,
        }
    }
}

/// Drawing-surface layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfacePrefs {
    /// Pixels removed from each axis of the layout box before squaring.
    pub padding: f32,
}

impl Default for SurfacePrefs {
    fn default() -> Self {
        Self { padding: 64.0 }
    }
}

/// HUD toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudPrefs {
    /// Show the FPS read-out.
    pub show_fps: bool,
    /// Present in vsync mode.
    pub vsync: bool,
}

impl Default for HudPrefs {
    fn default() -> Self {
        Self {
            show_fps: true,
            vsync: true,
        }
    }
}
