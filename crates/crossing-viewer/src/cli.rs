// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command-line overrides layered on top of saved preferences.

use clap::Parser;
use crossing_app_core::prefs::ClientPrefs;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "crossing-viewer", version, about = "Traffic intersection viewer")]
pub struct Args {
    /// Engine address (e.g. http://127.0.0.1:3003).
    #[arg(long)]
    pub url: Option<String>,
    /// Outbound `update` tick rate in Hz.
    #[arg(long)]
    pub poll_hz: Option<f64>,
    /// Padding subtracted from each axis before squaring the drawing surface.
    #[arg(long)]
    pub padding: Option<f32>,
    /// Persist the effective settings as the new saved preferences.
    #[arg(long)]
    pub save_prefs: bool,
}

impl Args {
    /// Saved prefs with any flags given on the command line applied.
    pub fn apply(&self, stored: &ClientPrefs) -> ClientPrefs {
        let mut out = stored.clone();
        if let Some(url) = &self.url {
            out.session.url.clone_from(url);
        }
        if let Some(hz) = self.poll_hz {
            out.session.poll_hz = hz;
        }
        if let Some(padding) = self.padding {
            out.surface.padding = padding;
        }
        out.sanitized()
    }
}
