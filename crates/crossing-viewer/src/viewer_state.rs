// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Coordinator-owned view state: the held snapshot plus render bookkeeping.

use std::sync::Arc;
use std::time::Instant;

use crate::{perf::PerfStats, viewport::SurfaceManager};
use crossing_app_core::prefs::{ClientPrefs, HudPrefs, SessionPrefs, SurfacePrefs};
use crossing_proto::StateSnapshot;

#[derive(Debug)]
pub struct ViewerState {
    /// Latest authoritative snapshot; replaced wholesale, never edited.
    pub snapshot: Option<Arc<StateSnapshot>>,
    pub surface: SurfaceManager,
    pub perf: PerfStats,
    pub last_frame: Instant,
    pub session: SessionPrefs,
}

impl ViewerState {
    pub fn new(prefs: &ClientPrefs) -> Self {
        Self {
            snapshot: None,
            surface: SurfaceManager::new(prefs.surface.padding),
            perf: PerfStats::default(),
            last_frame: Instant::now(),
            session: prefs.session.clone(),
        }
    }

    pub fn export_prefs(&self, hud: &HudPrefs) -> ClientPrefs {
        ClientPrefs {
            session: self.session.clone(),
            surface: SurfacePrefs {
                padding: self.surface.padding(),
            },
            hud: hud.clone(),
        }
    }
}
