// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Apply session changes: swap in the latest snapshot, track connectivity,
//! raise connect/disconnect toasts.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossing_app_core::toast::{ToastKind, ToastQueue};
use crossing_proto::StateSnapshot;
use crossing_session_client::Connectivity;
use tracing::info;

use crate::{ui_state::ControlSurface, viewer_state::ViewerState};

const NOTICE_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    pub snapshot_applied: bool,
    pub connectivity_changed: bool,
}

/// Fold one frame's worth of session updates into the UI.
///
/// Snapshots are applied regardless of connectivity; one that races ahead of
/// the `Connected` signal is still the newest state the engine sent.
pub(crate) fn process_session(
    ui: &mut ControlSurface,
    viewer: &mut ViewerState,
    toasts: &mut ToastQueue,
    snapshot: Option<Arc<StateSnapshot>>,
    connectivity: Option<Connectivity>,
    now: Instant,
) -> FrameOutcome {
    let mut outcome = FrameOutcome::default();

    if let Some(state) = connectivity {
        let was = ui.connectivity;
        if state != was {
            outcome.connectivity_changed = true;
            ui.connectivity = state;
            match state {
                Connectivity::Connected => {
                    info!(url = %viewer.session.url, "engine connected");
                    toasts.push(
                        ToastKind::Info,
                        "Connected to engine",
                        Some(viewer.session.url.clone()),
                        NOTICE_TTL,
                        now,
                    );
                }
                Connectivity::Disconnected if was == Connectivity::Connected => {
                    info!("engine connection lost");
                    toasts.push(
                        ToastKind::Warn,
                        "Engine connection lost",
                        Some("reconnecting in the background".into()),
                        NOTICE_TTL,
                        now,
                    );
                }
                Connectivity::Disconnected | Connectivity::Connecting => {}
            }
        }
    }

    if let Some(snap) = snapshot {
        ui.reflect(&snap);
        viewer.snapshot = Some(snap);
        outcome.snapshot_applied = true;
    }

    outcome
}
