// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tool-facing session adapter: channels + port trait.
//!
//! `SessionPort` is what the viewer's frame loop drives. `ChannelSession`
//! implements it over a [`SessionHandle`] returned from
//! [`crate::connect_channels`] (or [`crate::channel_pair`] in tests), so the
//! UI never sees the socket.

use std::sync::Arc;

use crossing_proto::{Intent, StateSnapshot};
use tokio::sync::watch;
use tracing::debug;

use crate::{Connectivity, SessionHandle, SnapshotSlot};

/// Abstract port for exchanging snapshots and intents with the engine.
pub trait SessionPort {
    /// Latest snapshot if it changed since the previous call.
    fn poll_snapshot(&mut self) -> Option<Arc<StateSnapshot>>;
    /// Connectivity if it changed since the previous call.
    fn poll_connectivity(&mut self) -> Option<Connectivity>;
    /// Fire-and-forget an intent.
    fn send_intent(&mut self, intent: Intent);
}

/// Channel-backed session adapter for tools.
#[derive(Default)]
pub struct ChannelSession {
    handle: Option<SessionHandle>,
    snapshots: Option<watch::Receiver<SnapshotSlot>>,
    connectivity: Option<watch::Receiver<Connectivity>>,
}

impl ChannelSession {
    /// Construct a new, unattached adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach to a live session.
    pub fn set_handle(&mut self, handle: SessionHandle) {
        let mut connectivity = handle.subscribe_connectivity();
        // Report the current state on the first poll.
        connectivity.mark_changed();
        self.snapshots = Some(handle.subscribe_snapshots());
        self.connectivity = Some(connectivity);
        self.handle = Some(handle);
    }

    /// Detach; dropping the handle lets the transport shut down.
    pub fn clear(&mut self) {
        self.handle = None;
        self.snapshots = None;
        self.connectivity = None;
    }
}

impl SessionPort for ChannelSession {
    fn poll_snapshot(&mut self) -> Option<Arc<StateSnapshot>> {
        let rx = self.snapshots.as_mut()?;
        if !rx.has_changed().unwrap_or(false) {
            return None;
        }
        rx.borrow_and_update().clone()
    }

    fn poll_connectivity(&mut self) -> Option<Connectivity> {
        let rx = self.connectivity.as_mut()?;
        match rx.has_changed() {
            Ok(true) => Some(*rx.borrow_and_update()),
            Ok(false) => None,
            Err(_) => {
                // Transport gone for good.
                self.connectivity = None;
                Some(Connectivity::Disconnected)
            }
        }
    }

    fn send_intent(&mut self, intent: Intent) {
        match &self.handle {
            Some(handle) if handle.send(intent) => {}
            _ => debug!(?intent, "no session; intent dropped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel_pair;

    #[test]
    fn unattached_session_is_inert() {
        let mut s = ChannelSession::new();
        assert!(s.poll_snapshot().is_none());
        assert!(s.poll_connectivity().is_none());
        s.send_intent(Intent::Reset);
    }

    #[test]
    fn first_poll_reports_current_connectivity() {
        let (handle, feed) = channel_pair();
        let mut s = ChannelSession::new();
        s.set_handle(handle);
        assert_eq!(s.poll_connectivity(), Some(Connectivity::Connecting));
        assert_eq!(s.poll_connectivity(), None);
        feed.set_connectivity(Connectivity::Connected);
        assert_eq!(s.poll_connectivity(), Some(Connectivity::Connected));
    }

    #[test]
    fn snapshots_are_latest_wins() {
        let (handle, feed) = channel_pair();
        let mut s = ChannelSession::new();
        s.set_handle(handle);
        assert!(s.poll_snapshot().is_none());
        feed.publish_snapshot(StateSnapshot {
            total_cars: 1,
            ..StateSnapshot::default()
        });
        feed.publish_snapshot(StateSnapshot {
            total_cars: 2,
            ..StateSnapshot::default()
        });
        assert_eq!(s.poll_snapshot().map(|s| s.total_cars), Some(2));
        assert!(s.poll_snapshot().is_none());
    }

    #[test]
    fn intents_reach_the_feed() {
        let (handle, mut feed) = channel_pair();
        let mut s = ChannelSession::new();
        s.set_handle(handle);
        s.send_intent(Intent::SpawnVip(crossing_proto::Direction::North));
        assert_eq!(
            feed.try_next_intent(),
            Some(Intent::SpawnVip(crossing_proto::Direction::North))
        );
    }

    #[test]
    fn dropped_transport_reads_as_disconnected() {
        let (handle, feed) = channel_pair();
        let mut s = ChannelSession::new();
        s.set_handle(handle);
        let _ = s.poll_connectivity();
        drop(feed);
        assert_eq!(s.poll_connectivity(), Some(Connectivity::Disconnected));
        assert_eq!(s.poll_connectivity(), None);
    }
}
