// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Sync channel between the Crossing client and the simulation engine.
//!
//! One long-lived Socket.IO connection per session. Inbound `state_update`
//! events are published latest-wins on a watch channel; outbound intents are
//! sent immediately and dropped while not connected; a fixed-rate `update`
//! tick runs while connected. The transport owns reconnection and heartbeats.
//! Tools talk to it through [`SessionHandle`] or the [`tool::SessionPort`]
//! adapter.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossing_proto::{
    wire::{
        decode_packet, encode_client, encode_packet, engine_endpoint, server_event, Handshake,
        Packet,
    },
    ClientMessage, Intent, ServerMessage, StateSnapshot, DEFAULT_ENGINE_URL,
};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

pub mod poll;
pub mod tool;

pub use poll::{poll_period, PollClock, DEFAULT_POLL_HZ};

/// Default wait between reconnect attempts.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(1000);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection parameters for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Engine address (`http://host:port` or a full Socket.IO URL).
    pub url: String,
    /// Outbound `update` tick rate.
    pub poll_hz: f64,
    /// Wait between reconnect attempts.
    pub reconnect_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENGINE_URL.to_string(),
            poll_hz: DEFAULT_POLL_HZ,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

/// Transport readiness as seen by the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Connectivity {
    /// First connection attempt still pending.
    #[default]
    Connecting,
    /// Socket open; polling and intents flow.
    Connected,
    /// Socket lost or refused; retrying in the background.
    Disconnected,
}

impl Connectivity {
    /// True only while the socket is open.
    pub fn is_ready(self) -> bool {
        matches!(self, Connectivity::Connected)
    }
}

/// Latest snapshot slot; `None` until the first `state_update` arrives.
pub type SnapshotSlot = Option<Arc<StateSnapshot>>;

/// UI-side end of a session: subscriptions plus the intent sender.
///
/// Dropping every clone closes the intent channel, which stops the transport.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    intents: mpsc::UnboundedSender<Intent>,
    snapshots: watch::Receiver<SnapshotSlot>,
    connectivity: watch::Receiver<Connectivity>,
}

impl SessionHandle {
    /// Queue an intent for immediate send. Returns `false` once the transport
    /// has shut down.
    pub fn send(&self, intent: Intent) -> bool {
        self.intents.send(intent).is_ok()
    }

    /// Latest-value snapshot subscription.
    pub fn subscribe_snapshots(&self) -> watch::Receiver<SnapshotSlot> {
        self.snapshots.clone()
    }

    /// Latest-value connectivity subscription.
    pub fn subscribe_connectivity(&self) -> watch::Receiver<Connectivity> {
        self.connectivity.clone()
    }
}

/// Transport-side end of a session.
///
/// Also used by tests to stand in for a live connection.
#[derive(Debug)]
pub struct SessionFeed {
    intents: mpsc::UnboundedReceiver<Intent>,
    snapshots: watch::Sender<SnapshotSlot>,
    connectivity: watch::Sender<Connectivity>,
}

impl SessionFeed {
    /// Publish a snapshot, superseding any unconsumed one.
    pub fn publish_snapshot(&self, snapshot: StateSnapshot) {
        self.snapshots.send_replace(Some(Arc::new(snapshot)));
    }

    /// Publish a connectivity change; repeated values are not re-signalled.
    pub fn set_connectivity(&self, state: Connectivity) {
        self.connectivity.send_if_modified(|cur| {
            let changed = *cur != state;
            *cur = state;
            changed
        });
    }

    /// Next queued intent without waiting; `None` when the queue is empty or
    /// every handle is gone.
    pub fn try_next_intent(&mut self) -> Option<Intent> {
        self.intents.try_recv().ok()
    }

    /// Wait for the next intent; `None` once every handle is gone.
    pub async fn next_intent(&mut self) -> Option<Intent> {
        self.intents.recv().await
    }

    /// Drop every queued intent, returning how many were discarded.
    pub fn discard_queued_intents(&mut self) -> usize {
        let mut n = 0;
        while self.intents.try_recv().is_ok() {
            n += 1;
        }
        n
    }
}

/// Fresh, unconnected handle/feed pair.
pub fn channel_pair() -> (SessionHandle, SessionFeed) {
    let (intent_tx, intent_rx) = mpsc::unbounded_channel();
    let (snap_tx, snap_rx) = watch::channel(None);
    let (conn_tx, conn_rx) = watch::channel(Connectivity::default());
    (
        SessionHandle {
            intents: intent_tx,
            snapshots: snap_rx,
            connectivity: conn_rx,
        },
        SessionFeed {
            intents: intent_rx,
            snapshots: snap_tx,
            connectivity: conn_tx,
        },
    )
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Minimal async Socket.IO client joined to the engine's default namespace.
pub struct SessionClient {
    stream: WsStream,
    handshake: Handshake,
    last_seen: Instant,
}

impl SessionClient {
    /// Connect to the engine at `url` and join the default namespace.
    pub async fn connect(url: &str) -> Result<Self> {
        let endpoint = engine_endpoint(url);
        time::timeout(CONNECT_TIMEOUT, Self::open(&endpoint))
            .await
            .with_context(|| format!("connect {endpoint}: timed out"))?
    }

    async fn open(endpoint: &str) -> Result<Self> {
        let (mut stream, _resp) = connect_async(endpoint)
            .await
            .with_context(|| format!("connect {endpoint}"))?;
        let handshake = loop {
            match read_packet(&mut stream).await? {
                Some(Packet::Open(handshake)) => break handshake,
                Some(_) => {}
                None => bail!("engine closed before the open packet"),
            }
        };
        debug!(sid = %handshake.sid, ping_ms = handshake.ping_interval, "engine session opened");
        let mut client = Self {
            stream,
            handshake,
            last_seen: Instant::now(),
        };
        client.send_packet(&Packet::Connect).await?;
        loop {
            match read_packet(&mut client.stream).await? {
                Some(Packet::Connect) => return Ok(client),
                Some(Packet::Ping) => client.send_packet(&Packet::Pong).await?,
                Some(Packet::ConnectError(detail)) => {
                    bail!("engine refused namespace join: {detail}")
                }
                Some(Packet::Close | Packet::Disconnect) | None => {
                    bail!("engine closed during namespace join")
                }
                Some(_) => {}
            }
        }
    }

    async fn send_packet(&mut self, packet: &Packet) -> Result<()> {
        let text = encode_packet(packet)?;
        self.stream.send(Message::Text(text)).await?;
        Ok(())
    }

    /// Send one client event.
    pub async fn send(&mut self, msg: &ClientMessage) -> Result<()> {
        let text = encode_client(msg)?;
        self.stream
            .send(Message::Text(text))
            .await
            .with_context(|| format!("send {}", msg.event_name()))
    }

    /// Next engine event this client understands. Returns `Ok(None)` once the
    /// engine closes the socket or leaves the namespace. Heartbeats are
    /// answered here; unknown events and undecodable payloads are skipped.
    pub async fn poll_message(&mut self) -> Result<Option<ServerMessage>> {
        loop {
            let Some(packet) = read_packet(&mut self.stream).await? else {
                return Ok(None);
            };
            self.last_seen = Instant::now();
            match packet {
                Packet::Event { name, args } => match server_event(&name, args) {
                    Ok(Some(msg)) => return Ok(Some(msg)),
                    Ok(None) => debug!(event = %name, "skipping unknown engine event"),
                    Err(err) => warn!(error = %err, "dropping undecodable snapshot"),
                },
                Packet::Ping => self
                    .send_packet(&Packet::Pong)
                    .await
                    .context("answer engine ping")?,
                Packet::Close | Packet::Disconnect => return Ok(None),
                Packet::ConnectError(detail) => {
                    warn!(%detail, "engine dropped the namespace");
                    return Ok(None);
                }
                Packet::Open(_) | Packet::Pong | Packet::Noop | Packet::Connect => {}
            }
        }
    }

    /// True once the engine has been silent for longer than its announced
    /// ping interval plus ping timeout.
    pub fn is_stale(&self, now: Instant) -> bool {
        let grace = Duration::from_millis(
            self.handshake
                .ping_interval
                .saturating_add(self.handshake.ping_timeout),
        );
        now.saturating_duration_since(self.last_seen) > grace
    }

    /// Leave the namespace and close the socket politely.
    pub async fn close(mut self) -> Result<()> {
        self.send_packet(&Packet::Disconnect).await?;
        self.stream.close(None).await?;
        Ok(())
    }
}

/// Next decodable packet, or `None` once the socket closes.
async fn read_packet(stream: &mut WsStream) -> Result<Option<Packet>> {
    while let Some(frame) = stream.next().await {
        match frame.context("read engine frame")? {
            Message::Text(text) => match decode_packet(&text) {
                Ok(packet) => return Ok(Some(packet)),
                Err(err) => warn!(error = %err, "dropping malformed frame"),
            },
            Message::Close(_) => return Ok(None),
            other => debug!(kind = frame_kind(&other), "skipping non-text frame"),
        }
    }
    Ok(None)
}

fn frame_kind(msg: &Message) -> &'static str {
    match msg {
        Message::Text(_) => "text",
        Message::Binary(_) => "binary",
        Message::Ping(_) => "ping",
        Message::Pong(_) => "pong",
        Message::Close(_) => "close",
        Message::Frame(_) => "raw",
    }
}

/// How a live connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectionEnd {
    /// Engine closed or the socket failed; reconnect.
    Dropped,
    /// Every handle is gone; stop.
    Shutdown,
}

/// Drive a session until every [`SessionHandle`] is dropped.
///
/// Connects, polls, forwards intents and snapshots, and reconnects after
/// `config.reconnect_delay` whenever the socket is refused or lost. Intents
/// issued while not connected are discarded.
pub async fn run_session(config: SessionConfig, mut feed: SessionFeed) -> Result<()> {
    let period = poll_period(config.poll_hz);
    let mut clock = PollClock::start(Instant::now());
    loop {
        match connect_discarding(&config.url, &mut feed).await {
            Ok(Some(client)) => {
                let dropped = feed.discard_queued_intents();
                if dropped > 0 {
                    debug!(dropped, "discarded intents queued while connecting");
                }
                info!(url = %config.url, "connected to engine");
                feed.set_connectivity(Connectivity::Connected);
                clock.rebaseline(Instant::now());
                let end = match drive_connection(client, &mut feed, period, &mut clock).await {
                    Ok(end) => end,
                    Err(err) => {
                        warn!(error = %format!("{err:#}"), "connection failed");
                        ConnectionEnd::Dropped
                    }
                };
                if end == ConnectionEnd::Shutdown {
                    return Ok(());
                }
                info!(url = %config.url, "disconnected from engine");
            }
            Ok(None) => return Ok(()),
            Err(err) => debug!(error = %format!("{err:#}"), "connect attempt failed"),
        }
        feed.set_connectivity(Connectivity::Disconnected);
        let dropped = feed.discard_queued_intents();
        if dropped > 0 {
            debug!(dropped, "discarded intents queued while disconnected");
        }
        if wait_for_retry(&mut feed, config.reconnect_delay).await == ConnectionEnd::Shutdown {
            return Ok(());
        }
    }
}

/// One connect attempt, discarding intents sent meanwhile. `Ok(None)` means
/// every handle dropped before the attempt finished.
async fn connect_discarding(url: &str, feed: &mut SessionFeed) -> Result<Option<SessionClient>> {
    let connect = SessionClient::connect(url);
    tokio::pin!(connect);
    loop {
        tokio::select! {
            res = &mut connect => return res.map(Some),
            intent = feed.next_intent() => match intent {
                Some(intent) => debug!(?intent, "not connected; intent dropped"),
                None => return Ok(None),
            },
        }
    }
}

/// Sleep out the reconnect delay, discarding intents sent meanwhile.
async fn wait_for_retry(feed: &mut SessionFeed, delay: Duration) -> ConnectionEnd {
    let sleep = time::sleep(delay);
    tokio::pin!(sleep);
    loop {
        tokio::select! {
            () = &mut sleep => return ConnectionEnd::Dropped,
            intent = feed.next_intent() => match intent {
                Some(intent) => debug!(?intent, "not connected; intent dropped"),
                None => return ConnectionEnd::Shutdown,
            },
        }
    }
}

async fn drive_connection(
    mut client: SessionClient,
    feed: &mut SessionFeed,
    period: Duration,
    clock: &mut PollClock,
) -> Result<ConnectionEnd> {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                if client.is_stale(now) {
                    warn!("engine heartbeat lost");
                    return Ok(ConnectionEnd::Dropped);
                }
                let delta_time = clock.tick(now);
                client.send(&ClientMessage::Update { delta_time }).await?;
            }
            intent = feed.next_intent() => {
                let Some(intent) = intent else {
                    if let Err(err) = client.close().await {
                        debug!(error = %format!("{err:#}"), "close on shutdown failed");
                    }
                    return Ok(ConnectionEnd::Shutdown);
                };
                let msg = ClientMessage::from(intent);
                debug!(event = msg.event_name(), "sending intent");
                client.send(&msg).await?;
            }
            msg = client.poll_message() => match msg? {
                Some(ServerMessage::StateUpdate(snap)) => feed.publish_snapshot(snap),
                None => return Ok(ConnectionEnd::Dropped),
            },
        }
    }
}

/// Spawn the transport on a background thread and return the UI-side handle.
///
/// The thread hosts a current-thread tokio runtime and exits once every clone
/// of the returned handle is dropped.
pub fn connect_channels(config: SessionConfig) -> Result<SessionHandle> {
    let (handle, feed) = channel_pair();
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build session runtime")?;
    thread::Builder::new()
        .name("crossing-session".into())
        .spawn(move || {
            if let Err(err) = rt.block_on(run_session(config, feed)) {
                warn!(error = %format!("{err:#}"), "session transport stopped");
            }
        })
        .context("spawn session thread")?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_publishes_latest_snapshot_only() {
        let (handle, feed) = channel_pair();
        let mut rx = handle.subscribe_snapshots();
        assert!(!rx.has_changed().unwrap());

        for phase_time in [1.0, 2.0, 3.0] {
            feed.publish_snapshot(StateSnapshot {
                phase_time,
                ..StateSnapshot::default()
            });
        }
        assert!(rx.has_changed().unwrap());
        let latest = rx.borrow_and_update().clone().unwrap();
        assert_eq!(latest.phase_time, 3.0);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn repeated_connectivity_is_not_resignalled() {
        let (handle, feed) = channel_pair();
        let mut rx = handle.subscribe_connectivity();
        assert_eq!(*rx.borrow(), Connectivity::Connecting);
        feed.set_connectivity(Connectivity::Connected);
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_ready());
        feed.set_connectivity(Connectivity::Connected);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn intents_queue_in_order_and_can_be_discarded() {
        let (handle, mut feed) = channel_pair();
        assert!(handle.send(Intent::Start));
        assert!(handle.send(Intent::SetSpeed(2.0)));
        assert_eq!(feed.try_next_intent(), Some(Intent::Start));
        assert!(handle.send(Intent::Reset));
        assert_eq!(feed.discard_queued_intents(), 2);
        assert_eq!(feed.try_next_intent(), None);
    }

    #[test]
    fn handle_reports_closed_transport() {
        let (handle, feed) = channel_pair();
        drop(feed);
        assert!(!handle.send(Intent::Pause));
    }

    #[tokio::test]
    async fn retry_wait_ends_when_handles_drop() {
        let (handle, mut feed) = channel_pair();
        handle.send(Intent::Start);
        drop(handle);
        let end = wait_for_retry(&mut feed, Duration::from_secs(60)).await;
        assert_eq!(end, ConnectionEnd::Shutdown);
    }

    #[tokio::test]
    async fn pending_connect_drops_intents_and_ends_on_shutdown() {
        // Bound but never accepted: the upgrade stays pending.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let (handle, mut feed) = channel_pair();
        assert!(handle.send(Intent::Reset));
        drop(handle);
        let attempt = connect_discarding(&url, &mut feed).await.unwrap();
        assert!(attempt.is_none());
        assert_eq!(feed.try_next_intent(), None);
    }
}
