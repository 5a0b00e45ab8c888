// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Real Socket.IO round trips against an in-process engine stand-in.

use std::time::Duration;

use crossing_proto::wire::{decode_client, decode_packet, encode_server, Packet};
use crossing_proto::{ClientMessage, Intent, ServerMessage, StateSnapshot};
use crossing_session_client::{channel_pair, run_session, Connectivity, SessionConfig};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_hdr_async, WebSocketStream};

const WAIT: Duration = Duration::from_secs(5);
const OPEN: &str =
    r#"0{"sid":"eio-sid","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;
const JOINED: &str = r#"40{"sid":"ns-sid"}"#;

type Engine = WebSocketStream<TcpStream>;

async fn listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    (listener, url)
}

/// Accept one socket, check the request path, and send the open packet.
async fn upgrade(listener: &TcpListener) -> Engine {
    let (tcp, _) = timeout(WAIT, listener.accept()).await.unwrap().unwrap();
    let mut path = String::new();
    let mut ws = accept_hdr_async(tcp, |req: &Request, resp: Response| {
        path = req.uri().to_string();
        Ok::<_, ErrorResponse>(resp)
    })
    .await
    .unwrap();
    assert_eq!(path, "/socket.io/?EIO=4&transport=websocket");
    ws.send(Message::Text(OPEN.into())).await.unwrap();
    assert_eq!(next_packet(&mut ws).await, Packet::Connect);
    ws
}

/// Accept one client and complete the namespace join.
async fn accept(listener: &TcpListener) -> Engine {
    let mut ws = upgrade(listener).await;
    ws.send(Message::Text(JOINED.into())).await.unwrap();
    ws
}

async fn next_text(ws: &mut Engine) -> String {
    loop {
        let frame = timeout(WAIT, ws.next()).await.unwrap().unwrap().unwrap();
        if let Message::Text(text) = frame {
            return text;
        }
    }
}

async fn next_packet(ws: &mut Engine) -> Packet {
    decode_packet(&next_text(ws).await).unwrap()
}

async fn wait_for(rx: &mut watch::Receiver<Connectivity>, want: Connectivity) {
    timeout(WAIT, rx.wait_for(|c| *c == want))
        .await
        .unwrap()
        .unwrap();
}

/// Read client events until one satisfies `pred`, returning every event seen.
async fn read_until(ws: &mut Engine, pred: impl Fn(&ClientMessage) -> bool) -> Vec<ClientMessage> {
    let mut seen = Vec::new();
    loop {
        let Some(msg) = decode_client(&next_text(ws).await).unwrap() else {
            continue;
        };
        let done = pred(&msg);
        seen.push(msg);
        if done {
            return seen;
        }
    }
}

fn is_tick(msg: &ClientMessage) -> bool {
    matches!(msg, ClientMessage::Update { .. })
}

fn config(url: String) -> SessionConfig {
    SessionConfig {
        url,
        poll_hz: 100.0,
        reconnect_delay: Duration::from_millis(50),
    }
}

#[tokio::test]
async fn snapshots_flow_in_and_ticks_and_intents_flow_out() {
    let (listener, url) = listener().await;
    let (handle, feed) = channel_pair();
    let mut conn = handle.subscribe_connectivity();
    let mut snaps = handle.subscribe_snapshots();
    let session = tokio::spawn(run_session(config(url), feed));

    let mut ws = accept(&listener).await;
    wait_for(&mut conn, Connectivity::Connected).await;

    let ticks = read_until(&mut ws, is_tick).await;
    let Some(ClientMessage::Update { delta_time }) = ticks.last() else {
        panic!("expected an update tick");
    };
    assert!(*delta_time >= 0.0);

    let snap = StateSnapshot {
        running: true,
        total_cars: 7,
        ..StateSnapshot::default()
    };
    let text = encode_server(&ServerMessage::StateUpdate(snap.clone())).unwrap();
    ws.send(Message::Text(text)).await.unwrap();
    ws.send(Message::Text(r#"42["hello",{}]"#.into()))
        .await
        .unwrap();
    timeout(WAIT, snaps.wait_for(Option::is_some))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snaps.borrow().as_deref(), Some(&snap));

    assert!(handle.send(Intent::SetSpawnRate(1.5)));
    let seen = read_until(&mut ws, |m| !is_tick(m)).await;
    assert_eq!(
        seen.last(),
        Some(&ClientMessage::UpdateSpawnRate { spawn_rate: 1.5 })
    );

    drop(handle);
    timeout(WAIT, session).await.unwrap().unwrap().unwrap();
    let mut left = false;
    while let Some(Ok(frame)) = timeout(WAIT, ws.next()).await.unwrap() {
        if let Message::Text(text) = frame {
            left |= decode_packet(&text).unwrap() == Packet::Disconnect;
        }
    }
    assert!(left, "client should leave the namespace on shutdown");
}

#[tokio::test]
async fn engine_pings_are_answered() {
    let (listener, url) = listener().await;
    let (handle, feed) = channel_pair();
    let mut conn = handle.subscribe_connectivity();
    let session = tokio::spawn(run_session(config(url), feed));

    let mut ws = accept(&listener).await;
    wait_for(&mut conn, Connectivity::Connected).await;
    ws.send(Message::Text("2".into())).await.unwrap();
    loop {
        match next_packet(&mut ws).await {
            Packet::Pong => break,
            Packet::Event { ref name, .. } if name == "update" => {}
            other => panic!("unexpected packet {other:?}"),
        }
    }

    drop(handle);
    timeout(WAIT, session).await.unwrap().unwrap().unwrap();
}

#[tokio::test]
async fn dropped_socket_reconnects_and_keeps_last_snapshot() {
    let (listener, url) = listener().await;
    let (handle, feed) = channel_pair();
    let mut conn = handle.subscribe_connectivity();
    let snaps = handle.subscribe_snapshots();
    let session = tokio::spawn(run_session(config(url), feed));

    let mut first = accept(&listener).await;
    wait_for(&mut conn, Connectivity::Connected).await;
    let text = encode_server(&ServerMessage::StateUpdate(StateSnapshot {
        vip_cars: 3,
        ..StateSnapshot::default()
    }))
    .unwrap();
    first.send(Message::Text(text)).await.unwrap();
    first.close(None).await.unwrap();
    drop(first);

    wait_for(&mut conn, Connectivity::Disconnected).await;
    assert_eq!(snaps.borrow().as_ref().map(|s| s.vip_cars), Some(3));

    let mut second = accept(&listener).await;
    wait_for(&mut conn, Connectivity::Connected).await;
    let ticks = read_until(&mut second, is_tick).await;
    assert!(!ticks.is_empty());

    drop(handle);
    timeout(WAIT, session).await.unwrap().unwrap().unwrap();
}

#[tokio::test]
async fn intents_issued_while_disconnected_are_not_replayed() {
    let (listener, url) = listener().await;
    let (handle, feed) = channel_pair();
    let mut conn = handle.subscribe_connectivity();
    let session = tokio::spawn(run_session(config(url), feed));

    let mut first = accept(&listener).await;
    wait_for(&mut conn, Connectivity::Connected).await;
    first.close(None).await.unwrap();
    drop(first);
    wait_for(&mut conn, Connectivity::Disconnected).await;

    // The retry is now parked in its WebSocket handshake; nothing accepts it.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(*conn.borrow(), Connectivity::Disconnected);
    assert!(handle.send(Intent::Reset));

    let mut second = accept(&listener).await;
    wait_for(&mut conn, Connectivity::Connected).await;
    assert!(handle.send(Intent::Start));
    let seen = read_until(&mut second, |m| !is_tick(m)).await;
    assert_eq!(seen.last(), Some(&ClientMessage::Start));
    assert!(!seen.contains(&ClientMessage::Reset));

    drop(handle);
    timeout(WAIT, session).await.unwrap().unwrap().unwrap();
}

#[tokio::test]
async fn refused_namespace_join_is_retried() {
    let (listener, url) = listener().await;
    let (handle, feed) = channel_pair();
    let mut conn = handle.subscribe_connectivity();
    let session = tokio::spawn(run_session(config(url), feed));

    let mut refused = upgrade(&listener).await;
    refused
        .send(Message::Text(r#"44{"message":"not now"}"#.into()))
        .await
        .unwrap();
    wait_for(&mut conn, Connectivity::Disconnected).await;
    drop(refused);

    let _engine = accept(&listener).await;
    wait_for(&mut conn, Connectivity::Connected).await;

    drop(handle);
    timeout(WAIT, session).await.unwrap().unwrap().unwrap();
}

#[tokio::test]
async fn refused_engine_stays_disconnected_until_shutdown() {
    let (listener, url) = listener().await;
    drop(listener);
    let (handle, feed) = channel_pair();
    let mut conn = handle.subscribe_connectivity();
    let session = tokio::spawn(run_session(config(url), feed));

    wait_for(&mut conn, Connectivity::Disconnected).await;
    assert!(handle.send(Intent::Start));

    drop(handle);
    timeout(WAIT, session).await.unwrap().unwrap().unwrap();
}
