// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Socket.IO codec (Engine.IO v4 over a WebSocket).
//!
//! The engine is a Socket.IO server. Every WebSocket text frame carries one
//! Engine.IO packet: a type digit followed by an optional payload. Message
//! packets (`4`) wrap a Socket.IO packet for the default namespace, and
//! events travel as a JSON array:
//!
//! ``42["<event>", <payload>]``
//!
//! Argument-less events omit the payload (``42["start"]``).
//!
//! Decoding on the client side is lenient about *which* events arrive: events
//! this client does not understand decode to `Ok(None)` so the caller can skip
//! them, while a known event with a malformed payload is an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{ClientMessage, ServerMessage};

/// Event name carrying a [`crate::StateSnapshot`].
pub const STATE_UPDATE: &str = "state_update";

/// Request path the engine serves Socket.IO on.
pub const ENGINE_IO_PATH: &str = "/socket.io/";
/// Query selecting Engine.IO v4 with the WebSocket transport from the start.
pub const ENGINE_IO_QUERY: &str = "EIO=4&transport=websocket";

/// Codec failure.
#[derive(Debug, Error)]
pub enum WireError {
    /// Frame did not follow the packet grammar.
    #[error("malformed packet: {0}")]
    Malformed(String),
    /// Packet body was not valid JSON of the expected shape.
    #[error("malformed packet body: {0}")]
    Json(#[source] serde_json::Error),
    /// Known event whose payload failed to decode.
    #[error("bad payload for `{event}`: {source}")]
    Payload {
        /// Event name.
        event: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
    /// Encoding failed.
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Session parameters the engine announces in its open packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    /// Engine-assigned session id.
    pub sid: String,
    /// Transports the engine offers to upgrade to.
    #[serde(default)]
    pub upgrades: Vec<String>,
    /// Milliseconds between engine pings.
    pub ping_interval: u64,
    /// Milliseconds the engine waits for a pong.
    pub ping_timeout: u64,
    /// Largest payload the engine accepts, if announced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_payload: Option<u64>,
}

/// One Engine.IO frame, with Socket.IO message packets unpacked.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// Engine.IO open, sent by the engine right after the upgrade.
    Open(Handshake),
    /// Engine.IO close.
    Close,
    /// Engine.IO heartbeat; the receiver answers with [`Packet::Pong`].
    Ping,
    /// Engine.IO heartbeat answer.
    Pong,
    /// Upgrade, no-op, ack and binary packets this client never acts on.
    Noop,
    /// Socket.IO namespace join (client) or its acknowledgement (engine).
    Connect,
    /// Socket.IO namespace leave.
    Disconnect,
    /// Socket.IO namespace join refused.
    ConnectError(Value),
    /// Socket.IO event with its arguments.
    Event {
        /// Event name.
        name: String,
        /// Arguments after the name; empty for argument-less events.
        args: Vec<Value>,
    },
}

/// Decode one text frame.
pub fn decode_packet(text: &str) -> Result<Packet, WireError> {
    let mut chars = text.chars();
    let kind = chars
        .next()
        .ok_or_else(|| WireError::Malformed("empty frame".into()))?;
    let body = chars.as_str();
    match kind {
        '0' => serde_json::from_str(body)
            .map(Packet::Open)
            .map_err(WireError::Json),
        '1' => Ok(Packet::Close),
        '2' => Ok(Packet::Ping),
        '3' => Ok(Packet::Pong),
        '4' => decode_message(body),
        '5' | '6' => Ok(Packet::Noop),
        other => Err(WireError::Malformed(format!("unknown packet type `{other}`"))),
    }
}

fn decode_message(text: &str) -> Result<Packet, WireError> {
    let mut chars = text.chars();
    let kind = chars
        .next()
        .ok_or_else(|| WireError::Malformed("empty message".into()))?;
    let body = strip_namespace(chars.as_str());
    match kind {
        '0' => Ok(Packet::Connect),
        '1' => Ok(Packet::Disconnect),
        // Optional ack id precedes the array.
        '2' => decode_event(body.trim_start_matches(|c: char| c.is_ascii_digit())),
        '4' if body.is_empty() => Ok(Packet::ConnectError(Value::Null)),
        '4' => serde_json::from_str(body)
            .map(Packet::ConnectError)
            .map_err(WireError::Json),
        '3' | '5' | '6' => Ok(Packet::Noop),
        other => Err(WireError::Malformed(format!("unknown message type `{other}`"))),
    }
}

/// Drop a leading `/namespace,` prefix.
fn strip_namespace(body: &str) -> &str {
    if body.starts_with('/') {
        body.split_once(',').map_or("", |(_, rest)| rest)
    } else {
        body
    }
}

fn decode_event(body: &str) -> Result<Packet, WireError> {
    let mut items: Vec<Value> = serde_json::from_str(body).map_err(WireError::Json)?;
    if items.is_empty() {
        return Err(WireError::Malformed("event without a name".into()));
    }
    let Value::String(name) = items.remove(0) else {
        return Err(WireError::Malformed("event name is not a string".into()));
    };
    Ok(Packet::Event { name, args: items })
}

/// Encode one packet as a text frame.
pub fn encode_packet(packet: &Packet) -> Result<String, WireError> {
    let text = match packet {
        Packet::Open(handshake) => format!("0{}", to_json(handshake)?),
        Packet::Close => "1".into(),
        Packet::Ping => "2".into(),
        Packet::Pong => "3".into(),
        Packet::Noop => "6".into(),
        Packet::Connect => "40".into(),
        Packet::Disconnect => "41".into(),
        Packet::ConnectError(detail) => format!("44{}", to_json(detail)?),
        Packet::Event { name, args } => {
            let mut items = Vec::with_capacity(args.len() + 1);
            items.push(Value::String(name.clone()));
            items.extend(args.iter().cloned());
            format!("42{}", to_json(&items)?)
        }
    };
    Ok(text)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, WireError> {
    serde_json::to_string(value).map_err(WireError::Encode)
}

/// Event packet for an outbound client message.
pub fn client_packet(msg: &ClientMessage) -> Result<Packet, WireError> {
    let args = match serde_json::to_value(msg).map_err(WireError::Encode)? {
        Value::Object(mut obj) => obj.remove("data").into_iter().collect(),
        _ => Vec::new(),
    };
    Ok(Packet::Event {
        name: msg.event_name().to_string(),
        args,
    })
}

/// Encode an outbound client event as a text frame.
pub fn encode_client(msg: &ClientMessage) -> Result<String, WireError> {
    encode_packet(&client_packet(msg)?)
}

/// Interpret an engine event. Unknown events yield `Ok(None)`.
pub fn server_event(name: &str, args: Vec<Value>) -> Result<Option<ServerMessage>, WireError> {
    match name {
        STATE_UPDATE => {
            let data = args.into_iter().next().unwrap_or(Value::Null);
            serde_json::from_value(data)
                .map(|snap| Some(ServerMessage::StateUpdate(snap)))
                .map_err(|source| WireError::Payload {
                    event: name.to_string(),
                    source,
                })
        }
        _ => Ok(None),
    }
}

/// Decode an inbound engine frame. Non-event packets and unknown events yield
/// `Ok(None)`.
pub fn decode_server(text: &str) -> Result<Option<ServerMessage>, WireError> {
    match decode_packet(text)? {
        Packet::Event { name, args } => server_event(&name, args),
        _ => Ok(None),
    }
}

/// Encode an engine event (used by engine stand-ins and tests).
pub fn encode_server(msg: &ServerMessage) -> Result<String, WireError> {
    let args = match msg {
        ServerMessage::StateUpdate(snap) => {
            vec![serde_json::to_value(snap).map_err(WireError::Encode)?]
        }
    };
    encode_packet(&Packet::Event {
        name: msg.event_name().to_string(),
        args,
    })
}

/// Decode a client event (used by engine stand-ins and tests). Non-event
/// packets yield `Ok(None)`.
pub fn decode_client(text: &str) -> Result<Option<ClientMessage>, WireError> {
    let Packet::Event { name, args } = decode_packet(text)? else {
        return Ok(None);
    };
    let mut tagged = serde_json::Map::new();
    tagged.insert("event".into(), Value::String(name.clone()));
    if let Some(data) = args.into_iter().next() {
        tagged.insert("data".into(), data);
    }
    serde_json::from_value(Value::Object(tagged))
        .map(Some)
        .map_err(|source| WireError::Payload {
            event: name,
            source,
        })
}

/// WebSocket endpoint for an engine address.
///
/// Accepts `http(s)://` or `ws(s)://` base addresses; a URL that already names
/// the Socket.IO path is used as given.
pub fn engine_endpoint(url: &str) -> String {
    let url = url.trim();
    if url.contains(ENGINE_IO_PATH) {
        return url.to_string();
    }
    let (scheme, rest) = match url.split_once("://") {
        Some(("https" | "wss", rest)) => ("wss", rest),
        Some((_, rest)) => ("ws", rest),
        None => ("ws", url),
    };
    let rest = rest.trim_end_matches('/');
    format!("{scheme}://{rest}{ENGINE_IO_PATH}?{ENGINE_IO_QUERY}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ControllerKind, Direction, Intent, LampPhase, StateSnapshot};

    fn event_body(text: &str) -> Value {
        let body = text.strip_prefix("42").expect("event frame");
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn update_tick_carries_fractional_millis() {
        let text = encode_client(&ClientMessage::Update { delta_time: 16.5 }).unwrap();
        assert_eq!(
            event_body(&text),
            serde_json::json!(["update", {"delta_time": 16.5}])
        );
    }

    #[test]
    fn argumentless_intents_send_no_payload() {
        for (intent, frame) in [
            (Intent::Start, r#"42["start"]"#),
            (Intent::Pause, r#"42["pause"]"#),
            (Intent::Reset, r#"42["reset"]"#),
        ] {
            assert_eq!(encode_client(&intent.into()).unwrap(), frame);
        }
    }

    #[test]
    fn payload_field_names_match_engine() {
        let cases = [
            (
                Intent::ChangeController(ControllerKind::QLearning),
                serde_json::json!(["change_controller", {"controller": "q_learning"}]),
            ),
            (
                Intent::SetSpawnRate(1.5),
                serde_json::json!(["update_spawn_rate", {"spawn_rate": 1.5}]),
            ),
            (
                Intent::SetSpeed(0.25),
                serde_json::json!(["update_speed", {"speed": 0.25}]),
            ),
            (
                Intent::SpawnVip(Direction::West),
                serde_json::json!(["spawn_vip", {"direction": "west"}]),
            ),
        ];
        for (intent, expected) in cases {
            let text = encode_client(&intent.into()).unwrap();
            assert_eq!(event_body(&text), expected);
        }
    }

    #[test]
    fn decodes_engine_state_update() {
        let text = r#"42["state_update", {
            "cars": [
                {"id": "car-7", "direction": "north", "position": 120.5, "speed": 0.2,
                 "color": [59, 130, 246], "isVip": false, "committed": false},
                {"id": "car-8", "direction": "west", "position": 30.0, "speed": 0.3,
                 "color": [255, 255, 255], "isVip": true, "committed": true}
            ],
            "lights": {"north": "green", "south": "green", "east": "red", "west": "yellow"},
            "queues": {"north": 2, "south": 0, "east": 5, "west": 1},
            "phase_time": 4200.0,
            "current_phase": "NS",
            "controller": "actuated",
            "total_cars": 12,
            "vip_cars": 1,
            "spawn_rate": 2.0,
            "speed_multiplier": 1.0,
            "running": true
        }]"#;
        let Some(ServerMessage::StateUpdate(snap)) = decode_server(text).unwrap() else {
            panic!("expected state_update");
        };
        assert_eq!(snap.cars.len(), 2);
        assert!(snap.cars[1].is_vip);
        assert_eq!(snap.cars[0].id.as_deref(), Some("car-7"));
        assert_eq!(snap.lights.west, LampPhase::Yellow);
        assert_eq!(snap.queues.east, 5);
        assert_eq!(snap.controller_kind(), Some(ControllerKind::Actuated));
        assert!(snap.running);
        assert_eq!(snap.current_phase.as_deref(), Some("NS"));
    }

    #[test]
    fn missing_optional_parameters_stay_absent() {
        let text = r#"42["state_update", {
            "lights": {"north": "red", "south": "red", "east": "green", "west": "green"},
            "cars": [], "queues": {"north": 0, "south": 0, "east": 0, "west": 0},
            "phase_time": 0, "controller": "fuzzy", "total_cars": 0, "vip_cars": 0,
            "running": false
        }]"#;
        let Some(ServerMessage::StateUpdate(snap)) = decode_server(text).unwrap() else {
            panic!("expected state_update");
        };
        assert_eq!(snap.spawn_rate, None);
        assert_eq!(snap.speed_multiplier, None);
    }

    #[test]
    fn unknown_events_and_control_packets_are_skipped() {
        assert!(decode_server(r#"42["hello", {"v": 1}]"#).unwrap().is_none());
        for frame in ["2", "3", "6", r#"40{"sid":"abc"}"#, "41"] {
            assert!(decode_server(frame).unwrap().is_none(), "{frame}");
        }
    }

    #[test]
    fn malformed_frames_are_errors() {
        let err = decode_server(r#"42["state_update", {"lights": 3}]"#).unwrap_err();
        assert!(matches!(err, WireError::Payload { ref event, .. } if event == STATE_UPDATE));
        assert!(matches!(decode_server(""), Err(WireError::Malformed(_))));
        assert!(matches!(decode_server("9"), Err(WireError::Malformed(_))));
        assert!(matches!(decode_server("42not json"), Err(WireError::Json(_))));
        assert!(matches!(decode_server("42[7]"), Err(WireError::Malformed(_))));
    }

    #[test]
    fn engine_open_packet_announces_heartbeat() {
        let text = r#"0{"sid":"lv_VI97HAXpY6yYWAAAC","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;
        let Packet::Open(handshake) = decode_packet(text).unwrap() else {
            panic!("expected open packet");
        };
        assert_eq!(handshake.ping_interval, 25_000);
        assert_eq!(handshake.ping_timeout, 20_000);
        assert_eq!(handshake.max_payload, Some(1_000_000));
        let echoed = encode_packet(&Packet::Open(handshake.clone())).unwrap();
        assert_eq!(decode_packet(&echoed).unwrap(), Packet::Open(handshake));
    }

    #[test]
    fn namespace_prefix_and_ack_id_are_skipped() {
        let plain = decode_packet(r#"42["state_update",{}]"#).unwrap();
        assert_eq!(decode_packet(r#"42/,["state_update",{}]"#).unwrap(), plain);
        assert_eq!(decode_packet(r#"4212["state_update",{}]"#).unwrap(), plain);
        assert_eq!(
            decode_packet(r#"44{"message":"not authorized"}"#).unwrap(),
            Packet::ConnectError(serde_json::json!({"message": "not authorized"}))
        );
    }

    #[test]
    fn engine_side_helpers_agree_with_client_side() {
        let snap = StateSnapshot::default();
        let text = encode_server(&ServerMessage::StateUpdate(snap.clone())).unwrap();
        assert_eq!(
            decode_server(&text).unwrap(),
            Some(ServerMessage::StateUpdate(snap))
        );
        for intent in [Intent::SpawnVip(Direction::South), Intent::Pause] {
            let sent = ClientMessage::from(intent);
            assert_eq!(
                decode_client(&encode_client(&sent).unwrap()).unwrap(),
                Some(sent)
            );
        }
        assert_eq!(decode_client("40").unwrap(), None);
    }

    #[test]
    fn endpoint_targets_socketio_path() {
        assert_eq!(
            engine_endpoint("http://127.0.0.1:3003"),
            "ws://127.0.0.1:3003/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(
            engine_endpoint("https://sim.example/"),
            "wss://sim.example/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(
            engine_endpoint("localhost:3003"),
            "ws://localhost:3003/socket.io/?EIO=4&transport=websocket"
        );
        let explicit = "ws://h:1/socket.io/?EIO=4&transport=websocket";
        assert_eq!(engine_endpoint(explicit), explicit);
    }
}
