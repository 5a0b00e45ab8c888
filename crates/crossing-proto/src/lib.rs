// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wire schema for the Crossing intersection client.
//!
//! The simulation engine pushes [`StateSnapshot`]s inside `state_update`
//! events; the client answers with [`ClientMessage`]s (the polling `update`
//! tick plus one-shot [`Intent`]s). Every message travels as a Socket.IO event
//! on the engine's default namespace; see [`wire`].

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod wire;

/// Default engine address used when no URL is configured.
pub const DEFAULT_ENGINE_URL: &str = "http://127.0.0.1:3003";

/// Vehicle `position` values run from 0 (spawn edge) to this extent.
pub const POSITION_EXTENT: f64 = 900.0;

/// Inclusive spawn-rate range accepted by the engine (seconds between arrivals).
pub const SPAWN_RATE_RANGE: (f64, f64) = (0.5, 5.0);
/// Spawn rate the engine starts with after a reset.
pub const DEFAULT_SPAWN_RATE: f64 = 2.0;

/// Inclusive speed-multiplier range accepted by the engine.
pub const SPEED_RANGE: (f64, f64) = (0.25, 3.0);
/// Speed multiplier the engine starts with after a reset.
pub const DEFAULT_SPEED: f64 = 1.0;

/// One of the four approaches feeding the intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Northbound traffic (enters from the bottom edge).
    North,
    /// Southbound traffic (enters from the top edge).
    South,
    /// Eastbound traffic (enters from the left edge).
    East,
    /// Westbound traffic (enters from the right edge).
    West,
}

impl Direction {
    /// All approaches in display order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Currently lit phase of one approach's signal head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LampPhase {
    /// Stop.
    Red,
    /// Clearance.
    Yellow,
    /// Go.
    Green,
}

impl LampPhase {
    /// Lamp order along a signal housing, first to last.
    pub const ALL: [LampPhase; 3] = [LampPhase::Red, LampPhase::Yellow, LampPhase::Green];
}

/// Signal-control policy running inside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerKind {
    /// Fixed cycle timing.
    FixedTime,
    /// Queue-threshold actuation.
    Actuated,
    /// Max-pressure switching.
    MaxPressure,
    /// Fuzzy-logic controller.
    Fuzzy,
    /// Learned Q-table policy.
    QLearning,
}

impl ControllerKind {
    /// All policies in selector order.
    pub const ALL: [ControllerKind; 5] = [
        ControllerKind::FixedTime,
        ControllerKind::Actuated,
        ControllerKind::MaxPressure,
        ControllerKind::Fuzzy,
        ControllerKind::QLearning,
    ];

    /// Snake-case identifier used on the wire.
    pub fn wire_name(self) -> &'static str {
        match self {
            ControllerKind::FixedTime => "fixed_time",
            ControllerKind::Actuated => "actuated",
            ControllerKind::MaxPressure => "max_pressure",
            ControllerKind::Fuzzy => "fuzzy",
            ControllerKind::QLearning => "q_learning",
        }
    }

    /// Human-readable badge text.
    pub fn display_name(self) -> &'static str {
        match self {
            ControllerKind::FixedTime => "Fixed Time",
            ControllerKind::Actuated => "Actuated",
            ControllerKind::MaxPressure => "Max Pressure",
            ControllerKind::Fuzzy => "Fuzzy Logic",
            ControllerKind::QLearning => "Q-Learning",
        }
    }

    /// Parse a wire identifier; `None` for policies this client does not know.
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.wire_name() == name)
    }
}

/// 8-bit RGB triple as sent by the engine.
pub type Rgb = [u8; 3];

/// Per-approach signal phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lights {
    /// Northbound head.
    pub north: LampPhase,
    /// Southbound head.
    pub south: LampPhase,
    /// Eastbound head.
    pub east: LampPhase,
    /// Westbound head.
    pub west: LampPhase,
}

impl Lights {
    /// Every head showing the same phase.
    pub fn uniform(phase: LampPhase) -> Self {
        Self {
            north: phase,
            south: phase,
            east: phase,
            west: phase,
        }
    }

    /// Phase for one approach.
    pub fn get(&self, dir: Direction) -> LampPhase {
        match dir {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::East => self.east,
            Direction::West => self.west,
        }
    }
}

impl Default for Lights {
    fn default() -> Self {
        Self::uniform(LampPhase::Red)
    }
}

/// Waiting-vehicle counts per approach.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queues {
    /// Vehicles waiting on the north approach.
    pub north: u32,
    /// Vehicles waiting on the south approach.
    pub south: u32,
    /// Vehicles waiting on the east approach.
    pub east: u32,
    /// Vehicles waiting on the west approach.
    pub west: u32,
}

impl Queues {
    /// Count for one approach.
    pub fn get(&self, dir: Direction) -> u32 {
        match dir {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::East => self.east,
            Direction::West => self.west,
        }
    }
}

/// One vehicle as of a snapshot.
///
/// Records carry no identity guarantee across snapshots; `id` is informational
/// only and may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarRecord {
    /// Approach the vehicle travels on.
    pub direction: Direction,
    /// Distance travelled from the spawn edge, `0..=POSITION_EXTENT`.
    pub position: f64,
    /// Emergency/priority vehicle flag.
    #[serde(rename = "isVip", default)]
    pub is_vip: bool,
    /// Body color.
    #[serde(default = "default_car_color")]
    pub color: Rgb,
    /// Engine-side label, if sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Current speed in engine units, if sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Whether the vehicle has committed to crossing, if sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committed: Option<bool>,
}

fn default_car_color() -> Rgb {
    [148, 163, 184]
}

impl CarRecord {
    /// Plain vehicle with the given color and no optional fields.
    pub fn new(direction: Direction, position: f64, color: Rgb) -> Self {
        Self {
            direction,
            position,
            is_vip: false,
            color,
            id: None,
            speed: None,
            committed: None,
        }
    }

    /// Same vehicle flagged as VIP.
    pub fn vip(mut self) -> Self {
        self.is_vip = true;
        self
    }
}

/// Complete authoritative simulation state as of one engine update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Signal phases.
    pub lights: Lights,
    /// Vehicles in engine order.
    #[serde(default)]
    pub cars: Vec<CarRecord>,
    /// Waiting counts.
    #[serde(default)]
    pub queues: Queues,
    /// Milliseconds spent in the current signal phase.
    #[serde(default)]
    pub phase_time: f64,
    /// Engine-specific phase descriptor (e.g. `"NS"`), if sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_phase: Option<String>,
    /// Vehicles counted by the engine.
    #[serde(default)]
    pub total_cars: u64,
    /// VIP vehicles counted by the engine.
    #[serde(default)]
    pub vip_cars: u64,
    /// Active signal-control policy (raw wire name).
    #[serde(default)]
    pub controller: String,
    /// Whether the simulation is advancing.
    #[serde(default)]
    pub running: bool,
    /// Authoritative spawn rate; `None` when the engine omitted it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawn_rate: Option<f64>,
    /// Authoritative speed multiplier; `None` when the engine omitted it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_multiplier: Option<f64>,
}

impl StateSnapshot {
    /// Known policy for the `controller` field, if recognised.
    pub fn controller_kind(&self) -> Option<ControllerKind> {
        ControllerKind::from_wire(&self.controller)
    }

    /// Badge text: display name for known policies, raw name otherwise.
    pub fn controller_label(&self) -> &str {
        match self.controller_kind() {
            Some(kind) => kind.display_name(),
            None => &self.controller,
        }
    }
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self {
            lights: Lights::default(),
            cars: Vec::new(),
            queues: Queues::default(),
            phase_time: 0.0,
            current_phase: None,
            total_cars: 0,
            vip_cars: 0,
            controller: ControllerKind::FixedTime.wire_name().to_string(),
            running: false,
            spawn_rate: Some(DEFAULT_SPAWN_RATE),
            speed_multiplier: Some(DEFAULT_SPEED),
        }
    }
}

/// One-shot command requesting a change in simulation behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Switch the signal-control policy.
    ChangeController(ControllerKind),
    /// Resume the simulation.
    Start,
    /// Suspend the simulation.
    Pause,
    /// Reset to initial conditions.
    Reset,
    /// Set seconds between arrivals.
    SetSpawnRate(f64),
    /// Set the simulation speed multiplier.
    SetSpeed(f64),
    /// Inject an emergency vehicle on an approach.
    SpawnVip(Direction),
}

/// Client → engine event.
///
/// Argument-less variants carry no payload at all; the engine's handlers for
/// them take no arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Polling tick carrying measured wall-clock milliseconds since the last tick.
    Update {
        /// Elapsed milliseconds.
        delta_time: f64,
    },
    /// Switch policy.
    ChangeController {
        /// Policy wire name.
        controller: ControllerKind,
    },
    /// Resume.
    Start,
    /// Suspend.
    Pause,
    /// Reset.
    Reset,
    /// Set arrival spacing.
    UpdateSpawnRate {
        /// Seconds between arrivals.
        spawn_rate: f64,
    },
    /// Set speed multiplier.
    UpdateSpeed {
        /// Multiplier.
        speed: f64,
    },
    /// Inject an emergency vehicle.
    SpawnVip {
        /// Approach to spawn on.
        direction: Direction,
    },
}

impl ClientMessage {
    /// Event name as it appears on the wire.
    pub fn event_name(&self) -> &'static str {
        match self {
            ClientMessage::Update { .. } => "update",
            ClientMessage::ChangeController { .. } => "change_controller",
            ClientMessage::Start => "start",
            ClientMessage::Pause => "pause",
            ClientMessage::Reset => "reset",
            ClientMessage::UpdateSpawnRate { .. } => "update_spawn_rate",
            ClientMessage::UpdateSpeed { .. } => "update_speed",
            ClientMessage::SpawnVip { .. } => "spawn_vip",
        }
    }
}

impl From<Intent> for ClientMessage {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::ChangeController(controller) => ClientMessage::ChangeController { controller },
            Intent::Start => ClientMessage::Start,
            Intent::Pause => ClientMessage::Pause,
            Intent::Reset => ClientMessage::Reset,
            Intent::SetSpawnRate(spawn_rate) => ClientMessage::UpdateSpawnRate { spawn_rate },
            Intent::SetSpeed(speed) => ClientMessage::UpdateSpeed { speed },
            Intent::SpawnVip(direction) => ClientMessage::SpawnVip { direction },
        }
    }
}

/// Engine → client event.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// Fresh authoritative state.
    StateUpdate(StateSnapshot),
}

impl ServerMessage {
    /// Event name as it appears on the wire.
    pub fn event_name(&self) -> &'static str {
        match self {
            ServerMessage::StateUpdate(_) => wire::STATE_UPDATE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_badge_falls_back_to_raw_name() {
        let mut snap = StateSnapshot {
            controller: "max_pressure".into(),
            ..StateSnapshot::default()
        };
        assert_eq!(snap.controller_label(), "Max Pressure");
        snap.controller = "webster".into();
        assert_eq!(snap.controller_kind(), None);
        assert_eq!(snap.controller_label(), "webster");
    }

    #[test]
    fn intents_map_to_named_events() {
        let names: Vec<_> = [
            Intent::ChangeController(ControllerKind::Fuzzy),
            Intent::Start,
            Intent::Pause,
            Intent::Reset,
            Intent::SetSpawnRate(1.5),
            Intent::SetSpeed(2.0),
            Intent::SpawnVip(Direction::East),
        ]
        .into_iter()
        .map(|i| ClientMessage::from(i).event_name())
        .collect();
        assert_eq!(
            names,
            [
                "change_controller",
                "start",
                "pause",
                "reset",
                "update_spawn_rate",
                "update_speed",
                "spawn_vip"
            ]
        );
    }

    #[test]
    fn lights_lookup_by_direction() {
        let lights = Lights {
            north: LampPhase::Green,
            ..Lights::default()
        };
        assert_eq!(lights.get(Direction::North), LampPhase::Green);
        assert_eq!(lights.get(Direction::West), LampPhase::Red);
    }
}
