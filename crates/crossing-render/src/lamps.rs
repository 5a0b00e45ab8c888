// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Signal-head layout and lamp coloring.
//!
//! Each approach has one housing holding three lamps in red/yellow/green
//! order. East/west housings stand vertically beside the horizontal road;
//! north/south housings lie horizontally across the vertical road.

use crossing_proto::{Direction, LampPhase};
use crossing_scene_port::{ColorRgba8, Point, Rect};

use crate::palette;

/// Housing thickness in design units.
pub const HOUSING_SHORT: f32 = 20.0;
/// Housing length in design units.
pub const HOUSING_LONG: f32 = 70.0;
/// Lamp radius in design units.
pub const LAMP_RADIUS: f32 = 6.0;
/// Glow radius of the lit lamp in design units.
pub const LAMP_GLOW: f32 = 15.0;

const LAMP_OFFSETS: [f32; 3] = [10.0, 35.0, 60.0];
const LAMP_ACROSS: f32 = 10.0;

/// Resolved look of one lamp circle, in design units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LampVisual {
    /// Which lamp of the head this is.
    pub phase: LampPhase,
    /// Centre in design units.
    pub center: Point,
    /// Fill color (full or dim).
    pub color: ColorRgba8,
    /// Lit lamp: full color plus glow.
    pub active: bool,
}

/// Whether the housing for `dir` is laid out along the x axis.
pub fn is_horizontal(dir: Direction) -> bool {
    matches!(dir, Direction::North | Direction::South)
}

/// Top-left corner of the housing for `dir` in design units.
pub fn housing_origin(dir: Direction) -> Point {
    match dir {
        Direction::East => Point::new(360.0, 245.0),
        Direction::West => Point::new(220.0, 245.0),
        Direction::North => Point::new(255.0, 360.0),
        Direction::South => Point::new(265.0, 220.0),
    }
}

/// Housing rectangle for `dir` in design units.
pub fn housing_rect(dir: Direction) -> Rect {
    let o = housing_origin(dir);
    if is_horizontal(dir) {
        Rect::new(o.x, o.y, HOUSING_LONG, HOUSING_SHORT)
    } else {
        Rect::new(o.x, o.y, HOUSING_SHORT, HOUSING_LONG)
    }
}

/// Fill color of `lamp` given whether it is the lit one.
pub fn lamp_color(lamp: LampPhase, active: bool) -> ColorRgba8 {
    match (lamp, active) {
        (LampPhase::Red, true) => palette::RED_ACTIVE,
        (LampPhase::Red, false) => palette::RED_DIM,
        (LampPhase::Yellow, true) => palette::YELLOW_ACTIVE,
        (LampPhase::Yellow, false) => palette::YELLOW_DIM,
        (LampPhase::Green, true) => palette::GREEN_ACTIVE,
        (LampPhase::Green, false) => palette::GREEN_DIM,
    }
}

/// The three lamps of the head for `dir` showing `lit`.
///
/// Exactly one entry is active.
pub fn lamp_visuals(dir: Direction, lit: LampPhase) -> [LampVisual; 3] {
    let o = housing_origin(dir);
    let horizontal = is_horizontal(dir);
    let mut out = [LampVisual {
        phase: LampPhase::Red,
        center: o,
        color: palette::RED_DIM,
        active: false,
    }; 3];
    for ((slot, phase), along) in out.iter_mut().zip(LampPhase::ALL).zip(LAMP_OFFSETS) {
        let center = if horizontal {
            Point::new(o.x + along, o.y + LAMP_ACROSS)
        } else {
            Point::new(o.x + LAMP_ACROSS, o.y + along)
        };
        let active = phase == lit;
        *slot = LampVisual {
            phase,
            center,
            color: lamp_color(phase, active),
            active,
        };
    }
    out
}
