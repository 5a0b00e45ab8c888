// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Vehicle placement and body drawing.
//!
//! Placement works in surface pixels. Bodies are drawn in a local frame
//! centred on the vehicle with the front of the car at `-h/2`; southbound and
//! westbound vehicles get a half-turn so their front faces the direction of
//! travel.

use std::f64::consts::PI;

use crossing_proto::{CarRecord, Direction, POSITION_EXTENT};
use crossing_scene_port::{
    rgba, DrawOp, Frame, Glow, Point, Rect, Rotation, TextAlign, TextStyle, Transform,
};

use crate::{palette, scale_for};

/// Long side of a vehicle in design units.
pub const CAR_LENGTH: f32 = 28.0;
/// Short side of a vehicle in design units.
pub const CAR_WIDTH: f32 = 16.0;

/// Lane centre lines in design units (right-hand traffic).
const LANE_NORTHBOUND_X: f32 = 310.0;
const LANE_SOUTHBOUND_X: f32 = 290.0;
const LANE_EASTBOUND_Y: f32 = 310.0;
const LANE_WESTBOUND_Y: f32 = 290.0;

/// Period divisor for the beacon pulse, in milliseconds.
const PULSE_DIVISOR_MS: f64 = 150.0;

/// Where and how a vehicle sits on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Body centre in surface pixels.
    pub center: Point,
    /// Extent along x before rotation.
    pub width: f32,
    /// Extent along y before rotation.
    pub height: f32,
    /// Local frame orientation.
    pub rotation: Rotation,
}

/// Pixels travelled from the spawn edge for an engine `position`.
///
/// Linear in `position`, so strictly increasing for any positive `edge`.
pub fn travel_offset(position: f64, edge: f32) -> f32 {
    (position / POSITION_EXTENT) as f32 * edge
}

/// Placement of a vehicle on approach `dir` at engine `position`.
pub fn place(dir: Direction, position: f64, edge: f32) -> Placement {
    let scale = scale_for(edge);
    let s = travel_offset(position, edge);
    let (long, short) = (CAR_LENGTH * scale, CAR_WIDTH * scale);
    match dir {
        Direction::North => Placement {
            center: Point::new(LANE_NORTHBOUND_X * scale, edge - s),
            width: short,
            height: long,
            rotation: Rotation::Upright,
        },
        Direction::South => Placement {
            center: Point::new(LANE_SOUTHBOUND_X * scale, s),
            width: short,
            height: long,
            rotation: Rotation::Reversed,
        },
        Direction::East => Placement {
            center: Point::new(s, LANE_EASTBOUND_Y * scale),
            width: long,
            height: short,
            rotation: Rotation::Upright,
        },
        Direction::West => Placement {
            center: Point::new(edge - s, LANE_WESTBOUND_Y * scale),
            width: long,
            height: short,
            rotation: Rotation::Reversed,
        },
    }
}

/// Beacon intensity in `0..=1` at wall-clock `now_ms`.
pub fn beacon_pulse(now_ms: f64) -> f32 {
    ((now_ms / PULSE_DIVISOR_MS).sin() * 0.5 + 0.5) as f32
}

/// Append the ops drawing `car` at `placement` to `frame`.
pub fn draw_vehicle(frame: &mut Frame, car: &CarRecord, placement: &Placement, pulse: f32) {
    frame.push(DrawOp::PushTransform(Transform::new(
        placement.center,
        placement.rotation,
    )));
    if car.is_vip {
        draw_vip_body(frame, car, placement.width, placement.height, pulse);
    } else {
        draw_regular_body(frame, car, placement.width, placement.height);
    }
    frame.push(DrawOp::PopTransform);
}

fn body_rect(w: f32, h: f32) -> Rect {
    Rect::new(-w / 2.0, -h / 2.0, w, h)
}

fn windshield_rect(w: f32, h: f32, d: f32) -> Rect {
    Rect::new(-w / 2.0 + 2.0 * d, -h / 2.0 + 3.0 * d, w - 4.0 * d, h * 0.3)
}

fn car_fill(car: &CarRecord) -> [u8; 4] {
    let [r, g, b] = car.color;
    [r, g, b, 255]
}

fn draw_regular_body(frame: &mut Frame, car: &CarRecord, w: f32, h: f32) {
    let d = w.min(h) / 16.0;
    let body = body_rect(w, h);
    let glass = rgba(100, 150, 200, 0.6);

    frame.push(DrawOp::FillRoundRect {
        rect: body,
        radius: 3.0 * d,
        color: car_fill(car),
    });
    frame.push(DrawOp::FillRoundRect {
        rect: windshield_rect(w, h, d),
        radius: 2.0 * d,
        color: glass,
    });
    frame.push(DrawOp::FillRoundRect {
        rect: Rect::new(
            -w / 2.0 + 2.0 * d,
            h / 2.0 - 3.0 * d - h * 0.25,
            w - 4.0 * d,
            h * 0.25,
        ),
        radius: 2.0 * d,
        color: glass,
    });
    for x in [-w / 2.0 + d, w / 2.0 - 4.0 * d] {
        frame.push(DrawOp::FillRect {
            rect: Rect::new(x, -h / 2.0, 3.0 * d, 2.0 * d),
            color: palette::HEADLIGHT,
        });
    }
    frame.push(DrawOp::StrokeRoundRect {
        rect: body,
        radius: 3.0 * d,
        width: 0.5 * d,
        color: rgba(0, 0, 0, 0.3),
    });
}

fn draw_vip_body(frame: &mut Frame, car: &CarRecord, w: f32, h: f32, pulse: f32) {
    let d = w.min(h) / 16.0;
    let body = body_rect(w, h);

    frame.push(DrawOp::FillRoundRect {
        rect: body,
        radius: 3.0 * d,
        color: car_fill(car),
    });
    frame.push(DrawOp::FillRect {
        rect: Rect::new(-w / 2.0 + 3.0 * d, -h / 2.0 + h * 0.4, w - 6.0 * d, 3.0 * d),
        color: palette::VIP_STRIPE,
    });
    frame.push(DrawOp::FillRoundRect {
        rect: windshield_rect(w, h, d),
        radius: 2.0 * d,
        color: rgba(50, 50, 80, 0.8),
    });

    let alpha = 0.7 + pulse * 0.3;
    let glow_radius = 8.0 * pulse * d;
    let beacon_y = -h / 2.0 + 2.0 * d;
    for (x, (r, g, b)) in [(-w / 4.0, (0, 128, 255)), (w / 4.0, (255, 0, 0))] {
        let glow = (glow_radius > 0.0).then(|| Glow {
            radius: glow_radius,
            color: rgba(r, g, b, 1.0),
        });
        frame.push(DrawOp::FillCircle {
            center: Point::new(x, beacon_y),
            radius: 2.5 * d,
            color: rgba(r, g, b, alpha),
            glow,
        });
    }

    frame.push(DrawOp::Text {
        anchor: Point::new(0.0, h / 2.0 - 4.0 * d),
        text: "VIP".to_string(),
        style: TextStyle {
            size: 6.0 * d,
            bold: true,
            align: TextAlign::Center,
        },
        color: palette::WHITE,
        glow: None,
    });
    frame.push(DrawOp::StrokeRoundRect {
        rect: body,
        radius: 3.0 * d,
        width: 1.5 * d,
        color: palette::WHITE,
    });
}

/// Pulse phase at which beacons are fully dark (`sin = -1`).
pub fn dark_beacon_ms() -> f64 {
    PULSE_DIVISOR_MS * 1.5 * PI
}
