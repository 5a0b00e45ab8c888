// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Snapshot → frame.

use crossing_proto::{Direction, StateSnapshot};
use crossing_scene_port::{
    rgba, CanvasPort, DrawOp, Frame, Glow, Point, Rect, TextAlign, TextStyle,
};
use tracing::{debug, trace};

use crate::clock::Clock;
use crate::lamps::{housing_rect, lamp_visuals, LAMP_GLOW, LAMP_RADIUS};
use crate::surface::SurfaceSize;
use crate::vehicles::{beacon_pulse, draw_vehicle, place};
use crate::{palette, scale_for};

/// Build the frame for `snapshot` on a square of `size` at wall-clock `now_ms`.
///
/// Returns `None` for an empty surface. Cars with a non-finite position are
/// left out of the frame.
pub fn build_frame(snapshot: &StateSnapshot, size: SurfaceSize, now_ms: f64) -> Option<Frame> {
    if size.is_empty() {
        return None;
    }
    let edge = size.edge();
    let scale = scale_for(edge);
    let mut frame = Frame::new(edge);

    frame.push(DrawOp::VerticalGradient {
        rect: Rect::new(0.0, 0.0, edge, edge),
        top: palette::BACKDROP_TOP,
        bottom: palette::BACKDROP_BOTTOM,
    });
    push_road(&mut frame, edge, scale);
    push_signals(&mut frame, snapshot, scale);

    let pulse = beacon_pulse(now_ms);
    for car in &snapshot.cars {
        if !car.position.is_finite() {
            debug!(direction = %car.direction, "skipping car with non-finite position");
            continue;
        }
        let placement = place(car.direction, car.position, edge);
        draw_vehicle(&mut frame, car, &placement, pulse);
    }

    push_compass(&mut frame, edge, scale);
    Some(frame)
}

/// Render `snapshot` into `port`. Returns `false` (and presents nothing) for
/// an empty surface.
pub fn render<C, P>(snapshot: &StateSnapshot, size: SurfaceSize, clock: &C, port: &mut P) -> bool
where
    C: Clock + ?Sized,
    P: CanvasPort + ?Sized,
{
    let Some(frame) = build_frame(snapshot, size, clock.now_ms()) else {
        trace!("surface empty; nothing presented");
        return false;
    };
    port.present(&frame);
    true
}

fn scaled(r: Rect, scale: f32) -> Rect {
    Rect::new(r.x * scale, r.y * scale, r.w * scale, r.h * scale)
}

fn push_road(frame: &mut Frame, edge: f32, scale: f32) {
    let fill = |frame: &mut Frame, rect: Rect, color| frame.push(DrawOp::FillRect { rect, color });

    fill(frame, Rect::new(0.0, 0.0, edge, edge), palette::ROAD_BED);
    fill(frame, Rect::new(250.0 * scale, 0.0, 100.0 * scale, edge), palette::ROADWAY);
    fill(frame, Rect::new(0.0, 250.0 * scale, edge, 100.0 * scale), palette::ROADWAY);

    for r in [
        Rect::new(295.0, 0.0, 10.0, 240.0),
        Rect::new(295.0, 360.0, 10.0, 240.0),
        Rect::new(0.0, 295.0, 240.0, 10.0),
        Rect::new(360.0, 295.0, 240.0, 10.0),
    ] {
        fill(frame, scaled(r, scale), palette::LANE_DIVIDER);
    }
    for r in [
        Rect::new(250.0, 248.0, 100.0, 4.0),
        Rect::new(250.0, 348.0, 100.0, 4.0),
        Rect::new(248.0, 250.0, 4.0, 100.0),
        Rect::new(348.0, 250.0, 4.0, 100.0),
    ] {
        fill(frame, scaled(r, scale), palette::STOP_LINE);
    }
}

/// Order the signal heads are drawn in.
pub const SIGNAL_ORDER: [Direction; 4] = [
    Direction::East,
    Direction::West,
    Direction::North,
    Direction::South,
];

fn push_signals(frame: &mut Frame, snapshot: &StateSnapshot, scale: f32) {
    for dir in SIGNAL_ORDER {
        frame.push(DrawOp::FillRect {
            rect: scaled(housing_rect(dir), scale),
            color: palette::LAMP_HOUSING,
        });
        for lamp in lamp_visuals(dir, snapshot.lights.get(dir)) {
            frame.push(DrawOp::FillCircle {
                center: Point::new(lamp.center.x * scale, lamp.center.y * scale),
                radius: LAMP_RADIUS * scale,
                color: lamp.color,
                glow: lamp.active.then_some(Glow {
                    radius: LAMP_GLOW * scale,
                    color: lamp.color,
                }),
            });
        }
    }
}

fn push_compass(frame: &mut Frame, edge: f32, scale: f32) {
    let style = TextStyle {
        size: 24.0 * scale,
        bold: true,
        align: TextAlign::Center,
    };
    let glow = Glow {
        radius: 10.0 * scale,
        color: rgba(99, 102, 241, 0.5),
    };
    for (label, anchor) in [
        ("N", Point::new(300.0 * scale, 30.0 * scale)),
        ("S", Point::new(300.0 * scale, edge - 10.0 * scale)),
        ("E", Point::new(edge - 20.0 * scale, 310.0 * scale)),
        ("W", Point::new(30.0 * scale, 310.0 * scale)),
    ] {
        frame.push(DrawOp::Text {
            anchor,
            text: label.to_string(),
            style,
            color: palette::COMPASS_TEXT,
            glow: Some(glow),
        });
    }
}
