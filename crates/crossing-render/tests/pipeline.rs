// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
use approx::assert_relative_eq;
use crossing_proto::{CarRecord, Direction, LampPhase, Lights, StateSnapshot};
use crossing_render::lamps::lamp_color;
use crossing_render::pipeline::SIGNAL_ORDER;
use crossing_render::vehicles::{dark_beacon_ms, place, travel_offset};
use crossing_render::{build_frame, fit_square, render, FixedClock, SurfaceSize};
use crossing_scene_port::{DrawOp, RecordingCanvas, Rotation};

fn north_green() -> StateSnapshot {
    StateSnapshot {
        lights: Lights {
            north: LampPhase::Green,
            ..Lights::uniform(LampPhase::Red)
        },
        ..StateSnapshot::default()
    }
}

fn lamp_circles(canvas: &RecordingCanvas) -> Vec<([u8; 4], bool)> {
    // The first twelve circles are the signal heads; vehicles follow.
    canvas
        .circles()
        .into_iter()
        .take(12)
        .map(|(_, _, color, glowing)| (color, glowing))
        .collect()
}

#[test]
fn end_to_end_landscape_container() {
    let size = fit_square(800.0, 600.0, 64.0);
    assert_relative_eq!(size.edge(), 536.0);

    let mut snap = north_green();
    snap.cars.push(CarRecord::new(Direction::North, 450.0, [59, 130, 246]));

    let mut canvas = RecordingCanvas::new();
    assert!(render(&snap, size, &FixedClock(0.0), &mut canvas));
    assert_eq!(canvas.present_count(), 1);

    let lamps = lamp_circles(&canvas);
    assert_eq!(lamps.len(), 12);
    // Red heads light their red lamp, so four lamps glow and eight stay dim.
    for (dir, head) in SIGNAL_ORDER.into_iter().zip(lamps.chunks(3)) {
        let want = if dir == Direction::North {
            LampPhase::Green
        } else {
            LampPhase::Red
        };
        for ((color, glowing), phase) in head.iter().zip(LampPhase::ALL) {
            let active = phase == want;
            assert_eq!(*glowing, active, "{dir} {phase:?}");
            assert_eq!(*color, lamp_color(phase, active), "{dir} {phase:?}");
        }
    }
    assert_eq!(lamps.iter().filter(|(_, glowing)| *glowing).count(), 4);

    let p = place(Direction::North, 450.0, size.edge());
    assert_relative_eq!(travel_offset(450.0, size.edge()), 268.0, epsilon = 1e-3);
    assert_relative_eq!(p.center.y, 536.0 - 268.0, epsilon = 1e-3);
    assert_eq!(p.rotation, Rotation::Upright);

    let frame = canvas.last().unwrap();
    assert!(frame.ops.iter().any(|op| matches!(
        op,
        DrawOp::PushTransform(t) if t.rotation == Rotation::Upright
            && (t.origin.y - 268.0).abs() < 1e-3
    )));
}

#[test]
fn every_head_has_exactly_one_active_lamp() {
    for phase in LampPhase::ALL {
        let snap = StateSnapshot {
            lights: Lights::uniform(phase),
            ..StateSnapshot::default()
        };
        let mut canvas = RecordingCanvas::new();
        render(&snap, SurfaceSize::square(600.0), &FixedClock(0.0), &mut canvas);
        let lamps = lamp_circles(&canvas);
        for head in lamps.chunks(3) {
            assert_eq!(head.iter().filter(|(_, g)| *g).count(), 1);
            let (color, _) = head.iter().find(|(_, g)| *g).unwrap();
            assert_eq!(*color, lamp_color(phase, true));
        }
    }
}

#[test]
fn travel_offset_is_strictly_monotonic_for_every_approach() {
    let edge = 536.0;
    let positions: Vec<f64> = (0..=90).map(|i| f64::from(i) * 10.0).collect();
    for dir in Direction::ALL {
        let along: Vec<f32> = positions
            .iter()
            .map(|&pos| {
                let c = place(dir, pos, edge).center;
                match dir {
                    Direction::North => edge - c.y,
                    Direction::South => c.y,
                    Direction::East => c.x,
                    Direction::West => edge - c.x,
                }
            })
            .collect();
        assert!(
            along.windows(2).all(|w| w[1] > w[0]),
            "{dir} travel not strictly increasing"
        );
    }
}

#[test]
fn empty_traffic_draws_road_and_lamps_only() {
    let snap = north_green();
    let frame = build_frame(&snap, SurfaceSize::square(600.0), 0.0).unwrap();
    assert!(!frame
        .ops
        .iter()
        .any(|op| matches!(op, DrawOp::PushTransform(_))));
    let circles = frame
        .ops
        .iter()
        .filter(|op| matches!(op, DrawOp::FillCircle { .. }))
        .count();
    assert_eq!(circles, 12);
}

#[test]
fn zero_surface_presents_nothing() {
    let mut canvas = RecordingCanvas::new();
    let size = fit_square(40.0, 40.0, 64.0);
    assert!(!render(&north_green(), size, &FixedClock(0.0), &mut canvas));
    assert_eq!(canvas.present_count(), 0);
}

#[test]
fn rendering_leaves_the_snapshot_untouched_and_is_repeatable() {
    let mut snap = north_green();
    snap.cars.push(CarRecord::new(Direction::West, 120.0, [1, 2, 3]).vip());
    snap.cars.push(CarRecord::new(Direction::South, 600.0, [4, 5, 6]));
    let before = snap.clone();

    let a = build_frame(&snap, SurfaceSize::square(500.0), 1000.0).unwrap();
    let b = build_frame(&snap, SurfaceSize::square(500.0), 1000.0).unwrap();
    assert_eq!(a, b);
    assert_eq!(snap, before);
}

#[test]
fn vip_beacons_follow_the_injected_clock() {
    let mut snap = north_green();
    snap.cars.push(CarRecord::new(Direction::East, 300.0, [255, 255, 255]).vip());

    let mut dark = RecordingCanvas::new();
    render(&snap, SurfaceSize::square(600.0), &FixedClock(dark_beacon_ms()), &mut dark);
    let mut bright = RecordingCanvas::new();
    render(&snap, SurfaceSize::square(600.0), &FixedClock(0.0), &mut bright);

    let beacons = |c: &RecordingCanvas| c.circles().into_iter().skip(12).collect::<Vec<_>>();
    assert_eq!(beacons(&dark).len(), 2);
    assert!(beacons(&dark).iter().all(|(_, _, _, glowing)| !glowing));
    assert!(beacons(&bright).iter().all(|(_, _, _, glowing)| *glowing));
    assert!(bright.texts().contains(&"VIP"));
}

#[test]
fn compass_labels_close_the_frame() {
    let frame = build_frame(&StateSnapshot::default(), SurfaceSize::square(600.0), 0.0).unwrap();
    let tail: Vec<_> = frame
        .ops
        .iter()
        .rev()
        .take(4)
        .filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(tail, ["W", "E", "S", "N"]);
}
