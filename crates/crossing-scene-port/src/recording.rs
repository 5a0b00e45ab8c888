// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Recording adapter for headless testing of renderers.
//!
//! RecordingCanvas keeps every presented frame without touching a GPU. Use it
//! to assert on geometry and colors produced by the pipeline.

use crate::{CanvasPort, ColorRgba8, DrawOp, Frame, Point, TransformStack};

/// Canvas adapter that records presented frames.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    /// Frames in presentation order.
    pub frames: Vec<Frame>,
}

impl RecordingCanvas {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `present` calls seen.
    pub fn present_count(&self) -> usize {
        self.frames.len()
    }

    /// Most recently presented frame.
    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Circles of the last frame, mapped to surface coordinates.
    ///
    /// Each entry is `(centre, radius, color, glowing)`.
    pub fn circles(&self) -> Vec<(Point, f32, ColorRgba8, bool)> {
        let Some(frame) = self.last() else {
            return Vec::new();
        };
        let mut stack = TransformStack::new();
        let mut out = Vec::new();
        for op in &frame.ops {
            match op {
                DrawOp::PushTransform(t) => stack.push(*t),
                DrawOp::PopTransform => stack.pop(),
                DrawOp::FillCircle {
                    center,
                    radius,
                    color,
                    glow,
                } => out.push((stack.map_point(*center), *radius, *color, glow.is_some())),
                _ => {}
            }
        }
        out
    }

    /// Text runs of the last frame in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.last()
            .map(|f| {
                f.ops
                    .iter()
                    .filter_map(|op| match op {
                        DrawOp::Text { text, .. } => Some(text.as_str()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl CanvasPort for RecordingCanvas {
    fn present(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{hex, Rotation, Transform};

    #[test]
    fn records_frames_and_maps_circles_through_transforms() {
        let mut canvas = RecordingCanvas::new();
        let mut frame = Frame::new(100.0);
        frame.push(DrawOp::PushTransform(Transform::new(
            Point::new(50.0, 50.0),
            Rotation::Reversed,
        )));
        frame.push(DrawOp::FillCircle {
            center: Point::new(-5.0, -10.0),
            radius: 2.0,
            color: hex(0xffffff),
            glow: None,
        });
        frame.push(DrawOp::PopTransform);
        canvas.present(&frame);

        assert_eq!(canvas.present_count(), 1);
        let circles = canvas.circles();
        assert_eq!(circles.len(), 1);
        assert_eq!(circles[0].0, Point::new(55.0, 60.0));
        assert!(!circles[0].3);
    }

    #[test]
    fn empty_recorder_has_no_geometry() {
        let canvas = RecordingCanvas::new();
        assert!(canvas.circles().is_empty());
        assert!(canvas.texts().is_empty());
    }
}
