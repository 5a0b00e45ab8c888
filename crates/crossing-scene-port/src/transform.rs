// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Local coordinate frames (translation + half-turn).

use core::f32::consts::PI;

use crate::types::{Point, Rect};

/// Orientation of a local frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    /// 0°: local axes match the surface.
    #[default]
    Upright,
    /// 180°: both local axes are flipped.
    Reversed,
}

impl Rotation {
    /// Angle in radians.
    pub fn radians(self) -> f32 {
        match self {
            Rotation::Upright => 0.0,
            Rotation::Reversed => PI,
        }
    }

    fn apply(self, p: Point) -> Point {
        match self {
            Rotation::Upright => p,
            Rotation::Reversed => Point::new(-p.x, -p.y),
        }
    }
}

/// Translate-then-rotate local frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    /// Where the local origin lands in the parent frame.
    pub origin: Point,
    /// Local orientation.
    pub rotation: Rotation,
}

impl Transform {
    /// Construct a frame.
    pub const fn new(origin: Point, rotation: Rotation) -> Self {
        Self { origin, rotation }
    }

    /// Map a local point into the parent frame.
    pub fn apply(&self, p: Point) -> Point {
        let r = self.rotation.apply(p);
        Point::new(self.origin.x + r.x, self.origin.y + r.y)
    }
}

/// Nested frames maintained by adapters while walking a frame's ops.
#[derive(Clone, Debug, Default)]
pub struct TransformStack {
    frames: Vec<Transform>,
}

impl TransformStack {
    /// Empty stack (identity).
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a frame.
    pub fn push(&mut self, t: Transform) {
        self.frames.push(t);
    }

    /// Leave the innermost frame; unbalanced pops are ignored.
    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// Nesting depth.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Net rotation of the innermost frame.
    pub fn rotation(&self) -> Rotation {
        let flips = self
            .frames
            .iter()
            .filter(|t| t.rotation == Rotation::Reversed)
            .count();
        if flips % 2 == 0 {
            Rotation::Upright
        } else {
            Rotation::Reversed
        }
    }

    /// Map a local point to surface coordinates.
    pub fn map_point(&self, p: Point) -> Point {
        self.frames.iter().rev().fold(p, |acc, t| t.apply(acc))
    }

    /// Map a local rectangle to surface coordinates.
    pub fn map_rect(&self, r: Rect) -> Rect {
        Rect::from_corners(self.map_point(r.min()), self.map_point(r.max()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reversed_frame_flips_about_origin() {
        let mut stack = TransformStack::new();
        stack.push(Transform::new(Point::new(100.0, 50.0), Rotation::Reversed));
        let p = stack.map_point(Point::new(4.0, -10.0));
        assert_relative_eq!(p.x, 96.0);
        assert_relative_eq!(p.y, 60.0);
        let r = stack.map_rect(Rect::new(-8.0, -14.0, 16.0, 28.0));
        assert_eq!(r, Rect::new(92.0, 36.0, 16.0, 28.0));
    }

    #[test]
    fn nested_frames_compose_inner_first() {
        let mut stack = TransformStack::new();
        stack.push(Transform::new(Point::new(10.0, 10.0), Rotation::Reversed));
        stack.push(Transform::new(Point::new(1.0, 2.0), Rotation::Reversed));
        assert_eq!(stack.rotation(), Rotation::Upright);
        let p = stack.map_point(Point::new(0.0, 0.0));
        assert_eq!(p, Point::new(9.0, 8.0));
        stack.pop();
        stack.pop();
        stack.pop();
        assert_eq!(stack.depth(), 0);
    }
}
