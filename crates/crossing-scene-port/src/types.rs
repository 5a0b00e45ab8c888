// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Core draw types for the canvas contract.

use crate::transform::Transform;

/// RGBA color with 8-bit components (straight alpha).
pub type ColorRgba8 = [u8; 4];

/// Opaque color from a `0xRRGGBB` literal.
pub const fn hex(rgb: u32) -> ColorRgba8 {
    [(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255]
}

/// Color with a fractional alpha in `0.0..=1.0` (clamped).
pub fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> ColorRgba8 {
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    [r, g, b, a]
}

/// Point in surface pixels (or local units inside a transform).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// Horizontal coordinate, growing rightwards.
    pub x: f32,
    /// Vertical coordinate, growing downwards.
    pub y: f32,
}

impl Point {
    /// Construct a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl Rect {
    /// Construct a rectangle.
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle spanning two arbitrary corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self {
            x,
            y,
            w: (a.x - b.x).abs(),
            h: (a.y - b.y).abs(),
        }
    }

    /// Top-left corner.
    pub fn min(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Bottom-right corner.
    pub fn max(&self) -> Point {
        Point::new(self.x + self.w, self.y + self.h)
    }

    /// Centre point.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }
}

/// Soft halo painted behind a shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    /// Blur radius in surface pixels.
    pub radius: f32,
    /// Halo color.
    pub color: ColorRgba8,
}

/// Horizontal anchoring of a text run relative to its anchor point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    /// Anchor is the left end of the baseline.
    Left,
    /// Anchor is the middle of the baseline.
    #[default]
    Center,
}

/// Font parameters for a text op.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub size: f32,
    /// Bold weight.
    pub bold: bool,
    /// Anchoring.
    pub align: TextAlign,
}

/// One painting instruction. Ops are applied in order.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill `rect` with a top-to-bottom two-stop gradient.
    VerticalGradient {
        /// Area to fill.
        rect: Rect,
        /// Color at the top edge.
        top: ColorRgba8,
        /// Color at the bottom edge.
        bottom: ColorRgba8,
    },
    /// Solid rectangle.
    FillRect {
        /// Area to fill.
        rect: Rect,
        /// Fill color.
        color: ColorRgba8,
    },
    /// Solid rectangle with rounded corners.
    FillRoundRect {
        /// Area to fill.
        rect: Rect,
        /// Corner radius.
        radius: f32,
        /// Fill color.
        color: ColorRgba8,
    },
    /// Outline of a rounded rectangle.
    StrokeRoundRect {
        /// Outlined area.
        rect: Rect,
        /// Corner radius.
        radius: f32,
        /// Line width.
        width: f32,
        /// Line color.
        color: ColorRgba8,
    },
    /// Filled circle, optionally glowing.
    FillCircle {
        /// Centre.
        center: Point,
        /// Radius.
        radius: f32,
        /// Fill color.
        color: ColorRgba8,
        /// Halo, if lit.
        glow: Option<Glow>,
    },
    /// Single-line text.
    Text {
        /// Baseline anchor.
        anchor: Point,
        /// Content.
        text: String,
        /// Font parameters.
        style: TextStyle,
        /// Fill color.
        color: ColorRgba8,
        /// Halo, if any.
        glow: Option<Glow>,
    },
    /// Enter a local coordinate frame.
    PushTransform(Transform),
    /// Leave the innermost local coordinate frame.
    PopTransform,
}

/// Ordered ops for one surface of edge `size` pixels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Square surface edge in pixels.
    pub size: f32,
    /// Paint instructions.
    pub ops: Vec<DrawOp>,
}

impl Frame {
    /// Empty frame for a surface of edge `size`.
    pub fn new(size: f32) -> Self {
        Self {
            size,
            ops: Vec::new(),
        }
    }

    /// Append one op.
    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }
}
