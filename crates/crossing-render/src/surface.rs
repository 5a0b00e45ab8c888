// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Square drawing-surface sizing.

/// Padding subtracted from the available layout box on each axis.
pub const DEFAULT_PADDING: f32 = 64.0;

/// Pixel size of the square drawing surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceSize {
    edge: f32,
}

impl SurfaceSize {
    /// Square of the given edge; negative or non-finite edges collapse to zero.
    pub fn square(edge: f32) -> Self {
        let edge = if edge.is_finite() { edge.max(0.0) } else { 0.0 };
        Self { edge }
    }

    /// Edge length in pixels.
    pub fn edge(self) -> f32 {
        self.edge
    }

    /// `(width, height)`; always equal.
    pub fn dims(self) -> (f32, f32) {
        (self.edge, self.edge)
    }

    /// True for a zero-edge surface.
    pub fn is_empty(self) -> bool {
        self.edge <= 0.0
    }
}

/// Largest whole-pixel square that fits `available_w × available_h` after
/// removing `padding` from each axis. Never negative; a non-finite box is
/// empty.
pub fn fit_square(available_w: f32, available_h: f32, padding: f32) -> SurfaceSize {
    if !available_w.is_finite() || !available_h.is_finite() {
        return SurfaceSize::square(0.0);
    }
    let raw = available_w.min(available_h) - padding;
    SurfaceSize::square(raw.floor())
}
