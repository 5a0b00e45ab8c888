// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Canvas port contract for Crossing renderers.
//!
//! The render pipeline turns a snapshot into a [`Frame`]: an ordered list of
//! 2D [`DrawOp`]s in surface pixels. Adapters implement [`CanvasPort`] to put
//! those ops on screen (egui painter in the viewer, [`RecordingCanvas`] in
//! tests).
//!
//! # Design Principles
//!
//! - **Adapters are dumb**: they paint ops in order. No domain logic.
//! - **No time ownership**: animation phase is baked into the ops by the caller.
//! - **Axis-aligned only**: transforms are a translation plus a 0°/180° turn,
//!   so every rectangle stays axis-aligned after mapping.

mod port;
mod recording;
mod transform;
mod types;

pub use port::CanvasPort;
pub use recording::RecordingCanvas;
pub use transform::{Rotation, Transform, TransformStack};
pub use types::{
    hex, rgba, ColorRgba8, DrawOp, Frame, Glow, Point, Rect, TextAlign, TextStyle,
};
