// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Crossing render pipeline.
//!
//! Maps a [`crossing_proto::StateSnapshot`] and a square surface edge to a
//! [`crossing_scene_port::Frame`]. Everything here is pure: the only side
//! effect is [`render`] handing the frame to a [`crossing_scene_port::CanvasPort`].
//!
//! All layout constants live in a 600×600 design space and are multiplied by
//! `scale = edge / 600` at draw time. Vehicle travel is the exception: it is
//! mapped straight from engine units (`0..=900`) to the surface edge.

pub mod clock;
pub mod lamps;
mod palette;
pub mod pipeline;
pub mod surface;
pub mod vehicles;

pub use clock::{Clock, FixedClock, SystemClock};
pub use pipeline::{build_frame, render};
pub use surface::{fit_square, SurfaceSize, DEFAULT_PADDING};

/// Edge length of the design space all layout constants are expressed in.
pub const DESIGN_EDGE: f32 = 600.0;

/// Design-to-pixel factor for a surface of edge `edge`.
pub fn scale_for(edge: f32) -> f32 {
    edge / DESIGN_EDGE
}
