// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Canvas port trait defining the renderer contract.

use crate::Frame;

/// Canvas presentation port.
///
/// Implementors receive complete frames and paint them. No time ownership:
/// animation state (beacon pulse) is already baked into the ops.
///
/// # Design
///
/// The render pipeline is pure; presenting a frame is its only side effect.
/// Adapters (egui painter, headless recorder) implement this trait.
pub trait CanvasPort {
    /// Paint `frame`, replacing whatever the surface showed before.
    fn present(&mut self, frame: &Frame);
}
