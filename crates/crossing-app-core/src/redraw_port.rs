// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Redraw port so UI-side effects can wake the window without depending on a
//! windowing crate.

/// Minimal redraw port; implementations forward to the window's
/// `request_redraw` and must be cheap.
pub trait RedrawPort {
    /// Ask for another frame of the main surface.
    fn request_redraw(&self);
}
