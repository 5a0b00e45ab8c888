// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for the Crossing viewer (config, prefs,
//! toasts, redraw). Keeps UI/runtime adapters thin and framework-agnostic.

pub mod config;
pub mod config_port;
pub mod prefs;
pub mod redraw_port;
pub mod toast;
