// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene colors.

use crossing_scene_port::{hex, ColorRgba8};

pub const BACKDROP_TOP: ColorRgba8 = hex(0x1e293b);
pub const BACKDROP_BOTTOM: ColorRgba8 = hex(0x334155);

pub const ROAD_BED: ColorRgba8 = hex(0x374151);
pub const ROADWAY: ColorRgba8 = hex(0x4b5563);
pub const LANE_DIVIDER: ColorRgba8 = hex(0xfbbf24);
pub const STOP_LINE: ColorRgba8 = hex(0xffffff);

pub const LAMP_HOUSING: ColorRgba8 = hex(0x1f2937);
pub const RED_ACTIVE: ColorRgba8 = hex(0xef4444);
pub const YELLOW_ACTIVE: ColorRgba8 = hex(0xfbbf24);
pub const GREEN_ACTIVE: ColorRgba8 = hex(0x10b981);
pub const RED_DIM: ColorRgba8 = hex(0x7f1d1d);
pub const YELLOW_DIM: ColorRgba8 = hex(0x78350f);
pub const GREEN_DIM: ColorRgba8 = hex(0x064e3b);

pub const HEADLIGHT: ColorRgba8 = hex(0xffffcc);
pub const WHITE: ColorRgba8 = hex(0xffffff);
pub const VIP_STRIPE: ColorRgba8 = hex(0xff0000);

pub const COMPASS_TEXT: ColorRgba8 = hex(0xf1f5f9);
